// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command, value_parser};

use crate::models::{AccountStatus, CustomerStatus, EmployeePosition, LoanType};

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn text_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).required(true).help(help)
}

fn opt_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

/// Restricts `arg` to the stored names of an enum, matched case-insensitively.
fn one_of(arg: Arg, names: impl IntoIterator<Item = &'static str>) -> Arg {
    arg.value_parser(PossibleValuesParser::new(names))
        .ignore_case(true)
}

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print JSON instead of a table")
}

fn decision_arg() -> Arg {
    Arg::new("decision")
        .long("decision")
        .required(true)
        .value_parser(["approve", "reject"])
        .help("approve or reject")
}

fn pin_arg() -> Arg {
    text_arg("pin", "4-digit account PIN")
}

fn customer_cmd() -> Command {
    Command::new("customer")
        .about("Customer records")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Onboard a customer")
                .arg(text_arg("first-name", "First name"))
                .arg(opt_arg("middle-name", "Middle name"))
                .arg(text_arg("last-name", "Last name"))
                .arg(text_arg("gender", "Male, Female or Other"))
                .arg(text_arg("contact", "10-digit contact number"))
                .arg(text_arg("address", "Postal address"))
                .arg(text_arg("dob", "Date of birth YYYY-MM-DD"))
                .arg(text_arg("aadhar", "12-digit Aadhar number"))
                .arg(text_arg("pan", "PAN, e.g. ABCDE1234F"))
                .arg(text_arg("email", "Email address"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("get")
                .arg(id_arg("id", "Customer id"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("list")
                .arg(one_of(
                    opt_arg("status", "Customer status"),
                    CustomerStatus::ALL.iter().map(CustomerStatus::as_str),
                ))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("update")
                .about("Change contact number, address or email")
                .arg(id_arg("id", "Customer id"))
                .arg(opt_arg("contact", "10-digit contact number"))
                .arg(opt_arg("address", "Postal address"))
                .arg(opt_arg("email", "Email address")),
        )
        .subcommand(Command::new("deactivate").arg(id_arg("id", "Customer id")))
        .subcommand(
            Command::new("accounts")
                .about("Accounts held by a customer")
                .arg(id_arg("id", "Customer id"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("loans")
                .about("Loans across a customer's accounts")
                .arg(id_arg("id", "Customer id"))
                .arg(json_flag()),
        )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Accounts, money movement and account lifecycle")
        .subcommand_required(true)
        .subcommand(
            Command::new("open")
                .about("Open an account pending employee approval")
                .arg(id_arg("customer", "Customer id"))
                .arg(id_arg("type", "Account type id"))
                .arg(id_arg("branch", "Branch id"))
                .arg(pin_arg())
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .default_value("0")
                        .help("Opening balance"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("deposit")
                .arg(id_arg("id", "Account id"))
                .arg(text_arg("amount", "Amount"))
                .arg(pin_arg()),
        )
        .subcommand(
            Command::new("withdraw")
                .arg(id_arg("id", "Account id"))
                .arg(text_arg("amount", "Amount"))
                .arg(pin_arg()),
        )
        .subcommand(
            Command::new("transfer")
                .about("Send money to a registered beneficiary")
                .arg(id_arg("id", "Account id"))
                .arg(id_arg("beneficiary", "Beneficiary id"))
                .arg(text_arg("amount", "Amount"))
                .arg(pin_arg()),
        )
        .subcommand(
            Command::new("change-pin")
                .arg(id_arg("id", "Account id"))
                .arg(text_arg("old-pin", "Current PIN"))
                .arg(text_arg("new-pin", "New PIN")),
        )
        .subcommand(
            Command::new("add-beneficiary")
                .arg(id_arg("id", "Account id"))
                .arg(text_arg("name", "Beneficiary account name"))
                .arg(text_arg("number", "Beneficiary account number"))
                .arg(id_arg("branch", "Beneficiary branch id")),
        )
        .subcommand(
            Command::new("beneficiaries")
                .arg(id_arg("id", "Account id"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("details")
                .arg(id_arg("id", "Account id"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("statement")
                .arg(id_arg("id", "Account id"))
                .arg(opt_arg("from", "Start date YYYY-MM-DD"))
                .arg(opt_arg("to", "End date YYYY-MM-DD"))
                .arg(
                    Arg::new("employee")
                        .long("employee")
                        .action(ArgAction::SetTrue)
                        .help("Back-office view, no account status check"),
                )
                .arg(opt_arg("csv", "Write the statement to this CSV file"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("list")
                .arg(one_of(
                    opt_arg("status", "Filter by account status"),
                    AccountStatus::ALL.iter().map(AccountStatus::as_str),
                ))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("review")
                .about("Approve or reject a newly opened account")
                .arg(id_arg("id", "Account id"))
                .arg(decision_arg()),
        )
        .subcommand(
            Command::new("request-deactivation")
                .about("Ask for the account to be closed")
                .arg(id_arg("id", "Account id")),
        )
        .subcommand(
            Command::new("decide-deactivation")
                .about("Approve (close) or reject (reactivate) a deactivation request")
                .arg(id_arg("id", "Account id"))
                .arg(decision_arg()),
        )
}

fn employee_cmd() -> Command {
    Command::new("employee")
        .about("Employee records")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(text_arg("first-name", "First name"))
                .arg(text_arg("last-name", "Last name"))
                .arg(text_arg("email", "Email address"))
                .arg(text_arg("phone", "10-digit phone number"))
                .arg(one_of(
                    text_arg("position", "Position, e.g. LoanOfficer"),
                    EmployeePosition::ALL.iter().map(EmployeePosition::as_str),
                ))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("get")
                .arg(id_arg("id", "Employee id"))
                .arg(json_flag()),
        )
        .subcommand(Command::new("list").arg(json_flag()))
        .subcommand(
            Command::new("update")
                .arg(id_arg("id", "Employee id"))
                .arg(one_of(
                    opt_arg("position", "Position"),
                    EmployeePosition::ALL.iter().map(EmployeePosition::as_str),
                ))
                .arg(opt_arg("phone", "10-digit phone number"))
                .arg(opt_arg("email", "Email address")),
        )
        .subcommand(Command::new("deactivate").arg(id_arg("id", "Employee id")))
}

fn admin_cmd() -> Command {
    Command::new("admin")
        .about("Administrators")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(text_arg("name", "Name"))
                .arg(text_arg("email", "Email address")),
        )
        .subcommand(Command::new("list").arg(json_flag()))
}

fn branch_cmd() -> Command {
    Command::new("branch")
        .about("Bank branches")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(text_arg("name", "Branch name"))
                .arg(text_arg("address", "Address"))
                .arg(text_arg("bank", "Bank name"))
                .arg(text_arg("contact", "10-digit contact number"))
                .arg(text_arg("ifsc", "11-character IFSC code"))
                .arg(text_arg("city", "City"))
                .arg(text_arg("state", "State"))
                .arg(text_arg("postal-code", "6-digit postal code")),
        )
        .subcommand(
            Command::new("get")
                .arg(id_arg("id", "Branch id"))
                .arg(json_flag()),
        )
        .subcommand(Command::new("list").arg(json_flag()))
}

fn loan_option_cmd() -> Command {
    Command::new("loan-option")
        .about("Loan products")
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .arg(one_of(
                    text_arg("type", "Loan type"),
                    LoanType::ALL.iter().map(LoanType::as_str),
                ))
                .arg(text_arg("amount", "Principal"))
                .arg(text_arg("rate", "Interest rate in percent"))
                .arg(
                    Arg::new("tenure")
                        .long("tenure")
                        .required(true)
                        .value_parser(value_parser!(u32))
                        .help("Tenure in months"),
                ),
        )
        .subcommand(
            Command::new("get")
                .arg(id_arg("id", "Loan option id"))
                .arg(json_flag()),
        )
        .subcommand(Command::new("list").arg(json_flag()))
}

fn loan_cmd() -> Command {
    Command::new("loan")
        .about("Loan applications and lifecycle")
        .subcommand_required(true)
        .subcommand(
            Command::new("apply")
                .arg(id_arg("account", "Account id"))
                .arg(id_arg("option", "Loan option id"))
                .arg(text_arg("purpose", "Purpose of the loan")),
        )
        .subcommand(
            Command::new("review")
                .about("Employee decision on an application under review")
                .arg(id_arg("id", "Loan id"))
                .arg(id_arg("employee", "Reviewing employee id"))
                .arg(decision_arg())
                .arg(opt_arg("remarks", "Remarks recorded on the loan")),
        )
        .subcommand(
            Command::new("disburse")
                .about("Pay out or reject an approved loan")
                .arg(id_arg("id", "Loan id"))
                .arg(decision_arg()),
        )
        .subcommand(Command::new("close").arg(id_arg("id", "Loan id")))
        .subcommand(
            Command::new("get")
                .arg(id_arg("id", "Loan id"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("history")
                .about("Loan history for an account")
                .arg(id_arg("account", "Account id"))
                .arg(json_flag()),
        )
        .subcommand(Command::new("list").arg(json_flag()))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Financial report and admin dashboard")
        .subcommand_required(true)
        .subcommand(Command::new("financial").arg(json_flag()))
        .subcommand(Command::new("dashboard").arg(json_flag()))
}

pub fn build_cli() -> Command {
    Command::new("bankdesk")
        .about("Banking back-office ledger: accounts, transactions and loans")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(customer_cmd())
        .subcommand(account_cmd())
        .subcommand(employee_cmd())
        .subcommand(admin_cmd())
        .subcommand(branch_cmd())
        .subcommand(
            Command::new("account-type")
                .about("Account types")
                .subcommand_required(true)
                .subcommand(Command::new("list").arg(json_flag())),
        )
        .subcommand(loan_option_cmd())
        .subcommand(loan_cmd())
        .subcommand(report_cmd())
}
