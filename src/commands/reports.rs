// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::AppContext;
use crate::reports::{self, AdminDashboard, FinancialReport};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

pub fn handle(ctx: &AppContext<'_>, conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("financial", sub)) => {
            let report = reports::financial_report(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &report)? {
                println!("{}", financial_table(&report));
            }
        }
        Some(("dashboard", sub)) => {
            let dash = reports::dashboard(conn, ctx.today)?;
            if !maybe_print_json(sub.get_flag("json"), &dash)? {
                print_dashboard(&dash);
            }
        }
        _ => {}
    }
    Ok(())
}

fn financial_table(r: &FinancialReport) -> comfy_table::Table {
    pretty_table(
        &["Metric", "Value"],
        vec![
            vec!["Total deposits".into(), fmt_money(&r.total_deposits)],
            vec!["Total withdrawals".into(), fmt_money(&r.total_withdrawals)],
            vec!["Loans disbursed".into(), fmt_money(&r.total_loans_disbursed)],
            vec!["Net balance (active)".into(), fmt_money(&r.net_balance)],
            vec!["Interest income".into(), fmt_money(&r.interest_income)],
            vec!["Active accounts".into(), r.active_accounts.to_string()],
            vec!["Disbursed loans".into(), r.disbursed_loans.to_string()],
        ],
    )
}

fn print_dashboard(d: &AdminDashboard) {
    let rows = vec![
        vec!["Employees".into(), d.employees.to_string()],
        vec![
            "Customers (M/F)".into(),
            format!("{} ({}/{})", d.customers, d.male_customers, d.female_customers),
        ],
        vec!["New customers, last month".into(), d.new_customers_last_month.to_string()],
        vec!["Transactions".into(), d.transactions.to_string()],
        vec!["Deposits".into(), fmt_money(&d.total_deposits)],
        vec!["Withdrawals".into(), fmt_money(&d.total_withdrawals)],
        vec!["Loans disbursed".into(), fmt_money(&d.total_loans_disbursed)],
        vec!["Interest income".into(), fmt_money(&d.interest_income)],
        vec!["Active accounts".into(), d.active_accounts.to_string()],
        vec!["Average active balance".into(), fmt_money(&d.average_active_balance)],
        vec!["Loan approval rate".into(), format!("{:.2}%", d.loan_approval_rate)],
        vec!["Average loan".into(), fmt_money(&d.average_loan_amount)],
        vec!["Overdue loans".into(), d.overdue_loans.to_string()],
        vec!["Loans to deposits".into(), format!("{:.2}%", d.loans_to_deposits_ratio)],
        vec![
            "Top branch".into(),
            d.top_branch
                .as_ref()
                .map(|b| format!("{} ({})", b.name, fmt_money(&b.total_balance)))
                .unwrap_or_default(),
        ],
    ];
    println!("{}", pretty_table(&["Metric", "Value"], rows));

    let volume = d
        .volume_by_type
        .iter()
        .map(|(kind, v)| vec![kind.to_string(), v.count.to_string(), fmt_money(&v.amount)])
        .collect();
    println!("{}", pretty_table(&["Type", "Count", "Amount"], volume));

    let top = d
        .top_customers
        .iter()
        .map(|c| vec![c.customer_id.to_string(), c.name.clone(), fmt_money(&c.total_balance)])
        .collect();
    println!("{}", pretty_table(&["Customer", "Name", "Balance"], top));
}
