// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use bankdesk::db;
use bankdesk::ledger::lifecycle::{self, NewAccount};
use bankdesk::models::{EmployeePosition, LoanType};
use bankdesk::records::branches::{self, NewBranch};
use bankdesk::records::customers::{self, NewCustomer};
use bankdesk::records::employees::{self, NewEmployee};
use bankdesk::records::loan_options;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub const SAVINGS: i64 = 1;
pub const SALARY: i64 = 2;
pub const BUSINESS: i64 = 3;
pub const PIN: &str = "4321";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub struct Bank {
    pub conn: Connection,
    pub customer_id: i64,
    pub branch_id: i64,
    pub employee_id: i64,
    pub option_id: i64,
}

pub fn new_customer(n: u32) -> NewCustomer {
    NewCustomer {
        first_name: format!("Harry{}", n),
        middle_name: None,
        last_name: "Potter".into(),
        gender: if n % 2 == 0 { "Male" } else { "Female" }.into(),
        contact_number: format!("98765{:05}", n),
        address: "4 Privet Drive".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 7, 31).unwrap(),
        aadhar_number: format!("1234567{:05}", n),
        pan: format!("ABCDE{:04}F", n),
        email: format!("harry{}@hogwarts.edu", n),
    }
}

pub fn add_customer(conn: &Connection, n: u32) -> i64 {
    customers::create(conn, &new_customer(n), today()).unwrap().id
}

pub fn new_branch(ifsc: &str) -> NewBranch {
    NewBranch {
        name: "Diagon Alley".into(),
        address: "1 Diagon Alley".into(),
        bank_name: "Bank of Hogwarts".into(),
        contact_number: "0112345678".into(),
        ifsc_code: ifsc.into(),
        city: "London".into(),
        state: "Greater London".into(),
        postal_code: "110001".into(),
    }
}

pub fn setup() -> Bank {
    let conn = db::open_in_memory().unwrap();
    let customer_id = add_customer(&conn, 1);
    let branch_id = branches::add(&conn, &new_branch("HOGW0000001")).unwrap().id;
    let employee_id = employees::add(
        &conn,
        &NewEmployee {
            first_name: "Minerva".into(),
            last_name: "McGonagall".into(),
            email: "minerva@hogwarts.edu".into(),
            phone_number: "9000000001".into(),
            position: EmployeePosition::LoanOfficer,
        },
        today(),
    )
    .unwrap()
    .id;
    let option_id = loan_options::add(&conn, LoanType::Home, dec("50000"), dec("8.5"), 12)
        .unwrap()
        .id;
    Bank {
        conn,
        customer_id,
        branch_id,
        employee_id,
        option_id,
    }
}

impl Bank {
    /// Opens an account that is still waiting for approval.
    pub fn pending_account(&self, account_type_id: i64, balance: &str) -> i64 {
        lifecycle::open_account(
            &self.conn,
            &NewAccount {
                customer_id: self.customer_id,
                account_type_id,
                branch_id: self.branch_id,
                pin: PIN.into(),
                opening_balance: dec(balance),
            },
            today(),
        )
        .unwrap()
        .id
    }

    pub fn active_account(&self, account_type_id: i64, balance: &str) -> i64 {
        let id = self.pending_account(account_type_id, balance);
        lifecycle::review_request(&self.conn, id, true).unwrap();
        id
    }

    pub fn balance(&self, account_id: i64) -> Decimal {
        bankdesk::ledger::load_account(&self.conn, account_id)
            .unwrap()
            .balance
    }

    pub fn transaction_count(&self, account_id: i64) -> i64 {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM transactions WHERE account_id=?1",
                [account_id],
                |r| r.get(0),
            )
            .unwrap()
    }
}
