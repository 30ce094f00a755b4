// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Account lifecycle:
//!
//! ```text
//! open -> PendingApproval -> Active | Inactive        (employee review)
//! Active -> OnHold                                    (customer asks to deactivate)
//! OnHold -> Closed | Active                           (employee decision)
//! ```
//!
//! `Closed` is terminal.

use chrono::NaiveDate;
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use super::{
    ACCOUNT_COLUMNS, account_from_row, ensure_not_closed, load_account, loans_for_account,
};
use crate::error::{BankError, BankResult, map_constraint};
use crate::models::{Account, AccountStatus, CustomerStatus};
use crate::records::{account_types, branches, customers};
use crate::utils::parse_pin;

const ACCOUNT_NUMBER_ATTEMPTS: usize = 16;

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub customer_id: i64,
    pub account_type_id: i64,
    pub branch_id: i64,
    pub pin: String,
    pub opening_balance: Decimal,
}

fn generate_account_number<R: Rng>(rng: &mut R) -> String {
    format!("{:010}", rng.gen_range(0..10_000_000_000u64))
}

fn unused_account_number(conn: &Connection) -> BankResult<String> {
    let mut rng = rand::thread_rng();
    for _ in 0..ACCOUNT_NUMBER_ATTEMPTS {
        let candidate = generate_account_number(&mut rng);
        let taken: Option<i64> = conn
            .query_row(
                "SELECT id FROM accounts WHERE account_number=?1",
                params![candidate],
                |r| r.get(0),
            )
            .optional()?;
        if taken.is_none() {
            return Ok(candidate);
        }
    }
    Err(BankError::Conflict(
        "could not allocate a unique account number".to_string(),
    ))
}

/// Opens an account awaiting employee approval, with an unscored CIBIL of 0.
pub fn open_account(conn: &Connection, new: &NewAccount, today: NaiveDate) -> BankResult<Account> {
    let customer = customers::get(conn, new.customer_id)?;
    if customer.status != CustomerStatus::Active {
        return Err(BankError::validation("customer_id", "customer is inactive"));
    }
    account_types::get(conn, new.account_type_id)?;
    branches::get(conn, new.branch_id)?;
    let pin = parse_pin(&new.pin)
        .ok_or_else(|| BankError::validation("pin", "must be 4 digits between 1000 and 9999"))?;
    if new.opening_balance < Decimal::ZERO {
        return Err(BankError::validation(
            "opening_balance",
            "must not be negative",
        ));
    }

    let account_number = unused_account_number(conn)?;
    conn.execute(
        "INSERT INTO accounts(account_number, pin, customer_id, account_type_id, branch_id, balance, cibil_score, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8)",
        params![
            account_number,
            pin,
            new.customer_id,
            new.account_type_id,
            new.branch_id,
            new.opening_balance.to_string(),
            AccountStatus::PendingApproval,
            today,
        ],
    )
    .map_err(|e| map_constraint(e, "account"))?;
    let id = conn.last_insert_rowid();
    tracing::info!(account_id = id, customer_id = new.customer_id, "account opened, pending approval");
    load_account(conn, id)
}

fn set_status(conn: &Connection, account_id: i64, status: AccountStatus) -> BankResult<()> {
    conn.execute(
        "UPDATE accounts SET status=?1 WHERE id=?2",
        params![status, account_id],
    )?;
    Ok(())
}

/// Employee decision on a newly opened account.
pub fn review_request(conn: &Connection, account_id: i64, approved: bool) -> BankResult<Account> {
    let account = load_account(conn, account_id)?;
    ensure_not_closed(&account)?;
    let target = if approved {
        AccountStatus::Active
    } else {
        AccountStatus::Inactive
    };
    if account.status != AccountStatus::PendingApproval {
        return Err(BankError::InvalidTransition {
            account_id,
            from: account.status,
            to: target,
        });
    }
    set_status(conn, account_id, target)?;
    tracing::info!(account_id, status = %target, "account request reviewed");
    load_account(conn, account_id)
}

/// Number of loans on the account whose final status is not Closed. Loans
/// still under review have no final status and count as outstanding.
pub fn outstanding_loans(conn: &Connection, account_id: i64) -> BankResult<usize> {
    Ok(loans_for_account(conn, account_id)?
        .iter()
        .filter(|l| !l.is_closed())
        .count())
}

fn ensure_no_outstanding_loans(conn: &Connection, account_id: i64) -> BankResult<()> {
    let count = outstanding_loans(conn, account_id)?;
    if count > 0 {
        return Err(BankError::OutstandingLoans { account_id, count });
    }
    Ok(())
}

/// Customer asks for an Active account to be shut; it is parked OnHold until
/// an employee decides.
pub fn request_deactivation(conn: &Connection, account_id: i64) -> BankResult<Account> {
    let account = load_account(conn, account_id)?;
    ensure_not_closed(&account)?;
    match account.status {
        AccountStatus::Active => {}
        AccountStatus::Inactive => return Err(BankError::AlreadyInactive(account_id)),
        from => {
            return Err(BankError::InvalidTransition {
                account_id,
                from,
                to: AccountStatus::OnHold,
            });
        }
    }
    ensure_no_outstanding_loans(conn, account_id)?;
    set_status(conn, account_id, AccountStatus::OnHold)?;
    tracing::info!(account_id, "deactivation requested");
    load_account(conn, account_id)
}

/// Employee decision on a pending deactivation: approve closes the account
/// for good, reject puts it back to Active.
pub fn decide_deactivation(
    conn: &Connection,
    account_id: i64,
    approved: bool,
) -> BankResult<Account> {
    let account = load_account(conn, account_id)?;
    ensure_not_closed(&account)?;
    ensure_no_outstanding_loans(conn, account_id)?;
    let target = if approved {
        AccountStatus::Closed
    } else {
        AccountStatus::Active
    };
    if account.status != AccountStatus::OnHold {
        return Err(BankError::InvalidTransition {
            account_id,
            from: account.status,
            to: target,
        });
    }
    set_status(conn, account_id, target)?;
    tracing::info!(account_id, status = %target, "deactivation decided");
    load_account(conn, account_id)
}

pub fn list_accounts(conn: &Connection, status: Option<AccountStatus>) -> BankResult<Vec<Account>> {
    let sql = format!(
        "SELECT {} FROM accounts WHERE (?1 IS NULL OR status=?1) ORDER BY id",
        ACCOUNT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![status], account_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn accounts_for_customer(conn: &Connection, customer_id: i64) -> BankResult<Vec<Account>> {
    customers::get(conn, customer_id)?;
    let sql = format!(
        "SELECT {} FROM accounts WHERE customer_id=?1 ORDER BY id",
        ACCOUNT_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![customer_id], account_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
