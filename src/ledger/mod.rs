// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Money movement, account lifecycle and loan lifecycle rules.
//!
//! Every mutating operation runs inside one SQLite transaction: the checks,
//! the balance update, the ledger entry and the CIBIL refresh either all land
//! or none do.

pub mod accounts;
pub mod cibil;
pub mod lifecycle;
pub mod limits;
pub mod loans;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{BankError, BankResult};
use crate::models::{Account, AccountStatus, Beneficiary, Loan, Transaction, TransactionType};
use crate::utils::{decimal_at, opt_decimal_at, parse_pin, sum_decimals};

pub(crate) const ACCOUNT_COLUMNS: &str = "id, account_number, pin, customer_id, account_type_id, branch_id, balance, cibil_score, status, created_at";

pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, account_id, date, kind, description, debit, credit, updated_balance";

pub(crate) const LOAN_COLUMNS: &str = "id, account_id, loan_option_id, employee_id, purpose, application_date, application_status, loan_status, final_status, remarks, approved_date, disbursement_date, closed_date";

pub(crate) fn account_from_row(r: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: r.get(0)?,
        account_number: r.get(1)?,
        pin: r.get(2)?,
        customer_id: r.get(3)?,
        account_type_id: r.get(4)?,
        branch_id: r.get(5)?,
        balance: decimal_at(r, 6)?,
        cibil_score: r.get(7)?,
        status: r.get(8)?,
        created_at: r.get(9)?,
    })
}

pub(crate) fn transaction_from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    Ok(Transaction {
        id: r.get(0)?,
        account_id: r.get(1)?,
        date: r.get(2)?,
        kind: r.get(3)?,
        description: r.get(4)?,
        debit: opt_decimal_at(r, 5)?,
        credit: opt_decimal_at(r, 6)?,
        updated_balance: decimal_at(r, 7)?,
    })
}

pub(crate) fn loan_from_row(r: &Row<'_>) -> rusqlite::Result<Loan> {
    Ok(Loan {
        id: r.get(0)?,
        account_id: r.get(1)?,
        loan_option_id: r.get(2)?,
        employee_id: r.get(3)?,
        purpose: r.get(4)?,
        application_date: r.get(5)?,
        application_status: r.get(6)?,
        loan_status: r.get(7)?,
        final_status: r.get(8)?,
        remarks: r.get(9)?,
        approved_date: r.get(10)?,
        disbursement_date: r.get(11)?,
        closed_date: r.get(12)?,
    })
}

pub(crate) fn beneficiary_from_row(r: &Row<'_>) -> rusqlite::Result<Beneficiary> {
    Ok(Beneficiary {
        id: r.get(0)?,
        account_id: r.get(1)?,
        account_name: r.get(2)?,
        account_number: r.get(3)?,
        branch_id: r.get(4)?,
    })
}

pub fn find_account(conn: &Connection, account_id: i64) -> BankResult<Option<Account>> {
    let sql = format!("SELECT {} FROM accounts WHERE id=?1", ACCOUNT_COLUMNS);
    Ok(conn
        .query_row(&sql, params![account_id], account_from_row)
        .optional()?)
}

pub fn load_account(conn: &Connection, account_id: i64) -> BankResult<Account> {
    find_account(conn, account_id)?.ok_or(BankError::AccountNotFound(account_id))
}

pub fn load_loan(conn: &Connection, loan_id: i64) -> BankResult<Loan> {
    let sql = format!("SELECT {} FROM loans WHERE id=?1", LOAN_COLUMNS);
    conn.query_row(&sql, params![loan_id], loan_from_row)
        .optional()?
        .ok_or(BankError::LoanNotFound(loan_id))
}

pub fn loans_for_account(conn: &Connection, account_id: i64) -> BankResult<Vec<Loan>> {
    let sql = format!(
        "SELECT {} FROM loans WHERE account_id=?1 ORDER BY id",
        LOAN_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![account_id], loan_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Closed is checked first so a closed account is always reported as such.
pub(crate) fn ensure_active(account: &Account) -> BankResult<()> {
    match account.status {
        AccountStatus::Closed => Err(BankError::AccountClosed(account.id)),
        AccountStatus::Active => Ok(()),
        status => Err(BankError::AccountNotActive {
            account_id: account.id,
            status,
        }),
    }
}

pub(crate) fn ensure_not_closed(account: &Account) -> BankResult<()> {
    if account.status == AccountStatus::Closed {
        return Err(BankError::AccountClosed(account.id));
    }
    Ok(())
}

pub(crate) fn verify_pin(account: &Account, pin: &str) -> BankResult<()> {
    match parse_pin(pin) {
        Some(p) if p == account.pin => Ok(()),
        _ => Err(BankError::InvalidPin(account.id)),
    }
}

pub(crate) fn ensure_positive(amount: Decimal) -> BankResult<()> {
    if amount <= Decimal::ZERO {
        return Err(BankError::InvalidAmount(amount));
    }
    Ok(())
}

/// Balance after crediting `amount`, refusing credits the decimal cannot hold.
pub(crate) fn credited(account: &Account, amount: Decimal) -> BankResult<Decimal> {
    account
        .balance
        .checked_add(amount)
        .ok_or(BankError::BalanceOverflow {
            account_id: account.id,
            amount,
        })
}

pub(crate) fn account_type_name(conn: &Connection, account_type_id: i64) -> BankResult<String> {
    conn.query_row(
        "SELECT name FROM account_types WHERE id=?1",
        params![account_type_id],
        |r| r.get(0),
    )
    .optional()?
    .ok_or(BankError::AccountTypeNotFound(account_type_id))
}

/// Debits booked against `account_id` on `day`, whatever their type.
pub fn daily_debits(conn: &Connection, account_id: i64, day: NaiveDate) -> BankResult<Decimal> {
    sum_decimals(
        conn,
        "SELECT debit FROM transactions WHERE account_id=?1 AND date=?2 AND debit IS NOT NULL",
        params![account_id, day],
    )
}

pub(crate) struct NewEntry<'a> {
    pub account_id: i64,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub description: &'a str,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub updated_balance: Decimal,
}

/// Appends a ledger row and moves the account balance to the entry's snapshot.
pub(crate) fn post_entry(conn: &Connection, entry: NewEntry<'_>) -> BankResult<Transaction> {
    conn.execute(
        "INSERT INTO transactions(account_id, date, kind, description, debit, credit, updated_balance)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.account_id,
            entry.date,
            entry.kind,
            entry.description,
            entry.debit.map(|d| d.to_string()),
            entry.credit.map(|c| c.to_string()),
            entry.updated_balance.to_string(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    conn.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![entry.updated_balance.to_string(), entry.account_id],
    )?;
    Ok(Transaction {
        id,
        account_id: entry.account_id,
        date: entry.date,
        kind: entry.kind,
        description: entry.description.to_string(),
        debit: entry.debit,
        credit: entry.credit,
        updated_balance: entry.updated_balance,
    })
}
