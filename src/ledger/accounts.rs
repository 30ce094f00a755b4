// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use serde::Serialize;

use super::limits::DailyLimits;
use super::{
    NewEntry, TRANSACTION_COLUMNS, account_type_name, beneficiary_from_row, cibil, credited,
    daily_debits, ensure_active, ensure_not_closed, ensure_positive, load_account,
    loans_for_account, post_entry, transaction_from_row, verify_pin,
};
use crate::error::{BankError, BankResult};
use crate::models::{Account, Beneficiary, Customer, Loan, Transaction, TransactionType};
use crate::records::{branches, customers};
use crate::utils::parse_pin;

/// Checks shared by every PIN-guarded operation, in the order they are reported.
fn open_for_customer(conn: &Connection, account_id: i64, pin: &str) -> BankResult<Account> {
    let account = load_account(conn, account_id)?;
    ensure_active(&account)?;
    verify_pin(&account, pin)?;
    Ok(account)
}

fn ensure_funds(account: &Account, amount: Decimal) -> BankResult<()> {
    if account.balance < amount {
        return Err(BankError::InsufficientBalance {
            available: account.balance,
            requested: amount,
        });
    }
    Ok(())
}

fn ensure_within_limit(
    conn: &Connection,
    limits: &DailyLimits,
    account: &Account,
    amount: Decimal,
    today: NaiveDate,
) -> BankResult<()> {
    let type_name = account_type_name(conn, account.account_type_id)?;
    let limit = limits.for_account_type(&type_name)?;
    let used = daily_debits(conn, account.id, today)?;
    DailyLimits::check(limit, used, amount)
}

pub fn deposit(
    conn: &mut Connection,
    account_id: i64,
    amount: Decimal,
    pin: &str,
    today: NaiveDate,
) -> BankResult<Transaction> {
    ensure_positive(amount)?;
    let tx = conn.transaction()?;
    let account = open_for_customer(&tx, account_id, pin)?;
    let updated_balance = credited(&account, amount)?;

    let entry = post_entry(
        &tx,
        NewEntry {
            account_id,
            date: today,
            kind: TransactionType::Deposit,
            description: "Deposit to Account",
            debit: None,
            credit: Some(amount),
            updated_balance,
        },
    )?;
    cibil::refresh(&tx, account_id)?;
    tx.commit()?;
    tracing::info!(account_id, %amount, balance = %entry.updated_balance, "deposit posted");
    Ok(entry)
}

pub fn withdraw(
    conn: &mut Connection,
    limits: &DailyLimits,
    account_id: i64,
    amount: Decimal,
    pin: &str,
    today: NaiveDate,
) -> BankResult<Transaction> {
    ensure_positive(amount)?;
    let tx = conn.transaction()?;
    let account = open_for_customer(&tx, account_id, pin)?;
    ensure_funds(&account, amount)?;
    ensure_within_limit(&tx, limits, &account, amount, today)?;

    let entry = post_entry(
        &tx,
        NewEntry {
            account_id,
            date: today,
            kind: TransactionType::Withdrawal,
            description: "Self Withdrawal",
            debit: Some(amount),
            credit: None,
            updated_balance: account.balance - amount,
        },
    )?;
    cibil::refresh(&tx, account_id)?;
    tx.commit()?;
    tracing::info!(account_id, %amount, balance = %entry.updated_balance, "withdrawal posted");
    Ok(entry)
}

/// Sends money to a beneficiary registered on the debited account. The
/// beneficiary sits outside the bank, so only the debit side is booked.
pub fn transfer(
    conn: &mut Connection,
    limits: &DailyLimits,
    account_id: i64,
    beneficiary_id: i64,
    amount: Decimal,
    pin: &str,
    today: NaiveDate,
) -> BankResult<Transaction> {
    ensure_positive(amount)?;
    let tx = conn.transaction()?;
    let account = open_for_customer(&tx, account_id, pin)?;
    ensure_funds(&account, amount)?;

    let beneficiary = tx
        .query_row(
            "SELECT id, account_id, account_name, account_number, branch_id FROM beneficiaries WHERE id=?1 AND account_id=?2",
            params![beneficiary_id, account_id],
            beneficiary_from_row,
        )
        .optional()?
        .ok_or(BankError::BeneficiaryNotFound {
            beneficiary_id,
            account_id,
        })?;

    ensure_within_limit(&tx, limits, &account, amount, today)?;

    let description = format!(
        "Transfer to Beneficiary Account: {}",
        beneficiary.account_number
    );
    let entry = post_entry(
        &tx,
        NewEntry {
            account_id,
            date: today,
            kind: TransactionType::Transfer,
            description: &description,
            debit: Some(amount),
            credit: None,
            updated_balance: account.balance - amount,
        },
    )?;
    cibil::refresh(&tx, account_id)?;
    tx.commit()?;
    tracing::info!(
        account_id,
        beneficiary_id,
        %amount,
        balance = %entry.updated_balance,
        "transfer posted"
    );
    Ok(entry)
}

pub fn change_pin(
    conn: &Connection,
    account_id: i64,
    old_pin: &str,
    new_pin: &str,
) -> BankResult<()> {
    let account = open_for_customer(conn, account_id, old_pin)?;
    let new_pin = parse_pin(new_pin)
        .ok_or_else(|| BankError::validation("pin", "must be 4 digits between 1000 and 9999"))?;
    conn.execute(
        "UPDATE accounts SET pin=?1 WHERE id=?2",
        params![new_pin, account.id],
    )?;
    tracing::info!(account_id, "pin changed");
    Ok(())
}

#[derive(Debug, Clone)]
pub struct NewBeneficiary {
    pub account_name: String,
    pub account_number: String,
    pub branch_id: i64,
}

pub fn add_beneficiary(
    conn: &Connection,
    account_id: i64,
    new: &NewBeneficiary,
) -> BankResult<Beneficiary> {
    let account = load_account(conn, account_id)?;
    ensure_active(&account)?;

    let name = new.account_name.trim();
    let number = new.account_number.trim();
    if name.is_empty() || name.chars().count() > 50 {
        return Err(BankError::validation(
            "account_name",
            "must be 1 to 50 characters",
        ));
    }
    if number.is_empty() || number.chars().count() > 20 {
        return Err(BankError::validation(
            "account_number",
            "must be 1 to 20 characters",
        ));
    }
    branches::get(conn, new.branch_id)?;

    conn.execute(
        "INSERT INTO beneficiaries(account_id, account_name, account_number, branch_id) VALUES (?1, ?2, ?3, ?4)",
        params![account_id, name, number, new.branch_id],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(account_id, beneficiary_id = id, "beneficiary added");
    Ok(Beneficiary {
        id,
        account_id,
        account_name: name.to_string(),
        account_number: number.to_string(),
        branch_id: new.branch_id,
    })
}

pub fn beneficiaries(conn: &Connection, account_id: i64) -> BankResult<Vec<Beneficiary>> {
    let mut stmt = conn.prepare(
        "SELECT id, account_id, account_name, account_number, branch_id FROM beneficiaries WHERE account_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![account_id], beneficiary_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountDetails {
    pub account: Account,
    pub customer: Customer,
    pub transactions: Vec<Transaction>,
    pub loans: Vec<Loan>,
}

pub fn details(conn: &Connection, account_id: i64) -> BankResult<AccountDetails> {
    let account = load_account(conn, account_id)?;
    ensure_not_closed(&account)?;
    let customer = customers::get(conn, account.customer_id)?;
    let transactions = transactions_for_account(conn, account_id, None, None)?;
    let loans = loans_for_account(conn, account_id)?;
    Ok(AccountDetails {
        account,
        customer,
        transactions,
        loans,
    })
}

/// Customer-facing statement: only open, Active accounts may be queried.
pub fn statement(
    conn: &Connection,
    account_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> BankResult<Vec<Transaction>> {
    let account = load_account(conn, account_id)?;
    ensure_active(&account)?;
    transactions_for_account(conn, account_id, from, to)
}

/// Back-office view of an account's ledger with no status gate.
pub fn transactions_for_account(
    conn: &Connection,
    account_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> BankResult<Vec<Transaction>> {
    let sql = format!(
        "SELECT {} FROM transactions
         WHERE account_id=?1 AND (?2 IS NULL OR date>=?2) AND (?3 IS NULL OR date<=?3)
         ORDER BY date, id",
        TRANSACTION_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![account_id, from, to], transaction_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
