// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Loan lifecycle.
//!
//! A loan carries two parallel status axes plus a final status:
//!
//! - application: `UnderReview -> Approved | Rejected` (employee review)
//! - loan: `Pending -> Disbursed | Rejected` (disbursement decision)
//! - final: unset until disbursed (`Active`) or finished (`Closed`)
//!
//! Closing only touches the final status; the other two axes keep whatever
//! they held when the loan was closed.

use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};

use super::{
    LOAN_COLUMNS, NewEntry, cibil, credited, ensure_active, load_account, load_loan,
    loan_from_row, post_entry,
};
use crate::error::{BankError, BankResult};
use crate::models::{
    Loan, LoanApplicationStatus, LoanFinalStatus, LoanHistoryEntry, LoanStatus, TransactionType,
};
use crate::records::{employees, loan_options};
use crate::utils::decimal_at;

const MAX_PURPOSE_CHARS: usize = 250;

pub fn apply(
    conn: &Connection,
    account_id: i64,
    loan_option_id: i64,
    purpose: &str,
    today: NaiveDate,
) -> BankResult<Loan> {
    let account = load_account(conn, account_id)?;
    ensure_active(&account)?;
    loan_options::get(conn, loan_option_id)?;

    let purpose = purpose.trim();
    if purpose.is_empty() || purpose.chars().count() > MAX_PURPOSE_CHARS {
        return Err(BankError::validation(
            "purpose",
            format!("must be 1 to {} characters", MAX_PURPOSE_CHARS),
        ));
    }

    conn.execute(
        "INSERT INTO loans(account_id, loan_option_id, purpose, application_date, application_status, loan_status, remarks)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            account_id,
            loan_option_id,
            purpose,
            today,
            LoanApplicationStatus::UnderReview,
            LoanStatus::Pending,
            "Application received",
        ],
    )?;
    let loan_id = conn.last_insert_rowid();
    tracing::info!(account_id, loan_id, loan_option_id, "loan application received");
    load_loan(conn, loan_id)
}

/// Employee decision on an application that is still under review.
pub fn review(
    conn: &Connection,
    loan_id: i64,
    approved: bool,
    employee_id: i64,
    remarks: Option<&str>,
    today: NaiveDate,
) -> BankResult<Loan> {
    let loan = load_loan(conn, loan_id)?;
    employees::get(conn, employee_id)?;
    if loan.application_status != LoanApplicationStatus::UnderReview {
        return Err(BankError::LoanNotUnderReview {
            loan_id,
            status: loan.application_status,
        });
    }

    let remarks = remarks.map(str::trim).filter(|r| !r.is_empty());
    if approved {
        conn.execute(
            "UPDATE loans SET application_status=?1, approved_date=?2, employee_id=?3, remarks=COALESCE(?4, remarks) WHERE id=?5",
            params![LoanApplicationStatus::Approved, today, employee_id, remarks, loan_id],
        )?;
        tracing::info!(loan_id, employee_id, "loan application approved");
    } else {
        conn.execute(
            "UPDATE loans SET application_status=?1, loan_status=?2, final_status=?3, employee_id=?4, remarks=COALESCE(?5, remarks) WHERE id=?6",
            params![
                LoanApplicationStatus::Rejected,
                LoanStatus::Rejected,
                LoanFinalStatus::Closed,
                employee_id,
                remarks,
                loan_id
            ],
        )?;
        tracing::info!(loan_id, employee_id, "loan application rejected");
    }
    load_loan(conn, loan_id)
}

#[derive(Debug, Clone)]
pub struct Disbursement {
    pub loan: Loan,
    /// Present when money moved.
    pub entry: Option<crate::models::Transaction>,
}

/// Pays an approved loan into its account, or rejects it at the last step.
pub fn disburse(
    conn: &mut Connection,
    loan_id: i64,
    approved: bool,
    today: NaiveDate,
) -> BankResult<Disbursement> {
    let tx = conn.transaction()?;
    let loan = load_loan(&tx, loan_id)?;
    let account = load_account(&tx, loan.account_id)?;

    if loan.application_status != LoanApplicationStatus::Approved {
        tracing::warn!(loan_id, status = %loan.application_status, "disbursement refused");
        return Err(BankError::LoanNotApproved {
            loan_id,
            status: loan.application_status,
        });
    }
    if loan.loan_status != LoanStatus::Pending {
        return Err(BankError::LoanNotPending {
            loan_id,
            status: loan.loan_status,
        });
    }

    let entry = if approved {
        ensure_active(&account)?;
        let option = loan_options::get(&tx, loan.loan_option_id)?;
        let updated_balance = credited(&account, option.amount)?;
        let entry = post_entry(
            &tx,
            NewEntry {
                account_id: account.id,
                date: today,
                kind: TransactionType::Loan,
                description: "Loan disbursed",
                debit: None,
                credit: Some(option.amount),
                updated_balance,
            },
        )?;
        tx.execute(
            "UPDATE loans SET loan_status=?1, final_status=?2, disbursement_date=?3 WHERE id=?4",
            params![LoanStatus::Disbursed, LoanFinalStatus::Active, today, loan_id],
        )?;
        cibil::refresh(&tx, account.id)?;
        tracing::info!(loan_id, account_id = account.id, amount = %option.amount, "loan disbursed");
        Some(entry)
    } else {
        tx.execute(
            "UPDATE loans SET application_status=?1, loan_status=?2, final_status=?3 WHERE id=?4",
            params![
                LoanApplicationStatus::Rejected,
                LoanStatus::Rejected,
                LoanFinalStatus::Closed,
                loan_id
            ],
        )?;
        tracing::info!(loan_id, "loan rejected at disbursement");
        None
    };

    let loan = load_loan(&tx, loan_id)?;
    tx.commit()?;
    Ok(Disbursement { loan, entry })
}

pub fn close(conn: &Connection, loan_id: i64, today: NaiveDate) -> BankResult<Loan> {
    let loan = load_loan(conn, loan_id)?;
    if loan.is_closed() {
        return Err(BankError::LoanAlreadyClosed(loan_id));
    }
    conn.execute(
        "UPDATE loans SET final_status=?1, closed_date=?2 WHERE id=?3",
        params![LoanFinalStatus::Closed, today, loan_id],
    )?;
    tracing::info!(loan_id, "loan closed");
    load_loan(conn, loan_id)
}

pub fn get(conn: &Connection, loan_id: i64) -> BankResult<Loan> {
    load_loan(conn, loan_id)
}

const HISTORY_SQL: &str = "SELECT l.id, l.account_id, o.loan_type, o.amount, o.interest_rate, o.tenure_months, l.purpose, l.application_date, l.application_status, l.approved_date, l.loan_status, l.disbursement_date, l.final_status, l.closed_date, l.remarks
     FROM loans l JOIN loan_options o ON o.id=l.loan_option_id";

fn history_from_row(r: &Row<'_>) -> rusqlite::Result<LoanHistoryEntry> {
    Ok(LoanHistoryEntry {
        loan_id: r.get(0)?,
        account_id: r.get(1)?,
        loan_type: r.get(2)?,
        loan_amount: decimal_at(r, 3)?,
        interest_rate: decimal_at(r, 4)?,
        tenure_months: r.get(5)?,
        purpose: r.get(6)?,
        application_date: r.get(7)?,
        application_status: r.get(8)?,
        approved_date: r.get(9)?,
        loan_status: r.get(10)?,
        disbursement_date: r.get(11)?,
        final_status: r.get(12)?,
        closed_date: r.get(13)?,
        remarks: r.get(14)?,
    })
}

/// Loan history for a customer's own, open and Active account.
pub fn history(conn: &Connection, account_id: i64) -> BankResult<Vec<LoanHistoryEntry>> {
    let account = load_account(conn, account_id)?;
    ensure_active(&account)?;
    let sql = format!("{} WHERE l.account_id=?1 ORDER BY l.id", HISTORY_SQL);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![account_id], history_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn all(conn: &Connection) -> BankResult<Vec<LoanHistoryEntry>> {
    let sql = format!("{} ORDER BY l.id", HISTORY_SQL);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], history_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn for_customer(conn: &Connection, customer_id: i64) -> BankResult<Vec<Loan>> {
    let sql = format!(
        "SELECT {} FROM loans WHERE account_id IN (SELECT id FROM accounts WHERE customer_id=?1) ORDER BY id",
        LOAN_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![customer_id], loan_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
