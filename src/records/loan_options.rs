// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;

use crate::error::{BankError, BankResult};
use crate::models::{LoanOption, LoanType};
use crate::utils::decimal_at;

fn from_row(r: &Row<'_>) -> rusqlite::Result<LoanOption> {
    Ok(LoanOption {
        id: r.get(0)?,
        loan_type: r.get(1)?,
        amount: decimal_at(r, 2)?,
        interest_rate: decimal_at(r, 3)?,
        tenure_months: r.get(4)?,
    })
}

pub fn add(
    conn: &Connection,
    loan_type: LoanType,
    amount: Decimal,
    interest_rate: Decimal,
    tenure_months: u32,
) -> BankResult<LoanOption> {
    if amount <= Decimal::ZERO {
        return Err(BankError::InvalidAmount(amount));
    }
    if interest_rate < Decimal::ZERO || interest_rate > Decimal::ONE_HUNDRED {
        return Err(BankError::validation(
            "interest_rate",
            "must be between 0 and 100 percent",
        ));
    }
    if tenure_months == 0 {
        return Err(BankError::validation("tenure_months", "must be at least 1"));
    }
    conn.execute(
        "INSERT INTO loan_options(loan_type, amount, interest_rate, tenure_months) VALUES (?1, ?2, ?3, ?4)",
        params![
            loan_type,
            amount.to_string(),
            interest_rate.to_string(),
            tenure_months
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(loan_option_id = id, %loan_type, %amount, "loan option added");
    Ok(LoanOption {
        id,
        loan_type,
        amount,
        interest_rate,
        tenure_months,
    })
}

pub fn get(conn: &Connection, id: i64) -> BankResult<LoanOption> {
    conn.query_row(
        "SELECT id, loan_type, amount, interest_rate, tenure_months FROM loan_options WHERE id=?1",
        params![id],
        from_row,
    )
    .optional()?
    .ok_or(BankError::LoanOptionNotFound(id))
}

pub fn list(conn: &Connection) -> BankResult<Vec<LoanOption>> {
    let mut stmt = conn.prepare(
        "SELECT id, loan_type, amount, interest_rate, tenure_months FROM loan_options ORDER BY loan_type, amount",
    )?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
