// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Synthetic creditworthiness score derived from an account's lifetime flows.
//!
//! Each recalculation adds 0.05% of everything ever credited and subtracts
//! 0.1% of everything ever debited, then clamps into `[MIN_SCORE, MAX_SCORE]`.
//! The lifetime totals are applied on top of the previous score every time, so
//! the score drifts with activity rather than converging.

use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::BankResult;
use crate::utils::sum_decimals;

pub const MIN_SCORE: i64 = 300;
pub const MAX_SCORE: i64 = 10_000;

fn inbound_weight() -> Decimal {
    Decimal::new(5, 4)
}

fn outbound_weight() -> Decimal {
    Decimal::new(1, 3)
}

pub fn recalculate(current: i64, lifetime_inbound: Decimal, lifetime_outbound: Decimal) -> i64 {
    let raw = Decimal::from(current) + lifetime_inbound * inbound_weight()
        - lifetime_outbound * outbound_weight();
    let clamped = raw.clamp(Decimal::from(MIN_SCORE), Decimal::from(MAX_SCORE));
    clamped.trunc().to_i64().unwrap_or(MIN_SCORE)
}

/// Recomputes and stores the score for `account_id`, returning the new value.
pub fn refresh(conn: &Connection, account_id: i64) -> BankResult<i64> {
    let current: i64 = conn.query_row(
        "SELECT cibil_score FROM accounts WHERE id=?1",
        params![account_id],
        |r| r.get(0),
    )?;
    let inbound = sum_decimals(
        conn,
        "SELECT credit FROM transactions WHERE account_id=?1 AND credit IS NOT NULL",
        params![account_id],
    )?;
    let outbound = sum_decimals(
        conn,
        "SELECT debit FROM transactions WHERE account_id=?1 AND debit IS NOT NULL",
        params![account_id],
    )?;
    let score = recalculate(current, inbound, outbound);
    conn.execute(
        "UPDATE accounts SET cibil_score=?1 WHERE id=?2",
        params![score, account_id],
    )?;
    tracing::debug!(account_id, previous = current, score, "cibil score recalculated");
    Ok(score)
}
