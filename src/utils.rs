// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::types::Type;
use rusqlite::{Connection, Params, Row};
use rust_decimal::Decimal;

use crate::error::{BankError, BankResult};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// A PIN is exactly four ASCII digits in 1000..=9999.
pub fn parse_pin(s: &str) -> Option<u16> {
    let s = s.trim();
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u16>().ok().filter(|p| (1000..=9999).contains(p))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(|x| x.to_string()).unwrap_or_default()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}

/// Reads a decimal stored as TEXT, surfacing bad text as a conversion error.
pub fn decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(idx)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub fn opt_decimal_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.trim()
            .parse::<Decimal>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Sums a single decimal TEXT column. SQLite's SUM would go through floats.
pub fn sum_decimals<P: Params>(conn: &Connection, sql: &str, params: P) -> BankResult<Decimal> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut total = Decimal::ZERO;
    while let Some(r) = rows.next()? {
        let raw: Option<String> = r.get(0)?;
        if let Some(s) = raw {
            let value = s
                .trim()
                .parse::<Decimal>()
                .map_err(|_| BankError::CorruptData(format!("amount '{}'", s)))?;
            total = add_amounts(total, value)?;
        }
    }
    Ok(total)
}

/// Overflow-checked running total for aggregates over stored amounts.
pub fn add_amounts(total: Decimal, value: Decimal) -> BankResult<Decimal> {
    total
        .checked_add(value)
        .ok_or_else(|| BankError::CorruptData(format!("total overflows at {} + {}", total, value)))
}

pub fn count<P: Params>(conn: &Connection, sql: &str, params: P) -> BankResult<i64> {
    Ok(conn.query_row(sql, params, |r| r.get(0))?)
}
