// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{digits, matching, required};
use crate::error::{BankError, BankResult, map_constraint};
use crate::models::Branch;

const COLUMNS: &str =
    "id, name, address, bank_name, contact_number, ifsc_code, city, state, postal_code";

#[derive(Debug, Clone)]
pub struct NewBranch {
    pub name: String,
    pub address: String,
    pub bank_name: String,
    pub contact_number: String,
    pub ifsc_code: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

fn from_row(r: &Row<'_>) -> rusqlite::Result<Branch> {
    Ok(Branch {
        id: r.get(0)?,
        name: r.get(1)?,
        address: r.get(2)?,
        bank_name: r.get(3)?,
        contact_number: r.get(4)?,
        ifsc_code: r.get(5)?,
        city: r.get(6)?,
        state: r.get(7)?,
        postal_code: r.get(8)?,
    })
}

pub fn add(conn: &Connection, new: &NewBranch) -> BankResult<Branch> {
    let branch = Branch {
        id: 0,
        name: required("name", &new.name, 100)?,
        address: required("address", &new.address, 200)?,
        bank_name: required("bank_name", &new.bank_name, 100)?,
        contact_number: digits("contact_number", &new.contact_number, 10)?,
        ifsc_code: matching(
            "ifsc_code",
            &new.ifsc_code.to_uppercase(),
            r"^[A-Z0-9]{11}$",
            "11 letters or digits",
        )?,
        city: required("city", &new.city, 50)?,
        state: required("state", &new.state, 50)?,
        postal_code: digits("postal_code", &new.postal_code, 6)?,
    };
    conn.execute(
        "INSERT INTO branches(name, address, bank_name, contact_number, ifsc_code, city, state, postal_code)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            branch.name,
            branch.address,
            branch.bank_name,
            branch.contact_number,
            branch.ifsc_code,
            branch.city,
            branch.state,
            branch.postal_code
        ],
    )
    .map_err(|e| map_constraint(e, "branch IFSC code"))?;
    let id = conn.last_insert_rowid();
    tracing::info!(branch_id = id, ifsc = %branch.ifsc_code, "branch added");
    Ok(Branch { id, ..branch })
}

pub fn get(conn: &Connection, id: i64) -> BankResult<Branch> {
    let sql = format!("SELECT {} FROM branches WHERE id=?1", COLUMNS);
    conn.query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or(BankError::BranchNotFound(id))
}

pub fn list(conn: &Connection) -> BankResult<Vec<Branch>> {
    let sql = format!("SELECT {} FROM branches ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
