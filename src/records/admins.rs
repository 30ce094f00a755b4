// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, params};

use super::{email, required};
use crate::error::{BankResult, map_constraint};
use crate::models::Admin;

pub fn add(conn: &Connection, name: &str, email_addr: &str, today: NaiveDate) -> BankResult<Admin> {
    let name = required("name", name, 30)?;
    let email_addr = email(email_addr)?;
    conn.execute(
        "INSERT INTO admins(name, email, created_at) VALUES (?1, ?2, ?3)",
        params![name, email_addr, today],
    )
    .map_err(|e| map_constraint(e, "admin email"))?;
    let id = conn.last_insert_rowid();
    tracing::info!(admin_id = id, "admin added");
    Ok(Admin {
        id,
        name,
        email: email_addr,
        created_at: today,
    })
}

pub fn list(conn: &Connection) -> BankResult<Vec<Admin>> {
    let mut stmt = conn.prepare("SELECT id, name, email, created_at FROM admins ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(Admin {
            id: r.get(0)?,
            name: r.get(1)?,
            email: r.get(2)?,
            created_at: r.get(3)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}
