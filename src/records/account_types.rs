// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{BankError, BankResult};
use crate::models::AccountType;

pub fn list(conn: &Connection) -> BankResult<Vec<AccountType>> {
    let mut stmt = conn.prepare("SELECT id, name FROM account_types ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(AccountType {
            id: r.get(0)?,
            name: r.get(1)?,
        })
    })?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn get(conn: &Connection, id: i64) -> BankResult<AccountType> {
    conn.query_row(
        "SELECT id, name FROM account_types WHERE id=?1",
        params![id],
        |r| {
            Ok(AccountType {
                id: r.get(0)?,
                name: r.get(1)?,
            })
        },
    )
    .optional()?
    .ok_or(BankError::AccountTypeNotFound(id))
}

pub fn name_by_id(conn: &Connection, id: i64) -> BankResult<String> {
    Ok(get(conn, id)?.name)
}
