// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{digits, email, required};
use crate::error::{BankError, BankResult, map_constraint};
use crate::models::{Employee, EmployeePosition, EmployeeStatus};

const COLUMNS: &str = "id, first_name, last_name, email, phone_number, position, status, created_at";

const NAME_MAX: usize = 20;

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub position: EmployeePosition,
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeUpdate {
    pub position: Option<EmployeePosition>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

fn from_row(r: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: r.get(0)?,
        first_name: r.get(1)?,
        last_name: r.get(2)?,
        email: r.get(3)?,
        phone_number: r.get(4)?,
        position: r.get(5)?,
        status: r.get(6)?,
        created_at: r.get(7)?,
    })
}

pub fn add(conn: &Connection, new: &NewEmployee, today: NaiveDate) -> BankResult<Employee> {
    let employee = Employee {
        id: 0,
        first_name: required("first_name", &new.first_name, NAME_MAX)?,
        last_name: required("last_name", &new.last_name, NAME_MAX)?,
        email: email(&new.email)?,
        phone_number: digits("phone_number", &new.phone_number, 10)?,
        position: new.position,
        status: EmployeeStatus::Active,
        created_at: today,
    };
    conn.execute(
        "INSERT INTO employees(first_name, last_name, email, phone_number, position, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            employee.first_name,
            employee.last_name,
            employee.email,
            employee.phone_number,
            employee.position,
            employee.status,
            employee.created_at,
        ],
    )
    .map_err(|e| map_constraint(e, "employee email or phone"))?;
    let id = conn.last_insert_rowid();
    tracing::info!(employee_id = id, position = %employee.position, "employee added");
    Ok(Employee { id, ..employee })
}

pub fn get(conn: &Connection, id: i64) -> BankResult<Employee> {
    let sql = format!("SELECT {} FROM employees WHERE id=?1", COLUMNS);
    conn.query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or(BankError::EmployeeNotFound(id))
}

pub fn list(conn: &Connection) -> BankResult<Vec<Employee>> {
    let sql = format!("SELECT {} FROM employees ORDER BY id", COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(conn: &Connection, id: i64, changes: &EmployeeUpdate) -> BankResult<Employee> {
    get(conn, id)?;
    let phone = changes
        .phone_number
        .as_deref()
        .map(|p| digits("phone_number", p, 10))
        .transpose()?;
    let email_addr = changes.email.as_deref().map(email).transpose()?;
    conn.execute(
        "UPDATE employees SET position=COALESCE(?1, position), phone_number=COALESCE(?2, phone_number), email=COALESCE(?3, email) WHERE id=?4",
        params![changes.position, phone, email_addr, id],
    )
    .map_err(|e| map_constraint(e, "employee email or phone"))?;
    tracing::info!(employee_id = id, "employee updated");
    get(conn, id)
}

pub fn deactivate(conn: &Connection, id: i64) -> BankResult<Employee> {
    let employee = get(conn, id)?;
    if employee.status == EmployeeStatus::Closed {
        return Err(BankError::Conflict(format!(
            "employee {} is already closed",
            id
        )));
    }
    conn.execute(
        "UPDATE employees SET status=?1 WHERE id=?2",
        params![EmployeeStatus::Closed, id],
    )?;
    tracing::info!(employee_id = id, "employee deactivated");
    get(conn, id)
}
