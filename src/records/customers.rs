// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{digits, email, matching, required};
use crate::error::{BankError, BankResult, map_constraint};
use crate::models::{Customer, CustomerStatus};

const COLUMNS: &str = "id, first_name, middle_name, last_name, gender, contact_number, address, date_of_birth, aadhar_number, pan, email, status, created_at";

const NAME_MAX: usize = 40;
const GENDERS: &[&str] = &["Male", "Female", "Other"];

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: String,
    pub contact_number: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
    pub aadhar_number: String,
    pub pan: String,
    pub email: String,
}

/// Fields a customer may change after onboarding. `None` leaves the value as is.
#[derive(Debug, Clone, Default)]
pub struct CustomerUpdate {
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
}

fn from_row(r: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: r.get(0)?,
        first_name: r.get(1)?,
        middle_name: r.get(2)?,
        last_name: r.get(3)?,
        gender: r.get(4)?,
        contact_number: r.get(5)?,
        address: r.get(6)?,
        date_of_birth: r.get(7)?,
        aadhar_number: r.get(8)?,
        pan: r.get(9)?,
        email: r.get(10)?,
        status: r.get(11)?,
        created_at: r.get(12)?,
    })
}

fn gender(value: &str) -> BankResult<String> {
    GENDERS
        .iter()
        .find(|g| g.eq_ignore_ascii_case(value.trim()))
        .map(|g| g.to_string())
        .ok_or_else(|| BankError::validation("gender", "expected Male, Female or Other"))
}

pub fn create(conn: &Connection, new: &NewCustomer, today: NaiveDate) -> BankResult<Customer> {
    if new.date_of_birth >= today {
        return Err(BankError::validation("date_of_birth", "must be in the past"));
    }
    let middle_name = match new.middle_name.as_deref().map(str::trim) {
        Some(m) if !m.is_empty() => Some(required("middle_name", m, NAME_MAX)?),
        _ => None,
    };
    let customer = Customer {
        id: 0,
        first_name: required("first_name", &new.first_name, NAME_MAX)?,
        middle_name,
        last_name: required("last_name", &new.last_name, NAME_MAX)?,
        gender: gender(&new.gender)?,
        contact_number: digits("contact_number", &new.contact_number, 10)?,
        address: required("address", &new.address, 200)?,
        date_of_birth: new.date_of_birth,
        aadhar_number: digits("aadhar_number", &new.aadhar_number, 12)?,
        pan: matching(
            "pan",
            &new.pan.to_uppercase(),
            r"^[A-Z]{5}[0-9]{4}[A-Z]$",
            "five letters, four digits and a letter",
        )?,
        email: email(&new.email)?,
        status: CustomerStatus::Active,
        created_at: today,
    };

    conn.execute(
        "INSERT INTO customers(first_name, middle_name, last_name, gender, contact_number, address, date_of_birth, aadhar_number, pan, email, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            customer.first_name,
            customer.middle_name,
            customer.last_name,
            customer.gender,
            customer.contact_number,
            customer.address,
            customer.date_of_birth,
            customer.aadhar_number,
            customer.pan,
            customer.email,
            customer.status,
            customer.created_at,
        ],
    )
    .map_err(|e| map_constraint(e, "customer contact, Aadhar, PAN or email"))?;
    let id = conn.last_insert_rowid();
    tracing::info!(customer_id = id, "customer created");
    Ok(Customer { id, ..customer })
}

pub fn get(conn: &Connection, id: i64) -> BankResult<Customer> {
    let sql = format!("SELECT {} FROM customers WHERE id=?1", COLUMNS);
    conn.query_row(&sql, params![id], from_row)
        .optional()?
        .ok_or(BankError::CustomerNotFound(id))
}

pub fn list(conn: &Connection, status: Option<CustomerStatus>) -> BankResult<Vec<Customer>> {
    let sql = format!(
        "SELECT {} FROM customers WHERE (?1 IS NULL OR status=?1) ORDER BY id",
        COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![status], from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn update(conn: &Connection, id: i64, changes: &CustomerUpdate) -> BankResult<Customer> {
    get(conn, id)?;
    let contact = changes
        .contact_number
        .as_deref()
        .map(|c| digits("contact_number", c, 10))
        .transpose()?;
    let address = changes
        .address
        .as_deref()
        .map(|a| required("address", a, 200))
        .transpose()?;
    let email_addr = changes.email.as_deref().map(email).transpose()?;

    conn.execute(
        "UPDATE customers SET contact_number=COALESCE(?1, contact_number), address=COALESCE(?2, address), email=COALESCE(?3, email) WHERE id=?4",
        params![contact, address, email_addr, id],
    )
    .map_err(|e| map_constraint(e, "customer contact or email"))?;
    tracing::info!(customer_id = id, "customer updated");
    get(conn, id)
}

pub fn deactivate(conn: &Connection, id: i64) -> BankResult<Customer> {
    let customer = get(conn, id)?;
    if customer.status == CustomerStatus::Inactive {
        return Err(BankError::Conflict(format!(
            "customer {} is already inactive",
            id
        )));
    }
    conn.execute(
        "UPDATE customers SET status=?1 WHERE id=?2",
        params![CustomerStatus::Inactive, id],
    )?;
    tracing::info!(customer_id = id, "customer deactivated");
    get(conn, id)
}
