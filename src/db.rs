// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Bankdesk", "bankdesk"));

pub fn db_path(config: &Config) -> Result<PathBuf> {
    if let Some(path) = &config.db_path {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        return Ok(path.clone());
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("bankdesk.sqlite"))
}

pub fn open_or_init(config: &Config) -> Result<Connection> {
    let path = db_path(config)?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

/// Creates every table if missing and seeds the account types the daily
/// limits are keyed on.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS admins(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (date('now'))
    );

    CREATE TABLE IF NOT EXISTS customers(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        middle_name TEXT,
        last_name TEXT NOT NULL,
        gender TEXT NOT NULL,
        contact_number TEXT NOT NULL UNIQUE,
        address TEXT NOT NULL,
        date_of_birth TEXT NOT NULL,
        aadhar_number TEXT NOT NULL UNIQUE,
        pan TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL DEFAULT 'Active',
        created_at TEXT NOT NULL DEFAULT (date('now'))
    );

    CREATE TABLE IF NOT EXISTS employees(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone_number TEXT NOT NULL UNIQUE,
        position TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'Active',
        created_at TEXT NOT NULL DEFAULT (date('now'))
    );

    CREATE TABLE IF NOT EXISTS branches(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        bank_name TEXT NOT NULL,
        contact_number TEXT NOT NULL,
        ifsc_code TEXT NOT NULL UNIQUE,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        postal_code TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS account_types(
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    );
    INSERT OR IGNORE INTO account_types(id, name) VALUES (1, 'Savings'), (2, 'Salary'), (3, 'Business');

    CREATE TABLE IF NOT EXISTS accounts(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_number TEXT NOT NULL UNIQUE,
        pin INTEGER NOT NULL CHECK(pin BETWEEN 1000 AND 9999),
        customer_id INTEGER NOT NULL,
        account_type_id INTEGER NOT NULL,
        branch_id INTEGER NOT NULL,
        balance TEXT NOT NULL DEFAULT '0' CHECK(CAST(balance AS REAL) >= 0),
        cibil_score INTEGER NOT NULL DEFAULT 0,
        status TEXT NOT NULL DEFAULT 'PendingApproval',
        created_at TEXT NOT NULL DEFAULT (date('now')),
        FOREIGN KEY(customer_id) REFERENCES customers(id) ON DELETE CASCADE,
        FOREIGN KEY(account_type_id) REFERENCES account_types(id) ON DELETE RESTRICT,
        FOREIGN KEY(branch_id) REFERENCES branches(id) ON DELETE RESTRICT
    );

    CREATE TABLE IF NOT EXISTS beneficiaries(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        account_name TEXT NOT NULL,
        account_number TEXT NOT NULL,
        branch_id INTEGER NOT NULL,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE,
        FOREIGN KEY(branch_id) REFERENCES branches(id) ON DELETE RESTRICT
    );

    -- append-only ledger; amounts stored as decimal TEXT
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('Deposit','Withdrawal','Transfer','Loan')),
        description TEXT NOT NULL,
        debit TEXT,
        credit TEXT,
        updated_balance TEXT NOT NULL,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE RESTRICT
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_account_date ON transactions(account_id, date);

    CREATE TABLE IF NOT EXISTS loan_options(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        loan_type TEXT NOT NULL,
        amount TEXT NOT NULL,
        interest_rate TEXT NOT NULL,
        tenure_months INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS loans(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        account_id INTEGER NOT NULL,
        loan_option_id INTEGER NOT NULL,
        employee_id INTEGER,
        purpose TEXT NOT NULL,
        application_date TEXT NOT NULL,
        application_status TEXT NOT NULL,
        loan_status TEXT NOT NULL,
        final_status TEXT,
        remarks TEXT,
        approved_date TEXT,
        disbursement_date TEXT,
        closed_date TEXT,
        FOREIGN KEY(account_id) REFERENCES accounts(id) ON DELETE CASCADE,
        FOREIGN KEY(loan_option_id) REFERENCES loan_options(id) ON DELETE RESTRICT,
        FOREIGN KEY(employee_id) REFERENCES employees(id) ON DELETE SET NULL
    );
    CREATE INDEX IF NOT EXISTS idx_loans_account ON loans(account_id);
    "#,
    )?;
    Ok(())
}
