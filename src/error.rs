// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AccountStatus, LoanApplicationStatus, LoanStatus};

/// Every rule violation raised by the ledger and record stores.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("Account {0} not found")]
    AccountNotFound(i64),

    #[error("Customer {0} not found")]
    CustomerNotFound(i64),

    #[error("Employee {0} not found")]
    EmployeeNotFound(i64),

    #[error("Branch {0} not found")]
    BranchNotFound(i64),

    #[error("Account type {0} not found")]
    AccountTypeNotFound(i64),

    #[error("Loan {0} not found")]
    LoanNotFound(i64),

    #[error("Loan option {0} not found")]
    LoanOptionNotFound(i64),

    #[error("Beneficiary {beneficiary_id} not found for account {account_id}")]
    BeneficiaryNotFound { beneficiary_id: i64, account_id: i64 },

    #[error("Account {0} is closed")]
    AccountClosed(i64),

    #[error("Account {account_id} is {status}, not Active")]
    AccountNotActive {
        account_id: i64,
        status: AccountStatus,
    },

    #[error("Invalid PIN for account {0}")]
    InvalidPin(i64),

    #[error("Invalid amount {0}: must be greater than zero")]
    InvalidAmount(Decimal),

    #[error("Crediting {amount} would overflow the balance of account {account_id}")]
    BalanceOverflow { account_id: i64, amount: Decimal },

    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Daily transaction limit of {limit} exceeded: {used} already debited today, requested {requested}")]
    DailyLimitExceeded {
        limit: Decimal,
        used: Decimal,
        requested: Decimal,
    },

    #[error("Unknown account type '{0}'")]
    UnknownAccountType(String),

    #[error("Loan {loan_id} is not under review (application status {status})")]
    LoanNotUnderReview {
        loan_id: i64,
        status: LoanApplicationStatus,
    },

    #[error("Loan {loan_id} is not approved (application status {status})")]
    LoanNotApproved {
        loan_id: i64,
        status: LoanApplicationStatus,
    },

    #[error("Loan {loan_id} cannot be disbursed (loan status {status})")]
    LoanNotPending { loan_id: i64, status: LoanStatus },

    #[error("Loan {0} is already closed")]
    LoanAlreadyClosed(i64),

    #[error("Account {account_id} has {count} loan(s) that are not closed")]
    OutstandingLoans { account_id: i64, count: usize },

    #[error("Account {0} is inactive already")]
    AlreadyInactive(i64),

    #[error("Account {account_id} cannot move from {from} to {to}")]
    InvalidTransition {
        account_id: i64,
        from: AccountStatus,
        to: AccountStatus,
    },

    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Corrupt stored value: {0}")]
    CorruptData(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type BankResult<T> = Result<T, BankError>;

impl BankError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// HTTP-style status a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::AccountNotFound(_)
            | Self::CustomerNotFound(_)
            | Self::EmployeeNotFound(_)
            | Self::BranchNotFound(_)
            | Self::AccountTypeNotFound(_)
            | Self::LoanNotFound(_)
            | Self::LoanOptionNotFound(_)
            | Self::BeneficiaryNotFound { .. } => 404,
            Self::InvalidPin(_) => 403,
            Self::Conflict(_) => 409,
            Self::InvalidAmount(_) | Self::BalanceOverflow { .. } | Self::Validation { .. } => {
                422
            }
            Self::AccountClosed(_)
            | Self::AccountNotActive { .. }
            | Self::InsufficientBalance { .. }
            | Self::DailyLimitExceeded { .. }
            | Self::UnknownAccountType(_)
            | Self::LoanNotUnderReview { .. }
            | Self::LoanNotApproved { .. }
            | Self::LoanNotPending { .. }
            | Self::LoanAlreadyClosed(_)
            | Self::OutstandingLoans { .. }
            | Self::AlreadyInactive(_)
            | Self::InvalidTransition { .. } => 400,
            Self::CorruptData(_) | Self::Database(_) => 500,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

/// Turns SQLite unique-constraint failures into [`BankError::Conflict`].
pub(crate) fn map_constraint(err: rusqlite::Error, what: &str) -> BankError {
    match err {
        rusqlite::Error::SqliteFailure(e, msg)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            BankError::Conflict(format!(
                "{} violates a uniqueness or reference constraint ({})",
                what,
                msg.unwrap_or_default()
            ))
        }
        other => BankError::Database(other),
    }
}
