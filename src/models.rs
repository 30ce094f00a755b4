// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

// Enums are persisted as their variant name in TEXT columns.
macro_rules! text_enum {
    ($name:ident, $kind:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $(
                    if s.eq_ignore_ascii_case($text) {
                        return Ok($name::$variant);
                    }
                )+
                Err(ParseEnumError {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
    PendingApproval,
    OnHold,
    Closed,
}

text_enum!(AccountStatus, "account status" {
    Active => "Active",
    Inactive => "Inactive",
    PendingApproval => "PendingApproval",
    OnHold => "OnHold",
    Closed => "Closed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Loan,
}

text_enum!(TransactionType, "transaction type" {
    Deposit => "Deposit",
    Withdrawal => "Withdrawal",
    Transfer => "Transfer",
    Loan => "Loan",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanApplicationStatus {
    UnderReview,
    Approved,
    Rejected,
}

text_enum!(LoanApplicationStatus, "loan application status" {
    UnderReview => "UnderReview",
    Approved => "Approved",
    Rejected => "Rejected",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanStatus {
    Pending,
    Disbursed,
    Rejected,
}

text_enum!(LoanStatus, "loan status" {
    Pending => "Pending",
    Disbursed => "Disbursed",
    Rejected => "Rejected",
});

/// Set once money has moved (Active) or the loan is finished (Closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanFinalStatus {
    Active,
    Closed,
}

text_enum!(LoanFinalStatus, "loan final status" {
    Active => "Active",
    Closed => "Closed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoanType {
    Home,
    Personal,
    Business,
    Education,
    Car,
}

text_enum!(LoanType, "loan type" {
    Home => "Home",
    Personal => "Personal",
    Business => "Business",
    Education => "Education",
    Car => "Car",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeePosition {
    AssistantManager,
    SeniorOfficer,
    JuniorOfficer,
    Teller,
    CustomerServiceRepresentative,
    LoanOfficer,
}

text_enum!(EmployeePosition, "employee position" {
    AssistantManager => "AssistantManager",
    SeniorOfficer => "SeniorOfficer",
    JuniorOfficer => "JuniorOfficer",
    Teller => "Teller",
    CustomerServiceRepresentative => "CustomerServiceRepresentative",
    LoanOfficer => "LoanOfficer",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    Closed,
}

text_enum!(EmployeeStatus, "employee status" {
    Active => "Active",
    Closed => "Closed",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
    Active,
    Inactive,
}

text_enum!(CustomerStatus, "customer status" {
    Active => "Active",
    Inactive => "Inactive",
});

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub account_number: String,
    #[serde(skip_serializing)]
    pub pin: u16,
    pub customer_id: i64,
    pub account_type_id: i64,
    pub branch_id: i64,
    pub balance: Decimal,
    pub cibil_score: i64,
    pub status: AccountStatus,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub date: NaiveDate,
    pub kind: TransactionType,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub updated_balance: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub account_id: i64,
    pub loan_option_id: i64,
    pub employee_id: Option<i64>,
    pub purpose: String,
    pub application_date: NaiveDate,
    pub application_status: LoanApplicationStatus,
    pub loan_status: LoanStatus,
    pub final_status: Option<LoanFinalStatus>,
    pub remarks: Option<String>,
    pub approved_date: Option<NaiveDate>,
    pub disbursement_date: Option<NaiveDate>,
    pub closed_date: Option<NaiveDate>,
}

impl Loan {
    pub fn is_closed(&self) -> bool {
        self.final_status == Some(LoanFinalStatus::Closed)
    }
}

/// A loan joined with the option it was drawn from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanHistoryEntry {
    pub loan_id: i64,
    pub account_id: i64,
    pub loan_type: LoanType,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    pub tenure_months: u32,
    pub purpose: String,
    pub application_date: NaiveDate,
    pub application_status: LoanApplicationStatus,
    pub approved_date: Option<NaiveDate>,
    pub loan_status: LoanStatus,
    pub disbursement_date: Option<NaiveDate>,
    pub final_status: Option<LoanFinalStatus>,
    pub closed_date: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: i64,
    pub account_id: i64,
    pub account_name: String,
    pub account_number: String,
    pub branch_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
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
    pub status: CustomerStatus,
    pub created_at: NaiveDate,
}

impl Customer {
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(m) if !m.is_empty() => format!("{} {} {}", self.first_name, m, self.last_name),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub position: EmployeePosition,
    pub status: EmployeeStatus,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub bank_name: String,
    pub contact_number: String,
    pub ifsc_code: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanOption {
    pub id: i64,
    pub loan_type: LoanType,
    pub amount: Decimal,
    pub interest_rate: Decimal,
    pub tenure_months: u32,
}
