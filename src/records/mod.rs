// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Master data: the people, places and products the ledger refers to.

pub mod account_types;
pub mod admins;
pub mod branches;
pub mod customers;
pub mod employees;
pub mod loan_options;

use regex::Regex;

use crate::error::{BankError, BankResult};

pub(crate) const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Trims `value` and requires 1..=`max` characters.
pub(crate) fn required(field: &'static str, value: &str, max: usize) -> BankResult<String> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > max {
        return Err(BankError::validation(
            field,
            format!("must be 1 to {} characters", max),
        ));
    }
    Ok(value.to_string())
}

pub(crate) fn matching(
    field: &'static str,
    value: &str,
    pattern: &str,
    expected: &str,
) -> BankResult<String> {
    let value = value.trim();
    let re = Regex::new(pattern).map_err(|e| BankError::validation(field, e.to_string()))?;
    if !re.is_match(value) {
        return Err(BankError::validation(field, format!("expected {}", expected)));
    }
    Ok(value.to_string())
}

pub(crate) fn email(value: &str) -> BankResult<String> {
    let value = matching("email", value, EMAIL_PATTERN, "an email address")?;
    Ok(value.to_lowercase())
}

pub(crate) fn digits(field: &'static str, value: &str, len: usize) -> BankResult<String> {
    matching(
        field,
        value,
        &format!("^[0-9]{{{}}}$", len),
        &format!("{} digits", len),
    )
}
