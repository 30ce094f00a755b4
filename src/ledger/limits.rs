// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BankError, BankResult};

/// Per-day cap on debits (withdrawals and transfers), keyed by account type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLimits {
    pub savings: Decimal,
    pub salary: Decimal,
    pub business: Decimal,
}

impl Default for DailyLimits {
    fn default() -> Self {
        Self {
            savings: Decimal::from(100_000),
            salary: Decimal::from(300_000),
            business: Decimal::from(100_000_000),
        }
    }
}

impl DailyLimits {
    pub fn for_account_type(&self, type_name: &str) -> BankResult<Decimal> {
        match type_name.trim().to_ascii_lowercase().as_str() {
            "savings" => Ok(self.savings),
            "salary" => Ok(self.salary),
            "business" => Ok(self.business),
            _ => Err(BankError::UnknownAccountType(type_name.to_string())),
        }
    }

    /// Rejects `requested` when it would push today's debits past `limit`.
    pub fn check(limit: Decimal, used_today: Decimal, requested: Decimal) -> BankResult<()> {
        match used_today.checked_add(requested) {
            Some(total) if total <= limit => Ok(()),
            _ => Err(BankError::DailyLimitExceeded {
                limit,
                used: used_today,
                requested,
            }),
        }
    }
}
