// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Runtime configuration read from `BANKDESK_*` environment variables.
//!
//! Every variable is optional; a value that is present but malformed is an
//! error rather than a silent fallback to the default.

use std::env;
use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::limits::DailyLimits;

pub const ENV_DB: &str = "BANKDESK_DB";
pub const ENV_LOG: &str = "BANKDESK_LOG";
pub const ENV_SAVINGS_LIMIT: &str = "BANKDESK_SAVINGS_LIMIT";
pub const ENV_SALARY_LIMIT: &str = "BANKDESK_SALARY_LIMIT";
pub const ENV_BUSINESS_LIMIT: &str = "BANKDESK_BUSINESS_LIMIT";
pub const ENV_NOTIFY_SENDER: &str = "BANKDESK_NOTIFY_SENDER";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit database file; `None` means the platform data dir.
    pub db_path: Option<PathBuf>,
    pub log_filter: String,
    pub limits: DailyLimits,
    pub notify_sender: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_filter: "bankdesk=info".to_string(),
            limits: DailyLimits::default(),
            notify_sender: "Bank of Hogwarts".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = get(ENV_DB) {
            cfg.db_path = Some(PathBuf::from(path));
        }
        if let Some(filter) = get(ENV_LOG) {
            cfg.log_filter = filter;
        }
        if let Some(v) = get(ENV_SAVINGS_LIMIT) {
            cfg.limits.savings = parse_limit(ENV_SAVINGS_LIMIT, &v)?;
        }
        if let Some(v) = get(ENV_SALARY_LIMIT) {
            cfg.limits.salary = parse_limit(ENV_SALARY_LIMIT, &v)?;
        }
        if let Some(v) = get(ENV_BUSINESS_LIMIT) {
            cfg.limits.business = parse_limit(ENV_BUSINESS_LIMIT, &v)?;
        }
        if let Some(sender) = get(ENV_NOTIFY_SENDER) {
            cfg.notify_sender = sender;
        }
        Ok(cfg)
    }
}

fn parse_limit(key: &'static str, raw: &str) -> Result<Decimal, ConfigError> {
    let value = raw.parse::<Decimal>().map_err(|e| ConfigError::InvalidValue {
        key,
        message: format!("'{}' is not a decimal ({})", raw, e),
    })?;
    if value <= Decimal::ZERO {
        return Err(ConfigError::InvalidValue {
            key,
            message: format!("limit must be positive, got {}", value),
        });
    }
    Ok(value)
}
