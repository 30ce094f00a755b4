// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::path::PathBuf;

use bankdesk::config::{self, Config, ConfigError};
use bankdesk::ledger::limits::DailyLimits;
use rust_decimal::Decimal;

fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = load(&[]).unwrap();
    assert_eq!(cfg.db_path, None);
    assert_eq!(cfg.log_filter, "bankdesk=info");
    assert_eq!(cfg.limits, DailyLimits::default());
    assert_eq!(cfg.limits.savings, Decimal::from(100_000));
    assert_eq!(cfg.limits.salary, Decimal::from(300_000));
    assert_eq!(cfg.limits.business, Decimal::from(100_000_000));
    assert_eq!(cfg.notify_sender, "Bank of Hogwarts");
}

#[test]
fn environment_overrides_apply() {
    let cfg = load(&[
        (config::ENV_DB, "/tmp/bank.sqlite"),
        (config::ENV_LOG, "bankdesk=debug"),
        (config::ENV_SALARY_LIMIT, " 5000.50 "),
        (config::ENV_NOTIFY_SENDER, "Gringotts"),
    ])
    .unwrap();
    assert_eq!(cfg.db_path, Some(PathBuf::from("/tmp/bank.sqlite")));
    assert_eq!(cfg.log_filter, "bankdesk=debug");
    assert_eq!(cfg.limits.salary, "5000.50".parse::<Decimal>().unwrap());
    assert_eq!(cfg.limits.savings, Decimal::from(100_000));
    assert_eq!(cfg.notify_sender, "Gringotts");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let cfg = load(&[(config::ENV_LOG, "  "), (config::ENV_DB, "")]).unwrap();
    assert_eq!(cfg.log_filter, "bankdesk=info");
    assert_eq!(cfg.db_path, None);
}

#[test]
fn malformed_limits_are_errors() {
    for bad in ["lots", "0", "-10"] {
        let err = load(&[(config::ENV_BUSINESS_LIMIT, bad)]).unwrap_err();
        let ConfigError::InvalidValue { key, .. } = err;
        assert_eq!(key, config::ENV_BUSINESS_LIMIT);
    }
}
