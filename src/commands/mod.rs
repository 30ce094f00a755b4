// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod customers;
pub mod employees;
pub mod loans;
pub mod reference;
pub mod reports;

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::Config;
use crate::notify::Notifier;

/// What every handler needs besides the connection.
pub struct AppContext<'a> {
    pub config: &'a Config,
    pub notifier: &'a dyn Notifier,
    pub today: NaiveDate,
}

pub(crate) fn id(m: &clap::ArgMatches, name: &str) -> Result<i64> {
    m.get_one::<i64>(name)
        .copied()
        .with_context(|| format!("Missing --{}", name))
}

pub(crate) fn text<'m>(m: &'m clap::ArgMatches, name: &str) -> Result<&'m str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("Missing --{}", name))
}

pub(crate) fn opt_text<'m>(m: &'m clap::ArgMatches, name: &str) -> Option<&'m str> {
    m.get_one::<String>(name).map(String::as_str)
}

pub(crate) fn parsed<T>(m: &clap::ArgMatches, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    opt_text(m, name)
        .map(|s| s.parse::<T>().with_context(|| format!("Invalid --{} '{}'", name, s)))
        .transpose()
}

pub(crate) fn approved(m: &clap::ArgMatches) -> Result<bool> {
    Ok(text(m, "decision")? == "approve")
}
