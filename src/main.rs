// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use bankdesk::commands::{self, AppContext};
use bankdesk::config::Config;
use bankdesk::notify::TracingNotifier;
use bankdesk::{cli, db, telemetry, utils};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    telemetry::init(&config.log_filter);

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init(&config)?;
    let notifier = TracingNotifier::new(config.notify_sender.clone());
    let ctx = AppContext {
        config: &config,
        notifier: &notifier,
        today: utils::today(),
    };

    let outcome = match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&config)?.display());
            Ok(())
        }
        Some(("customer", sub)) => commands::customers::handle(&ctx, &conn, sub),
        Some(("account", sub)) => commands::accounts::handle(&ctx, &mut conn, sub),
        Some(("employee", sub)) => commands::employees::handle(&ctx, &conn, sub),
        Some(("admin", sub)) => commands::employees::handle_admin(&ctx, &conn, sub),
        Some(("branch", sub)) => commands::reference::handle_branch(&conn, sub),
        Some(("account-type", sub)) => commands::reference::handle_account_type(&conn, sub),
        Some(("loan-option", sub)) => commands::reference::handle_loan_option(&conn, sub),
        Some(("loan", sub)) => commands::loans::handle(&ctx, &mut conn, sub),
        Some(("report", sub)) => commands::reports::handle(&ctx, &conn, sub),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        match e.downcast_ref::<bankdesk::BankError>() {
            Some(bank) if bank.is_client_error() => {
                tracing::warn!(status = bank.status_code(), error = %bank, "request rejected")
            }
            _ => tracing::error!(error = %e, "command failed"),
        }
    }
    outcome
}
