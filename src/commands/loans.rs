// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{AppContext, approved, id, opt_text, text};
use crate::ledger::{load_account, loans};
use crate::models::{Loan, LoanHistoryEntry};
use crate::notify::{self, Notice};
use crate::records::customers;
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, pretty_table};

pub fn handle(ctx: &AppContext<'_>, conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("apply", sub)) => {
            let loan = loans::apply(
                conn,
                id(sub, "account")?,
                id(sub, "option")?,
                text(sub, "purpose")?,
                ctx.today,
            )?;
            println!(
                "Loan application {} received for account {}",
                loan.id, loan.account_id
            );
        }
        Some(("review", sub)) => {
            let loan = loans::review(
                conn,
                id(sub, "id")?,
                approved(sub)?,
                id(sub, "employee")?,
                opt_text(sub, "remarks"),
                ctx.today,
            )?;
            println!("Loan {} application is {}", loan.id, loan.application_status);
        }
        Some(("disburse", sub)) => {
            let outcome = loans::disburse(conn, id(sub, "id")?, approved(sub)?, ctx.today)?;
            match &outcome.entry {
                Some(e) => println!(
                    "Loan {} disbursed: {} credited, balance {}",
                    outcome.loan.id,
                    fmt_money(&e.credit.unwrap_or_default()),
                    fmt_money(&e.updated_balance)
                ),
                None => println!("Loan {} rejected", outcome.loan.id),
            }
            notify_borrower(ctx, conn, &outcome.loan, |c, l| {
                notify::disbursement_notice(c, l, outcome.entry.as_ref())
            });
        }
        Some(("close", sub)) => {
            let loan = loans::close(conn, id(sub, "id")?, ctx.today)?;
            println!("Loan {} closed", loan.id);
            notify_borrower(ctx, conn, &loan, notify::loan_closed_notice);
        }
        Some(("get", sub)) => {
            let loan = loans::get(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &loan)? {
                println!("{}", loan_table(std::slice::from_ref(&loan)));
            }
        }
        Some(("history", sub)) => {
            let list = loans::history(conn, id(sub, "account")?)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", history_table(&list));
            }
        }
        Some(("list", sub)) => {
            let list = loans::all(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", history_table(&list));
            }
        }
        _ => {}
    }
    Ok(())
}

fn notify_borrower<F>(ctx: &AppContext<'_>, conn: &Connection, loan: &Loan, build: F)
where
    F: FnOnce(&crate::models::Customer, &Loan) -> Notice,
{
    let borrower = load_account(conn, loan.account_id)
        .and_then(|a| customers::get(conn, a.customer_id));
    match borrower {
        Ok(customer) => notify::notify_quietly(ctx.notifier, build(&customer, loan)),
        Err(e) => tracing::warn!(loan_id = loan.id, error = %e, "no notice sent"),
    }
}

pub(crate) fn loan_table(list: &[Loan]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|l| {
            vec![
                l.id.to_string(),
                l.account_id.to_string(),
                l.loan_option_id.to_string(),
                l.purpose.clone(),
                l.application_date.to_string(),
                l.application_status.to_string(),
                l.loan_status.to_string(),
                fmt_opt(&l.final_status),
                fmt_opt(&l.remarks),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Id", "Account", "Option", "Purpose", "Applied", "Application", "Loan", "Final",
            "Remarks",
        ],
        rows,
    )
}

fn history_table(list: &[LoanHistoryEntry]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|h| {
            vec![
                h.loan_id.to_string(),
                h.account_id.to_string(),
                h.loan_type.to_string(),
                fmt_money(&h.loan_amount),
                format!("{}%", h.interest_rate),
                h.tenure_months.to_string(),
                h.application_status.to_string(),
                h.loan_status.to_string(),
                fmt_opt(&h.final_status),
                fmt_opt(&h.disbursement_date),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Loan", "Account", "Type", "Amount", "Rate", "Months", "Application", "Loan",
            "Final", "Disbursed",
        ],
        rows,
    )
}
