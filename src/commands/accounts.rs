// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use super::{AppContext, approved, id, opt_text, parsed, text};
use crate::ledger::{self, accounts, lifecycle};
use crate::models::{Account, AccountStatus, Customer, Transaction};
use crate::notify::{self, Notice};
use crate::records::customers;
use crate::utils::{fmt_money, fmt_opt, maybe_print_json, parse_date, parse_decimal, pretty_table};

pub fn handle(ctx: &AppContext<'_>, conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("open", sub)) => open(ctx, conn, sub)?,
        Some(("deposit", sub)) => {
            let account_id = id(sub, "id")?;
            let amount = parse_decimal(text(sub, "amount")?)?;
            let entry = accounts::deposit(conn, account_id, amount, text(sub, "pin")?, ctx.today)?;
            print_entry(&entry);
            notify_holder(ctx, conn, account_id, |c, a| {
                notify::transaction_notice(c, a, &entry)
            });
        }
        Some(("withdraw", sub)) => {
            let account_id = id(sub, "id")?;
            let amount = parse_decimal(text(sub, "amount")?)?;
            let entry = accounts::withdraw(
                conn,
                &ctx.config.limits,
                account_id,
                amount,
                text(sub, "pin")?,
                ctx.today,
            )?;
            print_entry(&entry);
            notify_holder(ctx, conn, account_id, |c, a| {
                notify::transaction_notice(c, a, &entry)
            });
        }
        Some(("transfer", sub)) => {
            let account_id = id(sub, "id")?;
            let amount = parse_decimal(text(sub, "amount")?)?;
            let entry = accounts::transfer(
                conn,
                &ctx.config.limits,
                account_id,
                id(sub, "beneficiary")?,
                amount,
                text(sub, "pin")?,
                ctx.today,
            )?;
            print_entry(&entry);
            notify_holder(ctx, conn, account_id, |c, a| {
                notify::transaction_notice(c, a, &entry)
            });
        }
        Some(("change-pin", sub)) => {
            let account_id = id(sub, "id")?;
            accounts::change_pin(conn, account_id, text(sub, "old-pin")?, text(sub, "new-pin")?)?;
            println!("PIN changed for account {}", account_id);
            notify_holder(ctx, conn, account_id, notify::pin_changed_notice);
        }
        Some(("add-beneficiary", sub)) => {
            let new = accounts::NewBeneficiary {
                account_name: text(sub, "name")?.to_string(),
                account_number: text(sub, "number")?.to_string(),
                branch_id: id(sub, "branch")?,
            };
            let b = accounts::add_beneficiary(conn, id(sub, "id")?, &new)?;
            println!(
                "Added beneficiary {} ({} / {})",
                b.id, b.account_name, b.account_number
            );
        }
        Some(("beneficiaries", sub)) => {
            let list = accounts::beneficiaries(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                let rows = list
                    .iter()
                    .map(|b| {
                        vec![
                            b.id.to_string(),
                            b.account_name.clone(),
                            b.account_number.clone(),
                            b.branch_id.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Number", "Branch"], rows));
            }
        }
        Some(("details", sub)) => {
            let details = accounts::details(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &details)? {
                println!("{}", account_table(std::slice::from_ref(&details.account)));
                println!("Holder: {} <{}>", details.customer.full_name(), details.customer.email);
                println!("{}", transaction_table(&details.transactions));
                println!("Loans: {}", details.loans.len());
            }
        }
        Some(("statement", sub)) => statement(conn, sub)?,
        Some(("list", sub)) => {
            let status = parsed::<AccountStatus>(sub, "status")?;
            let list = lifecycle::list_accounts(conn, status)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", account_table(&list));
            }
        }
        Some(("review", sub)) => {
            let ok = approved(sub)?;
            let account = lifecycle::review_request(conn, id(sub, "id")?, ok)?;
            println!("Account {} is now {}", account.id, account.status);
            notify_holder(ctx, conn, account.id, |c, a| {
                notify::account_request_notice(c, a, ok)
            });
        }
        Some(("request-deactivation", sub)) => {
            let account = lifecycle::request_deactivation(conn, id(sub, "id")?)?;
            println!(
                "Deactivation requested; account {} is {}",
                account.id, account.status
            );
        }
        Some(("decide-deactivation", sub)) => {
            let ok = approved(sub)?;
            let account = lifecycle::decide_deactivation(conn, id(sub, "id")?, ok)?;
            println!("Account {} is now {}", account.id, account.status);
            notify_holder(ctx, conn, account.id, |c, a| {
                notify::deactivation_notice(c, a, ok)
            });
        }
        _ => {}
    }
    Ok(())
}

fn open(ctx: &AppContext<'_>, conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let new = lifecycle::NewAccount {
        customer_id: id(sub, "customer")?,
        account_type_id: id(sub, "type")?,
        branch_id: id(sub, "branch")?,
        pin: text(sub, "pin")?.to_string(),
        opening_balance: parse_decimal(text(sub, "balance")?)?,
    };
    let account = lifecycle::open_account(conn, &new, ctx.today)?;
    if !maybe_print_json(sub.get_flag("json"), &account)? {
        println!(
            "Opened account {} (number {}), awaiting approval",
            account.id, account.account_number
        );
    }
    Ok(())
}

fn statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account_id = id(sub, "id")?;
    let from = opt_text(sub, "from").map(parse_date).transpose()?;
    let to = opt_text(sub, "to").map(parse_date).transpose()?;
    let entries = if sub.get_flag("employee") {
        accounts::transactions_for_account(conn, account_id, from, to)?
    } else {
        accounts::statement(conn, account_id, from, to)?
    };
    if let Some(path) = opt_text(sub, "csv") {
        write_statement_csv(Path::new(path), &entries)?;
        println!("Wrote {} entries to {}", entries.len(), path);
        return Ok(());
    }
    if !maybe_print_json(sub.get_flag("json"), &entries)? {
        println!("{}", transaction_table(&entries));
    }
    Ok(())
}

pub fn write_statement_csv(path: &Path, entries: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "date",
        "type",
        "description",
        "debit",
        "credit",
        "balance",
    ])?;
    for t in entries {
        wtr.write_record([
            t.date.to_string(),
            t.kind.to_string(),
            t.description.clone(),
            fmt_opt(&t.debit),
            fmt_opt(&t.credit),
            t.updated_balance.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Looks up the account holder and sends a notice built from the committed state.
fn notify_holder<F>(ctx: &AppContext<'_>, conn: &Connection, account_id: i64, build: F)
where
    F: FnOnce(&Customer, &Account) -> Notice,
{
    let holder = ledger::load_account(conn, account_id)
        .and_then(|a| customers::get(conn, a.customer_id).map(|c| (c, a)));
    match holder {
        Ok((customer, account)) => notify::notify_quietly(ctx.notifier, build(&customer, &account)),
        Err(e) => tracing::warn!(account_id, error = %e, "no notice sent"),
    }
}

fn print_entry(t: &Transaction) {
    println!(
        "{} #{} on account {}: {} (balance {})",
        t.kind,
        t.id,
        t.account_id,
        t.description,
        fmt_money(&t.updated_balance)
    );
}

pub(crate) fn account_table(list: &[Account]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|a| {
            vec![
                a.id.to_string(),
                a.account_number.clone(),
                a.customer_id.to_string(),
                a.account_type_id.to_string(),
                a.branch_id.to_string(),
                fmt_money(&a.balance),
                a.cibil_score.to_string(),
                a.status.to_string(),
                a.created_at.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &[
            "Id", "Number", "Customer", "Type", "Branch", "Balance", "CIBIL", "Status", "Opened",
        ],
        rows,
    )
}

fn transaction_table(list: &[Transaction]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|t| {
            vec![
                t.date.to_string(),
                t.kind.to_string(),
                t.description.clone(),
                t.debit.as_ref().map(fmt_money).unwrap_or_default(),
                t.credit.as_ref().map(fmt_money).unwrap_or_default(),
                fmt_money(&t.updated_balance),
            ]
        })
        .collect();
    pretty_table(
        &["Date", "Type", "Description", "Debit", "Credit", "Balance"],
        rows,
    )
}
