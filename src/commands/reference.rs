// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Branches, account types and loan options.

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::{id, text};
use crate::models::{Branch, LoanOption, LoanType};
use crate::records::branches::{self, NewBranch};
use crate::records::{account_types, loan_options};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle_branch(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewBranch {
                name: text(sub, "name")?.to_string(),
                address: text(sub, "address")?.to_string(),
                bank_name: text(sub, "bank")?.to_string(),
                contact_number: text(sub, "contact")?.to_string(),
                ifsc_code: text(sub, "ifsc")?.to_string(),
                city: text(sub, "city")?.to_string(),
                state: text(sub, "state")?.to_string(),
                postal_code: text(sub, "postal-code")?.to_string(),
            };
            let branch = branches::add(conn, &new)?;
            println!("Added branch {} ({}, {})", branch.id, branch.name, branch.ifsc_code);
        }
        Some(("get", sub)) => {
            let branch = branches::get(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &branch)? {
                println!("{}", branch_table(std::slice::from_ref(&branch)));
            }
        }
        Some(("list", sub)) => {
            let list = branches::list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", branch_table(&list));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_account_type(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let list = account_types::list(conn)?;
        if !maybe_print_json(sub.get_flag("json"), &list)? {
            let rows = list
                .iter()
                .map(|t| vec![t.id.to_string(), t.name.clone()])
                .collect();
            println!("{}", pretty_table(&["Id", "Name"], rows));
        }
    }
    Ok(())
}

pub fn handle_loan_option(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let loan_type = text(sub, "type")?.parse::<LoanType>()?;
            let tenure = sub
                .get_one::<u32>("tenure")
                .copied()
                .context("Missing --tenure")?;
            let option = loan_options::add(
                conn,
                loan_type,
                parse_decimal(text(sub, "amount")?)?,
                parse_decimal(text(sub, "rate")?)?,
                tenure,
            )?;
            println!(
                "Added loan option {} ({} {} at {}% for {} months)",
                option.id,
                option.loan_type,
                fmt_money(&option.amount),
                option.interest_rate,
                option.tenure_months
            );
        }
        Some(("get", sub)) => {
            let option = loan_options::get(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &option)? {
                println!("{}", option_table(std::slice::from_ref(&option)));
            }
        }
        Some(("list", sub)) => {
            let list = loan_options::list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", option_table(&list));
            }
        }
        _ => {}
    }
    Ok(())
}

fn branch_table(list: &[Branch]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                b.name.clone(),
                b.bank_name.clone(),
                b.ifsc_code.clone(),
                b.city.clone(),
                b.state.clone(),
                b.contact_number.clone(),
            ]
        })
        .collect();
    pretty_table(
        &["Id", "Name", "Bank", "IFSC", "City", "State", "Contact"],
        rows,
    )
}

fn option_table(list: &[LoanOption]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.loan_type.to_string(),
                fmt_money(&o.amount),
                format!("{}%", o.interest_rate),
                o.tenure_months.to_string(),
            ]
        })
        .collect();
    pretty_table(&["Id", "Type", "Amount", "Rate", "Months"], rows)
}
