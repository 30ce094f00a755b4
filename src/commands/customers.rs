// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::accounts::account_table;
use super::loans::loan_table;
use super::{AppContext, id, opt_text, parsed, text};
use crate::ledger::{lifecycle, loans};
use crate::models::{Customer, CustomerStatus};
use crate::records::customers::{self, CustomerUpdate, NewCustomer};
use crate::utils::{maybe_print_json, parse_date, pretty_table};

pub fn handle(ctx: &AppContext<'_>, conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewCustomer {
                first_name: text(sub, "first-name")?.to_string(),
                middle_name: opt_text(sub, "middle-name").map(str::to_string),
                last_name: text(sub, "last-name")?.to_string(),
                gender: text(sub, "gender")?.to_string(),
                contact_number: text(sub, "contact")?.to_string(),
                address: text(sub, "address")?.to_string(),
                date_of_birth: parse_date(text(sub, "dob")?)?,
                aadhar_number: text(sub, "aadhar")?.to_string(),
                pan: text(sub, "pan")?.to_string(),
                email: text(sub, "email")?.to_string(),
            };
            let customer = customers::create(conn, &new, ctx.today)?;
            if !maybe_print_json(sub.get_flag("json"), &customer)? {
                println!("Added customer {} ({})", customer.id, customer.full_name());
            }
        }
        Some(("get", sub)) => {
            let customer = customers::get(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &customer)? {
                println!("{}", customer_table(std::slice::from_ref(&customer)));
            }
        }
        Some(("list", sub)) => {
            let status = parsed::<CustomerStatus>(sub, "status")?;
            let list = customers::list(conn, status)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", customer_table(&list));
            }
        }
        Some(("update", sub)) => {
            let changes = CustomerUpdate {
                contact_number: opt_text(sub, "contact").map(str::to_string),
                address: opt_text(sub, "address").map(str::to_string),
                email: opt_text(sub, "email").map(str::to_string),
            };
            let customer = customers::update(conn, id(sub, "id")?, &changes)?;
            println!("Updated customer {}", customer.id);
        }
        Some(("deactivate", sub)) => {
            let customer = customers::deactivate(conn, id(sub, "id")?)?;
            println!("Customer {} is now {}", customer.id, customer.status);
        }
        Some(("accounts", sub)) => {
            let list = lifecycle::accounts_for_customer(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", account_table(&list));
            }
        }
        Some(("loans", sub)) => {
            let customer_id = id(sub, "id")?;
            customers::get(conn, customer_id)?;
            let list = loans::for_customer(conn, customer_id)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", loan_table(&list));
            }
        }
        _ => {}
    }
    Ok(())
}

fn customer_table(list: &[Customer]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.full_name(),
                c.gender.clone(),
                c.contact_number.clone(),
                c.email.clone(),
                c.pan.clone(),
                c.date_of_birth.to_string(),
                c.status.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["Id", "Name", "Gender", "Contact", "Email", "PAN", "Born", "Status"],
        rows,
    )
}
