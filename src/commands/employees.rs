// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{AppContext, id, opt_text, parsed, text};
use crate::models::{Employee, EmployeePosition};
use crate::records::admins;
use crate::records::employees::{self, EmployeeUpdate, NewEmployee};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(ctx: &AppContext<'_>, conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let new = NewEmployee {
                first_name: text(sub, "first-name")?.to_string(),
                last_name: text(sub, "last-name")?.to_string(),
                email: text(sub, "email")?.to_string(),
                phone_number: text(sub, "phone")?.to_string(),
                position: text(sub, "position")?.parse::<EmployeePosition>()?,
            };
            let employee = employees::add(conn, &new, ctx.today)?;
            if !maybe_print_json(sub.get_flag("json"), &employee)? {
                println!(
                    "Added employee {} ({} {}, {})",
                    employee.id, employee.first_name, employee.last_name, employee.position
                );
            }
        }
        Some(("get", sub)) => {
            let employee = employees::get(conn, id(sub, "id")?)?;
            if !maybe_print_json(sub.get_flag("json"), &employee)? {
                println!("{}", employee_table(std::slice::from_ref(&employee)));
            }
        }
        Some(("list", sub)) => {
            let list = employees::list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                println!("{}", employee_table(&list));
            }
        }
        Some(("update", sub)) => {
            let changes = EmployeeUpdate {
                position: parsed::<EmployeePosition>(sub, "position")?,
                phone_number: opt_text(sub, "phone").map(str::to_string),
                email: opt_text(sub, "email").map(str::to_string),
            };
            let employee = employees::update(conn, id(sub, "id")?, &changes)?;
            println!("Updated employee {}", employee.id);
        }
        Some(("deactivate", sub)) => {
            let employee = employees::deactivate(conn, id(sub, "id")?)?;
            println!("Employee {} is now {}", employee.id, employee.status);
        }
        _ => {}
    }
    Ok(())
}

pub fn handle_admin(ctx: &AppContext<'_>, conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let admin = admins::add(conn, text(sub, "name")?, text(sub, "email")?, ctx.today)?;
            println!("Added admin {} <{}>", admin.id, admin.email);
        }
        Some(("list", sub)) => {
            let list = admins::list(conn)?;
            if !maybe_print_json(sub.get_flag("json"), &list)? {
                let rows = list
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            a.email.clone(),
                            a.created_at.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["Id", "Name", "Email", "Created"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

fn employee_table(list: &[Employee]) -> comfy_table::Table {
    let rows = list
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                format!("{} {}", e.first_name, e.last_name),
                e.email.clone(),
                e.phone_number.clone(),
                e.position.to_string(),
                e.status.to_string(),
            ]
        })
        .collect();
    pretty_table(
        &["Id", "Name", "Email", "Phone", "Position", "Status"],
        rows,
    )
}
