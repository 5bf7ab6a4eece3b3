// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{active_user, set_active_user};
use crate::utils::pretty_table;
use crate::{ledger, store};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let username = sub.get_one::<String>("username").unwrap();
            let email = sub.get_one::<String>("email").map(|s| s.trim());
            let phone = sub.get_one::<String>("phone").map(|s| s.trim());
            let (user, account) = ledger::create_user(conn, username, email, phone)
                .with_context(|| format!("Register user '{}'", username.trim()))?;
            if active_user(conn)?.is_none() {
                set_active_user(conn, &user.username)?;
            }
            println!(
                "Registered '{}' with account '{}' (balance {:.2})",
                user.username, account.name, account.balance
            );
        }
        Some(("use", sub)) => {
            let username = sub.get_one::<String>("username").unwrap().trim();
            store::users::find_by_username(conn, username)?
                .with_context(|| format!("User '{}' not found", username))?;
            set_active_user(conn, username)?;
            println!("Active user is now '{}'", username);
        }
        Some(("list", _)) => {
            let active = active_user(conn)?;
            let mut data = Vec::new();
            for u in store::users::list(conn)? {
                let marker = if active.as_deref() == Some(u.username.as_str()) {
                    "*".to_string()
                } else {
                    String::new()
                };
                data.push(vec![
                    marker,
                    u.username,
                    u.email.unwrap_or_default(),
                    u.phone.unwrap_or_default(),
                ]);
            }
            println!(
                "{}",
                pretty_table(&["Active", "Username", "Email", "Phone"], data)
            );
        }
        _ => {}
    }
    Ok(())
}
