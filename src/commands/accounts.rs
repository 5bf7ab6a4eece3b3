// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::utils::{fmt_money, pretty_table};
use crate::{balance, ledger, store};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let account = ledger::add_account(conn, user.id, name)?;
            println!("Added account '{}'", account.name);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for a in store::accounts::list_for_user(conn, user.id)? {
                data.push(vec![a.id.to_string(), a.name, fmt_money(&a.balance)]);
            }
            data.push(vec![
                String::new(),
                "Total".to_string(),
                fmt_money(&balance::total_balance(conn, user.id)?),
            ]);
            println!("{}", pretty_table(&["ID", "Name", "Balance"], data));
        }
        _ => {}
    }
    Ok(())
}
