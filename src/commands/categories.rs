// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::utils::{parse_type, pretty_table};
use crate::{ledger, store};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let kind = parse_type(sub.get_one::<String>("type").unwrap())?;
            let cat = ledger::create_category(conn, user.id, name, kind)?;
            println!("Added {} category '{}' (id {})", cat.kind, cat.name, cat.id);
        }
        Some(("list", _)) => {
            let mut data = Vec::new();
            for c in store::categories::list_visible(conn, user.id)? {
                let scope = if c.is_default { "default" } else { "custom" };
                data.push(vec![
                    c.id.to_string(),
                    c.name,
                    c.kind.to_string(),
                    scope.to_string(),
                ]);
            }
            println!("{}", pretty_table(&["ID", "Category", "Type", "Scope"], data));
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            ledger::delete_category(conn, user.id, id)?;
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
