// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{TransactionFilter, User};
use crate::store;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap();
            let out = sub.get_one::<String>("out").unwrap();
            let n = export_transactions(conn, user, fmt, out)?;
            println!("Exported {} transactions to {}", n, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Writes the user's transactions oldest first, in the column order the
/// importer reads.
pub fn export_transactions(conn: &Connection, user: &User, fmt: &str, out: &str) -> Result<usize> {
    let fmt = fmt.trim().to_lowercase();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let mut rows = store::transactions::list(conn, user.id, &TransactionFilter::default())?;
    rows.reverse();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["date", "type", "amount", "category", "account", "description"])?;
        for r in &rows {
            wtr.write_record([
                r.date.to_string(),
                r.kind.to_string(),
                format!("{:.2}", r.amount),
                r.category.clone(),
                r.account.clone(),
                r.description.clone().unwrap_or_default(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = rows
            .iter()
            .map(|r| {
                json!({
                    "date": r.date, "type": r.kind, "amount": format!("{:.2}", r.amount),
                    "category": r.category, "account": r.account, "description": r.description
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    Ok(rows.len())
}
