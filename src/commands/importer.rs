// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{NewTransaction, TxType, User};
use crate::utils::{id_for_account, id_for_category, parse_date, parse_decimal, parse_type};
use crate::{ledger, store};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::{HashMap, hash_map::Entry};
use tracing::info;

pub fn handle(conn: &mut Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_transactions(conn, user, path)?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Imports `date,type,amount,category,account,description` rows. The whole
/// file is one database transaction: a bad row leaves nothing behind.
pub fn import_transactions(conn: &mut Connection, user: &User, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let default_account = store::accounts::default_for_user(&tx, user.id)?.id;
    let mut account_cache: HashMap<String, i64> = HashMap::new();
    let mut category_cache: HashMap<(String, TxType), i64> = HashMap::new();
    let mut count = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result.with_context(|| format!("Line {}", line))?;
        let field = |i: usize, name: &str| {
            rec.get(i)
                .map(|s| s.trim().to_string())
                .with_context(|| format!("Line {}: {} missing", line, name))
        };
        let date_raw = field(0, "date")?;
        let type_raw = field(1, "type")?;
        let amount_raw = field(2, "amount")?;
        let category = field(3, "category")?;
        let account = rec.get(4).unwrap_or("").trim().to_string();
        let description = rec
            .get(5)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        let date = parse_date(&date_raw).with_context(|| {
            format!("Invalid transaction date '{}' on line {}", date_raw, line)
        })?;
        let kind = parse_type(&type_raw).with_context(|| format!("Line {}", line))?;
        let amount = parse_decimal(&amount_raw)
            .with_context(|| format!("Invalid amount '{}' on line {}", amount_raw, line))?;

        let account_id = if account.is_empty() {
            default_account
        } else {
            match account_cache.entry(account.clone()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => *entry.insert(
                    id_for_account(&tx, user.id, &account)
                        .with_context(|| format!("Line {}", line))?,
                ),
            }
        };
        let category_id = match category_cache.entry((category.clone(), kind)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                *entry.insert(
                    id_for_category(&tx, user.id, &category, Some(kind))
                        .with_context(|| format!("Line {}", line))?,
                )
            }
        };

        let new = NewTransaction {
            account_id,
            category_id,
            amount,
            kind,
            date,
            description,
        };
        ledger::post_transaction(&tx, user.id, &new)
            .with_context(|| format!("Line {}", line))?;
        count += 1;
    }
    tx.commit()?;
    info!(user_id = user.id, count, path, "imported transactions");
    Ok(count)
}
