// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::budget::{BudgetAlert, transaction_alerts};
use crate::models::{NewTransaction, TransactionFilter, TransactionUpdate, User};
use crate::store::transactions::TransactionView;
use crate::utils::{
    fmt_money, id_for_account, id_for_category, maybe_print_json, parse_date, parse_decimal,
    parse_type, pretty_table, today,
};
use crate::{ledger, store};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user, sub)?,
        Some(("edit", sub)) => edit(conn, user, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let removed = ledger::delete_transaction(conn, user.id, id)?;
            println!(
                "Deleted {} of {} from {}",
                removed.kind,
                fmt_money(&removed.amount),
                removed.date
            );
        }
        Some(("list", sub)) => list(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn print_alerts(alerts: &[BudgetAlert]) {
    for alert in alerts {
        println!("Warning: {}", alert);
    }
}

fn add(conn: &mut Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let kind = parse_type(sub.get_one::<String>("type").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category_id = id_for_category(conn, user.id, sub.get_one::<String>("category").unwrap(), Some(kind))?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let account_id = match sub.get_one::<String>("account") {
        Some(name) => id_for_account(conn, user.id, name)?,
        None => store::accounts::default_for_user(conn, user.id)?.id,
    };
    let description = sub
        .get_one::<String>("description")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let new = NewTransaction {
        account_id,
        category_id,
        amount,
        kind,
        date,
        description,
    };
    let tx = ledger::create_transaction(conn, user.id, &new)?;
    let account = store::accounts::get(conn, tx.account_id)?;
    println!(
        "Recorded {} {} on {} (id {}); '{}' balance is now {}",
        tx.kind,
        fmt_money(&tx.amount),
        tx.date,
        tx.id,
        account.name,
        fmt_money(&account.balance)
    );
    print_alerts(&transaction_alerts(conn, &tx)?);
    Ok(())
}

fn edit(conn: &mut Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let kind = sub.get_one::<String>("type").map(|s| parse_type(s)).transpose()?;
    let category_kind = match kind {
        Some(k) => Some(k),
        None => Some(store::transactions::get_for_user(conn, user.id, id)?.kind),
    };
    let update = TransactionUpdate {
        account_id: sub
            .get_one::<String>("account")
            .map(|n| id_for_account(conn, user.id, n))
            .transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|n| id_for_category(conn, user.id, n, category_kind))
            .transpose()?,
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        kind,
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        description: sub
            .get_one::<String>("description")
            .map(|s| Some(s.trim().to_string()).filter(|s| !s.is_empty())),
    };
    if update.is_empty() {
        println!("Nothing to change for transaction {}", id);
        return Ok(());
    }
    let tx = ledger::update_transaction(conn, user.id, id, &update)?;
    println!("Updated transaction {}", tx.id);
    print_alerts(&transaction_alerts(conn, &tx)?);
    Ok(())
}

fn list(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.to_string(),
                    r.kind.to_string(),
                    fmt_money(&r.amount),
                    r.category.clone(),
                    r.account.clone(),
                    r.description.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Amount", "Category", "Account", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

pub fn query_rows(
    conn: &Connection,
    user: &User,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionView>> {
    let kind = sub.get_one::<String>("type").map(|s| parse_type(s)).transpose()?;
    let filter = TransactionFilter {
        start_date: sub.get_one::<String>("from").map(|s| parse_date(s)).transpose()?,
        end_date: sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?,
        category_id: sub
            .get_one::<String>("category")
            .map(|n| id_for_category(conn, user.id, n, kind))
            .transpose()?,
        kind,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(store::transactions::list(conn, user.id, &filter)?)
}
