// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::User;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table, today};
use crate::{balance, store, summary};
use anyhow::Result;
use chrono::Datelike;
use rusqlite::Connection;

pub fn handle(conn: &Connection, user: &User, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, user, sub)?,
        Some(("summary", sub)) => monthly(conn, user, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, user, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_arg(sub: &clap::ArgMatches) -> Result<(i32, u32)> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => {
            let d = today();
            Ok((d.year(), d.month()))
        }
    }
}

fn balances(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let accounts = store::accounts::list_for_user(conn, user.id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
        return Ok(());
    }
    let mut data: Vec<Vec<String>> = accounts
        .into_iter()
        .map(|a| vec![a.name, fmt_money(&a.balance)])
        .collect();
    data.push(vec![
        "Total".to_string(),
        fmt_money(&balance::total_balance(conn, user.id)?),
    ]);
    println!("{}", pretty_table(&["Account", "Balance"], data));
    Ok(())
}

fn monthly(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg(sub)?;
    let s = summary::monthly_summary(conn, user.id, year, month)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        let data = vec![vec![
            format!("{}-{:02}", s.year, s.month),
            fmt_money(&s.total_income),
            fmt_money(&s.total_expense),
            fmt_money(&s.net),
        ]];
        println!("{}", pretty_table(&["Month", "Income", "Expense", "Net"], data));
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, user: &User, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = month_arg(sub)?;
    let data: Vec<Vec<String>> = summary::expenses_by_category(conn, user.id, year, month)?
        .into_iter()
        .map(|(cat, amt)| vec![cat, fmt_money(&amt)])
        .collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}
