// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn opt(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help)
}

fn req(name: &'static str, help: &'static str) -> Arg {
    opt(name, help).required(true)
}

fn json_flags() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    ]
}

fn id_arg() -> Arg {
    req("id", "Record id").value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("finguard")
        .version(crate_version!())
        .about("Track income and expenses, derived balances and budget alerts")
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .help("Act as this user (overrides FINGUARD_USER and the active user)"),
        )
        .subcommand(Command::new("init").about("Create the database and default categories"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Register a user; a 'Main Account' is created with it")
                        .arg(Arg::new("username").required(true))
                        .arg(opt("email", "Email address"))
                        .arg(opt("phone", "Contact phone number")),
                )
                .subcommand(
                    Command::new("use")
                        .about("Make a user the active user")
                        .arg(Arg::new("username").required(true)),
                )
                .subcommand(Command::new("list").about("List users")),
        )
        .subcommand(
            Command::new("account")
                .about("Manage accounts")
                .subcommand(
                    Command::new("add")
                        .about("Add a named account")
                        .arg(req("name", "Account name")),
                )
                .subcommand(Command::new("list").about("List accounts and balances")),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("add")
                        .about("Create a custom category")
                        .arg(req("name", "Category name"))
                        .arg(req("type", "income or expense")),
                )
                .subcommand(Command::new("list").about("List default and custom categories"))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a custom category")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(req("type", "income or expense"))
                        .arg(req("amount", "Positive amount, e.g. 45.50"))
                        .arg(req("category", "Category name"))
                        .arg(opt("date", "YYYY-MM-DD, defaults to today"))
                        .arg(opt("account", "Account name, defaults to the first account"))
                        .arg(opt("description", "Optional notes")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change fields of a transaction")
                        .arg(id_arg())
                        .arg(opt("type", "income or expense"))
                        .arg(opt("amount", "Positive amount"))
                        .arg(opt("category", "Category name"))
                        .arg(opt("date", "YYYY-MM-DD"))
                        .arg(opt("account", "Account name"))
                        .arg(opt("description", "Notes; pass an empty string to clear")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(opt("from", "Start date (inclusive)"))
                        .arg(opt("to", "End date (inclusive)"))
                        .arg(opt("category", "Category name"))
                        .arg(opt("type", "income or expense"))
                        .arg(opt("limit", "Maximum rows").value_parser(value_parser!(usize)))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Budgets and alerts")
                .subcommand(
                    Command::new("add")
                        .about("Create a budget for an expense category")
                        .arg(req("category", "Expense category name"))
                        .arg(req("amount", "Spending limit"))
                        .arg(req("start", "Period start, YYYY-MM-DD"))
                        .arg(req("end", "Period end, YYYY-MM-DD (inclusive)")),
                )
                .subcommand(
                    Command::new("monthly")
                        .about("Create a budget for the current month")
                        .arg(req("category", "Expense category name"))
                        .arg(req("amount", "Spending limit")),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change a budget")
                        .arg(id_arg())
                        .arg(opt("category", "Expense category name"))
                        .arg(opt("amount", "Spending limit"))
                        .arg(opt("start", "Period start"))
                        .arg(opt("end", "Period end")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a budget")
                        .arg(id_arg()),
                )
                .subcommand(
                    Command::new("list")
                        .about("All budgets with spending status")
                        .args(json_flags()),
                )
                .subcommand(Command::new("status").about("Summary of active budgets"))
                .subcommand(Command::new("alerts").about("Active budgets at 90% or over")),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(
                    Command::new("balances")
                        .about("Account balances")
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("summary")
                        .about("Income, expense and net for a month")
                        .arg(opt("month", "YYYY-MM, defaults to the current month"))
                        .args(json_flags()),
                )
                .subcommand(
                    Command::new("spend-by-category")
                        .about("Expenses per category for a month")
                        .arg(opt("month", "YYYY-MM, defaults to the current month"))
                        .args(json_flags()),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import data")
                .subcommand(
                    Command::new("transactions")
                        .about("Import transactions from CSV (date,type,amount,category,account,description)")
                        .arg(req("path", "CSV file")),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export transactions")
                        .arg(req("format", "csv or json"))
                        .arg(req("out", "Output file")),
                ),
        )
        .subcommand(Command::new("doctor").about("Check balances and category types for drift"))
}
