// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use finguard::{cli, commands, config, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let user_flag = matches.get_one::<String>("user").map(|s| s.as_str());

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&mut conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        Some((name, sub)) => {
            let user = config::current_user(&conn, user_flag)?;
            match name {
                "account" => commands::accounts::handle(&conn, &user, sub)?,
                "category" => commands::categories::handle(&conn, &user, sub)?,
                "tx" => commands::transactions::handle(&mut conn, &user, sub)?,
                "budget" => commands::budgets::handle(&mut conn, &user, sub)?,
                "report" => commands::reports::handle(&conn, &user, sub)?,
                "import" => commands::importer::handle(&mut conn, &user, sub)?,
                "export" => commands::exporter::handle(&conn, &user, sub)?,
                _ => {}
            }
        }
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
