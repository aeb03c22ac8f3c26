// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! jontrain-cli entry point.
//!
//! Shows and records highscores and moves encrypted backups in and out of
//! the data directory.

mod cli_parser;
mod commands;

use std::process::ExitCode;

use jontrain_core::cli::format_category_list;
use jontrain_core::scores::{APP_VERSION, SCHEMA_VERSION};

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("show");
    let rest = args.get(2..).unwrap_or_default();

    match command {
        "show" | "record" | "export" | "import" => ExitCode::from(commands::run(command, rest).await),
        "categories" => {
            print!("{}", format_category_list());
            ExitCode::SUCCESS
        }
        "help" | "--help" | "-h" => {
            if let Some(sub) = args.get(2) {
                cli_parser::print_command_help(sub);
            } else {
                cli_parser::print_usage();
            }
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("jontrain-cli {} (schema {})", APP_VERSION, SCHEMA_VERSION);
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            cli_parser::print_usage();
            ExitCode::from(commands::EXIT_USAGE)
        }
    }
}
