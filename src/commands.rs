// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command implementations for jontrain-cli.

use chrono::Local;

use jontrain_core::backup::BackupCodec;
use jontrain_core::cli::{format_category, format_database};
use jontrain_core::config::{self, AppConfig};
use jontrain_core::scores::{ScoreRecord, ScoreStore, MAX_ENTRIES};
use jontrain_core::service::{BackupService, BackupStatus};
use jontrain_core::telemetry;
use jontrain_core::transfer::DesktopGateway;

use crate::cli_parser;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Load configuration, set up logging, and run a store-backed command.
pub async fn run(command: &str, args: &[String]) -> u8 {
    let config = match config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return EXIT_USAGE;
        }
    };
    if let Err(e) = telemetry::init_logging(config.log_json) {
        eprintln!("{}", e);
    }
    if config.environment.is_mediated() {
        tracing::warn!(environment = %config.environment, "Command line always uses desktop file access");
    }

    match command {
        "show" => run_show(&config, args),
        "record" => run_record(&config, args),
        "export" => run_export(&config, args).await,
        "import" => run_import(&config, args).await,
        _ => {
            eprintln!("Unknown command: {}", command);
            EXIT_USAGE
        }
    }
}

fn usage_error(command: &str, message: &str) -> u8 {
    eprintln!("{}", message);
    cli_parser::print_command_help(command);
    EXIT_USAGE
}

fn run_show(config: &AppConfig, args: &[String]) -> u8 {
    let category = match cli_parser::parse_show_args(args) {
        Ok(category) => category,
        Err(e) => return usage_error("show", &e),
    };
    let store = ScoreStore::load(config.store_config());
    match category {
        Some(category) => print!("{}", format_category(category, store.scores(category))),
        None => print!("{}", format_database(store.database())),
    }
    EXIT_OK
}

fn run_record(config: &AppConfig, args: &[String]) -> u8 {
    let parsed = match cli_parser::parse_record_args(args) {
        Ok(parsed) => parsed,
        Err(e) => return usage_error("record", &e),
    };
    let mut store = ScoreStore::load(config.store_config());
    let record = ScoreRecord::new(&parsed.name, parsed.points, Local::now());
    match store.record_result(parsed.category, record) {
        Ok(outcome) => {
            match outcome.rank {
                Some(rank) => println!("Platz {} in {}", rank, parsed.category),
                None => println!("Nicht unter den besten {} in {}", MAX_ENTRIES, parsed.category),
            }
            print!("{}", format_category(parsed.category, &outcome.entries));
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Could not save scores: {}", e);
            EXIT_FAILURE
        }
    }
}

async fn run_export(config: &AppConfig, args: &[String]) -> u8 {
    let parsed = match cli_parser::parse_export_args(args) {
        Ok(parsed) => parsed,
        Err(e) => return usage_error("export", &e),
    };
    let codec = BackupCodec::new(parsed.format.unwrap_or(config.backup_format));
    let dir = parsed.dir.unwrap_or_else(|| config.export_dir.clone());
    let service = BackupService::new(
        ScoreStore::load(config.store_config()),
        codec,
        Box::new(DesktopGateway::new(dir)),
    );
    report(service.export().await)
}

async fn run_import(config: &AppConfig, args: &[String]) -> u8 {
    let file = match cli_parser::parse_import_args(args) {
        Ok(file) => file,
        Err(e) => return usage_error("import", &e),
    };
    let gateway = DesktopGateway::new(config.export_dir.clone()).with_import_source(file);
    let service = BackupService::new(
        ScoreStore::load(config.store_config()),
        BackupCodec::new(config.backup_format),
        Box::new(gateway),
    );
    report(service.import().await)
}

fn report(status: BackupStatus) -> u8 {
    if status.is_success() {
        println!("{}", status);
        EXIT_OK
    } else {
        eprintln!("{}", status);
        EXIT_FAILURE
    }
}
