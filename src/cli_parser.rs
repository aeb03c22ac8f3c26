// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing and help text for jontrain-cli.

use std::path::PathBuf;

use jontrain_core::backup::FormatPreference;
use jontrain_core::scores::Category;

/// Print general usage information.
pub fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "jontrain-cli - JonTrain highscores and backups v{}

USAGE:
    jontrain-cli [COMMAND] [OPTIONS]

COMMANDS:
    show         Show highscores (default when no command given)
    record       Record a finished round
    export       Write an encrypted backup
    import       Restore highscores from a backup
    categories   List category keys
    version      Show version information
    help         Show this help message

EXAMPLES:
    jontrain-cli                              # Show all highscores
    jontrain-cli show mult                    # One category
    jontrain-cli record div_rest 17 Mia       # Record a result
    jontrain-cli export --format raw          # AES backup in the export dir
    jontrain-cli import ~/backup.jontrain.zip # Restore

ENVIRONMENT:
    JONTRAIN_CONFIG         TOML config file
    JONTRAIN_DATA_DIR       Score directory (default ~/.config/jontrain)
    JONTRAIN_EXPORT_DIR     Backup directory (default: data dir)
    JONTRAIN_PLATFORM       desktop, content-provider, document-picker
    JONTRAIN_BACKUP_FORMAT  auto, archive, raw
    JONTRAIN_LOG_JSON       Emit JSON log lines
    RUST_LOG                Log level (debug, info, warn, error)

EXIT CODES:
    0  Success
    1  Failure
    2  Usage or configuration error
",
        version
    );
}

/// Print detailed help for a specific command.
pub fn print_command_help(command: &str) {
    match command {
        "show" => print_show_help(),
        "record" => print_record_help(),
        "export" => print_export_help(),
        "import" => print_import_help(),
        _ => {
            eprintln!(
                "No detailed help available for '{}'. Use 'jontrain-cli help' for general usage.",
                command
            );
        }
    }
}

fn print_show_help() {
    eprintln!(
        "jontrain-cli show - Show highscores

USAGE:
    jontrain-cli show [CATEGORY]

DESCRIPTION:
    Prints the top ten of every category, or of CATEGORY only.
    Legacy score files are migrated on first use.
"
    );
}

fn print_record_help() {
    eprintln!(
        "jontrain-cli record - Record a finished round

USAGE:
    jontrain-cli record CATEGORY POINTS [NAME]

DESCRIPTION:
    Ranks the result into CATEGORY and saves. A missing name is stored
    as \"Anonym\". Results outside the top ten are dropped.
"
    );
}

fn print_export_help() {
    eprintln!(
        "jontrain-cli export - Write an encrypted backup

USAGE:
    jontrain-cli export [OPTIONS]

OPTIONS:
    --format FMT  auto, archive or raw (default from config)
    --dir DIR     Target directory (default: export dir)
"
    );
}

fn print_import_help() {
    eprintln!(
        "jontrain-cli import - Restore highscores from a backup

USAGE:
    jontrain-cli import FILE

DESCRIPTION:
    Replaces all highscores with the backup contents. Backups written
    with a different schema version are refused.
"
    );
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportArgs {
    pub format: Option<FormatPreference>,
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordArgs {
    pub category: Category,
    pub points: u64,
    pub name: String,
}

pub fn parse_show_args(args: &[String]) -> Result<Option<Category>, String> {
    match args {
        [] => Ok(None),
        [category] => category.parse::<Category>().map(Some).map_err(|e| e.to_string()),
        _ => Err(format!("Unexpected argument: {}", args[1])),
    }
}

pub fn parse_record_args(args: &[String]) -> Result<RecordArgs, String> {
    let (Some(category), Some(points)) = (args.first(), args.get(1)) else {
        return Err("Usage: jontrain-cli record CATEGORY POINTS [NAME]".to_string());
    };
    let category = category.parse::<Category>().map_err(|e| e.to_string())?;
    let points = points
        .parse::<u64>()
        .map_err(|_| format!("Invalid points: {}", points))?;
    Ok(RecordArgs { category, points, name: args[2..].join(" ") })
}

pub fn parse_export_args(args: &[String]) -> Result<ExportArgs, String> {
    let mut parsed = ExportArgs { format: None, dir: None };
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--format" => {
                let value = args.get(i + 1).ok_or("Missing value for --format")?;
                parsed.format = Some(value.parse()?);
                i += 2;
            }
            "--dir" => {
                let value = args.get(i + 1).ok_or("Missing value for --dir")?;
                parsed.dir = Some(PathBuf::from(value));
                i += 2;
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(parsed)
}

pub fn parse_import_args(args: &[String]) -> Result<PathBuf, String> {
    match args {
        [file] => Ok(PathBuf::from(file)),
        [] => Err("Usage: jontrain-cli import FILE".to_string()),
        _ => Err(format!("Unexpected argument: {}", args[1])),
    }
}

#[cfg(test)]
#[path = "cli_parser_tests.rs"]
mod tests;
