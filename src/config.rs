// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Application configuration.
//!
//! Layers, later wins: built-in defaults, the TOML file named by
//! `JONTRAIN_CONFIG`, then individual `JONTRAIN_*` variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::backup::FormatPreference;
use crate::scores::StoreConfig;
use crate::transfer::Environment;

pub const ENV_CONFIG: &str = "JONTRAIN_CONFIG";
pub const ENV_DATA_DIR: &str = "JONTRAIN_DATA_DIR";
pub const ENV_EXPORT_DIR: &str = "JONTRAIN_EXPORT_DIR";
pub const ENV_PLATFORM: &str = "JONTRAIN_PLATFORM";
pub const ENV_BACKUP_FORMAT: &str = "JONTRAIN_BACKUP_FORMAT";
pub const ENV_LOG_JSON: &str = "JONTRAIN_LOG_JSON";

const APP_DIR_NAME: &str = "jontrain";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("Could not find a home or application data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub export_dir: PathBuf,
    pub environment: Environment,
    pub backup_format: FormatPreference,
    pub log_json: bool,
}

impl AppConfig {
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(&self.data_dir)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    export_dir: Option<PathBuf>,
    platform: Option<Environment>,
    backup_format: Option<FormatPreference>,
    log_json: Option<bool>,
}

/// Load from the process environment.
pub fn load() -> Result<AppConfig, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Load with `lookup` standing in for the environment.
pub fn load_from<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let file = match lookup(ENV_CONFIG) {
        Some(path) if !path.is_empty() => read_config_file(Path::new(&path))?,
        _ => ConfigFile::default(),
    };

    let data_dir = match non_empty(&lookup, ENV_DATA_DIR).map(PathBuf::from).or(file.data_dir) {
        Some(dir) => dir,
        None => default_data_dir(&lookup).ok_or(ConfigError::NoDataDir)?,
    };
    let export_dir = non_empty(&lookup, ENV_EXPORT_DIR)
        .map(PathBuf::from)
        .or(file.export_dir)
        .unwrap_or_else(|| data_dir.clone());

    let environment = match non_empty(&lookup, ENV_PLATFORM) {
        Some(value) => value
            .parse::<Environment>()
            .map_err(|message| ConfigError::InvalidValue { key: ENV_PLATFORM, message })?,
        None => file.platform.unwrap_or_else(Environment::detect),
    };
    let backup_format = match non_empty(&lookup, ENV_BACKUP_FORMAT) {
        Some(value) => value
            .parse::<FormatPreference>()
            .map_err(|message| ConfigError::InvalidValue { key: ENV_BACKUP_FORMAT, message })?,
        None => file.backup_format.unwrap_or_default(),
    };
    let log_json = match non_empty(&lookup, ENV_LOG_JSON) {
        Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::InvalidValue {
            key: ENV_LOG_JSON,
            message: format!("expected a boolean, got {}", value),
        })?,
        None => file.log_json.unwrap_or(false),
    };

    Ok(AppConfig { data_dir, export_dir, environment, backup_format, log_json })
}

/// Per-user data directory.
pub fn default_data_dir<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    #[cfg(target_os = "windows")]
    {
        lookup("LOCALAPPDATA")
            .or_else(|| lookup("APPDATA"))
            .map(|dir| PathBuf::from(dir).join(APP_DIR_NAME))
    }

    #[cfg(not(target_os = "windows"))]
    {
        lookup("HOME").map(|home| PathBuf::from(home).join(".config").join(APP_DIR_NAME))
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let file = toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), "Loaded config file");
    Ok(file)
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
