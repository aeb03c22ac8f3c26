// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Score store: load with migration, ranked mutation, atomic save.
//!
//! The store is the single owner of the live `ScoreDatabase`. Every mutation
//! builds a candidate table, writes it to disk, and only then swaps it in, so
//! a failed write leaves the in-memory state exactly as it was.

use chrono::Local;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::category::Category;
use super::score_types::*;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where the store reads and writes its files.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// Checked in order when the current-schema file is unusable.
    pub legacy_paths: Vec<PathBuf>,
}

impl StoreConfig {
    /// Standard layout: the schema file in `data_dir`, legacy files in the
    /// working directory and in `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let mut legacy_paths = Vec::with_capacity(2);
        if let Ok(cwd) = std::env::current_dir() {
            legacy_paths.push(cwd.join(LEGACY_FILENAME));
        }
        legacy_paths.push(data_dir.join(LEGACY_FILENAME));
        Self { data_dir, legacy_paths }
    }

    pub fn with_legacy_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.legacy_paths = paths;
        self
    }

    pub fn score_path(&self) -> PathBuf {
        self.data_dir.join(SCHEMA_FILENAME)
    }
}

/// Where the loaded database came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    Current,
    LegacyBare(PathBuf),
    LegacyWrapped(PathBuf),
    Fresh,
}

impl LoadSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadSource::Current => "current",
            LoadSource::LegacyBare(_) => "legacy_bare",
            LoadSource::LegacyWrapped(_) => "legacy_wrapped",
            LoadSource::Fresh => "fresh",
        }
    }
}

/// Result of recording a finished round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordOutcome {
    /// 1-based rank of the new record, `None` if it did not make the list.
    pub rank: Option<usize>,
    /// The category list after ranking and truncation.
    pub entries: Vec<ScoreRecord>,
}

impl RecordOutcome {
    pub fn survived(&self) -> bool {
        self.rank.is_some()
    }
}

/// Owner of the live score database.
pub struct ScoreStore {
    config: StoreConfig,
    db: ScoreDatabase,
    source: LoadSource,
}

impl ScoreStore {
    /// Load the database, migrating legacy files or starting fresh.
    ///
    /// Anything other than a clean current-schema load is written back in the
    /// current schema right away, so migration runs at most once.
    pub fn load(config: StoreConfig) -> Self {
        let score_path = config.score_path();
        if let Some(db) = read_json(&score_path).as_ref().and_then(ScoreDatabase::from_current_json) {
            tracing::info!(path = %score_path.display(), records = db.data.total_records(), "Loaded scores");
            return Self { config, db, source: LoadSource::Current };
        }

        let (data, source) = match find_legacy(&config.legacy_paths) {
            Some((data, source)) => (data, source),
            None => (CategoryTable::default(), LoadSource::Fresh),
        };
        tracing::info!(source = source.as_str(), records = data.total_records(), "Initialising score file");

        let mut store = Self {
            db: ScoreDatabase::with_data(data.clone(), Local::now()),
            config,
            source,
        };
        if let Err(e) = store.commit(data) {
            tracing::warn!(error = %e, "Could not persist migrated scores");
        }
        store
    }

    pub fn database(&self) -> &ScoreDatabase {
        &self.db
    }

    pub fn scores(&self, category: Category) -> &[ScoreRecord] {
        self.db.data.get(category)
    }

    pub fn load_source(&self) -> &LoadSource {
        &self.source
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Persist the current database with a fresh `saved_at`.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.commit(self.db.data.clone())
    }

    /// Rank `record` into `category`, persist, and report where it landed.
    pub fn record_result(&mut self, category: Category, record: ScoreRecord) -> Result<RecordOutcome, StoreError> {
        let (data, rank) = self.db.data.with_record(category, record);
        let entries = data.get(category).to_vec();
        self.commit(data)?;
        tracing::debug!(category = %category, rank = ?rank, "Recorded result");
        Ok(RecordOutcome { rank, entries })
    }

    /// Replace every category at once. Used by backup import.
    pub fn replace(&mut self, data: CategoryTable) -> Result<(), StoreError> {
        self.commit(data)?;
        tracing::info!(records = self.db.data.total_records(), "Replaced score database");
        Ok(())
    }

    fn commit(&mut self, data: CategoryTable) -> Result<(), StoreError> {
        let candidate = ScoreDatabase::with_data(data, Local::now());
        let bytes = candidate.to_canonical_json()?;
        write_atomic(&self.config.score_path(), &bytes)?;
        self.db = candidate;
        Ok(())
    }
}

/// Write `bytes` to a temporary sibling and rename it over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io { path: path.to_path_buf(), source };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Parse a JSON file, treating a missing or unreadable file as absent.
fn read_json(path: &Path) -> Option<Value> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unparsable score file");
            None
        }
    }
}

/// First legacy file that parses as one of the two old layouts.
fn find_legacy(paths: &[PathBuf]) -> Option<(CategoryTable, LoadSource)> {
    paths.iter().find_map(|path| {
        let value = read_json(path)?;
        let obj = value.as_object()?;
        if !obj.contains_key("schema_version") && !obj.contains_key("data") {
            return Some((CategoryTable::from_json_map(obj), LoadSource::LegacyBare(path.clone())));
        }
        let data = obj.get("data")?.as_object()?;
        Some((CategoryTable::from_json_map(data), LoadSource::LegacyWrapped(path.clone())))
    })
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
