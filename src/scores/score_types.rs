// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Score records, the per-category ranking table and the versioned database.

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::category::Category;

/// Schema tag written into every score file and backup.
pub const SCHEMA_VERSION: &str = "1.0";
/// Score file name for the current schema; also the archive entry name.
pub const SCHEMA_FILENAME: &str = "highscores_schema_1.0.json";
/// Score file name used before the schema wrapper existed.
pub const LEGACY_FILENAME: &str = "highscores.json";
/// Application version stamped into records and files.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Entries kept per category.
pub const MAX_ENTRIES: usize = 10;
/// Name used when a player leaves the name field blank.
pub const DEFAULT_PLAYER_NAME: &str = "Anonym";

const RECORD_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";
const SAVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One saved result.
///
/// Records migrated from old files may carry no version fields; those stay
/// absent when the record is written back. Fields this version does not know
/// are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "whole_points")]
    pub points: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Points as a non-negative integer. Whole floats such as `5.0` are accepted.
fn whole_points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let points = match &value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        _ => None,
    };
    points.ok_or_else(|| serde::de::Error::custom(format!("invalid points value: {}", value)))
}

impl ScoreRecord {
    /// Build a record for a finished round, stamped with the running versions.
    pub fn new(name: &str, points: u64, at: DateTime<Local>) -> Self {
        let name = name.trim();
        Self {
            name: if name.is_empty() { DEFAULT_PLAYER_NAME.to_string() } else { name.to_string() },
            points,
            date: at.format(RECORD_DATE_FORMAT).to_string(),
            app_version: Some(APP_VERSION.to_string()),
            schema_version: Some(SCHEMA_VERSION.to_string()),
            extra: Map::new(),
        }
    }
}

/// Top-ranked records per category.
///
/// Keys are `Category` values, so an unknown category can never be stored.
/// Every list is sorted by points descending and holds at most `MAX_ENTRIES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryTable(BTreeMap<Category, Vec<ScoreRecord>>);

impl Default for CategoryTable {
    fn default() -> Self {
        Self(Category::ALL.iter().map(|&c| (c, Vec::new())).collect())
    }
}

impl CategoryTable {
    /// Merge a loosely typed `data` object into a fresh table.
    ///
    /// Unknown keys are dropped, non-list values leave the category empty and
    /// entries that cannot be read as records are skipped.
    pub fn from_json_map(map: &Map<String, Value>) -> Self {
        let mut table = Self::default();
        for (key, value) in map {
            let Some(category) = Category::from_key(key) else {
                tracing::debug!(key = %key, "Dropping unknown category");
                continue;
            };
            let Some(entries) = value.as_array() else {
                tracing::warn!(category = %category, "Category value is not a list, treating as empty");
                continue;
            };
            let mut records: Vec<ScoreRecord> = Vec::with_capacity(entries.len());
            for entry in entries {
                match ScoreRecord::deserialize(entry) {
                    Ok(record) => records.push(record),
                    Err(e) => {
                        tracing::warn!(category = %category, error = %e, "Skipping unreadable score entry")
                    }
                }
            }
            table.0.insert(category, rank(records));
        }
        table
    }

    pub fn get(&self, category: Category) -> &[ScoreRecord] {
        self.0.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[ScoreRecord])> {
        self.0.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    pub fn total_records(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Return a copy of this table with `record` ranked into `category`,
    /// together with the record's 1-based rank if it survived truncation.
    pub fn with_record(&self, category: Category, record: ScoreRecord) -> (Self, Option<usize>) {
        let mut next = self.clone();
        let list = next.0.entry(category).or_default();
        // Stable sort keeps earlier entries ahead of a tie.
        let position = list.iter().filter(|e| e.points >= record.points).count();
        list.push(record);
        *list = rank(std::mem::take(list));
        let placed = (position < MAX_ENTRIES).then_some(position + 1);
        (next, placed)
    }
}

/// Stable sort descending by points, then keep the top entries.
fn rank(mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| b.points.cmp(&a.points));
    records.truncate(MAX_ENTRIES);
    records
}

/// The authoritative, versioned score state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreDatabase {
    pub schema_version: String,
    pub app_version: String,
    pub saved_at: String,
    pub data: CategoryTable,
}

impl Default for ScoreDatabase {
    fn default() -> Self {
        Self::with_data(CategoryTable::default(), Local::now())
    }
}

impl ScoreDatabase {
    /// Wrap `data` under the current schema, stamped at `at`.
    pub fn with_data(data: CategoryTable, at: DateTime<Local>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            app_version: APP_VERSION.to_string(),
            saved_at: at.format(SAVED_AT_FORMAT).to_string(),
            data,
        }
    }

    /// Read a current-schema document. Returns `None` unless the schema tag
    /// matches exactly and `data` is an object.
    pub fn from_current_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        if obj.get("schema_version").and_then(Value::as_str) != Some(SCHEMA_VERSION) {
            return None;
        }
        let data = obj.get("data")?.as_object()?;
        Some(Self {
            schema_version: SCHEMA_VERSION.to_string(),
            app_version: string_field(obj, "app_version").unwrap_or_else(|| APP_VERSION.to_string()),
            saved_at: string_field(obj, "saved_at").unwrap_or_default(),
            data: CategoryTable::from_json_map(data),
        })
    }

    /// Canonical bytes: pretty JSON with four-space indentation, keys in a
    /// fixed order, non-ASCII characters kept literal.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
#[path = "score_types_tests.rs"]
mod tests;
