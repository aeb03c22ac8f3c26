// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Versioned score persistence.
//!
//! - `category`: the six drill modes and their storage keys
//! - `score_types`: records, the ranked category table, the database wrapper
//! - `store`: loading with legacy migration, ranked mutation, atomic save

pub mod category;
pub mod score_types;
pub mod store;

pub use category::{Category, UnknownCategory};
pub use score_types::{
    CategoryTable, ScoreDatabase, ScoreRecord, APP_VERSION, DEFAULT_PLAYER_NAME, LEGACY_FILENAME,
    MAX_ENTRIES, SCHEMA_FILENAME, SCHEMA_VERSION,
};
pub use store::{LoadSource, RecordOutcome, ScoreStore, StoreConfig, StoreError};
