// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! JonTrain core: score persistence and encrypted backups.
//!
//! Scores live in a versioned JSON file owned by [`scores::ScoreStore`].
//! Backups are sealed by [`backup::BackupCodec`] and moved in and out of the
//! app through a platform [`transfer::TransferGateway`]. [`service::BackupService`]
//! ties the three together for a front end.

pub mod backup;
pub mod cli;
pub mod config;
pub mod marshal;
pub mod scores;
pub mod service;
pub mod telemetry;
pub mod transfer;

pub use backup::{BackupCodec, BackupError, CryptoBackend, FormatPreference};
pub use config::{AppConfig, ConfigError};
pub use scores::{Category, ScoreDatabase, ScoreRecord, ScoreStore, StoreConfig, StoreError};
pub use service::{BackupService, BackupStatus, SharedGateway};
pub use transfer::{Environment, TransferGateway, TransferOutcome};
