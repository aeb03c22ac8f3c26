// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backup service: ties the score store, the codec and the gateway together.
//!
//! The store sits behind a single mutex. Key derivation and cipher work run
//! on the blocking pool; the store is only touched after a backup has been
//! fully decrypted and validated.

use std::sync::Arc;

use chrono::Local;
use parking_lot::Mutex;

use crate::backup::{BackupCodec, BackupError, EncryptedContainer};
use crate::scores::{Category, RecordOutcome, ScoreDatabase, ScoreRecord, ScoreStore, StoreError};
use crate::telemetry::{log_backup_event, BackupEvent};
use crate::transfer::{TransferGateway, TransferKind, TransferOutcome};

/// Gateway handle shared with the host, which delivers picker results.
pub type SharedGateway = Arc<Mutex<Box<dyn TransferGateway>>>;

/// Result of an export or import, with the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupStatus {
    Exported { destination: String },
    Imported { records: usize },
    Cancelled,
    /// No encryption backend in this build.
    Unavailable(TransferKind),
    ExportFailed(String),
    ImportFailed(String),
}

impl BackupStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, BackupStatus::Exported { .. } | BackupStatus::Imported { .. })
    }
}

impl std::fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupStatus::Exported { destination } => write!(f, "Backup gespeichert:\n{}", destination),
            BackupStatus::Imported { .. } => f.write_str("Import erfolgreich. Highscores übernommen."),
            BackupStatus::Cancelled => f.write_str("Abgebrochen."),
            BackupStatus::Unavailable(TransferKind::Export) => {
                f.write_str("Export nicht möglich: keine Verschlüsselung verfügbar.")
            }
            BackupStatus::Unavailable(TransferKind::Import) => {
                f.write_str("Import nicht möglich: keine Verschlüsselung verfügbar.")
            }
            BackupStatus::ExportFailed(e) => write!(f, "Export-Fehler: {}", e),
            BackupStatus::ImportFailed(e) => write!(f, "Import-Fehler: {}", e),
        }
    }
}

pub struct BackupService {
    store: Arc<Mutex<ScoreStore>>,
    codec: Arc<BackupCodec>,
    gateway: SharedGateway,
}

impl BackupService {
    pub fn new(store: ScoreStore, codec: BackupCodec, gateway: Box<dyn TransferGateway>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            codec: Arc::new(codec),
            gateway: Arc::new(Mutex::new(gateway)),
        }
    }

    /// Handle for delivering host picker callbacks.
    pub fn gateway(&self) -> SharedGateway {
        Arc::clone(&self.gateway)
    }

    pub fn codec(&self) -> &BackupCodec {
        &self.codec
    }

    /// Current database, cloned out of the lock.
    pub fn snapshot(&self) -> ScoreDatabase {
        self.store.lock().database().clone()
    }

    pub fn scores(&self, category: Category) -> Vec<ScoreRecord> {
        self.store.lock().scores(category).to_vec()
    }

    /// Record a finished round. A blank name becomes the default player name.
    pub fn record_result(&self, category: Category, name: &str, points: u64) -> Result<RecordOutcome, StoreError> {
        let record = ScoreRecord::new(name, points, Local::now());
        self.store.lock().record_result(category, record)
    }

    /// Seal the current scores and hand them to the gateway.
    pub async fn export(&self) -> BackupStatus {
        if self.codec.backend().is_none() {
            return unavailable(TransferKind::Export);
        }

        let snapshot = self.snapshot();
        let codec = Arc::clone(&self.codec);
        let sealed = match tokio::task::spawn_blocking(move || codec.export(&snapshot)).await {
            Ok(result) => result,
            Err(e) => return export_failed(e.to_string()),
        };
        let container = match sealed {
            Ok(container) => container,
            Err(BackupError::NoCryptoBackend) => return unavailable(TransferKind::Export),
            Err(e) => return export_failed(e.to_string()),
        };
        let fingerprint = container.fingerprint();

        let name = self.codec.suggested_file_name(Local::now());
        let requested = self.gateway.lock().request_export(&name, self.codec.mime_hint(), container.into_bytes());
        let pending = match requested {
            Ok(pending) => pending,
            Err(e) => return export_failed(e.to_string()),
        };

        match pending.outcome().await {
            TransferOutcome::Exported { destination } => {
                log_backup_event(
                    BackupEvent::ExportCompleted,
                    "Backup exported",
                    &[("destination", &destination), ("fingerprint", &fingerprint)],
                );
                BackupStatus::Exported { destination }
            }
            TransferOutcome::Cancelled => cancelled(TransferKind::Export),
            TransferOutcome::Failed(e) => export_failed(e.to_string()),
            TransferOutcome::Imported { .. } => export_failed("unexpected transfer result".to_string()),
        }
    }

    /// Ask the gateway for a backup and restore it.
    pub async fn import(&self) -> BackupStatus {
        if !self.codec.can_decrypt() {
            return unavailable(TransferKind::Import);
        }

        let requested = self.gateway.lock().request_import();
        let pending = match requested {
            Ok(pending) => pending,
            Err(e) => return import_failed(e.to_string()),
        };

        match pending.outcome().await {
            TransferOutcome::Imported { bytes, source } => {
                tracing::info!(source = %source, size = bytes.len(), "Backup received");
                self.import_bytes(bytes).await
            }
            TransferOutcome::Cancelled => cancelled(TransferKind::Import),
            TransferOutcome::Failed(e) => import_failed(e.to_string()),
            TransferOutcome::Exported { .. } => import_failed("unexpected transfer result".to_string()),
        }
    }

    /// Decrypt, validate and apply backup bytes. The store is replaced only
    /// after every check has passed.
    pub async fn import_bytes(&self, bytes: Vec<u8>) -> BackupStatus {
        let fingerprint = EncryptedContainer::from_bytes(bytes.clone()).fingerprint();
        let codec = Arc::clone(&self.codec);
        let decoded = match tokio::task::spawn_blocking(move || codec.import(bytes)).await {
            Ok(result) => result,
            Err(e) => return import_failed(e.to_string()),
        };
        let db = match decoded {
            Ok(db) => db,
            Err(BackupError::NoCryptoBackend) => return unavailable(TransferKind::Import),
            Err(e) => {
                log_backup_event(
                    BackupEvent::BackupRejected,
                    "Backup rejected",
                    &[("reason", &e.to_string()), ("fingerprint", &fingerprint)],
                );
                return BackupStatus::ImportFailed(e.to_string());
            }
        };

        let records = db.data.total_records();
        let applied = self.store.lock().replace(db.data);
        match applied {
            Ok(()) => {
                log_backup_event(
                    BackupEvent::ImportCompleted,
                    "Backup imported",
                    &[("records", &records.to_string()), ("fingerprint", &fingerprint)],
                );
                BackupStatus::Imported { records }
            }
            Err(e) => import_failed(e.to_string()),
        }
    }
}

fn unavailable(kind: TransferKind) -> BackupStatus {
    log_backup_event(BackupEvent::BackendUnavailable, "No encryption backend", &[("kind", kind.as_str())]);
    BackupStatus::Unavailable(kind)
}

fn cancelled(kind: TransferKind) -> BackupStatus {
    log_backup_event(BackupEvent::TransferCancelled, "Transfer cancelled", &[("kind", kind.as_str())]);
    BackupStatus::Cancelled
}

fn export_failed(reason: String) -> BackupStatus {
    log_backup_event(BackupEvent::TransferFailed, "Export failed", &[("reason", &reason)]);
    BackupStatus::ExportFailed(reason)
}

fn import_failed(reason: String) -> BackupStatus {
    log_backup_event(BackupEvent::TransferFailed, "Import failed", &[("reason", &reason)]);
    BackupStatus::ImportFailed(reason)
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
