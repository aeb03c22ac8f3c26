// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Logging setup and structured backup events.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Logging already initialised: {0}")]
    Init(String),
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` overrides
/// the default filter.
pub fn init_logging(json: bool) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(false)
            .boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).with_target(false).boxed()
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))
}

/// Backup lifecycle events worth a structured log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupEvent {
    ExportCompleted,
    ImportCompleted,
    TransferCancelled,
    TransferFailed,
    BackupRejected,
    BackendUnavailable,
}

impl BackupEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupEvent::ExportCompleted => "export_completed",
            BackupEvent::ImportCompleted => "import_completed",
            BackupEvent::TransferCancelled => "transfer_cancelled",
            BackupEvent::TransferFailed => "transfer_failed",
            BackupEvent::BackupRejected => "backup_rejected",
            BackupEvent::BackendUnavailable => "backend_unavailable",
        }
    }

    fn is_warning(&self) -> bool {
        matches!(
            self,
            BackupEvent::TransferFailed | BackupEvent::BackupRejected | BackupEvent::BackendUnavailable
        )
    }
}

/// Log a backup event with extra `key=value` details.
pub fn log_backup_event(event: BackupEvent, message: &str, fields: &[(&str, &str)]) {
    let details = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    if event.is_warning() {
        tracing::warn!(target: "jontrain::backup", event = event.as_str(), details = %details, "{}", message);
    } else {
        tracing::info!(target: "jontrain::backup", event = event.as_str(), details = %details, "{}", message);
    }
}
