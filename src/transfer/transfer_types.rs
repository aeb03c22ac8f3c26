// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tokens, outcomes, errors and environments for transfer requests.

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::oneshot;

/// Direction of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferKind {
    Export,
    Import,
}

impl TransferKind {
    pub fn token(&self) -> RequestToken {
        match self {
            TransferKind::Export => RequestToken::EXPORT,
            TransferKind::Import => RequestToken::IMPORT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferKind::Export => "export",
            TransferKind::Import => "import",
        }
    }
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Correlates a picker request with the host callback that resolves it.
///
/// Each direction has one fixed token, so at most one request per direction
/// can be in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u32);

impl RequestToken {
    pub const EXPORT: RequestToken = RequestToken(1101);
    pub const IMPORT: RequestToken = RequestToken(1102);

    /// Wrap a request code handed back by the host.
    pub fn from_code(code: u32) -> Self {
        Self(code)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    pub fn kind(&self) -> Option<TransferKind> {
        match *self {
            RequestToken::EXPORT => Some(TransferKind::Export),
            RequestToken::IMPORT => Some(TransferKind::Import),
            _ => None,
        }
    }
}

impl std::fmt::Display for RequestToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("An {0} request is already pending")]
    RequestPending(TransferKind),
    #[error("File picker could not be opened: {0}")]
    LaunchFailed(String),
    #[error("No import source selected")]
    NoSource,
    #[error("Transfer abandoned before completion")]
    Abandoned,
    #[error("Platform bridge missing for {0}")]
    BridgeMissing(Environment),
}

/// Terminal result of a transfer request.
#[derive(Debug)]
pub enum TransferOutcome {
    Exported { destination: String },
    Imported { bytes: Vec<u8>, source: String },
    /// The user dismissed the picker or chose nothing. Not an error.
    Cancelled,
    Failed(TransferError),
}

impl TransferOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferOutcome::Exported { .. } => "exported",
            TransferOutcome::Imported { .. } => "imported",
            TransferOutcome::Cancelled => "cancelled",
            TransferOutcome::Failed(_) => "failed",
        }
    }
}

/// Per-direction request state. A resolved request returns to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferState {
    Idle,
    Requested,
}

/// Handle to an outstanding request: its token and a single-slot completion
/// channel.
#[derive(Debug)]
pub struct PendingTransfer {
    token: RequestToken,
    receiver: oneshot::Receiver<TransferOutcome>,
}

impl PendingTransfer {
    pub(crate) fn new(token: RequestToken, receiver: oneshot::Receiver<TransferOutcome>) -> Self {
        Self { token, receiver }
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    /// Wait for the outcome. There is no timeout: a picker waits on the user.
    pub async fn outcome(self) -> TransferOutcome {
        self.receiver
            .await
            .unwrap_or(TransferOutcome::Failed(TransferError::Abandoned))
    }

    /// Non-blocking check, `None` while the request is still outstanding.
    pub fn try_outcome(&mut self) -> Option<TransferOutcome> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(TransferOutcome::Failed(TransferError::Abandoned))
            }
        }
    }
}

/// Host environment, chosen once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    /// Direct file I/O.
    Desktop,
    /// Intent-based document provider with resolver streams.
    ContentProvider,
    /// Document picker handing back security-scoped file URLs.
    DocumentPicker,
}

impl Environment {
    /// Pick the environment for the compilation target.
    pub fn detect() -> Self {
        if cfg!(target_os = "android") {
            Environment::ContentProvider
        } else if cfg!(target_os = "ios") {
            Environment::DocumentPicker
        } else {
            Environment::Desktop
        }
    }

    pub fn is_mediated(&self) -> bool {
        !matches!(self, Environment::Desktop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Desktop => "desktop",
            Environment::ContentProvider => "content-provider",
            Environment::DocumentPicker => "document-picker",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "desktop" => Ok(Environment::Desktop),
            "content-provider" | "android" => Ok(Environment::ContentProvider),
            "document-picker" | "ios" => Ok(Environment::DocumentPicker),
            other => Err(format!("Unknown platform: {}", other)),
        }
    }
}
