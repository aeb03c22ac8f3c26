// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-mediated gateway for mobile pickers.
//!
//! A request launches the host picker through a [`PlatformBridge`] and
//! parks in its slot. The host later reports the pick through
//! [`TransferGateway::on_picker_result`] with the same token.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::gateway::TransferGateway;
use super::slots::RequestSlots;
use super::stream::{self, ForeignInputStream, ForeignOutputStream};
use super::transfer_types::*;

/// MIME filter used when opening a backup.
pub const IMPORT_MIME_FILTER: &str = "*/*";

/// Host hooks that show the system pickers.
pub trait PlatformBridge: Send {
    fn launch_create_document(
        &mut self,
        token: RequestToken,
        suggested_name: &str,
        mime_hint: &str,
    ) -> io::Result<()>;

    fn launch_open_document(&mut self, token: RequestToken, mime_filter: &str) -> io::Result<()>;
}

/// Document handed back by a content-provider picker.
pub trait ContentDocument: Send {
    fn uri(&self) -> String;
    fn open_input(&mut self) -> io::Result<Box<dyn ForeignInputStream>>;
    fn open_output(&mut self) -> io::Result<Box<dyn ForeignOutputStream>>;
}

/// File URL handed back by a document picker. Access must be bracketed by
/// start and stop calls.
pub trait ScopedFile: Send {
    fn path(&self) -> PathBuf;
    /// Returns false when the host refused; the file may still be readable.
    fn start_access(&mut self) -> bool;
    fn stop_access(&mut self);
}

/// What the host reports when a picker closes.
pub enum PickerResponse {
    Content(Box<dyn ContentDocument>),
    ScopedFile(Box<dyn ScopedFile>),
    Cancelled,
    NothingSelected,
}

impl std::fmt::Debug for PickerResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerResponse::Content(doc) => f.debug_tuple("Content").field(&doc.uri()).finish(),
            PickerResponse::ScopedFile(file) => f.debug_tuple("ScopedFile").field(&file.path()).finish(),
            PickerResponse::Cancelled => f.write_str("Cancelled"),
            PickerResponse::NothingSelected => f.write_str("NothingSelected"),
        }
    }
}

/// Holds scoped access open until dropped.
struct ScopedAccess<'a> {
    file: &'a mut dyn ScopedFile,
    started: bool,
}

impl<'a> ScopedAccess<'a> {
    fn begin(file: &'a mut dyn ScopedFile) -> Self {
        let started = file.start_access();
        if !started {
            tracing::debug!(path = %file.path().display(), "Scoped access not granted, trying anyway");
        }
        Self { file, started }
    }

    fn path(&self) -> PathBuf {
        self.file.path()
    }
}

impl Drop for ScopedAccess<'_> {
    fn drop(&mut self) {
        if self.started {
            self.file.stop_access();
        }
    }
}

pub struct MediatedGateway {
    environment: Environment,
    bridge: Box<dyn PlatformBridge>,
    slots: RequestSlots,
}

impl MediatedGateway {
    pub fn new(environment: Environment, bridge: Box<dyn PlatformBridge>) -> Self {
        Self { environment, bridge, slots: RequestSlots::new() }
    }

    fn launch_failed(&mut self, kind: TransferKind, e: io::Error) -> TransferError {
        self.slots.abort(kind);
        tracing::warn!(kind = %kind, error = %e, "Picker launch failed");
        TransferError::LaunchFailed(e.to_string())
    }
}

impl TransferGateway for MediatedGateway {
    fn environment(&self) -> Environment {
        self.environment
    }

    fn request_export(
        &mut self,
        suggested_name: &str,
        mime_hint: &str,
        bytes: Vec<u8>,
    ) -> Result<PendingTransfer, TransferError> {
        let pending = self.slots.open(TransferKind::Export, Some(bytes))?;
        if let Err(e) = self.bridge.launch_create_document(pending.token(), suggested_name, mime_hint) {
            return Err(self.launch_failed(TransferKind::Export, e));
        }
        Ok(pending)
    }

    fn request_import(&mut self) -> Result<PendingTransfer, TransferError> {
        let pending = self.slots.open(TransferKind::Import, None)?;
        if let Err(e) = self.bridge.launch_open_document(pending.token(), IMPORT_MIME_FILTER) {
            return Err(self.launch_failed(TransferKind::Import, e));
        }
        Ok(pending)
    }

    fn state(&self, kind: TransferKind) -> TransferState {
        self.slots.state(kind)
    }

    fn on_picker_result(&mut self, token: RequestToken, response: PickerResponse) -> bool {
        let Some(claimed) = self.slots.claim(token) else {
            tracing::debug!(token = %token, response = ?response, "Ignoring picker result with no outstanding request");
            return false;
        };

        let outcome = match (claimed.kind, response) {
            (_, PickerResponse::Cancelled | PickerResponse::NothingSelected) => TransferOutcome::Cancelled,
            (TransferKind::Export, PickerResponse::Content(mut doc)) => {
                export_to_content(doc.as_mut(), claimed.staged.as_deref().unwrap_or_default())
            }
            (TransferKind::Export, PickerResponse::ScopedFile(mut file)) => {
                export_to_scoped(file.as_mut(), claimed.staged.as_deref().unwrap_or_default())
            }
            (TransferKind::Import, PickerResponse::Content(mut doc)) => import_from_content(doc.as_mut()),
            (TransferKind::Import, PickerResponse::ScopedFile(mut file)) => import_from_scoped(file.as_mut()),
        };
        claimed.finish(outcome);
        true
    }
}

fn export_to_content(doc: &mut dyn ContentDocument, bytes: &[u8]) -> TransferOutcome {
    let result = doc.open_output().and_then(|mut out| stream::write_all(out.as_mut(), bytes));
    match result {
        Ok(()) => TransferOutcome::Exported { destination: doc.uri() },
        Err(e) => TransferOutcome::Failed(TransferError::Io(e)),
    }
}

fn import_from_content(doc: &mut dyn ContentDocument) -> TransferOutcome {
    let result = doc.open_input().and_then(|mut input| stream::read_to_end(input.as_mut()));
    match result {
        Ok(bytes) => TransferOutcome::Imported { bytes, source: doc.uri() },
        Err(e) => TransferOutcome::Failed(TransferError::Io(e)),
    }
}

fn export_to_scoped(file: &mut dyn ScopedFile, bytes: &[u8]) -> TransferOutcome {
    let access = ScopedAccess::begin(file);
    let path = access.path();
    match fs::write(&path, bytes) {
        Ok(()) => TransferOutcome::Exported { destination: path.display().to_string() },
        Err(e) => TransferOutcome::Failed(TransferError::Io(e)),
    }
}

fn import_from_scoped(file: &mut dyn ScopedFile) -> TransferOutcome {
    let access = ScopedAccess::begin(file);
    let path = access.path();
    match fs::read(&path) {
        Ok(bytes) => TransferOutcome::Imported { bytes, source: path.display().to_string() },
        Err(e) => TransferOutcome::Failed(TransferError::Io(e)),
    }
}

#[cfg(test)]
#[path = "mediated_tests.rs"]
mod tests;
