// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Desktop gateway: plain file I/O, resolved before the request returns.

use std::fs;
use std::path::{Path, PathBuf};

use super::gateway::TransferGateway;
use super::slots::RequestSlots;
use super::transfer_types::*;

pub struct DesktopGateway {
    export_dir: PathBuf,
    import_source: Option<PathBuf>,
    slots: RequestSlots,
}

impl DesktopGateway {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self { export_dir: export_dir.into(), import_source: None, slots: RequestSlots::new() }
    }

    /// File read by the next import request.
    pub fn with_import_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.import_source = Some(path.into());
        self
    }

    pub fn set_import_source(&mut self, path: Option<PathBuf>) {
        self.import_source = path;
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    fn write_export(&self, suggested_name: &str, bytes: &[u8]) -> TransferOutcome {
        // Keep only the final component so a name cannot leave the export dir.
        let name = Path::new(suggested_name)
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("jontrain-highscores.backup"));
        let destination = self.export_dir.join(name);
        let result = fs::create_dir_all(&self.export_dir).and_then(|_| fs::write(&destination, bytes));
        match result {
            Ok(()) => TransferOutcome::Exported { destination: destination.display().to_string() },
            Err(e) => TransferOutcome::Failed(TransferError::Io(e)),
        }
    }

    fn read_import(&self) -> TransferOutcome {
        let Some(path) = &self.import_source else {
            return TransferOutcome::Failed(TransferError::NoSource);
        };
        match fs::read(path) {
            Ok(bytes) => TransferOutcome::Imported { bytes, source: path.display().to_string() },
            Err(e) => TransferOutcome::Failed(TransferError::Io(e)),
        }
    }
}

impl TransferGateway for DesktopGateway {
    fn environment(&self) -> Environment {
        Environment::Desktop
    }

    fn request_export(
        &mut self,
        suggested_name: &str,
        _mime_hint: &str,
        bytes: Vec<u8>,
    ) -> Result<PendingTransfer, TransferError> {
        let pending = self.slots.open(TransferKind::Export, None)?;
        let outcome = self.write_export(suggested_name, &bytes);
        self.slots.resolve(pending.token(), outcome);
        Ok(pending)
    }

    fn request_import(&mut self) -> Result<PendingTransfer, TransferError> {
        let pending = self.slots.open(TransferKind::Import, None)?;
        let outcome = self.read_import();
        self.slots.resolve(pending.token(), outcome);
        Ok(pending)
    }

    fn state(&self, kind: TransferKind) -> TransferState {
        self.slots.state(kind)
    }
}

#[cfg(test)]
#[path = "desktop_tests.rs"]
mod tests;
