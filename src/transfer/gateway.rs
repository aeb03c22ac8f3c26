// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! The transfer gateway seam and its per-environment selection.

use std::path::PathBuf;

use super::desktop::DesktopGateway;
use super::mediated::{MediatedGateway, PickerResponse, PlatformBridge};
use super::transfer_types::*;

/// Moves backup bytes between the app and a user-chosen location.
///
/// A request returns immediately with a [`PendingTransfer`]; the outcome
/// arrives once the user has picked, or cancelled, a location.
pub trait TransferGateway: Send {
    fn environment(&self) -> Environment;

    /// Offer `bytes` for saving under `suggested_name`.
    fn request_export(
        &mut self,
        suggested_name: &str,
        mime_hint: &str,
        bytes: Vec<u8>,
    ) -> Result<PendingTransfer, TransferError>;

    /// Ask the user for a backup file to read.
    fn request_import(&mut self) -> Result<PendingTransfer, TransferError>;

    fn state(&self, kind: TransferKind) -> TransferState;

    /// Host callback for a finished picker. Returns false when no request
    /// matches `token`.
    fn on_picker_result(&mut self, token: RequestToken, response: PickerResponse) -> bool {
        drop(response);
        tracing::debug!(token = %token, environment = %self.environment(), "Picker result without a picker");
        false
    }
}

/// Build the gateway for `environment`. Mediated environments need the
/// host's bridge.
pub fn select_gateway(
    environment: Environment,
    export_dir: PathBuf,
    bridge: Option<Box<dyn PlatformBridge>>,
) -> Result<Box<dyn TransferGateway>, TransferError> {
    tracing::info!(environment = %environment, "Selecting transfer gateway");
    match (environment, bridge) {
        (Environment::Desktop, _) => Ok(Box::new(DesktopGateway::new(export_dir))),
        (env, Some(bridge)) => Ok(Box::new(MediatedGateway::new(env, bridge))),
        (env, None) => Err(TransferError::BridgeMissing(env)),
    }
}
