// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! One completion slot per transfer direction.

use tokio::sync::oneshot;

use super::transfer_types::*;

struct Slot {
    sender: oneshot::Sender<TransferOutcome>,
    staged: Option<Vec<u8>>,
}

/// A request taken out of its slot, ready to be resolved.
pub struct Claimed {
    pub kind: TransferKind,
    /// Bytes staged by an export request.
    pub staged: Option<Vec<u8>>,
    sender: oneshot::Sender<TransferOutcome>,
}

impl Claimed {
    /// Deliver the outcome. A caller that stopped waiting is not an error.
    pub fn finish(self, outcome: TransferOutcome) {
        tracing::debug!(kind = %self.kind, outcome = outcome.as_str(), "Transfer resolved");
        if self.sender.send(outcome).is_err() {
            tracing::debug!(kind = %self.kind, "Transfer requester no longer waiting");
        }
    }
}

/// Outstanding export and import requests.
#[derive(Default)]
pub struct RequestSlots {
    export: Option<Slot>,
    import: Option<Slot>,
}

impl RequestSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy the slot for `kind`. Fails while a live request holds it; a
    /// slot whose requester has gone away is reclaimed.
    pub fn open(&mut self, kind: TransferKind, staged: Option<Vec<u8>>) -> Result<PendingTransfer, TransferError> {
        let slot = self.slot_mut(kind);
        if let Some(existing) = slot {
            if !existing.sender.is_closed() {
                return Err(TransferError::RequestPending(kind));
            }
            tracing::debug!(kind = %kind, "Reclaiming abandoned transfer slot");
        }
        let (sender, receiver) = oneshot::channel();
        *slot = Some(Slot { sender, staged });
        Ok(PendingTransfer::new(kind.token(), receiver))
    }

    /// Take the request matching `token`, if one is outstanding.
    pub fn claim(&mut self, token: RequestToken) -> Option<Claimed> {
        let kind = token.kind()?;
        let slot = self.slot_mut(kind).take()?;
        Some(Claimed { kind, staged: slot.staged, sender: slot.sender })
    }

    /// Resolve the request for `token`. Returns false for stale or unknown tokens.
    pub fn resolve(&mut self, token: RequestToken, outcome: TransferOutcome) -> bool {
        match self.claim(token) {
            Some(claimed) => {
                claimed.finish(outcome);
                true
            }
            None => false,
        }
    }

    /// Drop an outstanding request without an outcome.
    pub fn abort(&mut self, kind: TransferKind) {
        *self.slot_mut(kind) = None;
    }

    pub fn state(&self, kind: TransferKind) -> TransferState {
        let slot = match kind {
            TransferKind::Export => &self.export,
            TransferKind::Import => &self.import,
        };
        if slot.is_some() {
            TransferState::Requested
        } else {
            TransferState::Idle
        }
    }

    fn slot_mut(&mut self, kind: TransferKind) -> &mut Option<Slot> {
        match kind {
            TransferKind::Export => &mut self.export,
            TransferKind::Import => &mut self.import,
        }
    }
}

#[cfg(test)]
#[path = "slots_tests.rs"]
mod tests;
