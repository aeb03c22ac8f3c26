// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Platform file transfer.
//!
//! - `transfer_types`: tokens, outcomes, errors, environments
//! - `slots`: single outstanding request per direction
//! - `gateway`: the `TransferGateway` seam and its selection
//! - `desktop`: direct file I/O
//! - `mediated`: host pickers with content streams or scoped files
//! - `stream`: chunked copies over signed-byte host streams

pub mod desktop;
pub mod gateway;
pub mod mediated;
pub mod slots;
pub mod stream;
pub mod transfer_types;

pub use desktop::DesktopGateway;
pub use gateway::{select_gateway, TransferGateway};
pub use mediated::{
    ContentDocument, MediatedGateway, PickerResponse, PlatformBridge, ScopedFile, IMPORT_MIME_FILTER,
};
pub use slots::RequestSlots;
pub use stream::{ForeignInputStream, ForeignOutputStream, CHUNK_SIZE};
pub use transfer_types::{
    Environment, PendingTransfer, RequestToken, TransferError, TransferKind, TransferOutcome,
    TransferState,
};
