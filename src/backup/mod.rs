// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Encrypted score backups.
//!
//! - `backup_types`: payload and container types, constants, errors
//! - `codec`: canonical encoding, schema validation, backend strategy
//! - `raw_cipher`: `JTBK1` AES-256-GCM containers (feature `raw-cipher`)
//! - `archive`: password-protected zip containers (feature `archive`)

pub mod backup_types;
pub mod codec;

#[cfg(feature = "archive")]
pub mod archive;
#[cfg(feature = "raw-cipher")]
pub mod raw_cipher;

pub use backup_types::{
    BackupError, BackupPayload, ContainerVariant, EncryptedContainer, BACKUP_PASSWORD, MAX_PAYLOAD_SIZE,
    PBKDF2_ITERATIONS, RAW_HEADER_SIZE, RAW_MAGIC,
};
pub use codec::{BackupCodec, CryptoBackend, FormatPreference};
#[cfg(feature = "raw-cipher")]
pub use raw_cipher::RawCipher;
