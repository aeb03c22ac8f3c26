// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Types, constants and errors shared by the backup containers.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Password for every backup container.
///
/// This is a fixed application constant, so anyone holding the binary can open
/// a backup. It keeps casual edits out of exported files; it is not a secret.
pub const BACKUP_PASSWORD: &str = "JonTrain-Extrasicher";

/// Leading bytes of a raw container.
pub const RAW_MAGIC: &[u8; 5] = b"JTBK1";
/// Salt size (128 bits)
pub const SALT_SIZE: usize = 16;
/// Nonce size (96 bits for GCM)
pub const NONCE_SIZE: usize = 12;
/// Tag size (128 bits)
pub const TAG_SIZE: usize = 16;
/// Encryption key size (256 bits)
pub const KEY_SIZE: usize = 32;
/// Bytes before the ciphertext in a raw container.
pub const RAW_HEADER_SIZE: usize = RAW_MAGIC.len() + SALT_SIZE + NONCE_SIZE + TAG_SIZE;
/// PBKDF2-HMAC-SHA256 iterations for raw containers.
pub const PBKDF2_ITERATIONS: u32 = 200_000;
/// Largest payload an archive entry may expand to.
pub const MAX_PAYLOAD_SIZE: u64 = 16 * 1024 * 1024;

/// Local file header signature of a zip archive.
pub const ZIP_MAGIC: &[u8; 4] = b"PK\x03\x04";

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup unavailable: no encryption backend")]
    NoCryptoBackend,
    #[error("Invalid backup: {0}")]
    InvalidContainer(String),
    #[error("Backup could not be authenticated (wrong password or damaged file)")]
    AuthenticationFailure,
    #[error("Schema incompatible: backup {found} / app {expected}")]
    SchemaMismatch { found: String, expected: String },
    #[error("Backup format not recognised: {0}")]
    MalformedPayload(String),
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

/// The two container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerVariant {
    /// Password-protected zip with a single entry.
    Archive,
    /// `MAGIC ‖ salt ‖ nonce ‖ tag ‖ ciphertext`
    Raw,
}

impl ContainerVariant {
    /// Identify a container from its leading bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(RAW_MAGIC) {
            Some(ContainerVariant::Raw)
        } else if bytes.starts_with(ZIP_MAGIC) {
            Some(ContainerVariant::Archive)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContainerVariant::Archive => ".jontrain.zip",
            ContainerVariant::Raw => ".jontrain.aes",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ContainerVariant::Archive => "application/zip",
            ContainerVariant::Raw => "application/octet-stream",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerVariant::Archive => "archive",
            ContainerVariant::Raw => "raw",
        }
    }
}

/// Canonical unencrypted bytes of a score database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPayload(Vec<u8>);

impl BackupPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for BackupPayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Encrypted, authenticated bytes ready for transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedContainer(Vec<u8>);

impl EncryptedContainer {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn variant(&self) -> Option<ContainerVariant> {
        ContainerVariant::detect(&self.0)
    }

    /// Short SHA-256 prefix for log correlation.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.0);
        hex::encode(&digest[..8])
    }
}
