// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Archive backup container: a zip with one AES-256 encrypted, deflated entry.
//!
//! Key derivation and per-entry authentication are the archive format's own
//! (WinZip AE-2); nothing is layered on top.

use std::io::{Cursor, Read, Write};
use zip::result::ZipError;
use zip::write::FileOptions;
use zip::{AesMode, CompressionMethod, ZipArchive, ZipWriter};

use super::backup_types::{BackupError, MAX_PAYLOAD_SIZE};
use crate::scores::SCHEMA_FILENAME;

/// Pack `payload` as the single schema entry of a new archive.
pub fn seal(payload: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
    let enc_err = |e: ZipError| BackupError::EncryptionFailed(e.to_string());

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_aes_encryption(AesMode::Aes256, password);
    writer.start_file(SCHEMA_FILENAME, options).map_err(enc_err)?;
    writer
        .write_all(payload)
        .map_err(|e| BackupError::EncryptionFailed(e.to_string()))?;
    let cursor = writer.finish().map_err(enc_err)?;
    Ok(cursor.into_inner())
}

/// Extract and authenticate the schema entry.
pub fn open(bytes: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
    open_with_limit(bytes, password, MAX_PAYLOAD_SIZE)
}

/// Like [`open`], refusing entries that expand past `limit` bytes.
pub fn open_with_limit(bytes: &[u8], password: &str, limit: u64) -> Result<Vec<u8>, BackupError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BackupError::InvalidContainer(format!("not a backup archive: {}", e)))?;

    if !archive.file_names().any(|name| name == SCHEMA_FILENAME) {
        return Err(missing_entry());
    }

    let mut entry = match archive.by_name_decrypt(SCHEMA_FILENAME, password.as_bytes()) {
        Ok(entry) => entry,
        Err(ZipError::InvalidPassword) => return Err(BackupError::AuthenticationFailure),
        Err(ZipError::FileNotFound) => return Err(missing_entry()),
        Err(e) => return Err(BackupError::InvalidContainer(e.to_string())),
    };
    // Plain entries come back from `by_name_decrypt` unchecked.
    if !entry.encrypted() {
        return Err(BackupError::AuthenticationFailure);
    }
    if entry.size() > limit {
        return Err(too_large(limit));
    }

    let mut payload = Vec::new();
    // The entry MAC is checked when the stream is exhausted.
    entry
        .by_ref()
        .take(limit + 1)
        .read_to_end(&mut payload)
        .map_err(|_| BackupError::AuthenticationFailure)?;
    if payload.len() as u64 > limit {
        return Err(too_large(limit));
    }
    Ok(payload)
}

fn too_large(limit: u64) -> BackupError {
    BackupError::InvalidContainer(format!("archive entry larger than {} bytes", limit))
}

fn missing_entry() -> BackupError {
    BackupError::InvalidContainer(format!("{} missing from archive", SCHEMA_FILENAME))
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
