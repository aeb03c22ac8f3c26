// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Backup codec: canonical payloads and the container strategy.
//!
//! The container backend is resolved once when the codec is built, from what
//! was compiled in (`archive`, `raw-cipher`) and the configured preference.

use chrono::{DateTime, Local};
use serde::Deserialize;
use serde_json::Value;

use super::backup_types::*;
use crate::scores::{ScoreDatabase, APP_VERSION, SCHEMA_VERSION};

/// Encryption backend used for new containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoBackend {
    Archive,
    Raw,
}

impl CryptoBackend {
    /// Whether the backend was compiled into this build.
    pub fn is_available(self) -> bool {
        match self {
            CryptoBackend::Archive => cfg!(feature = "archive"),
            CryptoBackend::Raw => cfg!(feature = "raw-cipher"),
        }
    }

    pub fn variant(self) -> ContainerVariant {
        match self {
            CryptoBackend::Archive => ContainerVariant::Archive,
            CryptoBackend::Raw => ContainerVariant::Raw,
        }
    }
}

/// Which container format to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatPreference {
    /// Archive when available, raw otherwise.
    #[default]
    Auto,
    Archive,
    Raw,
}

impl FormatPreference {
    pub fn resolve(self) -> Option<CryptoBackend> {
        let candidates: &[CryptoBackend] = match self {
            FormatPreference::Auto => &[CryptoBackend::Archive, CryptoBackend::Raw],
            FormatPreference::Archive => &[CryptoBackend::Archive],
            FormatPreference::Raw => &[CryptoBackend::Raw],
        };
        candidates.iter().copied().find(|b| b.is_available())
    }
}

impl std::str::FromStr for FormatPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(FormatPreference::Auto),
            "archive" | "zip" => Ok(FormatPreference::Archive),
            "raw" | "aes" => Ok(FormatPreference::Raw),
            other => Err(format!("Unknown backup format: {}", other)),
        }
    }
}

/// Serializes, encrypts and validates score backups.
#[derive(Debug, Clone)]
pub struct BackupCodec {
    backend: Option<CryptoBackend>,
    kdf_iterations: u32,
}

impl Default for BackupCodec {
    fn default() -> Self {
        Self::new(FormatPreference::Auto)
    }
}

impl BackupCodec {
    pub fn new(preference: FormatPreference) -> Self {
        let backend = preference.resolve();
        match backend {
            Some(b) => tracing::debug!(backend = b.variant().as_str(), "Backup backend resolved"),
            None => tracing::warn!(preference = ?preference, "No backup encryption backend available"),
        }
        Self { backend, kdf_iterations: PBKDF2_ITERATIONS }
    }

    /// Pin the backend directly. `None` or an unavailable backend disables export.
    pub fn with_backend(backend: Option<CryptoBackend>) -> Self {
        Self {
            backend: backend.filter(|b| b.is_available()),
            kdf_iterations: PBKDF2_ITERATIONS,
        }
    }

    /// Override the PBKDF2 cost of raw containers.
    pub fn with_kdf_iterations(mut self, iterations: u32) -> Self {
        self.kdf_iterations = iterations;
        self
    }

    pub fn backend(&self) -> Option<CryptoBackend> {
        self.backend
    }

    /// Whether this build can open any container variant, independent of the
    /// backend chosen for export.
    pub fn can_decrypt(&self) -> bool {
        CryptoBackend::Archive.is_available() || CryptoBackend::Raw.is_available()
    }

    /// Canonical payload bytes, schema tag included.
    pub fn encode(&self, db: &ScoreDatabase) -> Result<BackupPayload, BackupError> {
        db.to_canonical_json()
            .map(BackupPayload::from)
            .map_err(|e| BackupError::MalformedPayload(e.to_string()))
    }

    /// Parse and validate a payload. A different schema is refused outright.
    pub fn decode(&self, payload: &BackupPayload) -> Result<ScoreDatabase, BackupError> {
        let value: Value = serde_json::from_slice(payload.as_bytes())
            .map_err(|e| BackupError::MalformedPayload(e.to_string()))?;
        let obj = value
            .as_object()
            .ok_or_else(|| BackupError::MalformedPayload("not a JSON object".to_string()))?;

        let (Some(found), Some(data)) = (obj.get("schema_version"), obj.get("data")) else {
            return Err(BackupError::MalformedPayload("schema_version or data missing".to_string()));
        };
        if found.as_str() != Some(SCHEMA_VERSION) {
            return Err(BackupError::SchemaMismatch {
                found: found.as_str().map(str::to_string).unwrap_or_else(|| found.to_string()),
                expected: SCHEMA_VERSION.to_string(),
            });
        }
        if !data.is_object() {
            return Err(BackupError::MalformedPayload("data block missing".to_string()));
        }
        ScoreDatabase::from_current_json(&value)
            .ok_or_else(|| BackupError::MalformedPayload("data block missing".to_string()))
    }

    /// Wrap a payload with the resolved backend.
    pub fn encrypt(&self, payload: &BackupPayload, password: &str) -> Result<EncryptedContainer, BackupError> {
        let bytes = match self.backend {
            Some(CryptoBackend::Archive) => seal_archive(payload.as_bytes(), password)?,
            Some(CryptoBackend::Raw) => seal_raw(payload.as_bytes(), password, self.kdf_iterations)?,
            None => return Err(BackupError::NoCryptoBackend),
        };
        Ok(EncryptedContainer::from_bytes(bytes))
    }

    /// Unwrap a container of either variant, detected from its leading bytes.
    pub fn decrypt(&self, container: &EncryptedContainer, password: &str) -> Result<BackupPayload, BackupError> {
        let bytes = container.as_bytes();
        let plaintext = match container.variant() {
            Some(ContainerVariant::Raw) => open_raw(bytes, password, self.kdf_iterations)?,
            _ => open_archive(bytes, password)?,
        };
        Ok(BackupPayload::from(plaintext))
    }

    /// Full export pipeline with the application password.
    pub fn export(&self, db: &ScoreDatabase) -> Result<EncryptedContainer, BackupError> {
        self.encrypt(&self.encode(db)?, BACKUP_PASSWORD)
    }

    /// Full import pipeline with the application password.
    pub fn import(&self, bytes: Vec<u8>) -> Result<ScoreDatabase, BackupError> {
        let container = EncryptedContainer::from_bytes(bytes);
        self.decode(&self.decrypt(&container, BACKUP_PASSWORD)?)
    }

    /// File name offered to the user for a new backup.
    pub fn suggested_file_name(&self, at: DateTime<Local>) -> String {
        format!(
            "jontrain-highscores-v{}-schema{}-{}{}",
            APP_VERSION,
            SCHEMA_VERSION,
            at.format("%Y%m%d-%H%M%S"),
            self.output_variant().extension()
        )
    }

    pub fn mime_hint(&self) -> &'static str {
        self.output_variant().mime_type()
    }

    fn output_variant(&self) -> ContainerVariant {
        self.backend.map(CryptoBackend::variant).unwrap_or(ContainerVariant::Raw)
    }
}

#[cfg(feature = "raw-cipher")]
fn seal_raw(payload: &[u8], password: &str, iterations: u32) -> Result<Vec<u8>, BackupError> {
    super::raw_cipher::RawCipher::with_iterations(iterations).seal(payload, password)
}

#[cfg(not(feature = "raw-cipher"))]
fn seal_raw(_payload: &[u8], _password: &str, _iterations: u32) -> Result<Vec<u8>, BackupError> {
    Err(BackupError::NoCryptoBackend)
}

#[cfg(feature = "raw-cipher")]
fn open_raw(bytes: &[u8], password: &str, iterations: u32) -> Result<Vec<u8>, BackupError> {
    super::raw_cipher::RawCipher::with_iterations(iterations).open(bytes, password)
}

#[cfg(not(feature = "raw-cipher"))]
fn open_raw(_bytes: &[u8], _password: &str, _iterations: u32) -> Result<Vec<u8>, BackupError> {
    Err(BackupError::NoCryptoBackend)
}

#[cfg(feature = "archive")]
fn seal_archive(payload: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
    super::archive::seal(payload, password)
}

#[cfg(not(feature = "archive"))]
fn seal_archive(_payload: &[u8], _password: &str) -> Result<Vec<u8>, BackupError> {
    Err(BackupError::NoCryptoBackend)
}

#[cfg(feature = "archive")]
fn open_archive(bytes: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
    super::archive::open(bytes, password)
}

#[cfg(not(feature = "archive"))]
fn open_archive(bytes: &[u8], _password: &str) -> Result<Vec<u8>, BackupError> {
    match ContainerVariant::detect(bytes) {
        Some(ContainerVariant::Archive) => Err(BackupError::NoCryptoBackend),
        _ => Err(BackupError::InvalidContainer("unrecognised backup header".to_string())),
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
