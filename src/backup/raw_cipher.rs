// Copyright 2025-2026 JonTrain Contributors
// SPDX-License-Identifier: Apache-2.0

//! Raw backup container: AES-256-GCM under a PBKDF2-derived key.
//!
//! # Layout
//! `JTBK1 ‖ salt(16) ‖ nonce(12) ‖ tag(16) ‖ ciphertext`
//!
//! # Security
//! - Salt and nonce are drawn from the OS CSPRNG on every seal
//! - The tag is checked before any plaintext is returned
//! - Derived keys are zeroed on drop via `zeroize`

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Nonce, Tag,
};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use super::backup_types::*;

/// Seals and opens raw containers.
#[derive(Debug, Clone, Copy)]
pub struct RawCipher {
    iterations: u32,
}

impl Default for RawCipher {
    fn default() -> Self {
        Self::new()
    }
}

impl RawCipher {
    pub fn new() -> Self {
        Self { iterations: PBKDF2_ITERATIONS }
    }

    /// Use a different PBKDF2 cost. Both sides must agree, since the count is
    /// not stored in the container.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Encrypt `plaintext` into a complete raw container.
    pub fn seal(&self, plaintext: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
        let salt: [u8; SALT_SIZE] = random_bytes();
        let nonce: [u8; NONCE_SIZE] = random_bytes();
        let key = derive_key(password, &salt, self.iterations);
        let cipher = Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(key.as_slice()));

        let mut ciphertext = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut ciphertext)
            .map_err(|e| BackupError::EncryptionFailed(e.to_string()))?;

        let mut out = Vec::with_capacity(RAW_HEADER_SIZE + ciphertext.len());
        out.extend_from_slice(RAW_MAGIC);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(tag.as_slice());
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Verify and decrypt a raw container.
    pub fn open(&self, container: &[u8], password: &str) -> Result<Vec<u8>, BackupError> {
        if !container.starts_with(RAW_MAGIC) {
            return Err(BackupError::InvalidContainer("raw header missing".to_string()));
        }
        if container.len() < RAW_HEADER_SIZE {
            return Err(BackupError::InvalidContainer(format!(
                "raw container truncated: {} bytes, header needs {}",
                container.len(),
                RAW_HEADER_SIZE
            )));
        }

        let (salt, rest) = container[RAW_MAGIC.len()..].split_at(SALT_SIZE);
        let (nonce, rest) = rest.split_at(NONCE_SIZE);
        let (tag, ciphertext) = rest.split_at(TAG_SIZE);

        let key = derive_key(password, salt, self.iterations);
        let cipher = Aes256Gcm::new(aes_gcm::Key::<Aes256Gcm>::from_slice(key.as_slice()));

        let mut plaintext = ciphertext.to_vec();
        cipher
            .decrypt_in_place_detached(Nonce::from_slice(nonce), b"", &mut plaintext, Tag::from_slice(tag))
            .map_err(|_| BackupError::AuthenticationFailure)?;
        Ok(plaintext)
    }
}

/// PBKDF2-HMAC-SHA256 over the password and salt.
fn derive_key(password: &str, salt: &[u8], iterations: u32) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key[..]);
    key
}

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    buf
}

#[cfg(test)]
#[path = "raw_cipher_tests.rs"]
mod tests;
