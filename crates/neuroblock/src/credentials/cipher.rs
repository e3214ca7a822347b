//! Symmetric encryption of API keys at rest.
//!
//! AES-256-GCM keyed by SHA-256 of the site secret. Ciphertext is
//! `base64(nonce || sealed)` with a fresh random nonce per encryption.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha2::{Digest, Sha256};

use super::CredentialError;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCipher").finish_non_exhaustive()
    }
}

impl CredentialCipher {
    /// Derive the cipher from the site-wide secret.
    pub fn new(secret: &str) -> Result<Self, CredentialError> {
        if secret.is_empty() {
            return Err(CredentialError::MissingSecret);
        }
        let key = Sha256::digest(secret.as_bytes());
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| CredentialError::Encryption)?;
        Ok(Self { cipher })
    }

    /// Encrypt a plaintext key. Empty input yields empty output.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CredentialError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let nonce: [u8; NONCE_LEN] = rand::random();
        let sealed = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|_| CredentialError::Encryption)?;

        let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);
        Ok(STANDARD.encode(blob))
    }

    /// Decrypt a stored ciphertext. Empty input yields empty output.
    ///
    /// Malformed input and input sealed under another secret both fail with
    /// `DecryptionFailed`.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CredentialError> {
        if ciphertext.is_empty() {
            return Ok(String::new());
        }

        let blob = STANDARD
            .decode(ciphertext.trim())
            .map_err(|_| CredentialError::DecryptionFailed)?;
        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(CredentialError::DecryptionFailed);
        }

        let (nonce, sealed) = blob.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), sealed)
            .map_err(|_| CredentialError::DecryptionFailed)?;
        String::from_utf8(plain).map_err(|_| CredentialError::DecryptionFailed)
    }
}
