//! Per-provider API key storage, encrypted at rest.
//!
//! Keys are sealed with [`CredentialCipher`] and kept in the option store
//! under `api_key_<provider>`. Plaintext never leaves this module except
//! through [`CredentialStore::load`], which the generate path uses; every
//! other caller sees [`MASK_SENTINEL`] at most.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::store::{OptionStore, StoreError, credential_key};
use crate::sync::KeyedLocks;

mod cipher;

pub use cipher::CredentialCipher;

/// Placeholder shown instead of a configured key.
///
/// Fixed length regardless of the real key, so it leaks nothing.
pub const MASK_SENTINEL: &str = "••••••••••••••••••••";

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("site secret is not configured")]
    MissingSecret,

    #[error("failed to encrypt credential")]
    Encryption,

    #[error("stored credential could not be decrypted")]
    DecryptionFailed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a save request wants done with the stored key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyUpdate {
    /// Keep whatever is stored.
    Unchanged,
    /// Store a new plaintext key.
    Replace(String),
}

impl KeyUpdate {
    /// Interpret the key field of a settings form.
    ///
    /// The form echoes [`MASK_SENTINEL`] back when the user did not touch the
    /// field, and sends nothing or an empty string when there is no key, so
    /// all three mean "unchanged". A real key equal to the sentinel cannot be
    /// saved through the form.
    pub fn from_form(value: Option<String>) -> Self {
        let Some(key) = value else {
            return KeyUpdate::Unchanged;
        };
        let key = key.trim();
        if key.is_empty() || key == MASK_SENTINEL {
            KeyUpdate::Unchanged
        } else {
            KeyUpdate::Replace(key.to_string())
        }
    }
}

/// Ciphertext as persisted for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub provider: String,
    pub ciphertext: String,
}

/// Encrypted credential storage.
#[derive(Clone)]
pub struct CredentialStore {
    cipher: Arc<CredentialCipher>,
    options: Arc<dyn OptionStore>,
    locks: KeyedLocks,
}

impl CredentialStore {
    pub fn new(cipher: CredentialCipher, options: Arc<dyn OptionStore>) -> Self {
        Self {
            cipher: Arc::new(cipher),
            options,
            locks: KeyedLocks::new(),
        }
    }

    /// Apply a key update. Returns whether anything was written.
    pub async fn save(&self, provider: &str, update: KeyUpdate) -> Result<bool, CredentialError> {
        let KeyUpdate::Replace(plaintext) = update else {
            return Ok(false);
        };

        let ciphertext = self.cipher.encrypt(&plaintext)?;
        let key = credential_key(provider);

        let _guard = self.locks.lock(provider).await;
        if ciphertext.is_empty() {
            self.options.delete(&key).await?;
        } else {
            self.options.set(&key, &ciphertext).await?;
        }
        info!(provider, "Saved API key");
        Ok(true)
    }

    /// Remove the stored key for `provider`.
    pub async fn clear(&self, provider: &str) -> Result<(), CredentialError> {
        let _guard = self.locks.lock(provider).await;
        self.options.delete(&credential_key(provider)).await?;
        info!(provider, "Cleared API key");
        Ok(())
    }

    /// Ciphertext as stored, if any.
    pub async fn stored(&self, provider: &str) -> Result<Option<StoredCredential>, CredentialError> {
        let ciphertext = self.options.get(&credential_key(provider)).await?;
        Ok(ciphertext
            .filter(|c| !c.is_empty())
            .map(|ciphertext| StoredCredential {
                provider: provider.to_string(),
                ciphertext,
            }))
    }

    /// Decrypted key, `None` when nothing is stored.
    pub async fn load(&self, provider: &str) -> Result<Option<String>, CredentialError> {
        let Some(stored) = self.stored(provider).await? else {
            return Ok(None);
        };
        match self.cipher.decrypt(&stored.ciphertext) {
            Ok(plaintext) => Ok(Some(plaintext).filter(|k| !k.is_empty())),
            Err(e) => {
                warn!(provider, "Stored API key could not be decrypted, site secret may have changed");
                Err(e)
            }
        }
    }

    pub async fn has(&self, provider: &str) -> Result<bool, CredentialError> {
        Ok(self.stored(provider).await?.is_some())
    }

    /// [`MASK_SENTINEL`] when a key is stored, empty otherwise.
    pub async fn masked_view(&self, provider: &str) -> Result<String, CredentialError> {
        Ok(if self.has(provider).await? {
            MASK_SENTINEL.to_string()
        } else {
            String::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryOptionStore;

    fn store_with(options: Arc<MemoryOptionStore>) -> CredentialStore {
        CredentialStore::new(CredentialCipher::new("test-secret").unwrap(), options)
    }

    fn store() -> CredentialStore {
        store_with(Arc::new(MemoryOptionStore::new()))
    }

    #[test]
    fn form_values_map_to_updates() {
        assert_eq!(KeyUpdate::from_form(None), KeyUpdate::Unchanged);
        assert_eq!(KeyUpdate::from_form(Some(String::new())), KeyUpdate::Unchanged);
        assert_eq!(KeyUpdate::from_form(Some("  ".into())), KeyUpdate::Unchanged);
        assert_eq!(
            KeyUpdate::from_form(Some(MASK_SENTINEL.into())),
            KeyUpdate::Unchanged
        );
        assert_eq!(
            KeyUpdate::from_form(Some(format!("{MASK_SENTINEL}\n"))),
            KeyUpdate::Unchanged
        );
        assert_eq!(
            KeyUpdate::from_form(Some(format!(" {MASK_SENTINEL} "))),
            KeyUpdate::Unchanged
        );
        assert_eq!(
            KeyUpdate::from_form(Some(" sk-new ".into())),
            KeyUpdate::Replace("sk-new".into())
        );
    }

    #[tokio::test]
    async fn padded_mask_keeps_stored_key() {
        let store = store();
        store
            .save("openai", KeyUpdate::Replace("sk-real".into()))
            .await
            .unwrap();

        let update = KeyUpdate::from_form(Some(format!("{MASK_SENTINEL}\n")));
        assert!(!store.save("openai", update).await.unwrap());
        assert_eq!(store.load("openai").await.unwrap().as_deref(), Some("sk-real"));
    }

    #[test]
    fn sentinel_is_twenty_bullets() {
        assert_eq!(MASK_SENTINEL.chars().count(), 20);
        assert!(MASK_SENTINEL.chars().all(|c| c == '•'));
    }

    #[tokio::test]
    async fn save_then_load_roundtrips() {
        let store = store();
        assert!(store.save("openai", KeyUpdate::Replace("sk-abc".into())).await.unwrap());
        assert_eq!(store.load("openai").await.unwrap().as_deref(), Some("sk-abc"));
        assert!(store.has("openai").await.unwrap());
        assert!(!store.has("gemini").await.unwrap());
    }

    #[tokio::test]
    async fn ciphertext_is_not_plaintext() {
        let options = Arc::new(MemoryOptionStore::new());
        let store = store_with(options.clone());
        store.save("openai", KeyUpdate::Replace("sk-abc".into())).await.unwrap();

        let raw = options.get("api_key_openai").await.unwrap().unwrap();
        assert!(!raw.contains("sk-abc"));
    }

    #[tokio::test]
    async fn sentinel_save_leaves_ciphertext_unchanged() {
        let store = store();
        store.save("mistral", KeyUpdate::Replace("real-key".into())).await.unwrap();
        let before = store.stored("mistral").await.unwrap().unwrap();

        let changed = store
            .save("mistral", KeyUpdate::from_form(Some(MASK_SENTINEL.to_string())))
            .await
            .unwrap();
        assert!(!changed);

        let after = store.stored("mistral").await.unwrap().unwrap();
        assert_eq!(before, after);
        assert_eq!(store.load("mistral").await.unwrap().as_deref(), Some("real-key"));
    }

    #[tokio::test]
    async fn masked_view_never_depends_on_key() {
        let store = store();
        assert_eq!(store.masked_view("openai").await.unwrap(), "");

        store.save("openai", KeyUpdate::Replace("a".into())).await.unwrap();
        store
            .save("deepseek", KeyUpdate::Replace("x".repeat(300)))
            .await
            .unwrap();
        assert_eq!(store.masked_view("openai").await.unwrap(), MASK_SENTINEL);
        assert_eq!(store.masked_view("deepseek").await.unwrap(), MASK_SENTINEL);
    }

    #[tokio::test]
    async fn clear_removes_key() {
        let store = store();
        store.save("gemini", KeyUpdate::Replace("g".into())).await.unwrap();
        store.clear("gemini").await.unwrap();
        assert!(!store.has("gemini").await.unwrap());
        assert_eq!(store.load("gemini").await.unwrap(), None);
    }

    #[tokio::test]
    async fn rotated_secret_surfaces_decryption_failure() {
        let options = Arc::new(MemoryOptionStore::new());
        store_with(options.clone())
            .save("openai", KeyUpdate::Replace("sk-abc".into()))
            .await
            .unwrap();

        let rotated = CredentialStore::new(CredentialCipher::new("rotated").unwrap(), options);
        assert!(rotated.has("openai").await.unwrap());
        assert!(matches!(
            rotated.load("openai").await,
            Err(CredentialError::DecryptionFailed)
        ));
    }

    #[tokio::test]
    async fn concurrent_saves_keep_one_value() {
        let store = store();
        let mut tasks = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            tasks.push(tokio::spawn(async move {
                store
                    .save("openai", KeyUpdate::Replace(format!("sk-{i}")))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let key = store.load("openai").await.unwrap().unwrap();
        assert!(key.starts_with("sk-"));
    }
}
