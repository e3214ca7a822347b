//! Flat key-value option storage.
//!
//! Stands in for the host's option table: string keys, string values. The
//! file-backed store persists a single JSON object; the memory store is for
//! tests and ephemeral runs.

use async_trait::async_trait;

mod error;
mod file;
mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileOptionStore;
pub use memory::MemoryOptionStore;

/// Key holding the ciphertext of a provider's API key.
pub fn credential_key(provider: &str) -> String {
    format!("api_key_{provider}")
}

/// Key holding the selected default provider.
pub const SELECTED_PROVIDER_KEY: &str = "api_provider";

/// Key holding the default token budget.
pub const MAX_TOKENS_KEY: &str = "max_tokens";

/// Key holding the default sampling temperature.
pub const TEMPERATURE_KEY: &str = "temperature";

/// Storage for string options.
#[async_trait]
pub trait OptionStore: Send + Sync {
    /// Read an option, `None` when unset.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or overwrite an option.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove an option. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_keys_are_per_provider() {
        assert_eq!(credential_key("openai"), "api_key_openai");
        assert_ne!(credential_key("gemini"), credential_key("mistral"));
    }
}
