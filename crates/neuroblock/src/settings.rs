//! Site-wide generation settings kept in the option store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::GenerationConfig;
use crate::llm::GenerationDefaults;
use crate::store::{
    MAX_TOKENS_KEY, OptionStore, SELECTED_PROVIDER_KEY, StoreError, TEMPERATURE_KEY,
};

/// Upper bound accepted for `max_tokens`.
pub const MAX_TOKENS_LIMIT: u32 = 32_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Provider used when a request names none.
    pub provider: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Settings {
    pub fn defaults(&self) -> GenerationDefaults {
        GenerationDefaults {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Partial update; absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("max_tokens must be between 1 and {MAX_TOKENS_LIMIT}")]
    InvalidMaxTokens,

    #[error("temperature must be between 0 and 2")]
    InvalidTemperature,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SettingsUpdate {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(max_tokens) = self.max_tokens
            && !(1..=MAX_TOKENS_LIMIT).contains(&max_tokens)
        {
            return Err(SettingsError::InvalidMaxTokens);
        }
        if let Some(temperature) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(SettingsError::InvalidTemperature);
        }
        Ok(())
    }
}

/// Reads settings from the option store, falling back to configured values.
#[derive(Clone)]
pub struct SettingsStore {
    options: Arc<dyn OptionStore>,
    fallback: GenerationConfig,
}

impl SettingsStore {
    pub fn new(options: Arc<dyn OptionStore>, fallback: GenerationConfig) -> Self {
        Self { options, fallback }
    }

    pub async fn load(&self) -> Result<Settings, SettingsError> {
        let provider = self
            .options
            .get(SELECTED_PROVIDER_KEY)
            .await?
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| self.fallback.default_provider.clone());
        let max_tokens = self
            .parsed(MAX_TOKENS_KEY)
            .await?
            .unwrap_or(self.fallback.max_tokens);
        let temperature = self
            .parsed(TEMPERATURE_KEY)
            .await?
            .unwrap_or(self.fallback.temperature);

        Ok(Settings {
            provider,
            max_tokens,
            temperature,
        })
    }

    /// Validate and persist an update, returning the resulting settings.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings, SettingsError> {
        update.validate()?;

        if let Some(provider) = &update.provider {
            self.options.set(SELECTED_PROVIDER_KEY, provider).await?;
        }
        if let Some(max_tokens) = update.max_tokens {
            self.options
                .set(MAX_TOKENS_KEY, &max_tokens.to_string())
                .await?;
        }
        if let Some(temperature) = update.temperature {
            self.options
                .set(TEMPERATURE_KEY, &temperature.to_string())
                .await?;
        }

        let settings = self.load().await?;
        info!(
            provider = %settings.provider,
            max_tokens = settings.max_tokens,
            temperature = settings.temperature,
            "Updated settings"
        );
        Ok(settings)
    }

    /// Record the selected provider.
    pub async fn select_provider(&self, provider: &str) -> Result<(), SettingsError> {
        self.options.set(SELECTED_PROVIDER_KEY, provider).await?;
        Ok(())
    }

    async fn parsed<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        let Some(raw) = self.options.get(key).await? else {
            return Ok(None);
        };
        match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                warn!(key, value = %raw, "Ignoring unparseable stored setting");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryOptionStore;

    fn store() -> (SettingsStore, Arc<MemoryOptionStore>) {
        let options = Arc::new(MemoryOptionStore::new());
        (
            SettingsStore::new(options.clone(), GenerationConfig::default()),
            options,
        )
    }

    #[tokio::test]
    async fn falls_back_to_config() {
        let (settings, _) = store();
        let loaded = settings.load().await.unwrap();
        assert_eq!(loaded.provider, "openai");
        assert_eq!(loaded.max_tokens, 2000);
        assert!((loaded.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (settings, _) = store();
        let updated = settings
            .update(SettingsUpdate {
                max_tokens: Some(1200),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.max_tokens, 1200);
        assert_eq!(updated.provider, "openai");

        let updated = settings
            .update(SettingsUpdate {
                provider: Some("gemini".into()),
                temperature: Some(0.2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.provider, "gemini");
        assert_eq!(updated.max_tokens, 1200);
        assert_eq!(updated.defaults().temperature, 0.2);
    }

    #[tokio::test]
    async fn rejects_out_of_range_values() {
        let (settings, options) = store();
        let err = settings
            .update(SettingsUpdate {
                max_tokens: Some(0),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidMaxTokens));

        let err = settings
            .update(SettingsUpdate {
                temperature: Some(3.5),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidTemperature));
        assert_eq!(options.get(MAX_TOKENS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn garbage_stored_value_uses_fallback() {
        let (settings, options) = store();
        options.set(MAX_TOKENS_KEY, "lots").await.unwrap();
        assert_eq!(settings.load().await.unwrap().max_tokens, 2000);
    }

    #[tokio::test]
    async fn select_provider_persists() {
        let (settings, _) = store();
        settings.select_provider("ollama").await.unwrap();
        assert_eq!(settings.load().await.unwrap().provider, "ollama");
    }
}
