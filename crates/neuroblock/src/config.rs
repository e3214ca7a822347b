use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

use crate::llm::GenerationDefaults;

/// Environment variable consulted when the config has no `secret`.
pub const SECRET_ENV: &str = "NEUROBLOCK_SECRET";

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Site-wide secret the credential cipher is derived from.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Endpoint overrides keyed by provider id.
    #[serde(default)]
    pub providers: HashMap<String, ProviderOverride>,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }

    /// The configured secret, or `NEUROBLOCK_SECRET` when unset.
    pub fn site_secret(&self) -> Result<String, ConfigError> {
        resolve_secret(self.secret.as_deref(), std::env::var(SECRET_ENV).ok())
    }

    /// Endpoint overrides as a plain id -> URL map.
    pub fn endpoint_overrides(&self) -> HashMap<String, String> {
        self.providers
            .iter()
            .map(|(id, o)| (id.clone(), o.endpoint.clone()))
            .collect()
    }
}

fn resolve_secret(configured: Option<&str>, env: Option<String>) -> Result<String, ConfigError> {
    configured
        .map(str::to_string)
        .or(env)
        .filter(|s| !s.trim().is_empty())
        .ok_or(ConfigError::MissingSecret)
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Bearer token for admin endpoints (credentials, settings).
    /// Also accepted wherever editor access is required.
    #[serde(default)]
    pub admin_token: Option<String>,
    /// Bearer token for content generation.
    #[serde(default)]
    pub editor_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            admin_token: None,
            editor_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

// Above the 60s local-provider timeout so upstream timeouts surface as errors.
fn default_request_timeout() -> u64 {
    90
}

// ============================================================================
// StoreConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".neuroblock/options.json")
}

// ============================================================================
// GenerationConfig
// ============================================================================

/// Fallbacks used until settings are saved in the option store.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_max_tokens() -> u32 {
    GenerationDefaults::MAX_TOKENS
}

fn default_temperature() -> f32 {
    GenerationDefaults::TEMPERATURE
}

// ============================================================================
// ProviderOverride
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderOverride {
    pub endpoint: String,
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),

    #[error("no site secret configured, set `secret` or {SECRET_ENV}")]
    MissingSecret,
}

// ============================================================================
// Tests
// ============================================================================
