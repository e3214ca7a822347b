//! Provider registry: which providers exist, how they speak, which models they accept.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use super::error::GenerateError;

/// Timeout for hosted providers.
pub const REMOTE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for a locally running model server.
pub const LOCAL_TIMEOUT: Duration = Duration::from_secs(60);

/// JSON request/response convention a provider follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WireFamily {
    /// OpenAI-style `chat/completions` (OpenAI, DeepSeek, Mistral).
    ChatCompletions,
    /// Gemini-style `:generateContent`.
    GenerativeContent,
    /// Ollama-style `/api/chat`, no credential.
    LocalChat,
}

impl WireFamily {
    pub fn timeout(self) -> Duration {
        match self {
            WireFamily::LocalChat => LOCAL_TIMEOUT,
            WireFamily::ChatCompletions | WireFamily::GenerativeContent => REMOTE_TIMEOUT,
        }
    }

    pub fn requires_credential(self) -> bool {
        !matches!(self, WireFamily::LocalChat)
    }
}

impl fmt::Display for WireFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            WireFamily::ChatCompletions => "chat-completions",
            WireFamily::GenerativeContent => "generative-content",
            WireFamily::LocalChat => "local-chat",
        })
    }
}

/// Static description of one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderConfig {
    pub id: String,
    pub display_name: String,
    pub endpoint: String,
    /// Ordered; the first entry is the default model.
    pub models: Vec<String>,
    pub family: WireFamily,
}

impl ProviderConfig {
    /// Use the requested model when it is supported, otherwise the first one.
    pub fn resolve_model(&self, requested: Option<&str>) -> &str {
        requested
            .and_then(|want| self.models.iter().find(|m| m.as_str() == want))
            .or_else(|| self.models.first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

type BuiltinProvider = (
    &'static str,
    &'static str,
    WireFamily,
    &'static str,
    &'static [&'static str],
);

const BUILTIN: &[BuiltinProvider] = &[
    (
        "openai",
        "OpenAI",
        WireFamily::ChatCompletions,
        "https://api.openai.com/v1/chat/completions",
        &["gpt-4o-mini"],
    ),
    (
        "deepseek",
        "DeepSeek",
        WireFamily::ChatCompletions,
        "https://api.deepseek.com/v1/chat/completions",
        &["deepseek-chat", "deepseek-coder"],
    ),
    (
        "gemini",
        "Google Gemini",
        WireFamily::GenerativeContent,
        "https://generativelanguage.googleapis.com/v1/models",
        &["gemini-2.5-flash", "gemini-2.5-flash-lite"],
    ),
    (
        "mistral",
        "Mistral AI",
        WireFamily::ChatCompletions,
        "https://api.mistral.ai/v1/chat/completions",
        &["mistral-small"],
    ),
    (
        "ollama",
        "Ollama (local)",
        WireFamily::LocalChat,
        "http://localhost:11434/api/chat",
        &["llama3.2", "mistral"],
    ),
];

/// Errors raised while building the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("cannot override unknown provider '{0}'")]
    UnknownProvider(String),

    #[error("invalid endpoint for provider '{provider}': {source}")]
    InvalidEndpoint {
        provider: String,
        #[source]
        source: url::ParseError,
    },
}

/// Read-only table of providers, in display order.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Arc<Vec<ProviderConfig>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProviderRegistry {
    /// The providers shipped with the service.
    pub fn builtin() -> Self {
        let providers = BUILTIN
            .iter()
            .map(|(id, name, family, endpoint, models)| ProviderConfig {
                id: (*id).to_string(),
                display_name: (*name).to_string(),
                endpoint: (*endpoint).to_string(),
                models: models.iter().map(|m| (*m).to_string()).collect(),
                family: *family,
            })
            .collect();
        Self {
            providers: Arc::new(providers),
        }
    }

    /// Built-in providers with some endpoints replaced.
    ///
    /// Overrides must name a built-in provider and be absolute URLs.
    pub fn with_endpoints(overrides: &HashMap<String, String>) -> Result<Self, RegistryError> {
        let mut providers = Self::builtin().providers.as_ref().clone();

        for (id, endpoint) in overrides {
            let Some(provider) = providers.iter_mut().find(|p| &p.id == id) else {
                return Err(RegistryError::UnknownProvider(id.clone()));
            };
            url::Url::parse(endpoint).map_err(|source| RegistryError::InvalidEndpoint {
                provider: id.clone(),
                source,
            })?;
            info!(provider = %id, endpoint = %endpoint, "Overriding provider endpoint");
            provider.endpoint = endpoint.clone();
        }

        Ok(Self {
            providers: Arc::new(providers),
        })
    }

    /// Get a provider by id.
    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Get a provider by id, failing with `InvalidProvider`.
    pub fn resolve(&self, id: &str) -> Result<&ProviderConfig, GenerateError> {
        self.get(id)
            .ok_or_else(|| GenerateError::InvalidProvider(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.providers.iter()
    }
}
