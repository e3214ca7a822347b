//! Generation error types.

use serde::Serialize;
use thiserror::Error;

/// Stable classification of a failed generation.
///
/// This is what crosses the HTTP boundary; the full [`GenerateError`] carries
/// the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidProvider,
    NoCredential,
    DecryptionFailed,
    ProviderError,
    NetworkError,
    EmptyPrompt,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidProvider => "invalid_provider",
            ErrorKind::NoCredential => "no_credential",
            ErrorKind::DecryptionFailed => "decryption_failed",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::EmptyPrompt => "empty_prompt",
        }
    }

    /// Whether the caller should be told to reconfigure the stored key.
    ///
    /// A key that fails to decrypt is handled exactly like a missing key.
    pub fn needs_reconfiguration(self) -> bool {
        matches!(self, ErrorKind::NoCredential | ErrorKind::DecryptionFailed)
    }
}

/// Errors that can occur while generating content.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Prompt was empty or whitespace only.
    #[error("prompt is required")]
    EmptyPrompt,

    /// Provider id is not in the registry.
    #[error("invalid API provider: {0}")]
    InvalidProvider(String),

    /// No API key stored for a provider that needs one.
    #[error("no API key configured for {0}, please configure it in AI settings")]
    NoCredential(String),

    /// Stored key exists but cannot be decrypted with the current secret.
    #[error("API key for {0} could not be read, please configure it in AI settings")]
    DecryptionFailed(String),

    /// Upstream API answered with an error payload.
    #[error("{message}")]
    Provider { message: String },

    /// HTTP request failed or timed out.
    #[error("http request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint URL could not be built.
    #[error("invalid provider endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

impl GenerateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerateError::EmptyPrompt => ErrorKind::EmptyPrompt,
            GenerateError::InvalidProvider(_) => ErrorKind::InvalidProvider,
            GenerateError::NoCredential(_) => ErrorKind::NoCredential,
            GenerateError::DecryptionFailed(_) => ErrorKind::DecryptionFailed,
            GenerateError::Provider { .. } => ErrorKind::ProviderError,
            GenerateError::Network(_) | GenerateError::Endpoint(_) => ErrorKind::NetworkError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_upstream_message_verbatim() {
        let err = GenerateError::Provider {
            message: "insufficient_quota".to_string(),
        };
        assert_eq!(err.to_string(), "insufficient_quota");
        assert_eq!(err.kind(), ErrorKind::ProviderError);
    }

    #[test]
    fn missing_and_undecryptable_keys_both_need_reconfiguration() {
        let missing = GenerateError::NoCredential("openai".to_string());
        let broken = GenerateError::DecryptionFailed("openai".to_string());
        assert!(missing.kind().needs_reconfiguration());
        assert!(broken.kind().needs_reconfiguration());
        assert!(!GenerateError::EmptyPrompt.kind().needs_reconfiguration());
    }

    #[test]
    fn kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ErrorKind::InvalidProvider).unwrap(),
            "\"invalid_provider\""
        );
        assert_eq!(ErrorKind::NetworkError.as_str(), "network_error");
    }
}
