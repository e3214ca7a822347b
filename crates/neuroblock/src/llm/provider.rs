//! Wire client trait and shared response handling.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::error::GenerateError;
use super::types::GenerationDefaults;

/// Everything a wire client needs for one outbound call.
#[derive(Debug, Clone, Copy)]
pub struct ProviderCall<'a> {
    pub provider: &'a str,
    pub endpoint: &'a str,
    pub model: &'a str,
    /// Already composed prompt.
    pub prompt: &'a str,
    /// Plaintext API key; empty for providers that take none.
    pub credential: &'a str,
    pub defaults: &'a GenerationDefaults,
    pub timeout: Duration,
}

/// One implementation per wire-shape family.
#[async_trait]
pub trait WireClient: Send + Sync {
    /// Perform the request and return the generated text.
    ///
    /// An answer that does not contain the expected text path yields an
    /// empty string, not an error.
    async fn complete(&self, call: ProviderCall<'_>) -> Result<String, GenerateError>;
}

/// Read a response body as a JSON envelope.
///
/// Returns `None` when the body is not JSON. An `error` member (object with
/// `message`, or a bare string) becomes `GenerateError::Provider`.
pub(super) async fn read_envelope(
    provider: &str,
    response: reqwest::Response,
) -> Result<Option<Value>, GenerateError> {
    let status = response.status();
    let body = response.text().await?;

    let envelope = match serde_json::from_str::<Value>(&body) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                provider,
                status = status.as_u16(),
                error = %e,
                "Upstream returned a non-JSON body"
            );
            return Ok(None);
        }
    };

    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("API error")
                .to_string(),
        };
        debug!(provider, status = status.as_u16(), %message, "Upstream returned an error payload");
        return Err(GenerateError::Provider { message });
    }

    Ok(Some(envelope))
}

/// Pull a string out of an envelope by JSON pointer, empty when absent.
pub(super) fn extract_text(envelope: Option<&Value>, pointer: &str) -> String {
    envelope
        .and_then(|v| v.pointer(pointer))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_text_follows_pointer() {
        let envelope = json!({"choices": [{"message": {"content": "<div>hi</div>"}}]});
        assert_eq!(
            extract_text(Some(&envelope), "/choices/0/message/content"),
            "<div>hi</div>"
        );
    }

    #[test]
    fn extract_text_degrades_to_empty() {
        let envelope = json!({"choices": []});
        assert_eq!(extract_text(Some(&envelope), "/choices/0/message/content"), "");
        assert_eq!(extract_text(None, "/message/content"), "");

        let not_a_string = json!({"message": {"content": 42}});
        assert_eq!(extract_text(Some(&not_a_string), "/message/content"), "");
    }
}
