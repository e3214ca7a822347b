//! Gemini-style `generateContent` provider.
//!
//! The API key travels as a `key` query parameter; there is no auth header.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::error::GenerateError;
use super::provider::{ProviderCall, WireClient, extract_text, read_envelope};

pub struct GenerativeContentClient {
    client: Client,
}

impl GenerativeContentClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// `<endpoint>/<model>:generateContent?key=<key>`
fn build_url(endpoint: &str, model: &str, key: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!(
        "{}/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model
    ))?;
    url.query_pairs_mut().append_pair("key", key);
    Ok(url)
}

#[async_trait]
impl WireClient for GenerativeContentClient {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<String, GenerateError> {
        let url = build_url(call.endpoint, call.model, call.credential)?;
        let request = Request {
            contents: vec![Content {
                parts: vec![Part { text: call.prompt }],
            }],
        };

        // The URL carries the key, keep it out of error messages.
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .timeout(call.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerateError::Network(e.without_url()))?;

        let envelope = read_envelope(call.provider, response)
            .await
            .map_err(|e| match e {
                GenerateError::Network(e) => GenerateError::Network(e.without_url()),
                other => other,
            })?;
        Ok(extract_text(
            envelope.as_ref(),
            "/candidates/0/content/parts/0/text",
        ))
    }
}

#[derive(serde::Serialize)]
struct Request<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(serde::Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(serde::Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::{Path, Query};
    use axum::http::HeaderMap;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::llm::GenerationDefaults;
    use crate::llm::test_support::spawn_upstream;

    #[test]
    fn url_embeds_model_and_encoded_key() {
        let url = build_url(
            "https://generativelanguage.googleapis.com/v1/models/",
            "gemini-2.5-flash",
            "abc+/=",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1/models/gemini-2.5-flash:generateContent?key=abc%2B%2F%3D"
        );
    }

    #[tokio::test]
    async fn reads_candidates_and_ignores_choices() {
        type Seen = Option<(String, HashMap<String, String>, bool, Value)>;
        let seen: Arc<Mutex<Seen>> = Arc::default();
        let captured = seen.clone();
        let router = Router::new().route(
            "/v1/models/{call}",
            post(
                move |Path(call): Path<String>,
                      Query(query): Query<HashMap<String, String>>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| {
                    let captured = captured.clone();
                    async move {
                        let has_auth = headers.contains_key("authorization");
                        *captured.lock().unwrap() = Some((call, query, has_auth, body));
                        Json(json!({
                            "choices": [{"message": {"content": "wrong path"}}],
                            "candidates": [{"content": {"parts": [{"text": "<section>ok</section>"}]}}]
                        }))
                    }
                },
            ),
        );
        let base = spawn_upstream(router).await;
        let endpoint = format!("{base}/v1/models");
        let defaults = GenerationDefaults::default();

        let client = GenerativeContentClient::new(Client::new());
        let text = client
            .complete(ProviderCall {
                provider: "gemini",
                endpoint: &endpoint,
                model: "gemini-2.5-flash",
                prompt: "pricing table",
                credential: "g-key",
                defaults: &defaults,
                timeout: Duration::from_secs(5),
            })
            .await
            .unwrap();
        assert_eq!(text, "<section>ok</section>");

        let (call, query, has_auth, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(call, "gemini-2.5-flash:generateContent");
        assert_eq!(query.get("key").map(String::as_str), Some("g-key"));
        assert!(!has_auth);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "pricing table");
    }

    #[tokio::test]
    async fn error_envelope_is_provider_error() {
        let router = Router::new().route(
            "/v1/models/{call}",
            post(|| async {
                (
                    axum::http::StatusCode::BAD_REQUEST,
                    Json(json!({"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}})),
                )
            }),
        );
        let base = spawn_upstream(router).await;
        let endpoint = format!("{base}/v1/models");
        let defaults = GenerationDefaults::default();

        let client = GenerativeContentClient::new(Client::new());
        let err = client
            .complete(ProviderCall {
                provider: "gemini",
                endpoint: &endpoint,
                model: "gemini-2.5-flash",
                prompt: "pricing table",
                credential: "bad-key",
                defaults: &defaults,
                timeout: Duration::from_secs(5),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::llm::ErrorKind::ProviderError);
        assert_eq!(err.to_string(), "API key not valid");
    }
}
