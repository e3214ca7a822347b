//! OpenAI-compatible chat completions.
//!
//! Works with OpenAI, DeepSeek, Mistral and other compatible APIs.

use async_trait::async_trait;
use reqwest::Client;

use super::error::GenerateError;
use super::prompt::SYSTEM_PROMPT;
use super::provider::{ProviderCall, WireClient, extract_text, read_envelope};
use super::types::{Message, Role};

pub struct ChatCompletionsClient {
    client: Client,
}

impl ChatCompletionsClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WireClient for ChatCompletionsClient {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<String, GenerateError> {
        let request = Request {
            model: call.model,
            messages: vec![
                Message {
                    role: Role::System,
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: Role::User,
                    content: call.prompt,
                },
            ],
            max_tokens: call.defaults.max_tokens,
            temperature: call.defaults.temperature,
        };

        let response = self
            .client
            .post(call.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", call.credential))
            .timeout(call.timeout)
            .json(&request)
            .send()
            .await?;

        let envelope = read_envelope(call.provider, response).await?;
        Ok(extract_text(
            envelope.as_ref(),
            "/choices/0/message/content",
        ))
    }
}

#[derive(serde::Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f32,
}
