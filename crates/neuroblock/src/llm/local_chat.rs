//! Ollama-style local chat, no credential.

use async_trait::async_trait;
use reqwest::Client;

use super::error::GenerateError;
use super::provider::{ProviderCall, WireClient, extract_text, read_envelope};
use super::types::{Message, Role};

pub struct LocalChatClient {
    client: Client,
}

impl LocalChatClient {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WireClient for LocalChatClient {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<String, GenerateError> {
        let request = Request {
            model: call.model,
            messages: vec![Message {
                role: Role::User,
                content: call.prompt,
            }],
            stream: false,
        };

        let response = self
            .client
            .post(call.endpoint)
            .header("Content-Type", "application/json")
            .timeout(call.timeout)
            .json(&request)
            .send()
            .await?;

        let envelope = read_envelope(call.provider, response).await?;
        Ok(extract_text(envelope.as_ref(), "/message/content"))
    }
}

#[derive(serde::Serialize)]
struct Request<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}
