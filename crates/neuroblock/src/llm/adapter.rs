//! Request adapter: one `generate` call over every wire-shape family.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, info, warn};

use super::chat_completions::ChatCompletionsClient;
use super::error::GenerateError;
use super::generative_content::GenerativeContentClient;
use super::local_chat::LocalChatClient;
use super::prompt;
use super::provider::{ProviderCall, WireClient};
use super::registry::{ProviderConfig, ProviderRegistry, WireFamily};
use super::types::{Generation, GenerationDefaults, GenerationRequest, GenerationResult};

/// Dispatches generation requests to the client for the provider's family.
///
/// Stateless apart from the read-only registry; clone freely.
#[derive(Clone)]
pub struct RequestAdapter {
    registry: ProviderRegistry,
    clients: HashMap<WireFamily, Arc<dyn WireClient>>,
}

impl RequestAdapter {
    /// Adapter with the stock client for every family, sharing one HTTP pool.
    pub fn new(registry: ProviderRegistry) -> Self {
        let http = Client::new();
        let mut clients: HashMap<WireFamily, Arc<dyn WireClient>> = HashMap::new();
        clients.insert(
            WireFamily::ChatCompletions,
            Arc::new(ChatCompletionsClient::new(http.clone())),
        );
        clients.insert(
            WireFamily::GenerativeContent,
            Arc::new(GenerativeContentClient::new(http.clone())),
        );
        clients.insert(WireFamily::LocalChat, Arc::new(LocalChatClient::new(http)));
        Self { registry, clients }
    }

    /// Replace the client used for one family.
    #[must_use]
    pub fn with_client(mut self, family: WireFamily, client: Arc<dyn WireClient>) -> Self {
        self.clients.insert(family, client);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Checks that need no credential and no network: prompt, then provider.
    pub fn validate(&self, request: &GenerationRequest) -> Result<&ProviderConfig, GenerateError> {
        if request.prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }
        self.registry.resolve(&request.provider)
    }

    /// Generate content for `request`.
    ///
    /// `credential` is the decrypted API key, if any. It is ignored for
    /// providers that take none. No retries are attempted.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        credential: Option<&str>,
        defaults: &GenerationDefaults,
    ) -> GenerationResult {
        let provider = self.validate(request)?;

        let credential = if provider.family.requires_credential() {
            match credential {
                Some(key) if !key.is_empty() => key,
                _ => return Err(GenerateError::NoCredential(provider.id.clone())),
            }
        } else {
            ""
        };

        let model = provider.resolve_model(request.model.as_deref());
        if let Some(requested) = request.model.as_deref()
            && !requested.is_empty()
            && requested != model
        {
            debug!(provider = %provider.id, requested, model, "Requested model not supported, using default");
        }

        let Some(client) = self.clients.get(&provider.family) else {
            return Err(GenerateError::InvalidProvider(provider.id.clone()));
        };

        let composed = prompt::compose(request);
        info!(
            provider = %provider.id,
            family = %provider.family,
            model,
            content_type = request.content_type.as_str(),
            "Dispatching generation"
        );

        let call = ProviderCall {
            provider: &provider.id,
            endpoint: &provider.endpoint,
            model,
            prompt: &composed,
            credential,
            defaults,
            timeout: provider.family.timeout(),
        };

        let text = match client.complete(call).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = %provider.id, kind = e.kind().as_str(), error = %e, "Generation failed");
                return Err(e);
            }
        };

        if text.is_empty() {
            warn!(provider = %provider.id, model, "Provider returned no text");
        } else {
            debug!(provider = %provider.id, chars = text.len(), "Generation complete");
        }

        Ok(Generation {
            text,
            provider: provider.id.clone(),
            model: model.to_string(),
        })
    }
}
