//! LLM provider clients for HTML/CSS generation.

mod adapter;
mod chat_completions;
mod error;
mod generative_content;
mod local_chat;
mod prompt;
mod provider;
mod registry;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use adapter::RequestAdapter;
pub use chat_completions::ChatCompletionsClient;
pub use error::{ErrorKind, GenerateError};
pub use generative_content::GenerativeContentClient;
pub use local_chat::LocalChatClient;
pub use prompt::compose as compose_prompt;
pub use provider::{ProviderCall, WireClient};
pub use registry::{
    LOCAL_TIMEOUT, ProviderConfig, ProviderRegistry, REMOTE_TIMEOUT, RegistryError, WireFamily,
};
pub use types::{
    ContentType, Generation, GenerationDefaults, GenerationRequest, GenerationResult, Style,
};
