//! NeuroBlock - HTML/CSS content generation for WordPress over multiple LLM
//! providers, with API keys encrypted at rest.

pub mod auth;
pub mod config;
pub mod credentials;
pub mod draft;
pub mod handlers;
pub mod llm;
pub mod response;
pub mod server;
pub mod settings;
pub mod store;
pub mod sync;
