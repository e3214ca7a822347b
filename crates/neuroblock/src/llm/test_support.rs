//! Upstream doubles shared by tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;

use super::error::GenerateError;
use super::provider::{ProviderCall, WireClient};

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub(crate) async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// What a [`RecordingClient`] saw on its last call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub prompt: String,
    pub credential: String,
    pub timeout_secs: u64,
}

/// Wire client that never touches the network.
pub(crate) struct RecordingClient {
    reply: String,
    calls: AtomicUsize,
    last: Mutex<Option<RecordedCall>>,
}

impl RecordingClient {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<RecordedCall> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl WireClient for RecordingClient {
    async fn complete(&self, call: ProviderCall<'_>) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(RecordedCall {
            provider: call.provider.to_string(),
            endpoint: call.endpoint.to_string(),
            model: call.model.to_string(),
            prompt: call.prompt.to_string(),
            credential: call.credential.to_string(),
            timeout_secs: call.timeout.as_secs(),
        });
        Ok(self.reply.clone())
    }
}
