//! Content generation handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::EditorAccess;
use crate::credentials::CredentialError;
use crate::draft::PageDraft;
use crate::llm::{ContentType, GenerateError, GenerationRequest, Style};
use crate::response;
use crate::server::AppState;

use super::{credential_error, settings_error};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    prompt: String,
    #[serde(default, alias = "type")]
    content_type: ContentType,
    #[serde(default)]
    style: Style,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    content: String,
    #[serde(rename = "type")]
    content_type: ContentType,
    provider: String,
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    draft: Option<PageDraft>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/generate
pub async fn generate(
    _access: EditorAccess,
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Response {
    let settings = match state.settings.load().await {
        Ok(s) => s,
        Err(e) => return settings_error(e),
    };

    let provider = req
        .provider
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| settings.provider.clone());

    let request = GenerationRequest {
        prompt: req.prompt,
        content_type: req.content_type,
        style: req.style,
        provider,
        model: req.model.filter(|m| !m.trim().is_empty()),
    };

    let requires_credential = match state.adapter.validate(&request) {
        Ok(provider) => provider.family.requires_credential(),
        Err(e) => return response::generate_error(&e),
    };

    let credential = if requires_credential {
        match state.credentials.load(&request.provider).await {
            Ok(key) => key,
            Err(CredentialError::DecryptionFailed) => {
                let e = GenerateError::DecryptionFailed(request.provider.clone());
                return response::generate_error(&e);
            }
            Err(e) => return credential_error(e),
        }
    } else {
        None
    };

    let generation = match state
        .adapter
        .generate(&request, credential.as_deref(), &settings.defaults())
        .await
    {
        Ok(g) => g,
        Err(e) => {
            if e.kind().needs_reconfiguration() {
                warn!(provider = %request.provider, "Generation needs a configured API key");
            }
            return response::generate_error(&e);
        }
    };

    let draft = PageDraft::from_generation(request.content_type, &request.prompt, &generation.text);
    if let Some(draft) = &draft {
        info!(draft_id = %draft.id, builder = ?draft.builder, "Prepared page draft");
    }

    let body = GenerateResponse {
        content: generation.text,
        content_type: request.content_type,
        provider: generation.provider,
        model: generation.model,
        draft,
    };
    (StatusCode::OK, Json(body)).into_response()
}
