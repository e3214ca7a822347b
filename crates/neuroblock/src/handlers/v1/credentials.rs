//! API key management handlers.
//!
//! Plaintext keys only ever flow inward; responses carry presence flags or
//! the mask sentinel.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::auth::AdminAccess;
use crate::credentials::KeyUpdate;
use crate::response;
use crate::server::AppState;

use super::{credential_error, settings_error};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct SaveCredentialRequest {
    provider: String,
    #[serde(default)]
    api_key: Option<String>,
}

#[derive(Serialize)]
pub struct SaveCredentialResponse {
    ok: bool,
    changed: bool,
}

#[derive(Serialize)]
pub struct CredentialStatusResponse {
    present: bool,
}

#[derive(Serialize)]
pub struct MaskedCredentialResponse {
    masked_key: String,
}

#[derive(Serialize)]
pub struct OkResponse {
    ok: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/credentials
pub async fn save_credential(
    _access: AdminAccess,
    State(state): State<AppState>,
    Json(req): Json<SaveCredentialRequest>,
) -> Response {
    let provider = req.provider.trim();
    if let Err(e) = state.adapter.registry().resolve(provider) {
        return response::generate_error(&e);
    }

    let changed = match state
        .credentials
        .save(provider, KeyUpdate::from_form(req.api_key))
        .await
    {
        Ok(changed) => changed,
        Err(e) => return credential_error(e),
    };

    if let Err(e) = state.settings.select_provider(provider).await {
        return settings_error(e);
    }

    let body = SaveCredentialResponse { ok: true, changed };
    (StatusCode::OK, Json(body)).into_response()
}

/// GET /api/v1/credentials/{provider}/status
pub async fn credential_status(
    _access: AdminAccess,
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Response {
    if let Err(e) = state.adapter.registry().resolve(&provider) {
        return response::generate_error(&e);
    }
    match state.credentials.has(&provider).await {
        Ok(present) => (StatusCode::OK, Json(CredentialStatusResponse { present })).into_response(),
        Err(e) => credential_error(e),
    }
}

/// GET /api/v1/credentials/{provider}/masked
pub async fn masked_credential(
    _access: AdminAccess,
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Response {
    if let Err(e) = state.adapter.registry().resolve(&provider) {
        return response::generate_error(&e);
    }
    match state.credentials.masked_view(&provider).await {
        Ok(masked_key) => {
            (StatusCode::OK, Json(MaskedCredentialResponse { masked_key })).into_response()
        }
        Err(e) => credential_error(e),
    }
}

/// DELETE /api/v1/credentials/{provider}
pub async fn delete_credential(
    _access: AdminAccess,
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Response {
    if let Err(e) = state.adapter.registry().resolve(&provider) {
        return response::generate_error(&e);
    }
    match state.credentials.clear(&provider).await {
        Ok(()) => (StatusCode::OK, Json(OkResponse { ok: true })).into_response(),
        Err(e) => credential_error(e),
    }
}
