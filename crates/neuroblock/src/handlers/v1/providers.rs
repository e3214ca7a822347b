use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::auth::EditorAccess;
use crate::llm::WireFamily;
use crate::server::AppState;

use super::credential_error;

#[derive(Serialize)]
pub struct ProviderSummary {
    id: String,
    name: String,
    family: WireFamily,
    models: Vec<String>,
    configured: bool,
}

#[derive(Serialize)]
pub struct ListProvidersResponse {
    providers: Vec<ProviderSummary>,
}

/// GET /api/v1/providers
pub async fn list_providers(_access: EditorAccess, State(state): State<AppState>) -> Response {
    let mut providers = Vec::new();
    for provider in state.adapter.registry().iter() {
        let configured = if provider.family.requires_credential() {
            match state.credentials.has(&provider.id).await {
                Ok(present) => present,
                Err(e) => return credential_error(e),
            }
        } else {
            true
        };
        providers.push(ProviderSummary {
            id: provider.id.clone(),
            name: provider.display_name.clone(),
            family: provider.family,
            models: provider.models.clone(),
            configured,
        });
    }

    (StatusCode::OK, Json(ListProvidersResponse { providers })).into_response()
}
