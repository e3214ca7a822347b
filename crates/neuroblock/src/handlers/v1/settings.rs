use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::auth::AdminAccess;
use crate::response;
use crate::server::AppState;
use crate::settings::SettingsUpdate;

use super::settings_error;

/// GET /api/v1/settings
pub async fn get_settings(_access: AdminAccess, State(state): State<AppState>) -> Response {
    match state.settings.load().await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => settings_error(e),
    }
}

/// PUT /api/v1/settings
pub async fn update_settings(
    _access: AdminAccess,
    State(state): State<AppState>,
    Json(mut update): Json<SettingsUpdate>,
) -> Response {
    if let Some(provider) = update.provider.as_mut() {
        *provider = provider.trim().to_string();
        if let Err(e) = state.adapter.registry().resolve(provider) {
            return response::generate_error(&e);
        }
    }

    match state.settings.update(update).await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => settings_error(e),
    }
}
