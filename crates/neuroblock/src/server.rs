use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use tower_http::timeout::TimeoutLayer;

use crate::auth::AccessTokens;
use crate::credentials::CredentialStore;
use crate::handlers;
use crate::llm::RequestAdapter;
use crate::settings::SettingsStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub adapter: RequestAdapter,
    pub credentials: CredentialStore,
    pub settings: SettingsStore,
    pub access: AccessTokens,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let api_v1 = Router::new()
        .route("/generate", post(handlers::v1::generate))
        .route("/providers", get(handlers::v1::list_providers))
        .route("/credentials", post(handlers::v1::save_credential))
        .route(
            "/credentials/{provider}",
            delete(handlers::v1::delete_credential),
        )
        .route(
            "/credentials/{provider}/status",
            get(handlers::v1::credential_status),
        )
        .route(
            "/credentials/{provider}/masked",
            get(handlers::v1::masked_credential),
        )
        .route(
            "/settings",
            get(handlers::v1::get_settings).put(handlers::v1::update_settings),
        )
        .with_state(state);

    Router::new()
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        .nest("/api/v1", api_v1)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}
