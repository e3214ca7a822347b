//! V1 API handlers.

mod credentials;
mod generate;
mod providers;
mod settings;

pub use credentials::{credential_status, delete_credential, masked_credential, save_credential};
pub use generate::generate;
pub use providers::list_providers;
pub use settings::{get_settings, update_settings};

use axum::response::Response;
use tracing::error;

use crate::credentials::CredentialError;
use crate::response;
use crate::settings::SettingsError;

fn credential_error(err: CredentialError) -> Response {
    error!(error = %err, "Credential store failure");
    response::internal_error("credential store failure")
}

fn settings_error(err: SettingsError) -> Response {
    match err {
        SettingsError::InvalidMaxTokens | SettingsError::InvalidTemperature => {
            response::bad_request(err.to_string())
        }
        SettingsError::Store(e) => {
            error!(error = %e, "Settings store failure");
            response::internal_error("settings store failure")
        }
    }
}
