//! Bearer-token access control.
//!
//! Two privileges: editors may generate content, admins may also manage
//! credentials and settings. With no tokens configured the API is open.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::Response;
use subtle::ConstantTimeEq;

use crate::response;
use crate::server::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    Editor,
    Admin,
}

/// Configured tokens.
#[derive(Debug, Clone, Default)]
pub struct AccessTokens {
    admin: Option<String>,
    editor: Option<String>,
}

impl AccessTokens {
    pub fn new(admin: Option<String>, editor: Option<String>) -> Self {
        let non_empty = |t: Option<String>| t.filter(|t| !t.is_empty());
        Self {
            admin: non_empty(admin),
            editor: non_empty(editor),
        }
    }

    /// No tokens configured, every request is allowed.
    pub fn is_open(&self) -> bool {
        self.admin.is_none() && self.editor.is_none()
    }

    /// Whether `presented` grants `required`.
    pub fn grants(&self, presented: Option<&str>, required: Privilege) -> bool {
        if self.is_open() {
            return true;
        }
        let Some(presented) = presented else {
            return false;
        };

        let admin = self
            .admin
            .as_deref()
            .is_some_and(|t| token_eq(t, presented));
        match required {
            Privilege::Admin => admin,
            Privilege::Editor => {
                admin
                    || self
                        .editor
                        .as_deref()
                        .is_some_and(|t| token_eq(t, presented))
            }
        }
    }

    fn check(&self, parts: &Parts, required: Privilege) -> Result<(), Response> {
        if self.is_open() {
            return Ok(());
        }
        let Some(presented) = bearer_token(parts) else {
            return Err(response::unauthorized("missing bearer token"));
        };
        if self.grants(Some(presented), required) {
            Ok(())
        } else {
            Err(response::forbidden("insufficient privileges"))
        }
    }
}

fn token_eq(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
        .filter(|t| !t.is_empty())
}

/// Extractor: caller may generate content.
pub struct EditorAccess;

/// Extractor: caller may manage credentials and settings.
pub struct AdminAccess;

impl FromRequestParts<AppState> for EditorAccess {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.access.check(parts, Privilege::Editor)?;
        Ok(EditorAccess)
    }
}

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.access.check(parts, Privilege::Admin)?;
        Ok(AdminAccess)
    }
}
