//! Session authentication extractor.
//!
//! Resolves the caller from:
//! - the `chatdesk_session` cookie set at login/registration
//! - `Authorization: Bearer <token>` (same token, for non-browser clients)
//!
//! Tokens are digested and looked up by the auth service.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;

use chatdesk_core::auth::service::SESSION_TTL_DAYS;
use chatdesk_types::error::AuthError;
use chatdesk_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "chatdesk_session";

/// The authenticated user. Extracting this rejects anonymous requests with 401.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or_else(|| {
            AppError::Unauthorized(
                "Login required. Provide the session cookie or 'Authorization: Bearer <token>'."
                    .to_string(),
            )
        })?;

        match state.auth.authenticate(&token).await {
            Ok(user) => Ok(CurrentUser(user)),
            Err(AuthError::Unauthenticated) => Err(AppError::Unauthorized(
                "Session is invalid or has expired".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session token from the bearer header, falling back to the cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token.to_string());
    }

    headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value that stores a session token.
pub fn session_cookie(token: &str) -> String {
    let max_age = SESSION_TTL_DAYS * 24 * 60 * 60;
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}")
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
