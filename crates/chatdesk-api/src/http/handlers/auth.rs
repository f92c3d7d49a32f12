//! Account handlers: registration, login, logout and password reset.
//!
//! Browser forms get a 303 redirect plus the session cookie; JSON clients
//! get the user object (and the same cookie).

use axum::extract::State;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use chatdesk_types::user::{RegisterRequest, User};

use crate::http::error::AppError;
use crate::http::extractors::body::FormOrJson;
use crate::http::extractors::session::{clear_session_cookie, session_cookie, session_token};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmForm {
    pub token: String,
    pub password1: String,
    pub password2: String,
}

/// POST /auth/register - Create an account and log it in.
pub async fn register(
    State(state): State<AppState>,
    body: FormOrJson<RegisterRequest>,
) -> Result<Response, AppError> {
    let (user, token) = state.auth.register(body.value).await?;
    state.profiles.get_or_create(&user.id).await?;
    Ok(signed_in(&user, &token, body.is_json, StatusCode::CREATED))
}

/// POST /auth/login - Verify credentials and start a session.
pub async fn login(
    State(state): State<AppState>,
    body: FormOrJson<LoginForm>,
) -> Result<Response, AppError> {
    let (user, token) = state
        .auth
        .login(&body.value.username, &body.value.password)
        .await?;
    Ok(signed_in(&user, &token, body.is_json, StatusCode::OK))
}

/// POST /auth/logout - End the current session, if any.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        state.auth.logout(&token).await?;
    }
    Ok((
        StatusCode::SEE_OTHER,
        [
            (LOCATION, "/auth/login".to_string()),
            (SET_COOKIE, clear_session_cookie()),
        ],
    )
        .into_response())
}

/// POST /auth/password-reset - Email a reset link. Unknown addresses get the same answer.
pub async fn request_password_reset(
    State(state): State<AppState>,
    body: FormOrJson<PasswordResetForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.auth.request_password_reset(&body.value.email).await?;
    Ok(Json(json!({ "status": "sent" })))
}

/// POST /auth/password-reset/confirm - Set a new password from a reset token.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    body: FormOrJson<PasswordResetConfirmForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let form = body.value;
    state
        .auth
        .confirm_password_reset(&form.token, &form.password1, &form.password2)
        .await?;
    Ok(Json(json!({ "status": "success" })))
}

fn signed_in(user: &User, token: &str, is_json: bool, json_status: StatusCode) -> Response {
    let cookie = session_cookie(token);
    if is_json {
        (
            json_status,
            [(SET_COOKIE, cookie)],
            Json(json!({ "user": user, "token": token })),
        )
            .into_response()
    } else {
        (
            StatusCode::SEE_OTHER,
            [(LOCATION, "/".to_string()), (SET_COOKIE, cookie)],
        )
            .into_response()
    }
}
