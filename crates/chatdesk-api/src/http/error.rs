//! Application error type mapping to HTTP status codes and the error envelope.

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use chatdesk_infra::storage::StorageError;
use chatdesk_types::error::{AuthError, ChatError, ProfileError};
use chatdesk_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation and exchange errors.
    Chat(ChatError),
    /// Profile errors.
    Profile(ProfileError),
    /// Account and session errors.
    Auth(AuthError),
    /// Avatar upload errors.
    Storage(StorageError),
    /// No valid session.
    Unauthorized(String),
    /// Malformed request.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<ProfileError> for AppError {
    fn from(e: ProfileError) -> Self {
        AppError::Profile(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        tracing::debug!(error = %e, "Rejected JSON body");
        AppError::Validation("Invalid JSON format".to_string())
    }
}

impl From<FormRejection> for AppError {
    fn from(e: FormRejection) -> Self {
        AppError::Validation(format!("Invalid form data: {}", e.body_text()))
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Chat(ChatError::EmptyMessage) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "Message cannot be empty".to_string())
            }
            AppError::Chat(ChatError::NotFound) => {
                (StatusCode::NOT_FOUND, "CONVERSATION_NOT_FOUND", "Conversation not found".to_string())
            }
            AppError::Chat(ChatError::Completion(LlmError::MissingApiKey)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "API_KEY_MISSING", "API key not configured".to_string())
            }
            AppError::Chat(ChatError::Completion(LlmError::AuthenticationFailed)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_AUTH_ERROR",
                "Authentication error. Please verify the API key.".to_string(),
            ),
            AppError::Chat(ChatError::Completion(e)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR", e.to_string())
            }
            AppError::Chat(e @ ChatError::Storage(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Profile(ProfileError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Profile(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROFILE_ERROR", e.to_string())
            }
            AppError::Auth(AuthError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(AuthError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Auth(e @ AuthError::InvalidCredentials) => {
                (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS", e.to_string())
            }
            AppError::Auth(e @ AuthError::Unauthenticated) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", e.to_string())
            }
            AppError::Auth(e @ AuthError::InvalidResetToken) => {
                (StatusCode::BAD_REQUEST, "INVALID_RESET_TOKEN", e.to_string())
            }
            AppError::Auth(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_ERROR", e.to_string())
            }
            AppError::Storage(e @ StorageError::Io(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Storage(e) => {
                (StatusCode::BAD_REQUEST, "INVALID_UPLOAD", e.to_string())
            }
            AppError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        } else {
            tracing::debug!(code, status = status.as_u16(), error = %message, "Request rejected");
        }

        let body = json!({
            "error": message,
            "code": code,
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
