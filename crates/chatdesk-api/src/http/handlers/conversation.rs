//! Conversation listing, creation, history and deletion handlers.
//!
//! Every lookup is scoped to the caller; someone else's conversation is a 404.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use chatdesk_types::chat::{Conversation, MessageRole};
use chatdesk_types::error::ChatError;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentUser;
use crate::state::AppState;

const DEFAULT_TITLE: &str = "New conversation";

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
}

/// GET /api/v1/conversations - List the caller's conversations, newest first.
pub async fn list_conversations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Conversation>>, AppError> {
    Ok(Json(state.chat.store().list_for_owner(&user.id).await?))
}

/// POST /api/v1/conversations - Create an empty conversation titled from `message`.
pub async fn create_conversation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<CreateConversationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let Json(body) = payload?;
    let title_source = body
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_TITLE);

    let conversation = state.chat.store().create(user.id, title_source).await?;
    Ok((StatusCode::CREATED, Json(conversation)))
}

/// GET /api/v1/conversations/{id}/history - Messages in chronological order.
pub async fn conversation_history(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_conversation_id(&id)?;
    let messages: Vec<HistoryEntry> = state
        .chat
        .store()
        .history(&id, &user.id)
        .await?
        .into_iter()
        .map(|m| HistoryEntry {
            role: m.role,
            content: m.content,
        })
        .collect();
    Ok(Json(json!({ "messages": messages })))
}

/// POST /api/v1/conversations/{id}/delete - Delete a conversation and its messages.
pub async fn delete_conversation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = parse_conversation_id(&id)?;
    state.chat.store().delete(&id, &user.id).await?;
    Ok(Json(json!({ "status": "success" })))
}

/// Ids that cannot exist are reported the same way as ones that don't.
pub(crate) fn parse_conversation_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Chat(ChatError::NotFound))
}
