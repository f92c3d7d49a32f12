//! Chat home and message exchange handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use chatdesk_core::chat::exchange::ExchangeReply;
use chatdesk_types::chat::Conversation;
use chatdesk_types::user::User;

use crate::http::error::AppError;
use crate::http::extractors::session::CurrentUser;
use crate::http::handlers::conversation::parse_conversation_id;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: String,
    /// Kept as text so a malformed id reads as an unknown conversation.
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatHome {
    pub conversations: Vec<Conversation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<serde_json::Value>,
}

/// GET /api/v1/chat - The caller's conversations, plus diagnostics in debug mode.
pub async fn chat_home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ChatHome>, AppError> {
    let conversations = state.chat.store().list_for_owner(&user.id).await?;
    let debug_info = if state.config.debug {
        Some(debug_info(&state, &user, conversations.len()))
    } else {
        None
    };

    Ok(Json(ChatHome {
        conversations,
        debug_info,
    }))
}

/// POST /api/v1/chat/message - Send a message and wait for the assistant's reply.
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<ExchangeReply>, AppError> {
    let Json(body) = payload?;
    let conversation_id = body
        .conversation_id
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_conversation_id)
        .transpose()?;
    let reply = state
        .chat
        .send(user.id, &body.message, conversation_id)
        .await?;
    Ok(Json(reply))
}

fn debug_info(state: &AppState, user: &User, total_conversations: usize) -> serde_json::Value {
    let provider = state.chat.provider();
    json!({
        "user_info": {
            "username": user.username,
            "email": user.email,
            "is_authenticated": true,
        },
        "api_info": {
            "api_key_exists": provider.has_api_key(),
            "api_key_length": provider.api_key_len(),
            "api_endpoint": provider.endpoint(),
            "model": state.chat.settings().model,
        },
        "system_info": {
            "debug_mode": state.config.debug,
            "database": state.config.db_name,
            "total_conversations": total_conversations,
        },
    })
}
