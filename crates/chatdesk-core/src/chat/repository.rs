//! ConversationRepository trait definition.
//!
//! Provides CRUD operations for conversations and their messages.
//! Every conversation read or delete that originates from a user request
//! takes the owner id so lookups are always tenant-scoped.

use chatdesk_types::chat::{ChatMessage, Conversation};
use chatdesk_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
///
/// Implementations live in chatdesk-infra (e.g., `SqliteConversationRepository`).
pub trait ConversationRepository: Send + Sync {
    /// Insert a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by id, only if it belongs to `owner_id`.
    fn get_conversation(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List an owner's conversations, ordered by updated_at DESC.
    fn list_conversations(
        &self,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Delete a conversation and its messages.
    ///
    /// Returns `RepositoryError::NotFound` when no conversation with this id
    /// belongs to `owner_id`.
    fn delete_conversation(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Set a conversation's updated_at.
    fn touch_conversation(
        &self,
        id: &Uuid,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Count an owner's conversations.
    fn count_conversations(
        &self,
        owner_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Save a new message.
    fn save_message(
        &self,
        message: &ChatMessage,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// All messages of a conversation, ordered by created_at ASC.
    fn get_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// The last `limit` messages of a conversation, ordered by created_at ASC.
    fn get_recent_messages(
        &self,
        conversation_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Number of messages in a conversation.
    fn count_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u32, RepositoryError>> + Send;
}
