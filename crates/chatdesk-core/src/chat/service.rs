//! Owner-scoped conversation store.
//!
//! `ConversationStore` wraps a `ConversationRepository` and enforces the
//! tenancy rule: a conversation that exists but belongs to someone else is
//! reported exactly like a missing one.

use chatdesk_types::chat::{ChatMessage, Conversation, title_from_message};
use chatdesk_types::error::ChatError;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;

/// Conversation lifecycle operations, always scoped to an owner.
pub struct ConversationStore<R: ConversationRepository> {
    repo: R,
}

impl<R: ConversationRepository> ConversationStore<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Create a conversation titled from its first message.
    pub async fn create(&self, owner_id: Uuid, initial_text: &str) -> Result<Conversation, ChatError> {
        let now = Utc::now();
        let conversation = Conversation {
            id: Uuid::now_v7(),
            owner_id,
            title: title_from_message(initial_text),
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.create_conversation(&conversation).await?;
        info!(conversation_id = %created.id, owner_id = %owner_id, "Conversation created");
        Ok(created)
    }

    /// Fetch a conversation the caller owns.
    pub async fn get(&self, id: &Uuid, owner_id: &Uuid) -> Result<Conversation, ChatError> {
        self.repo
            .get_conversation(id, owner_id)
            .await?
            .ok_or(ChatError::NotFound)
    }

    /// The caller's conversations, most recently updated first.
    pub async fn list_for_owner(&self, owner_id: &Uuid) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.repo.list_conversations(owner_id).await?)
    }

    /// Delete a conversation the caller owns, along with all its messages.
    pub async fn delete(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), ChatError> {
        self.repo.delete_conversation(id, owner_id).await?;
        info!(conversation_id = %id, owner_id = %owner_id, "Conversation deleted");
        Ok(())
    }

    /// Move a conversation's last-updated timestamp to now.
    pub async fn touch(&self, id: &Uuid) -> Result<(), ChatError> {
        Ok(self.repo.touch_conversation(id, Utc::now()).await?)
    }

    /// Chronological message history of a conversation the caller owns.
    pub async fn history(&self, id: &Uuid, owner_id: &Uuid) -> Result<Vec<ChatMessage>, ChatError> {
        let conversation = self.get(id, owner_id).await?;
        Ok(self.repo.get_messages(&conversation.id).await?)
    }

    /// Number of conversations the caller owns.
    pub async fn count_for_owner(&self, owner_id: &Uuid) -> Result<u64, ChatError> {
        Ok(self.repo.count_conversations(owner_id).await?)
    }
}
