//! In-memory `ConversationRepository` for service tests.

use std::sync::Mutex;

use chatdesk_types::chat::{ChatMessage, Conversation};
use chatdesk_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::chat::repository::ConversationRepository;

#[derive(Default)]
pub(crate) struct MemoryConversationRepository {
    pub conversations: Mutex<Vec<Conversation>>,
    pub messages: Mutex<Vec<ChatMessage>>,
    /// When set, `save_message` fails for assistant messages.
    pub fail_assistant_writes: bool,
}

impl MemoryConversationRepository {
    fn sorted_messages(&self, conversation_id: &Uuid) -> Vec<ChatMessage> {
        let mut msgs: Vec<ChatMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.conversation_id == conversation_id)
            .cloned()
            .collect();
        msgs.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        msgs
    }
}

impl ConversationRepository for MemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        self.conversations.lock().unwrap().push(conversation.clone());
        Ok(conversation.clone())
    }

    async fn get_conversation(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .find(|c| &c.id == id && &c.owner_id == owner_id)
            .cloned())
    }

    async fn list_conversations(&self, owner_id: &Uuid) -> Result<Vec<Conversation>, RepositoryError> {
        let mut convs: Vec<Conversation> = self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.owner_id == owner_id)
            .cloned()
            .collect();
        convs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(convs)
    }

    async fn delete_conversation(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), RepositoryError> {
        let mut convs = self.conversations.lock().unwrap();
        let before = convs.len();
        convs.retain(|c| !(&c.id == id && &c.owner_id == owner_id));
        if convs.len() == before {
            return Err(RepositoryError::NotFound);
        }
        self.messages
            .lock()
            .unwrap()
            .retain(|m| &m.conversation_id != id);
        Ok(())
    }

    async fn touch_conversation(&self, id: &Uuid, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut convs = self.conversations.lock().unwrap();
        let conv = convs
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or(RepositoryError::NotFound)?;
        conv.updated_at = at;
        Ok(())
    }

    async fn count_conversations(&self, owner_id: &Uuid) -> Result<u64, RepositoryError> {
        Ok(self
            .conversations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.owner_id == owner_id)
            .count() as u64)
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        if self.fail_assistant_writes
            && message.role == chatdesk_types::chat::MessageRole::Assistant
        {
            return Err(RepositoryError::Query("database is locked".to_string()));
        }
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn get_messages(&self, conversation_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        Ok(self.sorted_messages(conversation_id))
    }

    async fn get_recent_messages(
        &self,
        conversation_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let msgs = self.sorted_messages(conversation_id);
        let skip = msgs.len().saturating_sub(limit as usize);
        Ok(msgs.into_iter().skip(skip).collect())
    }

    async fn count_messages(&self, conversation_id: &Uuid) -> Result<u32, RepositoryError> {
        Ok(self.sorted_messages(conversation_id).len() as u32)
    }
}
