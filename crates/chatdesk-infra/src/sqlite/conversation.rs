//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `chatdesk-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, reads on the reader pool
//! and writes on the single-connection writer.

use chatdesk_core::chat::repository::ConversationRepository;
use chatdesk_types::chat::{ChatMessage, Conversation, MessageRole};
use chatdesk_types::error::RepositoryError;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    owner_id: String,
    title: String,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        Ok(Conversation {
            id: parse_uuid(&self.id, "conversation id")?,
            owner_id: parse_uuid(&self.owner_id, "owner_id")?,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ChatMessageRow {
    id: String,
    conversation_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            conversation_id: row.try_get("conversation_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ChatMessage {
            id: parse_uuid(&self.id, "message id")?,
            conversation_id: parse_uuid(&self.conversation_id, "conversation_id")?,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

fn map_messages(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let msg_row =
            ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        messages.push(msg_row.into_message()?);
    }
    Ok(messages)
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO conversations (id, owner_id, title, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.owner_id.to_string())
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .bind(format_datetime(&conversation.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(conversation.clone())
    }

    async fn get_conversation(
        &self,
        id: &Uuid,
        owner_id: &Uuid,
    ) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(
        &self,
        owner_id: &Uuid,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE owner_id = ? ORDER BY updated_at DESC, id DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conv_row =
                ConversationRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            conversations.push(conv_row.into_conversation()?);
        }

        Ok(conversations)
    }

    async fn delete_conversation(&self, id: &Uuid, owner_id: &Uuid) -> Result<(), RepositoryError> {
        // chat_messages rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM conversations WHERE id = ? AND owner_id = ?")
            .bind(id.to_string())
            .bind(owner_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn touch_conversation(&self, id: &Uuid, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET updated_at = ? WHERE id = ?")
            .bind(format_datetime(&at))
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn count_conversations(&self, owner_id: &Uuid) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM conversations WHERE owner_id = ?")
            .bind(owner_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }

    async fn save_message(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_messages (id, conversation_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.conversation_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn get_messages(&self, conversation_id: &Uuid) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chat_messages WHERE conversation_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_messages(&rows)
    }

    async fn get_recent_messages(
        &self,
        conversation_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT * FROM (
                   SELECT * FROM chat_messages WHERE conversation_id = ?
                   ORDER BY created_at DESC, id DESC LIMIT ?
               ) ORDER BY created_at ASC, id ASC"#,
        )
        .bind(conversation_id.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        map_messages(&rows)
    }

    async fn count_messages(&self, conversation_id: &Uuid) -> Result<u32, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM chat_messages WHERE conversation_id = ?")
            .bind(conversation_id.to_string())
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_support::{insert_user, test_pool};
    use chrono::Duration;

    fn make_conversation(owner_id: Uuid, title: &str) -> Conversation {
        let now = Utc::now();
        Conversation {
            id: Uuid::now_v7(),
            owner_id,
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_scoped_to_owner() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;

        let conv = repo
            .create_conversation(&make_conversation(alice, "hello"))
            .await
            .unwrap();

        let fetched = repo.get_conversation(&conv.id, &alice).await.unwrap().unwrap();
        assert_eq!(fetched.title, "hello");
        assert_eq!(fetched.owner_id, alice);
        assert!(repo.get_conversation(&conv.id, &bob).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_updated_desc() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice").await;

        let older = repo
            .create_conversation(&make_conversation(owner, "older"))
            .await
            .unwrap();
        let newer = repo
            .create_conversation(&make_conversation(owner, "newer"))
            .await
            .unwrap();

        repo.touch_conversation(&older.id, Utc::now() + Duration::seconds(5))
            .await
            .unwrap();

        let listed = repo.list_conversations(&owner).await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![older.id, newer.id]);
        assert_eq!(repo.count_conversations(&owner).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_cascades_messages() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice").await;
        let conv = repo
            .create_conversation(&make_conversation(owner, "bye"))
            .await
            .unwrap();

        repo.save_message(&ChatMessage::new(conv.id, MessageRole::User, "q"))
            .await
            .unwrap();
        repo.save_message(&ChatMessage::new(conv.id, MessageRole::Assistant, "a"))
            .await
            .unwrap();
        assert_eq!(repo.count_messages(&conv.id).await.unwrap(), 2);

        repo.delete_conversation(&conv.id, &owner).await.unwrap();
        assert_eq!(repo.count_messages(&conv.id).await.unwrap(), 0);
        assert!(repo.get_conversation(&conv.id, &owner).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_other_owner_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let alice = insert_user(&pool, "alice").await;
        let bob = insert_user(&pool, "bob").await;
        let conv = repo
            .create_conversation(&make_conversation(alice, "mine"))
            .await
            .unwrap();

        let err = repo.delete_conversation(&conv.id, &bob).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
        assert!(repo.get_conversation(&conv.id, &alice).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_touch_missing_is_not_found() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let err = repo
            .touch_conversation(&Uuid::now_v7(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_messages_chronological_and_recent_tail() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice").await;
        let conv = repo
            .create_conversation(&make_conversation(owner, "count"))
            .await
            .unwrap();

        let base = Utc::now();
        for i in 0..8 {
            let mut msg = ChatMessage::new(conv.id, MessageRole::User, format!("m{i}"));
            msg.created_at = base + Duration::milliseconds(i);
            repo.save_message(&msg).await.unwrap();
        }

        let all = repo.get_messages(&conv.id).await.unwrap();
        assert_eq!(all.len(), 8);
        assert!(all.windows(2).all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(all[0].content, "m0");

        let recent = repo.get_recent_messages(&conv.id, 3).await.unwrap();
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m5", "m6", "m7"]);
    }

    #[tokio::test]
    async fn test_same_timestamp_ordered_by_id() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice").await;
        let conv = repo
            .create_conversation(&make_conversation(owner, "tie"))
            .await
            .unwrap();

        let at = Utc::now();
        let mut first = ChatMessage::new(conv.id, MessageRole::User, "first");
        let mut second = ChatMessage::new(conv.id, MessageRole::Assistant, "second");
        first.created_at = at;
        second.created_at = at;
        // Insert out of order; the v7 id still sorts `first` ahead.
        repo.save_message(&second).await.unwrap();
        repo.save_message(&first).await.unwrap();

        let all = repo.get_messages(&conv.id).await.unwrap();
        assert_eq!(all[0].content, "first");
        assert_eq!(all[1].role, MessageRole::Assistant);
    }

    #[tokio::test]
    async fn test_unicode_content_roundtrips() {
        let pool = test_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice").await;
        let conv = repo
            .create_conversation(&make_conversation(owner, "¿qué?"))
            .await
            .unwrap();

        repo.save_message(&ChatMessage::new(conv.id, MessageRole::User, "¡Hola! 你好 🙂"))
            .await
            .unwrap();
        let all = repo.get_messages(&conv.id).await.unwrap();
        assert_eq!(all[0].content, "¡Hola! 你好 🙂");
    }
}
