//! SQLite session and password reset repository implementation.

use chatdesk_core::auth::repository::SessionRepository;
use chatdesk_types::error::RepositoryError;
use chatdesk_types::user::{PasswordReset, Session};
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `SessionRepository`.
pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

/// Rows removed by [`SqliteSessionRepository::purge_expired`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeCounts {
    pub sessions: u64,
    pub resets: u64,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Remove sessions expired at `now`, plus resets that are used or expired.
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> Result<PurgeCounts, RepositoryError> {
        let now = format_datetime(&now);
        let sessions = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        let resets = sqlx::query("DELETE FROM password_resets WHERE used = 1 OR expires_at <= ?")
            .bind(now.as_str())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(PurgeCounts {
            sessions: sessions.rows_affected(),
            resets: resets.rows_affected(),
        })
    }
}

fn session_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Session, RepositoryError> {
    let get = |col: &str| -> Result<String, RepositoryError> {
        row.try_get(col)
            .map_err(|e: sqlx::Error| RepositoryError::Query(e.to_string()))
    };
    Ok(Session {
        token_digest: get("token_digest")?,
        user_id: parse_uuid(&get("user_id")?, "user_id")?,
        created_at: parse_datetime(&get("created_at")?)?,
        expires_at: parse_datetime(&get("expires_at")?)?,
    })
}

fn reset_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<PasswordReset, RepositoryError> {
    let get = |col: &str| -> Result<String, RepositoryError> {
        row.try_get(col)
            .map_err(|e: sqlx::Error| RepositoryError::Query(e.to_string()))
    };
    let used: bool = row
        .try_get("used")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    Ok(PasswordReset {
        token_digest: get("token_digest")?,
        user_id: parse_uuid(&get("user_id")?, "user_id")?,
        created_at: parse_datetime(&get("created_at")?)?,
        expires_at: parse_datetime(&get("expires_at")?)?,
        used,
    })
}

impl SessionRepository for SqliteSessionRepository {
    async fn create_session(&self, session: &Session) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sessions (token_digest, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token_digest)
        .bind(session.user_id.to_string())
        .bind(format_datetime(&session.created_at))
        .bind(format_datetime(&session.expires_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get_session(&self, token_digest: &str) -> Result<Option<Session>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM sessions WHERE token_digest = ?")
            .bind(token_digest)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn delete_session(&self, token_digest: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM sessions WHERE token_digest = ?")
            .bind(token_digest)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn delete_user_sessions(&self, user_id: &Uuid) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected())
    }

    async fn create_reset(&self, reset: &PasswordReset) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO password_resets (token_digest, user_id, created_at, expires_at, used)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&reset.token_digest)
        .bind(reset.user_id.to_string())
        .bind(format_datetime(&reset.created_at))
        .bind(format_datetime(&reset.expires_at))
        .bind(reset.used)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(())
    }

    async fn get_reset(&self, token_digest: &str) -> Result<Option<PasswordReset>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM password_resets WHERE token_digest = ?")
            .bind(token_digest)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.as_ref().map(reset_from_row).transpose()
    }

    async fn claim_reset(&self, token_digest: &str, now: DateTime<Utc>) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE password_resets SET used = 1 WHERE token_digest = ? AND used = 0 AND expires_at > ?",
        )
        .bind(token_digest)
        .bind(format_datetime(&now))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() == 1)
    }
}
