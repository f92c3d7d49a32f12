//! SQLite profile repository implementation.

use chatdesk_core::profile::repository::ProfileRepository;
use chatdesk_types::error::RepositoryError;
use chatdesk_types::profile::{FontSize, Theme, UserProfile};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `ProfileRepository`.
pub struct SqliteProfileRepository {
    pool: DatabasePool,
}

impl SqliteProfileRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, user_id: &Uuid, from_writer: bool) -> Result<Option<UserProfile>, RepositoryError> {
        let executor = if from_writer {
            &self.pool.writer
        } else {
            &self.pool.reader
        };
        let row = sqlx::query("SELECT * FROM user_profiles WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(executor)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let profile_row =
                    ProfileRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(profile_row.into_profile()?))
            }
            None => Ok(None),
        }
    }
}

struct ProfileRow {
    user_id: String,
    bio: String,
    profile_image: Option<String>,
    theme: String,
    font_size: String,
    email_notifications: bool,
    show_typing_status: bool,
    joined_at: String,
    last_modified: String,
}

impl ProfileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            bio: row.try_get("bio")?,
            profile_image: row.try_get("profile_image")?,
            theme: row.try_get("theme")?,
            font_size: row.try_get("font_size")?,
            email_notifications: row.try_get("email_notifications")?,
            show_typing_status: row.try_get("show_typing_status")?,
            joined_at: row.try_get("joined_at")?,
            last_modified: row.try_get("last_modified")?,
        })
    }

    fn into_profile(self) -> Result<UserProfile, RepositoryError> {
        let theme: Theme = self
            .theme
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let font_size: FontSize = self
            .font_size
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(UserProfile {
            user_id: parse_uuid(&self.user_id, "user_id")?,
            bio: self.bio,
            profile_image: self.profile_image,
            theme,
            font_size,
            email_notifications: self.email_notifications,
            show_typing_status: self.show_typing_status,
            joined_at: parse_datetime(&self.joined_at)?,
            last_modified: parse_datetime(&self.last_modified)?,
        })
    }
}

impl ProfileRepository for SqliteProfileRepository {
    async fn get_profile(&self, user_id: &Uuid) -> Result<Option<UserProfile>, RepositoryError> {
        self.fetch(user_id, false).await
    }

    async fn create_profile(&self, profile: &UserProfile) -> Result<UserProfile, RepositoryError> {
        sqlx::query(
            r#"INSERT OR IGNORE INTO user_profiles
               (user_id, bio, profile_image, theme, font_size, email_notifications, show_typing_status, joined_at, last_modified)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(profile.user_id.to_string())
        .bind(&profile.bio)
        .bind(&profile.profile_image)
        .bind(profile.theme.to_string())
        .bind(profile.font_size.to_string())
        .bind(profile.email_notifications)
        .bind(profile.show_typing_status)
        .bind(format_datetime(&profile.joined_at))
        .bind(format_datetime(&profile.last_modified))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        // A concurrent request may have won the insert; return whatever is stored.
        self.fetch(&profile.user_id, true)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn update_profile(&self, profile: &UserProfile) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"UPDATE user_profiles
               SET bio = ?, profile_image = ?, theme = ?, font_size = ?,
                   email_notifications = ?, show_typing_status = ?, last_modified = ?
               WHERE user_id = ?"#,
        )
        .bind(&profile.bio)
        .bind(&profile.profile_image)
        .bind(profile.theme.to_string())
        .bind(profile.font_size.to_string())
        .bind(profile.email_notifications)
        .bind(profile.show_typing_status)
        .bind(format_datetime(&profile.last_modified))
        .bind(profile.user_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
