//! SQLite user repository implementation.

use chatdesk_core::auth::repository::UserRepository;
use chatdesk_types::error::RepositoryError;
use chatdesk_types::user::User;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, map_write_error, parse_datetime, parse_uuid};

/// SQLite-backed implementation of `UserRepository`.
pub struct SqliteUserRepository {
    pool: DatabasePool,
}

impl SqliteUserRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: String) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT * FROM users WHERE {column} = ?");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let user_row =
                    UserRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(user_row.into_user()?))
            }
            None => Ok(None),
        }
    }

    async fn update_where_id(&self, sql: &str, id: &Uuid, values: &[String]) -> Result<(), RepositoryError> {
        let mut query = sqlx::query(sql);
        for value in values {
            query = query.bind(value.as_str());
        }
        let result = query
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

struct UserRow {
    id: String,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    created_at: String,
    last_login: Option<String>,
}

impl UserRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            password_hash: row.try_get("password_hash")?,
            created_at: row.try_get("created_at")?,
            last_login: row.try_get("last_login")?,
        })
    }

    fn into_user(self) -> Result<User, RepositoryError> {
        Ok(User {
            id: parse_uuid(&self.id, "user id")?,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            password_hash: self.password_hash,
            created_at: parse_datetime(&self.created_at)?,
            last_login: self.last_login.as_deref().map(parse_datetime).transpose()?,
        })
    }
}

impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, user: &User) -> Result<User, RepositoryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (id, username, email, first_name, last_name, password_hash, created_at, last_login)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.password_hash)
        .bind(format_datetime(&user.created_at))
        .bind(user.last_login.as_ref().map(format_datetime))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(user.clone()),
            Err(e) => Err(map_write_error(e, || {
                format!("a user named '{}' or with that email already exists", user.username)
            })),
        }
    }

    async fn get_user(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_by("id", id.to_string()).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        self.fetch_one_by("username", username.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        // The email column is declared COLLATE NOCASE.
        self.fetch_one_by("email", email.to_string()).await
    }

    async fn update_password(&self, id: &Uuid, password_hash: &str) -> Result<(), RepositoryError> {
        self.update_where_id(
            "UPDATE users SET password_hash = ? WHERE id = ?",
            id,
            &[password_hash.to_string()],
        )
        .await
    }

    async fn update_names(
        &self,
        id: &Uuid,
        first_name: &str,
        last_name: &str,
    ) -> Result<(), RepositoryError> {
        self.update_where_id(
            "UPDATE users SET first_name = ?, last_name = ? WHERE id = ?",
            id,
            &[first_name.to_string(), last_name.to_string()],
        )
        .await
    }

    async fn record_login(&self, id: &Uuid, at: DateTime<Utc>) -> Result<(), RepositoryError> {
        self.update_where_id(
            "UPDATE users SET last_login = ? WHERE id = ?",
            id,
            &[format_datetime(&at)],
        )
        .await
    }

    async fn count_users(&self) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM users")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(count as u64)
    }
}
