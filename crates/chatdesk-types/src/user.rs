//! User identity, session, and password reset types.
//!
//! Users are owned by the auth subsystem; conversations and profiles only
//! reference them by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum username length.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Minimum password length accepted at registration and reset.
pub const PASSWORD_MIN_CHARS: usize = 8;

/// A registered user.
///
/// The password hash is skipped during serialization so a `User` can be
/// returned from API handlers directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// A login session. Only the digest of the bearer token is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token_digest: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// A single-use password reset grant.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordReset {
    pub token_digest: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
}

/// Registration form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

/// Check a username: non-empty, at most 150 characters, only letters,
/// digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username cannot be empty".to_string());
    }
    if username.chars().count() > USERNAME_MAX_CHARS {
        return Err(format!(
            "username must be at most {USERNAME_MAX_CHARS} characters"
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err("username may contain only letters, digits and @/./+/-/_".to_string());
    }
    Ok(())
}

/// Check a first or last name against the column limit.
pub fn validate_person_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() > USERNAME_MAX_CHARS {
        return Err(format!(
            "names must be at most {USERNAME_MAX_CHARS} characters"
        ));
    }
    Ok(())
}

/// Minimal structural email check: exactly one `@` with non-empty sides and
/// a dot in the domain.
pub fn validate_email(email: &str) -> Result<(), String> {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("enter a valid email address".to_string());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || email.contains(' ') {
        return Err("enter a valid email address".to_string());
    }
    Ok(())
}

/// Check that both password fields match and meet the minimum length.
pub fn validate_new_password(password1: &str, password2: &str) -> Result<(), String> {
    if password1 != password2 {
        return Err("the two password fields didn't match".to_string());
    }
    if password1.chars().count() < PASSWORD_MIN_CHARS {
        return Err(format!(
            "password must contain at least {PASSWORD_MIN_CHARS} characters"
        ));
    }
    Ok(())
}
