//! UserRepository and SessionRepository trait definitions.

use chatdesk_types::error::RepositoryError;
use chatdesk_types::user::{PasswordReset, Session, User};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository trait for user accounts.
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is taken.
    fn create_user(
        &self,
        user: &User,
    ) -> impl std::future::Future<Output = Result<User, RepositoryError>> + Send;

    fn get_user(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    /// Look up a user by email, ignoring ASCII case.
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, RepositoryError>> + Send;

    fn update_password(
        &self,
        id: &Uuid,
        password_hash: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn update_names(
        &self,
        id: &Uuid,
        first_name: &str,
        last_name: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn record_login(
        &self,
        id: &Uuid,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn count_users(&self) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}

/// Repository trait for login sessions and password reset grants.
///
/// Both are keyed by token digest; raw tokens never reach storage.
pub trait SessionRepository: Send + Sync {
    fn create_session(
        &self,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_session(
        &self,
        token_digest: &str,
    ) -> impl std::future::Future<Output = Result<Option<Session>, RepositoryError>> + Send;

    /// Delete one session. Deleting a missing session is not an error.
    fn delete_session(
        &self,
        token_digest: &str,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete every session of a user, returning how many were removed.
    fn delete_user_sessions(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    fn create_reset(
        &self,
        reset: &PasswordReset,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    fn get_reset(
        &self,
        token_digest: &str,
    ) -> impl std::future::Future<Output = Result<Option<PasswordReset>, RepositoryError>> + Send;

    /// Atomically mark a reset as used if it is still unused and unexpired
    /// at `now`. Returns `false` when the reset was missing, already used,
    /// or expired; at most one concurrent caller gets `true`.
    fn claim_reset(
        &self,
        token_digest: &str,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
