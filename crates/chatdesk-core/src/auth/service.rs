//! Account and session management.
//!
//! `AuthService` owns registration, login/logout, session resolution and the
//! password reset flow. Raw session and reset tokens are handed to the
//! caller exactly once; storage only ever sees their digests.

use chatdesk_types::error::AuthError;
use chatdesk_types::user::{
    PasswordReset, RegisterRequest, Session, User, validate_email, validate_new_password,
    validate_person_name, validate_username,
};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::credentials::CredentialHasher;
use crate::auth::mailer::Mailer;
use crate::auth::repository::{SessionRepository, UserRepository};

/// Lifetime of a login session.
pub const SESSION_TTL_DAYS: i64 = 14;

/// Lifetime of a password reset link.
pub const RESET_TTL_HOURS: i64 = 1;

pub struct AuthService<U, S, H, M>
where
    U: UserRepository,
    S: SessionRepository,
    H: CredentialHasher + 'static,
    M: Mailer,
{
    users: U,
    sessions: S,
    hasher: Arc<H>,
    mailer: M,
    public_url: Option<String>,
}

impl<U, S, H, M> AuthService<U, S, H, M>
where
    U: UserRepository,
    S: SessionRepository,
    H: CredentialHasher + 'static,
    M: Mailer,
{
    pub fn new(users: U, sessions: S, hasher: H, mailer: M) -> Self {
        Self {
            users,
            sessions,
            hasher: Arc::new(hasher),
            mailer,
            public_url: None,
        }
    }

    /// Base URL used to build links in outgoing mail (e.g. `https://chat.example.com`).
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    pub fn users(&self) -> &U {
        &self.users
    }

    /// Create an account, log it in, and send a welcome email.
    ///
    /// Returns the new user and a session token. Mail failures are logged
    /// and do not fail registration.
    pub async fn register(&self, req: RegisterRequest) -> Result<(User, String), AuthError> {
        let username = req.username.trim();
        let email = req.email.trim();
        validate_username(username).map_err(AuthError::Validation)?;
        validate_email(email).map_err(AuthError::Validation)?;
        validate_new_password(&req.password1, &req.password2).map_err(AuthError::Validation)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::Conflict(
                "a user with that username already exists".to_string(),
            ));
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::Conflict(
                "a user with that email already exists".to_string(),
            ));
        }

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: email.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            password_hash: self.hash_password(&req.password1).await?,
            created_at: Utc::now(),
            last_login: None,
        };
        let user = self.users.create_user(&user).await?;
        info!(user_id = %user.id, username = %user.username, "User registered");

        self.send_welcome(&user).await;

        let token = self.start_session(&user).await?;
        Ok((user, token))
    }

    /// Verify credentials and open a new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String), AuthError> {
        let Some(mut user) = self.users.find_by_username(username.trim()).await? else {
            debug!("Login for unknown username");
            return Err(AuthError::InvalidCredentials);
        };
        if !self.verify_password(password, &user.password_hash).await {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.start_session(&user).await?;
        let now = Utc::now();
        self.users.record_login(&user.id, now).await?;
        user.last_login = Some(now);
        info!(user_id = %user.id, "User logged in");
        Ok((user, token))
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions
            .delete_session(&self.hasher.token_digest(token))
            .await?;
        Ok(())
    }

    /// Resolve a session token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let digest = self.hasher.token_digest(token);
        let session = self
            .sessions
            .get_session(&digest)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired(Utc::now()) {
            debug!(user_id = %session.user_id, "Session expired");
            self.sessions.delete_session(&digest).await?;
            return Err(AuthError::Unauthenticated);
        }

        self.users
            .get_user(&session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Start the reset flow for the account with this email, if any.
    ///
    /// Succeeds whether or not the address is known.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let Some(user) = self.users.find_by_email(email.trim()).await? else {
            debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = self.hasher.generate_token();
        let now = Utc::now();
        let reset = PasswordReset {
            token_digest: self.hasher.token_digest(&token),
            user_id: user.id,
            created_at: now,
            expires_at: now + Duration::hours(RESET_TTL_HOURS),
            used: false,
        };
        self.sessions.create_reset(&reset).await?;

        let link = match &self.public_url {
            Some(base) => format!("{base}/auth/password-reset/confirm?token={token}"),
            None => format!("/auth/password-reset/confirm?token={token}"),
        };
        let body = format!(
            "Hi {},\n\nUse the link below to choose a new password. It expires in {RESET_TTL_HOURS} hour.\n\n{link}\n",
            user.username
        );
        if let Err(e) = self.mailer.send(&user.email, "Password reset", &body).await {
            warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
        }
        info!(user_id = %user.id, "Password reset issued");
        Ok(())
    }

    /// Finish the reset flow: set the new password and end all sessions.
    pub async fn confirm_password_reset(
        &self,
        token: &str,
        password1: &str,
        password2: &str,
    ) -> Result<(), AuthError> {
        let digest = self.hasher.token_digest(token);
        let reset = self
            .sessions
            .get_reset(&digest)
            .await?
            .filter(|r| !r.used && r.expires_at > Utc::now())
            .ok_or(AuthError::InvalidResetToken)?;

        validate_new_password(password1, password2).map_err(AuthError::Validation)?;
        let hash = self.hash_password(password1).await?;

        // Only the caller that flips `used` may change the password.
        if !self.sessions.claim_reset(&digest, Utc::now()).await? {
            debug!(user_id = %reset.user_id, "Password reset already claimed");
            return Err(AuthError::InvalidResetToken);
        }
        self.users.update_password(&reset.user_id, &hash).await?;
        let ended = self.sessions.delete_user_sessions(&reset.user_id).await?;
        info!(user_id = %reset.user_id, sessions_ended = ended, "Password reset completed");
        Ok(())
    }

    /// Change first and/or last name. `None` keeps the current value.
    pub async fn update_names(
        &self,
        user_id: &Uuid,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<User, AuthError> {
        let mut user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)?;
        if first_name.is_none() && last_name.is_none() {
            return Ok(user);
        }

        for name in [&first_name, &last_name].into_iter().flatten() {
            validate_person_name(name).map_err(AuthError::Validation)?;
        }
        if let Some(first) = first_name {
            user.first_name = first.trim().to_string();
        }
        if let Some(last) = last_name {
            user.last_name = last.trim().to_string();
        }

        self.users
            .update_names(&user.id, &user.first_name, &user.last_name)
            .await?;
        Ok(user)
    }

    /// Hashing runs on the blocking pool.
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|_| AuthError::Hashing)?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &hash))
            .await
            .unwrap_or(false)
    }

    async fn start_session(&self, user: &User) -> Result<String, AuthError> {
        let token = self.hasher.generate_token();
        let now = Utc::now();
        let session = Session {
            token_digest: self.hasher.token_digest(&token),
            user_id: user.id,
            created_at: now,
            expires_at: now + Duration::days(SESSION_TTL_DAYS),
        };
        self.sessions.create_session(&session).await?;
        Ok(token)
    }

    async fn send_welcome(&self, user: &User) {
        let body = format!(
            "Hi {},\n\nWelcome to ChatBot! Your account is ready; sign in any time to start a conversation.\n",
            user.username
        );
        if let Err(e) = self.mailer.send(&user.email, "Welcome to ChatBot!", &body).await {
            warn!(user_id = %user.id, error = %e, "Failed to send welcome email");
        }
    }
}
