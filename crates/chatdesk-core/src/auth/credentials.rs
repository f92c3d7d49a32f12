//! CredentialHasher trait definition.
//!
//! Password hashing and token generation are CPU-bound and synchronous, so
//! unlike the repository traits these methods are plain functions.
//! `AuthService` moves hashing and verification onto tokio's blocking pool.

use chatdesk_types::error::AuthError;

/// Password hashing and opaque-token primitives.
///
/// Implemented in chatdesk-infra by `Argon2Credentials`.
pub trait CredentialHasher: Send + Sync {
    /// Hash a password into a self-describing PHC string.
    fn hash_password(&self, password: &str) -> Result<String, AuthError>;

    /// Check a password against a stored PHC string.
    ///
    /// A malformed hash verifies as `false`.
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// Generate a fresh random bearer token.
    fn generate_token(&self) -> String;

    /// Stable digest of a token, used as its storage key.
    fn token_digest(&self, token: &str) -> String;
}
