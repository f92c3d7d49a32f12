//! Argon2id password hashing and SHA-256 token digests.
//!
//! Implements the `CredentialHasher` trait from `chatdesk-core` using the
//! RustCrypto `argon2` and `sha2` crates.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::{OsRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::warn;

use chatdesk_core::auth::credentials::CredentialHasher;
use chatdesk_types::error::AuthError;

/// Number of random bytes in a session or reset token.
const TOKEN_BYTES: usize = 32;

/// Argon2id implementation of `CredentialHasher`.
///
/// Hashes are PHC strings, so parameters can change later without
/// invalidating existing hashes.
pub struct Argon2Credentials {
    argon2: Argon2<'static>,
}

impl Argon2Credentials {
    /// Create a hasher with the OWASP-recommended Argon2id parameters
    /// (19 MiB memory, 2 iterations, 1 lane).
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default()),
        }
    }
}

impl Default for Argon2Credentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2Credentials {
    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| {
                warn!(error = %e, "Password hashing failed");
                AuthError::Hashing
            })
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }

    fn token_digest(&self, token: &str) -> String {
        format!("{:x}", Sha256::digest(token.as_bytes()))
    }
}
