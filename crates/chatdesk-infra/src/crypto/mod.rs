//! Cryptographic operations for chatdesk.
//!
//! - `credentials`: Argon2id password hashing, random session tokens and
//!   their SHA-256 digests

pub mod credentials;
