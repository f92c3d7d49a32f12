//! Infrastructure layer for chatdesk.
//!
//! Contains implementations of the traits defined in `chatdesk-core`:
//! SQLite storage, the DeepSeek completion client, Argon2/SHA-256
//! credentials, avatar file storage and a log-backed mailer. Also owns
//! configuration loading.

pub mod config;
pub mod crypto;
pub mod llm;
pub mod mail;
pub mod sqlite;
pub mod storage;
