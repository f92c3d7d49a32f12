//! HTTP layer for chatdesk.
//!
//! Axum routes for auth, chat, conversations and profiles, with session
//! authentication and a flat `{error, code}` error envelope.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
