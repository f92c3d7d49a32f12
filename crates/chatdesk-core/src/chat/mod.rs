//! Conversation persistence and the chat exchange.
//!
//! - `repository`: the `ConversationRepository` port
//! - `service`: owner-scoped conversation store
//! - `exchange`: one user message in, one assistant reply out
//! - `lock`: per-conversation write serialization

pub mod exchange;
pub mod lock;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
