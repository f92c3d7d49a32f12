//! Shared domain types for chatdesk.
//!
//! This crate contains the core domain types used across the workspace:
//! users, profiles, conversations, chat messages, completion request shapes,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod profile;
pub mod user;
