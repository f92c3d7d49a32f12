//! HTTP request handlers.

pub mod auth;
pub mod chat;
pub mod conversation;
pub mod profile;
