//! Business logic and repository trait definitions for chatdesk.
//!
//! This crate defines the "ports" (repository, provider, hasher and mailer
//! traits) that the infrastructure layer implements. It depends only on
//! `chatdesk-types` -- never on `chatdesk-infra` or any database/IO crate.

pub mod auth;
pub mod chat;
pub mod llm;
pub mod profile;
