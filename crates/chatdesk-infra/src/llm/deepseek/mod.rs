//! DeepSeek chat completion provider.
//!
//! DeepSeek speaks the OpenAI-compatible `/chat/completions` wire format;
//! this module provides [`DeepSeekProvider`], which implements the
//! [`LlmProvider`](chatdesk_core::llm::provider::LlmProvider) trait for it.

pub mod client;
pub mod types;

pub use client::DeepSeekProvider;
