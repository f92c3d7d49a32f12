//! LlmProvider trait definition.
//!
//! This is the seam between the chat exchange and the outbound completion
//! API. Uses RPITIT (native async fn in traits, Rust 2024 edition).

use chatdesk_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for completion API backends.
///
/// Implementations live in chatdesk-infra (e.g., `DeepSeekProvider`).
/// A call is a single attempt: implementations must not retry.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "deepseek").
    fn name(&self) -> &str;

    /// Send a non-streaming completion request and receive the full reply.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
