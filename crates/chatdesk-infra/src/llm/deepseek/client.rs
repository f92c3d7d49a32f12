//! DeepSeekProvider -- concrete [`LlmProvider`] implementation for DeepSeek.
//!
//! Sends one non-streaming request to `{base_url}/chat/completions` with
//! bearer authentication. There are no retries.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use chatdesk_core::llm::provider::LlmProvider;
use chatdesk_types::config::CompletionSettings;
use chatdesk_types::llm::{CompletionRequest, CompletionResponse, LlmError};

use super::types::{DeepSeekErrorBody, DeepSeekMessage, DeepSeekRequest, DeepSeekResponse};

/// DeepSeek chat completion provider.
///
/// The key is optional so the server can start without one; every call then
/// fails with [`LlmError::MissingApiKey`] before touching the network.
pub struct DeepSeekProvider {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    base_url: String,
    timeout: Duration,
}

impl DeepSeekProvider {
    /// Create a provider from the completion settings.
    pub fn new(api_key: Option<SecretString>, settings: &CompletionSettings) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.expose_secret().trim().is_empty()),
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Length of the configured key, for diagnostics. Never the key itself.
    pub fn api_key_len(&self) -> usize {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().len())
            .unwrap_or(0)
    }

    /// Full completions endpoint URL.
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_deepseek_request(request: &CompletionRequest) -> DeepSeekRequest {
        DeepSeekRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| DeepSeekMessage {
                    role: m.role.to_string(),
                    content: m.content.clone(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            stream: request.stream,
            presence_penalty: request.presence_penalty,
            frequency_penalty: request.frequency_penalty,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Transport(format!("request timed out after {}s", self.timeout.as_secs()))
        } else {
            LlmError::Transport(e.to_string())
        }
    }
}

/// Classify a non-2xx response.
fn error_for_status(status: u16, body: &str) -> LlmError {
    if status == 401 {
        return LlmError::AuthenticationFailed;
    }
    let message = serde_json::from_str::<DeepSeekErrorBody>(body)
        .ok()
        .and_then(|b| b.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("API Error: {status}"));
    LlmError::Provider { status, message }
}

// DeepSeekProvider does not derive Debug; the key stays out of any dump.

impl LlmProvider for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    #[tracing::instrument(
        name = "deepseek_complete",
        skip(self, request),
        fields(model = %request.model, messages = request.messages.len())
    )]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::MissingApiKey)?;
        let body = Self::to_deepseek_request(request);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.transport_error(e))?;
        // Invalid UTF-8 from upstream is replaced, never stored raw.
        let text = String::from_utf8_lossy(&bytes);
        debug!(status = status.as_u16(), body_len = bytes.len(), "Completion response received");

        if !status.is_success() {
            return Err(error_for_status(status.as_u16(), &text));
        }

        let parsed: DeepSeekResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::UnexpectedResponse(format!("invalid JSON: {e}")))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                LlmError::UnexpectedResponse("missing choices[0].message.content".to_string())
            })?;

        Ok(CompletionResponse {
            content,
            model: parsed.model,
        })
    }
}
