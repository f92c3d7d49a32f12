//! Completion settings.
//!
//! `CompletionSettings` is the `[completion]` table of `config.toml`. It holds
//! everything about the outbound completion call except the API key, which is
//! kept out of this crate so it never ends up in a `Debug` dump.

use serde::{Deserialize, Serialize};

/// Parameters for the outbound completion API.
///
/// All fields have defaults matching the DeepSeek chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionSettings {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f64,

    #[serde(default)]
    pub presence_penalty: f64,

    #[serde(default)]
    pub frequency_penalty: f64,

    /// Timeout for a single completion call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_top_p() -> f64 {
    0.95
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            presence_penalty: 0.0,
            frequency_penalty: 0.0,
            timeout_secs: default_timeout_secs(),
        }
    }
}
