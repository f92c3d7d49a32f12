//! Wire types for the OpenAI-compatible chat completions endpoint.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct DeepSeekRequest {
    pub model: String,
    pub messages: Vec<DeepSeekMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub stream: bool,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekMessage {
    pub role: String,
    pub content: String,
}

/// Successful response body. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
pub struct DeepSeekResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<DeepSeekChoice>,
}

#[derive(Debug, Deserialize)]
pub struct DeepSeekChoice {
    pub message: DeepSeekChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct DeepSeekChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error response body: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct DeepSeekErrorBody {
    pub error: DeepSeekErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct DeepSeekErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}
