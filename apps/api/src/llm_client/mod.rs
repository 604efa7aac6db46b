/// LLM Client: the single point of entry for completion-service calls.
///
/// Speaks the OpenAI-compatible chat completions protocol (Groq by default).
/// Every call is deterministic and constrained to a JSON object response.
///
/// Model: openai/gpt-oss-120b (hardcoded, the prompt is tuned for it)
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::ParsedResume;

pub mod prompts;

/// The model used for all completion calls.
pub const MODEL: &str = "openai/gpt-oss-120b";
const MAX_TOKENS: u32 = 1024;
const TEMPERATURE: f32 = 0.0;
/// Applied when the caller does not supply its own timeout.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    Parse(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Only logged, so every counter is optional.
#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

impl ChatResponse {
    /// Content of the first choice, if the model produced any.
    fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

/// Completion-service client shared by all requests.
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_url,
        }
    }

    /// Sends `cv_text` for extraction and returns the parsed fields.
    ///
    /// `timeout` bounds the whole exchange, body included. There is no retry:
    /// a non-success status comes back as `LlmError::Api` with the remote body
    /// untouched so callers can relay it.
    pub async fn parse_resume(
        &self,
        cv_text: &str,
        timeout: Duration,
    ) -> Result<ParsedResume, LlmError> {
        let request_body = ChatRequest {
            model: MODEL,
            messages: [
                ChatMessage {
                    role: "system",
                    content: prompts::RESUME_PARSE_SYSTEM,
                },
                ChatMessage {
                    role: "user",
                    content: cv_text,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .timeout(timeout)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Completion API returned {}: {}", status, body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::Parse(format!("invalid response envelope: {e}")))?;

        if let Some(usage) = &envelope.usage {
            debug!(
                "Completion call succeeded: prompt_tokens={:?}, completion_tokens={:?}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = envelope.content().ok_or(LlmError::EmptyContent)?;

        serde_json::from_str(strip_json_fences(content))
            .map_err(|e| LlmError::Parse(format!("model content is not a JSON object: {e}")))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
