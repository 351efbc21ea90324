/// LLM Client: the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the provider API directly.
/// Callers depend on the `TextCompletionClient` trait; `LlmClient` is the production backend.
///
/// Model: claude-sonnet-4-5, fixed in code.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::JSON_ONLY_SYSTEM;

const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all completion calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;

/// Failure modes of a single completion call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompletionError {
    /// The provider could not be reached or did not answer in time.
    #[error("transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The provider answered but reported a failure (auth, rate limit, overload, empty output).
    #[error("upstream error (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        CompletionError::Transport {
            timed_out: e.is_timeout(),
            message: e.to_string(),
        }
    }
}

/// Capability boundary for text generation: one prompt in, raw text out.
///
/// Implementations perform exactly one outbound call per invocation and never retry.
#[async_trait]
pub trait TextCompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API backend for `TextCompletionClient`.
///
/// Constructed once at startup and shared; holds no per-request state.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            api_url,
        })
    }

    /// Makes a raw call to the provider, returning the full response object.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, CompletionError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Try to parse error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("LLM API returned {}: {}", status, message);
            return Err(CompletionError::Upstream {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body = response.bytes().await?;
        let llm_response: LlmResponse =
            serde_json::from_slice(&body).map_err(|e| CompletionError::Upstream {
                status: Some(status.as_u16()),
                message: format!("malformed provider response: {e}"),
            })?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        Ok(llm_response)
    }
}

#[async_trait]
impl TextCompletionClient for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let response = self.call(prompt, JSON_ONLY_SYSTEM).await?;

        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| CompletionError::Upstream {
                status: None,
                message: "LLM returned empty content".to_string(),
            })
    }
}
