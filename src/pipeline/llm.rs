//! Chat-completion call: request body, transport seam, response shape check.
//!
//! This module only moves bytes. Prompt content comes from
//! [`crate::pipeline::messages`], and what counts as a valid *document* is
//! decided in [`crate::pipeline::validate`].
//!
//! ## Failure mapping
//!
//! | What happened | Error |
//! |---|---|
//! | connect error, timeout, body read error | [`ConvertError::HttpRequestFailed`] |
//! | any body without `choices[0].message.content` | [`ConvertError::InvalidResponseFormat`] |
//!
//! A non-2xx status is not an error on its own; an error body simply fails
//! the shape check. There is no retry.

use crate::error::ConvertError;
use crate::pipeline::messages::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// JSON body of a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
}

/// The completion text plus token accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Sends one completion request and returns its text.
///
/// [`HttpTransport`] is the real implementation; tests substitute a fake to
/// get deterministic model output.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ConvertError>;
}

/// Bearer-authenticated POST to a chat-completions endpoint.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpTransport {
    /// Build the client. No network I/O happens here.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, ConvertError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ConvertError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CompletionTransport for HttpTransport {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ConvertError> {
        debug!(
            "POST {} (model {}, {} messages)",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        // `.json()` sets Content-Type: application/json.
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ConvertError::HttpRequestFailed {
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ConvertError::HttpRequestFailed {
                message: e.to_string(),
            })?;

        extract_completion(status, &body)
    }
}

// ── Response shape ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// Pull `choices[0].message.content` out of a response body.
pub fn extract_completion(status: u16, body: &str) -> Result<Completion, ConvertError> {
    let shape_error = || ConvertError::InvalidResponseFormat { status };

    let response: CompletionResponse = serde_json::from_str(body).map_err(|_| shape_error())?;
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(shape_error)?;

    let (prompt_tokens, completion_tokens) = response
        .usage
        .map(|u| (u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();
    debug!(
        "HTTP {}: {} input tokens, {} output tokens",
        status, prompt_tokens, completion_tokens
    );

    Ok(Completion {
        content,
        prompt_tokens,
        completion_tokens,
    })
}
