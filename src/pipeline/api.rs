//! Anthropic Messages API interaction: the single outbound call.
//!
//! This module is intentionally thin — prompt wording lives in
//! [`crate::prompts`] and reply interpretation in
//! [`crate::pipeline::validate`], so this file owns exactly two things: the
//! wire format and the mapping from transport outcomes onto [`CardsError`].
//!
//! ## No retry
//!
//! One submission is one request. 429 and 5xx responses map straight onto
//! error variants and the caller decides whether to resubmit; an internal
//! backoff loop would spend tokens and wall-clock time the caller never
//! asked for.

use crate::config::GenerationConfig;
use crate::error::CardsError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Version header the Messages endpoint requires on every request.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// A configured client for `POST {base_url}/v1/messages`.
///
/// Built per generation call: each request owns its connection state and
/// there is no pool worth keeping warm for a one-shot pipeline.
pub struct MessagesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl MessagesClient {
    /// Build a client from the configuration, resolving the credential.
    ///
    /// # Errors
    /// [`CardsError::AuthError`] when neither the config nor
    /// `ANTHROPIC_API_KEY` provides a non-empty key. Failing here keeps a
    /// missing credential from surfacing as a confusing HTTP failure later.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, CardsError> {
        let api_key = config
            .resolved_api_key()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| CardsError::AuthError {
                detail: "no API key configured".into(),
            })?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.api_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| CardsError::Internal(format!("HTTP client construction failed: {e}")))?;

        Ok(Self {
            http,
            base_url: config.resolved_base_url(),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Send one prompt as a single user message and decode the reply.
    pub async fn create_message(&self, prompt: &str) -> Result<MessagesResponse, CardsError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![UserMessage {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url);
        debug!("POST {} model={}", url, self.model);

        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response
            .json::<MessagesResponse>()
            .await
            .map_err(|e| CardsError::UnexpectedResponseShape {
                detail: format!("could not decode reply body: {e}"),
            })
    }
}

/// Map a reqwest failure with no HTTP status (timeout, refused connection,
/// DNS) onto the taxonomy.
fn transport_error(e: &reqwest::Error) -> CardsError {
    let detail = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    CardsError::UpstreamError {
        status: None,
        detail,
    }
}

/// Map a non-success response onto the taxonomy.
///
/// `Retry-After` must be read before the body: `text()` consumes the
/// response. The body is parsed best-effort for the API's error envelope so
/// the operator log carries the server's own wording.
async fn error_from_response(response: reqwest::Response) -> CardsError {
    let status = response.status();
    let retry_after_secs = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    let body = response.text().await.unwrap_or_default();
    let detail = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                trimmed.chars().take(200).collect()
            }
        }
    };

    warn!("Messages API returned {}: {}", status, detail);

    match status.as_u16() {
        401 => CardsError::AuthError { detail },
        429 => CardsError::RateLimited { retry_after_secs },
        code => CardsError::UpstreamError {
            status: Some(code),
            detail: format!("HTTP {code}: {detail}"),
        },
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

/// Request body for `POST /v1/messages`.
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<UserMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Decoded reply envelope.
///
/// Only the fields this crate consumes are declared; everything else in the
/// reply (`id`, `role`, `stop_reason`, ...) is ignored.
#[derive(Debug, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub usage: Usage,
}

impl MessagesResponse {
    /// Extract the text of the first content block.
    ///
    /// Only `content[0]` is consulted, and only if it is a text block. A
    /// reply that leads with a tool call, or carries no content at all, is a
    /// shape error — not something to scan past in search of text.
    pub fn primary_text(&self) -> Result<&str, CardsError> {
        let first =
            self.content
                .first()
                .ok_or_else(|| CardsError::UnexpectedResponseShape {
                    detail: "reply contained no content blocks".into(),
                })?;

        if first.kind != "text" {
            return Err(CardsError::UnexpectedResponseShape {
                detail: format!("first content block is '{}', expected 'text'", first.kind),
            });
        }

        first
            .text
            .as_deref()
            .ok_or_else(|| CardsError::UnexpectedResponseShape {
                detail: "text block carried no text payload".into(),
            })
    }
}

/// One typed content block. Non-text kinds decode with `text: None`.
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Token accounting from the reply.
#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

/// Error envelope the API returns alongside non-success statuses:
/// `{"type":"error","error":{"type":...,"message":...}}`.
#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}
