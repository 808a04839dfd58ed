//! Error types for the text2cards library.
//!
//! A single closed enum, [`CardsError`], covers every failure the crate can
//! produce. Two classifications cut across the variants:
//!
//! * **Input errors** ([`CardsError::is_input_error`]) — the submission itself
//!   was unusable (empty, too long). These are detected *before* any network
//!   call, so a bad submission never consumes API quota.
//!
//! * **Service errors** — everything after the submission passed: transport
//!   failures, authentication, rate limiting, and replies the validator
//!   refuses to accept.
//!
//! Every variant renders an operator-facing message via `Display`, with a hint
//! where one helps. [`CardsError::user_message`] gives the short generic string
//! a presentation layer may show instead; the offending raw model reply is
//! carried on [`MalformedJson`](CardsError::MalformedJson) and
//! [`SchemaMismatch`](CardsError::SchemaMismatch) for diagnostics but never
//! appears in either message.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the text2cards library.
#[derive(Debug, Error)]
pub enum CardsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The submission contained no text (or only whitespace).
    #[error("Input text is empty.\nProvide some text to generate cards from.")]
    EmptyInput,

    /// The submission exceeds the character limit.
    #[error("Input is {chars} characters long (limit {limit}).\nShorten the text and resubmit.")]
    InputTooLong { chars: usize, limit: usize },

    // ── Response errors ──────────────────────────────────────────────────
    /// The API reply decoded, but its content layout was not usable
    /// (no content blocks, or the first block is not a text block).
    #[error("Model reply had an unexpected shape: {detail}")]
    UnexpectedResponseShape { detail: String },

    /// The model's text did not parse as JSON.
    ///
    /// `raw` holds the full offending reply for diagnostics. It is logged,
    /// never displayed.
    #[error("Model reply is not valid JSON: {detail}")]
    MalformedJson { detail: String, raw: String },

    /// The model's JSON parsed but does not match the card layout
    /// (`{"cards":[{"text": ...}]}`).
    ///
    /// `raw` holds the full offending reply for diagnostics. It is logged,
    /// never displayed.
    #[error("Model reply does not match the card layout: {detail}")]
    SchemaMismatch { detail: String, raw: String },

    // ── API errors ────────────────────────────────────────────────────────
    /// The API rejected the credential (HTTP 401), or no credential was
    /// available to send.
    #[error("Anthropic API authentication failed: {detail}\nSet ANTHROPIC_API_KEY or configure an explicit key.")]
    AuthError { detail: String },

    /// The API returned HTTP 429 — caller should back off.
    ///
    /// Check `retry_after_secs` for a server-specified delay.
    #[error("Anthropic API rate limit exceeded")]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other transport or server failure (non-401/429 status, timeout,
    /// connection refused). `status` is present when an HTTP status exists.
    #[error("Anthropic API request failed: {detail}")]
    UpstreamError {
        status: Option<u16>,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write a card output file.
    #[error("Failed to write card file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CardsError {
    /// True when the failure is the caller's submission, not the service.
    ///
    /// Input errors are detected before any outbound call and are fixed by
    /// editing the text; everything else warrants a resubmission as-is.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CardsError::EmptyInput | CardsError::InputTooLong { .. }
        )
    }

    /// Short, generic message safe to show an end user.
    ///
    /// Deliberately vaguer than `Display`: the operator channel gets the
    /// detail (and the raw reply via logs), the user gets a sentence that
    /// tells them what to do next.
    pub fn user_message(&self) -> String {
        match self {
            CardsError::EmptyInput => "Please enter some text first.".to_string(),
            CardsError::InputTooLong { limit, .. } => {
                format!("The text is too long. Please keep it within {limit} characters.")
            }
            CardsError::UnexpectedResponseShape { .. }
            | CardsError::MalformedJson { .. }
            | CardsError::SchemaMismatch { .. } => {
                "Could not read the AI response. Please try again.".to_string()
            }
            CardsError::AuthError { .. } => "The API key is invalid or missing.".to_string(),
            CardsError::RateLimited { .. } => {
                "Too many requests right now. Please try again shortly.".to_string()
            }
            CardsError::UpstreamError { .. } => {
                "Card generation failed. Please try again.".to_string()
            }
            CardsError::WriteFailed { .. } => "Could not save the card files.".to_string(),
            CardsError::InvalidConfig(_) | CardsError::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_too_long_display() {
        let e = CardsError::InputTooLong {
            chars: 5001,
            limit: 5000,
        };
        let msg = e.to_string();
        assert!(msg.contains("5001"), "got: {msg}");
        assert!(msg.contains("5000"), "got: {msg}");
    }

    #[test]
    fn rate_limited_display_with_retry() {
        let e = CardsError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(e.to_string().contains("rate limit"));
    }

    #[test]
    fn rate_limited_display_without_retry() {
        let e = CardsError::RateLimited {
            retry_after_secs: None,
        };
        assert!(e.to_string().contains("rate limit"));
    }

    #[test]
    fn auth_error_display() {
        let e = CardsError::AuthError {
            detail: "invalid x-api-key".into(),
        };
        assert!(e.to_string().contains("invalid x-api-key"));
        assert!(e.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn malformed_json_display_excludes_raw() {
        let e = CardsError::MalformedJson {
            detail: "expected value at line 1 column 1".into(),
            raw: "Sure! Here are your cards: {\"cards\": []}".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("expected value"));
        assert!(!msg.contains("Sure!"), "raw reply leaked into Display: {msg}");
    }

    #[test]
    fn user_message_hides_raw_reply() {
        let e = CardsError::SchemaMismatch {
            detail: "`cards` is not an array".into(),
            raw: "{\"cards\": \"oops\"}".into(),
        };
        let msg = e.user_message();
        assert!(!msg.contains("oops"));
        assert!(!msg.contains("cards"), "schema detail leaked: {msg}");
    }

    #[test]
    fn input_error_partition() {
        assert!(CardsError::EmptyInput.is_input_error());
        assert!(CardsError::InputTooLong {
            chars: 6000,
            limit: 5000
        }
        .is_input_error());
        assert!(!CardsError::AuthError {
            detail: "nope".into()
        }
        .is_input_error());
        assert!(!CardsError::RateLimited {
            retry_after_secs: None
        }
        .is_input_error());
    }
}
