//! Configuration types for card generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across calls, log them safely (the credential
//! is redacted from `Debug`), and diff two runs to understand why their
//! outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! well-documented defaults for the rest; `build()` validates the result so
//! an impossible config never reaches the API client.

use crate::error::CardsError;
use std::fmt;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-20250219";

/// Output-token ceiling used when none is configured.
pub const DEFAULT_MAX_TOKENS: u32 = 8000;

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

/// Anthropic API endpoint used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Configuration for a card-generation call.
///
/// Built via [`GenerationConfig::builder()`] or using
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use text2cards::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("claude-3-7-sonnet-20250219")
///     .max_tokens(4000)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// Model identifier sent with every request. Default: [`DEFAULT_MODEL`].
    ///
    /// Card generation is a rewriting task, not a reasoning one; a mid-size
    /// Sonnet model segments reliably and keeps per-call cost low.
    pub model: String,

    /// Maximum tokens the model may generate. Default: 8000.
    ///
    /// The reply is a JSON object echoing a polished version of the input.
    /// 8000 leaves generous headroom over the 5000-character input limit so
    /// the JSON is never truncated mid-string, which would surface as a
    /// parse failure rather than a usable result.
    pub max_tokens: u32,

    /// Sampling temperature, clamped to 0.0–1.0. Default: 1.0.
    ///
    /// Polishing benefits from variety: resubmitting the same text should
    /// be able to produce a fresh phrasing, which is the only retry
    /// mechanism this crate offers.
    pub temperature: f32,

    /// Anthropic API key. `None` reads `ANTHROPIC_API_KEY` from the
    /// environment at call time; a configured value is used as-is and the
    /// environment is not consulted.
    pub api_key: Option<String>,

    /// API endpoint override. `None` reads `ANTHROPIC_BASE_URL` from the
    /// environment, falling back to [`DEFAULT_BASE_URL`]. Point this at a
    /// proxy or a local mock server.
    pub base_url: Option<String>,

    /// Per-call HTTP timeout in seconds. `None` (default) leaves the
    /// transport default in place; generation on long inputs can take well
    /// over a minute, so an aggressive cap hurts more than it protects.
    pub api_timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            base_url: None,
            api_timeout_secs: None,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }

    /// The API key to send: the configured value, else `ANTHROPIC_API_KEY`.
    ///
    /// Returns `None` when neither source provides a key. Callers decide how
    /// to surface that; the client maps it to [`CardsError::AuthError`].
    pub fn resolved_api_key(&self) -> Option<String> {
        match &self.api_key {
            Some(key) => Some(key.clone()),
            None => std::env::var("ANTHROPIC_API_KEY").ok(),
        }
    }

    /// The endpoint to call: configured value, else `ANTHROPIC_BASE_URL`,
    /// else [`DEFAULT_BASE_URL`]. Trailing slashes are stripped so path
    /// joining stays predictable.
    pub fn resolved_base_url(&self) -> String {
        let url = match &self.base_url {
            Some(url) => url.clone(),
            None => std::env::var("ANTHROPIC_BASE_URL")
                .ok()
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };
        url.trim_end_matches('/').to_string()
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 1.0);
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = Some(secs);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, CardsError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(CardsError::InvalidConfig(
                "Model id must not be empty".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(CardsError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_temperature() {
        let config = GenerationConfig::builder()
            .temperature(3.5)
            .build()
            .unwrap();
        assert_eq!(config.temperature, 1.0);
    }

    #[test]
    fn build_rejects_empty_model() {
        let result = GenerationConfig::builder().model("  ").build();
        assert!(matches!(result, Err(CardsError::InvalidConfig(_))));
    }

    #[test]
    fn build_rejects_zero_max_tokens() {
        let result = GenerationConfig::builder().max_tokens(0).build();
        assert!(matches!(result, Err(CardsError::InvalidConfig(_))));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GenerationConfig::builder()
            .api_key("sk-ant-secret")
            .build()
            .unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-ant-secret"), "got: {rendered}");
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn explicit_base_url_wins_and_loses_trailing_slash() {
        let config = GenerationConfig::builder()
            .base_url("http://localhost:4010/")
            .build()
            .unwrap();
        assert_eq!(config.resolved_base_url(), "http://localhost:4010");
    }
}
