//! Input gate: accept or reject the raw submission before anything else runs.
//!
//! ## Why gate before the API call?
//!
//! An empty or oversized submission can be rejected locally in microseconds.
//! Sending it upstream would burn tokens (the prompt embeds the full text)
//! and turn a caller mistake into a confusing API failure. Constructing a
//! [`GenerationRequest`] is the only way text enters the pipeline, so holding
//! one is proof the submission passed both checks.

use crate::error::CardsError;

/// Maximum submission length, counted in characters (not bytes).
pub const MAX_INPUT_CHARS: usize = 5000;

/// A submission that passed the input checks.
///
/// The text is stored exactly as submitted. Surrounding whitespace only
/// decides emptiness; the prompt embeds the original untrimmed text so the
/// author's own line breaks survive into the polished cards.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    text: String,
}

impl GenerationRequest {
    /// Validate and wrap a submission.
    ///
    /// # Errors
    /// * [`CardsError::EmptyInput`] — nothing but whitespace
    /// * [`CardsError::InputTooLong`] — more than [`MAX_INPUT_CHARS`] characters
    pub fn new(text: impl Into<String>) -> Result<Self, CardsError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CardsError::EmptyInput);
        }
        let chars = text.chars().count();
        if chars > MAX_INPUT_CHARS {
            return Err(CardsError::InputTooLong {
                chars,
                limit: MAX_INPUT_CHARS,
            });
        }
        Ok(Self { text })
    }

    /// The submission text, exactly as provided.
    pub fn text(&self) -> &str {
        &self.text
    }
}
