//! Output types: the validated card set and per-call statistics.
//!
//! A [`CardSet`] is only ever produced by the response validator, so holding
//! one is proof the model reply parsed and matched the expected layout.
//! Everything here is plain serde data — callers can print it, serialise it,
//! or feed it to their own rendering layer.

use serde::{Deserialize, Serialize};

/// One card: a short, polished text segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub text: String,
}

impl Card {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// The ordered list of cards extracted from one model reply.
///
/// Serialises to `{"cards":[{"text": ...}, ...]}`. Order follows the model's
/// array; an empty set is valid (the model judged nothing worth carding).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSet {
    pub cards: Vec<Card>,
}

impl CardSet {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

/// Statistics for a completed generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Model id the API reports having used.
    pub model: String,
    /// Prompt tokens consumed.
    pub input_tokens: u64,
    /// Completion tokens produced.
    pub output_tokens: u64,
    /// Wall-clock time for the whole call, request to validated cards.
    pub duration_ms: u64,
}

/// Result of a successful generation: the cards plus call statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOutput {
    #[serde(flatten)]
    pub cards: CardSet,
    pub stats: GenerationStats,
}
