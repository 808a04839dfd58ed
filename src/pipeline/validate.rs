//! Response validation: strict parse of the model reply into a [`CardSet`].
//!
//! ## Why "parse or fail"?
//!
//! The prompt demands a bare JSON object and nothing else. Replies that
//! almost comply — fenced JSON, a greeting before the object, trailing
//! prose — are rejected rather than repaired. Scraping JSON out of a chatty
//! reply would mask prompt regressions: the first sign the model stopped
//! honouring the output contract should be a loud validation failure, not a
//! silently degrading scrape. Trimming surrounding whitespace is the single
//! forgiving transformation.
//!
//! Failures split on a clean line: [`CardsError::MalformedJson`] when the
//! text does not parse at all, [`CardsError::SchemaMismatch`] when it parses
//! but does not match `{"cards":[{"text": ...}]}`. Both keep the full
//! offending reply on the error and log it on the operator channel. Content
//! is never judged — card length and wording are the model's business.

use crate::error::CardsError;
use crate::output::{Card, CardSet};
use serde_json::Value;
use tracing::{debug, warn};

/// Parse and validate a raw model reply.
///
/// Pure and one-shot: the same input always yields the same result, and
/// nothing is retried or repaired. Card order follows the reply's array; an
/// empty `cards` array is a valid, empty set.
pub fn validate_cards(raw: &str) -> Result<CardSet, CardsError> {
    let trimmed = raw.trim();

    let value: Value = serde_json::from_str(trimmed).map_err(|e| {
        warn!("Model reply is not valid JSON: {}", e);
        debug!("Offending reply: {}", raw);
        CardsError::MalformedJson {
            detail: e.to_string(),
            raw: raw.to_string(),
        }
    })?;

    let object = value.as_object().ok_or_else(|| {
        schema_mismatch(
            format!("top-level value is {}, expected an object", type_name(&value)),
            raw,
        )
    })?;

    let entries = match object.get("cards") {
        None => return Err(schema_mismatch("`cards` field is missing", raw)),
        Some(cards) => cards.as_array().ok_or_else(|| {
            schema_mismatch(
                format!("`cards` is {}, expected an array", type_name(cards)),
                raw,
            )
        })?,
    };

    let mut cards = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let card = entry.as_object().ok_or_else(|| {
            schema_mismatch(
                format!("`cards[{index}]` is {}, expected an object", type_name(entry)),
                raw,
            )
        })?;
        let text = card.get("text").and_then(Value::as_str).ok_or_else(|| {
            schema_mismatch(format!("`cards[{index}].text` is missing or not a string"), raw)
        })?;
        cards.push(Card::new(text));
    }

    Ok(CardSet { cards })
}

/// Build a schema error, logging the detail and the offending reply.
fn schema_mismatch(detail: impl Into<String>, raw: &str) -> CardsError {
    let detail = detail.into();
    warn!("Model reply failed card validation: {}", detail);
    debug!("Offending reply: {}", raw);
    CardsError::SchemaMismatch {
        detail,
        raw: raw.to_string(),
    }
}

/// Name a JSON value's type for diagnostics.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
