//! Generation entry points: submit text, get validated cards back.
//!
//! ## One call, one outcome
//!
//! The orchestration is a straight line — gate the input, build the client,
//! assemble the prompt, make the single API call, validate the reply. There
//! is no retry loop and no fallback path: every failure maps onto exactly one
//! [`CardsError`] variant, and resubmission is the caller's decision. Input
//! failures are raised before the client is even constructed, so a bad
//! submission never costs a network round trip.

use crate::config::GenerationConfig;
use crate::error::CardsError;
use crate::output::{GenerationOutput, GenerationStats};
use crate::pipeline::api::MessagesClient;
use crate::pipeline::input::GenerationRequest;
use crate::pipeline::validate;
use crate::prompts;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Generate cards from free-form text.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — The text to polish and segment, at most
///   [`MAX_INPUT_CHARS`](crate::pipeline::input::MAX_INPUT_CHARS) characters
/// * `config` — Generation configuration
///
/// # Errors
/// Returns the first failure on the line: input gating, credential
/// resolution, the API call, reply-shape extraction, or card validation.
/// [`CardsError::is_input_error`] distinguishes submission problems from
/// service problems.
pub async fn generate(
    input: impl AsRef<str>,
    config: &GenerationConfig,
) -> Result<GenerationOutput, CardsError> {
    let start = Instant::now();
    let input = input.as_ref();

    // ── Step 1: Gate the submission ──────────────────────────────────────
    let request = GenerationRequest::new(input)?;
    info!(
        "Starting generation: {} chars of input",
        request.text().chars().count()
    );

    // ── Step 2: Build the API client ─────────────────────────────────────
    let client = MessagesClient::from_config(config)?;

    // ── Step 3: Assemble the prompt ──────────────────────────────────────
    let prompt = prompts::build_prompt(request.text());

    // ── Step 4: One Messages API call ────────────────────────────────────
    let response = client.create_message(&prompt).await?;
    let reply = response.primary_text()?;

    // ── Step 5: Validate the reply into cards ────────────────────────────
    let cards = validate::validate_cards(reply)?;

    // ── Step 6: Compute stats ────────────────────────────────────────────
    let stats = GenerationStats {
        model: if response.model.is_empty() {
            config.model.clone()
        } else {
            response.model.clone()
        },
        input_tokens: response.usage.input_tokens,
        output_tokens: response.usage.output_tokens,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Generation complete: {} cards, {} tokens in / {} out, {}ms",
        cards.len(),
        stats.input_tokens,
        stats.output_tokens,
        stats.duration_ms
    );

    Ok(GenerationOutput { cards, stats })
}

/// Generate cards and write each one to a numbered text file.
///
/// Files are named `card-01.txt`, `card-02.txt`, ... in reply order under
/// `output_dir` (created if missing). Each file is written to a temp path
/// and renamed so an interrupted run never leaves a half-written card.
pub async fn generate_to_dir(
    input: impl AsRef<str>,
    output_dir: impl AsRef<Path>,
    config: &GenerationConfig,
) -> Result<GenerationOutput, CardsError> {
    let output = generate(input, config).await?;
    let dir = output_dir.as_ref();

    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| CardsError::WriteFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;

    for (index, card) in output.cards.iter().enumerate() {
        let path = dir.join(format!("card-{:02}.txt", index + 1));
        let tmp_path = path.with_extension("txt.tmp");
        tokio::fs::write(&tmp_path, &card.text)
            .await
            .map_err(|e| CardsError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| CardsError::WriteFailed {
                path: path.clone(),
                source: e,
            })?;
    }

    Ok(output)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input: impl AsRef<str>,
    config: &GenerationConfig,
) -> Result<GenerationOutput, CardsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| CardsError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(input, config))
}
