//! # text2cards
//!
//! Polish free-form text into share-ready photo-card captions with Claude.
//!
//! ## Why this crate?
//!
//! Pasting a rough paragraph into a chat window gets you prose back — maybe
//! fenced, maybe prefaced with "Here are your cards!", rarely in a shape a
//! program can consume. This crate pins the whole exchange down: a fixed
//! prompt that demands bare JSON, a single Messages API call, and a strict
//! validator that either yields an ordered [`CardSet`] or a precisely
//! classified [`CardsError`]. No scraping, no second guesses.
//!
//! ## Pipeline Overview
//!
//! ```text
//! text
//!  │
//!  ├─ 1. Input     reject empty or over-limit submissions locally
//!  ├─ 2. Prompt    fixed polish-and-segment instructions + verbatim text
//!  ├─ 3. API       one Messages call to claude-3-7-sonnet (no retry)
//!  ├─ 4. Extract   first content block must be a text block
//!  └─ 5. Validate  strict JSON parse into ordered cards + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use text2cards::{generate, GenerationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from ANTHROPIC_API_KEY
//!     let config = GenerationConfig::default();
//!     let output = generate("rough notes from this morning's walk...", &config).await?;
//!     for card in output.cards.iter() {
//!         println!("{}", card.text);
//!     }
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.input_tokens,
//!         output.stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `text2cards` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! text2cards = { version = "0.2", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use error::CardsError;
pub use generate::{generate, generate_sync, generate_to_dir};
pub use output::{Card, CardSet, GenerationOutput, GenerationStats};
pub use pipeline::input::MAX_INPUT_CHARS;
