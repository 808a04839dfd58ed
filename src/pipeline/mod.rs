//! Pipeline stages for card generation.
//!
//! Each submodule implements exactly one step. Keeping stages separate makes
//! each independently testable: the input gate and the validator never touch
//! the network, so they run in plain unit tests with no mock server.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ api ──▶ validate
//! (gate)  (Claude)  (strict JSON)
//! ```
//!
//! 1. [`input`]    — gate the submission (non-empty, within the character limit)
//! 2. [`api`]      — the single Messages API call; the only stage with network I/O
//! 3. [`validate`] — strict parse of the model's reply into a [`crate::output::CardSet`]

pub mod api;
pub mod input;
pub mod validate;
