//! The prompt template for card generation.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the instructions (e.g. tweaking
//!    the target card length) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt directly
//!    without calling a real model, so regressions in the contract (JSON-only
//!    output, verbatim input embedding) are easy to catch.

/// Instructions sent ahead of the user's text on every call.
///
/// The output-format rules mirror what the response validator accepts: a bare
/// JSON object, no fences, no commentary. The validator is strict by design,
/// so the prompt must be equally explicit about the shape.
pub const GENERATION_RULES: &str = r#"You are an expert social-media copy editor. Polish the text below and split it into a sequence of short caption cards for photo posts.

Follow these rules precisely:

1. POLISH
   - Improve flow and word choice while keeping the author's meaning and voice
   - Fix grammar, punctuation, and awkward phrasing
   - Do NOT invent facts, opinions, or content the author did not write

2. SEGMENT
   - Split the polished text into logically coherent passages
   - Aim for roughly 100 characters per card, but let the content decide the
     actual cut points; never break a thought mid-sentence
   - Keep the original order of ideas

3. OUTPUT FORMAT
   - Output ONLY a JSON object of the form {"cards": [{"text": "..."}, {"text": "..."}]}
   - Do NOT wrap the JSON in ``` fences
   - Do NOT add commentary, greetings, or explanations before or after it
   - Escape double quotes and backslashes inside string values"#;

/// Assemble the full prompt for one submission.
///
/// The submission is embedded verbatim between `"""` delimiter lines — no
/// trimming, no escaping. The delimiters tell the model where instructions
/// end and author text begins, so instruction-like phrases inside the
/// submission are treated as content to polish, not commands to follow.
pub fn build_prompt(input: &str) -> String {
    format!("{GENERATION_RULES}\n\nText to process:\n\"\"\"\n{input}\n\"\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_input_verbatim() {
        let input = "line one\n  \"quoted\" line two  ";
        let prompt = build_prompt(input);
        assert!(prompt.contains(input), "input must appear unmodified");
    }

    #[test]
    fn delimits_input_with_triple_quotes() {
        let prompt = build_prompt("hello");
        assert!(prompt.contains("\"\"\"\nhello\n\"\"\""));
    }

    #[test]
    fn rules_demand_bare_json() {
        assert!(GENERATION_RULES.contains(r#"{"cards""#));
        assert!(GENERATION_RULES.contains("fences"));
    }
}
