//! End-to-end tests against a mock Anthropic Messages endpoint.
//!
//! Every test spins up a local `httpmock` server and points the library at it
//! through `GenerationConfig::base_url`, so the suite runs fully offline and
//! never needs a real API key.

use httpmock::prelude::*;
use serde_json::json;
use text2cards::{
    generate, generate_sync, generate_to_dir, CardsError, GenerationConfig, MAX_INPUT_CHARS,
};

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// Build a config pointing at the mock server. Every test goes through here,
/// so this is also where the log subscriber gets installed.
fn test_config(server: &MockServer) -> GenerationConfig {
    init_tracing();
    GenerationConfig::builder()
        .api_key("test-key")
        .base_url(server.base_url())
        .build()
        .expect("test config should build")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// A realistic Messages API reply whose text block carries `reply_text`.
fn messages_reply(reply_text: &str) -> serde_json::Value {
    json!({
        "id": "msg_01XFDUDYJgAACzvnptvVoYEL",
        "type": "message",
        "role": "assistant",
        "model": "claude-3-7-sonnet-20250219",
        "content": [{ "type": "text", "text": reply_text }],
        "stop_reason": "end_turn",
        "stop_sequence": null,
        "usage": { "input_tokens": 210, "output_tokens": 96 }
    })
}

/// The Anthropic error envelope, as returned on non-2xx statuses.
fn error_envelope(kind: &str, message: &str) -> serde_json::Value {
    json!({
        "type": "error",
        "error": { "type": kind, "message": message }
    })
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn generates_cards_from_a_clean_reply() {
    let server = MockServer::start();
    let config = test_config(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .header("x-api-key", "test-key")
            .header("anthropic-version", "2023-06-01");
        then.status(200).json_body(messages_reply(
            r#"{"cards":[{"text":"The rain finally stopped."},{"text":"The whole street smelled new."}]}"#,
        ));
    });

    let output = generate("today the rain finally stopped", &config)
        .await
        .expect("generation should succeed");

    mock.assert();
    assert_eq!(output.cards.len(), 2);
    assert_eq!(output.cards.cards[0].text, "The rain finally stopped.");
    assert_eq!(output.cards.cards[1].text, "The whole street smelled new.");
    assert_eq!(output.stats.model, "claude-3-7-sonnet-20250219");
    assert_eq!(output.stats.input_tokens, 210);
    assert_eq!(output.stats.output_tokens, 96);
}

#[tokio::test]
async fn sends_the_submission_verbatim() {
    let server = MockServer::start();
    let config = test_config(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .body_contains("a very particular phrase the model must see");
        then.status(200)
            .json_body(messages_reply(r#"{"cards":[{"text":"ok"}]}"#));
    });

    generate("a very particular phrase the model must see", &config)
        .await
        .expect("generation should succeed");

    mock.assert();
}

#[tokio::test]
async fn uses_the_configured_model() {
    let server = MockServer::start();
    init_tracing();
    let config = GenerationConfig::builder()
        .api_key("test-key")
        .base_url(server.base_url())
        .model("claude-3-5-haiku-20241022")
        .build()
        .expect("test config should build");

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/messages")
            .body_contains("claude-3-5-haiku-20241022");
        then.status(200).json_body(json!({
            "model": "claude-3-5-haiku-20241022",
            "content": [{ "type": "text", "text": r#"{"cards":[{"text":"ok"}]}"# }],
            "usage": { "input_tokens": 12, "output_tokens": 9 }
        }));
    });

    let output = generate("some text", &config)
        .await
        .expect("generation should succeed");

    mock.assert();
    assert_eq!(output.stats.model, "claude-3-5-haiku-20241022");
}

#[tokio::test]
async fn accepts_a_whitespace_padded_reply() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply("\n\n  {\"cards\":[{\"text\":\"padded\"}]}  \n"));
    });

    let output = generate("some text", &config)
        .await
        .expect("padded JSON should be accepted");

    assert_eq!(output.cards.cards[0].text, "padded");
}

// ── Reply validation failures ────────────────────────────────────────────────

#[tokio::test]
async fn rejects_a_fenced_reply() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply("```json\n{\"cards\":[{\"text\":\"x\"}]}\n```"));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("fenced JSON must be rejected");

    match err {
        CardsError::MalformedJson { raw, .. } => assert!(raw.contains("```")),
        other => panic!("expected MalformedJson, got {other:?}"),
    }
}

#[tokio::test]
async fn rejects_a_prose_reply() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply("Here are your cards! Hope they help."));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("prose must be rejected");

    match err {
        CardsError::MalformedJson { raw, .. } => assert!(raw.contains("Here are your cards")),
        other => panic!("expected MalformedJson, got {other:?}"),
    }
}

#[tokio::test]
async fn rejects_a_reply_with_the_wrong_shape() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply(r#"{"cards":{"text":"not an array"}}"#));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("wrong shape must be rejected");

    match err {
        CardsError::SchemaMismatch { detail, .. } => assert!(detail.contains("`cards`")),
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn rejects_a_reply_with_no_content_blocks() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200).json_body(json!({
            "model": "claude-3-7-sonnet-20250219",
            "content": [],
            "usage": { "input_tokens": 5, "output_tokens": 0 }
        }));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("empty content must be rejected");

    assert!(matches!(err, CardsError::UnexpectedResponseShape { .. }));
}

#[tokio::test]
async fn rejects_a_tool_use_first_block() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200).json_body(json!({
            "model": "claude-3-7-sonnet-20250219",
            "content": [
                { "type": "tool_use", "id": "toolu_01", "name": "lookup", "input": {} },
                { "type": "text", "text": r#"{"cards":[{"text":"x"}]}"# }
            ],
            "usage": { "input_tokens": 5, "output_tokens": 2 }
        }));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("non-text first block must be rejected");

    match err {
        CardsError::UnexpectedResponseShape { detail } => assert!(detail.contains("tool_use")),
        other => panic!("expected UnexpectedResponseShape, got {other:?}"),
    }
}

// ── API failures ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn maps_401_to_auth_error() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(401)
            .json_body(error_envelope("authentication_error", "invalid x-api-key"));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("401 must map to AuthError");

    match err {
        CardsError::AuthError { detail } => assert!(detail.contains("invalid x-api-key")),
        other => panic!("expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn maps_429_to_rate_limited_with_retry_after() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(429)
            .header("retry-after", "30")
            .json_body(error_envelope("rate_limit_error", "rate limited"));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("429 must map to RateLimited");

    assert!(matches!(
        err,
        CardsError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn maps_500_to_upstream_error() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(500)
            .json_body(error_envelope("api_error", "internal server error"));
    });

    let err = generate("some text", &config)
        .await
        .expect_err("500 must map to UpstreamError");

    match err {
        CardsError::UpstreamError { status, detail } => {
            assert_eq!(status, Some(500));
            assert!(detail.contains("internal server error"));
        }
        other => panic!("expected UpstreamError, got {other:?}"),
    }
}

// ── Input gate ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn empty_input_never_reaches_the_api() {
    let server = MockServer::start();
    let config = test_config(&server);

    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply(r#"{"cards":[{"text":"x"}]}"#));
    });

    let err = generate("   \n\t  ", &config)
        .await
        .expect_err("blank input must be rejected");

    assert!(matches!(err, CardsError::EmptyInput));
    mock.assert_hits(0);
}

#[tokio::test]
async fn overlong_input_never_reaches_the_api() {
    let server = MockServer::start();
    let config = test_config(&server);

    let mock = server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply(r#"{"cards":[{"text":"x"}]}"#));
    });

    let err = generate("x".repeat(MAX_INPUT_CHARS + 1), &config)
        .await
        .expect_err("overlong input must be rejected");

    match err {
        CardsError::InputTooLong { chars, limit } => {
            assert_eq!(chars, MAX_INPUT_CHARS + 1);
            assert_eq!(limit, MAX_INPUT_CHARS);
        }
        other => panic!("expected InputTooLong, got {other:?}"),
    }
    mock.assert_hits(0);
}

// ── Blocking wrapper and file output ─────────────────────────────────────────

// Plain #[test] on purpose: generate_sync builds its own runtime and must not
// run inside an ambient tokio runtime.
#[test]
fn generate_sync_runs_without_an_ambient_runtime() {
    let server = MockServer::start();
    let config = test_config(&server);

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200)
            .json_body(messages_reply(r#"{"cards":[{"text":"from the blocking API"}]}"#));
    });

    let output = generate_sync("some text", &config).expect("generation should succeed");
    assert_eq!(output.cards.cards[0].text, "from the blocking API");
}

#[tokio::test]
async fn generate_to_dir_writes_numbered_card_files() {
    let server = MockServer::start();
    let config = test_config(&server);
    let dir = tempfile::tempdir().expect("tempdir");

    server.mock(|when, then| {
        when.method(POST).path("/v1/messages");
        then.status(200).json_body(messages_reply(
            r#"{"cards":[{"text":"first card"},{"text":"second card"}]}"#,
        ));
    });

    let output = generate_to_dir("some text", dir.path(), &config)
        .await
        .expect("generation should succeed");

    assert_eq!(output.cards.len(), 2);

    let first = std::fs::read_to_string(dir.path().join("card-01.txt")).expect("card-01.txt");
    let second = std::fs::read_to_string(dir.path().join("card-02.txt")).expect("card-02.txt");
    assert_eq!(first, "first card");
    assert_eq!(second, "second card");
}
