//! CLI binary for text2cards.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `GenerationConfig`, feeds the submission through [`generate`], and prints
//! the resulting cards.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use text2cards::{generate, generate_to_dir, CardsError, GenerationConfig, GenerationOutput};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Generate cards from an argument
  text2cards "today the rain finally stopped and the whole street smelled new"

  # Generate from a file
  text2cards --file draft.txt

  # Read from stdin
  cat draft.txt | text2cards

  # Save each card to its own numbered file
  text2cards --file draft.txt -o cards/

  # Structured JSON output (cards + stats)
  text2cards --json "..." > cards.json

  # Use a different model
  text2cards --model claude-3-5-haiku-20241022 "..."

ENVIRONMENT VARIABLES:
  ANTHROPIC_API_KEY    Anthropic API key (required)
  ANTHROPIC_BASE_URL   Override the API endpoint (proxies, mock servers)
  ANTHROPIC_MODEL      Override the model id

EXIT CODES:
  0  cards generated
  1  generation failed (API, network, or response validation)
  2  the submission itself was rejected (empty or too long)

SETUP:
  1. Set API key:  export ANTHROPIC_API_KEY=sk-ant-...
  2. Generate:     text2cards "some rough text to polish"
"#;

/// Polish free-form text into share-ready photo-card captions.
#[derive(Parser, Debug)]
#[command(
    name = "text2cards",
    version,
    about = "Polish free-form text into share-ready photo-card captions",
    long_about = "Polish free-form text and split it into short caption cards for photo posts. \
The text is sent to the Anthropic Messages API exactly once, and the reply is accepted only \
when it is strictly valid JSON in the expected card layout.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// The text to polish and segment. Reads stdin when omitted.
    text: Option<String>,

    /// Read the text from this file instead of the argument or stdin.
    #[arg(long, conflicts_with = "text", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Write each card to its own numbered .txt file in this directory.
    #[arg(short, long, env = "TEXT2CARDS_OUTPUT", value_name = "DIR")]
    output: Option<PathBuf>,

    /// Model id sent with the request.
    #[arg(long, env = "ANTHROPIC_MODEL")]
    model: Option<String>,

    /// Max tokens the model may generate.
    #[arg(long, env = "TEXT2CARDS_MAX_TOKENS", default_value_t = 8000)]
    max_tokens: u32,

    /// Sampling temperature (0.0–1.0).
    #[arg(long, env = "TEXT2CARDS_TEMPERATURE", default_value_t = 1.0)]
    temperature: f32,

    /// Per-call HTTP timeout in seconds (no explicit timeout when unset).
    #[arg(long, env = "TEXT2CARDS_API_TIMEOUT")]
    api_timeout: Option<u64>,

    /// Output the full result as JSON instead of a card listing.
    #[arg(long, env = "TEXT2CARDS_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "TEXT2CARDS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "TEXT2CARDS_VERBOSE")]
    verbose: bool,

    /// Suppress everything except the cards and error messages.
    #[arg(short, long, env = "TEXT2CARDS_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active; the
    // spinner is the only feedback that matters during the call.
    let show_spinner = !cli.quiet && !cli.no_progress && !cli.json && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read the submission ──────────────────────────────────────────────
    let text = read_text(&cli)?;

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Run generation ───────────────────────────────────────────────────
    let spinner = if show_spinner {
        Some(start_spinner())
    } else {
        None
    };

    let result = match cli.output {
        Some(ref dir) => generate_to_dir(&text, dir, &config).await,
        None => generate(&text, &config).await,
    };

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    match result {
        Ok(output) => {
            print_success(&cli, &output)?;
            Ok(())
        }
        Err(e) => {
            report_failure(&cli, &e);
            let _ = io::stdout().flush();
            std::process::exit(if e.is_input_error() { 2 } else { 1 });
        }
    }
}

/// Resolve the submission text from argument, file, or stdin.
fn read_text(cli: &Cli) -> Result<String> {
    if let Some(ref text) = cli.text {
        return Ok(text.clone());
    }
    if let Some(ref path) = cli.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input from {}", path.display()));
    }
    if io::stdin().is_terminal() {
        anyhow::bail!(
            "No input. Pass the text as an argument, use --file, or pipe it on stdin.\n\
             Try: text2cards \"some text to polish\""
        );
    }
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

/// Map CLI args to `GenerationConfig`.
fn build_config(cli: &Cli) -> Result<GenerationConfig> {
    let mut builder = GenerationConfig::builder()
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature);

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(secs) = cli.api_timeout {
        builder = builder.api_timeout_secs(secs);
    }

    builder.build().context("Invalid configuration")
}

/// Spinner shown while the single API call is in flight.
fn start_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
    bar.set_style(style);
    bar.set_prefix("Generating");
    bar.set_message("waiting for the model…");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_success(cli: &Cli, output: &GenerationOutput) -> Result<()> {
    if cli.json {
        let json = serde_json::to_string_pretty(output).context("Failed to serialise output")?;
        println!("{json}");
    } else if let Some(ref dir) = cli.output {
        if !cli.quiet {
            eprintln!(
                "{} {} cards  →  {}",
                green("✔"),
                bold(&output.cards.len().to_string()),
                bold(&dir.display().to_string()),
            );
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for (index, card) in output.cards.iter().enumerate() {
            if index > 0 {
                writeln!(handle).context("Failed to write to stdout")?;
            }
            writeln!(handle, "{}  {}", cyan(&format!("[{}]", index + 1)), card.text)
                .context("Failed to write to stdout")?;
        }
        if output.cards.is_empty() {
            eprintln!("{}", dim("(the model produced no cards)"));
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.input_tokens.to_string()),
            dim(&output.stats.output_tokens.to_string()),
            output.stats.duration_ms,
        );
    }
    Ok(())
}

/// Print a failure: a short generic headline, with the operator detail
/// underneath. The raw model reply is never part of either (it only reaches
/// the debug log).
fn report_failure(cli: &Cli, e: &CardsError) {
    if cli.json {
        println!("{}", serde_json::json!({ "message": e.user_message() }));
        return;
    }
    eprintln!("{} {}", red("✗"), e.user_message());
    if !cli.quiet {
        eprintln!("  {}", dim(&e.to_string()));
    }
}
