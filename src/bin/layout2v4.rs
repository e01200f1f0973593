//! CLI binary for edgequake-layout2v4.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConverterConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_layout2v4::{
    parse_document, read_document, write_document, ConversionOutput, Converter, ConverterConfig,
    CredentialProvider, EnvCredential, SettingsFileCredential, StaticCredential,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a V3 container export (stdout)
  layout2v4 container.json

  # Convert to file, pretty-printed
  layout2v4 container.json -o container-v4.json --pretty

  # Read from stdin
  cat container.json | layout2v4 -

  # Show the prompt that would be sent (no API key needed)
  layout2v4 --show-prompt container.json

  # Result plus token/latency stats as JSON
  layout2v4 --json container.json

FEW-SHOT EXAMPLES:
  Pairs are read from --examples-dir as container-v3-N.json / container-v4-N.json
  for N = 1..3. Missing or invalid pairs are skipped.

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY           API key (or --api-key / --settings)
  LAYOUT2V4_ENDPOINT       Chat-completions URL
  LAYOUT2V4_MODEL          Model ID (default gpt-4o-mini)
  LAYOUT2V4_EXAMPLES_DIR   Few-shot example directory
  RUST_LOG                 Override log filter (e.g. edgequake_layout2v4=debug)
"#;

/// Convert V3 layout element trees to V4 using a chat-completion model.
#[derive(Parser, Debug)]
#[command(
    name = "layout2v4",
    version,
    about = "Convert V3 layout element trees to V4 using a chat-completion model",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// V3 JSON document path, or `-` for stdin.
    input: String,

    /// Write the converted document to this file instead of stdout.
    #[arg(short, long, env = "LAYOUT2V4_OUTPUT")]
    output: Option<PathBuf>,

    /// API key for the completion endpoint.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// JSON settings file holding the API key (used when --api-key is absent).
    #[arg(long, env = "LAYOUT2V4_SETTINGS")]
    settings: Option<PathBuf>,

    /// Option name of the key inside --settings.
    #[arg(long, env = "LAYOUT2V4_SETTINGS_KEY", default_value = "openai_api_key")]
    settings_key: String,

    /// Chat-completions endpoint URL.
    #[arg(long, env = "LAYOUT2V4_ENDPOINT",
          default_value = edgequake_layout2v4::config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Model ID.
    #[arg(long, env = "LAYOUT2V4_MODEL",
          default_value = edgequake_layout2v4::config::DEFAULT_MODEL)]
    model: String,

    /// Max output tokens.
    #[arg(long, env = "LAYOUT2V4_MAX_TOKENS", default_value_t = 500)]
    max_tokens: u32,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "LAYOUT2V4_TEMPERATURE", default_value_t = 0.0)]
    temperature: f32,

    /// Request timeout in seconds.
    #[arg(long, env = "LAYOUT2V4_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Maximum element nesting accepted.
    #[arg(long, env = "LAYOUT2V4_MAX_DEPTH", default_value_t = edgequake_layout2v4::config::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Directory with container-v3-N.json / container-v4-N.json example pairs.
    #[arg(long, env = "LAYOUT2V4_EXAMPLES_DIR", default_value = "assets/chat")]
    examples_dir: PathBuf,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "LAYOUT2V4_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,

    /// Output structured JSON (document + stats) instead of the bare document.
    #[arg(long)]
    json: bool,

    /// Print the assembled messages and exit without calling the API.
    #[arg(long)]
    show_prompt: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LAYOUT2V4_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LAYOUT2V4_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli).await?;
    let document = read_input(&cli.input).await?;

    // ── Prompt-only mode ─────────────────────────────────────────────────
    // A placeholder key satisfies construction; nothing is sent.
    if cli.show_prompt {
        let converter = Converter::new(config, &StaticCredential::new("unused"))?;
        let messages = converter.build_messages(&document)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&messages).context("Failed to serialise messages")?
        );
        return Ok(());
    }

    let credentials = credential_provider(&cli);
    let converter =
        Converter::new(config, credentials.as_ref()).context("Failed to initialise converter")?;

    // ── Run conversion ───────────────────────────────────────────────────
    let spinner = (!cli.quiet).then(|| {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  ⏱ {elapsed}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_prefix("Converting");
        bar.set_message(converter.config().model.clone());
        bar.enable_steady_tick(Duration::from_millis(80));
        bar
    });

    let result = converter.convert_detailed(&document).await;
    if let Some(bar) = &spinner {
        bar.finish_and_clear();
    }
    let output = result.context("Conversion failed")?;

    emit(&cli, &output)?;

    if !cli.quiet {
        eprintln!(
            "{} converted with {} examples  {}ms",
            green("✔"),
            bold(&output.stats.examples_used.to_string()),
            output.stats.duration_ms,
        );
        eprintln!(
            "   {} tokens in  /  {} tokens out",
            dim(&output.stats.prompt_tokens.to_string()),
            dim(&output.stats.completion_tokens.to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `ConverterConfig`.
async fn build_config(cli: &Cli) -> Result<ConverterConfig> {
    let mut builder = ConverterConfig::builder()
        .endpoint(&cli.endpoint)
        .model(&cli.model)
        .max_tokens(cli.max_tokens)
        .temperature(cli.temperature)
        .timeout_secs(cli.timeout)
        .max_depth(cli.max_depth)
        .examples_dir(&cli.examples_dir);

    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }

    builder.build().context("Invalid configuration")
}

/// `--api-key` (or `OPENAI_API_KEY`) wins over `--settings`.
fn credential_provider(cli: &Cli) -> Box<dyn CredentialProvider> {
    match (&cli.api_key, &cli.settings) {
        (Some(key), _) => Box::new(StaticCredential::new(key)),
        (None, Some(path)) => Box::new(SettingsFileCredential::with_option(path, &cli.settings_key)),
        (None, None) => Box::new(EnvCredential::default()),
    }
}

async fn read_input(input: &str) -> Result<Value> {
    if input == "-" {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read document from stdin")?;
        return Ok(parse_document(&raw, "<stdin>")?);
    }
    Ok(read_document(input).await?)
}

fn emit(cli: &Cli, output: &ConversionOutput) -> Result<()> {
    if let Some(ref path) = cli.output {
        let value = if cli.json {
            serde_json::to_value(output).context("Failed to serialise output")?
        } else {
            output.document.clone()
        };
        write_document(path, &value, cli.pretty || cli.json)?;
        return Ok(());
    }

    let json = match (cli.json, cli.pretty) {
        (true, _) => serde_json::to_string_pretty(output),
        (false, true) => serde_json::to_string_pretty(&output.document),
        (false, false) => serde_json::to_string(&output.document),
    }
    .context("Failed to serialise output")?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(json.as_bytes())
        .context("Failed to write to stdout")?;
    handle
        .write_all(b"\n")
        .context("Failed to write to stdout")?;
    Ok(())
}
