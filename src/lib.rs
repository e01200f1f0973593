//! # edgequake-layout2v4
//!
//! Convert V3 page-layout element trees (containers, widgets, nested
//! `elements`) to the V4 schema using a chat-completion model.
//!
//! ## Why a model?
//!
//! The V3 → V4 migration renames and regroups dozens of settings
//! (`flex_direction` → `layout_controls.flex_direction.value`, …) with many
//! per-widget special cases. This crate sends the tree to a model together
//! with the mapping rules and a few worked examples, then refuses any answer
//! that is not a well-formed element tree.
//!
//! ## Pipeline Overview
//!
//! ```text
//! V3 JSON
//!  │
//!  ├─ 1. Examples  load up to 3 before/after pairs (missing pairs skipped)
//!  ├─ 2. Messages  system rules + example turns + input document
//!  ├─ 3. LLM       one POST to /v1/chat/completions (temperature 0, 500 tokens)
//!  ├─ 4. Validate  parse JSON, every node must carry `elType`
//!  └─ 5. Output    the model's tree, untouched
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_layout2v4::{Converter, ConverterConfig, EnvCredential};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConverterConfig::builder().examples_dir("assets/chat").build()?;
//!     // Fails here, before any request, if OPENAI_API_KEY is unset.
//!     let converter = Converter::new(config, &EnvCredential::default())?;
//!
//!     let v3 = json!({"elType": "container", "settings": {"gap": 20}, "elements": []});
//!     let v4 = converter.convert(&v3).await?;
//!     println!("{}", serde_json::to_string_pretty(&v4)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `layout2v4` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-layout2v4 = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod converter;
pub mod credential;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use convert::{
    convert, convert_file, convert_sync, parse_document, read_document, write_document,
};
pub use converter::Converter;
pub use credential::{
    CredentialProvider, EnvCredential, SettingsFileCredential, StaticCredential,
};
pub use error::{ConvertError, ErrorKind, ExampleError};
pub use output::{ConversionOutput, ConversionStats};
pub use pipeline::examples::{DirExampleSource, ExamplePair, ExampleSource, NoExamples, StaticExamples};
pub use pipeline::llm::{Completion, CompletionRequest, CompletionTransport, HttpTransport};
pub use pipeline::messages::{ChatMessage, Role};
