//! The converter: credential, prompt assembly, remote call, validation.
//!
//! A [`Converter`] is built once and can be used for any number of
//! conversions. It holds only immutable state (config, resolved key inside
//! the transport, example source), so it is `Send + Sync` and needs no
//! locking when shared. Every call reloads the examples and rebuilds the
//! message list; nothing is cached between calls.
//!
//! ## Call flow
//!
//! ```text
//! new()      resolve credential ── missing ──▶ Err(MissingCredential)
//! convert()  check input depth
//!            load examples, build messages
//!            send request ────────── fails ──▶ Err(HttpRequestFailed | InvalidResponseFormat)
//!            parse + validate ────── fails ──▶ Err(InvalidJsonResponse | MissingTypeTag | …)
//!            Ok(document)
//! ```

use crate::config::ConverterConfig;
use crate::credential::{resolve_api_key, CredentialProvider};
use crate::error::ConvertError;
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::examples::{load_examples, DirExampleSource, ExamplePair, ExampleSource, NoExamples};
use crate::pipeline::llm::{CompletionRequest, CompletionTransport, HttpTransport};
use crate::pipeline::messages::{build_messages, ChatMessage};
use crate::pipeline::validate::{check_depth, parse_completion};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Converts V3 element trees to V4 through a chat-completion model.
pub struct Converter {
    config: ConverterConfig,
    transport: Arc<dyn CompletionTransport>,
    examples: Arc<dyn ExampleSource>,
}

impl std::fmt::Debug for Converter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Converter")
            .field("config", &self.config)
            .field("transport", &"<dyn CompletionTransport>")
            .field("examples", &"<dyn ExampleSource>")
            .finish()
    }
}

impl Converter {
    /// Resolve the API key and prepare the HTTP transport.
    ///
    /// Fails with [`ConvertError::MissingCredential`] when `credentials`
    /// yields no key; no request is made in that case. Examples come from
    /// `config.examples_dir` when set.
    pub fn new(
        config: ConverterConfig,
        credentials: &dyn CredentialProvider,
    ) -> Result<Self, ConvertError> {
        let api_key = resolve_api_key(credentials)?;
        let transport = HttpTransport::new(&config.endpoint, api_key, config.timeout_secs)?;

        let examples: Arc<dyn ExampleSource> = match config.examples_dir {
            Some(ref dir) => Arc::new(DirExampleSource::new(dir)),
            None => Arc::new(NoExamples),
        };

        Ok(Self {
            config,
            transport: Arc::new(transport),
            examples,
        })
    }

    /// Replace the transport (e.g. with a fake in tests).
    pub fn with_transport(mut self, transport: Arc<dyn CompletionTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Replace the example source.
    pub fn with_examples(mut self, examples: Arc<dyn ExampleSource>) -> Self {
        self.examples = examples;
        self
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Load the few-shot examples the next call would use.
    pub fn load_examples(&self) -> Vec<ExamplePair> {
        load_examples(self.examples.as_ref(), self.config.max_examples)
    }

    /// Assemble the full message list for `document` without sending it.
    pub fn build_messages(&self, document: &Value) -> Result<Vec<ChatMessage>, ConvertError> {
        let examples = self.load_examples();
        build_messages(self.config.system_prompt(), &examples, document)
    }

    /// Convert `document`, returning the validated V4 tree.
    pub async fn convert(&self, document: &Value) -> Result<Value, ConvertError> {
        self.convert_detailed(document).await.map(|out| out.document)
    }

    /// Convert `document`, returning the tree plus call statistics.
    pub async fn convert_detailed(&self, document: &Value) -> Result<ConversionOutput, ConvertError> {
        let start = Instant::now();
        check_depth(document, self.config.max_depth)?;

        let examples = self.load_examples();
        let messages = build_messages(self.config.system_prompt(), &examples, document)?;
        let messages_sent = messages.len();
        debug!(
            "Prompt built: {} examples, {} messages",
            examples.len(),
            messages_sent
        );

        let request = CompletionRequest {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            messages,
        };
        let completion = self.transport.complete(&request).await?;
        debug!("Completion received: {} bytes", completion.content.len());

        let converted = parse_completion(&completion.content, self.config.max_depth)?;

        let stats = ConversionStats {
            examples_used: examples.len(),
            messages_sent,
            prompt_tokens: completion.prompt_tokens,
            completion_tokens: completion.completion_tokens,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Conversion complete: {} examples, {} tokens in / {} out, {}ms",
            stats.examples_used, stats.prompt_tokens, stats.completion_tokens, stats.duration_ms
        );

        Ok(ConversionOutput {
            document: converted,
            stats,
        })
    }

    /// Blocking wrapper around [`Converter::convert`].
    ///
    /// Creates a temporary tokio runtime internally; must not be called from
    /// inside an async context.
    pub fn convert_blocking(&self, document: &Value) -> Result<Value, ConvertError> {
        tokio::runtime::Runtime::new()
            .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.convert(document))
    }
}
