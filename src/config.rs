//! Configuration types for V3 → V4 layout conversion.
//!
//! All conversion behaviour is controlled through [`ConverterConfig`], built
//! via its [`ConverterConfigBuilder`]. The defaults are the fixed request
//! parameters the converter was tuned with; override them only when pointing
//! at a different endpoint or model.
//!
//! The API credential is deliberately *not* part of the config: it is
//! supplied through a [`crate::credential::CredentialProvider`] when the
//! [`crate::Converter`] is constructed, so configs can be logged and shared
//! freely.

use crate::error::ConvertError;
use std::path::PathBuf;

/// Chat-completions endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Upper bound on the number of few-shot example pairs.
pub const DEFAULT_MAX_EXAMPLES: usize = 3;

/// Element nesting accepted when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest accepted `max_depth`.
///
/// serde_json refuses input nested more than 127 containers deep, and each
/// element level costs two (the element object and its `elements` array).
/// A tree one level past this cap still parses, so overruns are reported
/// as [`ConvertError::TooDeep`] rather than as a JSON syntax error.
pub const MAX_SUPPORTED_DEPTH: usize = 62;

/// Configuration for a layout conversion.
///
/// Built via [`ConverterConfig::builder()`] or using
/// [`ConverterConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_layout2v4::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .model("gpt-4o-mini")
///     .examples_dir("assets/chat")
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 500);
/// ```
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Chat-completions URL. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Model identifier sent with every request. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Sampling temperature. Default: 0.0.
    ///
    /// Requests deterministic sampling. Providers do not guarantee identical
    /// output across model revisions even at 0.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 500.
    ///
    /// Large trees can exceed this; a truncated completion then fails JSON
    /// parsing rather than returning a partial document.
    pub max_tokens: u32,

    /// Whole-request timeout in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Number of example indices tried (`1..=max_examples`). Default: 3.
    pub max_examples: usize,

    /// Maximum element nesting accepted in input and output. Default:
    /// [`DEFAULT_MAX_DEPTH`], at most [`MAX_SUPPORTED_DEPTH`].
    pub max_depth: usize,

    /// Custom system prompt. If None, uses [`crate::prompts::DEFAULT_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Directory holding `container-v3-{i}.json` / `container-v4-{i}.json`
    /// example pairs. If None, no examples are sent.
    pub examples_dir: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.0,
            max_tokens: 500,
            timeout_secs: 30,
            max_examples: DEFAULT_MAX_EXAMPLES,
            max_depth: DEFAULT_MAX_DEPTH,
            system_prompt: None,
            examples_dir: None,
        }
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }

    /// The system prompt to send: the override if set, else the default.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(crate::prompts::DEFAULT_SYSTEM_PROMPT)
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    pub fn max_examples(mut self, n: usize) -> Self {
        self.config.max_examples = n;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = depth;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn examples_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.examples_dir = Some(dir.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, ConvertError> {
        let c = &self.config;
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(ConvertError::InvalidConfig(format!(
                "Endpoint must be an HTTP/HTTPS URL, got '{}'",
                c.endpoint
            )));
        }
        if c.model.trim().is_empty() {
            return Err(ConvertError::InvalidConfig("Model must not be empty".into()));
        }
        if c.max_tokens == 0 {
            return Err(ConvertError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        if c.timeout_secs == 0 {
            return Err(ConvertError::InvalidConfig(
                "timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.max_depth == 0 {
            return Err(ConvertError::InvalidConfig("max_depth must be ≥ 1".into()));
        }
        if c.max_depth > MAX_SUPPORTED_DEPTH {
            return Err(ConvertError::InvalidConfig(format!(
                "max_depth must be ≤ {MAX_SUPPORTED_DEPTH}, got {}",
                c.max_depth
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_request_parameters() {
        let c = ConverterConfig::default();
        assert_eq!(c.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(c.model, "gpt-4o-mini");
        assert_eq!(c.temperature, 0.0);
        assert_eq!(c.max_tokens, 500);
        assert_eq!(c.timeout_secs, 30);
        assert_eq!(c.max_examples, 3);
        assert_eq!(c.max_depth, DEFAULT_MAX_DEPTH);
        assert!(c.examples_dir.is_none());
    }

    #[test]
    fn system_prompt_falls_back_to_default() {
        let c = ConverterConfig::default();
        assert_eq!(c.system_prompt(), crate::prompts::DEFAULT_SYSTEM_PROMPT);

        let c = ConverterConfig::builder()
            .system_prompt("convert please")
            .build()
            .unwrap();
        assert_eq!(c.system_prompt(), "convert please");
    }

    #[test]
    fn temperature_is_clamped() {
        let c = ConverterConfig::builder().temperature(5.0).build().unwrap();
        assert_eq!(c.temperature, 2.0);
        let c = ConverterConfig::builder().temperature(-1.0).build().unwrap();
        assert_eq!(c.temperature, 0.0);
    }

    #[test]
    fn build_rejects_bad_values() {
        let err = ConverterConfig::builder()
            .endpoint("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));

        assert!(ConverterConfig::builder().model("  ").build().is_err());
        assert!(ConverterConfig::builder().max_tokens(0).build().is_err());
        assert!(ConverterConfig::builder().timeout_secs(0).build().is_err());
        assert!(ConverterConfig::builder().max_depth(0).build().is_err());
    }

    #[test]
    fn max_depth_is_bounded_by_parser_limit() {
        let c = ConverterConfig::builder()
            .max_depth(MAX_SUPPORTED_DEPTH)
            .build()
            .unwrap();
        assert_eq!(c.max_depth, MAX_SUPPORTED_DEPTH);

        let err = ConverterConfig::builder()
            .max_depth(MAX_SUPPORTED_DEPTH + 1)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn zero_examples_is_allowed() {
        let c = ConverterConfig::builder().max_examples(0).build().unwrap();
        assert_eq!(c.max_examples, 0);
    }
}
