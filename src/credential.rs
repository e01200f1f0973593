//! API credential resolution.
//!
//! The converter never reads a global settings store itself. A
//! [`CredentialProvider`] is handed to [`crate::Converter::new`], asked once,
//! and the resulting key is held immutably for the converter's lifetime.
//! Resolution fails fast: an absent or blank key is a construction error,
//! so no request is ever sent without one.

use crate::error::ConvertError;
use std::path::PathBuf;

/// Environment variable read by [`EnvCredential::default`].
pub const DEFAULT_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Option name read by [`SettingsFileCredential::new`].
pub const DEFAULT_SETTINGS_KEY: &str = "openai_api_key";

/// Supplies the API key for the completion endpoint.
pub trait CredentialProvider: Send + Sync {
    /// The key, or `None` when this source has none.
    fn api_key(&self) -> Option<String>;

    /// Human-readable hint on where the key was expected.
    fn describe(&self) -> String;
}

/// A key handed over directly by the caller.
#[derive(Clone)]
pub struct StaticCredential(String);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl std::fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StaticCredential").field(&"<redacted>").finish()
    }
}

impl CredentialProvider for StaticCredential {
    fn api_key(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn describe(&self) -> String {
        "Pass a non-empty key (e.g. --api-key sk-...).".to_string()
    }
}

/// A key read from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvCredential {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_VAR)
    }
}

impl CredentialProvider for EnvCredential {
    fn api_key(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }

    fn describe(&self) -> String {
        format!("Set {}=sk-...", self.var)
    }
}

/// A key stored as a string option in a JSON settings file.
///
/// The file is a flat JSON object, e.g. `{"openai_api_key": "sk-..."}`.
/// A missing file, unparsable file, or non-string option all count as
/// "no key".
#[derive(Debug, Clone)]
pub struct SettingsFileCredential {
    path: PathBuf,
    option: String,
}

impl SettingsFileCredential {
    /// Read [`DEFAULT_SETTINGS_KEY`] from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_option(path, DEFAULT_SETTINGS_KEY)
    }

    pub fn with_option(path: impl Into<PathBuf>, option: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            option: option.into(),
        }
    }
}

impl CredentialProvider for SettingsFileCredential {
    fn api_key(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let settings: serde_json::Value = serde_json::from_str(&raw).ok()?;
        settings
            .get(&self.option)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    }

    fn describe(&self) -> String {
        format!(
            "Set the \"{}\" option in {}",
            self.option,
            self.path.display()
        )
    }
}

/// Ask `provider` for the key once; absent or blank is an error.
pub fn resolve_api_key(provider: &dyn CredentialProvider) -> Result<String, ConvertError> {
    match provider.api_key() {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(ConvertError::MissingCredential {
            hint: provider.describe(),
        }),
    }
}
