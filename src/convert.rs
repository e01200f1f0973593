//! One-shot conversion entry points and document file helpers.
//!
//! These wrap [`Converter`] for callers that convert a single document and
//! do not want to manage a converter themselves. [`convert`] and
//! [`convert_sync`] read the key from `OPENAI_API_KEY`; use
//! [`Converter::new`] directly to inject any other
//! [`CredentialProvider`].

use crate::config::{ConverterConfig, MAX_SUPPORTED_DEPTH};
use crate::converter::Converter;
use crate::credential::{CredentialProvider, EnvCredential};
use crate::error::ConvertError;
use crate::output::ConversionStats;
use crate::pipeline::validate::parse_tree;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Convert a V3 element tree to V4.
///
/// # Errors
/// Any [`ConvertError`]; see [`crate::error::ErrorKind`] for the classes.
///
/// # Example
/// ```rust,no_run
/// use edgequake_layout2v4::{convert, ConverterConfig};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ConverterConfig::builder().examples_dir("assets/chat").build()?;
/// let v3 = json!({"elType": "container", "settings": {"flex_direction": "row"}, "elements": []});
/// let v4 = convert(&v3, &config).await?;
/// println!("{}", serde_json::to_string_pretty(&v4)?);
/// # Ok(())
/// # }
/// ```
pub async fn convert(document: &Value, config: &ConverterConfig) -> Result<Value, ConvertError> {
    Converter::new(config.clone(), &EnvCredential::default())?
        .convert(document)
        .await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(document: &Value, config: &ConverterConfig) -> Result<Value, ConvertError> {
    Converter::new(config.clone(), &EnvCredential::default())?.convert_blocking(document)
}

/// Convert the document stored at `input` and write the result to `output`.
///
/// Output is pretty-printed and written atomically.
pub async fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConverterConfig,
    credentials: &dyn CredentialProvider,
) -> Result<ConversionStats, ConvertError> {
    let converter = Converter::new(config.clone(), credentials)?;
    let document = read_document(input.as_ref()).await?;
    let result = converter.convert_detailed(&document).await?;
    write_document(output.as_ref(), &result.document, true)?;
    info!("Wrote {}", output.as_ref().display());
    Ok(result.stats)
}

/// Read and parse a JSON document file.
pub async fn read_document(path: impl AsRef<Path>) -> Result<Value, ConvertError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConvertError::InputReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    parse_document(&raw, path)
}

/// Parse an in-memory JSON document; `origin` names it in errors.
///
/// Text nested past serde_json's recursion limit is [`ConvertError::TooDeep`]
/// (against [`MAX_SUPPORTED_DEPTH`]), the same class [`Converter`] reports
/// for a tree past its configured cap.
pub fn parse_document(raw: &str, origin: impl AsRef<Path>) -> Result<Value, ConvertError> {
    parse_tree(raw, MAX_SUPPORTED_DEPTH, |e| ConvertError::InputReadFailed {
        path: origin.as_ref().to_path_buf(),
        detail: format!("not valid JSON: {e}"),
    })
}

/// Write `document` as JSON to `path`.
///
/// Atomic write: the JSON goes to a temp file in the target directory which
/// is then renamed over `path`, so readers never see a partial file.
pub fn write_document(path: &Path, document: &Value, pretty: bool) -> Result<(), ConvertError> {
    let write_err = |source: std::io::Error| ConvertError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let json = if pretty {
        serde_json::to_string_pretty(document)
    } else {
        serde_json::to_string(document)
    }
    .map_err(|e| ConvertError::Internal(format!("Failed to serialise document: {e}")))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(json.as_bytes()).map_err(write_err)?;
    tmp.write_all(b"\n").map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
