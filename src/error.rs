//! Error types for the edgequake-layout2v4 library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] is **fatal**: the conversion cannot produce a document
//!   (no credential, transport failure, the model answered with something
//!   that is not a valid V4 tree). Returned as `Err(ConvertError)` from every
//!   `convert*` entry point. Nothing is retried.
//!
//! * [`ExampleError`] is **non-fatal**: a single few-shot example pair could
//!   not be loaded. The loader logs it and carries on with fewer examples, so
//!   callers never see it unless they drive an [`crate::pipeline::examples::ExampleSource`]
//!   themselves.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`ConvertError`].
///
/// Lets callers branch on the failure class without matching every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credential missing or configuration rejected by the builder.
    Configuration,
    /// Connection error, timeout or unreadable response body.
    Transport,
    /// The API answered but not with a chat-completion body.
    ResponseShape,
    /// The completion text is not JSON.
    ResponseParse,
    /// The converted tree breaks the `elType` invariant.
    Validation,
    /// A document nests deeper than the configured cap.
    MalformedInput,
    /// Reading or writing a document file failed.
    Io,
    /// Unexpected internal error.
    Internal,
}

/// All fatal errors returned by the edgequake-layout2v4 library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// No usable API credential could be resolved at construction.
    #[error("API key not configured.\n{hint}")]
    MissingCredential { hint: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Remote call errors ────────────────────────────────────────────────
    /// The request never produced a response (connect error, timeout, …).
    #[error("HTTP request failed: {message}")]
    HttpRequestFailed { message: String },

    /// The response body lacks `choices[0].message.content`.
    #[error("Invalid response format from completion API (HTTP {status})")]
    InvalidResponseFormat { status: u16 },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The completion text is not a JSON document.
    #[error("Invalid JSON response from completion API: {detail}")]
    InvalidJsonResponse { detail: String },

    /// A node of the converted tree has no `elType`.
    #[error("Converted element missing elType at {path}")]
    MissingTypeTag { path: String },

    /// The model followed the `{"error": "..."}` convention instead of converting.
    #[error("Model rejected the input: {message}")]
    ModelRejected { message: String },

    /// Element nesting exceeds the configured depth cap.
    #[error("Element tree exceeds the maximum depth of {max_depth} at {path}")]
    TooDeep { max_depth: usize, path: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read or parse an input document file.
    #[error("Failed to read input document '{path}': {detail}")]
    InputReadFailed { path: PathBuf, detail: String },

    /// Could not create or write the output document file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// The failure class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MissingCredential { .. } | ConvertError::InvalidConfig(_) => {
                ErrorKind::Configuration
            }
            ConvertError::HttpRequestFailed { .. } => ErrorKind::Transport,
            ConvertError::InvalidResponseFormat { .. } => ErrorKind::ResponseShape,
            ConvertError::InvalidJsonResponse { .. } => ErrorKind::ResponseParse,
            ConvertError::MissingTypeTag { .. } | ConvertError::ModelRejected { .. } => {
                ErrorKind::Validation
            }
            ConvertError::TooDeep { .. } => ErrorKind::MalformedInput,
            ConvertError::InputReadFailed { .. } | ConvertError::OutputWriteFailed { .. } => {
                ErrorKind::Io
            }
            ConvertError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// A non-fatal error for a single few-shot example pair.
///
/// The pair is skipped; the conversion continues with the remaining examples.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExampleError {
    /// One or both files of the pair do not exist.
    #[error("Example {index}: not found")]
    NotFound { index: usize },

    /// The file exists but could not be read.
    #[error("Example {index}: failed to read '{path}': {detail}")]
    Unreadable {
        index: usize,
        path: PathBuf,
        detail: String,
    },

    /// The file is not valid JSON.
    #[error("Example {index}: '{path}' is not valid JSON: {detail}")]
    InvalidJson {
        index: usize,
        path: PathBuf,
        detail: String,
    },

    /// The file parses to `null`, `false`, zero, `""`, `"0"`, `{}` or `[]`.
    #[error("Example {index}: document is empty")]
    Empty { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_failure_carries_transport_message() {
        let e = ConvertError::HttpRequestFailed {
            message: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("HTTP request failed"), "got: {msg}");
        assert!(msg.contains("connection refused"), "got: {msg}");
        assert_eq!(e.kind(), ErrorKind::Transport);
    }

    #[test]
    fn missing_type_tag_display_includes_path() {
        let e = ConvertError::MissingTypeTag {
            path: "$.elements[0]".into(),
        };
        assert!(e.to_string().contains("elType"));
        assert!(e.to_string().contains("$.elements[0]"));
        assert_eq!(e.kind(), ErrorKind::Validation);
    }

    #[test]
    fn kinds_follow_failure_class() {
        assert_eq!(
            ConvertError::MissingCredential { hint: String::new() }.kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            ConvertError::InvalidResponseFormat { status: 200 }.kind(),
            ErrorKind::ResponseShape
        );
        assert_eq!(
            ConvertError::InvalidJsonResponse { detail: "x".into() }.kind(),
            ErrorKind::ResponseParse
        );
        assert_eq!(
            ConvertError::ModelRejected { message: "bad".into() }.kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            ConvertError::TooDeep {
                max_depth: 4,
                path: "$".into()
            }
            .kind(),
            ErrorKind::MalformedInput
        );
    }

    #[test]
    fn response_format_display_has_status() {
        let e = ConvertError::InvalidResponseFormat { status: 401 };
        assert!(e.to_string().contains("HTTP 401"));
    }

    #[test]
    fn example_error_display() {
        let e = ExampleError::InvalidJson {
            index: 2,
            path: PathBuf::from("assets/chat/container-v3-2.json"),
            detail: "EOF while parsing".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("Example 2"), "got: {msg}");
        assert!(msg.contains("container-v3-2.json"), "got: {msg}");
    }
}
