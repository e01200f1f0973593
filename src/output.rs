//! Conversion results.

use serde::Serialize;
use serde_json::Value;

/// A converted document together with per-call statistics.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    /// The validated V4 tree, exactly as the model returned it.
    pub document: Value,
    pub stats: ConversionStats,
}

/// Accounting for a single conversion call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    /// Few-shot pairs that made it into the prompt.
    pub examples_used: usize,
    /// Total messages sent (`1 + 2 * examples_used + 1`).
    pub messages_sent: usize,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    /// Wall-clock time from prompt assembly to validated result.
    pub duration_ms: u64,
}
