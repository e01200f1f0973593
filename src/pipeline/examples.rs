//! Few-shot example loading.
//!
//! Examples are best-effort input. Each pair is fetched by a 1-based index
//! from an injected [`ExampleSource`]; a pair that is missing, unreadable or
//! not JSON is skipped and logged, never propagated. The model then simply
//! sees fewer examples.

use crate::error::ExampleError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A worked V3 ("before") → V4 ("after") conversion shown to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamplePair {
    pub before: Value,
    pub after: Value,
}

impl ExamplePair {
    pub fn new(before: Value, after: Value) -> Self {
        Self { before, after }
    }
}

/// Maps a 1-based index to an example pair.
pub trait ExampleSource: Send + Sync {
    fn pair(&self, index: usize) -> Result<ExamplePair, ExampleError>;
}

/// Example pairs stored as `container-v3-{i}.json` / `container-v4-{i}.json`
/// files in one directory.
#[derive(Debug, Clone)]
pub struct DirExampleSource {
    dir: PathBuf,
}

impl DirExampleSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn before_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("container-v3-{index}.json"))
    }

    pub fn after_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("container-v4-{index}.json"))
    }
}

impl ExampleSource for DirExampleSource {
    fn pair(&self, index: usize) -> Result<ExamplePair, ExampleError> {
        let before_path = self.before_path(index);
        let after_path = self.after_path(index);

        // Both halves must exist before either is read.
        if !before_path.is_file() || !after_path.is_file() {
            return Err(ExampleError::NotFound { index });
        }

        let before = read_example(index, &before_path)?;
        let after = read_example(index, &after_path)?;
        Ok(ExamplePair { before, after })
    }
}

fn read_example(index: usize, path: &Path) -> Result<Value, ExampleError> {
    let raw = std::fs::read_to_string(path).map_err(|e| ExampleError::Unreadable {
        index,
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| ExampleError::InvalidJson {
        index,
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    if is_blank(&value) {
        return Err(ExampleError::Empty { index });
    }
    Ok(value)
}

/// A document with nothing to demonstrate: `null`, `false`, zero, `""`,
/// `"0"` or an empty object or array.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
    }
}

/// Example pairs held in memory, index `i` being `pairs[i - 1]`.
#[derive(Debug, Clone, Default)]
pub struct StaticExamples {
    pairs: Vec<ExamplePair>,
}

impl StaticExamples {
    pub fn new(pairs: Vec<ExamplePair>) -> Self {
        Self { pairs }
    }
}

impl ExampleSource for StaticExamples {
    fn pair(&self, index: usize) -> Result<ExamplePair, ExampleError> {
        index
            .checked_sub(1)
            .and_then(|i| self.pairs.get(i))
            .cloned()
            .ok_or(ExampleError::NotFound { index })
    }
}

/// A source with no examples at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExamples;

impl ExampleSource for NoExamples {
    fn pair(&self, index: usize) -> Result<ExamplePair, ExampleError> {
        Err(ExampleError::NotFound { index })
    }
}

/// Load pairs `1..=max` in index order, skipping any that fail.
pub fn load_examples(source: &dyn ExampleSource, max: usize) -> Vec<ExamplePair> {
    let mut examples = Vec::with_capacity(max);
    for index in 1..=max {
        match source.pair(index) {
            Ok(pair) => examples.push(pair),
            Err(e @ ExampleError::NotFound { .. }) => debug!("Skipping few-shot example: {}", e),
            Err(e) => warn!("Skipping few-shot example: {}", e),
        }
    }
    debug!("Loaded {}/{} few-shot examples", examples.len(), max);
    examples
}
