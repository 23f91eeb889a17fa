//! Record extraction: turn one artifact file into a record collection.
//!
//! One [`Extractor`] per artifact format. The engine only ever sees the
//! resulting [`RecordCollection`]; failures are reported back as
//! [`ExtractError`] and the caller decides how to degrade.

mod js_array;
mod json_array;

pub use js_array::JsArrayExtractor;
pub use json_array::JsonArrayExtractor;

use std::fmt;
use std::path::Path;

use dashdiff_recon::{CompareConfig, RecordCollection};

#[derive(Debug)]
pub enum ExtractError {
    /// File could not be read.
    Io { path: String, message: String },
    /// The `const <name> = [...];` block was not found.
    MarkerNotFound { variable: String },
    /// The data block is not valid JSON after cleanup.
    Parse(String),
    /// The data block parsed, but is not an array.
    NotAnArray { found: &'static str },
    /// The extractor could not be built from its settings.
    Setup(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "cannot read {path}: {message}"),
            Self::MarkerNotFound { variable } => write!(f, "could not find {variable} array"),
            Self::Parse(msg) => write!(f, "invalid JSON: {msg}"),
            Self::NotAnArray { found } => write!(f, "expected a JSON array, found {found}"),
            Self::Setup(msg) => write!(f, "extractor setup failed: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

pub trait Extractor {
    /// Short format name, used in logs.
    fn name(&self) -> &'static str;

    fn extract_str(&self, text: &str) -> Result<RecordCollection, ExtractError>;

    fn extract_file(&self, path: &Path) -> Result<RecordCollection, ExtractError> {
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.extract_str(&text)
    }
}

/// Pick the extractor for the configured artifact extension: plain `.json`
/// files are read directly, anything else is scraped as generated JS.
pub fn extractor_for(config: &CompareConfig) -> Result<Box<dyn Extractor>, ExtractError> {
    if config.artifacts.extension.eq_ignore_ascii_case("json") {
        Ok(Box::new(JsonArrayExtractor))
    } else {
        Ok(Box::new(JsArrayExtractor::new(&config.extractor.variable)?))
    }
}

/// Parse a JSON document that must be an array of entries.
fn parse_array(json: &str) -> Result<RecordCollection, ExtractError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ExtractError::Parse(e.to_string()))?;
    match value {
        serde_json::Value::Array(items) => Ok(RecordCollection::from_json(items)),
        other => Err(ExtractError::NotAnArray {
            found: json_kind(&other),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
