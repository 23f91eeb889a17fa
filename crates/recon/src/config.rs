use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Comparison settings. Every key has a default, so an empty TOML document
/// describes the stock hydration dashboard layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompareConfig {
    /// Field that identifies an entity within one collection.
    #[serde(default = "default_key_field")]
    pub key_field: String,
    /// Fields compared on every common entity, in report order.
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
    /// Absolute tolerance applied when both values are floats.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
    #[serde(default)]
    pub artifacts: ArtifactConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            fields: default_fields(),
            tolerance: default_tolerance(),
            on_duplicate: DuplicatePolicy::default(),
            artifacts: ArtifactConfig::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

pub const DEFAULT_TOLERANCE: f64 = 0.01;

fn default_key_field() -> String {
    "name".into()
}

fn default_fields() -> Vec<String> {
    [
        "goal",
        "data",
        "source",
        "missed3Days",
        "ipc_found",
        "infection",
        "infection_type",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

// ---------------------------------------------------------------------------
// Duplicate names
// ---------------------------------------------------------------------------

/// What to do when one collection carries the same entity name twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later records replace earlier ones.
    #[default]
    LastWins,
    /// The first record is kept, later ones are ignored.
    FirstWins,
    /// Every record with a repeated name is excluded and reported.
    Reject,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastWins => write!(f, "last_wins"),
            Self::FirstWins => write!(f, "first_wins"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

// ---------------------------------------------------------------------------
// Artifacts + Extractor
// ---------------------------------------------------------------------------

/// Which files in a tree count as artifacts.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArtifactConfig {
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Case-insensitive fragment the file name must contain.
    #[serde(default = "default_name_contains")]
    pub name_contains: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            name_contains: default_name_contains(),
        }
    }
}

fn default_extension() -> String {
    "js".into()
}

fn default_name_contains() -> String {
    "dashboard".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Name of the `const` holding the record array.
    #[serde(default = "default_variable")]
    pub variable: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            variable: default_variable(),
        }
    }
}

fn default_variable() -> String {
    "hydrationData".into()
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CompareConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: CompareConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.key_field.trim().is_empty() {
            return Err(ReconError::ConfigValidation("key_field must not be empty".into()));
        }

        if self.fields.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one field must be compared".into(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.trim().is_empty() {
                return Err(ReconError::ConfigValidation("field names must not be empty".into()));
            }
            if !seen.insert(field.as_str()) {
                return Err(ReconError::DuplicateField(field.clone()));
            }
        }

        if seen.contains(self.key_field.as_str()) {
            return Err(ReconError::KeyFieldCompared(self.key_field.clone()));
        }

        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }

        if self.extractor.variable.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "extractor.variable must not be empty".into(),
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
