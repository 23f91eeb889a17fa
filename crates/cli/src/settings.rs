//! Run settings: config file, CLI overrides, and input folder resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use dashdiff_recon::{CompareConfig, DuplicatePolicy, ReconError, Side};

#[derive(Debug)]
pub enum SettingsError {
    /// Config file could not be read.
    Read { path: PathBuf, message: String },
    /// Config file or overrides failed validation.
    Config(ReconError),
    /// An input folder does not exist.
    FolderMissing { side: Side, path: PathBuf },
    /// An input path exists but is not a directory.
    NotADirectory { side: Side, path: PathBuf },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, message } => write!(f, "cannot read config {}: {message}", path.display()),
            Self::Config(e) => write!(f, "{e}"),
            Self::FolderMissing { side, path } => {
                write!(f, "{} folder does not exist: {}", side.as_str(), path.display())
            }
            Self::NotADirectory { side, path } => {
                write!(f, "{} path is not a folder: {}", side.as_str(), path.display())
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<ReconError> for SettingsError {
    fn from(e: ReconError) -> Self {
        Self::Config(e)
    }
}

/// Values given on the command line. Each one replaces the config file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub key_field: Option<String>,
    pub fields: Option<Vec<String>>,
    pub tolerance: Option<f64>,
    pub on_duplicate: Option<DuplicatePolicy>,
}

/// Load the config file (or defaults), apply overrides, validate the result.
pub fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<CompareConfig, SettingsError> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| SettingsError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            CompareConfig::from_toml(&text)?
        }
        None => CompareConfig::default(),
    };

    if let Some(ref key) = overrides.key_field {
        config.key_field = key.clone();
    }
    if let Some(ref fields) = overrides.fields {
        config.fields = fields.iter().map(|f| f.trim().to_string()).collect();
    }
    if let Some(tolerance) = overrides.tolerance {
        config.tolerance = tolerance;
    }
    if let Some(policy) = overrides.on_duplicate {
        config.on_duplicate = policy;
    }

    config.validate()?;
    Ok(config)
}

/// The right-hand folder used when none is given: `output` next to `left`.
pub fn default_right_folder(left: &Path) -> PathBuf {
    left.parent().unwrap_or(left).join("output")
}

/// Expand `~`, make absolute, and require an existing directory.
pub fn resolve_folder(raw: &str, side: Side) -> Result<PathBuf, SettingsError> {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    check_folder(&expanded, side)
}

/// Make `path` absolute and require an existing directory.
pub fn check_folder(path: &Path, side: Side) -> Result<PathBuf, SettingsError> {
    match path.canonicalize() {
        Ok(abs) if abs.is_dir() => Ok(abs),
        Ok(abs) => Err(SettingsError::NotADirectory { side, path: abs }),
        Err(_) => Err(SettingsError::FolderMissing {
            side,
            path: absolutize(path),
        }),
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
