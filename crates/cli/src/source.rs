//! Folder-to-folder comparison: indexes + extractor feeding the engine.

use std::fmt;
use std::path::Path;

use dashdiff_recon::{run, CollectionSource, CompareConfig, RecordCollection, RunInput, RunReport, Side};

use crate::extract::{extractor_for, ExtractError, Extractor};
use crate::index::{ArtifactIndex, IndexError};

#[derive(Debug)]
pub enum CompareError {
    Index(IndexError),
    Extractor(ExtractError),
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(e) => write!(f, "{e}"),
            Self::Extractor(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompareError {}

impl From<IndexError> for CompareError {
    fn from(e: IndexError) -> Self {
        Self::Index(e)
    }
}

impl From<ExtractError> for CompareError {
    fn from(e: ExtractError) -> Self {
        Self::Extractor(e)
    }
}

/// Loads collections straight from the two indexed trees.
pub struct TreeSource<'a> {
    pub left: &'a ArtifactIndex,
    pub right: &'a ArtifactIndex,
    pub extractor: &'a dyn Extractor,
}

impl CollectionSource for TreeSource<'_> {
    fn load(&self, side: Side, path: &str) -> Result<RecordCollection, String> {
        let index = match side {
            Side::Left => self.left,
            Side::Right => self.right,
        };
        let file = index
            .get(path)
            .ok_or_else(|| format!("{path} is not in the {} index", side.as_str()))?;
        self.extractor.extract_file(file).map_err(|e| e.to_string())
    }
}

/// Index both folders and reconcile every artifact they hold.
///
/// Both roots are expected to exist already; an unreadable root is an error,
/// an unreadable artifact only degrades that file.
pub fn compare_folders(
    left_root: &Path,
    right_root: &Path,
    config: &CompareConfig,
) -> Result<RunReport, CompareError> {
    let extractor = extractor_for(config)?;
    let left = ArtifactIndex::build(left_root, &config.artifacts)?;
    let right = ArtifactIndex::build(right_root, &config.artifacts)?;
    log::info!(
        "{} left artifact(s), {} right artifact(s), extractor {}",
        left.len(),
        right.len(),
        extractor.name()
    );

    let input = RunInput {
        left_root: left_root.display().to_string(),
        right_root: right_root.display().to_string(),
        left_paths: left.paths().cloned().collect(),
        right_paths: right.paths().cloned().collect(),
    };
    let source = TreeSource {
        left: &left,
        right: &right,
        extractor: extractor.as_ref(),
    };
    Ok(run(config, &input, &source))
}
