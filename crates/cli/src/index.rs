//! Artifact discovery: map a folder tree to `relative path -> absolute path`.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use dashdiff_recon::config::ArtifactConfig;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug)]
pub enum IndexError {
    /// The root itself could not be walked.
    Root { root: PathBuf, message: String },
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root { root, message } => write!(f, "cannot read {}: {message}", root.display()),
        }
    }
}

impl std::error::Error for IndexError {}

/// Artifact files under one root, keyed by `/`-separated relative path.
#[derive(Debug, Clone)]
pub struct ArtifactIndex {
    root: PathBuf,
    entries: BTreeMap<String, PathBuf>,
}

impl ArtifactIndex {
    /// Walk `root` recursively and keep the files that pass [`is_artifact`].
    /// Directory symlinks are not descended into; a symlink to a file is
    /// indexed like the file itself. Unreadable subdirectories are skipped
    /// with a warning.
    pub fn build(root: &Path, filter: &ArtifactConfig) -> Result<Self, IndexError> {
        let mut entries = BTreeMap::new();

        for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(IndexError::Root {
                        root: root.to_path_buf(),
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    log::warn!("skipping unreadable entry under {}: {e}", root.display());
                    continue;
                }
            };
            if !is_file_entry(&entry) || !is_artifact(entry.path(), filter) {
                continue;
            }
            let Some(key) = relative_key(root, entry.path()) else {
                continue;
            };
            entries.insert(key, entry.into_path());
        }

        log::debug!("indexed {} artifact(s) under {}", entries.len(), root.display());
        Ok(Self {
            root: root.to_path_buf(),
            entries,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn get(&self, relative: &str) -> Option<&Path> {
        self.entries.get(relative).map(PathBuf::as_path)
    }

    /// Relative paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A file is an artifact when its extension matches exactly and its file
/// name contains the configured fragment, ignoring case.
pub fn is_artifact(path: &Path, filter: &ArtifactConfig) -> bool {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == filter.extension);
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.to_lowercase().contains(&filter.name_contains.to_lowercase()));
    ext_ok && name_ok
}

fn is_file_entry(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

/// Root-relative key with `/` between components on every platform.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
