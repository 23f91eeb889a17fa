use serde::Serialize;

use crate::value::FieldValue;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Ordered entries extracted from one artifact file.
///
/// Entries are kept raw: an entry that is not an object, or has no usable key,
/// is only rejected once the collection is indexed, so one bad entry never
/// hides the rest of the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    pub entries: Vec<FieldValue>,
}

impl RecordCollection {
    pub fn new(entries: Vec<FieldValue>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(values: Vec<serde_json::Value>) -> Self {
        Self::new(values.into_iter().map(FieldValue::from).collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Differences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDifference {
    pub field: String,
    pub left: FieldValue,
    pub right: FieldValue,
}

/// All field differences for one entity present on both sides.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDiff {
    pub name: String,
    pub differences: Vec<FieldDifference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountMismatch {
    pub left: usize,
    pub right: usize,
}

/// Mismatch description for one relative path present in both trees.
/// Only built when at least one fact below is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_mismatch: Option<CountMismatch>,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub left_duplicates: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub right_duplicates: Vec<String>,
    pub entity_diffs: Vec<EntityDiff>,
}

impl FileReport {
    pub fn has_count_mismatch(&self) -> bool {
        self.count_mismatch.is_some()
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// The artifact could not be read or parsed; that side was compared as empty.
    ExtractionFailed,
    /// One entry was not a record or had no usable key.
    RejectedEntry,
    /// A name appeared more than once and was collapsed to one record.
    DuplicateName,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtractionFailed => write!(f, "extraction_failed"),
            Self::RejectedEntry => write!(f, "rejected_entry"),
            Self::DuplicateName => write!(f, "duplicate_name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub side: Side,
    pub kind: WarningKind,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStatus {
    Matching,
    Different,
    /// Extraction failed on both sides, so nothing was compared.
    Unreadable,
}

/// Result for one common relative path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathOutcome {
    pub path: String,
    pub status: PathStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<FileReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total_paths: usize,
    pub common_paths: usize,
    pub left_only_paths: usize,
    pub right_only_paths: usize,
    pub files_with_differences: usize,
    pub files_matching: usize,
    pub files_unreadable: usize,
    pub extraction_failures: usize,
    pub rejected_entries: usize,
}

/// Clean/dirty outcome of a whole run, separate from the human-readable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Clean,
    Dirty,
}

impl Verdict {
    pub fn from_summary(summary: &RunSummary) -> Self {
        if summary.files_with_differences == 0
            && summary.files_unreadable == 0
            && summary.left_only_paths == 0
            && summary.right_only_paths == 0
        {
            Self::Clean
        } else {
            Self::Dirty
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::Clean
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Dirty => write!(f, "dirty"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub left_root: String,
    pub right_root: String,
    pub key_field: String,
    pub fields: Vec<String>,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub summary: RunSummary,
    pub verdict: Verdict,
    pub left_only_paths: Vec<String>,
    pub right_only_paths: Vec<String>,
    pub paths: Vec<PathOutcome>,
}

impl RunReport {
    /// Outcomes that carry a file report, in path order.
    pub fn file_reports(&self) -> impl Iterator<Item = &FileReport> {
        self.paths.iter().filter_map(|p| p.report.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verdict_from_summary() {
        let mut summary = RunSummary::default();
        assert_eq!(Verdict::from_summary(&summary), Verdict::Clean);

        summary.right_only_paths = 1;
        assert_eq!(Verdict::from_summary(&summary), Verdict::Dirty);

        summary.right_only_paths = 0;
        summary.files_with_differences = 2;
        assert_eq!(Verdict::from_summary(&summary), Verdict::Dirty);

        summary.files_with_differences = 0;
        summary.files_unreadable = 1;
        assert_eq!(Verdict::from_summary(&summary), Verdict::Dirty);
    }

    #[test]
    fn warnings_do_not_make_a_run_dirty() {
        let summary = RunSummary {
            extraction_failures: 3,
            rejected_entries: 5,
            ..RunSummary::default()
        };
        assert!(Verdict::from_summary(&summary).is_clean());
    }

    #[test]
    fn collection_from_json() {
        let c = RecordCollection::from_json(vec![json!({"name": "Alice"}), json!(42)]);
        assert_eq!(c.len(), 2);
        assert_eq!(c.entries[1], FieldValue::Int(42));
        assert!(RecordCollection::empty().is_empty());
    }

    #[test]
    fn file_report_json_omits_empty_facts() {
        let report = FileReport {
            path: "a/dashboard.js".into(),
            count_mismatch: None,
            left_only: vec!["Bob".into()],
            right_only: vec![],
            left_duplicates: vec![],
            right_duplicates: vec![],
            entity_diffs: vec![],
        };
        let v = serde_json::to_value(&report).unwrap();
        assert!(v.get("count_mismatch").is_none());
        assert!(v.get("left_duplicates").is_none());
        assert_eq!(v["left_only"], json!(["Bob"]));
    }
}
