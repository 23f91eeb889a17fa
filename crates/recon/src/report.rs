use crate::model::{
    FileReport, PathOutcome, PathStatus, RunMeta, RunReport, RunSummary, Side, Verdict, Warning, WarningKind,
};
use crate::paths::PathSets;
use crate::records::RecordComparison;

/// Build a file report for one common path, or `None` when both sides agree.
pub fn file_report(path: &str, comparison: &RecordComparison) -> Option<FileReport> {
    if !comparison.has_differences() {
        return None;
    }
    Some(FileReport {
        path: path.to_string(),
        count_mismatch: comparison.count_mismatch(),
        left_only: comparison.left_only.clone(),
        right_only: comparison.right_only.clone(),
        left_duplicates: comparison.left_duplicates.clone(),
        right_duplicates: comparison.right_duplicates.clone(),
        entity_diffs: comparison.entity_diffs.clone(),
    })
}

/// Accumulates per-path outcomes into a [`RunReport`].
///
/// Paths may be added in any order; [`ReportBuilder::finish`] sorts them so
/// the report depends only on its inputs.
pub struct ReportBuilder {
    summary: RunSummary,
    left_only_paths: Vec<String>,
    right_only_paths: Vec<String>,
    outcomes: Vec<PathOutcome>,
}

impl ReportBuilder {
    pub fn new(paths: &PathSets) -> Self {
        let summary = RunSummary {
            total_paths: paths.total(),
            common_paths: paths.common.len(),
            left_only_paths: paths.left_only.len(),
            right_only_paths: paths.right_only.len(),
            ..RunSummary::default()
        };
        Self {
            summary,
            left_only_paths: paths.left_only.iter().cloned().collect(),
            right_only_paths: paths.right_only.iter().cloned().collect(),
            outcomes: Vec::with_capacity(paths.common.len()),
        }
    }

    /// Record the comparison for one common path. `load_warnings` carries
    /// anything raised while producing the two collections.
    pub fn add_path(&mut self, path: &str, comparison: &RecordComparison, load_warnings: Vec<Warning>) {
        let mut warnings = load_warnings;
        warnings.extend(comparison.warnings.iter().cloned());

        for w in &warnings {
            match w.kind {
                WarningKind::ExtractionFailed => self.summary.extraction_failures += 1,
                WarningKind::RejectedEntry => self.summary.rejected_entries += 1,
                WarningKind::DuplicateName => {}
            }
        }

        let failed = |side: Side| {
            warnings
                .iter()
                .any(|w| w.side == side && w.kind == WarningKind::ExtractionFailed)
        };
        let unreadable = failed(Side::Left) && failed(Side::Right);

        let report = file_report(path, comparison);
        let status = if unreadable {
            self.summary.files_unreadable += 1;
            PathStatus::Unreadable
        } else if report.is_some() {
            self.summary.files_with_differences += 1;
            PathStatus::Different
        } else {
            self.summary.files_matching += 1;
            PathStatus::Matching
        };

        self.outcomes.push(PathOutcome {
            path: path.to_string(),
            status,
            warnings,
            report,
        });
    }

    pub fn finish(mut self, meta: RunMeta) -> RunReport {
        self.outcomes.sort_by(|a, b| a.path.cmp(&b.path));
        let verdict = Verdict::from_summary(&self.summary);
        RunReport {
            meta,
            summary: self.summary,
            verdict,
            left_only_paths: self.left_only_paths,
            right_only_paths: self.right_only_paths,
            paths: self.outcomes,
        }
    }
}
