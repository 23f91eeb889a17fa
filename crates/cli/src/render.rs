//! Report rendering: the human text report and the JSON report.
//!
//! Text output depends only on the report. No timestamps, no absolute
//! ordering from the filesystem; two runs over the same trees print the
//! same bytes.

use std::fmt::{self, Write};

use dashdiff_recon::model::{FileReport, PathOutcome, PathStatus, Warning};
use dashdiff_recon::RunReport;

const RULE: &str = "================================================================================";
const THIN_RULE: &str = "--------------------------------------------------------------------------------";

/// Render the text report.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_text(&mut out, report);
    out
}

/// Render the report as pretty JSON, with a trailing newline.
pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

fn write_text(out: &mut impl Write, report: &RunReport) -> fmt::Result {
    let summary = &report.summary;

    writeln!(out, "Comparing dashboard files:")?;
    writeln!(out, "  Left:  {}", report.meta.left_root)?;
    writeln!(out, "  Right: {}", report.meta.right_root)?;
    writeln!(out, "{RULE}")?;
    writeln!(out)?;

    writeln!(out, "File Summary:")?;
    writeln!(out, "  Total unique files: {}", summary.total_paths)?;
    writeln!(out, "  Common files: {}", summary.common_paths)?;
    writeln!(out, "  Only in left: {}", summary.left_only_paths)?;
    writeln!(out, "  Only in right: {}", summary.right_only_paths)?;
    writeln!(out)?;

    write_path_list(out, "Files only in left", &report.left_only_paths)?;
    write_path_list(out, "Files only in right", &report.right_only_paths)?;

    writeln!(out, "{RULE}")?;
    writeln!(out, "Comparing common files:")?;
    writeln!(out, "{RULE}")?;

    for outcome in &report.paths {
        writeln!(out)?;
        write_outcome(out, outcome)?;
    }

    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Summary:")?;
    writeln!(
        out,
        "  Files with differences: {} / {}",
        summary.files_with_differences, summary.common_paths
    )?;
    if summary.files_unreadable > 0 {
        writeln!(out, "  Unreadable files: {}", summary.files_unreadable)?;
    }
    if summary.extraction_failures > 0 {
        writeln!(out, "  Extraction failures: {}", summary.extraction_failures)?;
    }
    if summary.rejected_entries > 0 {
        writeln!(out, "  Rejected entries: {}", summary.rejected_entries)?;
    }
    if report.verdict.is_clean() {
        writeln!(out, "  All files match!")?;
    } else {
        writeln!(out, "  Differences found")?;
    }
    Ok(())
}

fn write_path_list(out: &mut impl Write, title: &str, paths: &[String]) -> fmt::Result {
    if paths.is_empty() {
        return Ok(());
    }
    writeln!(out, "{title}:")?;
    for path in paths {
        writeln!(out, "  - {path}")?;
    }
    writeln!(out)
}

fn write_outcome(out: &mut impl Write, outcome: &PathOutcome) -> fmt::Result {
    match (&outcome.status, &outcome.report) {
        (PathStatus::Different, Some(report)) => {
            writeln!(out, "[diff] {}", outcome.path)?;
            writeln!(out, "{THIN_RULE}")?;
            write_file_report(out, report)?;
        }
        (PathStatus::Unreadable, _) => {
            writeln!(out, "[unreadable] {} - Neither side could be read", outcome.path)?
        }
        _ => writeln!(out, "[ok] {} - No differences", outcome.path)?,
    }
    for warning in &outcome.warnings {
        write_warning(out, warning)?;
    }
    Ok(())
}

fn write_file_report(out: &mut impl Write, report: &FileReport) -> fmt::Result {
    if let Some(ref counts) = report.count_mismatch {
        writeln!(out, "  Different record counts: {} vs {}", counts.left, counts.right)?;
    }
    write_name_list(out, "Records only in left", &report.left_only)?;
    write_name_list(out, "Records only in right", &report.right_only)?;
    write_name_list(out, "Duplicate names rejected in left", &report.left_duplicates)?;
    write_name_list(out, "Duplicate names rejected in right", &report.right_duplicates)?;

    if !report.entity_diffs.is_empty() {
        writeln!(out, "  Data differences ({} records):", report.entity_diffs.len())?;
        for entity in &report.entity_diffs {
            writeln!(out, "    {}:", entity.name)?;
            for diff in &entity.differences {
                writeln!(out, "      {}: {} vs {}", diff.field, diff.left, diff.right)?;
            }
        }
    }
    Ok(())
}

fn write_name_list(out: &mut impl Write, title: &str, names: &[String]) -> fmt::Result {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(out, "  {title} ({}):", names.len())?;
    for name in names {
        writeln!(out, "    - {name}")?;
    }
    Ok(())
}

fn write_warning(out: &mut impl Write, warning: &Warning) -> fmt::Result {
    writeln!(
        out,
        "  warning ({}, {}): {}",
        warning.side.as_str(),
        warning.kind,
        warning.message
    )
}
