use crate::config::CompareConfig;
use crate::model::{RecordCollection, RunMeta, RunReport, Side, Warning, WarningKind};
use crate::paths::reconcile_paths;
use crate::records::reconcile_records;
use crate::report::ReportBuilder;

/// Supplies the record collection behind one side of a relative path.
///
/// The engine never reads files itself; the CLI implements this on top of its
/// artifact indexes and extractor.
pub trait CollectionSource {
    fn load(&self, side: Side, path: &str) -> Result<RecordCollection, String>;
}

impl<F> CollectionSource for F
where
    F: Fn(Side, &str) -> Result<RecordCollection, String>,
{
    fn load(&self, side: Side, path: &str) -> Result<RecordCollection, String> {
        self(side, path)
    }
}

/// Relative paths found in each tree, plus the roots they were found under.
pub struct RunInput {
    pub left_root: String,
    pub right_root: String,
    pub left_paths: Vec<String>,
    pub right_paths: Vec<String>,
}

/// Reconcile both trees. Returns the full report; never fails; extraction
/// problems degrade the affected side to an empty collection.
pub fn run(config: &CompareConfig, input: &RunInput, source: &dyn CollectionSource) -> RunReport {
    let paths = reconcile_paths(
        input.left_paths.iter().cloned(),
        input.right_paths.iter().cloned(),
    );
    log::info!(
        "{} common path(s), {} left-only, {} right-only",
        paths.common.len(),
        paths.left_only.len(),
        paths.right_only.len()
    );

    let mut builder = ReportBuilder::new(&paths);

    for path in &paths.common {
        let mut load_warnings = Vec::new();
        let left = load_side(source, Side::Left, path, &mut load_warnings);
        let right = load_side(source, Side::Right, path, &mut load_warnings);

        log::debug!("{path}: {} left entries, {} right entries", left.len(), right.len());
        let comparison = reconcile_records(&left, &right, config);
        builder.add_path(path, &comparison, load_warnings);
    }

    builder.finish(RunMeta {
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        left_root: input.left_root.clone(),
        right_root: input.right_root.clone(),
        key_field: config.key_field.clone(),
        fields: config.fields.clone(),
        tolerance: config.tolerance,
    })
}

fn load_side(
    source: &dyn CollectionSource,
    side: Side,
    path: &str,
    warnings: &mut Vec<Warning>,
) -> RecordCollection {
    match source.load(side, path) {
        Ok(collection) => collection,
        Err(msg) => {
            log::warn!("{} {path}: {msg}; comparing as empty", side.as_str());
            warnings.push(Warning {
                side,
                kind: WarningKind::ExtractionFailed,
                message: msg,
            });
            RecordCollection::empty()
        }
    }
}
