use std::collections::{BTreeMap, BTreeSet};

use crate::config::{CompareConfig, DuplicatePolicy};
use crate::model::{CountMismatch, EntityDiff, FieldDifference, RecordCollection, Side, Warning, WarningKind};
use crate::value::{values_equal, FieldValue};

/// Outcome of comparing the two collections behind one relative path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordComparison {
    /// Raw entry counts, malformed entries included.
    pub left_count: usize,
    pub right_count: usize,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
    /// Sorted by entity name; only entities with at least one difference.
    pub entity_diffs: Vec<EntityDiff>,
    /// Names excluded under [`DuplicatePolicy::Reject`].
    pub left_duplicates: Vec<String>,
    pub right_duplicates: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl RecordComparison {
    pub fn count_mismatch(&self) -> Option<CountMismatch> {
        (self.left_count != self.right_count).then_some(CountMismatch {
            left: self.left_count,
            right: self.right_count,
        })
    }

    /// True when any reportable fact is present. Warnings alone don't count.
    pub fn has_differences(&self) -> bool {
        self.left_count != self.right_count
            || !self.left_only.is_empty()
            || !self.right_only.is_empty()
            || !self.entity_diffs.is_empty()
            || !self.left_duplicates.is_empty()
            || !self.right_duplicates.is_empty()
    }
}

/// Compare two collections for the same relative path.
///
/// Entities are keyed by `config.key_field`. Malformed entries are rejected one
/// at a time and surface as warnings. Under the `reject` duplicate policy a
/// repeated name is withheld from both sides and listed as a duplicate instead
/// of showing up as one-sided.
pub fn reconcile_records(
    left: &RecordCollection,
    right: &RecordCollection,
    config: &CompareConfig,
) -> RecordComparison {
    let mut left_side = index_side(Side::Left, left, config);
    let mut right_side = index_side(Side::Right, right, config);

    for name in left_side.duplicates.iter().chain(&right_side.duplicates) {
        left_side.records.remove(name);
        right_side.records.remove(name);
    }

    let left_keys: BTreeSet<&String> = left_side.records.keys().collect();
    let right_keys: BTreeSet<&String> = right_side.records.keys().collect();

    let left_only = left_keys
        .difference(&right_keys)
        .map(|s| s.to_string())
        .collect();
    let right_only = right_keys
        .difference(&left_keys)
        .map(|s| s.to_string())
        .collect();

    let mut entity_diffs = Vec::new();
    for name in left_keys.intersection(&right_keys) {
        let l = left_side.records[*name];
        let r = right_side.records[*name];
        let differences = compare_record(l, r, &config.fields, config.tolerance);
        if !differences.is_empty() {
            entity_diffs.push(EntityDiff {
                name: name.to_string(),
                differences,
            });
        }
    }

    let mut warnings = left_side.warnings;
    warnings.extend(right_side.warnings);

    RecordComparison {
        left_count: left.len(),
        right_count: right.len(),
        left_only,
        right_only,
        entity_diffs,
        left_duplicates: left_side.duplicates,
        right_duplicates: right_side.duplicates,
        warnings,
    }
}

/// Field-by-field comparison in the configured field order.
pub fn compare_record(
    left: &FieldValue,
    right: &FieldValue,
    fields: &[String],
    tolerance: f64,
) -> Vec<FieldDifference> {
    fields
        .iter()
        .filter_map(|field| {
            let l = left.field(field);
            let r = right.field(field);
            if values_equal(l, r, tolerance) {
                None
            } else {
                Some(FieldDifference {
                    field: field.clone(),
                    left: l.clone(),
                    right: r.clone(),
                })
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Indexing
// ---------------------------------------------------------------------------

struct IndexedSide<'a> {
    records: BTreeMap<String, &'a FieldValue>,
    duplicates: Vec<String>,
    warnings: Vec<Warning>,
}

fn index_side<'a>(side: Side, collection: &'a RecordCollection, config: &CompareConfig) -> IndexedSide<'a> {
    let mut records: BTreeMap<String, &FieldValue> = BTreeMap::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut warnings = Vec::new();

    for (position, entry) in collection.entries.iter().enumerate() {
        let name = match entry_key(entry, &config.key_field) {
            Ok(name) => name,
            Err(reason) => {
                log::warn!("{} entry {position} rejected: {reason}", side.as_str());
                warnings.push(Warning {
                    side,
                    kind: WarningKind::RejectedEntry,
                    message: format!("entry {position}: {reason}"),
                });
                continue;
            }
        };

        *counts.entry(name.to_string()).or_insert(0) += 1;
        match config.on_duplicate {
            DuplicatePolicy::FirstWins => {
                records.entry(name.to_string()).or_insert(entry);
            }
            DuplicatePolicy::LastWins | DuplicatePolicy::Reject => {
                records.insert(name.to_string(), entry);
            }
        }
    }

    let mut duplicates = Vec::new();
    for (name, count) in counts.into_iter().filter(|(_, count)| *count > 1) {
        match config.on_duplicate {
            DuplicatePolicy::Reject => {
                log::warn!("{} name {name:?} appears {count} times; rejected", side.as_str());
                duplicates.push(name);
            }
            policy => {
                let kept = if policy == DuplicatePolicy::FirstWins { "first" } else { "last" };
                log::warn!("{} name {name:?} appears {count} times; kept {kept}", side.as_str());
                warnings.push(Warning {
                    side,
                    kind: WarningKind::DuplicateName,
                    message: format!("{name:?} appears {count} times; kept the {kept} record"),
                });
            }
        }
    }

    IndexedSide {
        records,
        duplicates,
        warnings,
    }
}

fn entry_key<'a>(entry: &'a FieldValue, key_field: &str) -> Result<&'a str, String> {
    if !matches!(entry, FieldValue::Object(_)) {
        return Err(format!("expected an object, found {}", entry.kind()));
    }
    match entry.field(key_field) {
        FieldValue::Str(name) => Ok(name),
        FieldValue::Null => Err(format!("missing key field '{key_field}'")),
        other => Err(format!("key field '{key_field}' is {}, expected string", other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collection(values: serde_json::Value) -> RecordCollection {
        match values {
            serde_json::Value::Array(items) => RecordCollection::from_json(items),
            _ => panic!("expected array"),
        }
    }

    fn config(fields: &[&str]) -> CompareConfig {
        CompareConfig {
            fields: fields.iter().map(|s| s.to_string()).collect(),
            ..CompareConfig::default()
        }
    }

    #[test]
    fn one_sided_names() {
        let left = collection(json!([{"name": "Alice", "goal": 1}, {"name": "Bob", "goal": 2}]));
        let right = collection(json!([{"name": "Alice", "goal": 1}, {"name": "Carol", "goal": 3}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));

        assert_eq!(cmp.left_only, vec!["Bob"]);
        assert_eq!(cmp.right_only, vec!["Carol"]);
        assert!(cmp.count_mismatch().is_none());
        assert!(cmp.entity_diffs.is_empty());
        assert!(cmp.has_differences());
    }

    #[test]
    fn float_within_tolerance() {
        let left = collection(json!([{"name": "Alice", "goal": 1.00}]));
        let right = collection(json!([{"name": "Alice", "goal": 1.009}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));
        assert!(cmp.entity_diffs.is_empty());
        assert!(!cmp.has_differences());
    }

    #[test]
    fn field_differences_in_field_order() {
        let left = collection(json!([
            {"name": "Zed", "goal": 1500.0, "source": "4.pdf - Page 1", "infection": "-"},
            {"name": "Amy", "goal": 1000.0, "source": "1.pdf", "infection": "-"},
        ]));
        let right = collection(json!([
            {"name": "Amy", "goal": 1000.0, "source": "1.pdf", "infection": "UTI"},
            {"name": "Zed", "goal": 1400.0, "source": "4.pdf - Page 2", "infection": "-"},
        ]));
        let cmp = reconcile_records(&left, &right, &config(&["goal", "source", "infection"]));

        assert_eq!(cmp.entity_diffs.len(), 2);
        assert_eq!(cmp.entity_diffs[0].name, "Amy");
        assert_eq!(cmp.entity_diffs[0].differences.len(), 1);
        assert_eq!(cmp.entity_diffs[0].differences[0].field, "infection");
        assert_eq!(cmp.entity_diffs[1].name, "Zed");
        let fields: Vec<_> = cmp.entity_diffs[1].differences.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["goal", "source"]);
        assert_eq!(cmp.entity_diffs[1].differences[0].left, FieldValue::Float(1500.0));
        assert_eq!(cmp.entity_diffs[1].differences[0].right, FieldValue::Float(1400.0));
    }

    #[test]
    fn absent_equals_null() {
        let left = collection(json!([{"name": "Alice"}]));
        let right = collection(json!([{"name": "Alice", "goal": null}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));
        assert!(cmp.entity_diffs.is_empty());
    }

    #[test]
    fn int_and_float_differ() {
        let left = collection(json!([{"name": "Alice", "goal": 1}]));
        let right = collection(json!([{"name": "Alice", "goal": 1.0}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));
        assert_eq!(cmp.entity_diffs.len(), 1);
    }

    #[test]
    fn count_mismatch_independent_of_keys() {
        let left = collection(json!([{"name": "A"}, {"name": "B"}, {"name": "B"}]));
        let right = collection(json!([{"name": "A"}, {"name": "B"}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));
        assert_eq!(cmp.count_mismatch(), Some(CountMismatch { left: 3, right: 2 }));
        assert!(cmp.left_only.is_empty());
        assert!(cmp.right_only.is_empty());
    }

    #[test]
    fn malformed_entries_are_rejected_individually() {
        let left = collection(json!([
            {"name": "Alice", "goal": 1},
            {"goal": 9},
            "not a record",
            {"name": 17},
            {"name": "Bob", "goal": 2},
        ]));
        let right = collection(json!([
            {"name": "Alice", "goal": 5},
            {"name": "Bob", "goal": 2},
        ]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));

        assert_eq!(cmp.warnings.len(), 3);
        assert!(cmp.warnings.iter().all(|w| w.kind == WarningKind::RejectedEntry && w.side == Side::Left));
        assert!(cmp.warnings[0].message.contains("entry 1"));
        assert!(cmp.warnings[1].message.contains("string"));
        assert!(cmp.warnings[2].message.contains("integer"));
        assert!(cmp.left_only.is_empty());
        assert_eq!(cmp.entity_diffs.len(), 1);
        assert_eq!(cmp.entity_diffs[0].name, "Alice");
    }

    #[test]
    fn duplicates_last_wins() {
        let left = collection(json!([{"name": "A", "goal": 1}, {"name": "A", "goal": 2}]));
        let right = collection(json!([{"name": "A", "goal": 2}, {"name": "X", "goal": 0}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));
        assert!(cmp.entity_diffs.is_empty());
        assert_eq!(cmp.warnings.len(), 1);
        assert_eq!(cmp.warnings[0].kind, WarningKind::DuplicateName);
        assert!(cmp.warnings[0].message.contains("last"));
    }

    #[test]
    fn duplicates_first_wins() {
        let left = collection(json!([{"name": "A", "goal": 1}, {"name": "A", "goal": 2}]));
        let right = collection(json!([{"name": "A", "goal": 1}, {"name": "X"}]));
        let mut cfg = config(&["goal"]);
        cfg.on_duplicate = DuplicatePolicy::FirstWins;
        let cmp = reconcile_records(&left, &right, &cfg);
        assert!(cmp.entity_diffs.is_empty());
        assert!(cmp.warnings[0].message.contains("first"));
    }

    #[test]
    fn duplicates_reject() {
        let left = collection(json!([
            {"name": "A", "goal": 1},
            {"name": "A", "goal": 2},
            {"name": "B", "goal": 1},
        ]));
        let right = collection(json!([
            {"name": "A", "goal": 7},
            {"name": "B", "goal": 1},
            {"name": "C", "goal": 1},
        ]));
        let mut cfg = config(&["goal"]);
        cfg.on_duplicate = DuplicatePolicy::Reject;
        let cmp = reconcile_records(&left, &right, &cfg);

        assert_eq!(cmp.left_duplicates, vec!["A"]);
        assert!(cmp.right_duplicates.is_empty());
        // A is withheld from both sides rather than reported as right-only
        assert!(cmp.left_only.is_empty());
        assert_eq!(cmp.right_only, vec!["C"]);
        assert!(cmp.entity_diffs.is_empty());
        assert!(cmp.has_differences());
    }

    #[test]
    fn empty_side_makes_everything_one_sided() {
        let left = RecordCollection::empty();
        let right = collection(json!([{"name": "B", "goal": 1}, {"name": "A", "goal": 1}]));
        let cmp = reconcile_records(&left, &right, &config(&["goal"]));
        assert!(cmp.left_only.is_empty());
        assert_eq!(cmp.right_only, vec!["A", "B"]);
        assert!(cmp.entity_diffs.is_empty());
        assert_eq!(cmp.count_mismatch(), Some(CountMismatch { left: 0, right: 2 }));
    }

    #[test]
    fn custom_key_field() {
        let left = collection(json!([{"id": "r1", "goal": 1}]));
        let right = collection(json!([{"id": "r1", "goal": 2}]));
        let mut cfg = config(&["goal"]);
        cfg.key_field = "id".into();
        let cmp = reconcile_records(&left, &right, &cfg);
        assert_eq!(cmp.entity_diffs[0].name, "r1");
    }
}
