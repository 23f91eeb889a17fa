use std::collections::BTreeSet;

use serde::Serialize;

/// Relative paths classified across the two trees. Each set is sorted and
/// the three are pairwise disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathSets {
    pub common: BTreeSet<String>,
    pub left_only: BTreeSet<String>,
    pub right_only: BTreeSet<String>,
}

impl PathSets {
    /// Number of distinct paths across both trees.
    pub fn total(&self) -> usize {
        self.common.len() + self.left_only.len() + self.right_only.len()
    }
}

/// Split two collections of relative paths into common / left-only /
/// right-only. Paths are compared by exact string equality.
pub fn reconcile_paths<L, R>(left: L, right: R) -> PathSets
where
    L: IntoIterator,
    L::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
{
    let left: BTreeSet<String> = left.into_iter().map(Into::into).collect();
    let right: BTreeSet<String> = right.into_iter().map(Into::into).collect();

    PathSets {
        common: left.intersection(&right).cloned().collect(),
        left_only: left.difference(&right).cloned().collect(),
        right_only: right.difference(&left).cloned().collect(),
    }
}
