//! Exclusion filters for reports and exports.
//!
//! Filters only ever touch what gets printed or written. Traversals run on
//! the full graph, so excluding a module never changes another module's
//! dependency or impact sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Exact-name and substring exclusion rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Names dropped on equality.
    pub exact: BTreeSet<String>,
    /// Names dropped when they contain any of these.
    pub partial: Vec<String>,
}

impl FilterSpec {
    /// Empty partial patterns are discarded; they would match every name.
    pub fn new(
        exact: impl IntoIterator<Item = String>,
        partial: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            exact: exact.into_iter().collect(),
            partial: partial.into_iter().filter(|p| !p.is_empty()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.partial.is_empty()
    }

    pub fn excludes(&self, name: &str) -> bool {
        self.exact.contains(name) || self.partial.iter().any(|p| name.contains(p.as_str()))
    }

    pub fn keeps(&self, name: &str) -> bool {
        !self.excludes(name)
    }

    /// Keep the names that pass, preserving input order.
    pub fn apply<I, S>(&self, names: I) -> Vec<S>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter(|name| self.keeps(name.as_ref()))
            .collect()
    }
}
