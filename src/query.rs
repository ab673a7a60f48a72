//! Report-level queries built on the graph engine.
//!
//! These combine traversals with the exclusion filter and the contact
//! table. Traversal always runs on the unfiltered graph; the filter is
//! applied to the names that come out.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::contacts::ContactTable;
use crate::error::Result;
use crate::filter::FilterSpec;
use crate::graph::DependencyGraph;

/// Upstream and downstream sets per module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Module -> modules it depends on, transitively.
    pub impacting_modules: BTreeMap<String, Vec<String>>,
    /// Module -> modules depending on it, transitively. Only modules with
    /// at least one dependent appear.
    pub impacted_modules: BTreeMap<String, Vec<String>>,
}

impl ImpactReport {
    fn insert(&mut self, name: String, impacting: Vec<String>, impacted: Vec<String>) {
        if !impacted.is_empty() {
            self.impacted_modules.insert(name.clone(), impacted);
        }
        self.impacting_modules.insert(name, impacting);
    }
}

/// Impact sets for every module that passes the filter.
pub fn impact_report(graph: &DependencyGraph, filter: &FilterSpec) -> ImpactReport {
    let impacting = graph.all_impacting();
    let mut impacted = graph.all_impacted();

    let mut report = ImpactReport::default();
    for (name, deps) in impacting {
        if filter.excludes(&name) {
            continue;
        }
        let dependents = impacted.remove(&name).unwrap_or_default();
        report.insert(name, filter.apply(deps), filter.apply(dependents));
    }
    report
}

/// Impact sets for one module. The module itself is reported even when
/// the filter would exclude it, since it was asked for by name.
pub fn impact_report_for(
    graph: &DependencyGraph,
    name: &str,
    filter: &FilterSpec,
) -> Result<ImpactReport> {
    let impacting = graph.impacting_modules(name)?;
    let impacted = graph.impacted_modules(name)?;

    let mut report = ImpactReport::default();
    report.insert(name.to_string(), filter.apply(impacting), filter.apply(impacted));
    Ok(report)
}

/// Distinct contact addresses for the non-excluded members of
/// `subgraph(name)`, sorted.
pub fn contacts_for(
    graph: &DependencyGraph,
    name: &str,
    filter: &FilterSpec,
    contacts: &ContactTable,
) -> Result<Vec<String>> {
    let sub = graph.subgraph(name)?;
    let addresses: BTreeSet<&str> = sub
        .module_names()
        .filter(|member| filter.keeps(member))
        .filter_map(|member| contacts.resolve(member))
        .collect();
    Ok(addresses.into_iter().map(String::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::engine::tests::graph_of;
    use crate::graph::Relation;

    fn sample() -> DependencyGraph {
        graph_of(&[("A", "B", Relation::Import), ("B", "C", Relation::Include)])
    }

    #[test]
    fn test_whole_graph_report() {
        let report = impact_report(&sample(), &FilterSpec::default());
        assert_eq!(report.impacting_modules["A"], vec!["B", "C"]);
        assert!(report.impacting_modules["C"].is_empty());
        assert_eq!(report.impacted_modules["C"], vec!["A", "B"]);
        assert!(!report.impacted_modules.contains_key("A"));
    }

    #[test]
    fn test_report_applies_filter_to_names_only() {
        let filter = FilterSpec::new(vec!["B".to_string()], vec![]);
        let report = impact_report(&sample(), &filter);
        assert!(!report.impacting_modules.contains_key("B"));
        // C is still reached through the hidden B
        assert_eq!(report.impacting_modules["A"], vec!["C"]);
        assert_eq!(report.impacted_modules["C"], vec!["A"]);
    }

    #[test]
    fn test_single_module_report() {
        let report = impact_report_for(&sample(), "B", &FilterSpec::default()).unwrap();
        assert_eq!(report.impacting_modules.len(), 1);
        assert_eq!(report.impacting_modules["B"], vec!["C"]);
        assert_eq!(report.impacted_modules["B"], vec!["A"]);
        assert!(impact_report_for(&sample(), "nope", &FilterSpec::default()).is_err());
    }

    #[test]
    fn test_report_json_layout() {
        let report = impact_report_for(&sample(), "A", &FilterSpec::default()).unwrap();
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(
            json,
            r#"{"impacting_modules":{"A":["B","C"]},"impacted_modules":{}}"#
        );
    }

    #[test]
    fn test_contacts_for_subgraph() {
        let table = ContactTable::parse("B:team-b@example.org\nC:team-c@example.org\nZ:z@x\n");
        let addresses = contacts_for(&sample(), "A", &FilterSpec::default(), &table).unwrap();
        assert_eq!(addresses, vec!["team-b@example.org", "team-c@example.org"]);

        let filter = FilterSpec::new(vec![], vec!["C".to_string()]);
        let addresses = contacts_for(&sample(), "A", &filter, &table).unwrap();
        assert_eq!(addresses, vec!["team-b@example.org"]);
    }
}
