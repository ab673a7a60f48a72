//! Nested tree export with contact annotations.
//!
//! The graph is first projected onto the modules that pass the filter; the
//! forest is then built over that projection with the same expansion rule
//! as `DependencyGraph::dependency_tree`.

use serde::{Deserialize, Serialize};

use crate::contacts::ContactTable;
use crate::filter::FilterSpec;
use crate::graph::{DependencyGraph, DependencyTree};

/// One node of the exported hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub name: String,
    /// Omitted when no contact is on file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Set on leaves that repeat a module expanded elsewhere.
    #[serde(default, skip_serializing_if = "is_false")]
    pub reference: bool,
    pub children: Vec<HierarchyNode>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyDocument {
    /// Module whose subgraph was exported, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    pub roots: Vec<HierarchyNode>,
}

impl HierarchyDocument {
    pub fn with_focus(mut self, focus: impl Into<String>) -> Self {
        self.focus = Some(focus.into());
        self
    }
}

fn annotate(tree: DependencyTree, contacts: Option<&ContactTable>) -> HierarchyNode {
    let contact = contacts
        .and_then(|table| table.resolve(&tree.name))
        .map(String::from);
    HierarchyNode {
        contact,
        reference: tree.reference,
        children: tree
            .children
            .into_iter()
            .map(|child| annotate(child, contacts))
            .collect(),
        name: tree.name,
    }
}

/// Convert a graph or subgraph into a nested hierarchy.
pub fn to_hierarchy(
    graph: &DependencyGraph,
    filter: &FilterSpec,
    contacts: Option<&ContactTable>,
) -> HierarchyDocument {
    let projected;
    let visible = if filter.is_empty() {
        graph
    } else {
        projected = graph.retain_names(|name| filter.keeps(name));
        &projected
    };

    HierarchyDocument {
        focus: None,
        roots: visible
            .dependency_forest()
            .into_iter()
            .map(|tree| annotate(tree, contacts))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::render_json;
    use crate::graph::engine::tests::graph_of;
    use crate::graph::Relation;

    fn sample() -> DependencyGraph {
        graph_of(&[("A", "B", Relation::Import), ("B", "C", Relation::Include)])
    }

    #[test]
    fn test_contact_attached_only_where_known() {
        let table = ContactTable::parse("B:team-b@example.org\n");
        let sub = sample().subgraph("A").unwrap();
        let doc = to_hierarchy(&sub, &FilterSpec::default(), Some(&table)).with_focus("A");

        assert_eq!(doc.roots.len(), 1);
        let a = &doc.roots[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.contact, None);
        let b = &a.children[0];
        assert_eq!(b.contact.as_deref(), Some("team-b@example.org"));
        let c = &b.children[0];
        assert_eq!(c.name, "C");
        assert_eq!(c.contact, None);

        let text = render_json(&doc).unwrap();
        assert_eq!(text.matches("\"contact\"").count(), 1);
    }

    #[test]
    fn test_exact_json_layout() {
        let doc = to_hierarchy(&sample(), &FilterSpec::default(), None);
        let text = render_json(&doc).unwrap();
        let expected = r#"{
  "roots": [
    {
      "children": [
        {
          "children": [
            {
              "children": [],
              "name": "C"
            }
          ],
          "name": "B"
        }
      ],
      "name": "A"
    }
  ]
}
"#;
        assert_eq!(text, expected);
    }

    #[test]
    fn test_filtered_nodes_disappear() {
        let filter = FilterSpec::new(vec!["B".to_string()], vec![]);
        let doc = to_hierarchy(&sample(), &filter, None);
        let roots: Vec<_> = doc.roots.iter().map(|n| n.name.as_str()).collect();
        // without B, A and C are unconnected roots
        assert_eq!(roots, vec!["A", "C"]);
        assert!(doc.roots[0].children.is_empty());
    }

    #[test]
    fn test_cycle_export_marks_reference() {
        let graph = graph_of(&[
            ("A", "B", Relation::Import),
            ("B", "C", Relation::Import),
            ("C", "A", Relation::Import),
        ]);
        let doc = to_hierarchy(&graph, &FilterSpec::default(), None);
        assert_eq!(doc.roots.len(), 1);
        let text = render_json(&doc).unwrap();
        assert_eq!(text.matches("\"reference\": true").count(), 1);
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let table = ContactTable::parse("A:a@x\nC:c@x\n");
        let first = render_json(&to_hierarchy(&sample(), &FilterSpec::default(), Some(&table)));
        let second = render_json(&to_hierarchy(&sample(), &FilterSpec::default(), Some(&table)));
        assert_eq!(first.unwrap(), second.unwrap());
    }
}
