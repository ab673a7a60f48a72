//! Flat node-link export for force-directed viewers.
//!
//! Nodes are listed in lexical order; each link runs from the dependency
//! (`source`) to the dependent (`target`), both given as node positions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::contacts::ContactTable;
use crate::filter::FilterSpec;
use crate::graph::DependencyGraph;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLinkDocument {
    pub nodes: Vec<NodeLinkNode>,
    pub links: Vec<NodeLink>,
}

/// Build the node-link document. Excluded modules are dropped along with
/// every link touching them.
pub fn to_node_link(
    graph: &DependencyGraph,
    filter: &FilterSpec,
    contacts: Option<&ContactTable>,
) -> NodeLinkDocument {
    let nodes: Vec<NodeLinkNode> = graph
        .module_names()
        .filter(|name| filter.keeps(name))
        .map(|name| NodeLinkNode {
            name: name.to_string(),
            email: contacts
                .and_then(|table| table.resolve(name))
                .map(String::from),
        })
        .collect();

    let position: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.name.as_str(), i))
        .collect();

    let links = graph
        .edges()
        .into_iter()
        .filter_map(|edge| {
            let source = *position.get(edge.dependency.as_str())?;
            let target = *position.get(edge.dependent.as_str())?;
            Some(NodeLink {
                source,
                target,
                value: 1.0,
            })
        })
        .collect();

    NodeLinkDocument { nodes, links }
}
