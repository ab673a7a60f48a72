//! Graph plotting.
//!
//! Layout and drawing belong to an external renderer; a plotter only hands
//! it a graph. The shipped plotter writes Graphviz DOT files.

use petgraph::dot::{Config, Dot};
use petgraph::visit::EdgeRef;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{Result, YangDepsError};
use crate::graph::{DependencyGraph, Provenance, Relation};
use crate::write::write_atomic;

/// Receives a finished graph (or subgraph) and renders it somewhere.
pub trait GraphPlotter {
    /// Render `graph` under the plot name `name`. Returns where it went.
    fn plot(&self, graph: &DependencyGraph, name: &str) -> Result<PathBuf>;
}

/// Writes `<out_dir>/<name>.dot`.
#[derive(Debug, Clone)]
pub struct DotPlotter {
    out_dir: PathBuf,
}

impl DotPlotter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

/// DOT text for a graph. RFC modules are red boxes, drafts green
/// ellipses and stubs orange triangles; include edges are dashed.
pub fn to_dot(graph: &DependencyGraph) -> String {
    let dot = Dot::with_attr_getters(
        graph.inner_graph(),
        &[Config::NodeNoLabel, Config::EdgeNoLabel],
        &|_, edge_ref| match edge_ref.weight() {
            Relation::Import => "label=\"import\"".to_string(),
            Relation::Include => "label=\"include\" style=dashed".to_string(),
        },
        &|_, (_idx, node)| match node.origin.provenance() {
            Some(Provenance::Rfc) => format!("label=\"{}\" shape=box color=red", node.name),
            Some(Provenance::Draft) => {
                format!("label=\"{}\" shape=ellipse color=green", node.name)
            }
            None => format!("label=\"{}\" shape=triangle color=orange", node.name),
        },
    );

    format!("{:?}", dot)
}

impl GraphPlotter for DotPlotter {
    fn plot(&self, graph: &DependencyGraph, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.out_dir).map_err(|e| YangDepsError::Plot {
            module: name.to_string(),
            message: format!("cannot create {}: {}", self.out_dir.display(), e),
        })?;
        let path = self.out_dir.join(format!("{name}.dot"));
        write_atomic(&path, to_dot(graph).as_bytes()).map_err(|e| YangDepsError::Plot {
            module: name.to_string(),
            message: e.to_string(),
        })?;
        info!(plot = %name, modules = graph.len(), path = %path.display(), "Wrote plot");
        Ok(path)
    }
}
