//! Module dependency graph.
//!
//! Provides the graph data model, the traversal engine, and corpus
//! discovery/building.

pub mod builder;
pub mod engine;
pub mod types;

pub use builder::{build_graph, discover_yang_files, GraphBuilder, ScanOptions, ScanStats};
pub use engine::{DependencyEdge, DependencyGraph, DependencyTree, GraphStats};
pub use types::{
    DependencyRef, ModuleKind, ModuleNode, Origin, Provenance, Relation, ScannedModule,
};
