//! # yangdeps
//!
//! Dependency graph analysis for YANG module corpora.
//!
//! yangdeps scans directories of YANG modules, builds a graph of their
//! `import` and `include` relations, and answers structural questions over
//! it: what a module depends on, what depends on it, and which subgraph
//! surrounds it.
//!
//! ## Key Features
//!
//! - **Header scanning**: only declaration, import, include and revision
//!   headers are read, so any body syntax is tolerated
//! - **Cycle-safe**: every traversal terminates on cyclic corpora
//! - **Deterministic**: reports and exports are byte-identical across runs
//! - **Provenance-aware**: RFC and draft repositories are tracked separately
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use yangdeps::{build_graph, ScanOptions};
//!
//! let options = ScanOptions {
//!     rfc_repos: vec![PathBuf::from("standard/ietf/RFC")],
//!     ..ScanOptions::default()
//! };
//! let (graph, _warnings) = build_graph(&options)?;
//!
//! let upstream = graph.impacting_modules("ietf-ip")?;
//! let downstream = graph.impacted_modules("ietf-interfaces")?;
//! # Ok::<(), yangdeps::YangDepsError>(())
//! ```

pub mod cli;
pub mod config;
pub mod contacts;
pub mod error;
pub mod export;
pub mod filter;
pub mod graph;
pub mod parser;
pub mod query;
pub mod write;

// Re-exports for convenience
pub use error::{Result, ScanError, ScanWarning, ScanWarningKind, YangDepsError};

// Graph re-exports
pub use graph::{
    build_graph, discover_yang_files, DependencyGraph, DependencyTree, GraphBuilder, GraphStats,
    ModuleKind, ModuleNode, Origin, Provenance, Relation, ScanOptions,
};
pub use parser::{scan_file, scan_files, scan_module, ModuleDeclaration, ScanReport};

// Reporting
pub use config::YangDepsConfig;
pub use contacts::ContactTable;
pub use export::{to_hierarchy, to_node_link, DotPlotter, GraphPlotter, HierarchyDocument};
pub use filter::FilterSpec;
pub use query::{contacts_for, impact_report, impact_report_for, ImpactReport};
