//! Graph builder: discovers YANG files, scans them, and assembles the
//! dependency graph.
//!
//! Duplicate definitions of a module name are resolved last-write-wins in
//! merge order. Merge order is fixed: every RFC repository first, then every
//! draft repository, each batch sorted by file path. A draft definition
//! therefore replaces an RFC definition of the same name, and within a batch
//! the lexically later path wins.

use ignore::WalkBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::engine::DependencyGraph;
use super::types::{ModuleNode, Provenance, ScannedModule};
use crate::error::{Result, ScanWarning, YangDepsError};
use crate::parser::{scan_files, ScanReport};

/// Collects scan results and turns them into a [`DependencyGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
    modules: BTreeMap<String, ScannedModule>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one scanned module. A later module with the same name
    /// replaces the earlier one.
    pub fn add(&mut self, module: ScannedModule) {
        let path = module.path.clone();
        if let Some(previous) = self.modules.insert(module.name.clone(), module) {
            warn!(
                module = %previous.name,
                replaced = %previous.path.display(),
                by = %path.display(),
                "Duplicate module definition, keeping the later one"
            );
        }
    }

    pub fn extend(&mut self, modules: impl IntoIterator<Item = ScannedModule>) {
        for module in modules {
            self.add(module);
        }
    }

    /// Assemble the graph. Nodes are inserted in lexical name order; every
    /// dependency target without a definition becomes a stub.
    pub fn build(self) -> DependencyGraph {
        let mut names: BTreeSet<&str> = BTreeSet::new();
        for module in self.modules.values() {
            names.insert(module.name.as_str());
            names.extend(module.dependencies.iter().map(|d| d.name.as_str()));
        }

        let mut graph = DependencyGraph::new();
        let mut stubs = 0usize;
        for name in names {
            match self.modules.get(name) {
                Some(module) => {
                    graph.add_module(module.to_node());
                }
                None => {
                    debug!(module = %name, "Referenced but not defined, adding stub");
                    graph.add_module(ModuleNode::stub(name));
                    stubs += 1;
                }
            }
        }

        for module in self.modules.values() {
            let Ok(from) = graph.find_node(&module.name) else {
                continue;
            };
            for dep in &module.dependencies {
                let Ok(to) = graph.find_node(&dep.name) else {
                    continue;
                };
                if !graph.add_dependency(from, to, dep.relation) {
                    warn!(
                        module = %module.name,
                        path = %module.path.display(),
                        "Module declares a dependency on itself, dropping it"
                    );
                }
            }
        }

        info!(
            modules = graph.len(),
            stubs,
            edges = graph.edge_count(),
            "Built dependency graph"
        );
        graph
    }
}

/// Where to look for modules.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub rfc_repos: Vec<PathBuf>,
    pub draft_repos: Vec<PathBuf>,
    /// Descend into subdirectories.
    pub recurse: bool,
}

/// Find `*.yang` files under `dirs`, sorted by path.
///
/// Hidden entries are skipped and symlinks are followed. Ignore files
/// (`.gitignore`, `.ignore`) are not consulted, so every module in a
/// repository is seen. Without `recurse` only the top level of each
/// directory is read.
pub fn discover_yang_files(dirs: &[PathBuf], recurse: bool) -> Vec<PathBuf> {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();

    for dir in dirs {
        let walker = WalkBuilder::new(dir)
            .hidden(true)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(true)
            .max_depth(if recurse { None } else { Some(1) })
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) && is_yang(entry.path()) {
                        files.insert(entry.into_path());
                    }
                }
                Err(e) => warn!(dir = %dir.display(), "Skipping unreadable entry: {}", e),
            }
        }
    }

    files.into_iter().collect()
}

fn is_yang(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "yang")
}

/// Discover, scan and build in one go.
///
/// Missing repository directories are a configuration error. Per-file
/// problems are returned alongside the graph.
pub fn build_graph(options: &ScanOptions) -> Result<(DependencyGraph, Vec<ScanWarning>)> {
    for dir in options.rfc_repos.iter().chain(&options.draft_repos) {
        if !dir.is_dir() {
            return Err(YangDepsError::config(format!(
                "repository directory not found: {}",
                dir.display()
            )));
        }
    }

    let mut report = ScanReport::default();
    let mut stats = ScanStats::default();
    for (dirs, provenance) in [
        (&options.rfc_repos, Provenance::Rfc),
        (&options.draft_repos, Provenance::Draft),
    ] {
        let files = discover_yang_files(dirs, options.recurse);
        match provenance {
            Provenance::Rfc => stats.rfc_files = files.len(),
            Provenance::Draft => stats.draft_files = files.len(),
        }
        report.merge(scan_files(&files, provenance));
    }
    stats.scanned = report.modules.len();
    stats.skipped = report.warnings.len();
    info!("{}", stats);

    let mut builder = GraphBuilder::new();
    builder.extend(report.modules);
    Ok((builder.build(), report.warnings))
}

/// Counts from one discovery and scan pass.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    pub rfc_files: usize,
    pub draft_files: usize,
    pub scanned: usize,
    pub skipped: usize,
}

impl fmt::Display for ScanStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found {} YANG files (RFC: {}, draft: {}), scanned {}, skipped {}",
            self.rfc_files + self.draft_files,
            self.rfc_files,
            self.draft_files,
            self.scanned,
            self.skipped
        )
    }
}
