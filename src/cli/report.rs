//! Plain-text reports.
//!
//! Module names carry a marker: ` *` for RFC modules, ` (?)` for modules
//! that are referenced but never defined, nothing for drafts. A tree leaf
//! that repeats a module expanded elsewhere ends in ` [ref]`.

use std::io::{self, Write};

use crate::filter::FilterSpec;
use crate::graph::{DependencyGraph, DependencyTree, Provenance};
use crate::query::ImpactReport;

fn marker(graph: &DependencyGraph, name: &str) -> &'static str {
    match graph.module(name).map(|node| node.origin.provenance()) {
        Some(Some(Provenance::Rfc)) => " *",
        Some(Some(Provenance::Draft)) => "",
        _ => " (?)",
    }
}

/// Children of `node`, one `  |` spacer above the first and another
/// between siblings only after a sibling whose own subtree was printed.
fn write_children(
    out: &mut dyn Write,
    graph: &DependencyGraph,
    node: &DependencyTree,
    preamble: &str,
) -> io::Result<()> {
    if node.children.is_empty() {
        return Ok(());
    }
    writeln!(out, "{preamble}  |")?;

    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let suffix = if child.reference { " [ref]" } else { "" };
        writeln!(
            out,
            "{preamble}  +--> {}{}{}",
            child.name,
            marker(graph, &child.name),
            suffix
        )?;
        if child.children.is_empty() {
            continue;
        }
        let indent = if last { "      " } else { "  |   " };
        write_children(out, graph, child, &format!("{preamble}{indent}"))?;
        if !last {
            writeln!(out, "{preamble}  |")?;
        }
    }
    Ok(())
}

/// One module's dependency tree with excluded modules pruned away.
pub fn write_tree(
    out: &mut dyn Write,
    graph: &DependencyGraph,
    tree: &DependencyTree,
    filter: &FilterSpec,
) -> io::Result<()> {
    let mut shown = tree.clone();
    shown.prune(&|name: &str| filter.keeps(name));
    writeln!(out, "{}{}:", shown.name, marker(graph, &shown.name))?;
    write_children(out, graph, &shown, "")
}

/// Trees for every locally defined, non-excluded module.
pub fn write_all_trees(
    out: &mut dyn Write,
    graph: &DependencyGraph,
    filter: &FilterSpec,
) -> io::Result<()> {
    writeln!(out, "=== Module Dependency Trees ===")?;
    for node in graph.modules() {
        if node.is_stub() || filter.excludes(&node.name) {
            continue;
        }
        writeln!(out)?;
        if let Ok(tree) = graph.dependency_tree(&node.name) {
            write_tree(out, graph, &tree, filter)?;
        }
    }
    Ok(())
}

/// Both halves of an impact report.
pub fn write_impact(
    out: &mut dyn Write,
    graph: &DependencyGraph,
    report: &ImpactReport,
) -> io::Result<()> {
    writeln!(out, "===Impacting Modules===")?;
    for (name, deps) in &report.impacting_modules {
        writeln!(out)?;
        writeln!(out, "{}{}:", name, marker(graph, name))?;
        for dep in deps {
            writeln!(out, "    {}{}", dep, marker(graph, dep))?;
        }
    }

    writeln!(out)?;
    writeln!(out, "===Impacted Modules===")?;
    for (name, dependents) in &report.impacted_modules {
        writeln!(out)?;
        writeln!(out, "{}{}:", name, marker(graph, name))?;
        for dependent in dependents {
            writeln!(out, "    {}{}", dependent, marker(graph, dependent))?;
        }
    }
    Ok(())
}
