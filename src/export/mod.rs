//! Structured output: hierarchy trees, node-link documents and plots.
//!
//! JSON documents go through `serde_json::Value` before printing so object
//! keys come out sorted, then get a two-space indent and a trailing newline.
//! Identical graphs and filters always produce identical bytes.

pub mod dot;
pub mod hierarchy;
pub mod node_link;

pub use dot::{DotPlotter, GraphPlotter};
pub use hierarchy::{to_hierarchy, HierarchyDocument, HierarchyNode};
pub use node_link::{to_node_link, NodeLink, NodeLinkDocument, NodeLinkNode};

use serde::Serialize;
use std::path::Path;

use crate::error::Result;
use crate::write::write_atomic;

/// Render a document as sorted-key, indented JSON with a trailing newline.
pub fn render_json<T: Serialize>(document: &T) -> Result<String> {
    let value = serde_json::to_value(document)?;
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}

/// Render and atomically write a document.
pub fn write_json<T: Serialize>(path: &Path, document: &T) -> Result<()> {
    let text = render_json(document)?;
    write_atomic(path, text.as_bytes())
}
