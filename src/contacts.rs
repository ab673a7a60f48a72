//! Module contact lookup.
//!
//! The table comes from a flat text file with one `module:address` entry per
//! line. The first `:` separates the two halves and both are trimmed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Result, YangDepsError};

/// Module name -> contact address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactTable {
    entries: BTreeMap<String, String>,
}

impl ContactTable {
    /// Load from disk. A missing or unreadable file is a configuration
    /// error since callers only load the table when they need it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            YangDepsError::config(format!(
                "cannot read contact table {}: {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::parse(&text);
        debug!(path = %path.display(), entries = table.len(), "Loaded contact table");
        Ok(table)
    }

    /// Parse table text. Blank lines are skipped; lines without a `:` or
    /// with an empty half are logged and skipped; a repeated module keeps
    /// its last address.
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((name, address)) = line.split_once(':') else {
                warn!(line = idx + 1, "Contact entry has no ':' separator, skipping");
                continue;
            };
            let (name, address) = (name.trim(), address.trim());
            if name.is_empty() || address.is_empty() {
                warn!(line = idx + 1, "Contact entry has an empty field, skipping");
                continue;
            }
            if let Some(previous) = entries.insert(name.to_string(), address.to_string()) {
                warn!(module = %name, previous = %previous, "Duplicate contact entry, keeping the later one");
            }
        }
        Self { entries }
    }

    /// Contact for `name`, if one is on file.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
