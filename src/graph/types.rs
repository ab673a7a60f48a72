//! Core types for the module dependency graph.
//!
//! Defines module kinds, dependency relations, node origins and the
//! per-file scan result consumed by the builder.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Whether a schema unit is a top-level module or a submodule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Module,
    Submodule,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleKind::Module => write!(f, "module"),
            ModuleKind::Submodule => write!(f, "submodule"),
        }
    }
}

/// How one module depends on another.
///
/// Ordered by strength: when both relations are declared between the same
/// pair, the edge keeps `Include`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// `import` statement.
    Import,
    /// `include` statement (submodule inclusion).
    Include,
}

impl Relation {
    /// The stronger of two relations.
    #[must_use]
    pub fn strongest(self, other: Relation) -> Relation {
        self.max(other)
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Import => write!(f, "import"),
            Relation::Include => write!(f, "include"),
        }
    }
}

/// Which repository batch a locally defined module was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Published RFC model.
    Rfc,
    /// Work-in-progress draft model.
    Draft,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Rfc => write!(f, "rfc"),
            Provenance::Draft => write!(f, "draft"),
        }
    }
}

/// Where a node came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum Origin {
    /// A scanned source file declares this module.
    DefinedLocally {
        provenance: Provenance,
        /// Latest `revision` statement, if any.
        revision: Option<String>,
        path: PathBuf,
    },
    /// Only seen as the target of an import or include.
    ReferencedOnly,
}

impl Origin {
    pub fn is_local(&self) -> bool {
        matches!(self, Origin::DefinedLocally { .. })
    }

    pub fn provenance(&self) -> Option<Provenance> {
        match self {
            Origin::DefinedLocally { provenance, .. } => Some(*provenance),
            Origin::ReferencedOnly => None,
        }
    }
}

/// Data stored in a graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Unique module name.
    pub name: String,
    pub kind: ModuleKind,
    #[serde(flatten)]
    pub origin: Origin,
}

impl ModuleNode {
    /// A stub for a name that is referenced but never defined.
    pub fn stub(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ModuleKind::Module,
            origin: Origin::ReferencedOnly,
        }
    }

    pub fn is_stub(&self) -> bool {
        !self.origin.is_local()
    }
}

/// One declared dependency inside a module file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyRef {
    pub name: String,
    pub relation: Relation,
}

/// Everything the scanner pulls out of one module file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedModule {
    pub name: String,
    pub kind: ModuleKind,
    /// Latest revision found (header `@rev` or `revision` statements).
    pub revision: Option<String>,
    /// Distinct dependencies, in order of first declaration.
    pub dependencies: Vec<DependencyRef>,
    /// Set once the text has been tied to a file on disk.
    pub path: PathBuf,
    pub provenance: Provenance,
}

impl ScannedModule {
    /// The node this scan result defines.
    pub fn to_node(&self) -> ModuleNode {
        ModuleNode {
            name: self.name.clone(),
            kind: self.kind,
            origin: Origin::DefinedLocally {
                provenance: self.provenance,
                revision: self.revision.clone(),
                path: self.path.clone(),
            },
        }
    }
}
