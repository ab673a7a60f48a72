//! Module scanning: turns YANG source files into declarations.
//!
//! Scanning is per file and never fails the whole run. Files that cannot be
//! read, decoded or recognised come back as [`ScanWarning`]s next to the
//! modules that did scan.

pub mod yang;

pub use yang::{scan_module, ModuleDeclaration};

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{ScanWarning, ScanWarningKind};
use crate::graph::types::{Provenance, ScannedModule};

impl ModuleDeclaration {
    /// Tie this declaration to the file it was read from.
    pub fn located(self, path: PathBuf, provenance: Provenance) -> ScannedModule {
        ScannedModule {
            name: self.name,
            kind: self.kind,
            revision: self.revision,
            dependencies: self.dependencies,
            path,
            provenance,
        }
    }
}

/// Output of scanning a batch of files.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Successfully scanned modules, in the order the paths were given.
    pub modules: Vec<ScannedModule>,
    pub warnings: Vec<ScanWarning>,
}

impl ScanReport {
    /// Append another batch, keeping batch order.
    pub fn merge(&mut self, other: ScanReport) {
        self.modules.extend(other.modules);
        self.warnings.extend(other.warnings);
    }
}

/// Read and scan a single file.
pub fn scan_file(path: &Path, provenance: Provenance) -> Result<ScannedModule, ScanWarning> {
    let bytes = fs::read(path).map_err(|e| {
        ScanWarning::new(path.to_path_buf(), ScanWarningKind::IoError, e.to_string())
    })?;
    let source = String::from_utf8(bytes).map_err(|e| {
        ScanWarning::new(
            path.to_path_buf(),
            ScanWarningKind::EncodingError,
            e.to_string(),
        )
    })?;
    let decl = scan_module(&source)
        .map_err(|e| ScanWarning::new(path.to_path_buf(), e.kind(), e.to_string()))?;

    if decl.revision.is_none() {
        warn!(path = %path.display(), module = %decl.name, "Module has no revision statement");
    }
    debug!(
        path = %path.display(),
        module = %decl.name,
        dependencies = decl.dependencies.len(),
        "Scanned module"
    );

    Ok(decl.located(path.to_path_buf(), provenance))
}

/// Scan files in parallel.
///
/// Results come back in the order of `paths`, not completion order, so
/// that later definitions of a name deterministically replace earlier ones
/// in the builder.
pub fn scan_files(paths: &[PathBuf], provenance: Provenance) -> ScanReport {
    let results: Vec<Result<ScannedModule, ScanWarning>> = paths
        .par_iter()
        .map(|path| scan_file(path, provenance))
        .collect();

    let mut report = ScanReport::default();
    for result in results {
        match result {
            Ok(module) => report.modules.push(module),
            Err(warning) => {
                warn!(path = %warning.path.display(), kind = %warning.kind, "Skipping file: {}", warning.message);
                report.warnings.push(warning);
            }
        }
    }
    report
}
