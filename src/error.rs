//! Error types for yangdeps.
//!
//! Two layers:
//!
//! - **`YangDepsError`**: failures that stop the current operation (bad
//!   configuration, unknown module, I/O on an output file).
//! - **`ScanWarning`**: per-file problems found while scanning a corpus. These
//!   are collected and logged; the scan carries on with the remaining files.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for yangdeps operations.
pub type Result<T> = std::result::Result<T, YangDepsError>;

/// Top-level error type.
#[derive(Debug, Error)]
pub enum YangDepsError {
    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file could not be parsed
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// Missing or invalid configuration; the run aborts before any output
    #[error("configuration error: {0}")]
    Config(String),

    /// A single-module query named a module that is not in the graph
    #[error("module not found: {0}")]
    ModuleNotFound(String),

    /// The plotter failed for one module
    #[error("plot failed for '{module}': {message}")]
    Plot { module: String, message: String },
}

impl YangDepsError {
    /// Process exit status for this error: 2 for usage/configuration
    /// problems, 1 for everything else.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Toml(_) => 2,
            _ => 1,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Problem encountered while scanning one source file.
///
/// Collected during scanning but never fatal; the file is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    /// File that produced the warning
    pub path: PathBuf,
    /// Category of the problem
    pub kind: ScanWarningKind,
    /// Human-readable detail
    pub message: String,
}

impl ScanWarning {
    #[must_use]
    pub fn new(path: PathBuf, kind: ScanWarningKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path.display(), self.message, self.kind)
    }
}

impl std::error::Error for ScanWarning {}

/// Categorization of scan warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanWarningKind {
    // === Input problems ===
    /// No `module` or `submodule` declaration in the file
    NotAModule,

    /// A declaration header is unterminated or repeated
    Malformed,

    /// File content is not valid UTF-8
    EncodingError,

    // === Environment problems ===
    /// Could not read the file from disk
    IoError,
}

impl fmt::Display for ScanWarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAModule => write!(f, "not a module"),
            Self::Malformed => write!(f, "malformed header"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl ScanWarningKind {
    /// Returns `true` if the file itself is at fault.
    #[must_use]
    pub fn is_input_problem(&self) -> bool {
        matches!(
            self,
            Self::NotAModule | Self::Malformed | Self::EncodingError
        )
    }
}

/// Why a text buffer did not yield a module.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("no module or submodule declaration found")]
    NotAModule,

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

impl ScanError {
    #[must_use]
    pub fn kind(&self) -> ScanWarningKind {
        match self {
            Self::NotAModule => ScanWarningKind::NotAModule,
            Self::Malformed { .. } => ScanWarningKind::Malformed,
        }
    }
}
