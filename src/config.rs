//! Run configuration.
//!
//! Resolution order (highest priority first):
//! 1. Command-line flags (applied via `apply_overrides`)
//! 2. Config file (`yangdeps.toml` in the working directory, or `--config`)
//! 3. Compiled defaults

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, YangDepsError};
use crate::filter::FilterSpec;
use crate::graph::ScanOptions;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "yangdeps.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct YangDepsConfig {
    /// Directories holding published RFC modules.
    pub rfc_repos: Vec<PathBuf>,
    /// Directories holding draft modules.
    pub draft_repos: Vec<PathBuf>,
    /// Descend into subdirectories of each repository.
    pub recurse: bool,
    /// `module:address` contact table.
    pub contacts: Option<PathBuf>,
    /// Module names to leave out of reports.
    pub exclude: Vec<String>,
    /// Substrings; modules containing any are left out of reports.
    pub exclude_partial: Vec<String>,
    /// Where plot files go.
    pub plot_dir: PathBuf,
}

impl Default for YangDepsConfig {
    fn default() -> Self {
        Self {
            rfc_repos: Vec::new(),
            draft_repos: Vec::new(),
            recurse: false,
            contacts: None,
            exclude: Vec::new(),
            exclude_partial: Vec::new(),
            plot_dir: PathBuf::from("."),
        }
    }
}

/// Values given on the command line. Empty lists and `None` leave the
/// file's value alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub rfc_repos: Vec<PathBuf>,
    pub draft_repos: Vec<PathBuf>,
    pub recurse: bool,
    pub contacts: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub exclude_partial: Vec<String>,
}

impl YangDepsConfig {
    /// Load the config file, then apply overrides.
    ///
    /// With `explicit` set, the file must exist. Without it, a missing
    /// `yangdeps.toml` just means defaults. A file that does not parse is
    /// always an error.
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            YangDepsError::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if !overrides.rfc_repos.is_empty() {
            self.rfc_repos = overrides.rfc_repos.clone();
        }
        if !overrides.draft_repos.is_empty() {
            self.draft_repos = overrides.draft_repos.clone();
        }
        if overrides.recurse {
            self.recurse = true;
        }
        if overrides.contacts.is_some() {
            self.contacts = overrides.contacts.clone();
        }
        if !overrides.exclude.is_empty() {
            self.exclude = overrides.exclude.clone();
        }
        if !overrides.exclude_partial.is_empty() {
            self.exclude_partial = overrides.exclude_partial.clone();
        }
    }

    /// Scan inputs. With no repository configured at all, the working
    /// directory is scanned as an RFC repository.
    pub fn scan_options(&self) -> ScanOptions {
        let rfc_repos = if self.rfc_repos.is_empty() && self.draft_repos.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            self.rfc_repos.clone()
        };
        ScanOptions {
            rfc_repos,
            draft_repos: self.draft_repos.clone(),
            recurse: self.recurse,
        }
    }

    pub fn filter(&self) -> FilterSpec {
        FilterSpec::new(self.exclude.iter().cloned(), self.exclude_partial.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = YangDepsConfig::from_toml("").unwrap();
        assert_eq!(config, YangDepsConfig::default());
        assert_eq!(config.scan_options().rfc_repos, vec![PathBuf::from(".")]);
        assert!(config.filter().is_empty());
    }

    #[test]
    fn test_parse_full_file() {
        let config = YangDepsConfig::from_toml(
            r#"
rfc_repos = ["standard/ietf/RFC"]
draft_repos = ["experimental/ietf-extracted-YANG-modules"]
recurse = true
contacts = "contacts.txt"
exclude = ["ietf-yang-types"]
exclude_partial = ["example"]
plot_dir = "plots"
"#,
        )
        .unwrap();
        assert!(config.recurse);
        assert_eq!(config.contacts, Some(PathBuf::from("contacts.txt")));
        assert!(config.filter().excludes("example-module"));
        let options = config.scan_options();
        assert_eq!(options.rfc_repos, vec![PathBuf::from("standard/ietf/RFC")]);
        assert_eq!(options.draft_repos.len(), 1);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let err = YangDepsConfig::from_toml("recurse = \"yes\"").unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = YangDepsConfig::from_toml("unknown_key = 1").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = YangDepsConfig::from_toml(
            "rfc_repos = [\"a\"]\nexclude = [\"x\"]\ncontacts = \"file.txt\"\n",
        )
        .unwrap();
        config.apply_overrides(&ConfigOverrides {
            rfc_repos: vec![PathBuf::from("b")],
            recurse: true,
            ..ConfigOverrides::default()
        });
        assert_eq!(config.rfc_repos, vec![PathBuf::from("b")]);
        assert_eq!(config.exclude, vec!["x".to_string()]);
        assert_eq!(config.contacts, Some(PathBuf::from("file.txt")));
        assert!(config.recurse);
    }

    #[test]
    fn test_explicit_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = YangDepsConfig::load(
            Some(&dir.path().join("nope.toml")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, YangDepsError::Config(_)));
    }

    #[test]
    fn test_drafts_only_does_not_add_cwd() {
        let config = YangDepsConfig {
            draft_repos: vec![PathBuf::from("drafts")],
            ..YangDepsConfig::default()
        };
        assert!(config.scan_options().rfc_repos.is_empty());
    }
}
