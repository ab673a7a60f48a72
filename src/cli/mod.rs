//! Command-line surface for yangdeps.
//!
//! Commands:
//! - Trees: tree
//! - Impact: impact
//! - Export: export, plot
//! - Lookup: contacts, stats
//!
//! Every command validates its arguments and loads required files before
//! the corpus is scanned, so a usage or configuration problem never leaves
//! partial output behind.

pub mod report;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::{ConfigOverrides, YangDepsConfig};
use crate::contacts::ContactTable;
use crate::error::{Result, YangDepsError};
use crate::export::{render_json, to_hierarchy, to_node_link, write_json, DotPlotter, GraphPlotter};
use crate::graph::{build_graph, DependencyGraph};
use crate::query::{contacts_for, impact_report, impact_report_for};

#[derive(Parser, Debug)]
#[command(name = "yangdeps")]
#[command(version, about = "Dependency analysis for YANG module corpora", long_about = None)]
pub struct Cli {
    /// Directory of published RFC modules (repeatable)
    #[arg(long = "rfc-repos", value_name = "DIR", global = true)]
    pub rfc_repos: Vec<PathBuf>,

    /// Directory of draft modules (repeatable)
    #[arg(long = "draft-repos", value_name = "DIR", global = true)]
    pub draft_repos: Vec<PathBuf>,

    /// Scan repository directories recursively
    #[arg(short, long, global = true)]
    pub recurse: bool,

    /// Contact table file (`module:address` per line)
    #[arg(long, value_name = "FILE", global = true)]
    pub contacts: Option<PathBuf>,

    /// Leave a module out of reports (repeatable)
    #[arg(long = "exclude", value_name = "MODULE", global = true)]
    pub exclude: Vec<String>,

    /// Leave out modules whose name contains this text (repeatable)
    #[arg(long = "exclude-partial", value_name = "TEXT", global = true)]
    pub exclude_partial: Vec<String>,

    /// Config file (default: ./yangdeps.toml when present)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    // ─── Trees ──────────────────────────────────────────────────────
    /// Print dependency trees (one module, or every module)
    Tree {
        /// Module to show; all modules when omitted
        module: Option<String>,
    },

    // ─── Impact ─────────────────────────────────────────────────────
    /// Impacting (upstream) and impacted (downstream) module sets
    Impact {
        /// Module to analyse; all modules when omitted
        module: Option<String>,

        /// Write the report as JSON instead of printing text
        #[arg(long)]
        json: bool,

        /// Destination for --json
        #[arg(short, long, value_name = "FILE", requires = "json")]
        output: Option<PathBuf>,
    },

    // ─── Export ─────────────────────────────────────────────────────
    /// Write the dependency structure as JSON
    Export {
        /// Export only this module's subgraph
        module: Option<String>,

        /// Destination file (required)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document layout
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Tree)]
        format: ExportFormat,
    },

    /// Write graph plots (whole graph, or one per module)
    Plot {
        /// Modules to plot; the whole graph when omitted
        modules: Vec<String>,

        /// Directory for plot files (default: config `plot_dir`)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    // ─── Lookup ─────────────────────────────────────────────────────
    /// List contact addresses for a module's subgraph
    Contacts {
        /// Module whose subgraph is consulted
        module: String,
    },

    /// Show graph statistics
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Nested dependency hierarchy
    Tree,
    /// Flat nodes and links
    NodeLink,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            rfc_repos: self.rfc_repos.clone(),
            draft_repos: self.draft_repos.clone(),
            recurse: self.recurse,
            contacts: self.contacts.clone(),
            exclude: self.exclude.clone(),
            exclude_partial: self.exclude_partial.clone(),
        }
    }
}

fn require_output<'a>(output: &'a Option<PathBuf>, what: &str) -> Result<&'a Path> {
    output
        .as_deref()
        .ok_or_else(|| YangDepsError::config(format!("{what} requires --output <FILE>")))
}

/// Load the contact table when one is configured. When `required`, a
/// missing configuration is itself an error.
fn load_contacts(config: &YangDepsConfig, required: bool) -> Result<Option<ContactTable>> {
    match &config.contacts {
        Some(path) => ContactTable::load(path).map(Some),
        None if required => Err(YangDepsError::config(
            "this command requires a contact table (--contacts <FILE>)",
        )),
        None => Ok(None),
    }
}

fn plot_all(
    graph: &DependencyGraph,
    modules: &[String],
    plotter: &dyn GraphPlotter,
    out: &mut dyn Write,
) -> Result<()> {
    if modules.is_empty() {
        let path = plotter.plot(&graph.prune_standalone(), "modules")?;
        writeln!(out, "{}", path.display())?;
        return Ok(());
    }

    let mut failed = 0usize;
    for module in modules {
        let plotted = graph
            .subgraph(module)
            .and_then(|sub| plotter.plot(&sub, module));
        match plotted {
            Ok(path) => writeln!(out, "{}", path.display())?,
            Err(e) => {
                error!(module = %module, "Plot failed: {}", e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        info!(failed, requested = modules.len(), "Some plots were not written");
    }
    Ok(())
}

/// Run one command, writing reports to `out`.
pub fn run(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = YangDepsConfig::load(cli.config.as_deref(), &cli.overrides())?;
    let filter = config.filter();

    // Validate and load external inputs before any traversal.
    let contacts = match &cli.command {
        Commands::Impact { json: true, output, .. } => {
            require_output(output, "impact --json")?;
            None
        }
        Commands::Export { output, .. } => {
            require_output(output, "export")?;
            load_contacts(&config, false)?
        }
        Commands::Contacts { .. } => load_contacts(&config, true)?,
        _ => None,
    };

    let (graph, warnings) = build_graph(&config.scan_options())?;
    if !warnings.is_empty() {
        info!(skipped = warnings.len(), "Some files were skipped");
    }

    match cli.command {
        Commands::Tree { module } => match module {
            Some(name) => {
                let tree = graph.dependency_tree(&name)?;
                report::write_tree(out, &graph, &tree, &filter)?;
            }
            None => report::write_all_trees(out, &graph, &filter)?,
        },

        Commands::Impact {
            module,
            json,
            output,
        } => {
            let impact = match &module {
                Some(name) => impact_report_for(&graph, name, &filter)?,
                None => impact_report(&graph, &filter),
            };
            match (json, output) {
                (true, Some(path)) => {
                    write_json(&path, &impact)?;
                    info!(path = %path.display(), "Wrote impact report");
                }
                _ => report::write_impact(out, &graph, &impact)?,
            }
        }

        Commands::Export {
            module,
            output,
            format,
        } => {
            let path = require_output(&output, "export")?;
            let scoped = match &module {
                Some(name) => Some(graph.subgraph(name)?),
                None => None,
            };
            let source = scoped.as_ref().unwrap_or(&graph);
            match format {
                ExportFormat::Tree => {
                    let mut document = to_hierarchy(source, &filter, contacts.as_ref());
                    if let Some(name) = module {
                        document = document.with_focus(name);
                    }
                    write_json(path, &document)?;
                }
                ExportFormat::NodeLink => {
                    write_json(path, &to_node_link(source, &filter, contacts.as_ref()))?;
                }
            }
            info!(path = %path.display(), "Wrote export");
        }

        Commands::Plot { modules, out_dir } => {
            let plotter = DotPlotter::new(out_dir.unwrap_or_else(|| config.plot_dir.clone()));
            plot_all(&graph, &modules, &plotter, out)?;
        }

        Commands::Contacts { module } => {
            let table = contacts.unwrap_or_default();
            for address in contacts_for(&graph, &module, &filter, &table)? {
                writeln!(out, "{address}")?;
            }
        }

        Commands::Stats => {
            write!(out, "{}", render_json(&graph.stats())?)?;
        }
    }

    Ok(())
}
