//! yangdeps CLI - dependency analysis for YANG module corpora.
//!
//! Usage:
//!   yangdeps --rfc-repos DIR tree [MODULE]          # Dependency trees
//!   yangdeps impact [MODULE] [--json -o FILE]       # Impacting / impacted sets
//!   yangdeps export [MODULE] -o FILE                # JSON hierarchy export
//!   yangdeps contacts MODULE --contacts FILE        # Contacts for a subgraph
//!   yangdeps plot [MODULE...]                       # DOT plots
//!   yangdeps stats                                  # Graph statistics

use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use yangdeps::cli::{run, Cli};
use yangdeps::YangDepsError;

fn execute(cli: Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    run(cli, out)?;
    out.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries reports
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match execute(cli, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  caused by: {cause}");
            }
            let code = e
                .downcast_ref::<YangDepsError>()
                .map_or(1, YangDepsError::exit_code);
            ExitCode::from(code)
        }
    }
}
