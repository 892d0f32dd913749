//! `lexowl-conformance` — Validates the artifacts of a `lexowl-build` run.
//!
//! Runs the conformance suite across:
//! - `<name>.ttl` (Turtle 1.1 syntax, prefixes, unique subjects)
//! - `<name>.registry.json` (OWL structural references, lattice partition)
//! - `<name>.report.json` (consistency with the registry)
//!
//! **Usage:**
//! ```text
//! lexowl-conformance [--dest <dir>] [--name <name>] [--out <report.json>]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use lexowl_conformance::{run_all, ArtifactPaths};
use tracing_subscriber::EnvFilter;

/// Run the lexowl conformance suite.
#[derive(Parser)]
#[command(
    name = "lexowl-conformance",
    about = "Validate lexowl build artifacts"
)]
struct Args {
    /// Directory the artifacts were written to.
    #[arg(long, default_value = "out")]
    dest: PathBuf,

    /// Base file name of the artifacts.
    #[arg(long, default_value = "highway_code")]
    name: String,

    /// Also write the report as JSON to this path.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let paths = ArtifactPaths::new(args.dest.clone(), args.name.clone());

    let report = run_all(&paths)?;

    // Print results
    println!("lexowl Conformance Report");
    println!("=========================");
    println!();

    for result in &report.results {
        println!(
            "[{}] {} — {}",
            result.severity.label(),
            result.check,
            result.message
        );
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let summary = report.summary();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        summary.passed, summary.warnings, summary.failures
    );

    if let Some(out) = &args.out {
        let json = report
            .to_json()
            .context("Failed to serialize conformance report")?;
        fs::write(out, json).with_context(|| format!("Failed to write {}", out.display()))?;
        println!("  Written: {}", out.display());
    }

    if summary.failures > 0 {
        eprintln!(
            "Conformance FAILED: {} check(s) did not pass.",
            summary.failures
        );
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
