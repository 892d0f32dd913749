//! `lexowl-build` — Compiles a JSON array of clause records into an OWL
//! compliance-lattice fragment and writes the artifacts to the destination
//! directory.
//!
//! **Outputs:**
//! - `<dest>/<name>.ttl` — Turtle 1.1, the symbols minted by this run
//! - `<dest>/<name>.registry.json` — registry snapshot (seed for later runs)
//! - `<dest>/<name>.report.json` — per-clause diagnostics and summaries
//!
//! **Usage:**
//! ```text
//! lexowl-build --input <clauses.json> [--dest <dir>] [--name <name>]
//!              [--seed <prior.registry.json>] [--config <config.toml>]
//! ```
//!
//! Exits non-zero if any clause was rejected.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use lexowl_compiler::{
    parse_records, ClauseRecord, CompileError, Compiler, CompilerConfig, Severity,
};
use lexowl_ontology::Registry;
use tracing_subscriber::EnvFilter;

/// Build a compliance-lattice ontology from clause records.
#[derive(Parser)]
#[command(
    name = "lexowl-build",
    about = "Compile clause records into an OWL compliance-lattice fragment"
)]
struct Args {
    /// JSON array of clause records.
    #[arg(long)]
    input: PathBuf,

    /// Output directory for generated artifacts.
    #[arg(long, default_value = "out")]
    dest: PathBuf,

    /// Base file name of the artifacts.
    #[arg(long, default_value = "highway_code")]
    name: String,

    /// Registry snapshot of a prior run; its symbols are reused, not re-emitted.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Compiler configuration (TOML). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::default().with_env_overrides(),
    };
    let records = read_records(&args.input)?;
    let mut registry = match &args.seed {
        Some(path) => read_seed(path)?,
        None => Registry::new(),
    };
    let seeded = registry.len();

    println!(
        "lexowl v{}: {} clause records from {} (seed: {} symbols)",
        env!("CARGO_PKG_VERSION"),
        records.len(),
        args.input.display(),
        seeded
    );

    let compilation = Compiler::new(config).compile_parsed(&mut registry, &records);
    let report = &compilation.report;

    fs::create_dir_all(&args.dest).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.dest.display()
        )
    })?;

    // Turtle
    let ttl_path = args.dest.join(format!("{}.ttl", args.name));
    fs::write(&ttl_path, &compilation.turtle)
        .with_context(|| format!("Failed to write {}", ttl_path.display()))?;
    println!("  Written: {}", ttl_path.display());

    // Registry snapshot
    let registry_path = args.dest.join(format!("{}.registry.json", args.name));
    let snapshot = registry
        .to_json()
        .context("Failed to serialize registry snapshot")?;
    fs::write(&registry_path, snapshot)
        .with_context(|| format!("Failed to write {}", registry_path.display()))?;
    println!("  Written: {}", registry_path.display());

    // Run report
    let report_path = args.dest.join(format!("{}.report.json", args.name));
    let report_json = report.to_json().context("Failed to serialize run report")?;
    fs::write(&report_path, report_json)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    println!("  Written: {}", report_path.display());

    for diagnostic in &report.diagnostics {
        let status = match diagnostic.severity {
            Severity::Warning => "WARN",
            Severity::Error => "FAIL",
        };
        println!(
            "[{}] clause {} — {}",
            status, diagnostic.clause_index, diagnostic.message
        );
    }

    println!();
    println!(
        "Summary: {} of {} clauses compiled, {} symbols minted, {} warnings",
        report.clauses.len(),
        report.clauses_total,
        registry.len() - seeded,
        report.warning_count()
    );

    if !report.all_succeeded() {
        eprintln!(
            "Build FAILED: {} clause(s) were rejected.",
            report.error_count()
        );
        process::exit(1);
    }

    println!("Build complete.");
    Ok(())
}

/// Records that do not have the clause shape are kept as per-clause errors.
fn read_records(path: &Path) -> Result<Vec<Result<ClauseRecord, CompileError>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_records(&text).with_context(|| format!("{} is not a JSON array", path.display()))
}

fn read_seed(path: &Path) -> Result<Registry> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Registry::from_json(&text)
        .with_context(|| format!("Failed to load registry snapshot {}", path.display()))
}
