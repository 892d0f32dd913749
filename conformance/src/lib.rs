//! lexowl conformance suite.
//!
//! Checks the artifacts a `lexowl-build` run writes before they are handed
//! to a reasoner or a query engine.
//!
//! # Conformance Scope
//!
//! | Artifact | Standard |
//! |----------|----------|
//! | `<name>.ttl` | Turtle 1.1 (parsed with sophia), expected prefixes and ontology header |
//! | `<name>.registry.json` | OWL structural references, taxonomy roots, context-class domains |
//! | `<name>.registry.json` | Compliance lattice partition over every boolean assignment |
//! | `<name>.report.json` | Run report consistency with the registry |
//!
//! # Entry Point
//!
//! ```no_run
//! use lexowl_conformance::{run_all, ArtifactPaths};
//! use std::path::PathBuf;
//!
//! let paths = ArtifactPaths::new(PathBuf::from("out"), "highway_code");
//! let report = run_all(&paths).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use lexowl_ontology::Registry;

pub mod report;
pub mod tests;
pub mod validators;

pub use report::{Artifact, Check, ConformanceReport, Severity, Summary, TestResult};

/// Locations of the artifacts written by one build.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Destination directory of the build.
    pub dest: PathBuf,
    /// Base file name shared by the artifacts.
    pub name: String,
}

impl ArtifactPaths {
    /// Creates paths for `<dest>/<name>.*`.
    pub fn new(dest: PathBuf, name: impl Into<String>) -> Self {
        Self {
            dest,
            name: name.into(),
        }
    }

    /// The Turtle document.
    pub fn turtle(&self) -> PathBuf {
        self.dest.join(format!("{}.ttl", self.name))
    }

    /// The registry snapshot.
    pub fn registry(&self) -> PathBuf {
        self.dest.join(format!("{}.registry.json", self.name))
    }

    /// The run report.
    pub fn report(&self) -> PathBuf {
        self.dest.join(format!("{}.report.json", self.name))
    }
}

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Turtle 1.1 syntax and document structure
/// 2. OWL structural references on the registry
/// 3. Compliance lattice partition
/// 4. Run report consistency
///
/// A missing artifact is reported as a failure, not an error.
///
/// # Errors
///
/// Returns an error only if a file exists but cannot be read.
pub fn run_all(paths: &ArtifactPaths) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    // 1. Turtle 1.1
    match read_artifact(&paths.turtle())? {
        Some(text) => report.extend(validators::turtle::validate(&text)),
        None => report.push(missing(Check::TurtleSyntax, &paths.turtle())),
    }

    // 2-3. Registry checks
    let registry = match read_artifact(&paths.registry())? {
        Some(json) => match Registry::from_json(&json) {
            Ok(registry) => Some(registry),
            Err(e) => {
                report.push(TestResult::fail(
                    Check::RegistrySnapshot,
                    format!("Registry snapshot does not load: {e}"),
                ));
                None
            }
        },
        None => {
            report.push(missing(Check::RegistrySnapshot, &paths.registry()));
            None
        }
    };
    if let Some(registry) = &registry {
        report.extend(validators::owl::validate(registry));
        report.extend(validators::lattice::validate(registry));
    }

    // 4. Run report
    match read_artifact(&paths.report())? {
        Some(json) => report.extend(validators::run::validate(&json, registry.as_ref())),
        None => report.push(missing(Check::RunConsistency, &paths.report())),
    }

    tracing::info!(
        checks = report.results.len(),
        failures = report.failure_count(),
        warnings = report.warning_count(),
        "conformance finished"
    );
    Ok(report)
}

fn read_artifact(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    std::fs::read_to_string(path)
        .map(Some)
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn missing(check: Check, path: &Path) -> TestResult {
    TestResult::fail(check, format!("{} not found", path.display()))
}
