//! Conformance report types: checks, severities, and the aggregated report
//! written next to the build artifacts.

use std::fmt;

use serde::Serialize;

/// A build artifact the suite inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    /// `<name>.ttl`.
    Turtle,
    /// `<name>.registry.json`.
    Registry,
    /// `<name>.report.json`.
    RunReport,
}

/// The checks of the suite, one per validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Check {
    /// Turtle 1.1 syntax, prefixes, and subject blocks.
    #[serde(rename = "turtle/syntax")]
    TurtleSyntax,
    /// The registry snapshot loads.
    #[serde(rename = "registry/snapshot")]
    RegistrySnapshot,
    /// OWL references, taxonomy roots, and property domains.
    #[serde(rename = "registry/owl")]
    OwlStructure,
    /// Default / Mitigated / Violating partition every assignment.
    #[serde(rename = "registry/lattice")]
    LatticePartition,
    /// The run report agrees with the registry.
    #[serde(rename = "run/consistency")]
    RunConsistency,
}

impl Check {
    /// Identifier printed in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Check::TurtleSyntax => "turtle/syntax",
            Check::RegistrySnapshot => "registry/snapshot",
            Check::OwlStructure => "registry/owl",
            Check::LatticePartition => "registry/lattice",
            Check::RunConsistency => "run/consistency",
        }
    }

    /// The artifact this check reads.
    #[must_use]
    pub fn artifact(self) -> Artifact {
        match self {
            Check::TurtleSyntax => Artifact::Turtle,
            Check::RegistrySnapshot | Check::OwlStructure | Check::LatticePartition => {
                Artifact::Registry
            }
            Check::RunConsistency => Artifact::RunReport,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Non-blocking: rejected clauses, an empty lattice set.
    Warning,
    /// Blocks conformance.
    Failure,
}

impl Severity {
    /// Status column of the printed report.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Pass => "PASS",
            Severity::Warning => "WARN",
            Severity::Failure => "FAIL",
        }
    }
}

/// A single check result.
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    /// The check that produced this result.
    pub check: Check,
    /// One-line outcome.
    pub message: String,
    /// Severity of the result.
    pub severity: Severity,
    /// Offending symbols or clauses, one per line.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl TestResult {
    /// Creates a passing result.
    pub fn pass(check: Check, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Pass, Vec::new())
    }

    /// Creates a failure result.
    pub fn fail(check: Check, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Failure, Vec::new())
    }

    /// Creates a failure result listing the offenders.
    pub fn fail_with_details(
        check: Check,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self::new(check, message, Severity::Failure, details)
    }

    /// Creates a warning result.
    pub fn warn(check: Check, message: impl Into<String>) -> Self {
        Self::new(check, message, Severity::Warning, Vec::new())
    }

    /// Creates a warning result listing the offenders.
    pub fn warn_with_details(
        check: Check,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self::new(check, message, Severity::Warning, details)
    }

    fn new(
        check: Check,
        message: impl Into<String>,
        severity: Severity,
        details: Vec<String>,
    ) -> Self {
        Self {
            check,
            message: message.into(),
            severity,
            details,
        }
    }

    /// Returns true if this result represents a failure.
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Passing checks.
    pub passed: usize,
    /// Warnings.
    pub warnings: usize,
    /// Failures.
    pub failures: usize,
}

/// Aggregated report over one build's artifacts.
#[derive(Debug, Default, Serialize)]
pub struct ConformanceReport {
    /// Results in the order the checks ran.
    pub results: Vec<TestResult>,
}

impl ConformanceReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result to this report.
    pub fn push(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Extends this report with results from another report.
    pub fn extend(&mut self, other: ConformanceReport) {
        self.results.extend(other.results);
    }

    /// Returns the count of failed checks.
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Returns the count of warnings.
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// Returns true if all checks passed (no failures).
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Failed results, in the order they were pushed.
    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Results whose check reads `artifact`.
    pub fn for_artifact(&self, artifact: Artifact) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(move |r| r.check.artifact() == artifact)
    }

    /// Counts per severity.
    pub fn summary(&self) -> Summary {
        let warnings = self.warning_count();
        let failures = self.failure_count();
        Summary {
            passed: self.results.len() - warnings - failures,
            warnings,
            failures,
        }
    }

    /// Pretty JSON document `{ "summary": ..., "results": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error; the report holds only strings and
    /// counters, so this does not fail in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        #[derive(Serialize)]
        struct Document<'a> {
            summary: Summary,
            results: &'a [TestResult],
        }
        serde_json::to_string_pretty(&Document {
            summary: self.summary(),
            results: &self.results,
        })
    }
}
