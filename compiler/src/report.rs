//! Run report types: per-clause diagnostics and outcome summaries.

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, ErrorKind};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported but the clause still compiled.
    Warning,
    /// The clause was rejected.
    Error,
}

/// One diagnostic raised while compiling a clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Zero-based position of the clause in the input.
    pub clause_index: usize,
    /// Category.
    pub kind: ErrorKind,
    /// Severity.
    pub severity: Severity,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates an error diagnostic from a clause-fatal error.
    pub fn error(clause_index: usize, error: &CompileError) -> Self {
        Self {
            clause_index,
            kind: error.kind(),
            severity: Severity::Error,
            message: error.to_string(),
        }
    }

    /// Creates a warning diagnostic.
    pub fn warning(clause_index: usize, error: &CompileError) -> Self {
        Self {
            clause_index,
            kind: error.kind(),
            severity: Severity::Warning,
            message: error.to_string(),
        }
    }

    /// Returns true if this diagnostic rejected its clause.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// What a successfully compiled clause resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseSummary {
    /// Zero-based position of the clause in the input.
    pub clause_index: usize,
    /// Scenario class.
    pub scenario: String,
    /// Rule-qualified class.
    pub rule_class: String,
    /// Conclusion predicates.
    pub predicates: Vec<String>,
    /// Default, Mitigated, and Violating class names.
    pub lattice: [String; 3],
    /// Effective modality.
    pub modality: String,
    /// Modality provenance (`explicit` or `inferred`).
    pub provenance: String,
    /// Number of symbols the clause added to the registry.
    pub minted: usize,
}

/// Aggregated report for one compilation run.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CompileReport {
    /// Number of clause records in the input.
    pub clauses_total: usize,
    /// Clauses that compiled, in input order.
    pub clauses: Vec<ClauseSummary>,
    /// Diagnostics, in input order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Returns the count of rejected clauses.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Returns the count of warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.error_count()
    }

    /// Returns true if every clause compiled.
    pub fn all_succeeded(&self) -> bool {
        self.error_count() == 0
    }

    /// Serializes the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
