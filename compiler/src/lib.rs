//! Clause-to-ontology compiler for lexowl.
//!
//! Takes structured clause records (subject, conclusion, modality,
//! conditions) and mints the classes and properties that encode each rule's
//! compliance lattice into a shared [`Registry`].
//!
//! Each clause goes through the same pipeline:
//!
//! 1. [`normalizer`] rewrites the addressed party to `ego`, settles the
//!    modality, and parses conditions.
//! 2. [`resolver`] maps conditions to condition tags and the conclusion to
//!    boolean properties.
//! 3. [`context`] derives the subject, scenario, and rule-qualified classes.
//! 4. [`lattice`] builds the Default / Mitigated / Violating classes.
//!
//! All symbols of a clause are staged and committed together; a rejected
//! clause leaves the registry as it was.
//!
//! # Example
//!
//! ```
//! use lexowl_compiler::{ClauseRecord, Compiler, CompilerConfig};
//! use lexowl_ontology::Registry;
//!
//! let records: Vec<ClauseRecord> = serde_json::from_str(r#"[{
//!     "subject": "you",
//!     "conclusion": "move off",
//!     "deontic_modality": null,
//!     "conditions": ["there is a safe gap in the traffic"]
//! }]"#).unwrap();
//!
//! let compiler = Compiler::new(CompilerConfig::default());
//! let mut registry = Registry::new();
//! let out = compiler.compile(&mut registry, &records);
//! assert!(out.report.all_succeeded());
//! assert!(out.turtle.contains(":EgoAtSafeGapInTrafficExists_MoveOff_Violating"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod clause;
pub mod config;
pub mod context;
pub mod error;
pub mod lattice;
pub mod normalizer;
pub mod phrase;
pub mod report;
pub mod resolver;

pub use clause::{parse_records, ClauseRecord, NormalizedClause, StatedModality};
pub use config::CompilerConfig;
pub use error::{CompileError, ErrorKind};
pub use lattice::Lattice;
pub use report::{ClauseSummary, CompileReport, Diagnostic, Severity};

use lexowl_ontology::serializer::turtle::to_turtle;
use lexowl_ontology::{Collision, DeonticAnnotation, Mark, Registry};

/// Result of compiling one clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseOutcome {
    /// Scenario class.
    pub scenario: String,
    /// Conclusion predicates, in conclusion order.
    pub predicates: Vec<String>,
    /// The rule's lattice (carries the rule-qualified class name).
    pub lattice: Lattice,
    /// Effective modality.
    pub deontic: DeonticAnnotation,
    /// Number of symbols committed.
    pub minted: usize,
    /// Names that had to be suffixed.
    pub collisions: Vec<Collision>,
}

impl ClauseOutcome {
    /// Report summary for the clause at `clause_index`.
    #[must_use]
    pub fn summary(&self, clause_index: usize) -> ClauseSummary {
        ClauseSummary {
            clause_index,
            scenario: self.scenario.clone(),
            rule_class: self.lattice.rule_class.clone(),
            predicates: self.predicates.clone(),
            lattice: [
                self.lattice.default.clone(),
                self.lattice.mitigated.clone(),
                self.lattice.violating.clone(),
            ],
            modality: self.deontic.modality.as_str().to_string(),
            provenance: self.deontic.provenance.as_str().to_string(),
            minted: self.minted,
        }
    }
}

/// Output of a compilation run.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Turtle document of the symbols minted by this run.
    pub turtle: String,
    /// Per-clause diagnostics and summaries.
    pub report: CompileReport,
}

/// The clause compiler.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Creates a compiler with `config`.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compiles one clause and commits its symbols to `registry`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::MalformedClause`] or
    /// [`CompileError::UnencodableRule`] when the clause is rejected, and
    /// [`CompileError::Registry`] if the commit fails. The registry is
    /// unchanged in every error case.
    pub fn compile_clause(
        &self,
        registry: &mut Registry,
        record: &ClauseRecord,
    ) -> Result<ClauseOutcome, CompileError> {
        let clause = normalizer::normalize(record, &self.config)?;
        let unencodable = || CompileError::UnencodableRule {
            conclusion: clause.conclusion.clone(),
        };

        let mut scope = registry.stage();
        let roots = context::ensure_roots(&mut scope, &self.config);
        let tags = resolver::resolve_conditions(&mut scope, &clause, &roots);
        let subject = context::subject_class(&mut scope, &clause, &roots);
        let scenario = context::scenario_class(&mut scope, &clause, &subject, &tags);
        let predicates = resolver::resolve_conclusion(&mut scope, &clause, &scenario);
        if predicates.is_empty() {
            return Err(unencodable());
        }
        let rule = context::rule_id(&clause).ok_or_else(unencodable)?;
        let rule_class = context::rule_class(&mut scope, &clause, &scenario, &rule);
        let lattice = lattice::build(&mut scope, &rule_class, &predicates, &clause.conclusion)?;

        let delta = scope.into_delta();
        let minted = delta.symbols().len();
        let collisions = registry.commit(delta)?;

        Ok(ClauseOutcome {
            scenario,
            predicates,
            lattice,
            deontic: clause.deontic,
            minted,
            collisions,
        })
    }

    /// Compiles `records` in order. A rejected clause is reported and the
    /// run continues with the next one.
    pub fn compile_document(
        &self,
        registry: &mut Registry,
        records: &[ClauseRecord],
    ) -> CompileReport {
        self.compile_entries(registry, records.iter().map(Ok::<_, &CompileError>))
    }

    fn compile_entries<'a, I>(&self, registry: &mut Registry, entries: I) -> CompileReport
    where
        I: ExactSizeIterator<Item = Result<&'a ClauseRecord, &'a CompileError>>,
    {
        let mut report = CompileReport::new();
        report.clauses_total = entries.len();

        for (index, entry) in entries.enumerate() {
            let compiled = match entry {
                Ok(record) => self.compile_clause(registry, record),
                Err(rejected) => {
                    tracing::warn!(clause = index, error = %rejected, "clause record rejected");
                    report.push(Diagnostic::error(index, rejected));
                    continue;
                }
            };
            match compiled {
                Ok(outcome) => {
                    for collision in &outcome.collisions {
                        report.push(Diagnostic::warning(
                            index,
                            &CompileError::SymbolCollision {
                                requested: collision.requested.clone(),
                                assigned: collision.assigned.clone(),
                            },
                        ));
                    }
                    tracing::debug!(
                        clause = index,
                        rule_class = %outcome.lattice.rule_class,
                        minted = outcome.minted,
                        "clause compiled"
                    );
                    report.clauses.push(outcome.summary(index));
                }
                Err(e) => {
                    tracing::warn!(clause = index, error = %e, "clause rejected");
                    report.push(Diagnostic::error(index, &e));
                }
            }
        }

        tracing::info!(
            clauses = report.clauses_total,
            compiled = report.clauses.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "compilation finished"
        );
        report
    }

    /// Compiles `records` and serializes every symbol the run minted.
    ///
    /// Symbols already in `registry` (for example from a seed snapshot) are
    /// reused but not re-emitted.
    pub fn compile(&self, registry: &mut Registry, records: &[ClauseRecord]) -> Compilation {
        let mark = registry.mark();
        let report = self.compile_document(registry, records);
        self.finish(registry, mark, report)
    }

    /// Like [`Compiler::compile`], over the output of
    /// [`clause::parse_records`]. Records that failed to parse are reported
    /// as malformed at their index.
    pub fn compile_parsed(
        &self,
        registry: &mut Registry,
        entries: &[Result<ClauseRecord, CompileError>],
    ) -> Compilation {
        let mark = registry.mark();
        let report = self.compile_entries(registry, entries.iter().map(Result::as_ref));
        self.finish(registry, mark, report)
    }

    fn finish(&self, registry: &Registry, mark: Mark, report: CompileReport) -> Compilation {
        let turtle = to_turtle(&self.config.header(), registry.minted_since(mark));
        Compilation { turtle, report }
    }
}
