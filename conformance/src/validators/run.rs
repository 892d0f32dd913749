//! Run report validator.
//!
//! Validates `<name>.report.json` against the registry it was written with:
//! - The report parses and its clause counts add up
//! - Every compiled clause's scenario, rule class, and lattice classes exist
//! - Rejected clauses are surfaced as a warning

use lexowl_compiler::CompileReport;
use lexowl_ontology::Registry;

use crate::report::{Check, ConformanceReport, TestResult};

const CHECK: Check = Check::RunConsistency;

/// Validates a run report. Cross-references are checked only when the
/// registry loaded.
pub fn validate(json: &str, registry: Option<&Registry>) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let run: CompileReport = match serde_json::from_str(json) {
        Ok(run) => run,
        Err(e) => {
            report.push(TestResult::fail(
                CHECK,
                format!("Run report does not parse: {e}"),
            ));
            return report;
        }
    };

    if run.clauses.len() + run.error_count() == run.clauses_total {
        report.push(TestResult::pass(
            CHECK,
            format!(
                "{} of {} clauses compiled",
                run.clauses.len(),
                run.clauses_total
            ),
        ));
    } else {
        report.push(TestResult::fail(
            CHECK,
            format!(
                "{} compiled + {} rejected does not match {} clauses",
                run.clauses.len(),
                run.error_count(),
                run.clauses_total
            ),
        ));
    }

    if let Some(registry) = registry {
        let missing: Vec<String> = run
            .clauses
            .iter()
            .flat_map(|c| {
                std::iter::once(&c.scenario)
                    .chain(std::iter::once(&c.rule_class))
                    .chain(c.lattice.iter())
                    .filter(move |name| registry.class(name).is_none())
                    .map(move |name| format!("clause {}: {name} not in registry", c.clause_index))
            })
            .collect();
        if missing.is_empty() {
            report.push(TestResult::pass(
                CHECK,
                "Every reported class is in the registry",
            ));
        } else {
            report.push(TestResult::fail_with_details(
                CHECK,
                "Reported classes missing from the registry",
                missing,
            ));
        }
    }

    let rejected: Vec<String> = run
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| format!("clause {}: {}", d.clause_index, d.message))
        .collect();
    if !rejected.is_empty() {
        report.push(TestResult::warn_with_details(
            CHECK,
            format!("{} clauses were rejected by the compiler", rejected.len()),
            rejected,
        ));
    }

    report
}
