//! Compliance lattice validator.
//!
//! For every rule in the registry, checks that:
//! - Default, Mitigated, and Violating are each defined exactly once
//! - The three restrictions partition all boolean assignments to the
//!   conclusion predicates and the exceptional-circumstance flag
//! - Mitigated and Violating carry `owl:disjointWith` edges to the branches
//!   before them

use std::collections::BTreeMap;

use lexowl_compiler::lattice::check_partition;
use lexowl_ontology::{Branch, ClassDescriptor, ClassKey, Registry, RestrictionExpr};

use crate::report::{Check, ConformanceReport, TestResult};

const CHECK: Check = Check::LatticePartition;

/// Validates every compliance lattice in `registry`.
pub fn validate(registry: &Registry) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let mut lattices: BTreeMap<(&str, &[String]), Vec<(Branch, &ClassDescriptor)>> =
        BTreeMap::new();
    for class in registry.classes() {
        if let ClassKey::Lattice {
            rule,
            branch,
            predicates,
        } = &class.key
        {
            lattices
                .entry((rule.as_str(), predicates.as_slice()))
                .or_default()
                .push((*branch, class));
        }
    }

    if lattices.is_empty() {
        report.push(TestResult::warn(CHECK, "No compliance lattices found"));
        return report;
    }

    let mut violations: Vec<String> = Vec::new();
    let mut assignments = 0usize;
    for ((rule, _), members) in &lattices {
        match check_lattice(members) {
            Ok(checked) => assignments += checked,
            Err(problems) => {
                violations.extend(problems.into_iter().map(|p| format!("{rule}: {p}")));
            }
        }
    }

    if violations.is_empty() {
        report.push(TestResult::pass(
            CHECK,
            format!(
                "{} rule lattices partition their assignments ({assignments} checked)",
                lattices.len()
            ),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            CHECK,
            "Compliance lattices that do not partition",
            violations,
        ));
    }

    report
}

/// Checks one rule's lattice, returning the number of assignments evaluated.
fn check_lattice(members: &[(Branch, &ClassDescriptor)]) -> Result<usize, Vec<String>> {
    let mut problems: Vec<String> = Vec::new();
    let mut exprs: Vec<(Branch, &RestrictionExpr)> = Vec::new();
    let mut names: Vec<(Branch, &str)> = Vec::new();

    for branch in Branch::ALL {
        let found: Vec<&ClassDescriptor> = members
            .iter()
            .filter(|(b, _)| *b == branch)
            .map(|(_, c)| *c)
            .collect();
        match found.as_slice() {
            [class] => {
                names.push((branch, class.name.as_str()));
                match &class.equivalent_class {
                    Some(expr) => exprs.push((branch, expr)),
                    None => problems.push(format!("{} has no definition", class.name)),
                }
            }
            [] => problems.push(format!("no {} class", branch.as_str())),
            _ => problems.push(format!("{} {} classes", found.len(), branch.as_str())),
        }
    }

    for (i, (_, class)) in names.iter().enumerate() {
        let Some(descriptor) = members.iter().map(|(_, c)| *c).find(|c| c.name == *class) else {
            continue;
        };
        for (_, earlier) in &names[..i] {
            if !descriptor.disjoint_with.iter().any(|d| d == earlier) {
                problems.push(format!("{class} is not declared disjoint with {earlier}"));
            }
        }
    }

    if !problems.is_empty() {
        return Err(problems);
    }
    check_partition(&exprs).map_err(|e| vec![e.to_string()])
}
