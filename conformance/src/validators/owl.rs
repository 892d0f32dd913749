//! OWL structural validator.
//!
//! Validates the registry snapshot of a build:
//! - Local names are unique
//! - Subclass, disjoint-with, and domain targets are known classes
//! - Restriction properties are known boolean properties
//! - Parent chains end at a taxonomy root
//! - Conclusion predicates are declared on scenario classes and
//!   exceptional-circumstance flags on rule-qualified classes

use std::collections::{HashMap, HashSet};

use lexowl_ontology::{ClassDescriptor, ClassKey, Range, Registry, Signature};

use crate::report::{Check, ConformanceReport, TestResult};

const CHECK: Check = Check::OwlStructure;

/// Validates OWL structural constraints on `registry`.
pub fn validate(registry: &Registry) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let classes: HashMap<&str, &ClassDescriptor> =
        registry.classes().map(|c| (c.name.as_str(), c)).collect();
    let boolean_properties: HashSet<&str> = registry
        .properties()
        .filter(|p| p.range == Range::Boolean)
        .map(|p| p.name.as_str())
        .collect();

    check_unique_names(registry, &mut report);

    let mut violations: Vec<String> = Vec::new();
    for class in registry.classes() {
        match (&class.parent, &class.key) {
            (None, ClassKey::Root { .. }) => {}
            (None, _) => violations.push(format!("Class {} has no subClassOf target", class.name)),
            (Some(parent), _) if !classes.contains_key(parent.as_str()) => violations.push(
                format!("Class {} has unknown subClassOf target: {parent}", class.name),
            ),
            _ => {}
        }
        for disjoint in &class.disjoint_with {
            if !classes.contains_key(disjoint.as_str()) {
                violations.push(format!(
                    "Class {} has unknown disjointWith target: {disjoint}",
                    class.name
                ));
            }
        }
        if let Some(expr) = &class.equivalent_class {
            for property in expr.properties() {
                if !boolean_properties.contains(property) {
                    violations.push(format!(
                        "Class {} restricts unknown boolean property: {property}",
                        class.name
                    ));
                }
            }
        }
    }
    for property in registry.properties() {
        if !classes.contains_key(property.domain.as_str()) {
            violations.push(format!(
                "Property {} has unknown domain: {}",
                property.name, property.domain
            ));
        }
    }

    if violations.is_empty() {
        report.push(TestResult::pass(
            CHECK,
            format!(
                "All {} symbols reference declared classes and properties",
                registry.len()
            ),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            CHECK,
            "Unresolved OWL references detected",
            violations,
        ));
    }

    check_roots(registry, &classes, &mut report);
    check_domains(registry, &classes, &mut report);

    report
}

fn check_unique_names(registry: &Registry, report: &mut ConformanceReport) {
    let mut seen = HashSet::new();
    let duplicates: Vec<String> = registry
        .symbols()
        .iter()
        .map(|s| s.name())
        .filter(|name| !seen.insert(*name))
        .map(|name| format!("{name} is minted more than once"))
        .collect();
    if duplicates.is_empty() {
        report.push(TestResult::pass(CHECK, "Local names are unique"));
    } else {
        report.push(TestResult::fail_with_details(
            CHECK,
            "Duplicate local names",
            duplicates,
        ));
    }
}

/// Every parent chain terminates at a class keyed as a taxonomy root.
fn check_roots<'a>(
    registry: &'a Registry,
    classes: &HashMap<&str, &'a ClassDescriptor>,
    report: &mut ConformanceReport,
) {
    let mut broken: Vec<String> = Vec::new();
    for class in registry.classes() {
        let mut current = class;
        let mut steps = 0usize;
        let ends_at_root = loop {
            if matches!(current.key, ClassKey::Root { .. }) {
                break true;
            }
            // A chain longer than the class count has a cycle.
            if steps > classes.len() {
                break false;
            }
            match current.parent.as_deref().and_then(|p| classes.get(p)) {
                Some(parent) => current = *parent,
                None => break false,
            }
            steps += 1;
        };
        if !ends_at_root {
            broken.push(format!("Class {} does not reach a taxonomy root", class.name));
        }
    }

    if broken.is_empty() {
        report.push(TestResult::pass(
            CHECK,
            "Every parent chain ends at a taxonomy root",
        ));
    } else {
        report.push(TestResult::fail_with_details(
            CHECK,
            "Parent chains that miss a taxonomy root",
            broken,
        ));
    }
}

/// Conclusion predicates live on scenario classes; exceptional flags on
/// rule-qualified classes.
fn check_domains(
    registry: &Registry,
    classes: &HashMap<&str, &ClassDescriptor>,
    report: &mut ConformanceReport,
) {
    let exceptional = Signature::exceptional_circumstance();
    let mut misplaced: Vec<String> = Vec::new();
    for property in registry.properties() {
        let Some(domain) = classes.get(property.domain.as_str()) else {
            continue;
        };
        let expected_rule = property.signature == exceptional;
        let ok = match &domain.key {
            ClassKey::Rule { .. } => expected_rule,
            ClassKey::Scenario { .. } => !expected_rule,
            _ => false,
        };
        if !ok {
            misplaced.push(format!(
                "Property {} is declared on {} which is not a {} class",
                property.name,
                property.domain,
                if expected_rule { "rule-qualified" } else { "scenario" }
            ));
        }
    }

    if misplaced.is_empty() {
        report.push(TestResult::pass(
            CHECK,
            "Property domains are context classes",
        ));
    } else {
        report.push(TestResult::fail_with_details(
            CHECK,
            "Properties declared on the wrong kind of class",
            misplaced,
        ));
    }
}
