//! Turtle 1.1 validator.
//!
//! Validates that the emitted document is well-formed:
//! - The standard prefixes and the `owl:Ontology` header are present
//! - The document parses with a Turtle 1.1 parser
//! - No local name is declared as a subject twice

use std::collections::HashSet;

use sophia_api::source::TripleSource;
use sophia_turtle::parser::turtle;

use crate::report::{Check, ConformanceReport, TestResult};

const CHECK: Check = Check::TurtleSyntax;

/// Prefixes every document must declare.
const REQUIRED_PREFIXES: [&str; 5] = [
    "@prefix :",
    "@prefix owl:",
    "@prefix rdf:",
    "@prefix rdfs:",
    "@prefix xsd:",
];

/// Validates a Turtle document.
pub fn validate(text: &str) -> ConformanceReport {
    let mut report = ConformanceReport::new();

    let missing: Vec<String> = REQUIRED_PREFIXES
        .iter()
        .filter(|p| !text.lines().any(|l| l.trim_start().starts_with(*p)))
        .map(|p| format!("Missing `{p}` declaration"))
        .collect();
    let has_header = text.contains("a owl:Ontology");
    if missing.is_empty() && has_header {
        report.push(TestResult::pass(
            CHECK,
            format!(
                "Document has the standard prefixes and an ontology header ({} bytes)",
                text.len()
            ),
        ));
    } else {
        let mut issues = missing;
        if !has_header {
            issues.push("No owl:Ontology header".to_string());
        }
        report.push(TestResult::fail_with_details(
            CHECK,
            "Document has structural issues",
            issues,
        ));
    }

    match count_triples(text) {
        Ok(count) => report.push(TestResult::pass(
            CHECK,
            format!("Turtle 1.1 parse succeeded ({count} triples)"),
        )),
        Err(e) => report.push(TestResult::fail_with_details(
            CHECK,
            "Document is not valid Turtle 1.1",
            vec![e],
        )),
    }

    let mut seen = HashSet::new();
    let duplicates: Vec<String> = declared_names(text)
        .filter(|name| !seen.insert(*name))
        .map(|name| format!(":{name} is declared more than once"))
        .collect();
    if duplicates.is_empty() {
        report.push(TestResult::pass(
            CHECK,
            format!("{} local names declared once each", seen.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            CHECK,
            "Local names declared more than once",
            duplicates,
        ));
    }

    report
}

/// Parses `text` as Turtle 1.1 and counts its triples.
///
/// # Errors
///
/// Returns the parser's message for the first syntax error.
pub fn count_triples(text: &str) -> Result<usize, String> {
    let mut count = 0usize;
    turtle::parse_str(text)
        .for_each_triple(|_| count += 1)
        .map_err(|e| e.to_string())?;
    Ok(count)
}

/// Local names that open a subject block (`:Name` at the start of a line).
fn declared_names(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter_map(|line| {
        let name = line.strip_prefix(':')?;
        let end = name.find(char::is_whitespace).unwrap_or(name.len());
        Some(&name[..end]).filter(|n| !n.is_empty())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;

    #[test]
    fn minimal_rule_passes() {
        let report = validate(fixtures::MINIMAL_RULE);
        let failures: Vec<_> = report.failures().collect();
        assert!(failures.is_empty(), "Turtle failures: {:#?}", failures);
    }

    #[test]
    fn minimal_rule_triple_count() {
        // Restriction trees expand into blank nodes and rdf:first/rdf:rest cells.
        assert_eq!(count_triples(fixtures::MINIMAL_RULE), Ok(54));
    }

    #[test]
    fn undeclared_prefix_is_rejected() {
        let report = validate(fixtures::MISSING_PREFIX);
        assert!(report
            .failures()
            .any(|r| r.message == "Document is not valid Turtle 1.1"));
        assert!(report
            .failures()
            .any(|r| r.message == "Document has structural issues"));
    }

    #[test]
    fn unterminated_statement_is_rejected() {
        assert!(count_triples(fixtures::UNTERMINATED_STATEMENT).is_err());
    }

    #[test]
    fn duplicate_subjects_are_reported() {
        let doubled = format!(
            "{}\n:Agent\n  a owl:Class ;\n  rdfs:label \"Agent\" .\n",
            fixtures::MINIMAL_RULE
        );
        let report = validate(&doubled);
        let failure = report.failures().next();
        assert_eq!(
            failure.map(|r| r.details.clone()),
            Some(vec![":Agent is declared more than once".to_string()])
        );
    }
}
