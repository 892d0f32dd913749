//! End-to-end properties of the compiler over small clause documents.

use lexowl_compiler::lattice::check_partition;
use lexowl_compiler::{
    parse_records, ClauseRecord, Compiler, CompilerConfig, ErrorKind, Severity, StatedModality,
};
use lexowl_ontology::{Branch, ClassKey, Modality, Provenance, Registry, RestrictionExpr};

fn record(
    subject: &str,
    conclusion: &str,
    modality: Option<StatedModality>,
    conditions: &[&str],
) -> ClauseRecord {
    ClauseRecord {
        subject: subject.to_string(),
        conclusion: conclusion.to_string(),
        deontic_modality: modality,
        conditions: conditions.iter().map(|c| c.to_string()).collect(),
        rule: None,
    }
}

fn junction_and_move_off() -> Vec<ClauseRecord> {
    vec![
        record(
            "you",
            "stop behind the line at a junction",
            Some(StatedModality::Must),
            &[
                "the junction has a 'Stop' sign",
                "the junction has a solid white line across the road",
            ],
        ),
        record(
            "you",
            "move off",
            None,
            &["there is a safe gap in the traffic"],
        ),
    ]
}

fn compiler() -> Compiler {
    Compiler::new(CompilerConfig::default())
}

/// Lattice class restrictions of `rule`, by branch.
fn lattice_of(registry: &Registry, rule: &str) -> Vec<(Branch, RestrictionExpr)> {
    registry
        .classes()
        .filter_map(|c| match (&c.key, &c.equivalent_class) {
            (ClassKey::Lattice { rule: r, branch, .. }, Some(expr)) if r == rule => {
                Some((*branch, expr.clone()))
            }
            _ => None,
        })
        .collect()
}

const JUNCTION: &str = "EgoAtJunctionHasSolidWhiteLineAcrossRoadAndJunctionHasStopSign";
const SAFE_GAP: &str = "EgoAtSafeGapInTrafficExists";

#[test]
fn junction_and_move_off_scenario() {
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &junction_and_move_off());
    assert!(out.report.all_succeeded(), "{:?}", out.report.diagnostics);
    assert_eq!(out.report.clauses.len(), 2);

    // Addressed party rewritten to ego.
    assert!(registry.class("Ego").is_some());
    assert!(registry.class("You").is_none());

    // One boolean property per clause, each on its own context class.
    let stop = registry.property("stopBehindLineAtJunction");
    let move_off = registry.property("moveOff");
    assert_eq!(stop.map(|p| p.domain.as_str()), Some(JUNCTION));
    assert_eq!(move_off.map(|p| p.domain.as_str()), Some(SAFE_GAP));

    // Rule-qualified class under the junction scenario.
    let summary = &out.report.clauses[0];
    assert_eq!(summary.scenario, JUNCTION);
    assert_eq!(
        registry
            .class(&summary.rule_class)
            .and_then(|c| c.parent.as_deref()),
        Some(JUNCTION)
    );

    // Lattice references the first clause's predicate and its flag only.
    let flag = format!("exceptionalCircumstance_{}", summary.rule_class);
    let lattice = lattice_of(&registry, &summary.rule_class);
    assert_eq!(lattice.len(), 3);
    for (branch, expr) in &lattice {
        let props = expr.properties();
        assert!(props.contains(&"stopBehindLineAtJunction"), "{branch:?}");
        assert!(!props.contains(&"moveOff"), "{branch:?}");
        match branch {
            Branch::Default => assert_eq!(props, vec!["stopBehindLineAtJunction"]),
            _ => assert_eq!(props, vec!["stopBehindLineAtJunction", flag.as_str()]),
        }
    }

    // Stated vs. inferred modality.
    let first = registry.class(&out.report.clauses[0].rule_class);
    let second = registry.class(&out.report.clauses[1].rule_class);
    assert_eq!(
        first.and_then(|c| c.deontic.as_ref()).map(|d| d.modality),
        Some(Modality::Must)
    );
    assert!(matches!(
        second.and_then(|c| c.deontic.as_ref()).map(|d| &d.provenance),
        Some(Provenance::Inferred { .. })
    ));
    assert!(out.turtle.contains(&format!(":{JUNCTION}\n  a owl:Class")));
}

#[test]
fn fresh_runs_are_byte_identical() {
    let records = junction_and_move_off();
    let a = compiler().compile(&mut Registry::new(), &records);
    let b = compiler().compile(&mut Registry::new(), &records);
    assert_eq!(a.turtle, b.turtle);
}

#[test]
fn reprocessing_mints_nothing() {
    let records = junction_and_move_off();
    let mut registry = Registry::new();
    compiler().compile(&mut registry, &records);
    let before = registry.len();

    let again = compiler().compile(&mut registry, &records);
    assert_eq!(registry.len(), before);
    assert!(again.report.clauses.iter().all(|c| c.minted == 0));
    assert!(!again.turtle.contains("a owl:Class"));
    assert!(again.report.diagnostics.is_empty());
}

#[test]
fn every_lattice_partitions_its_assignments() {
    let mut records = junction_and_move_off();
    records.push(record(
        "the cyclist",
        "slow down, look behind and give way to pedestrians",
        None,
        &["the road is wet"],
    ));
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &records);
    assert!(out.report.all_succeeded());

    for summary in &out.report.clauses {
        let lattice = lattice_of(&registry, &summary.rule_class);
        let branches: Vec<(Branch, &RestrictionExpr)> =
            lattice.iter().map(|(b, e)| (*b, e)).collect();
        let checked = check_partition(&branches);
        let expected = 1usize << (summary.predicates.len() + 1);
        assert_eq!(checked, Ok(expected), "{}", summary.rule_class);
    }
}

#[test]
fn scenario_names_follow_subject_and_condition_set() {
    let records = vec![
        record("you", "stop", None, &["the lights are red", "the road is wet"]),
        record("you", "slow down", None, &["the road is wet", "the lights are red"]),
        record("you", "wait", None, &["the lights are red"]),
        record("the cyclist", "dismount", None, &["the lights are red"]),
    ];
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &records);
    assert!(out.report.all_succeeded(), "{:?}", out.report.diagnostics);

    let scenarios: Vec<&str> = out
        .report
        .clauses
        .iter()
        .map(|c| c.scenario.as_str())
        .collect();
    assert_eq!(scenarios[0], scenarios[1]);
    assert_ne!(scenarios[0], scenarios[2]);
    assert_ne!(scenarios[2], scenarios[3]);
    assert_eq!(scenarios[3], "CyclistAtLightsIsRed");
}

#[test]
fn incompatible_reuse_of_a_name_is_suffixed_and_reported() {
    let records = vec![
        record("you", "stop", None, &["the lights are red"]),
        record("you", "stop", None, &[]),
    ];
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &records);
    assert!(out.report.all_succeeded());

    assert_eq!(
        registry.property("stop").map(|p| p.domain.as_str()),
        Some("EgoAtLightsIsRed")
    );
    assert_eq!(
        registry.property("stop_2").map(|p| p.domain.as_str()),
        Some("EgoUnconditional")
    );
    let warning = out
        .report
        .diagnostics
        .iter()
        .find(|d| d.kind == ErrorKind::SymbolCollision);
    assert_eq!(warning.map(|d| (d.clause_index, d.severity)), Some((1, Severity::Warning)));
    assert_eq!(out.report.warning_count(), 1);
}

#[test]
fn conflicting_modality_mints_a_suffixed_rule() {
    let records = vec![
        record("you", "stop", Some(StatedModality::Must), &["the lights are red"]),
        record("you", "stop", Some(StatedModality::Should), &["the lights are red"]),
    ];
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &records);
    assert!(out.report.all_succeeded());

    let [must, should] = [&out.report.clauses[0], &out.report.clauses[1]];
    assert_eq!(must.scenario, should.scenario);
    assert_eq!(should.rule_class, format!("{}_2", must.rule_class));
    assert_eq!(should.predicates, vec!["stop_2".to_string()]);

    // The report states what the registry holds.
    for summary in [must, should] {
        let committed = registry
            .class(&summary.rule_class)
            .and_then(|c| c.deontic.as_ref())
            .map(|d| d.modality.as_str());
        assert_eq!(committed, Some(summary.modality.as_str()));
    }
    assert_eq!(
        registry.property("stop").and_then(|p| p.deontic.as_ref()).map(|d| d.modality),
        Some(Modality::Must)
    );

    let collisions: Vec<_> = out
        .report
        .diagnostics
        .iter()
        .filter(|d| d.kind == ErrorKind::SymbolCollision)
        .map(|d| d.clause_index)
        .collect();
    assert_eq!(collisions, vec![1, 1]);

    // Same modality again reuses the first rule.
    let before = registry.len();
    let again = compiler().compile(&mut registry, &records[..1]);
    assert_eq!(registry.len(), before);
    assert_eq!(again.report.clauses[0].rule_class, must.rule_class);
}

#[test]
fn conclusion_without_predicate_is_unencodable() {
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &[record("you", "do so", None, &[])]);
    assert_eq!(out.report.error_count(), 1);
    assert_eq!(out.report.diagnostics[0].kind, ErrorKind::UnencodableRule);
    assert!(registry.is_empty());
    assert!(!out.turtle.contains("a owl:Class"));
}

#[test]
fn malformed_clause_does_not_stop_the_run() {
    let records = vec![
        record("", "stop", None, &[]),
        record("you", "stop", None, &["junction"]),
        record("you", "move off", None, &[]),
    ];
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &records);

    assert_eq!(out.report.error_count(), 2);
    assert!(out
        .report
        .diagnostics
        .iter()
        .all(|d| d.kind == ErrorKind::MalformedClause));
    assert_eq!(out.report.clauses.len(), 1);
    assert_eq!(out.report.clauses[0].clause_index, 2);
    assert!(registry.class("EgoUnconditional").is_some());
}

#[test]
fn incomplete_records_are_rejected_one_by_one() {
    let json = r#"[
        {"conclusion": "stop", "deontic_modality": "must", "conditions": []},
        {"subject": null, "conclusion": "stop"},
        {"subject": "you", "conclusion": ["stop"]},
        {"subject": "you", "conclusion": "move off", "deontic_modality": null,
         "conditions": ["there is a safe gap in the traffic"]}
    ]"#;
    let entries = parse_records(json).unwrap_or_default();
    assert_eq!(entries.len(), 4);

    let mut registry = Registry::new();
    let out = compiler().compile_parsed(&mut registry, &entries);
    assert_eq!(out.report.clauses_total, 4);
    let rejected: Vec<(usize, ErrorKind)> = out
        .report
        .diagnostics
        .iter()
        .filter(|d| d.is_error())
        .map(|d| (d.clause_index, d.kind))
        .collect();
    assert_eq!(
        rejected,
        vec![
            (0, ErrorKind::MalformedClause),
            (1, ErrorKind::MalformedClause),
            (2, ErrorKind::MalformedClause),
        ]
    );
    assert_eq!(out.report.clauses.len(), 1);
    assert_eq!(out.report.clauses[0].scenario, SAFE_GAP);
    assert!(out.turtle.contains(":moveOff"));
}

#[test]
fn seeded_registry_reuses_without_reemitting() {
    let records = junction_and_move_off();
    let mut registry = Registry::new();
    compiler().compile(&mut registry, &records);
    let snapshot = registry.to_json().unwrap_or_default();

    let mut seeded = Registry::from_json(&snapshot).unwrap_or_default();
    assert_eq!(seeded.len(), registry.len());
    let out = compiler().compile(&mut seeded, &records);
    assert!(out.report.all_succeeded());
    assert_eq!(seeded.len(), registry.len());
    assert!(!out.turtle.contains(JUNCTION));
}

#[test]
fn explicit_rule_identifier_names_the_rule_class() {
    let mut with_rule = record(
        "you",
        "stop behind the line at a junction",
        Some(StatedModality::Must),
        &["the junction has a 'Stop' sign"],
    );
    with_rule.rule = Some("171".to_string());
    let mut registry = Registry::new();
    let out = compiler().compile(&mut registry, &[with_rule]);
    assert_eq!(
        out.report.clauses.first().map(|c| c.rule_class.as_str()),
        Some("EgoAtJunctionHasStopSign_Rule171")
    );
    assert!(out
        .turtle
        .contains(":EgoAtJunctionHasStopSign_Rule171_Mitigated"));
}
