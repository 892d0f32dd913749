//! Predicate resolution: conditions to condition-tag classes, conclusion
//! actions to boolean properties.
//!
//! Reuse is decided by the registry's compatibility predicates over semantic
//! signatures, never by comparing names or surface text.

use lexowl_ontology::{
    ClassDescriptor, ClassKey, PropertyDescriptor, Range, Signature, Staging,
};

use crate::clause::NormalizedClause;
use crate::context::Roots;

/// A resolved condition tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionTag {
    /// Class name of the tag.
    pub name: String,
    /// Signature the tag was resolved from.
    pub signature: Signature,
}

/// Resolves each distinct condition of `clause` to a condition-tag class.
///
/// Conditions with equal signatures collapse into one tag. The result is in
/// canonical signature order, so it does not depend on source order.
pub fn resolve_conditions(
    scope: &mut Staging<'_>,
    clause: &NormalizedClause,
    roots: &Roots,
) -> Vec<ConditionTag> {
    let mut tags: Vec<ConditionTag> = Vec::new();
    for condition in &clause.conditions {
        let signature = condition.proposition.signature();
        if tags.iter().any(|t| t.signature == signature) {
            continue;
        }
        let mut draft = ClassDescriptor::new(
            condition.proposition.tag_name(),
            ClassKey::Condition {
                signature: signature.clone(),
            },
            condition.proposition.label(),
            Some(roots.condition.clone()),
        );
        draft.comment = Some(condition.text.clone());
        let name = scope.ensure_class(draft);
        tags.push(ConditionTag { name, signature });
    }
    tags.sort_by_cached_key(|t| t.signature.canonical());
    tags
}

/// Resolves the conclusion actions of `clause` to boolean properties whose
/// domain is `scenario`. Returns property names in conclusion order, without
/// repeats; empty when the conclusion has no observable action.
pub fn resolve_conclusion(
    scope: &mut Staging<'_>,
    clause: &NormalizedClause,
    scenario: &str,
) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for action in &clause.actions {
        let name = scope.ensure_property(PropertyDescriptor {
            name: action.predicate_name(),
            signature: action.signature(),
            label: action.label(),
            domain: scenario.to_string(),
            range: Range::Boolean,
            deontic: Some(clause.deontic.clone()),
        });
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompilerConfig;
    use crate::context::ensure_roots;
    use crate::normalizer::normalize;
    use crate::ClauseRecord;
    use lexowl_ontology::Registry;

    fn clause(conclusion: &str, conditions: &[&str]) -> NormalizedClause {
        let record = ClauseRecord {
            subject: "you".to_string(),
            conclusion: conclusion.to_string(),
            deontic_modality: None,
            conditions: conditions.iter().map(|c| c.to_string()).collect(),
            rule: None,
        };
        match normalize(&record, &CompilerConfig::default()) {
            Ok(c) => c,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn duplicate_condition_phrasings_collapse() {
        let registry = Registry::new();
        let mut scope = registry.stage();
        let roots = ensure_roots(&mut scope, &CompilerConfig::default());
        let c = clause(
            "stop",
            &["the junction has a 'Stop' sign", "a junction has the stop sign"],
        );
        let tags = resolve_conditions(&mut scope, &c, &roots);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "JunctionHasStopSign");
    }

    #[test]
    fn tags_are_in_canonical_order() {
        let registry = Registry::new();
        let mut scope = registry.stage();
        let roots = ensure_roots(&mut scope, &CompilerConfig::default());
        let forward = clause("stop", &["the lights are red", "the junction has a stop sign"]);
        let backward = clause("stop", &["the junction has a stop sign", "the lights are red"]);
        let a = resolve_conditions(&mut scope, &forward, &roots);
        let b = resolve_conditions(&mut scope, &backward, &roots);
        assert_eq!(a, b);
        assert_eq!(a[0].name, "LightsIsRed");
    }

    #[test]
    fn conclusion_parts_become_properties() {
        let registry = Registry::new();
        let mut scope = registry.stage();
        let c = clause("stop behind the line and give way to traffic", &[]);
        let names = resolve_conclusion(&mut scope, &c, "EgoUnconditional");
        assert_eq!(names, vec!["stopBehindLine", "giveWayToTraffic"]);
    }

    #[test]
    fn unobservable_conclusion_yields_no_property() {
        let registry = Registry::new();
        let mut scope = registry.stage();
        let c = clause("do so", &[]);
        assert!(resolve_conclusion(&mut scope, &c, "EgoUnconditional").is_empty());
        assert_eq!(scope.staged_len(), 0);
    }

    #[test]
    fn same_action_in_other_context_is_suffixed() {
        let registry = Registry::new();
        let mut scope = registry.stage();
        let c = clause("stop", &[]);
        let first = resolve_conclusion(&mut scope, &c, "EgoAtJunction");
        let second = resolve_conclusion(&mut scope, &c, "EgoAtCrossing");
        let again = resolve_conclusion(&mut scope, &c, "EgoAtJunction");
        assert_eq!(first, vec!["stop"]);
        assert_eq!(second, vec!["stop_2"]);
        assert_eq!(again, first);
        assert_eq!(scope.into_delta().collisions().len(), 1);
    }
}
