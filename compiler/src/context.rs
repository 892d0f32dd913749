//! Context class synthesis: subject classes, scenario classes, and
//! rule-qualified classes.

use lexowl_ontology::{ClassDescriptor, ClassKey, Signature, Staging};

use crate::clause::NormalizedClause;
use crate::config::CompilerConfig;
use crate::phrase;
use crate::resolver::ConditionTag;

/// Names of the taxonomy roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    /// Root of subject classes.
    pub agent: String,
    /// Root of condition tags.
    pub condition: String,
}

/// Ensures both taxonomy roots exist.
pub fn ensure_roots(scope: &mut Staging<'_>, config: &CompilerConfig) -> Roots {
    let mut root = |name: &str, comment: &str| {
        let mut draft = ClassDescriptor::new(
            name,
            ClassKey::Root {
                name: name.to_string(),
            },
            name,
            None,
        );
        draft.comment = Some(comment.to_string());
        scope.ensure_class(draft)
    };
    let agent = root(
        config.agent_root.as_str(),
        "Any party a rule can address. Subject classes specialize this class.",
    );
    let condition = root(
        config.condition_root.as_str(),
        "A circumstance under which a rule applies. Condition tags specialize this class.",
    );
    Roots { agent, condition }
}

/// Ensures the base class of the clause subject, under the agent root.
pub fn subject_class(scope: &mut Staging<'_>, clause: &NormalizedClause, roots: &Roots) -> String {
    let subject = clause.subject_key();
    scope.ensure_class(ClassDescriptor::new(
        phrase::upper_camel(&clause.subject),
        ClassKey::Subject {
            subject: subject.clone(),
        },
        subject,
        Some(roots.agent.clone()),
    ))
}

/// Ensures the scenario class for the clause subject under `tags`.
///
/// `tags` must be deduplicated and in canonical order, as returned by
/// [`resolve_conditions`](crate::resolver::resolve_conditions). The name
/// and the key depend only on the subject and the condition set.
pub fn scenario_class(
    scope: &mut Staging<'_>,
    clause: &NormalizedClause,
    subject_class: &str,
    tags: &[ConditionTag],
) -> String {
    let (name, label) = if tags.is_empty() {
        (
            format!("{subject_class}Unconditional"),
            format!("{} unconditionally", clause.subject_key()),
        )
    } else {
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        let labels: Vec<String> = tags.iter().map(|t| describe(&t.signature)).collect();
        (
            format!("{subject_class}At{}", names.join("And")),
            format!("{} when {}", clause.subject_key(), labels.join(" and ")),
        )
    };
    scope.ensure_class(ClassDescriptor::new(
        name,
        ClassKey::Scenario {
            subject: clause.subject_key(),
            conditions: tags.iter().map(|t| t.signature.clone()).collect(),
        },
        label,
        Some(subject_class.to_string()),
    ))
}

/// Rule identifier for a clause: the explicit `rule` field, or a tag derived
/// from the conclusion actions. Returns the name fragment appended to the
/// scenario name, or `None` when neither yields any token.
#[must_use]
pub fn rule_id(clause: &NormalizedClause) -> Option<String> {
    if let Some(explicit) = &clause.rule {
        let mut tokens = phrase::tokenize(explicit);
        if tokens.first().is_some_and(|t| t == "rule") {
            tokens.remove(0);
        }
        if !tokens.is_empty() {
            return Some(format!("Rule{}", phrase::upper_camel(&tokens)));
        }
    }
    let words: Vec<String> = clause
        .actions
        .iter()
        .map(|a| phrase::upper_camel(&a.action_words()))
        .collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join("And"))
    }
}

/// Ensures the rule-qualified class `{scenario}_{rule}` under `scenario`,
/// annotated with the clause modality.
pub fn rule_class(
    scope: &mut Staging<'_>,
    clause: &NormalizedClause,
    scenario: &str,
    rule: &str,
) -> String {
    let mut draft = ClassDescriptor::new(
        format!("{scenario}_{rule}"),
        ClassKey::Rule {
            scenario: scenario.to_string(),
            rule: rule.to_string(),
        },
        format!("{scenario} under {rule}"),
        Some(scenario.to_string()),
    );
    draft.comment = Some(format!(
        "{} {} {}",
        clause.subject_key(),
        clause.deontic.modality.as_str(),
        clause.conclusion
    ));
    draft.deontic = Some(clause.deontic.clone());
    scope.ensure_class(draft)
}

fn describe(signature: &Signature) -> String {
    let verb = phrase::third_person(&signature.verb);
    signature
        .subject
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(verb.as_str()))
        .chain(signature.object.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}
