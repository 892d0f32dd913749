//! Clause normalization: ego rewriting, modality inference, condition parsing.

use lexowl_ontology::{DeonticAnnotation, Modality, Provenance};

use crate::clause::{ClauseRecord, Condition, NormalizedClause};
use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::phrase::{self, Proposition};

/// Normalizes one clause record.
///
/// # Errors
///
/// Returns [`CompileError::MalformedClause`] when the subject or conclusion
/// is empty, or a condition has no identifiable subject and verb.
pub fn normalize(
    record: &ClauseRecord,
    config: &CompilerConfig,
) -> Result<NormalizedClause, CompileError> {
    let subject = normalize_subject(&record.subject, config)
        .ok_or_else(|| CompileError::malformed("subject is empty"))?;

    let conclusion = record.conclusion.trim();
    if phrase::tokenize(conclusion).is_empty() {
        return Err(CompileError::malformed("conclusion is empty"));
    }
    let actions = phrase::split_actions(conclusion)
        .iter()
        .filter_map(|part| phrase::parse_action(part))
        .collect();

    let conditions = record
        .conditions
        .iter()
        .enumerate()
        .map(|(i, text)| {
            parse_condition(text, config)
                .map(|proposition| Condition {
                    text: text.trim().to_string(),
                    proposition,
                })
                .ok_or_else(|| {
                    CompileError::malformed(format!(
                        "condition {} ('{}') has no identifiable subject and verb",
                        i + 1,
                        text.trim()
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let deontic = effective_modality(record, config);

    Ok(NormalizedClause {
        subject,
        conclusion: conclusion.to_string(),
        actions,
        deontic,
        conditions,
        rule: record
            .rule
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
    })
}

fn normalize_subject(subject: &str, config: &CompilerConfig) -> Option<Vec<String>> {
    let tokens = phrase::content_tokens(subject);
    if tokens.is_empty() {
        return None;
    }
    if config.is_deictic(&tokens.join(" ")) {
        return Some(vec![config.ego.clone()]);
    }
    Some(tokens)
}

fn parse_condition(text: &str, config: &CompilerConfig) -> Option<Proposition> {
    let mut proposition = phrase::parse_condition(text)?;
    if config.is_deictic(&proposition.subject.join(" ")) {
        proposition.subject = vec![config.ego.clone()];
    }
    Some(proposition)
}

/// Stated modality, or an inferred one with a note explaining the choice.
fn effective_modality(record: &ClauseRecord, config: &CompilerConfig) -> DeonticAnnotation {
    if let Some(modality) = record.deontic_modality.and_then(|m| m.modality()) {
        return DeonticAnnotation {
            modality,
            provenance: Provenance::Explicit,
        };
    }

    let mut tokens = phrase::tokenize(&record.conclusion);
    for condition in &record.conditions {
        tokens.extend(phrase::tokenize(condition));
    }
    let find = |cues: &[String]| {
        cues.iter()
            .find(|cue| phrase::contains_phrase(&tokens, cue))
            .cloned()
    };
    let default = config.default_modality;

    let (modality, note) = match (find(&config.obligation_cues), find(&config.advisory_cues)) {
        (Some(obligation), None) => (
            Modality::Must,
            format!("Modality inferred as 'must': obligation cue '{obligation}' in clause text."),
        ),
        (Some(obligation), Some(advisory)) => {
            tracing::warn!(
                conclusion = %record.conclusion,
                obligation = %obligation,
                advisory = %advisory,
                "ambiguous modality cues; keeping default"
            );
            (
                default,
                format!(
                    "Modality ambiguous: obligation cue '{obligation}' and advisory cue \
                     '{advisory}' both present; kept default '{}'.",
                    default.as_str()
                ),
            )
        }
        (None, _) => (
            default,
            format!("No modality stated; defaulted to '{}'.", default.as_str()),
        ),
    };

    DeonticAnnotation {
        modality,
        provenance: Provenance::Inferred { note },
    }
}
