//! Clause records as supplied by the extraction service, and their
//! normalized form.

use lexowl_ontology::{DeonticAnnotation, Modality};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CompileError;
use crate::phrase::Proposition;

/// Modality as stated in a clause record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatedModality {
    /// "MUST" / "MUST NOT" rules.
    Must,
    /// Advisory rules.
    Should,
    /// Explicitly unstated; treated like a missing value.
    None,
}

impl StatedModality {
    /// The modality this states, if any.
    #[must_use]
    pub fn modality(self) -> Option<Modality> {
        match self {
            StatedModality::Must => Some(Modality::Must),
            StatedModality::Should => Some(Modality::Should),
            StatedModality::None => None,
        }
    }
}

/// One sentence's structured extraction.
///
/// Missing or `null` fields read as empty; the normalizer rejects an empty
/// subject or conclusion for this clause alone.
///
/// ```
/// use lexowl_compiler::ClauseRecord;
///
/// let record: ClauseRecord = serde_json::from_str(r#"{
///     "subject": "you",
///     "conclusion": "move off",
///     "deontic_modality": null,
///     "conditions": ["there is a safe gap in the traffic"]
/// }"#).unwrap();
/// assert_eq!(record.deontic_modality, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseRecord {
    /// Who the rule addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// The action the rule concludes with.
    #[serde(default, deserialize_with = "null_as_default")]
    pub conclusion: String,
    /// Stated modality, or `null` when the sentence states none.
    #[serde(default, alias = "modality")]
    pub deontic_modality: Option<StatedModality>,
    /// Conditions in source order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub conditions: Vec<String>,
    /// Regulation identifier (e.g. `"171"`), when the extractor supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parses a JSON array of clause records one record at a time.
///
/// A record without the clause shape (for example a number where the
/// subject should be) becomes a [`CompileError::MalformedClause`] at its
/// index, so the records around it still compile.
///
/// # Errors
///
/// Returns the parse error when `json` is not a JSON array.
pub fn parse_records(
    json: &str,
) -> Result<Vec<Result<ClauseRecord, CompileError>>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
    Ok(values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).map_err(|e| {
                CompileError::malformed(format!("record does not have the clause shape: {e}"))
            })
        })
        .collect())
}

/// A condition with its subject–verb–object reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    /// The source text.
    pub text: String,
    /// Parsed reading, with the addressed party rewritten to the ego constant.
    pub proposition: Proposition,
}

/// A clause after normalization. Immutable from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedClause {
    /// Subject content tokens; `[ego]` for the addressed party.
    pub subject: Vec<String>,
    /// Trimmed conclusion text.
    pub conclusion: String,
    /// Action readings of the conclusion parts; may be empty.
    pub actions: Vec<Proposition>,
    /// Effective modality and its provenance.
    pub deontic: DeonticAnnotation,
    /// Conditions in source order.
    pub conditions: Vec<Condition>,
    /// Trimmed rule identifier, if any.
    pub rule: Option<String>,
}

impl NormalizedClause {
    /// Subject tokens joined with spaces (the subject class key).
    #[must_use]
    pub fn subject_key(&self) -> String {
        self.subject.join(" ")
    }
}
