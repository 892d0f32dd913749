//! Compiler configuration.
//!
//! Every field has a default matching the highway-code deployment, so an
//! empty TOML file is a valid configuration. Environment variables override
//! the IRIs after the file is read.

use std::path::Path;

use anyhow::{Context, Result};
use lexowl_ontology::iris::DEFAULT_BASE;
use lexowl_ontology::serializer::turtle::DocumentHeader;
use lexowl_ontology::Modality;
use serde::{Deserialize, Serialize};

/// Overrides [`CompilerConfig::base_iri`].
pub const ENV_BASE_IRI: &str = "LEXOWL_BASE_IRI";
/// Overrides [`CompilerConfig::ontology_iri`].
pub const ENV_ONTOLOGY_IRI: &str = "LEXOWL_ONTOLOGY_IRI";

/// Settings that shape naming, modality inference, and the emitted header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// IRI bound to the empty prefix.
    pub base_iri: String,
    /// IRI of the emitted `owl:Ontology`.
    pub ontology_iri: String,
    /// `rdfs:label` of the emitted ontology.
    pub ontology_label: String,
    /// `owl:versionInfo` of the emitted ontology.
    pub version: String,
    /// Taxonomy root for subject classes.
    pub agent_root: String,
    /// Taxonomy root for condition tags.
    pub condition_root: String,
    /// Constant the addressed party is rewritten to.
    pub ego: String,
    /// Subject forms that denote the addressed party.
    pub deictic_forms: Vec<String>,
    /// Modality assumed when a clause states none and no cue decides it.
    pub default_modality: Modality,
    /// Phrases whose presence implies a legal obligation.
    pub obligation_cues: Vec<String>,
    /// Phrases whose presence implies advice.
    pub advisory_cues: Vec<String>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        let ontology_iri = DEFAULT_BASE.trim_end_matches(['#', '/']).to_string();
        Self {
            base_iri: DEFAULT_BASE.to_string(),
            ontology_iri,
            ontology_label: "Highway Code".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            agent_root: "Agent".to_string(),
            condition_root: "Condition".to_string(),
            ego: "ego".to_string(),
            deictic_forms: strings(&["you", "yourself", "i", "me", "we", "us"]),
            default_modality: Modality::Should,
            obligation_cues: strings(&[
                "must", "shall", "required", "have to", "has to", "obliged", "law",
            ]),
            advisory_cues: strings(&["should", "advised", "recommended"]),
        }
    }
}

impl CompilerConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or names unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse compiler configuration")
    }

    /// Reads a TOML configuration file and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Self::from_toml_str(&text)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?
            .with_env_overrides())
    }

    /// Applies `LEXOWL_BASE_IRI` / `LEXOWL_ONTOLOGY_IRI` when set and non-empty.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(read_non_empty_env)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(base) = lookup(ENV_BASE_IRI) {
            self.base_iri = base;
        }
        if let Some(iri) = lookup(ENV_ONTOLOGY_IRI) {
            self.ontology_iri = iri;
        }
        self
    }

    /// Returns true if `subject` (already tokenized and joined) denotes the
    /// addressed party.
    #[must_use]
    pub fn is_deictic(&self, subject: &str) -> bool {
        subject == self.ego
            || self
                .deictic_forms
                .iter()
                .any(|form| form.eq_ignore_ascii_case(subject))
    }

    /// Header for the emitted Turtle document.
    #[must_use]
    pub fn header(&self) -> DocumentHeader {
        DocumentHeader {
            base_iri: self.base_iri.clone(),
            ontology_iri: self.ontology_iri.clone(),
            label: self.ontology_label.clone(),
            version: self.version.clone(),
        }
    }
}

fn read_non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = CompilerConfig::from_toml_str("").ok();
        assert_eq!(config, Some(CompilerConfig::default()));
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = CompilerConfig::from_toml_str(
            r#"
base_iri = "http://example.org/rail#"
default_modality = "must"
deictic_forms = ["you"]
"#,
        )
        .ok();
        assert!(config.is_some());
        let config = config.unwrap_or_default();
        assert_eq!(config.base_iri, "http://example.org/rail#");
        assert_eq!(config.default_modality, Modality::Must);
        assert_eq!(config.deictic_forms, vec!["you".to_string()]);
        assert_eq!(config.agent_root, "Agent");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(CompilerConfig::from_toml_str("colour = \"blue\"").is_err());
    }

    #[test]
    fn default_ontology_iri_strips_fragment() {
        assert_eq!(
            CompilerConfig::default().ontology_iri,
            "http://example.org/highway_code"
        );
    }

    #[test]
    fn base_iri_override_leaves_other_fields() {
        let config = CompilerConfig::default().with_overrides(|name| {
            (name == ENV_BASE_IRI).then(|| "http://example.org/rail#".to_string())
        });
        assert_eq!(config.base_iri, "http://example.org/rail#");
        assert_eq!(config.ontology_iri, CompilerConfig::default().ontology_iri);
        assert_eq!(config.header().base_iri, "http://example.org/rail#");
    }

    #[test]
    fn both_iris_can_be_overridden() {
        let config = CompilerConfig::default().with_overrides(|name| match name {
            ENV_BASE_IRI => Some("http://example.org/rail#".to_string()),
            ENV_ONTOLOGY_IRI => Some("http://example.org/rail".to_string()),
            _ => None,
        });
        assert_eq!(config.header().ontology_iri, "http://example.org/rail");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        const NAME: &str = "LEXOWL_CONFIG_TEST_BLANK_VALUE";
        std::env::set_var(NAME, "   ");
        assert_eq!(read_non_empty_env(NAME), None);
        std::env::set_var(NAME, "  http://example.org/rail#  ");
        assert_eq!(
            read_non_empty_env(NAME).as_deref(),
            Some("http://example.org/rail#")
        );
        std::env::remove_var(NAME);
        assert_eq!(read_non_empty_env(NAME), None);
    }

    #[test]
    fn deictic_forms_match_case_insensitively() {
        let config = CompilerConfig::default();
        assert!(config.is_deictic("you"));
        assert!(config.is_deictic("YOU"));
        assert!(config.is_deictic("ego"));
        assert!(!config.is_deictic("cyclist"));
    }
}
