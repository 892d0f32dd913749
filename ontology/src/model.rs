//! Core ontology model types.
//!
//! These types describe the fragment of OWL the compiler emits: named classes
//! arranged in subclass chains, boolean datatype properties, and restriction
//! trees that define the compliance-state classes. Every descriptor is owned
//! data held by the [`Registry`](crate::Registry); other descriptors refer to
//! it by name.

use serde::{Deserialize, Serialize};

/// Deontic force of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// A legal requirement ("MUST" rules).
    Must,
    /// Advisory guidance ("should" rules).
    Should,
}

impl Modality {
    /// Returns the string value used in the `:deonticModality` annotation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Must => "must",
            Modality::Should => "should",
        }
    }
}

/// Where a modality came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Provenance {
    /// Stated in the clause record.
    Explicit,
    /// Inferred by the compiler; `note` explains the inference.
    Inferred {
        /// Human-readable explanation of how the modality was chosen.
        note: String,
    },
}

impl Provenance {
    /// Returns the string value used in the `:modalityProvenance` annotation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Explicit => "explicit",
            Provenance::Inferred { .. } => "inferred",
        }
    }

    /// Returns true for inferred provenance.
    #[must_use]
    pub fn is_inferred(&self) -> bool {
        matches!(self, Provenance::Inferred { .. })
    }
}

/// Modality plus provenance, attached to rule classes and conclusion predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeonticAnnotation {
    /// Effective modality.
    pub modality: Modality,
    /// Whether the modality was stated or inferred.
    pub provenance: Provenance,
}

/// XSD literal kinds a non-boolean datatype property may range over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    /// `xsd:string`.
    String,
    /// `xsd:integer`.
    Integer,
    /// `xsd:decimal`.
    Decimal,
}

/// Range of a datatype property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Range {
    /// `xsd:boolean`; the only range the compliance lattice can restrict on.
    Boolean,
    /// Any other XSD literal.
    Literal(LiteralKind),
}

impl Range {
    /// Returns the prefixed XSD datatype name.
    #[must_use]
    pub fn curie(self) -> &'static str {
        match self {
            Range::Boolean => "xsd:boolean",
            Range::Literal(LiteralKind::String) => "xsd:string",
            Range::Literal(LiteralKind::Integer) => "xsd:integer",
            Range::Literal(LiteralKind::Decimal) => "xsd:decimal",
        }
    }
}

/// Semantic signature of a predicate: normalized verb plus its argument roles.
///
/// Two phrasings that normalize to the same signature denote the same
/// predicate; surface text never participates in the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Signature {
    /// Lemmatized verb (e.g. `"have"`, `"stop"`).
    pub verb: String,
    /// Content tokens of the subject role; empty for imperative actions.
    pub subject: Vec<String>,
    /// Content tokens following the verb.
    pub object: Vec<String>,
}

impl Signature {
    /// Signature of the per-rule exceptional-circumstance flag.
    #[must_use]
    pub fn exceptional_circumstance() -> Self {
        Self {
            verb: "apply".to_string(),
            subject: vec!["exceptional".to_string(), "circumstance".to_string()],
            object: Vec::new(),
        }
    }

    /// Canonical text form, used as the total order key for condition sets.
    #[must_use]
    pub fn canonical(&self) -> String {
        format!(
            "{}({}|{})",
            self.verb,
            self.subject.join(" "),
            self.object.join(" ")
        )
    }
}

/// One of the three compliance states of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    /// Every conclusion predicate holds.
    Default,
    /// Some predicate fails but an exceptional circumstance applies.
    Mitigated,
    /// Some predicate fails and no exceptional circumstance applies.
    Violating,
}

impl Branch {
    /// All branches in emission order.
    pub const ALL: [Branch; 3] = [Branch::Default, Branch::Mitigated, Branch::Violating];

    /// Suffix appended to the rule class name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Branch::Default => "Default",
            Branch::Mitigated => "Mitigated",
            Branch::Violating => "Violating",
        }
    }
}

/// Semantic identity of a class, independent of its (possibly suffixed) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ClassKey {
    /// A fixed taxonomy root such as `Agent`.
    Root {
        /// Root class name.
        name: String,
    },
    /// The base class of a normalized subject (`ego`, `cyclist`, ...).
    Subject {
        /// Normalized subject text.
        subject: String,
    },
    /// A condition tag.
    Condition {
        /// Signature of the condition.
        signature: Signature,
    },
    /// Subject under a canonical condition set.
    Scenario {
        /// Normalized subject text.
        subject: String,
        /// Deduplicated condition signatures in canonical order.
        conditions: Vec<Signature>,
    },
    /// Scenario qualified by a rule identifier.
    Rule {
        /// Name of the scenario class.
        scenario: String,
        /// Rule identifier (explicit or derived).
        rule: String,
    },
    /// One compliance state of a rule over a given predicate set.
    Lattice {
        /// Name of the rule-qualified class.
        rule: String,
        /// Which compliance state.
        branch: Branch,
        /// Names of the conclusion predicates, in rule order.
        predicates: Vec<String>,
    },
}

/// A boolean class expression over datatype properties.
///
/// The node kinds are closed; serialization and truth-table evaluation both
/// match on them exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionExpr {
    /// `owl:hasValue` restriction on a boolean property.
    Value {
        /// Property name.
        property: String,
        /// Required value.
        value: bool,
    },
    /// `owl:intersectionOf`, in insertion order.
    Intersection(Vec<RestrictionExpr>),
    /// `owl:unionOf`, in insertion order.
    Union(Vec<RestrictionExpr>),
}

impl RestrictionExpr {
    /// Builds a value restriction.
    #[must_use]
    pub fn value(property: impl Into<String>, value: bool) -> Self {
        RestrictionExpr::Value {
            property: property.into(),
            value,
        }
    }

    /// Evaluates the expression under a property assignment.
    ///
    /// Returns `None` when a referenced property has no assigned value.
    pub fn evaluate<F>(&self, assignment: &F) -> Option<bool>
    where
        F: Fn(&str) -> Option<bool>,
    {
        match self {
            RestrictionExpr::Value { property, value } => {
                assignment(property).map(|actual| actual == *value)
            }
            RestrictionExpr::Intersection(items) => {
                let mut all = true;
                for item in items {
                    all &= item.evaluate(assignment)?;
                }
                Some(all)
            }
            RestrictionExpr::Union(items) => {
                let mut any = false;
                for item in items {
                    any |= item.evaluate(assignment)?;
                }
                Some(any)
            }
        }
    }

    /// Property names referenced by the expression, depth-first, without repeats.
    #[must_use]
    pub fn properties(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_properties(&mut out);
        out
    }

    fn collect_properties<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            RestrictionExpr::Value { property, .. } => {
                if !out.contains(&property.as_str()) {
                    out.push(property);
                }
            }
            RestrictionExpr::Intersection(items) | RestrictionExpr::Union(items) => {
                for item in items {
                    item.collect_properties(out);
                }
            }
        }
    }
}

/// An OWL class definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDescriptor {
    /// Local name under the base IRI; unique within a registry.
    pub name: String,
    /// Semantic identity used for reuse.
    pub key: ClassKey,
    /// Human-readable label.
    pub label: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Name of the parent class (`rdfs:subClassOf`), `None` only for roots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Necessary-and-sufficient definition (`owl:equivalentClass`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equivalent_class: Option<RestrictionExpr>,
    /// Names of mutually exclusive classes (`owl:disjointWith`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disjoint_with: Vec<String>,
    /// Modality annotation, present on rule-qualified classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deontic: Option<DeonticAnnotation>,
}

impl ClassDescriptor {
    /// Creates a class with only a key, label, and parent.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        key: ClassKey,
        label: impl Into<String>,
        parent: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key,
            label: label.into(),
            comment: None,
            parent,
            equivalent_class: None,
            disjoint_with: Vec::new(),
            deontic: None,
        }
    }

    /// Structural compatibility: an existing class may stand in for `draft`
    /// when key, parent, definition, and modality annotation agree. Names,
    /// labels, and comments are not compared.
    #[must_use]
    pub fn is_compatible(&self, draft: &ClassDescriptor) -> bool {
        self.key == draft.key
            && self.parent == draft.parent
            && self.equivalent_class == draft.equivalent_class
            && self.deontic == draft.deontic
    }
}

/// An OWL datatype property definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Local name under the base IRI; unique within a registry.
    pub name: String,
    /// Semantic signature used for reuse.
    pub signature: Signature,
    /// Human-readable label.
    pub label: String,
    /// Name of the domain class.
    pub domain: String,
    /// XSD range.
    pub range: Range,
    /// Modality annotation of the clause that introduced the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deontic: Option<DeonticAnnotation>,
}

impl PropertyDescriptor {
    /// Structural compatibility over `(signature, domain, range)` plus the
    /// modality annotation. A property annotated `must` never stands in for
    /// one annotated `should`.
    #[must_use]
    pub fn is_compatible(&self, draft: &PropertyDescriptor) -> bool {
        self.signature == draft.signature
            && self.domain == draft.domain
            && self.range == draft.range
            && self.deontic == draft.deontic
    }
}

/// A registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "symbol")]
pub enum Symbol {
    /// An `owl:Class`.
    Class(ClassDescriptor),
    /// An `owl:DatatypeProperty`.
    Property(PropertyDescriptor),
}

impl Symbol {
    /// Local name of the symbol.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Symbol::Class(c) => &c.name,
            Symbol::Property(p) => &p.name,
        }
    }
}

/// An annotation property declared in every emitted document.
#[derive(Debug, Clone)]
pub struct AnnotationProperty {
    /// Local name under the base IRI.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Description.
    pub comment: &'static str,
}

/// Returns the annotation properties used to carry deontic metadata.
#[must_use]
pub fn annotation_properties() -> [AnnotationProperty; 2] {
    [
        AnnotationProperty {
            name: "deonticModality",
            label: "deontic modality",
            comment: "Deontic force of the rule a class or predicate encodes. \
                      Values: 'must', 'should'.",
        },
        AnnotationProperty {
            name: "modalityProvenance",
            label: "modality provenance",
            comment: "Whether the deontic modality was stated in the source clause \
                      or inferred by the compiler. Values: 'explicit', 'inferred'.",
        },
    ]
}

/// Standard IRI constants.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// Default base IRI for minted symbols.
    pub const DEFAULT_BASE: &str = "http://example.org/highway_code#";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(verb: &str) -> Signature {
        Signature {
            verb: verb.to_string(),
            subject: Vec::new(),
            object: vec!["line".to_string()],
        }
    }

    #[test]
    fn evaluate_nested_expression() {
        let expr = RestrictionExpr::Intersection(vec![
            RestrictionExpr::Union(vec![
                RestrictionExpr::value("a", false),
                RestrictionExpr::value("b", false),
            ]),
            RestrictionExpr::value("e", true),
        ]);
        let assign = |p: &str| match p {
            "a" => Some(true),
            "b" => Some(false),
            "e" => Some(true),
            _ => None,
        };
        assert_eq!(expr.evaluate(&assign), Some(true));
        assert_eq!(expr.properties(), vec!["a", "b", "e"]);
    }

    #[test]
    fn evaluate_unassigned_property_is_none() {
        let expr = RestrictionExpr::Intersection(vec![RestrictionExpr::value("a", true)]);
        assert_eq!(expr.evaluate(&|_: &str| None), None);
    }

    fn stop_behind_line() -> PropertyDescriptor {
        PropertyDescriptor {
            name: "stopBehindLine".to_string(),
            signature: sig("stop"),
            label: "stop behind line".to_string(),
            domain: "EgoAtJunction".to_string(),
            range: Range::Boolean,
            deontic: None,
        }
    }

    #[test]
    fn property_compatibility_requires_domain_and_range() {
        let prop = stop_behind_line();
        assert!(prop.is_compatible(&stop_behind_line()));

        let mut draft = stop_behind_line();
        draft.domain = "EgoAtCrossing".to_string();
        assert!(!prop.is_compatible(&draft));

        let mut draft = stop_behind_line();
        draft.range = Range::Literal(LiteralKind::String);
        assert!(!prop.is_compatible(&draft));

        let mut draft = stop_behind_line();
        draft.signature = sig("halt");
        assert!(!prop.is_compatible(&draft));
    }

    #[test]
    fn conflicting_modality_is_incompatible() {
        let mut must = stop_behind_line();
        must.deontic = Some(DeonticAnnotation {
            modality: Modality::Must,
            provenance: Provenance::Explicit,
        });
        let mut should = stop_behind_line();
        should.deontic = Some(DeonticAnnotation {
            modality: Modality::Should,
            provenance: Provenance::Explicit,
        });
        assert!(!must.is_compatible(&should));
        assert!(must.is_compatible(&must.clone()));

        let mut rule = ClassDescriptor::new(
            "EgoAtJunction_Stop",
            ClassKey::Rule {
                scenario: "EgoAtJunction".to_string(),
                rule: "Stop".to_string(),
            },
            "stop",
            Some("EgoAtJunction".to_string()),
        );
        rule.deontic = must.deontic.clone();
        let mut draft = rule.clone();
        draft.deontic = should.deontic.clone();
        assert!(!rule.is_compatible(&draft));
    }

    #[test]
    fn canonical_signature_orders_by_verb_first() {
        let a = Signature {
            verb: "be".to_string(),
            subject: vec!["light".to_string()],
            object: vec!["red".to_string()],
        };
        let b = Signature {
            verb: "have".to_string(),
            subject: vec!["junction".to_string()],
            object: Vec::new(),
        };
        assert!(a.canonical() < b.canonical());
        assert_eq!(a.canonical(), "be(light|red)");
    }
}
