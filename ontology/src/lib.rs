//! Ontology model, symbol registry, and Turtle serialization for lexowl.
//!
//! The `lexowl-ontology` crate holds the vocabulary every compiled rule is
//! expressed in: class and property descriptors, restriction trees over
//! boolean properties, and the [`Registry`] that keeps minted symbols unique
//! and reusable across the clauses of a run.
//!
//! # Entry Point
//!
//! ```
//! use lexowl_ontology::{ClassDescriptor, ClassKey, Registry};
//!
//! let mut registry = Registry::new();
//! let mut scope = registry.stage();
//! let agent = scope.ensure_class(ClassDescriptor::new(
//!     "Agent",
//!     ClassKey::Root { name: "Agent".to_string() },
//!     "Agent",
//!     None,
//! ));
//! assert_eq!(agent, "Agent");
//! let delta = scope.into_delta();
//! registry.commit(delta).unwrap();
//! assert_eq!(registry.len(), 1);
//! ```
//!
//! # Serialization
//!
//! ```
//! use lexowl_ontology::serializer::turtle::{to_turtle, DocumentHeader};
//!
//! let header = DocumentHeader {
//!     base_iri: "http://example.org/highway_code#".to_string(),
//!     ontology_iri: "http://example.org/highway_code".to_string(),
//!     label: "Highway Code".to_string(),
//!     version: "0.1.0".to_string(),
//! };
//! let turtle = to_turtle(&header, &[]);
//! assert!(turtle.contains("owl:Ontology"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod model;
pub mod registry;
pub mod serializer;

pub use model::iris;
pub use model::{
    Branch, ClassDescriptor, ClassKey, DeonticAnnotation, LiteralKind, Modality,
    PropertyDescriptor, Provenance, Range, RestrictionExpr, Signature, Symbol,
};
pub use registry::{Collision, Delta, Mark, Registry, RegistryError, Staging};
