//! Serializers for compiled ontology fragments.
//!
//! Only **Turtle** ([`turtle`]) is produced; it is the format the downstream
//! reasoning and query tooling loads.

pub mod turtle;
