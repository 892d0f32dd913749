//! Artifact validators: Turtle syntax, OWL structure, lattice partition, run report.

pub mod lattice;
pub mod owl;
pub mod run;
pub mod turtle;
