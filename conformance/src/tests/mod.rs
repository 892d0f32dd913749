//! Turtle fixtures for the conformance validators.

pub mod fixtures;
