//! Hand-written Turtle documents in the shape `lexowl-build` emits.
//!
//! Each constant exercises one outcome of the Turtle validator.

mod malformed;
mod minimal_rule;

pub use malformed::{MISSING_PREFIX, UNTERMINATED_STATEMENT};
pub use minimal_rule::MINIMAL_RULE;
