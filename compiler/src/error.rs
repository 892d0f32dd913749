//! Compilation errors.

use lexowl_ontology::RegistryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a clause could not be compiled, or a warning raised while compiling it.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The clause record is missing a subject or conclusion, or a condition
    /// has no identifiable subject and verb.
    #[error("malformed clause: {reason}")]
    MalformedClause {
        /// What is missing.
        reason: String,
    },

    /// A new symbol's name was held by an incompatible descriptor. The
    /// compiler resolves this with a suffix; it is reported, never fatal.
    #[error("symbol name '{requested}' is held by an incompatible descriptor; minted '{assigned}'")]
    SymbolCollision {
        /// The name derived from the symbol's semantics.
        requested: String,
        /// The suffixed name minted instead.
        assigned: String,
    },

    /// The conclusion yields no boolean predicate to build a lattice over.
    #[error("unencodable rule: conclusion '{conclusion}' yields no observable predicate")]
    UnencodableRule {
        /// The conclusion text.
        conclusion: String,
    },

    /// Committing the clause's symbols failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl CompileError {
    /// Builds a [`CompileError::MalformedClause`].
    pub fn malformed(reason: impl Into<String>) -> Self {
        CompileError::MalformedClause {
            reason: reason.into(),
        }
    }

    /// The report category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompileError::MalformedClause { .. } => ErrorKind::MalformedClause,
            CompileError::SymbolCollision { .. } => ErrorKind::SymbolCollision,
            CompileError::UnencodableRule { .. } => ErrorKind::UnencodableRule,
            CompileError::Registry(_) => ErrorKind::Registry,
        }
    }
}

/// Report category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`CompileError::MalformedClause`].
    MalformedClause,
    /// See [`CompileError::SymbolCollision`].
    SymbolCollision,
    /// See [`CompileError::UnencodableRule`].
    UnencodableRule,
    /// See [`CompileError::Registry`].
    Registry,
}
