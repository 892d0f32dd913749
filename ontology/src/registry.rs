//! The symbol registry: run-scoped table of minted classes and properties.
//!
//! Lookups go through semantic keys ([`ClassKey`], [`Signature`]) and an
//! explicit compatibility predicate; names are only used to keep emitted
//! local names unique. New symbols are never written straight into the
//! registry. A compilation step opens a [`Staging`] scope, which reads the
//! committed entries plus its own drafts, and hands back a [`Delta`] that is
//! committed in one piece. Dropping the scope discards everything it minted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ClassDescriptor, ClassKey, PropertyDescriptor, Signature, Symbol};

/// Snapshot format version written by [`Registry::to_json`].
pub const SNAPSHOT_FORMAT: u32 = 1;

/// Errors raised while loading or committing to a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two entries share a local name.
    #[error("duplicate symbol name: {0}")]
    DuplicateName(String),

    /// A delta was staged against an older registry state.
    #[error("stale delta: staged against {staged} entries, registry now has {current}")]
    StaleDelta {
        /// Registry length when the scope was opened.
        staged: usize,
        /// Registry length at commit time.
        current: usize,
    },

    /// The snapshot was written by an unknown format version.
    #[error("unsupported registry snapshot format {0}")]
    UnsupportedFormat(u32),

    /// The snapshot is not valid JSON.
    #[error("invalid registry snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// A name that had to be disambiguated because an incompatible symbol held it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collision {
    /// The name derived from the symbol's semantics.
    pub requested: String,
    /// The suffixed name actually minted.
    pub assigned: String,
}

/// Position in mint order, used to slice out the symbols minted since.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

#[derive(Serialize, Deserialize)]
struct Snapshot {
    format: u32,
    symbols: Vec<Symbol>,
}

/// Run-scoped table of minted symbols, in mint order.
#[derive(Debug, Default, Clone)]
pub struct Registry {
    symbols: Vec<Symbol>,
    names: HashMap<String, usize>,
    class_keys: HashMap<ClassKey, Vec<usize>>,
    signatures: HashMap<Signature, Vec<usize>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from symbols in mint order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if two symbols share a name.
    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for symbol in symbols {
            registry.insert(symbol)?;
        }
        Ok(registry)
    }

    /// Loads a registry snapshot previously written by [`Registry::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, the format is unknown, or
    /// the snapshot contains duplicate names.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        if snapshot.format != SNAPSHOT_FORMAT {
            return Err(RegistryError::UnsupportedFormat(snapshot.format));
        }
        Self::from_symbols(snapshot.symbols)
    }

    /// Serializes the registry to a pretty-printed JSON snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let snapshot = Snapshot {
            format: SNAPSHOT_FORMAT,
            symbols: self.symbols.clone(),
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if no symbol has been minted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// All symbols in mint order.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Looks up a symbol by local name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.names.get(name).map(|&i| &self.symbols[i])
    }

    /// Looks up a class by local name.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        match self.get(name) {
            Some(Symbol::Class(c)) => Some(c),
            _ => None,
        }
    }

    /// Looks up a property by local name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        match self.get(name) {
            Some(Symbol::Property(p)) => Some(p),
            _ => None,
        }
    }

    /// Iterates over all classes in mint order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Class(c) => Some(c),
            Symbol::Property(_) => None,
        })
    }

    /// Iterates over all properties in mint order.
    pub fn properties(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.symbols.iter().filter_map(|s| match s {
            Symbol::Property(p) => Some(p),
            Symbol::Class(_) => None,
        })
    }

    /// Returns the first class compatible with `draft`.
    #[must_use]
    pub fn find_class(&self, draft: &ClassDescriptor) -> Option<&ClassDescriptor> {
        self.class_keys
            .get(&draft.key)
            .into_iter()
            .flatten()
            .filter_map(|&i| match &self.symbols[i] {
                Symbol::Class(c) => Some(c),
                Symbol::Property(_) => None,
            })
            .find(|c| c.is_compatible(draft))
    }

    /// Returns the first property compatible with `draft`.
    #[must_use]
    pub fn find_property(&self, draft: &PropertyDescriptor) -> Option<&PropertyDescriptor> {
        self.signatures
            .get(&draft.signature)
            .into_iter()
            .flatten()
            .filter_map(|&i| match &self.symbols[i] {
                Symbol::Property(p) => Some(p),
                Symbol::Class(_) => None,
            })
            .find(|p| p.is_compatible(draft))
    }

    /// Returns true if a symbol already holds `name`.
    #[must_use]
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Current position in mint order.
    #[must_use]
    pub fn mark(&self) -> Mark {
        Mark(self.symbols.len())
    }

    /// Symbols minted after `mark`, in mint order.
    #[must_use]
    pub fn minted_since(&self, mark: Mark) -> &[Symbol] {
        self.symbols.get(mark.0..).unwrap_or(&[])
    }

    /// Opens a staging scope over the current state.
    #[must_use]
    pub fn stage(&self) -> Staging<'_> {
        Staging {
            base: self,
            staged: Vec::new(),
            collisions: Vec::new(),
        }
    }

    /// Commits a staged delta atomically.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::StaleDelta`] if other symbols were committed
    /// since the delta's scope was opened, or [`RegistryError::DuplicateName`]
    /// if a staged name is already held. Nothing is inserted in either case.
    pub fn commit(&mut self, delta: Delta) -> Result<Vec<Collision>, RegistryError> {
        if delta.base_len != self.symbols.len() {
            return Err(RegistryError::StaleDelta {
                staged: delta.base_len,
                current: self.symbols.len(),
            });
        }
        if let Some(taken) = delta.symbols.iter().find(|s| self.is_name_taken(s.name())) {
            return Err(RegistryError::DuplicateName(taken.name().to_string()));
        }
        for symbol in delta.symbols {
            self.insert(symbol)?;
        }
        Ok(delta.collisions)
    }

    fn insert(&mut self, symbol: Symbol) -> Result<(), RegistryError> {
        let index = self.symbols.len();
        if self.names.contains_key(symbol.name()) {
            return Err(RegistryError::DuplicateName(symbol.name().to_string()));
        }
        self.names.insert(symbol.name().to_string(), index);
        match &symbol {
            Symbol::Class(c) => self.class_keys.entry(c.key.clone()).or_default().push(index),
            Symbol::Property(p) => self
                .signatures
                .entry(p.signature.clone())
                .or_default()
                .push(index),
        }
        self.symbols.push(symbol);
        Ok(())
    }
}

/// Symbols minted by one staging scope, ready to commit.
#[derive(Debug)]
pub struct Delta {
    base_len: usize,
    symbols: Vec<Symbol>,
    collisions: Vec<Collision>,
}

impl Delta {
    /// Symbols the delta would add.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Names disambiguated while staging.
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }
}

/// A read-through overlay on a [`Registry`] that collects new symbols.
#[derive(Debug)]
pub struct Staging<'r> {
    base: &'r Registry,
    staged: Vec<Symbol>,
    collisions: Vec<Collision>,
}

impl Staging<'_> {
    /// Returns the name of a class compatible with `draft`, minting it if none
    /// exists. The draft's name is the requested name; it is suffixed if an
    /// incompatible symbol already holds it.
    pub fn ensure_class(&mut self, mut draft: ClassDescriptor) -> String {
        if let Some(existing) = self.find_class(&draft) {
            tracing::debug!(class = %existing.name, "reusing class");
            return existing.name.clone();
        }
        draft.name = self.allocate_name(&draft.name);
        tracing::debug!(class = %draft.name, "minting class");
        let name = draft.name.clone();
        self.staged.push(Symbol::Class(draft));
        name
    }

    /// Returns the name of a property compatible with `draft`, minting it if
    /// none exists.
    pub fn ensure_property(&mut self, mut draft: PropertyDescriptor) -> String {
        if let Some(existing) = self.find_property(&draft) {
            tracing::debug!(property = %existing.name, "reusing property");
            return existing.name.clone();
        }
        draft.name = self.allocate_name(&draft.name);
        tracing::debug!(property = %draft.name, domain = %draft.domain, "minting property");
        let name = draft.name.clone();
        self.staged.push(Symbol::Property(draft));
        name
    }

    /// Looks up a class compatible with `draft` in the registry or this scope.
    #[must_use]
    pub fn find_class(&self, draft: &ClassDescriptor) -> Option<&ClassDescriptor> {
        self.base.find_class(draft).or_else(|| {
            self.staged.iter().find_map(|s| match s {
                Symbol::Class(c) if c.is_compatible(draft) => Some(c),
                _ => None,
            })
        })
    }

    /// Looks up a property compatible with `draft` in the registry or this
    /// scope.
    #[must_use]
    pub fn find_property(&self, draft: &PropertyDescriptor) -> Option<&PropertyDescriptor> {
        self.base.find_property(draft).or_else(|| {
            self.staged.iter().find_map(|s| match s {
                Symbol::Property(p) if p.is_compatible(draft) => Some(p),
                _ => None,
            })
        })
    }

    /// Looks up a class by name in the registry or this scope.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.base.class(name).or_else(|| {
            self.staged.iter().find_map(|s| match s {
                Symbol::Class(c) if c.name == name => Some(c),
                _ => None,
            })
        })
    }

    /// Returns true if `name` is held in the registry or this scope.
    #[must_use]
    pub fn is_name_taken(&self, name: &str) -> bool {
        self.base.is_name_taken(name) || self.staged.iter().any(|s| s.name() == name)
    }

    /// Number of symbols staged so far.
    #[must_use]
    pub fn staged_len(&self) -> usize {
        self.staged.len()
    }

    /// Closes the scope, returning its symbols for [`Registry::commit`].
    #[must_use]
    pub fn into_delta(self) -> Delta {
        Delta {
            base_len: self.base.len(),
            symbols: self.staged,
            collisions: self.collisions,
        }
    }

    fn allocate_name(&mut self, requested: &str) -> String {
        if !self.is_name_taken(requested) {
            return requested.to_string();
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format!("{requested}_{suffix}");
            if !self.is_name_taken(&candidate) {
                tracing::warn!(
                    requested,
                    assigned = %candidate,
                    "symbol name held by an incompatible descriptor; disambiguating"
                );
                self.collisions.push(Collision {
                    requested: requested.to_string(),
                    assigned: candidate.clone(),
                });
                return candidate;
            }
            suffix += 1;
        }
    }
}
