//! File mappings from remote keys to local destination paths
//!
//! A [`FileMapping`] translates one remote object's relative key into its
//! local destination path. A [`MappingSet`] holds a group's mappings and
//! enforces uniqueness by `original`: the first entry for a given original
//! wins, later duplicates are dropped.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One rename rule: remote relative key -> local relative destination path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMapping {
    /// Key relative to the group prefix, as listed by the store
    pub original: String,
    /// Destination path relative to the group's local folder
    pub new: String,
}

/// Ordered set of a group's file mappings, unique by `original`
#[derive(Debug, Clone, Default)]
pub struct MappingSet {
    entries: Vec<FileMapping>,
    seen: HashSet<String>,
}

impl MappingSet {
    /// Creates an empty mapping set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a mapping unless its `original` is already present
    ///
    /// Returns `true` if the mapping was added, `false` if a mapping with
    /// the same `original` already exists (first wins).
    pub fn insert(&mut self, original: impl Into<String>, new: impl Into<String>) -> bool {
        let original = original.into();
        if !self.seen.insert(original.clone()) {
            return false;
        }
        self.entries.push(FileMapping {
            original,
            new: new.into(),
        });
        true
    }

    /// Whether a mapping with this `original` exists
    #[must_use]
    pub fn contains(&self, original: &str) -> bool {
        self.seen.contains(original)
    }

    /// Looks up a mapping by exact match on `original`
    #[must_use]
    pub fn get(&self, original: &str) -> Option<&FileMapping> {
        self.entries.iter().find(|m| m.original == original)
    }

    /// Number of mappings in the set
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no mappings
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates the mappings in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FileMapping> {
        self.entries.iter()
    }
}
