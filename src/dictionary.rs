//! Bounded name dictionary used to compress repeated node names.
//!
//! Indices are handed out densely from 0 in first-insertion order, so an
//! encoder and a decoder that see the same sequence of names end up with
//! identical dictionaries.

use ahash::AHashMap;

/// Dictionary index type.
pub type Index = u16;

/// Outcome of a dictionary [`find`](Dictionary::find) or [`add`](Dictionary::add).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DictResult {
    /// Name is (or was just) stored at this index
    Index(Index),
    /// Name is absent, but there is room to add it
    NotFound,
    /// Name is absent and the dictionary is full
    Overflow,
    /// Name was already present, nothing was changed
    Duplicate,
}

impl DictResult {
    /// Get the index, if this result carries one.
    pub fn index(self) -> Option<Index> {
        match self {
            DictResult::Index(index) => Some(index),
            _ => None,
        }
    }
}

/// Bounded `name -> index` cache.
#[derive(Debug, Clone)]
pub struct Dictionary {
    max_entries: Index,
    map: AHashMap<String, Index>,
    names: Vec<String>,
}

impl Dictionary {
    /// Create an empty dictionary that holds at most `max_entries` names.
    pub fn new(max_entries: Index) -> Self {
        Self {
            max_entries,
            map: AHashMap::with_capacity(max_entries as usize),
            names: Vec::with_capacity(max_entries as usize),
        }
    }

    /// Remove all entries.
    pub fn reset(&mut self) {
        self.map.clear();
        self.names.clear();
    }

    /// Look a name up without changing the dictionary.
    ///
    /// Returns the index when present, `NotFound` when absent with room to
    /// spare and `Overflow` when absent and full.
    pub fn find(&self, name: &str) -> DictResult {
        if let Some(&index) = self.map.get(name) {
            return DictResult::Index(index);
        }
        if self.names.len() < self.max_entries as usize {
            DictResult::NotFound
        } else {
            DictResult::Overflow
        }
    }

    /// Add a name, returning its new index.
    ///
    /// Returns `Overflow` when full and `Duplicate` when the name is already
    /// present; in both cases the dictionary is unchanged.
    pub fn add(&mut self, name: &str) -> DictResult {
        if self.names.len() >= self.max_entries as usize {
            return DictResult::Overflow;
        }
        if self.map.contains_key(name) {
            return DictResult::Duplicate;
        }
        let index = self.names.len() as Index;
        self.map.insert(name.to_string(), index);
        self.names.push(name.to_string());
        DictResult::Index(index)
    }

    /// Get the name stored at `index`.
    pub fn name(&self, index: Index) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Number of stored names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if no more names can be added.
    pub fn is_full(&self) -> bool {
        self.names.len() >= self.max_entries as usize
    }

    /// Maximum number of names.
    pub fn capacity(&self) -> Index {
        self.max_entries
    }

    /// Drop every entry added after the dictionary held `len` names.
    pub(crate) fn truncate(&mut self, len: usize) {
        for name in self.names.drain(len.min(self.names.len())..) {
            self.map.remove(&name);
        }
    }
}
