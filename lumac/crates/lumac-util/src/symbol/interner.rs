//! String interner implementation using DashMap for concurrent access.
//!
//! The forward map (string → index) is a lock-free DashMap keyed by the
//! leaked `'static` string, hashed with AHasher. The reverse table
//! (index → string) is a plain vector behind a parking_lot RwLock; reads
//! dominate and never contend with each other.
//!
//! Strings are allocated once and leaked to obtain `'static` lifetime.
//! The table lives for the program duration and entries are never removed,
//! so no reference counting is needed.

use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::LazyLock;

/// Global string table instance, initialized on first use.
pub(super) static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(StringTable::new);

/// Thread-safe string table backing [`super::Symbol`].
pub(super) struct StringTable {
    /// Maps interned string to its symbol index.
    map: DashMap<&'static str, u32, RandomState>,

    /// Reverse lookup: symbol index to interned string.
    strings: RwLock<Vec<&'static str>>,
}

impl StringTable {
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
        }
    }

    /// Intern a string, returning its index.
    pub(super) fn intern(&self, string: &str) -> u32 {
        if let Some(entry) = self.map.get(string) {
            return *entry;
        }

        // Miss: take the write lock and re-check, so two racing interns of
        // the same new string agree on a single index.
        let mut strings = self.strings.write();
        if let Some(entry) = self.map.get(string) {
            return *entry;
        }

        let interned: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let index = strings.len() as u32;
        strings.push(interned);
        self.map.insert(interned, index);
        index
    }

    /// Look up the string for an index.
    ///
    /// # Panics
    ///
    /// Panics if the index was not produced by [`Self::intern`]. Symbols are
    /// only constructed through interning, so every live symbol is valid.
    pub(super) fn get(&self, index: u32) -> &'static str {
        self.strings.read()[index as usize]
    }
}
