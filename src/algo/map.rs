//! Flat key-value diff
//!
//! Three-way diff (added / removed / updated) over two maps with unique keys,
//! used for attributes, inline styles, event handlers and class tokens.
//!
//! Callers must apply `removed` before `added` and `updated`, so that a
//! removal never lands after an add of the same key.

use std::hash::Hash;

use rustc_hash::{FxHashMap, FxHashSet};

/// Key-level changes between two maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDiff<K> {
    /// Keys present only in the new map, in new-map order
    pub added: Vec<K>,
    /// Keys present only in the old map, in old-map order
    pub removed: Vec<K>,
    /// Keys present in both maps whose values differ, in new-map order
    pub updated: Vec<K>,
}

impl<K> Default for MapDiff<K> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            removed: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<K> MapDiff<K> {
    /// Check if the maps are equal
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    /// Total number of changed keys
    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len() + self.updated.len()
    }

    /// Keys whose new value must be written (`added` then `updated`)
    pub fn upserts(&self) -> impl Iterator<Item = &K> {
        self.added.iter().chain(&self.updated)
    }
}

/// Diff two maps given as `(key, value)` slices.
///
/// Keys must be unique within each slice. Values are compared with `==`.
pub fn diff_map<K, V>(old: &[(K, V)], new: &[(K, V)]) -> MapDiff<K>
where
    K: Eq + Hash + Clone,
    V: PartialEq,
{
    let old_index: FxHashMap<&K, &V> = old.iter().map(|(k, v)| (k, v)).collect();
    let new_keys: FxHashSet<&K> = new.iter().map(|(k, _)| k).collect();

    let mut diff = MapDiff::default();

    for (key, _) in old {
        if !new_keys.contains(key) {
            diff.removed.push(key.clone());
        }
    }

    for (key, value) in new {
        match old_index.get(key) {
            None => diff.added.push(key.clone()),
            Some(old_value) if *old_value != value => diff.updated.push(key.clone()),
            Some(_) => {}
        }
    }

    diff
}

/// Diff two sets given as slices.
///
/// `updated` is always empty: set members carry no value.
pub fn diff_set<K>(old: &[K], new: &[K]) -> MapDiff<K>
where
    K: Eq + Hash + Clone,
{
    let old_set: FxHashSet<&K> = old.iter().collect();
    let new_set: FxHashSet<&K> = new.iter().collect();

    MapDiff {
        added: new.iter().filter(|k| !old_set.contains(k)).cloned().collect(),
        removed: old.iter().filter(|k| !new_set.contains(k)).cloned().collect(),
        updated: Vec::new(),
    }
}

// =============================================================================
// Tests
// =============================================================================
