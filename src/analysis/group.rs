//! Insertion-ordered grouping primitives
//!
//! The ranking contracts break ties by first-seen order over the
//! filtered view, so grouping containers must expose the order keys
//! were first inserted instead of whatever a hash map happens to yield.

use std::{collections::HashMap, hash::Hash};

/// Grouping map that iterates in first-insertion order.
#[derive(Debug)]
pub struct OrderedGroups<K, V> {
    index: HashMap<K, usize>,
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedGroups<K, V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> OrderedGroups<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The value under `key`, inserting `init()` on first sight.
    pub fn entry(&mut self, key: K, init: impl FnOnce() -> V) -> &mut V {
        let slot = *self.index.entry(key.clone()).or_insert_with(|| {
            self.entries.push((key, init()));
            self.entries.len() - 1
        });
        &mut self.entries[slot].1
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}

/// Stable descending sort by `score`, truncated to `limit`.
///
/// Ties keep their existing order, which for entries coming out of
/// [`OrderedGroups`] is first-seen order.
pub fn rank_and_truncate<T>(
    mut items: Vec<T>,
    limit: usize,
    score: impl Fn(&T) -> u64,
) -> Vec<T> {
    items.sort_by(|a, b| score(b).cmp(&score(a)));
    items.truncate(limit);
    items
}
