// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered, duplicate-free sequence.

use indexmap::IndexSet;
use std::hash::Hash;

/// An ordered set of items.
///
/// Behaves like a list whose `push` ignores items already present. Removal
/// keeps the order of the remaining items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T: Hash + Eq> {
    items: IndexSet<T>,
}

impl<T: Hash + Eq> Collection<T> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            items: IndexSet::new(),
        }
    }

    /// Append an item. Returns `false` if it was already present.
    pub fn push(&mut self, item: T) -> bool {
        self.items.insert(item)
    }

    /// Remove an item. Returns `false` if it was not present.
    pub fn remove(&mut self, item: &T) -> bool {
        self.items.shift_remove(item)
    }

    /// Check membership
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// First item, if any
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Hash + Eq + Clone> Collection<T> {
    /// Copy the items into a vector
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: Hash + Eq> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: Hash + Eq> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
