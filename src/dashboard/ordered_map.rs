//! A map that remembers the order in which keys were first inserted.

use std::{collections::HashMap, hash::Hash};

/// An associative container that iterates in first-insertion order.
///
/// Updating the value of an existing key does not change its position.
#[derive(Debug, Clone)]
pub(super) struct InsertionOrderedMap<K, V> {
    entries: Vec<(K, V)>,
    positions: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash, V> InsertionOrderedMap<K, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Get a mutable reference to the value for `key`, inserting `V::default()`
    /// at the end if the key is new.
    pub fn entry_or_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let position = match self.positions.get(&key) {
            Some(&position) => position,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, V::default()));
                self.entries.len() - 1
            }
        };

        &mut self.entries[position].1
    }

    /// Set the value for `key`, keeping the key's original position if it was
    /// already present.
    pub fn upsert(&mut self, key: K, value: V) {
        match self.positions.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let position = *self.positions.get(key)?;
        Some(&mut self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.entries
    }
}
