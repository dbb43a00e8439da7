// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Keyed record registry with uniqueness enforcement.
//!
//! Each [`Market`](crate::Market) owns two independent instances: one for
//! vendors, one for customers. Insertion rejects duplicate IDs; lookups and
//! removals report absence so the aggregate can map it to the right
//! not-found error for the record kind.

use crate::MarketError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::hash::Hash;

/// Registry of records keyed by caller-chosen IDs.
///
/// IDs are never generated here; callers pick them and are responsible for
/// avoiding collisions across calls.
#[derive(Debug)]
pub struct Registry<K, T> {
    records: HashMap<K, T>,
}

impl<K: Copy + Eq + Hash + Ord, T> Registry<K, T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Returns true if a record is registered under `id`.
    pub fn exists(&self, id: K) -> bool {
        self.records.contains_key(&id)
    }

    /// Inserts a record under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketError::DuplicateId`] if `id` is already registered.
    /// The existing record is left untouched.
    pub fn insert(&mut self, id: K, record: T) -> Result<(), MarketError> {
        // Entry API: check-and-insert without a double lookup.
        match self.records.entry(id) {
            Entry::Occupied(_) => Err(MarketError::DuplicateId),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    /// Retrieves a record by ID, or `None` if absent.
    pub fn get(&self, id: K) -> Option<&T> {
        self.records.get(&id)
    }

    /// Retrieves a mutable record by ID, or `None` if absent.
    pub fn get_mut(&mut self, id: K) -> Option<&mut T> {
        self.records.get_mut(&id)
    }

    /// Removes and returns the record under `id`, or `None` if absent.
    pub fn remove(&mut self, id: K) -> Option<T> {
        self.records.remove(&id)
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no records are registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over all records in ascending ID order.
    ///
    /// Sorted so that reports built from the registry are deterministic.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (K, &T)> {
        let mut entries: Vec<(K, &T)> = self.records.iter().map(|(id, r)| (*id, r)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries.into_iter()
    }
}

impl<K: Copy + Eq + Hash + Ord, T> Default for Registry<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
