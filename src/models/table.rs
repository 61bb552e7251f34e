//! Insertion-ordered in-memory table.

use std::collections::HashMap;

/// In-memory table keyed by record id.
///
/// Iteration follows insertion order. Removing a record leaves the relative
/// order of the remaining records unchanged.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: HashMap<String, T>,
    order: Vec<String>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Inserts a record. Replacing an existing id keeps its original position.
    pub fn insert(&mut self, id: String, row: T) -> Option<T> {
        if let Some(existing) = self.rows.get_mut(&id) {
            return Some(std::mem::replace(existing, row));
        }
        self.order.push(id.clone());
        self.rows.insert(id, row);
        None
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.rows.get_mut(id)
    }

    /// Removes a record, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let row = self.rows.remove(id)?;
        self.order.retain(|key| key != id);
        Some(row)
    }

    /// Iterates over records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.rows.get(id))
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.order.clear();
    }
}

/// Offset/limit window over an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: usize,
    pub limit: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 10;
    pub const MAX_LIMIT: usize = 100;

    pub const fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Applies the window to an iterator. A `skip` past the end yields nothing.
    pub fn apply<I: Iterator>(self, iter: I) -> std::iter::Take<std::iter::Skip<I>> {
        iter.skip(self.skip).take(self.limit)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}
