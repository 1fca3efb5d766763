//! Primary ordered storage of records.
//!
//! [`PrimaryIndex`] keeps at most one record per order-equivalence class.
//! Inserting a record equal to a stored one evicts the stored one first.

use std::sync::Arc;

use indexset::concurrent::set::BTreeSet;

use crate::Indexer;
use crate::util::Ordered;

#[derive(Debug)]
pub struct PrimaryIndex<R: Indexer> {
    tree: BTreeSet<Ordered<R>>,
}

impl<R: Indexer> Default for PrimaryIndex<R> {
    fn default() -> Self {
        Self {
            tree: BTreeSet::new(),
        }
    }
}

impl<R: Indexer> PrimaryIndex<R> {
    /// Returns the stored handle in `probe`'s order class.
    pub fn get(&self, probe: &Ordered<R>) -> Option<Ordered<R>> {
        self.tree
            .range(probe.clone()..=probe.clone())
            .next()
            .cloned()
    }

    /// Inserts `entry`, returning the evicted record of the same class.
    pub fn insert(&self, entry: Ordered<R>) -> Option<Ordered<R>> {
        let old = self.remove(&entry);
        self.tree.insert(entry);
        old
    }

    /// Removes and returns the stored handle in `probe`'s order class.
    pub fn remove(&self, probe: &Ordered<R>) -> Option<Ordered<R>> {
        let stored = self.get(probe)?;
        self.tree.remove(&stored);
        Some(stored)
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects expired records in ascending order. Removal is left to the
    /// caller so the tree is never mutated while being walked.
    pub fn expired(&self) -> Vec<Ordered<R>> {
        self.tree
            .iter()
            .filter(|entry| entry.is_expired())
            .cloned()
            .collect()
    }

    pub fn ascend<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        for entry in self.tree.iter() {
            if !visit(entry.record()) {
                break;
            }
        }
    }

    pub fn descend<F>(&self, mut visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        for entry in self.tree.iter().rev() {
            if !visit(entry.record()) {
                break;
            }
        }
    }

    /// Visits records greater than or equal to `pivot` in ascending order.
    pub fn ascend_from<F>(&self, pivot: Ordered<R>, mut visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        for entry in self.tree.range(pivot..) {
            if !visit(entry.record()) {
                break;
            }
        }
    }

    /// Visits records less than or equal to `pivot` in descending order.
    pub fn descend_from<F>(&self, pivot: Ordered<R>, mut visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        for entry in self.tree.range(..=pivot).rev() {
            if !visit(entry.record()) {
                break;
            }
        }
    }
}
