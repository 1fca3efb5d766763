//! Secondary index over one [`FieldSet`].
//!
//! Every composite key maps to a bucket holding the records that share it,
//! in primary order. A bucket is created on the first insert of its key and
//! dropped when its last record leaves, so only populated keys are visible.
//! Keys are computed by the caller once, when a record is put, and the same
//! key is handed back on removal.

use std::fmt;
use std::sync::Arc;

use indexset::concurrent::map::BTreeMap;
use indexset::concurrent::set::BTreeSet;

use crate::Indexer;
use crate::index::{CompositeKey, FieldSet};
use crate::util::Ordered;

type Bucket<R> = Arc<BTreeSet<Ordered<R>>>;

pub struct FieldIndex<R: Indexer> {
    fields: FieldSet,
    buckets: BTreeMap<CompositeKey, Bucket<R>>,
}

impl<R: Indexer> fmt::Debug for FieldIndex<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldIndex")
            .field("fields", &self.fields)
            .field("keys", &self.key_count())
            .finish()
    }
}

impl<R: Indexer> FieldIndex<R> {
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            buckets: BTreeMap::default(),
        }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    fn bucket(&self, key: &CompositeKey) -> Option<Bucket<R>> {
        self.buckets.get(key).map(|v| v.get().value.clone())
    }

    /// Adds `entry` to the bucket of `key`.
    pub fn insert(&self, key: CompositeKey, entry: &Ordered<R>) {
        if let Some(bucket) = self.bucket(&key) {
            bucket.insert(entry.clone());
        } else {
            let bucket = BTreeSet::new();
            bucket.insert(entry.clone());
            self.buckets.insert(key, Arc::new(bucket));
        }
    }

    /// Removes `entry` from the bucket of `key`, the key it was inserted
    /// under.
    pub fn remove(&self, key: &CompositeKey, entry: &Ordered<R>) {
        if let Some(bucket) = self.bucket(key) {
            bucket.remove(entry);
            if bucket.len() == 0 {
                self.buckets.remove(key);
            }
        }
    }

    /// Returns the records stored under `values`, in primary order.
    pub fn lookup<S: AsRef<str>>(&self, values: &[S]) -> Option<Vec<Arc<R>>> {
        if values.len() != self.fields.len() {
            return None;
        }
        let key = values
            .iter()
            .map(|v| v.as_ref().to_string())
            .collect::<CompositeKey>();
        let bucket = self.bucket(&key)?;
        let records = bucket
            .iter()
            .map(|entry| entry.record().clone())
            .collect::<Vec<_>>();
        Some(records)
    }

    pub fn keys(&self) -> Vec<CompositeKey> {
        self.buckets.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Count of populated composite keys.
    pub fn key_count(&self) -> usize {
        self.buckets.len()
    }

    /// Count of indexed records across all buckets.
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(|(_, bucket)| bucket.len()).sum()
    }
}
