//! A record handle ordered by the record's own [`Indexer::less`].
//!
//! [`Ordered`] wraps a shared record and implements `Eq` and `Ord` from the
//! record's ordering alone, so the same handle can sit in the primary tree
//! and in every secondary bucket. A stored entry also remembers the
//! composite keys it was indexed under, one per field set.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::Indexer;
use crate::index::CompositeKey;

/// Shared record handle compared through [`Indexer::less`].
pub struct Ordered<R> {
    record: Arc<R>,
    keys: Arc<[CompositeKey]>,
}

impl<R> From<Arc<R>> for Ordered<R> {
    /// Wraps `record` without index keys, as used for lookups and pivots.
    fn from(record: Arc<R>) -> Self {
        Self::indexed(record, vec![])
    }
}

impl<R> Ordered<R> {
    /// Wraps `record` together with the composite keys it is indexed under,
    /// in field set registration order.
    pub fn indexed(record: Arc<R>, keys: Vec<CompositeKey>) -> Self {
        Self {
            record,
            keys: keys.into(),
        }
    }

    pub fn record(&self) -> &Arc<R> {
        &self.record
    }

    /// Keys captured when the entry was indexed. Empty for probes.
    pub fn keys(&self) -> &[CompositeKey] {
        &self.keys
    }
}

impl<R: Indexer> Ordered<R> {
    /// Returns `true` if `other` is an [`Ordered`] of the same record type and
    /// this record orders before it. Any other element is never greater than
    /// a record.
    pub fn less(&self, other: &dyn Any) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| self.record.less(&other.record))
    }
}

impl<R> Clone for Ordered<R> {
    fn clone(&self) -> Self {
        Self {
            record: self.record.clone(),
            keys: self.keys.clone(),
        }
    }
}

impl<R> fmt::Debug for Ordered<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ordered")
            .field("record", &Arc::as_ptr(&self.record))
            .field("keys", &self.keys)
            .finish()
    }
}

impl<R: Indexer> PartialOrd for Ordered<R> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<R: Indexer> Ord for Ordered<R> {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.less(other) {
            Ordering::Less
        } else if other.less(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<R: Indexer> PartialEq for Ordered<R> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<R: Indexer> Eq for Ordered<R> {}

impl<R> std::ops::Deref for Ordered<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}
