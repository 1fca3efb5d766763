use std::sync::Arc;

use crate::Indexer;
use crate::index::FieldIndex;

/// Index chosen by [`Store::select_by`], ready for point lookups.
///
/// [`Store::select_by`]: crate::Store::select_by
#[derive(Debug)]
pub struct Selection<'a, R: Indexer> {
    index: Option<&'a FieldIndex<R>>,
}

impl<'a, R: Indexer> Selection<'a, R> {
    pub(crate) fn new(index: Option<&'a FieldIndex<R>>) -> Self {
        Self { index }
    }

    /// Records stored under the composite key `values`, in ascending order.
    ///
    /// `None` if the selected field set isn't registered, `values` has a
    /// different arity, or no record holds the key.
    pub fn lookup<S: AsRef<str>>(&self, values: &[S]) -> Option<Vec<Arc<R>>> {
        self.index?.lookup(values)
    }

    pub fn is_registered(&self) -> bool {
        self.index.is_some()
    }
}
