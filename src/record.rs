use std::fmt::Display;

/// Capability set every value kept in a [`Store`] must provide.
///
/// Records are never keyed explicitly. Two records for which neither is
/// [`less`] than the other occupy the same primary slot, so `less` must be a
/// strict weak ordering.
///
/// [`Store`]: crate::Store
/// [`less`]: Indexer::less
pub trait Indexer: Send + Sync + 'static {
    /// Returns `true` if `self` orders strictly before `other`.
    fn less(&self, other: &Self) -> bool;

    /// Returns `true` if the record must be dropped by the next expiry sweep.
    fn is_expired(&self) -> bool;

    /// Returns the value of the named field. Unknown names yield an empty
    /// string.
    fn field(&self, name: &str) -> String;
}

/// Orders two values by their rendered text.
///
/// Useful inside [`Indexer::less`] when the compared attributes have no
/// common ordering of their own.
pub fn lexical_less<A, B>(a: A, b: B) -> bool
where
    A: Display,
    B: Display,
{
    a.to_string() < b.to_string()
}
