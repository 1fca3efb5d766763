use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Indexer;

/// Composite key of a [`FieldSet`]: one field value per field name.
pub type CompositeKey = Vec<String>;

/// Ordered tuple of field names one secondary index is built over.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldSet(Vec<String>);

impl FieldSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact, order-sensitive match against a list of names.
    pub fn matches<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.0.len() == names.len()
            && self
                .0
                .iter()
                .zip(names)
                .all(|(own, other)| own == other.as_ref())
    }

    pub fn key_of<R: Indexer>(&self, record: &R) -> CompositeKey {
        self.0.iter().map(|name| record.field(name)).collect()
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<FieldSet> for Vec<String> {
    fn from(set: FieldSet) -> Self {
        set.0
    }
}
