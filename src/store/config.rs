use serde::{Deserialize, Serialize};

use crate::index::FieldSet;

/// Settings a [`Store`] is built from.
///
/// [`Store`]: crate::Store
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name used in log records and [`SystemInfo`](crate::SystemInfo).
    pub name: String,
    /// Field sets registered at construction, in order.
    pub fields: Vec<FieldSet>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            fields: vec![],
        }
    }
}

impl StoreConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.push(FieldSet::new(names));
        self
    }
}
