use std::fmt;

use prettytable::{Table, row};

use crate::index::FieldSet;
use crate::store::Phase;

/// Snapshot of one secondary index.
#[derive(Clone, Debug)]
pub struct IndexInfo {
    pub fields: FieldSet,
    /// Populated composite keys.
    pub keys: usize,
    pub records: usize,
}

/// Snapshot of a [`Store`](crate::Store) for diagnostics.
#[derive(Clone, Debug)]
pub struct SystemInfo {
    pub name: String,
    pub phase: Phase,
    pub records: usize,
    pub indexes: Vec<IndexInfo>,
}

impl fmt::Display for SystemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "store `{}` ({}), {} records",
            self.name, self.phase, self.records
        )?;
        if self.indexes.is_empty() {
            return Ok(());
        }

        let mut table = Table::new();
        table.add_row(row!["fields", "keys", "records"]);
        for index in &self.indexes {
            table.add_row(row![index.fields, index.keys, index.records]);
        }
        write!(f, "{table}")
    }
}
