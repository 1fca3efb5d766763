use std::collections::BTreeMap;
use std::fmt;

use eyre::WrapErr;
use parking_lot::RwLock;
use rkyv::util::AlignedVec;

use crate::persistence::{FactoryFn, Persistent, Persister};

#[derive(Debug)]
struct PersistedEntry {
    type_tag: String,
    bytes: AlignedVec,
}

/// [`Persister`] keeping encoded records in process memory.
///
/// Records are replayed in identifier order and decoded through the factory
/// given at construction.
pub struct MemoryPersister<R> {
    entries: RwLock<BTreeMap<String, PersistedEntry>>,
    factory: FactoryFn<R>,
}

impl<R> fmt::Debug for MemoryPersister<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPersister")
            .field("entries", &self.entries.read().len())
            .finish_non_exhaustive()
    }
}

impl<R> MemoryPersister<R> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str, &[u8]) -> eyre::Result<R> + Send + Sync + 'static,
    {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            factory: Box::new(factory),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }
}

impl<R> Persister<R> for MemoryPersister<R>
where
    R: Persistent,
{
    fn save(&self, id: &str, record: &R) -> eyre::Result<()> {
        let bytes = record
            .encode()
            .wrap_err_with(|| format!("failed to encode `{id}`"))?;
        let entry = PersistedEntry {
            type_tag: record.type_tag().to_string(),
            bytes,
        };
        self.entries.write().insert(id.to_string(), entry);
        Ok(())
    }

    fn load(&self, visit: &mut dyn FnMut(String, R)) -> eyre::Result<()> {
        let entries = self.entries.read();
        for (id, entry) in entries.iter() {
            let record = (self.factory)(&entry.type_tag, &entry.bytes[..])
                .wrap_err_with(|| format!("failed to decode `{id}` as `{}`", entry.type_tag))?;
            visit(id.clone(), record);
        }
        Ok(())
    }

    fn remove(&self, id: &str) -> eyre::Result<()> {
        self.entries.write().remove(id);
        Ok(())
    }
}
