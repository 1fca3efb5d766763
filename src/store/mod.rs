mod config;
mod select;
mod system_info;

use std::sync::Arc;

use derive_more::{Display, Error};
use tracing::{debug, trace, warn};

use crate::event::{Event, EventRegistry};
use crate::index::{CompositeKey, FieldIndex, FieldSet, PrimaryIndex};
use crate::persistence::{Persistent, Persister};
use crate::Indexer;
use crate::util::Ordered;

pub use config::StoreConfig;
pub use select::Selection;
pub use system_info::{IndexInfo, SystemInfo};

/// Lifecycle stage of a [`Store`].
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Phase {
    /// Field sets may still be registered.
    Configuring,
    /// A mutation happened, the field sets are frozen.
    Active,
}

#[derive(Debug, Display, Error)]
pub enum StoreError {
    #[display("failed to save `{id}`: {report}")]
    Save { id: String, report: eyre::Report },
    #[display("failed to remove `{id}`: {report}")]
    Remove { id: String, report: eyre::Report },
    #[display("failed to remove expired records {ids:?}")]
    Expire {
        ids: Vec<String>,
        reports: Vec<eyre::Report>,
    },
    #[display("failed to load records: {report}")]
    Load { report: eyre::Report },
}

struct Persistence<R> {
    persister: Box<dyn Persister<R>>,
    id_of: fn(&R) -> String,
}

/// In-memory working set of `R` records.
///
/// Records live in one primary tree ordered by [`Indexer::less`] and in one
/// bucket per registered [`FieldSet`]. Every mutation keeps both in step,
/// notifies the subscribers registered with [`Store::on`] and reports to the
/// attached [`Persister`], if any.
///
/// Mutations take `&mut self` and reads take `&self`, so a store shared
/// between threads is wrapped in a single lock by its owner.
pub struct Store<R: Indexer> {
    name: String,
    phase: Phase,
    primary: PrimaryIndex<R>,
    indexes: Vec<FieldIndex<R>>,
    events: EventRegistry<R>,
    persistence: Option<Persistence<R>>,
}

impl<R: Indexer> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .field("phase", &self.phase)
            .field("records", &self.primary.len())
            .field("fields", &self.fields())
            .field("events", &self.events)
            .field("persistent", &self.persistence.is_some())
            .finish()
    }
}

impl<R: Indexer> Default for Store<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Indexer> Store<R> {
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a store named after `config`, with its field sets registered
    /// in order.
    ///
    /// # Panics
    ///
    /// If one of the configured field sets is empty.
    pub fn with_config(config: StoreConfig) -> Self {
        let mut store = Self {
            name: config.name,
            phase: Phase::Configuring,
            primary: PrimaryIndex::default(),
            indexes: vec![],
            events: EventRegistry::default(),
            persistence: None,
        };
        for fields in config.fields {
            store.register(fields);
        }
        store
    }

    /// Attaches the persister every later mutation is reported to.
    pub fn with_persister<P>(mut self, persister: P) -> Self
    where
        R: Persistent,
        P: Persister<R> + 'static,
    {
        self.persistence = Some(Persistence {
            persister: Box::new(persister),
            id_of: <R as Persistent>::persist_id,
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Registers a secondary index over `names`, in the given order.
    ///
    /// # Panics
    ///
    /// If the store already saw a mutation, or `names` is empty.
    pub fn create_field<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(FieldSet::new(names));
    }

    fn register(&mut self, fields: FieldSet) {
        if self.is_active() {
            panic!(
                "store `{}` is active, field set ({fields}) can't be registered",
                self.name
            );
        }
        if fields.is_empty() {
            panic!("store `{}` can't register an empty field set", self.name);
        }
        debug!(store = %self.name, %fields, "registered field set");
        self.indexes.push(FieldIndex::new(fields));
    }

    fn activate(&mut self) {
        if self.phase == Phase::Configuring {
            trace!(store = %self.name, "store activated");
            self.phase = Phase::Active;
        }
    }

    /// Subscribes `handler` to every future `event`.
    ///
    /// Handlers run on the mutating thread, in registration order, before the
    /// mutation returns.
    pub fn on<F>(&mut self, event: Event, handler: F)
    where
        F: Fn(Event, Option<&Arc<R>>, Option<&Arc<R>>) + Send + Sync + 'static,
    {
        self.events.on(event, handler);
    }

    /// Stores `record`, replacing the record of the same order class.
    ///
    /// Returns the replaced record. A failed durable save is reported as
    /// [`StoreError::Save`], the in-memory change is kept.
    pub fn put(&mut self, record: impl Into<Arc<R>>) -> Result<Option<Arc<R>>, StoreError> {
        self.activate();
        let record = record.into();
        let old = self.insert(record.clone());
        self.save(&record)?;
        Ok(old)
    }

    fn insert(&mut self, record: Arc<R>) -> Option<Arc<R>> {
        let keys = self
            .indexes
            .iter()
            .map(|index| index.fields().key_of(&*record))
            .collect();
        let entry = Ordered::indexed(record, keys);
        let old = self.primary.insert(entry.clone());
        if let Some(old) = &old {
            self.unindex(old);
        }
        for (index, key) in self.indexes.iter().zip(entry.keys()) {
            index.insert(key.clone(), &entry);
        }

        let old = old.map(|o| o.record().clone());
        if old.is_some() {
            trace!(store = %self.name, "updated record");
            self.events
                .dispatch(Event::Update, old.as_ref(), Some(entry.record()));
        } else {
            trace!(store = %self.name, "inserted record");
            self.events.dispatch(Event::Insert, None, Some(entry.record()));
        }
        old
    }

    /// Drops a stored entry from every bucket, using the keys it was put with.
    fn unindex(&self, entry: &Ordered<R>) {
        for (index, key) in self.indexes.iter().zip(entry.keys()) {
            index.remove(key, entry);
        }
    }

    /// Returns the stored record in `probe`'s order class.
    pub fn get(&self, probe: impl Into<Arc<R>>) -> Option<Arc<R>> {
        let probe = Ordered::from(probe.into());
        self.primary.get(&probe).map(|e| e.record().clone())
    }

    /// Removes the stored record in `probe`'s order class.
    ///
    /// The probe only has to order like the stored record, the returned record
    /// is the stored one.
    pub fn delete(&mut self, probe: impl Into<Arc<R>>) -> Result<Option<Arc<R>>, StoreError> {
        self.activate();
        let probe = Ordered::from(probe.into());
        let Some(old) = self.primary.remove(&probe) else {
            return Ok(None);
        };
        self.unindex(&old);

        let old = old.record().clone();
        trace!(store = %self.name, "removed record");
        self.events.dispatch(Event::Remove, Some(&old), None);
        self.forget(&old)
            .map_err(|(id, report)| StoreError::Remove { id, report })?;
        Ok(Some(old))
    }

    /// Drops every record reporting [`Indexer::is_expired`], in ascending
    /// order.
    ///
    /// All expired records leave memory even when some durable removals
    /// fail; those are listed in [`StoreError::Expire`].
    pub fn expire(&mut self) -> Result<Vec<Arc<R>>, StoreError> {
        self.activate();
        let expired = self.primary.expired();

        let mut removed = Vec::with_capacity(expired.len());
        let mut ids = vec![];
        let mut reports = vec![];
        for entry in expired {
            self.primary.remove(&entry);
            self.unindex(&entry);

            let old = entry.record().clone();
            trace!(store = %self.name, "expired record");
            self.events.dispatch(Event::Expiry, Some(&old), None);
            if let Err((id, report)) = self.forget(&old) {
                ids.push(id);
                reports.push(report);
            }
            removed.push(old);
        }
        debug!(
            store = %self.name,
            expired = removed.len(),
            failed = ids.len(),
            "expiry sweep finished"
        );

        if ids.is_empty() {
            Ok(removed)
        } else {
            Err(StoreError::Expire { ids, reports })
        }
    }

    /// Replays every record kept by the persister into the store.
    ///
    /// Events fire as for [`Store::put`], records are not saved back. Returns
    /// the count of loaded records, `0` when no persister is attached.
    pub fn load(&mut self) -> Result<usize, StoreError> {
        self.activate();
        let Some(persistence) = &self.persistence else {
            return Ok(0);
        };

        let mut records = vec![];
        persistence
            .persister
            .load(&mut |_, record| records.push(record))
            .map_err(|report| {
                warn!(store = %self.name, error = %report, "failed to load records");
                StoreError::Load { report }
            })?;

        let count = records.len();
        for record in records {
            self.insert(Arc::new(record));
        }
        debug!(store = %self.name, count, "loaded records");
        Ok(count)
    }

    fn save(&self, record: &R) -> Result<(), StoreError> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };
        let id = (persistence.id_of)(record);
        persistence.persister.save(&id, record).map_err(|report| {
            warn!(store = %self.name, %id, error = %report, "failed to save record");
            StoreError::Save { id, report }
        })
    }

    fn forget(&self, record: &R) -> Result<(), (String, eyre::Report)> {
        let Some(persistence) = &self.persistence else {
            return Ok(());
        };
        let id = (persistence.id_of)(record);
        persistence.persister.remove(&id).map_err(|report| {
            warn!(store = %self.name, %id, error = %report, "failed to remove record");
            (id, report)
        })
    }

    fn index_of<S: AsRef<str>>(&self, names: &[S]) -> Option<&FieldIndex<R>> {
        self.indexes.iter().find(|i| i.fields().matches(names))
    }

    /// Selects the index registered over exactly `names`, in order.
    pub fn select_by<S: AsRef<str>>(&self, names: &[S]) -> Selection<'_, R> {
        Selection::new(self.index_of(names))
    }

    /// Populated composite keys of the index over `names`, in no particular
    /// order. Empty if no such index is registered.
    pub fn keys<S: AsRef<str>>(&self, names: &[S]) -> Vec<CompositeKey> {
        self.index_of(names)
            .map(FieldIndex::keys)
            .unwrap_or_default()
    }

    /// Registered field sets in registration order.
    pub fn fields(&self) -> Vec<Vec<String>> {
        self.indexes
            .iter()
            .map(|i| i.fields().names().to_vec())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    /// Visits every record in ascending order until `visit` returns `false`.
    ///
    /// The visitor only gets shared access, the store can't change under a
    /// running traversal.
    pub fn ascend<F>(&self, visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        self.primary.ascend(visit)
    }

    pub fn descend<F>(&self, visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        self.primary.descend(visit)
    }

    /// Like [`Store::ascend`], starting at the first record not less than
    /// `pivot`. The pivot doesn't have to be stored.
    pub fn ascend_from<F>(&self, pivot: impl Into<Arc<R>>, visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        self.primary.ascend_from(Ordered::from(pivot.into()), visit)
    }

    /// Like [`Store::descend`], starting at the last record not greater than
    /// `pivot`.
    pub fn descend_from<F>(&self, pivot: impl Into<Arc<R>>, visit: F)
    where
        F: FnMut(&Arc<R>) -> bool,
    {
        self.primary.descend_from(Ordered::from(pivot.into()), visit)
    }

    pub fn system_info(&self) -> SystemInfo {
        SystemInfo {
            name: self.name.clone(),
            phase: self.phase,
            records: self.primary.len(),
            indexes: self
                .indexes
                .iter()
                .map(|index| IndexInfo {
                    fields: index.fields().clone(),
                    keys: index.key_count(),
                    records: index.record_count(),
                })
                .collect(),
        }
    }
}
