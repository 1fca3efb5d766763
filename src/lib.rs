mod event;
mod index;
pub mod persistence;
mod record;
mod store;
pub mod util;

pub use event::{Event, EventRegistry, Handler};
pub use index::{CompositeKey, FieldIndex, FieldSet, PrimaryIndex};
pub use record::{Indexer, lexical_less};
pub use store::{IndexInfo, Phase, Selection, Store, StoreConfig, StoreError, SystemInfo};

pub mod prelude {
    pub use crate::persistence::{FactoryFn, MemoryPersister, Persistent, Persister};
    pub use crate::{
        CompositeKey, Event, FieldSet, Indexer, Store, StoreConfig, StoreError, lexical_less,
    };
    pub use derive_more::{From, Into};
    pub use rkyv::util::AlignedVec;
}
