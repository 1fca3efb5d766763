//! Durability hook of the [`Store`].
//!
//! The store never owns a storage format. It hands records to a
//! [`Persister`] under an identifier taken from [`Persistent::persist_id`],
//! and asks it to replay them on [`Store::load`]. Failures here never undo
//! the in-memory change that triggered them.
//!
//! [`Store`]: crate::Store
//! [`Store::load`]: crate::Store::load

mod memory;

use std::sync::Arc;

use rkyv::api::high::{HighDeserializer, HighSerializer, HighValidator};
use rkyv::bytecheck::CheckBytes;
use rkyv::rancor::Error;
use rkyv::ser::allocator::ArenaHandle;
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize, Serialize};

pub use memory::MemoryPersister;

/// Records that can be handed to a [`Persister`].
pub trait Persistent {
    /// Identifier the record is saved and removed under.
    fn persist_id(&self) -> String;

    /// Discriminator passed back to the [`FactoryFn`] on load.
    fn type_tag(&self) -> &str;

    /// Encoded payload, usually produced with [`encode`].
    fn encode(&self) -> eyre::Result<AlignedVec>;
}

/// Durable storage the store reports its mutations to.
pub trait Persister<R>: Send + Sync {
    /// Persists or overwrites `record` under `id`.
    fn save(&self, id: &str, record: &R) -> eyre::Result<()>;

    /// Calls `visit` once per persisted record.
    fn load(&self, visit: &mut dyn FnMut(String, R)) -> eyre::Result<()>;

    /// Drops the record stored under `id`.
    fn remove(&self, id: &str) -> eyre::Result<()>;
}

impl<R, P> Persister<R> for Arc<P>
where
    P: Persister<R> + ?Sized,
{
    fn save(&self, id: &str, record: &R) -> eyre::Result<()> {
        (**self).save(id, record)
    }

    fn load(&self, visit: &mut dyn FnMut(String, R)) -> eyre::Result<()> {
        (**self).load(visit)
    }

    fn remove(&self, id: &str) -> eyre::Result<()> {
        (**self).remove(id)
    }
}

/// Decodes a payload saved with the given type tag.
pub type FactoryFn<R> = Box<dyn Fn(&str, &[u8]) -> eyre::Result<R> + Send + Sync>;

pub fn encode<T>(value: &T) -> eyre::Result<AlignedVec>
where
    T: for<'a> Serialize<HighSerializer<AlignedVec, ArenaHandle<'a>, Error>>,
{
    Ok(rkyv::to_bytes::<Error>(value)?)
}

pub fn decode<T>(bytes: &[u8]) -> eyre::Result<T>
where
    T: Archive,
    T::Archived:
        for<'a> CheckBytes<HighValidator<'a, Error>> + Deserialize<T, HighDeserializer<Error>>,
{
    Ok(rkyv::from_bytes::<T, Error>(bytes)?)
}
