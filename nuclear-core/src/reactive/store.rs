//! Data Store
//!
//! The data store holds the current value of every published data type.
//! It is a single-slot store: publishing a value replaces whatever was
//! stored for that type before. There is no history.
//!
//! # Thread Safety
//!
//! Slots live in a sharded concurrent map, so a publish and a read of the
//! same type are mutually exclusive while different types rarely contend.
//! Values are handed out as `Arc<T>` snapshots: a reader keeps the value it
//! read alive even if a newer value is published while it is still using it.
//!
//! # Notification
//!
//! Publishing never triggers dispatch. Driving `notify` after a publish is
//! the caller's job (see [`ReactorController::emit`](super::ReactorController::emit)).

use std::fmt::Debug;
use std::sync::Arc;

use dashmap::DashMap;
use smallvec::SmallVec;
use tracing::trace;

use super::type_key::{Data, ErasedData, TypeKey};
use crate::error::{Error, Result};

/// Resolved values for a list of keys, in key order.
pub type Resolved = SmallVec<[ErasedData; 4]>;

/// Type-keyed store holding the latest value of each data type.
///
/// # Example
///
/// ```rust
/// use nuclear_core::reactive::DataStore;
///
/// let store = DataStore::new();
/// store.publish(String::from("frame1"));
/// assert_eq!(store.read::<String>().unwrap().as_str(), "frame1");
/// ```
#[derive(Default)]
pub struct DataStore {
    slots: DashMap<TypeKey, ErasedData>,
}

impl DataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Store `value` as the current value of its type.
    ///
    /// Any previous value of the same type is discarded. Readers that already
    /// hold the previous value keep their snapshot.
    pub fn publish<T: Data>(&self, value: T) {
        self.publish_arc(Arc::new(value));
    }

    /// Store an already shared value as the current value of its type.
    pub fn publish_arc<T: Data>(&self, value: Arc<T>) {
        let key = TypeKey::of::<T>();
        trace!(type_name = key.type_name(), "publish");
        self.slots.insert(key, value);
    }

    /// Get the current value of type `T`.
    ///
    /// Returns [`Error::MissingData`] if `T` has never been published.
    pub fn read<T: Data>(&self) -> Result<Arc<T>> {
        let erased = self.read_key(TypeKey::of::<T>())?;
        downcast(erased)
    }

    /// Get the current value stored under `key`, without downcasting.
    pub fn read_key(&self, key: TypeKey) -> Result<ErasedData> {
        self.slots
            .get(&key)
            .map(|slot| Arc::clone(slot.value()))
            .ok_or(Error::MissingData {
                type_name: key.type_name(),
            })
    }

    /// Read every key in `keys`, in order.
    ///
    /// Fails on the first key that has no value; nothing is returned for the
    /// keys that did resolve.
    pub fn resolve(&self, keys: &[TypeKey]) -> Result<Resolved> {
        keys.iter().map(|key| self.read_key(*key)).collect()
    }

    /// Whether a value of type `T` has been published.
    pub fn contains<T: Data>(&self) -> bool {
        self.contains_key(TypeKey::of::<T>())
    }

    /// Whether a value has been published under `key`.
    pub fn contains_key(&self, key: TypeKey) -> bool {
        self.slots.contains_key(&key)
    }

    /// Number of types that currently hold a value.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing has been published yet.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keys of all types that currently hold a value, in no particular order.
    pub fn keys(&self) -> Vec<TypeKey> {
        self.slots.iter().map(|slot| *slot.key()).collect()
    }
}

impl Debug for DataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataStore")
            .field("types", &self.keys())
            .finish()
    }
}

/// Recover the concrete type of an erased value.
pub(crate) fn downcast<T: Data>(erased: ErasedData) -> Result<Arc<T>> {
    erased.downcast::<T>().map_err(|_| Error::TypeMismatch {
        expected: std::any::type_name::<T>(),
    })
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
