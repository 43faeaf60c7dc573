//! Subscriptions and deferred invocations.
//!
//! A subscription is created by every `on` call. Its callback is wrapped in a
//! [`DeferredInvocation`]: a zero-argument callable that knows which types it
//! needs and fetches them from the data store only when it is invoked.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::trace;

use super::store::DataStore;
use super::type_key::{ErasedData, KeyList, TypeKey};
use crate::error::Result;

/// Unique identifier for a subscription.
///
/// A subscription bound to several trigger types keeps one ID across all of
/// the lists it appears in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Generate a new unique subscription ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A callback that takes its arguments as resolved, type-erased values.
pub type ErasedCallback = dyn Fn(&[ErasedData]) -> Result<()> + Send + Sync;

/// A callback bundled with the list of types it needs.
///
/// Nothing is read at construction time. Every call to [`invoke`](Self::invoke)
/// resolves all required types against the store afresh and forwards them to
/// the callback positionally. If any type has no value, the callback does not
/// run and [`Error::MissingData`](crate::Error::MissingData) is returned.
pub struct DeferredInvocation {
    id: SubscriptionId,

    /// Name of the wrapped callback, used in logs and dispatch reports.
    label: &'static str,

    /// Triggers followed by withs, in declaration order.
    required: KeyList,

    store: Arc<DataStore>,

    /// Stored as a boxed trait object so callbacks of any arity can share
    /// one subscription list.
    callback: Box<ErasedCallback>,
}

impl DeferredInvocation {
    /// Wrap an erased callback.
    pub fn new<F>(store: Arc<DataStore>, required: KeyList, label: &'static str, callback: F) -> Self
    where
        F: Fn(&[ErasedData]) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            id: SubscriptionId::new(),
            label,
            required,
            store,
            callback: Box::new(callback),
        }
    }

    /// Get the subscription's unique ID.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Name of the wrapped callback.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The types resolved on every invocation, in argument order.
    pub fn required_types(&self) -> &[TypeKey] {
        &self.required
    }

    /// Resolve the required types and run the callback.
    pub fn invoke(&self) -> Result<()> {
        let args = self.store.resolve(&self.required)?;
        trace!(subscription = %self.id, label = self.label, "invoke");
        (self.callback)(&args)
    }
}

impl fmt::Debug for DeferredInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredInvocation")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("required", &self.required)
            .finish()
    }
}
