//! Reactor Controller
//!
//! The controller is the driver that connects data producers to reactors.
//! It owns the shared data store and the reactors wired to it.
//!
//! # How It Works
//!
//! 1. Reactors are created through the controller, or built on its store
//!    and installed, so they all read from that store.
//!
//! 2. Producers call [`ReactorController::emit`] with a new value.
//!
//! 3. The controller:
//!    a. Publishes the value into the store
//!    b. Finds every reactor with a subscription triggered by its type
//!    c. Notifies those reactors, in the order they were added
//!
//! Publishing straight into the store remains possible and never notifies.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::dispatch::DispatchReport;
use super::reactor::Reactor;
use super::store::DataStore;
use super::type_key::{Data, TypeKey};
use crate::config::ReactorConfig;
use crate::error::{Error, Result};

/// Owns the data store and the reactors that react to it.
pub struct ReactorController {
    store: Arc<DataStore>,
    reactors: RwLock<Vec<Arc<Reactor>>>,
}

impl ReactorController {
    /// Create a controller with an empty store and no reactors.
    pub fn new() -> Self {
        Self {
            store: Arc::new(DataStore::new()),
            reactors: RwLock::new(Vec::new()),
        }
    }

    /// The shared data store.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Create a reactor reading from this controller's store and keep it.
    pub fn add_reactor(&self, config: ReactorConfig) -> Arc<Reactor> {
        let reactor = Arc::new(Reactor::with_config(Arc::clone(&self.store), config));
        debug!(reactor = reactor.name(), "reactor added");
        self.reactors.write().push(Arc::clone(&reactor));
        reactor
    }

    /// Keep a reactor that was built on this controller's store.
    ///
    /// Returns [`Error::ForeignStore`] and keeps nothing if the reactor reads
    /// from another store, since `emit` would publish where it never looks.
    pub fn install(&self, reactor: Arc<Reactor>) -> Result<Arc<Reactor>> {
        if !Arc::ptr_eq(reactor.store(), &self.store) {
            return Err(Error::ForeignStore {
                reactor: reactor.name().to_string(),
            });
        }
        debug!(reactor = reactor.name(), "reactor installed");
        self.reactors.write().push(Arc::clone(&reactor));
        Ok(reactor)
    }

    /// Publish `value` and notify every reactor triggered by its type.
    ///
    /// Returns one report per notified reactor, in the order the reactors
    /// were added. Reactors with no interest in `T` are skipped.
    pub fn emit<T: Data>(&self, value: T) -> Vec<DispatchReport> {
        self.store.publish(value);
        self.notify_key(TypeKey::of::<T>())
    }

    /// Notify every reactor triggered by `T` without publishing.
    pub fn notify<T: Data>(&self) -> Vec<DispatchReport> {
        self.notify_key(TypeKey::of::<T>())
    }

    /// Notify every reactor triggered by `trigger`.
    pub fn notify_key(&self, trigger: TypeKey) -> Vec<DispatchReport> {
        // Release the reactor list before running callbacks
        let reactors = self.reactors.read().clone();

        reactors
            .iter()
            .filter(|reactor| reactor.is_triggered_by(trigger))
            .map(|reactor| reactor.notify_key(trigger))
            .collect()
    }

    /// Number of reactors wired to this controller.
    pub fn reactor_count(&self) -> usize {
        self.reactors.read().len()
    }
}

impl Default for ReactorController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ReactorController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactorController")
            .field("store", &self.store)
            .field("reactor_count", &self.reactor_count())
            .finish()
    }
}
