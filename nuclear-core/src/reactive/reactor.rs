//! Reactors
//!
//! A reactor is a component that reacts to data. It declares its reactions
//! with [`Reactor::on`]: a callback, the trigger types that fire it and the
//! with types it needs but that do not fire it on their own.
//!
//! ```rust,ignore
//! // Runs whenever Camera is notified, with the latest Motor value.
//! reactor.on::<(Camera,), (Motor,), _>(|camera: &Camera, motor: &Motor| {
//!     /* ... */
//! })?;
//!
//! // Runs whenever Camera or Motor is notified.
//! reactor.on_trigger::<(Camera, Motor), _>(|camera: &Camera, motor: &Motor| {
//!     /* ... */
//! })?;
//! ```
//!
//! Registrations live as long as the reactor. There is no unsubscribe.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use super::callback::{Callback, CallbackBuilder};
use super::dispatch::{dispatch, DispatchReport};
use super::registry::SubscriptionRegistry;
use super::store::DataStore;
use super::subscription::{DeferredInvocation, SubscriptionId};
use super::type_key::{Data, DataSet, ErasedData, KeyList, TypeKey};
use crate::config::ReactorConfig;
use crate::error::{Error, Result};

/// Owns a set of subscriptions over a shared data store.
pub struct Reactor {
    config: ReactorConfig,
    store: Arc<DataStore>,
    builder: CallbackBuilder,
    registry: RwLock<SubscriptionRegistry>,
}

impl Reactor {
    /// Create a reactor with the default configuration.
    pub fn new(store: Arc<DataStore>) -> Self {
        Self::with_config(store, ReactorConfig::default())
    }

    /// Create a reactor with the given configuration.
    pub fn with_config(store: Arc<DataStore>, config: ReactorConfig) -> Self {
        Self {
            config,
            builder: CallbackBuilder::new(Arc::clone(&store)),
            store,
            registry: RwLock::new(SubscriptionRegistry::new()),
        }
    }

    /// Register `callback` to run whenever any type in `Triggers` is notified.
    ///
    /// The callback takes the trigger types followed by the `Withs` types, by
    /// reference and in declaration order. All of them are read from the store
    /// when the callback runs.
    ///
    /// Returns [`Error::EmptyTriggerSet`] if `Triggers` is `()`.
    pub fn on<Triggers, Withs, F>(&self, callback: F) -> Result<SubscriptionId>
    where
        Triggers: DataSet,
        Withs: DataSet,
        F: Callback<Triggers, Withs>,
    {
        if Triggers::LEN == 0 {
            return Err(Error::EmptyTriggerSet);
        }
        let deferred = self.builder.build::<Triggers, Withs, F>(callback);
        self.register(&Triggers::keys(), deferred)
    }

    /// Register `callback` with no with types.
    pub fn on_trigger<Triggers, F>(&self, callback: F) -> Result<SubscriptionId>
    where
        Triggers: DataSet,
        F: Callback<Triggers, ()>,
    {
        self.on::<Triggers, (), F>(callback)
    }

    /// Register an erased callback for trigger and with lists built at runtime.
    ///
    /// The callback receives the resolved values of `triggers ++ withs`.
    pub fn on_keys<F>(&self, triggers: &[TypeKey], withs: &[TypeKey], callback: F) -> Result<SubscriptionId>
    where
        F: Fn(&[ErasedData]) -> Result<()> + Send + Sync + 'static,
    {
        if triggers.is_empty() {
            return Err(Error::EmptyTriggerSet);
        }
        let required: KeyList = triggers.iter().chain(withs).copied().collect();
        let deferred = self
            .builder
            .build_erased(required, std::any::type_name::<F>(), callback);
        self.register(triggers, deferred)
    }

    fn register(&self, triggers: &[TypeKey], deferred: DeferredInvocation) -> Result<SubscriptionId> {
        let id = deferred.id();
        self.registry.write().bind(triggers, Arc::new(deferred))?;
        Ok(id)
    }

    /// Run every subscription triggered by `T`.
    pub fn notify<T: Data>(&self) -> DispatchReport {
        self.notify_key(TypeKey::of::<T>())
    }

    /// Run every subscription registered under `trigger`, in registration order.
    ///
    /// A trigger with no subscriptions yields an empty report. Callbacks run
    /// on the calling thread without the registry lock held, so they may
    /// publish, register or notify themselves; subscriptions registered
    /// during this dispatch are not part of it.
    pub fn notify_key(&self, trigger: TypeKey) -> DispatchReport {
        let subscriptions = self.registry.read().subscriptions(trigger).to_vec();
        if subscriptions.is_empty() {
            return DispatchReport::empty(trigger);
        }
        dispatch(
            &self.config.name,
            trigger,
            &subscriptions,
            self.config.failure_policy(),
        )
    }

    /// Whether notifying `trigger` would run anything.
    pub fn is_triggered_by(&self, trigger: TypeKey) -> bool {
        self.registry.read().is_triggered_by(trigger)
    }

    /// Every type this reactor has subscriptions for.
    pub fn trigger_types(&self) -> Vec<TypeKey> {
        self.registry.read().trigger_types().collect()
    }

    /// Number of distinct subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.registry.read().subscription_count()
    }

    /// The store this reactor reads from.
    pub fn store(&self) -> &Arc<DataStore> {
        &self.store
    }

    /// Name from the configuration, used in log fields.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The configuration this reactor was created with.
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }
}

impl fmt::Debug for Reactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reactor")
            .field("name", &self.config.name)
            .field("triggers", &self.trigger_types())
            .field("subscription_count", &self.subscription_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Camera(&'static str);

    #[derive(Debug, Clone, PartialEq)]
    struct Motor(&'static str);

    fn counter() -> (Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        (count.clone(), count)
    }

    #[test]
    fn multi_trigger_fires_once_per_notify() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        store.publish(Motor("m1"));
        let reactor = Reactor::new(store);

        let (count, count_clone) = counter();
        reactor
            .on_trigger::<(Camera, Motor), _>(move |_: &Camera, _: &Motor| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        assert_eq!(reactor.notify::<Camera>().invoked(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert_eq!(reactor.notify::<Motor>().invoked(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);

        assert_eq!(reactor.subscription_count(), 1);
    }

    #[test]
    fn with_type_does_not_trigger() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        store.publish(Motor("m1"));
        let reactor = Reactor::new(store);

        let (count, count_clone) = counter();
        reactor
            .on::<(Camera,), (Motor,), _>(move |_: &Camera, _: &Motor| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let report = reactor.notify::<Motor>();
        assert!(report.is_empty());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(!reactor.is_triggered_by(TypeKey::of::<Motor>()));
    }

    #[test]
    fn empty_trigger_set_registers_nothing() {
        let reactor = Reactor::new(Arc::new(DataStore::new()));

        let result = reactor.on::<(), (Camera,), _>(|_: &Camera| {});
        assert!(matches!(result, Err(Error::EmptyTriggerSet)));

        let result = reactor.on_keys(&[], &[TypeKey::of::<Camera>()], |_| Ok(()));
        assert!(matches!(result, Err(Error::EmptyTriggerSet)));

        assert_eq!(reactor.subscription_count(), 0);
        assert!(reactor.trigger_types().is_empty());
    }

    #[test]
    fn duplicate_registrations_fire_independently() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        let reactor = Reactor::new(store);

        let (count, count_clone) = counter();
        for _ in 0..2 {
            let count_clone = count_clone.clone();
            reactor
                .on_trigger::<(Camera,), _>(move |_: &Camera| {
                    count_clone.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        assert_eq!(reactor.notify::<Camera>().len(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn repeated_trigger_is_bound_per_listing() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        let reactor = Reactor::new(store);

        let (count, count_clone) = counter();
        reactor
            .on_trigger::<(Camera, Camera), _>(move |_: &Camera, _: &Camera| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let report = reactor.notify::<Camera>();
        assert_eq!(report.len(), 2);
        assert_eq!(report.outcomes[0].subscription, report.outcomes[1].subscription);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(reactor.subscription_count(), 1);
    }

    #[test]
    fn on_keys_passes_erased_values() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        store.publish(Motor("m1"));
        let reactor = Reactor::new(store);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        reactor
            .on_keys(
                &[TypeKey::of::<Camera>()],
                &[TypeKey::of::<Motor>()],
                move |args| {
                    let camera = args[0].downcast_ref::<Camera>().map(|c| c.0);
                    let motor = args[1].downcast_ref::<Motor>().map(|m| m.0);
                    seen_clone.lock().push((camera, motor));
                    Ok(())
                },
            )
            .unwrap();

        assert!(reactor.notify::<Camera>().is_success());
        assert_eq!(*seen.lock(), vec![(Some("frame1"), Some("m1"))]);
    }

    #[test]
    fn callback_may_register_during_dispatch() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        let reactor = Arc::new(Reactor::new(store));

        let (count, count_clone) = counter();
        let inner = Arc::clone(&reactor);
        reactor
            .on_trigger::<(Camera,), _>(move |_: &Camera| {
                let count_clone = count_clone.clone();
                let _ = inner.on_trigger::<(Camera,), _>(move |_: &Camera| {
                    count_clone.fetch_add(1, Ordering::SeqCst);
                });
            })
            .unwrap();

        // The subscription added mid-dispatch is not part of that dispatch.
        assert_eq!(reactor.notify::<Camera>().len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);

        assert_eq!(reactor.notify::<Camera>().len(), 2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn fail_fast_config_stops_dispatch() {
        let store = Arc::new(DataStore::new());
        store.publish(Camera("frame1"));
        let reactor = Reactor::with_config(store, ReactorConfig::with_name("strict").with_fail_fast(true));

        let (count, count_clone) = counter();
        reactor
            .on::<(Camera,), (Motor,), _>(|_: &Camera, _: &Motor| {})
            .unwrap();
        reactor
            .on_trigger::<(Camera,), _>(move |_: &Camera| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();

        let report = reactor.notify::<Camera>();
        assert_eq!(report.len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(reactor.name(), "strict");
        assert!(reactor.config().fail_fast);
    }
}
