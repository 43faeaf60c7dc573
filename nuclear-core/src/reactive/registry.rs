//! Subscription Registry
//!
//! Each reactor files its subscriptions by trigger type. A subscription with
//! several triggers is bound once per trigger: the same shared invocation
//! appears in each of those lists, so notifying any one of its triggers
//! reaches it.
//!
//! Lists keep insertion order, and that order is the dispatch order.

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use super::subscription::{DeferredInvocation, SubscriptionId};
use super::type_key::TypeKey;
use crate::error::{Error, Result};

/// Mapping from trigger type to the ordered invocations it fires.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    lists: IndexMap<TypeKey, Vec<Arc<DeferredInvocation>>>,
}

impl SubscriptionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            lists: IndexMap::new(),
        }
    }

    /// Append `deferred` to the list of a single trigger type.
    pub fn append(&mut self, trigger: TypeKey, deferred: Arc<DeferredInvocation>) {
        self.lists.entry(trigger).or_default().push(deferred);
    }

    /// Register `deferred` under every type in `triggers`.
    ///
    /// The invocation is shared between the lists, not copied. A trigger
    /// listed twice is bound twice and fires twice per notification.
    ///
    /// Returns [`Error::EmptyTriggerSet`] and registers nothing when
    /// `triggers` is empty.
    pub fn bind(&mut self, triggers: &[TypeKey], deferred: Arc<DeferredInvocation>) -> Result<()> {
        if triggers.is_empty() {
            return Err(Error::EmptyTriggerSet);
        }

        debug!(
            subscription = %deferred.id(),
            label = deferred.label(),
            triggers = triggers.len(),
            "bind"
        );

        for trigger in triggers {
            self.append(*trigger, Arc::clone(&deferred));
        }
        Ok(())
    }

    /// The invocations registered under `trigger`, in registration order.
    ///
    /// Empty if nothing was ever registered for it.
    pub fn subscriptions(&self, trigger: TypeKey) -> &[Arc<DeferredInvocation>] {
        self.lists
            .get(&trigger)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether any invocation is registered under `trigger`.
    pub fn is_triggered_by(&self, trigger: TypeKey) -> bool {
        !self.subscriptions(trigger).is_empty()
    }

    /// Every type with at least one registration, in first-bound order.
    pub fn trigger_types(&self) -> impl Iterator<Item = TypeKey> + '_ {
        self.lists.keys().copied()
    }

    /// Number of distinct subscriptions, counting a multi-trigger
    /// subscription once.
    pub fn subscription_count(&self) -> usize {
        self.lists
            .values()
            .flatten()
            .map(|deferred| deferred.id())
            .collect::<HashSet<SubscriptionId>>()
            .len()
    }

    /// Total number of list entries across all trigger types.
    pub fn entry_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Whether nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::DataStore;
    use smallvec::SmallVec;

    struct Camera;
    struct Motor;
    struct Imu;

    fn deferred(store: &Arc<DataStore>) -> Arc<DeferredInvocation> {
        Arc::new(DeferredInvocation::new(
            Arc::clone(store),
            SmallVec::new(),
            "noop",
            |_| Ok(()),
        ))
    }

    #[test]
    fn bind_shares_one_invocation_across_triggers() {
        let store = Arc::new(DataStore::new());
        let mut registry = SubscriptionRegistry::new();
        let entry = deferred(&store);

        registry
            .bind(&[TypeKey::of::<Camera>(), TypeKey::of::<Motor>()], entry.clone())
            .unwrap();

        let camera = registry.subscriptions(TypeKey::of::<Camera>());
        let motor = registry.subscriptions(TypeKey::of::<Motor>());
        assert_eq!(camera.len(), 1);
        assert_eq!(motor.len(), 1);
        assert!(Arc::ptr_eq(&camera[0], &motor[0]));
        assert!(Arc::ptr_eq(&camera[0], &entry));

        assert_eq!(registry.subscription_count(), 1);
        assert_eq!(registry.entry_count(), 2);
    }

    #[test]
    fn empty_trigger_set_is_rejected() {
        let store = Arc::new(DataStore::new());
        let mut registry = SubscriptionRegistry::new();

        let result = registry.bind(&[], deferred(&store));

        assert!(matches!(result, Err(Error::EmptyTriggerSet)));
        assert!(registry.is_empty());
    }

    #[test]
    fn lists_keep_registration_order() {
        let store = Arc::new(DataStore::new());
        let mut registry = SubscriptionRegistry::new();
        let first = deferred(&store);
        let second = deferred(&store);

        registry.bind(&[TypeKey::of::<Camera>()], first.clone()).unwrap();
        registry.bind(&[TypeKey::of::<Camera>()], second.clone()).unwrap();

        let ids: Vec<_> = registry
            .subscriptions(TypeKey::of::<Camera>())
            .iter()
            .map(|d| d.id())
            .collect();
        assert_eq!(ids, vec![first.id(), second.id()]);
    }

    #[test]
    fn unknown_trigger_has_no_subscriptions() {
        let registry = SubscriptionRegistry::new();

        assert!(registry.subscriptions(TypeKey::of::<Imu>()).is_empty());
        assert!(!registry.is_triggered_by(TypeKey::of::<Imu>()));
    }

    #[test]
    fn trigger_types_in_first_bound_order() {
        let store = Arc::new(DataStore::new());
        let mut registry = SubscriptionRegistry::new();

        registry.bind(&[TypeKey::of::<Motor>()], deferred(&store)).unwrap();
        registry
            .bind(&[TypeKey::of::<Camera>(), TypeKey::of::<Motor>()], deferred(&store))
            .unwrap();

        let triggers: Vec<_> = registry.trigger_types().collect();
        assert_eq!(triggers, vec![TypeKey::of::<Motor>(), TypeKey::of::<Camera>()]);
        assert_eq!(registry.subscription_count(), 2);
    }
}
