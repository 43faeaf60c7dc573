//! Reactive Dispatch
//!
//! This module implements the reactor system: a type-keyed data store and
//! the machinery that runs callbacks when data of a given type arrives.
//!
//! # Concepts
//!
//! ## Data Store
//!
//! The [`DataStore`] keeps the latest value of every published type. Each
//! type has exactly one slot; publishing overwrites it.
//!
//! ## Triggers and Withs
//!
//! A reaction names two ordered lists of types. Notifying any *trigger* type
//! runs the reaction. *With* types are only read when the reaction runs;
//! notifying one of them does nothing for this reaction.
//!
//! ## Deferred Invocations
//!
//! Callbacks are wrapped into [`DeferredInvocation`]s that resolve their
//! arguments from the store at call time. A reaction with several triggers
//! is one invocation filed under each trigger in the reactor's
//! [`SubscriptionRegistry`].
//!
//! ## Dispatch
//!
//! [`Reactor::notify`] runs the invocations filed under one type, in
//! registration order, on the calling thread. Each subscriber's outcome is
//! collected in a [`DispatchReport`].
//!
//! # Implementation Notes
//!
//! Everything runs synchronously. The store and registries are lock
//! protected so reactors can be shared between threads, but no dispatch
//! ever hops threads on its own.

mod type_key;
mod store;
mod subscription;
mod callback;
mod registry;
mod dispatch;
mod reactor;
mod controller;

pub use type_key::{Data, DataSet, ErasedData, KeyList, TypeKey};
pub use store::{DataStore, Resolved};
pub use subscription::{DeferredInvocation, ErasedCallback, SubscriptionId};
pub use callback::{Callback, CallbackBuilder};
pub use registry::SubscriptionRegistry;
pub use dispatch::{dispatch, DispatchReport, FailurePolicy, Outcome};
pub use reactor::Reactor;
pub use controller::ReactorController;
