//! Callback Wrapping
//!
//! Reactions are plain functions or closures whose parameters are the trigger
//! types followed by the with types, each taken by reference:
//!
//! ```rust,ignore
//! // on::<(Camera,), (Motor,), _>
//! fn react(camera: &Camera, motor: &Motor) { /* ... */ }
//! ```
//!
//! [`Callback`] is the bridge between such a typed function and the erased
//! argument slice a [`DeferredInvocation`] resolves at call time. The match
//! is positional: argument `i` receives the value of the `i`-th type in
//! `Triggers ++ Withs`.
//!
//! [`CallbackBuilder`] performs the wrapping. It only captures; no data is
//! read until the returned invocation runs.

use std::sync::Arc;

use super::store::DataStore;
use super::subscription::DeferredInvocation;
use super::type_key::{Data, DataSet, ErasedData, KeyList};
use crate::error::{Error, Result};

/// A function that can react to `Triggers` with `Withs` available.
///
/// Implemented for every `Fn(&T1, .., &Tn, &W1, .., &Wm) + Send + Sync + 'static`
/// with up to 4 trigger types and up to 4 with types.
pub trait Callback<Triggers: DataSet, Withs: DataSet>: Send + Sync + 'static {
    /// Call the function with resolved values for `Triggers ++ Withs`.
    fn call_with(&self, args: &[ErasedData]) -> Result<()>;
}

fn check_arity(args: &[ErasedData], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::ArityMismatch {
            expected,
            found: args.len(),
        });
    }
    Ok(())
}

fn arg<T: Data>(args: &[ErasedData], index: usize) -> Result<&T> {
    let value = args.get(index).ok_or(Error::ArityMismatch {
        expected: index + 1,
        found: args.len(),
    })?;
    value.downcast_ref::<T>().ok_or(Error::TypeMismatch {
        expected: std::any::type_name::<T>(),
    })
}

macro_rules! impl_callback {
    ([$($t:ident $tv:ident $ti:tt),*] [$($w:ident $wv:ident $wi:tt),*]) => {
        impl<Func, $($t: Data,)* $($w: Data,)*> Callback<($($t,)*), ($($w,)*)> for Func
        where
            Func: Fn($(&$t,)* $(&$w,)*) + Send + Sync + 'static,
        {
            fn call_with(&self, args: &[ErasedData]) -> Result<()> {
                check_arity(
                    args,
                    <($($t,)*) as DataSet>::LEN + <($($w,)*) as DataSet>::LEN,
                )?;
                $(let $tv = arg::<$t>(args, $ti)?;)*
                $(let $wv = arg::<$w>(args, $wi)?;)*
                (self)($($tv,)* $($wv,)*);
                Ok(())
            }
        }
    };
}

// Trigger-less forms exist only so `on::<(), ..>` type-checks and is then
// rejected with `EmptyTriggerSet`.
impl_callback!([] []);
impl_callback!([] [W1 w1 0]);
impl_callback!([] [W1 w1 0, W2 w2 1]);
impl_callback!([] [W1 w1 0, W2 w2 1, W3 w3 2]);
impl_callback!([] [W1 w1 0, W2 w2 1, W3 w3 2, W4 w4 3]);

impl_callback!([T1 t1 0] []);
impl_callback!([T1 t1 0] [W1 w1 1]);
impl_callback!([T1 t1 0] [W1 w1 1, W2 w2 2]);
impl_callback!([T1 t1 0] [W1 w1 1, W2 w2 2, W3 w3 3]);
impl_callback!([T1 t1 0] [W1 w1 1, W2 w2 2, W3 w3 3, W4 w4 4]);

impl_callback!([T1 t1 0, T2 t2 1] []);
impl_callback!([T1 t1 0, T2 t2 1] [W1 w1 2]);
impl_callback!([T1 t1 0, T2 t2 1] [W1 w1 2, W2 w2 3]);
impl_callback!([T1 t1 0, T2 t2 1] [W1 w1 2, W2 w2 3, W3 w3 4]);
impl_callback!([T1 t1 0, T2 t2 1] [W1 w1 2, W2 w2 3, W3 w3 4, W4 w4 5]);

impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2] []);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2] [W1 w1 3]);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2] [W1 w1 3, W2 w2 4]);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2] [W1 w1 3, W2 w2 4, W3 w3 5]);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2] [W1 w1 3, W2 w2 4, W3 w3 5, W4 w4 6]);

impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2, T4 t4 3] []);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2, T4 t4 3] [W1 w1 4]);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2, T4 t4 3] [W1 w1 4, W2 w2 5]);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2, T4 t4 3] [W1 w1 4, W2 w2 5, W3 w3 6]);
impl_callback!([T1 t1 0, T2 t2 1, T3 t3 2, T4 t4 3] [W1 w1 4, W2 w2 5, W3 w3 6, W4 w4 7]);

/// Wraps callbacks into [`DeferredInvocation`]s bound to one data store.
#[derive(Debug, Clone)]
pub struct CallbackBuilder {
    store: Arc<DataStore>,
}

impl CallbackBuilder {
    /// Create a builder whose invocations read from `store`.
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    /// Wrap a typed callback. Its required types are `Triggers ++ Withs`.
    pub fn build<Triggers, Withs, F>(&self, callback: F) -> DeferredInvocation
    where
        Triggers: DataSet,
        Withs: DataSet,
        F: Callback<Triggers, Withs>,
    {
        let mut required = Triggers::keys();
        required.extend(Withs::keys());

        self.build_erased(required, std::any::type_name::<F>(), move |args| {
            <F as Callback<Triggers, Withs>>::call_with(&callback, args)
        })
    }

    /// Wrap a callback that takes its arguments as an erased slice.
    ///
    /// `required` must list the types in the order the callback expects them.
    pub fn build_erased<F>(&self, required: KeyList, label: &'static str, callback: F) -> DeferredInvocation
    where
        F: Fn(&[ErasedData]) -> Result<()> + Send + Sync + 'static,
    {
        DeferredInvocation::new(Arc::clone(&self.store), required, label, callback)
    }
}
