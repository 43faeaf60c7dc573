//! Dispatch
//!
//! Notifying a trigger type runs every invocation registered under it,
//! synchronously and in registration order. Dispatch is best-effort per
//! subscriber: a subscriber whose data is missing is reported and skipped,
//! and the rest of the list still runs.
//!
//! The outcome of every subscriber is collected into a [`DispatchReport`].

use std::sync::Arc;

use tracing::{debug, debug_span, warn};

use super::subscription::{DeferredInvocation, SubscriptionId};
use super::type_key::TypeKey;
use crate::error::{Error, Result};

/// Result of running one subscriber during a dispatch.
#[derive(Debug)]
pub struct Outcome {
    /// The subscription that ran.
    pub subscription: SubscriptionId,
    /// Name of its callback.
    pub label: &'static str,
    /// `Ok` if the callback ran to completion.
    pub result: Result<()>,
}

impl Outcome {
    /// Whether the callback ran.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-subscriber outcomes of one `notify` call.
#[derive(Debug)]
pub struct DispatchReport {
    /// The type that was notified.
    pub trigger: TypeKey,
    /// One entry per subscriber run, in dispatch order.
    pub outcomes: Vec<Outcome>,
}

impl DispatchReport {
    /// A report for a dispatch that ran nobody.
    pub fn empty(trigger: TypeKey) -> Self {
        Self {
            trigger,
            outcomes: Vec::new(),
        }
    }

    /// Number of subscribers that were run.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no subscriber was run.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of subscribers whose callback ran to completion.
    pub fn invoked(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    /// The subscribers that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (SubscriptionId, &Error)> + '_ {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.subscription, e)))
    }

    /// Whether every subscriber ran successfully.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(Outcome::is_ok)
    }
}

/// How a dispatch reacts to a failing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Report the failure and keep going.
    #[default]
    Continue,
    /// Report the failure and stop; later subscribers are neither run nor reported.
    Stop,
}

/// Run `subscriptions` in order for `trigger`.
///
/// The caller must not hold any lock the callbacks might need.
pub fn dispatch(
    reactor: &str,
    trigger: TypeKey,
    subscriptions: &[Arc<DeferredInvocation>],
    policy: FailurePolicy,
) -> DispatchReport {
    let span = debug_span!("notify", reactor, trigger = trigger.type_name());
    let _enter = span.enter();

    debug!(subscribers = subscriptions.len(), "dispatch");

    let mut report = DispatchReport::empty(trigger);
    for deferred in subscriptions {
        let result = deferred.invoke();
        let failed = result.is_err();

        if let Err(error) = &result {
            warn!(
                subscription = %deferred.id(),
                label = deferred.label(),
                %error,
                "subscriber failed"
            );
        }

        report.outcomes.push(Outcome {
            subscription: deferred.id(),
            label: deferred.label(),
            result,
        });

        if failed && policy == FailurePolicy::Stop {
            break;
        }
    }
    report
}
