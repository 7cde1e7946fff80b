//! Errors raised by the subscription fabric.

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::{Address, HandlerId};

/// Errors from [`crate::subscription::SubscriptionMap`] operations.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    /// Subscribing an (address, handler) pair that already has a point
    /// (spec §3 invariant: "at most one point... subscribing an existing
    /// point is an error").
    #[error("handler {handler:?} is already subscribed to {address}")]
    AlreadySubscribed { address: Address, handler: HandlerId },

    /// Unsubscribing a pair that has no point (spec §4.6: "idempotent if
    /// not present → error").
    #[error("handler {handler:?} is not subscribed to {address}")]
    NotSubscribed { address: Address, handler: HandlerId },
}

impl SubscriptionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotSubscribed { .. })
    }
}
