//! Errors raised while forwarding an envelope to another locality.

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::LocalityId;

/// Errors from cross-locality enqueue (spec §3 "inbound queue").
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The target locality's leader has no registered inbound handle —
    /// it was never started, or it already shut down.
    #[error("locality {0} is not reachable")]
    LocalityUnknown(LocalityId),

    /// The target locality's inbound queue was dropped.
    #[error("locality {0}'s inbound queue is closed")]
    InboundClosed(LocalityId),
}
