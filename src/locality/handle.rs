//! [`LocalityHandle`]: the `Send + Sync` producer side of a locality
//! leader's inbound MPSC, held by every other locality that needs to
//! forward an envelope here (spec §3: "a lock-free MPSC, bounded initial
//! capacity, unbounded growth permitted").

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;

// Layer 3: Internal module imports
use super::error::DeliveryError;
use crate::message::Envelope;
use crate::util::LocalityId;

/// Cheaply cloned handle to a locality's inbound queue. Grounded on the
/// teacher's `UnboundedMailboxSender` (unbounded, never blocks, fails only
/// when the receiver has dropped).
#[derive(Debug, Clone)]
pub struct LocalityHandle {
    locality: LocalityId,
    sender: mpsc::UnboundedSender<Envelope>,
}

impl LocalityHandle {
    pub(super) fn new(locality: LocalityId, sender: mpsc::UnboundedSender<Envelope>) -> Self {
        Self { locality, sender }
    }

    pub fn locality(&self) -> LocalityId {
        self.locality
    }

    /// Forward `envelope` into this locality's inbound queue.
    pub fn enqueue(&self, envelope: Envelope) -> Result<(), DeliveryError> {
        self.sender
            .send(envelope)
            .map_err(|_| DeliveryError::InboundClosed(self.locality))
    }
}
