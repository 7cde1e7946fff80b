//! [`DeliveryEngine`]: drains a locality leader's queue and inbound MPSC,
//! dispatching to local handlers or forwarding to other localities (spec
//! §4.4 "Delivery Engine").

// Layer 1: Standard library imports
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

// Layer 2: Third-party crate imports
use tokio::sync::mpsc;
use tokio::time::{timeout, Instant};

// Layer 3: Internal module imports
use super::directory::LocalityDirectory;
use super::error::DeliveryError;
use super::handle::LocalityHandle;
use crate::message::Envelope;
use crate::subscription::SubscriptionMap;
use crate::util::LocalityId;

/// Per-`process()` tick counters, useful for monitoring and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessStats {
    pub dispatched: usize,
    pub external_enqueued: usize,
    pub dropped: usize,
}

/// Drains one locality's queue: local dispatch, cross-locality forwarding,
/// and the `uplift_last_message` reordering primitive (spec §4.4, §9
/// "response-before-notify ordering").
///
/// `!Send` by construction (its subscription map is `Rc<RefCell<_>>`);
/// must be built on, and driven from, the OS thread that is this
/// locality's loop (see [`crate::message::handler`] module docs).
pub struct DeliveryEngine {
    id: LocalityId,
    local: VecDeque<Envelope>,
    inbound_rx: mpsc::UnboundedReceiver<Envelope>,
    subscriptions: Rc<RefCell<SubscriptionMap>>,
    directory: LocalityDirectory,
    poll_duration: Duration,
}

impl DeliveryEngine {
    /// Build an engine for a fresh locality, registering its inbound
    /// handle in `directory` so other localities can forward to it.
    pub fn new(
        subscriptions: Rc<RefCell<SubscriptionMap>>,
        directory: LocalityDirectory,
        poll_duration: Duration,
    ) -> Self {
        let id = LocalityId::new();
        let (sender, inbound_rx) = mpsc::unbounded_channel();
        directory.register(LocalityHandle::new(id, sender));
        Self {
            id,
            local: VecDeque::new(),
            inbound_rx,
            subscriptions,
            directory,
            poll_duration,
        }
    }

    pub fn id(&self) -> LocalityId {
        self.id
    }

    /// Place an envelope directly on the local queue, bypassing the
    /// inbound channel — used by actor contexts that run on this same
    /// locality thread.
    pub fn enqueue(&mut self, envelope: Envelope) {
        self.local.push_back(envelope);
    }

    /// Move the most recently enqueued message to the front of the local
    /// queue. Reserved for the request/response glue immediately after
    /// synthesizing a response-to-self, so the reply is not overtaken by
    /// whatever the handler sends next (spec §4.4 "Order preservation",
    /// §9 "this is an intentional re-order primitive, not a bug;
    /// implementations must... restrict its use to the request/response
    /// glue").
    pub fn uplift_last_message(&mut self) {
        if let Some(envelope) = self.local.pop_back() {
            self.local.push_front(envelope);
        }
    }

    /// Run one `process()` tick: drain inbound, dispatch or forward every
    /// message currently queued, then — if anything left this locality —
    /// give inbound a bounded extra window to reduce cross-locality
    /// latency (spec §4.4 steps 1-5).
    pub async fn process(&mut self) -> ProcessStats {
        self.drain_inbound();
        let mut stats = ProcessStats::default();

        while let Some(envelope) = self.local.pop_front() {
            if envelope.destination().locality() == self.id {
                self.dispatch_local(envelope, &mut stats);
            } else {
                let locality = envelope.destination().locality();
                self.forward(locality, envelope, &mut stats);
            }
        }

        if stats.external_enqueued > 0 {
            self.poll_inbound_for(self.poll_duration).await;
        }

        stats
    }

    fn drain_inbound(&mut self) {
        while let Ok(envelope) = self.inbound_rx.try_recv() {
            self.local.push_back(envelope);
        }
    }

    async fn poll_inbound_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return;
            }
            match timeout(remaining, self.inbound_rx.recv()).await {
                Ok(Some(envelope)) => self.local.push_back(envelope),
                Ok(None) | Err(_) => return,
            }
        }
    }

    fn dispatch_local(&mut self, envelope: Envelope, stats: &mut ProcessStats) {
        let recipients = self.subscriptions.borrow().recipients(&envelope);

        if recipients.internal.is_empty() && recipients.external.is_empty() {
            self.handle_dropped(envelope, stats);
            return;
        }

        for handler in recipients.internal {
            handler.invoke(envelope.clone());
            stats.dispatched += 1;
        }

        for info in recipients.external {
            self.forward(info.handler_locality(), envelope.clone(), stats);
        }
    }

    fn handle_dropped(&mut self, envelope: Envelope, stats: &mut ProcessStats) {
        match envelope.redirect_to_fallback() {
            Some(redirected) => self.local.push_back(redirected),
            None => stats.dropped += 1,
        }
    }

    fn forward(&mut self, locality: LocalityId, envelope: Envelope, stats: &mut ProcessStats) {
        match self.directory.resolve(locality) {
            Some(handle) => match handle.enqueue(envelope) {
                Ok(()) => stats.external_enqueued += 1,
                Err(DeliveryError::InboundClosed(_)) => stats.dropped += 1,
                Err(DeliveryError::LocalityUnknown(_)) => stats.dropped += 1,
            },
            None => stats.dropped += 1,
        }
    }
}

impl Drop for DeliveryEngine {
    fn drop(&mut self) {
        self.directory.deregister(self.id);
    }
}
