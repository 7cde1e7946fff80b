//! Request/timer pairing (spec §4.9 invariant: "every live request has a
//! paired live timer; discarding a request cancels its timer and vice
//! versa"). Grounded on `original_source/include/rotor/spawner.h`'s
//! `request_state_t`, which couples a request id to the timer guarding
//! its timeout the same way.

use std::collections::HashMap;

use crate::message::Envelope;
use crate::util::{Address, RequestId};

use super::TimerId;

/// One outstanding `request<Req>(...).send(timeout)` call (spec §4.9:
/// "Maps request-id → {timeout-response constructor, reply-to, original
/// request message, source actor}"). `synthesize_timeout` builds the
/// error response `actor::ActorContext` delivers to itself if the timer
/// fires before a real response arrives.
pub struct PendingRequest {
    pub timer_id: TimerId,
    pub reply_to: Address,
    pub source: Address,
    synthesize_timeout: Box<dyn FnOnce() -> Envelope>,
}

impl PendingRequest {
    pub fn into_timeout_envelope(self) -> Envelope {
        (self.synthesize_timeout)()
    }
}

/// Per-locality table of in-flight requests, keyed both by `RequestId`
/// (how a real response looks the entry up) and by `TimerId` (how a
/// fired timer looks the entry up), since the two events race and
/// either one must resolve and clear the other.
#[derive(Default)]
pub struct RequestTable {
    by_request: HashMap<RequestId, PendingRequest>,
    by_timer: HashMap<TimerId, RequestId>,
}

impl RequestTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        request_id: RequestId,
        timer_id: TimerId,
        reply_to: Address,
        source: Address,
        synthesize_timeout: impl FnOnce() -> Envelope + 'static,
    ) {
        self.by_request.insert(
            request_id,
            PendingRequest { timer_id, reply_to, source, synthesize_timeout: Box::new(synthesize_timeout) },
        );
        self.by_timer.insert(timer_id, request_id);
    }

    pub fn contains(&self, request_id: RequestId) -> bool {
        self.by_request.contains_key(&request_id)
    }

    pub fn timer_for(&self, request_id: RequestId) -> Option<TimerId> {
        self.by_request.get(&request_id).map(|entry| entry.timer_id)
    }

    /// A real response arrived for `request_id`: remove the entry and
    /// hand back its timer id so the caller can cancel it. Returns
    /// `None` if the request was already resolved or timed out — a late
    /// response is silently dropped by the caller (spec §7 "never-fatal":
    /// "response arriving after its request was discarded").
    pub fn resolve(&mut self, request_id: RequestId) -> Option<TimerId> {
        let entry = self.by_request.remove(&request_id)?;
        self.by_timer.remove(&entry.timer_id);
        Some(entry.timer_id)
    }

    /// The timer for some request fired: remove the entry and synthesize
    /// its `request_timeout` response envelope (spec §4.6 "Timeout
    /// semantics"). Returns `None` if the timer isn't tracked here (e.g.
    /// it already fired, or belongs to something other than a request).
    pub fn resolve_timeout(&mut self, timer_id: TimerId) -> Option<Envelope> {
        let request_id = self.by_timer.remove(&timer_id)?;
        let entry = self.by_request.remove(&request_id)?;
        Some(entry.into_timeout_envelope())
    }

    pub fn len(&self) -> usize {
        self.by_request.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_request.is_empty()
    }
}
