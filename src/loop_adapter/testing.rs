//! Minimal in-memory [`LoopAdapter`] for tests and examples. Spec §6.1
//! scopes real backends (thread loop, cooperative single-thread loop,
//! UI adapters) out of this crate; this is the one reference backend
//! the ambient test tooling ships.
//!
//! Timers are a cooperative min-structure driven by [`InlineLoopAdapter::process_due`],
//! called once per locality tick alongside [`crate::locality::DeliveryEngine::process`]
//! rather than on a real wall-clock thread — this is what keeps a fired
//! timer's callback off the scheduling call's own stack (spec §8: "never
//! synchronously within the scheduling call").

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::message::Envelope;
use crate::timer::TimerId;

use super::{LoopAdapter, TimerHandler};

struct TimerSlot {
    fire_at: Instant,
    cancelled: bool,
    handler: Option<TimerHandler>,
}

pub struct InlineLoopAdapter {
    inbound: mpsc::UnboundedSender<Envelope>,
    timers: RefCell<HashMap<TimerId, TimerSlot>>,
    next_timer: Cell<u64>,
    running: Cell<bool>,
}

impl InlineLoopAdapter {
    pub fn new(inbound: mpsc::UnboundedSender<Envelope>) -> Self {
        Self { inbound, timers: RefCell::new(HashMap::new()), next_timer: Cell::new(0), running: Cell::new(false) }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Fire every timer that is due or was cancelled since the last
    /// call. Returns how many handlers ran.
    pub fn process_due(&self) -> usize {
        let now = Instant::now();
        let due: Vec<TimerId> = self
            .timers
            .borrow()
            .iter()
            .filter(|(_, slot)| slot.cancelled || slot.fire_at <= now)
            .map(|(id, _)| *id)
            .collect();

        let mut fired = Vec::with_capacity(due.len());
        {
            let mut timers = self.timers.borrow_mut();
            for id in due {
                if let Some(slot) = timers.remove(&id) {
                    fired.push((id, slot.cancelled, slot.handler));
                }
            }
        }

        let count = fired.len();
        for (id, cancelled, handler) in fired {
            if let Some(handler) = handler {
                handler(id, cancelled);
            }
        }
        count
    }
}

impl LoopAdapter for InlineLoopAdapter {
    fn start(&mut self) {
        self.running.set(true);
    }

    fn shutdown(&mut self) {
        self.running.set(false);
    }

    fn enqueue(&self, envelope: Envelope) {
        let _ = self.inbound.send(envelope);
    }

    fn do_start_timer(&mut self, duration: Duration, handler: TimerHandler) -> TimerId {
        let id = TimerId::from_raw(self.next_timer.get() + 1);
        self.next_timer.set(id.value());
        self.timers.borrow_mut().insert(id, TimerSlot { fire_at: Instant::now() + duration, cancelled: false, handler: Some(handler) });
        id
    }

    fn do_cancel_timer(&mut self, id: TimerId) {
        if let Some(slot) = self.timers.borrow_mut().get_mut(&id) {
            slot.cancelled = true;
        }
    }
}
