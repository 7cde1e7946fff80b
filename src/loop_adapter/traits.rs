//! The loop adapter contract (spec §6.1). Concrete backends — a generic
//! thread loop, a cooperative single-thread loop, UI/event-loop adapters
//! — are explicitly out of scope to specify internally; this trait is
//! the seam a locality plugs a real event loop into. Grounded on
//! `system/actor_system.rs`'s orchestration shape and `mailbox/traits.rs`'s
//! pluggable-backend idiom.

use std::time::Duration;

use crate::message::Envelope;
use crate::timer::TimerId;

/// Invoked exactly once per timer outcome: `cancelled` is `false` when
/// the duration elapsed, `true` when `do_cancel_timer` fired first.
pub type TimerHandler = Box<dyn FnOnce(TimerId, bool)>;

/// The event-loop seam a locality runs on top of (spec §6.1).
///
/// `enqueue` is the only method a foreign thread may call; `start`,
/// `shutdown`, `do_start_timer`, and `do_cancel_timer` are loop-thread
/// only — exactly mirroring why `locality::DeliveryEngine` itself is
/// `!Send` while `locality::LocalityHandle` is `Send + Sync`.
pub trait LoopAdapter {
    /// Begin processing; returns once the loop has been told to stop.
    fn start(&mut self);

    /// Request a graceful stop of the loop.
    fn shutdown(&mut self);

    /// Thread-safe: hand a message to the loop and wake it if idle.
    fn enqueue(&self, envelope: Envelope);

    /// Loop-thread only. A `duration` of zero fires on the next loop
    /// turn, never synchronously within this call (spec §8 boundary
    /// behavior).
    fn do_start_timer(&mut self, duration: Duration, handler: TimerHandler) -> TimerId;

    /// Loop-thread only. Invokes the timer's handler with
    /// `cancelled = true` if it hadn't already fired.
    fn do_cancel_timer(&mut self, id: TimerId);
}
