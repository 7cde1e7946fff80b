//! Timer identity. Grounded on `util::ids::RequestId` — same "opaque
//! monotonic handle, locality-scoped" shape, since both are allocated by
//! a single-threaded locality leader and never need to be globally
//! unique.

use std::fmt;

/// Handle to a scheduled timer, returned by `LoopAdapter::do_start_timer`
/// (spec §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub(crate) fn from_raw(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}
