//! The loop adapter seam (spec §6.1): `start`/`shutdown`/`enqueue`/
//! `do_start_timer`/`do_cancel_timer`. Real backends (thread loop,
//! cooperative single-thread loop, UI/event-loop adapters) are out of
//! scope for this crate to specify internally; [`testing::InlineLoopAdapter`]
//! is the one reference backend it ships, for tests and examples.

mod traits;
pub mod testing;

pub use traits::{LoopAdapter, TimerHandler};
