//! Identity types shared across the runtime: addresses, localities, and
//! the small id types the rest of the crate keys its maps by.
//!
//! Per the module architecture convention used throughout this crate,
//! this file only declares submodules and re-exports; no logic lives here.

mod ids;
pub mod serde_helpers;

pub use ids::{ActorId, Address, HandlerId, LocalityId, RequestId, RequestIdAllocator};
pub use serde_helpers::duration_serde;
