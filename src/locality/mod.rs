//! Localities: serial execution domains sharing one queue and one
//! cross-locality inbound channel, and the [`DeliveryEngine`] that drains
//! them (spec §3 "Locality", §4.4 "Delivery Engine").

mod directory;
mod engine;
mod error;
mod handle;

pub use directory::LocalityDirectory;
pub use engine::{DeliveryEngine, ProcessStats};
pub use error::DeliveryError;
pub use handle::LocalityHandle;
