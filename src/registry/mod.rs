//! The registry actor's server-side state (spec §4.11 "Registry &
//! Registry Plugin"). The client side — `RegisterRequest`,
//! `DeregisterService`, `DiscoveryRequest`, `DiscoveryPromise`,
//! `DiscoveryCancel`, and `RegistryClientPlugin` — lives in
//! `plugin::builtin::registry`; this module is the other end of that
//! wire vocabulary.

mod error;
mod server;

pub use error::RegistryError;
pub use server::{DiscoveryResolved, Registry};
