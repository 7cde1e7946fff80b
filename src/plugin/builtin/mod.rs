//! The canonical plugins spec §4.5 names, grounded one-for-one on
//! `rotor::plugin::*` (`original_source/include/rotor/plugin/`).
//!
//! Actor chain: `address_maker → lifetime → init_shutdown → link_server
//! → link_client → registry → resources → starter`. Supervisor chains
//! add `locality` (after `address_maker`) and `child_manager` (after
//! `foreigners_support`, modeled here as immediately before `resources`),
//! and use [`delivery`] in place of raw dispatch.

mod address_maker;
mod child_manager;
mod delivery;
mod init_shutdown;
mod lifetime;
mod link_client;
mod link_server;
mod locality;
mod registry;
mod resources;
mod starter;

pub use address_maker::AddressMakerPlugin;
pub use child_manager::{ChildFlags, ChildManagerPlugin, InitFailurePolicy, ShutdownOutcome};
pub use delivery::DeliveryPlugin;
pub use init_shutdown::InitShutdownPlugin;
pub use lifetime::LifetimePlugin;
pub use link_client::{LinkClientPlugin, LinkOutcome, LinkRequest, UnlinkNotify};
pub use link_server::{LinkServerPlugin, UnlinkRequest};
pub use locality::LocalityPlugin;
pub use registry::{
    DeregisterService, DiscoveryCancel, DiscoveryPhase, DiscoveryPromise, DiscoveryRequest, LinkIntent,
    RegisterRequest, RegistryClientPlugin,
};
pub use resources::ResourcesPlugin;
pub use starter::StarterPlugin;
