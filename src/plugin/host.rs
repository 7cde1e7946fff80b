//! [`PluginHost`]: the narrow interface a [`crate::plugin::Plugin`] uses
//! to touch its owning actor, kept separate from `actor::ActorContext` so
//! `plugin` never depends on `actor` (spec §4.5 operates purely in terms
//! of "subscribe", "enable/disable reaction", "enqueue").

// Layer 3: Internal module imports
use crate::message::{Envelope, Handler};
use crate::subscription::SubscriptionError;
use crate::util::{Address, HandlerId};

/// A subscribe/unsubscribe notification delivered to plugins with the
/// `SUBSCRIPTION` reaction enabled (spec §4.5, §4.6 "emits `subscription`
/// if local, `external_subscription` if foreign").
#[derive(Debug, Clone)]
pub enum SubscriptionEvent {
    Subscribed { address: Address, handler: HandlerId, external: bool },
    Unsubscribed { address: Address, handler: HandlerId, external: bool },
}

/// Everything a plugin may do to its owning actor. Implemented by
/// `actor::ActorContext`.
pub trait PluginHost {
    /// This actor's own address.
    fn address(&self) -> &Address;

    /// Materialize a subscription point (spec §4.6 `subscribe`).
    fn subscribe(&mut self, address: Address, handler: Handler) -> Result<(), SubscriptionError>;

    /// Remove a subscription point (spec §4.6 `unsubscribe`).
    fn unsubscribe(&mut self, address: &Address, handler: HandlerId) -> Result<(), SubscriptionError>;

    /// Hand an envelope to this locality's delivery engine.
    fn enqueue(&mut self, envelope: Envelope);
}
