//! The per-actor plugin chain: ordered activation/deactivation, the INIT
//! and SHUTDOWN polling gates, and the `START` walk (spec §4.5 "Plugin
//! Chain & Lifecycle").

mod chain;
mod host;
mod reactions;
mod shared;

pub mod builtin;

pub use chain::PluginChain;
pub use host::{PluginHost, SubscriptionEvent};
pub use reactions::{InitReadiness, Reactions, ShutdownReadiness};

// Layer 3: Internal module imports
use crate::message::ExtendedError;

/// One actor lifecycle participant (spec §4.5). Grounded on
/// `rotor::plugin::plugin_base_t` (`original_source/include/rotor/plugin/plugin_base.h`):
/// same four reaction bits, same activate/deactivate/poll split.
///
/// Dispatched through `Box<dyn Plugin>` in [`PluginChain`] — this is one
/// of the few places this crate reaches for `dyn`, because a chain must
/// hold a fixed, heterogeneous sequence of plugin kinds side by side.
///
/// Every method receives `reactions`, this plugin's own sticky reaction
/// mask (spec: "Reactions are sticky until toggled off") — a plugin
/// enables bits on it during `activate` and is responsible for clearing
/// them once its gate work is done.
pub trait Plugin {
    /// Stable name for logging/monitoring; not used for equality.
    fn name(&self) -> &'static str;

    /// Called once, in chain order, during actor activation. May
    /// subscribe handlers through `host` and enable reactions on
    /// `reactions` (spec: "may (a) subscribe handlers, (b) enable any of
    /// its reactions, (c) immediately confirm activation").
    fn activate(&mut self, host: &mut dyn PluginHost, reactions: &mut Reactions);

    /// Called once, in reverse activation order, when the plugin's
    /// reactions have all been turned off and the actor is unwinding
    /// (spec invariant: "Deactivation always happens in reverse
    /// activation order").
    fn deactivate(&mut self, host: &mut dyn PluginHost) {
        let _ = host;
    }

    /// Polled while the `INIT` reaction is enabled. Clear `INIT` on
    /// `reactions` once this returns `Ready` to stop being polled.
    fn poll_init(&mut self, host: &mut dyn PluginHost, reactions: &mut Reactions) -> InitReadiness {
        let _ = (host, reactions);
        InitReadiness::Ready
    }

    /// Run once, in reverse chain order, while the `START` reaction is
    /// enabled. The chain clears `START` immediately afterward.
    fn handle_start(&mut self, host: &mut dyn PluginHost, reactions: &mut Reactions) {
        let _ = (host, reactions);
    }

    /// Polled while the `SHUTDOWN` reaction is enabled, in reverse chain
    /// order. `reason` is the shutdown cause recorded when the gate
    /// opened. Clear `SHUTDOWN` once this returns `Ready`.
    fn poll_shutdown(
        &mut self,
        host: &mut dyn PluginHost,
        reactions: &mut Reactions,
        reason: &ExtendedError,
    ) -> ShutdownReadiness {
        let _ = (host, reactions, reason);
        ShutdownReadiness::Ready
    }

    /// Invoked while the `SUBSCRIPTION` reaction is enabled, once per
    /// subscribe/unsubscribe the chain's host performs.
    fn on_subscription_event(&mut self, host: &mut dyn PluginHost, event: &SubscriptionEvent) {
        let _ = (host, event);
    }
}
