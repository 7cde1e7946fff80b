//! `delivery`: marks a supervisor chain as using the locality's
//! `DeliveryEngine` for dispatch instead of raw per-handler calls (spec
//! §4.5 chain note: "supervisor chains... use a delivery plugin instead
//! of raw dispatch"). Grounded on `rotor::plugin::delivery_plugin_t`
//! (`original_source/include/rotor/plugin/delivery.h`).
//!
//! `local_delivery_t::delivery` in the original forwards to external
//! handlers' owning supervisor and calls internal handlers directly —
//! exactly `locality::DeliveryEngine::process`'s `dispatch_local`/
//! `forward` split in this crate. That engine is constructed once per
//! locality leader, not per plugin chain, so this plugin carries no
//! state of its own; it exists to preserve chain-position ordering and
//! as a marker other plugins can check for.
use crate::plugin::{Plugin, PluginHost, Reactions};

#[derive(Debug, Default)]
pub struct DeliveryPlugin;

impl Plugin for DeliveryPlugin {
    fn name(&self) -> &'static str {
        "delivery"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) {}
}
