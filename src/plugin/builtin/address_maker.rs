//! `address_maker`: first plugin in every chain (spec §4.5). Grounded on
//! `rotor::plugin::address_maker_plugin_t`
//! (`original_source/include/rotor/plugin/address_maker.h`), which mints
//! the actor's own address before any other plugin runs.
//!
//! Address minting itself happens when the supervisor builds the actor
//! (see `supervisor::tree`); this plugin's only job is to confirm that an
//! address is already present before the rest of the chain activates —
//! a cheap, always-ready sanity check with no reactions of its own.

use crate::plugin::{Plugin, PluginHost, Reactions};

#[derive(Debug, Default)]
pub struct AddressMakerPlugin;

impl Plugin for AddressMakerPlugin {
    fn name(&self) -> &'static str {
        "address_maker"
    }

    fn activate(&mut self, host: &mut dyn PluginHost, _reactions: &mut Reactions) {
        debug_assert!(!host.address().to_string().is_empty());
    }
}
