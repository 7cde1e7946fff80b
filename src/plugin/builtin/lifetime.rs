//! `lifetime`: tracks whether this actor's address is still alive for the
//! duration plugins below it in the chain are active. Grounded on
//! `rotor::internal::actor_lifetime_plugin_t`
//! (`original_source/include/rotor/plugin/actor_lifetime.h`).
//!
//! The actor's overall phase transitions (NEW → ... → SHUT_DOWN) live on
//! `actor::ActorCore`, not here; this plugin only ever confirms — it
//! exists as the chain position later plugins anchor subscriptions to.

use crate::plugin::{Plugin, PluginHost, Reactions};

#[derive(Debug, Default)]
pub struct LifetimePlugin {
    active: bool,
}

impl Plugin for LifetimePlugin {
    fn name(&self) -> &'static str {
        "lifetime"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) {
        self.active = true;
    }

    fn deactivate(&mut self, _host: &mut dyn PluginHost) {
        self.active = false;
    }
}

impl LifetimePlugin {
    pub fn is_active(&self) -> bool {
        self.active
    }
}
