//! `starter`: last in the canonical chain, so first to run during the
//! reverse `START` walk (spec §4.5 "START"). Grounded on
//! `rotor::plugin::starter_plugin_t`
//! (`original_source/include/rotor/plugin/starter.h`).
//!
//! Holds the user actor's `on_start` hook; `actor::ActorCore` wires it in
//! when the chain is assembled, then transitions to OPERATIONAL once
//! `handle_start_all` returns.

use crate::plugin::{Plugin, PluginHost, Reactions};

type OnStart = Box<dyn FnMut()>;

pub struct StarterPlugin {
    on_start: OnStart,
}

impl StarterPlugin {
    pub fn new(on_start: impl FnMut() + 'static) -> Self {
        Self { on_start: Box::new(on_start) }
    }
}

impl Plugin for StarterPlugin {
    fn name(&self) -> &'static str {
        "starter"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
        reactions.insert(Reactions::START);
    }

    fn handle_start(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) {
        (self.on_start)();
    }
}
