//! `init_shutdown`: chain position marker for the INIT/SHUTDOWN gate
//! (spec §4.5). Grounded on `rotor::plugin::init_shutdown_plugin_t`
//! (`original_source/include/rotor/plugin/init_shutdown.h`), which there
//! subscribes to `init_request_t`/`shutdown_request_t` messages directly.
//!
//! This crate's `actor::ActorCore` receives `init_request`/
//! `shutdown_request`/`start_trigger` as direct method calls rather than
//! as ordinary subscribed messages (lifecycle transitions are
//! control-plane, not data-plane), so this plugin owns no reactions of
//! its own — it is kept only to preserve spec §4.5's canonical chain
//! ordering, which later plugins' relative positions depend on.
use crate::plugin::{Plugin, PluginHost, Reactions};

#[derive(Debug, Default)]
pub struct InitShutdownPlugin;

impl Plugin for InitShutdownPlugin {
    fn name(&self) -> &'static str {
        "init_shutdown"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) {}
}
