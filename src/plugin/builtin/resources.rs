//! `resources`: lets an actor hold shutdown open while some external
//! resource is still acquired (spec §4.5: "A plugin is free to hold
//! shutdown, e.g. `resources` when a resource counter > 0"). Grounded on
//! `rotor::plugin::resources_plugin_t`
//! (`original_source/include/rotor/plugin/resources.h`).

use std::collections::HashMap;

use crate::message::ExtendedError;
use crate::plugin::{Plugin, PluginHost, Reactions, ShutdownReadiness};

pub type ResourceId = u64;

/// Reference-counted resource tracker. `acquire`/`release` are typically
/// called by application code through an actor-exposed handle, not
/// directly by other plugins.
#[derive(Debug, Default)]
pub struct ResourcesPlugin {
    counts: HashMap<ResourceId, u32>,
}

impl ResourcesPlugin {
    pub fn acquire(&mut self, id: ResourceId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// Returns `true` if the count reached zero (i.e. this was the last
    /// reference).
    pub fn release(&mut self, id: ResourceId) -> bool {
        if let Some(count) = self.counts.get_mut(&id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&id);
                return true;
            }
        }
        false
    }

    pub fn has(&self, id: ResourceId) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    pub fn has_any(&self) -> bool {
        !self.counts.is_empty()
    }
}

impl Plugin for ResourcesPlugin {
    fn name(&self) -> &'static str {
        "resources"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
        reactions.insert(Reactions::SHUTDOWN);
    }

    fn poll_shutdown(
        &mut self,
        _host: &mut dyn PluginHost,
        _reactions: &mut Reactions,
        _reason: &ExtendedError,
    ) -> ShutdownReadiness {
        if self.has_any() {
            ShutdownReadiness::NotReady
        } else {
            ShutdownReadiness::Ready
        }
    }
}
