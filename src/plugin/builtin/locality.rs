//! `locality`: detects and records whether a supervisor is the locality
//! leader or joins a parent's locality (spec §4.5 chain note: supervisor
//! chains add `locality` after `address_maker`). Grounded on
//! `rotor::plugin::locality_plugin_t`
//! (`original_source/include/rotor/plugin/locality.h`).
//!
//! The actual leader/queue bookkeeping lives on `locality::DeliveryEngine`
//! and `locality::LocalityDirectory`, constructed by `supervisor::
//! SupervisorTree` before the chain runs — this plugin only records which
//! case applied, for diagnostics and for other plugins' benefit.

use crate::plugin::{Plugin, PluginHost, Reactions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalityPlugin {
    is_leader: bool,
}

impl LocalityPlugin {
    /// `is_leader` is decided by the supervisor tree before activation:
    /// true for the root of a locality, false when joining a parent that
    /// already shares one (spec: "detects top-level supervisor which
    /// uses the same locality").
    pub fn new(is_leader: bool) -> Self {
        Self { is_leader }
    }

    pub fn is_leader(&self) -> bool {
        self.is_leader
    }
}

impl Plugin for LocalityPlugin {
    fn name(&self) -> &'static str {
        "locality"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_leadership_as_constructed() {
        assert!(LocalityPlugin::new(true).is_leader());
        assert!(!LocalityPlugin::new(false).is_leader());
    }
}
