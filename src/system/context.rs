//! [`SystemContext`]: the monitor handles threaded through every
//! supervisor and actor, in place of global state (spec §4.12
//! "Monitoring" — "the explicit object threaded through supervisors").

use crate::monitoring::{
    ActorEvent, DeliveryEvent, InMemoryMonitor, LinkEvent, MonitoringConfig, PluginEvent,
    RegistryEvent, SpawnerEvent, SupervisionEvent, TimerEvent,
};

/// One cheap-clone monitor handle per event family. Cloning a
/// `SystemContext` clones its `Arc`s, not their history — every clone
/// observes the same underlying counters (spec §4.12, mirroring
/// [`InMemoryMonitor`]'s own clone semantics).
#[derive(Debug, Clone)]
pub struct SystemContext {
    pub actor: InMemoryMonitor<ActorEvent>,
    pub plugin: InMemoryMonitor<PluginEvent>,
    pub delivery: InMemoryMonitor<DeliveryEvent>,
    pub supervision: InMemoryMonitor<SupervisionEvent>,
    pub spawner: InMemoryMonitor<SpawnerEvent>,
    pub timer: InMemoryMonitor<TimerEvent>,
    pub link: InMemoryMonitor<LinkEvent>,
    pub registry: InMemoryMonitor<RegistryEvent>,
}

impl SystemContext {
    pub fn new(config: MonitoringConfig) -> Self {
        Self {
            actor: InMemoryMonitor::new(config.clone()),
            plugin: InMemoryMonitor::new(config.clone()),
            delivery: InMemoryMonitor::new(config.clone()),
            supervision: InMemoryMonitor::new(config.clone()),
            spawner: InMemoryMonitor::new(config.clone()),
            timer: InMemoryMonitor::new(config.clone()),
            link: InMemoryMonitor::new(config.clone()),
            registry: InMemoryMonitor::new(config),
        }
    }
}

impl Default for SystemContext {
    fn default() -> Self {
        Self::new(MonitoringConfig::default())
    }
}
