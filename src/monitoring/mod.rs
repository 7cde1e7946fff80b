//! Observability for every other subsystem (spec.md §4.12, an ambient
//! addition not named by the distilled spec but present throughout the
//! original `rotor`/`airssys-rt` prior art as diagnostics threaded through
//! an explicit context object rather than global state).
//!
//! One [`MonitoringEvent`] enum per subsystem, recorded through the
//! generic [`Monitor`] trait. [`NoopMonitor`] is the zero-overhead
//! default; [`InMemoryMonitor`] is the bounded-history implementation
//! used by tests, debugging, and `system::SystemContext` when the host
//! application asks for it.

mod error;
mod in_memory;
mod noop;
mod traits;
mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{
    ActorEvent, ActorEventKind, DeliveryEvent, DeliveryEventKind, LinkEvent, LinkEventKind,
    MonitoringConfig, MonitoringSnapshot, PluginEvent, PluginEventKind, RegistryEvent,
    RegistryEventKind, SpawnerEvent, SpawnerEventKind, SupervisionEvent, SupervisionEventKind,
    TimerEvent, TimerEventKind,
};
