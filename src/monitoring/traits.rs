//! [`MonitoringEvent`] and the generic [`Monitor`] sink trait.

use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::MonitoringError;
use super::types::MonitoringSnapshot;

/// Event severity, ordered low to high for threshold filtering
/// (spec.md §4.12: dropped-message logging is gated at `Debug`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum EventSeverity {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

/// A type observable through [`Monitor`]. One event enum per subsystem
/// (`ActorEvent`, `PluginEvent`, `DeliveryEvent`, `SupervisionEvent`,
/// `SpawnerEvent`, `TimerEvent`, `LinkEvent`, `RegistryEvent`) implements
/// this so each can be recorded, filtered, and snapshotted uniformly.
pub trait MonitoringEvent: Send + Sync + Clone + Debug + Serialize + 'static {
    const EVENT_TYPE: &'static str;

    fn timestamp(&self) -> DateTime<Utc>;

    fn severity(&self) -> EventSeverity;
}

/// Generic observation sink for one event family. `NoopMonitor` and
/// `InMemoryMonitor` are the two implementations carried by this crate;
/// a host application can supply its own (e.g. bridging to `tracing` or
/// a metrics backend) by implementing this trait directly.
#[async_trait]
pub trait Monitor<E: MonitoringEvent>: Send + Sync + Clone {
    async fn record(&self, event: E) -> Result<(), MonitoringError>;

    async fn snapshot(&self) -> Result<MonitoringSnapshot<E>, MonitoringError>;

    async fn reset(&self) -> Result<(), MonitoringError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_is_trace_to_critical() {
        assert!(EventSeverity::Trace < EventSeverity::Debug);
        assert!(EventSeverity::Debug < EventSeverity::Info);
        assert!(EventSeverity::Info < EventSeverity::Warning);
        assert!(EventSeverity::Warning < EventSeverity::Error);
        assert!(EventSeverity::Error < EventSeverity::Critical);
    }
}
