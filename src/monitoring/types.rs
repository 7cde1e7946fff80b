//! Per-subsystem event payloads and monitor configuration.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::traits::{EventSeverity, MonitoringEvent};
use crate::util::{ActorId, LocalityId, RequestId};

/// Configuration for a [`super::Monitor`] implementation.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub max_history_size: usize,
    pub severity_filter: EventSeverity,
    #[serde(with = "crate::util::duration_serde")]
    pub snapshot_interval: Duration,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_history_size: 1000,
            severity_filter: EventSeverity::Info,
            snapshot_interval: Duration::from_secs(60),
        }
    }
}

/// Point-in-time read of a monitor's counters and recent history.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringSnapshot<E: MonitoringEvent> {
    pub timestamp: DateTime<Utc>,
    pub total_events: u64,
    pub trace_count: u64,
    pub debug_count: u64,
    pub info_count: u64,
    pub warning_count: u64,
    pub error_count: u64,
    pub critical_count: u64,
    pub recent_events: Vec<E>,
}

// ============================================================================
// Actor events (spec §4.6)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ActorEvent {
    pub timestamp: DateTime<Utc>,
    pub actor_id: ActorId,
    pub event_kind: ActorEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for ActorEvent {
    const EVENT_TYPE: &'static str = "actor";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            ActorEventKind::Activated => EventSeverity::Debug,
            ActorEventKind::Initialized => EventSeverity::Info,
            ActorEventKind::Operational => EventSeverity::Info,
            ActorEventKind::ShuttingDown { .. } => EventSeverity::Warning,
            ActorEventKind::ShutDown => EventSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ActorEventKind {
    Activated,
    Initialized,
    Operational,
    ShuttingDown { reason: String },
    ShutDown,
}

// ============================================================================
// Plugin chain events (spec §4.5)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PluginEvent {
    pub timestamp: DateTime<Utc>,
    pub plugin: &'static str,
    pub actor_id: ActorId,
    pub event_kind: PluginEventKind,
}

impl MonitoringEvent for PluginEvent {
    const EVENT_TYPE: &'static str = "plugin";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match self.event_kind {
            PluginEventKind::GateStalled { .. } => EventSeverity::Warning,
            _ => EventSeverity::Trace,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum PluginEventKind {
    Activated,
    InitReady,
    StartHandled,
    ShutdownReady,
    Deactivated,
    /// A gate (`INIT`/`SHUTDOWN`) has been polled without reaching
    /// `Ready` for longer than the caller's patience; purely advisory,
    /// never enforced by the chain itself.
    GateStalled { gate: &'static str, polls: u32 },
}

// ============================================================================
// Delivery engine events (spec §4.4)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryEvent {
    pub timestamp: DateTime<Utc>,
    pub locality: LocalityId,
    pub event_kind: DeliveryEventKind,
}

impl MonitoringEvent for DeliveryEvent {
    const EVENT_TYPE: &'static str = "delivery";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            DeliveryEventKind::Enqueued => EventSeverity::Trace,
            DeliveryEventKind::ForwardedExternal => EventSeverity::Trace,
            DeliveryEventKind::MessageDropped { .. } => EventSeverity::Debug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum DeliveryEventKind {
    Enqueued,
    ForwardedExternal,
    /// An envelope matched neither an internal nor external recipient
    /// and had no fallback to redirect to (spec.md §4.4 "handle_dropped").
    MessageDropped { message_type: String },
}

// ============================================================================
// Supervision events (spec §4.7)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SupervisionEvent {
    pub timestamp: DateTime<Utc>,
    pub supervisor_id: ActorId,
    pub child_id: Option<ActorId>,
    pub event_kind: SupervisionEventKind,
    pub metadata: HashMap<String, String>,
}

impl MonitoringEvent for SupervisionEvent {
    const EVENT_TYPE: &'static str = "supervision";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SupervisionEventKind::ChildRegistered => EventSeverity::Debug,
            SupervisionEventKind::ChildInitialized => EventSeverity::Info,
            SupervisionEventKind::ChildInitFailed { .. } => EventSeverity::Error,
            SupervisionEventKind::ChildShutdown { .. } => EventSeverity::Info,
            SupervisionEventKind::SupervisorShuttingDown { .. } => EventSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SupervisionEventKind {
    ChildRegistered,
    ChildInitialized,
    ChildInitFailed { reason: String },
    ChildShutdown { reason: String },
    SupervisorShuttingDown { reason: String },
}

// ============================================================================
// Spawner events (spec §4.8)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SpawnerEvent {
    pub timestamp: DateTime<Utc>,
    pub child_id: ActorId,
    pub event_kind: SpawnerEventKind,
}

impl MonitoringEvent for SpawnerEvent {
    const EVENT_TYPE: &'static str = "spawner";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            SpawnerEventKind::Spawned => EventSeverity::Info,
            SpawnerEventKind::RestartScheduled { .. } => EventSeverity::Warning,
            SpawnerEventKind::RestartDenied { .. } => EventSeverity::Warning,
            SpawnerEventKind::RestartLimitExceeded { .. } => EventSeverity::Critical,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum SpawnerEventKind {
    Spawned,
    RestartScheduled {
        attempt: u32,
        #[serde(with = "crate::util::duration_serde")]
        delay: Duration,
    },
    RestartDenied {
        policy: &'static str,
    },
    RestartLimitExceeded {
        attempts: u32,
    },
}

// ============================================================================
// Timer / request-response events (spec §4.9)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TimerEvent {
    pub timestamp: DateTime<Utc>,
    pub request_id: RequestId,
    pub event_kind: TimerEventKind,
}

impl MonitoringEvent for TimerEvent {
    const EVENT_TYPE: &'static str = "timer";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match self.event_kind {
            TimerEventKind::Started => EventSeverity::Trace,
            TimerEventKind::Cancelled => EventSeverity::Trace,
            TimerEventKind::TimedOut => EventSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type")]
pub enum TimerEventKind {
    Started,
    Cancelled,
    TimedOut,
}

// ============================================================================
// Link plugin events (spec §4.10)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct LinkEvent {
    pub timestamp: DateTime<Utc>,
    pub local: ActorId,
    pub remote: ActorId,
    pub event_kind: LinkEventKind,
}

impl MonitoringEvent for LinkEvent {
    const EVENT_TYPE: &'static str = "link";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            LinkEventKind::Requested => EventSeverity::Trace,
            LinkEventKind::Established => EventSeverity::Debug,
            LinkEventKind::Rejected { .. } => EventSeverity::Warning,
            LinkEventKind::Unlinked => EventSeverity::Debug,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum LinkEventKind {
    Requested,
    Established,
    Rejected { reason: String },
    Unlinked,
}

// ============================================================================
// Registry events (spec §4.11)
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RegistryEvent {
    pub timestamp: DateTime<Utc>,
    pub name: String,
    pub event_kind: RegistryEventKind,
}

impl MonitoringEvent for RegistryEvent {
    const EVENT_TYPE: &'static str = "registry";

    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn severity(&self) -> EventSeverity {
        match &self.event_kind {
            RegistryEventKind::Registered => EventSeverity::Info,
            RegistryEventKind::Deregistered => EventSeverity::Info,
            RegistryEventKind::DiscoveryResolved => EventSeverity::Trace,
            RegistryEventKind::DiscoveryFailed { .. } => EventSeverity::Warning,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum RegistryEventKind {
    Registered,
    Deregistered,
    DiscoveryResolved,
    DiscoveryFailed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitoring_config_default_matches_documented_values() {
        let config = MonitoringConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_history_size, 1000);
        assert_eq!(config.severity_filter, EventSeverity::Info);
        assert_eq!(config.snapshot_interval, Duration::from_secs(60));
    }

    #[test]
    fn delivery_event_message_dropped_is_debug_severity() {
        let event = DeliveryEvent {
            timestamp: Utc::now(),
            locality: LocalityId::new(),
            event_kind: DeliveryEventKind::MessageDropped { message_type: "Ping".into() },
        };
        assert_eq!(event.severity(), EventSeverity::Debug);
    }

    #[test]
    fn spawner_restart_limit_exceeded_is_critical() {
        let event = SpawnerEvent {
            timestamp: Utc::now(),
            child_id: ActorId::new(),
            event_kind: SpawnerEventKind::RestartLimitExceeded { attempts: 5 },
        };
        assert_eq!(event.severity(), EventSeverity::Critical);
    }

    #[test]
    fn registry_event_type_tag_is_stable() {
        assert_eq!(RegistryEvent::EVENT_TYPE, "registry");
        assert_eq!(LinkEvent::EVENT_TYPE, "link");
        assert_eq!(TimerEvent::EVENT_TYPE, "timer");
    }
}
