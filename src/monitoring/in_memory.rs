//! Bounded ring-buffer [`Monitor`] used by tests and debugging.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use super::error::MonitoringError;
use super::traits::{EventSeverity, Monitor, MonitoringEvent};
use super::types::{MonitoringConfig, MonitoringSnapshot};

/// Cheap-clone, thread-safe monitor: atomic counters plus a bounded
/// history ring buffer behind an `RwLock` (read-heavy workload —
/// snapshotting is far more common than recording bursts).
#[derive(Debug)]
pub struct InMemoryMonitor<E: MonitoringEvent> {
    inner: Arc<Inner<E>>,
}

#[derive(Debug)]
struct Inner<E: MonitoringEvent> {
    config: MonitoringConfig,
    total_events: AtomicU64,
    trace_count: AtomicU64,
    debug_count: AtomicU64,
    info_count: AtomicU64,
    warning_count: AtomicU64,
    error_count: AtomicU64,
    critical_count: AtomicU64,
    history: RwLock<VecDeque<E>>,
}

impl<E: MonitoringEvent> InMemoryMonitor<E> {
    pub fn new(config: MonitoringConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                total_events: AtomicU64::new(0),
                trace_count: AtomicU64::new(0),
                debug_count: AtomicU64::new(0),
                info_count: AtomicU64::new(0),
                warning_count: AtomicU64::new(0),
                error_count: AtomicU64::new(0),
                critical_count: AtomicU64::new(0),
                history: RwLock::new(VecDeque::new()),
            }),
        }
    }

    fn bump(&self, severity: EventSeverity) {
        let counter = match severity {
            EventSeverity::Trace => &self.inner.trace_count,
            EventSeverity::Debug => &self.inner.debug_count,
            EventSeverity::Info => &self.inner.info_count,
            EventSeverity::Warning => &self.inner.warning_count,
            EventSeverity::Error => &self.inner.error_count,
            EventSeverity::Critical => &self.inner.critical_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl<E: MonitoringEvent> Clone for InMemoryMonitor<E> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

#[async_trait]
impl<E: MonitoringEvent> Monitor<E> for InMemoryMonitor<E> {
    async fn record(&self, event: E) -> Result<(), MonitoringError> {
        if !self.inner.config.enabled {
            return Ok(());
        }
        let severity = event.severity();
        if severity < self.inner.config.severity_filter {
            return Ok(());
        }

        self.inner.total_events.fetch_add(1, Ordering::Relaxed);
        self.bump(severity);

        let mut history = self
            .inner
            .history
            .write()
            .map_err(|e| MonitoringError::record(format!("history lock poisoned: {e}")))?;
        if history.len() >= self.inner.config.max_history_size {
            history.pop_front();
        }
        history.push_back(event);
        Ok(())
    }

    async fn snapshot(&self) -> Result<MonitoringSnapshot<E>, MonitoringError> {
        let history = self
            .inner
            .history
            .read()
            .map_err(|e| MonitoringError::snapshot(format!("history lock poisoned: {e}")))?;

        Ok(MonitoringSnapshot {
            timestamp: Utc::now(),
            total_events: self.inner.total_events.load(Ordering::Relaxed),
            trace_count: self.inner.trace_count.load(Ordering::Relaxed),
            debug_count: self.inner.debug_count.load(Ordering::Relaxed),
            info_count: self.inner.info_count.load(Ordering::Relaxed),
            warning_count: self.inner.warning_count.load(Ordering::Relaxed),
            error_count: self.inner.error_count.load(Ordering::Relaxed),
            critical_count: self.inner.critical_count.load(Ordering::Relaxed),
            recent_events: history.iter().cloned().collect(),
        })
    }

    async fn reset(&self) -> Result<(), MonitoringError> {
        self.inner.total_events.store(0, Ordering::Relaxed);
        self.inner.trace_count.store(0, Ordering::Relaxed);
        self.inner.debug_count.store(0, Ordering::Relaxed);
        self.inner.info_count.store(0, Ordering::Relaxed);
        self.inner.warning_count.store(0, Ordering::Relaxed);
        self.inner.critical_count.store(0, Ordering::Relaxed);
        self.inner.error_count.store(0, Ordering::Relaxed);

        let mut history = self
            .inner
            .history
            .write()
            .map_err(|e| MonitoringError::reset(format!("history lock poisoned: {e}")))?;
        history.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitoring::types::{ActorEvent, ActorEventKind};
    use crate::util::ActorId;
    use std::collections::HashMap;

    fn event(kind: ActorEventKind) -> ActorEvent {
        ActorEvent { timestamp: Utc::now(), actor_id: ActorId::new(), event_kind: kind, metadata: HashMap::new() }
    }

    #[tokio::test]
    async fn recording_increments_total_and_history() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        monitor.record(event(ActorEventKind::Operational)).await.unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 1);
        assert_eq!(snapshot.info_count, 1);
        assert_eq!(snapshot.recent_events.len(), 1);
    }

    #[tokio::test]
    async fn severity_filter_drops_events_below_threshold() {
        let config = MonitoringConfig { severity_filter: EventSeverity::Warning, ..MonitoringConfig::default() };
        let monitor = InMemoryMonitor::new(config);
        monitor.record(event(ActorEventKind::Activated)).await.unwrap(); // Debug, filtered
        monitor.record(event(ActorEventKind::ShuttingDown { reason: "x".into() })).await.unwrap(); // Warning, kept

        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 1);
        assert_eq!(snapshot.warning_count, 1);
    }

    #[tokio::test]
    async fn history_ring_buffer_caps_at_max_size() {
        let config = MonitoringConfig { max_history_size: 3, ..MonitoringConfig::default() };
        let monitor = InMemoryMonitor::new(config);
        for _ in 0..10 {
            monitor.record(event(ActorEventKind::Operational)).await.unwrap();
        }
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 10);
        assert_eq!(snapshot.recent_events.len(), 3);
    }

    #[tokio::test]
    async fn reset_clears_counters_and_history() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        monitor.record(event(ActorEventKind::Operational)).await.unwrap();
        monitor.reset().await.unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 0);
        assert_eq!(snapshot.recent_events.len(), 0);
    }

    #[tokio::test]
    async fn disabled_monitor_never_records() {
        let config = MonitoringConfig { enabled: false, ..MonitoringConfig::default() };
        let monitor = InMemoryMonitor::new(config);
        monitor.record(event(ActorEventKind::Operational)).await.unwrap();
        let snapshot = monitor.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 0);
    }

    #[tokio::test]
    async fn clone_shares_the_same_underlying_state() {
        let monitor = InMemoryMonitor::new(MonitoringConfig::default());
        let clone = monitor.clone();
        monitor.record(event(ActorEventKind::Operational)).await.unwrap();
        let snapshot = clone.snapshot().await.unwrap();
        assert_eq!(snapshot.total_events, 1);
    }
}
