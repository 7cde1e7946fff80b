//! Zero-overhead [`Monitor`] that discards every event.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;

use super::error::MonitoringError;
use super::traits::{Monitor, MonitoringEvent};
use super::types::MonitoringSnapshot;

/// The default monitor for production: every method is a no-op, so a
/// `SystemContext` built without an explicit monitor costs nothing at
/// runtime beyond the `PhantomData` marker.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMonitor<E: MonitoringEvent> {
    _phantom: PhantomData<E>,
}

impl<E: MonitoringEvent> NoopMonitor<E> {
    #[inline(always)]
    pub fn new() -> Self {
        Self { _phantom: PhantomData }
    }
}

#[async_trait]
impl<E: MonitoringEvent> Monitor<E> for NoopMonitor<E> {
    #[inline(always)]
    async fn record(&self, _event: E) -> Result<(), MonitoringError> {
        Ok(())
    }

    #[inline(always)]
    async fn snapshot(&self) -> Result<MonitoringSnapshot<E>, MonitoringError> {
        Ok(MonitoringSnapshot {
            timestamp: Utc::now(),
            total_events: 0,
            trace_count: 0,
            debug_count: 0,
            info_count: 0,
            warning_count: 0,
            error_count: 0,
            critical_count: 0,
            recent_events: Vec::new(),
        })
    }

    #[inline(always)]
    async fn reset(&self) -> Result<(), MonitoringError> {
        Ok(())
    }
}
