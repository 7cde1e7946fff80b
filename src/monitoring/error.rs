//! Errors a [`super::Monitor`] implementation can raise.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitoringError {
    #[error("monitoring configuration error: {message}")]
    Configuration { message: String },

    #[error("failed to record event: {message}")]
    RecordError { message: String },

    #[error("failed to generate snapshot: {message}")]
    SnapshotError { message: String },

    #[error("failed to reset monitor: {message}")]
    ResetError { message: String },
}

impl MonitoringError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }

    pub fn record(message: impl Into<String>) -> Self {
        Self::RecordError { message: message.into() }
    }

    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::SnapshotError { message: message.into() }
    }

    pub fn reset(message: impl Into<String>) -> Self {
        Self::ResetError { message: message.into() }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::RecordError { .. })
    }

    pub fn is_snapshot(&self) -> bool {
        matches!(self, Self::SnapshotError { .. })
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, Self::ResetError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helper_constructors_set_the_matching_predicate() {
        assert!(MonitoringError::configuration("bad").is_configuration());
        assert!(MonitoringError::record("bad").is_record());
        assert!(MonitoringError::snapshot("bad").is_snapshot());
        assert!(MonitoringError::reset("bad").is_reset());
    }

    #[test]
    fn display_carries_the_message() {
        let error = MonitoringError::record("lock poisoned");
        assert!(error.to_string().contains("lock poisoned"));
    }
}
