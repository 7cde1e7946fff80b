//! System-level error types (spec §4.13 ambient error handling,
//! `SystemError`). Grounded on the teacher's `system/errors.rs`
//! canonical-struct convention.

use thiserror::Error;

use crate::message::{ErrorCode, ExtendedError};
use crate::util::Address;

#[derive(Error, Debug)]
pub enum SystemError {
    /// Configuration failed `validate()`.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// `spawn`/`register_locality` called after `shutdown()`.
    #[error("system is shutting down")]
    ShuttingDown,

    /// A supervisor or plugin escalated a failure to the top of the tree.
    #[error("unrecoverable failure at {address}: {reason}")]
    UnrecoverableFailure { address: Address, reason: ExtendedError },

    /// `shutdown()` did not complete within the configured timeout.
    #[error("system shutdown did not complete within the configured timeout")]
    ShutdownTimeout,
}

impl SystemError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnrecoverableFailure { .. } | Self::ShutdownTimeout)
    }

    pub fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }
}

impl From<SystemError> for ExtendedError {
    fn from(error: SystemError) -> Self {
        let code = match &error {
            SystemError::Configuration(_) => ErrorCode::ActorMisconfigured,
            SystemError::ShuttingDown => ErrorCode::Cancelled,
            SystemError::UnrecoverableFailure { .. } => ErrorCode::FailureEscalation,
            SystemError::ShutdownTimeout => ErrorCode::RequestTimeout,
        };
        ExtendedError::new(error.to_string(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{ActorId, LocalityId};

    fn addr() -> Address {
        Address::new(LocalityId::new(), ActorId::new(), None)
    }

    #[test]
    fn unrecoverable_failure_is_fatal_and_not_recoverable() {
        let error = SystemError::UnrecoverableFailure {
            address: addr(),
            reason: ExtendedError::new("child died", ErrorCode::FailureEscalation),
        };
        assert!(error.is_fatal());
        assert!(!error.is_recoverable());
    }

    #[test]
    fn configuration_error_is_recoverable() {
        let error = SystemError::Configuration("bad timeout".into());
        assert!(error.is_recoverable());
    }

    #[test]
    fn converts_into_the_matching_error_code() {
        let extended: ExtendedError = SystemError::ShuttingDown.into();
        assert_eq!(extended.code(), ErrorCode::Cancelled);
    }
}
