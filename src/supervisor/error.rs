//! Errors raised by the supervisor and spawner (spec §4.13 ambient error
//! handling). Grounded on `subscription::error::SubscriptionError`'s
//! shape: short messages, `is_*` predicates, a conversion into
//! [`ExtendedError`].

use thiserror::Error;

use crate::message::{ErrorCode, ExtendedError};
use crate::util::Address;

#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A child address was registered twice.
    #[error("{0} is already registered as a child of this supervisor")]
    ChildAlreadyRegistered(Address),

    /// A control message referenced a child this supervisor doesn't know.
    #[error("{0} is not a child of this supervisor")]
    UnknownChild(Address),

    /// Escalated from a child's shutdown reason (spec §7 "A supervisor
    /// aggregates its shutdown reason from its children's reasons when
    /// `escalate_failure` is set").
    #[error("child failure escalated: {0}")]
    Escalated(ExtendedError),

    /// `create_actor()...finish()` rejected the builder's config (spec
    /// §4.7 "Creation": "finish() validates the config").
    #[error("invalid child config: {0}")]
    InvalidChildConfig(String),
}

impl SupervisorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownChild(_))
    }

    pub fn is_escalation(&self) -> bool {
        matches!(self, Self::Escalated(_))
    }

    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidChildConfig(_))
    }
}

impl From<SupervisorError> for ExtendedError {
    fn from(error: SupervisorError) -> Self {
        let code = match &error {
            SupervisorError::ChildAlreadyRegistered(_) => ErrorCode::AlreadyRegistered,
            SupervisorError::UnknownChild(_) => ErrorCode::ActorMisconfigured,
            SupervisorError::Escalated(_) => ErrorCode::FailureEscalation,
            SupervisorError::InvalidChildConfig(_) => ErrorCode::ActorMisconfigured,
        };
        ExtendedError::new(error.to_string(), code)
    }
}

/// Errors raised by [`super::spawner::Spawner`] (spec §4.8).
#[derive(Debug, Error)]
pub enum SpawnerError {
    /// The exit kind isn't covered by the configured [`super::policy::RestartPolicy`].
    #[error("restart policy {policy} denies a respawn for this exit")]
    RestartDenied { policy: &'static str },

    /// `max_attempts` has already been reached (spec §8 "Spawner with
    /// max_attempts=N and always-failing factory makes exactly N attempts").
    #[error("restart limit of {max_attempts} attempts exceeded")]
    LimitExceeded { max_attempts: usize },
}

impl SpawnerError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RestartDenied { .. })
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LimitExceeded { .. })
    }
}

impl From<SpawnerError> for ExtendedError {
    fn from(error: SpawnerError) -> Self {
        ExtendedError::new(error.to_string(), ErrorCode::FailureEscalation)
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
    fn unknown_child_is_not_found() {
        let error = SupervisorError::UnknownChild(addr());
        assert!(error.is_not_found());
    }

    #[test]
    fn limit_exceeded_is_fatal_not_retryable() {
        let error = SpawnerError::LimitExceeded { max_attempts: 3 };
        assert!(error.is_fatal());
        assert!(!error.is_retryable());
    }

    #[test]
    fn restart_denied_is_retryable_not_fatal() {
        let error = SpawnerError::RestartDenied { policy: "never" };
        assert!(error.is_retryable());
        assert!(!error.is_fatal());
    }
}
