//! Errors raised by the registry actor (spec §4.11, server side).

use thiserror::Error;

use crate::message::{ErrorCode, ExtendedError};

#[derive(Debug, Error)]
pub enum RegistryError {
    /// `register_request` for a name already bound to a different address
    /// (spec §4.11 invariant: "name -> address is unique").
    #[error("name {name:?} is already registered to a different address")]
    AlreadyRegistered { name: String },

    /// `discovery_request` for a name with no current registration.
    #[error("no service is registered under {name:?}")]
    UnknownService { name: String },
}

impl RegistryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownService { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyRegistered { .. })
    }
}

impl From<RegistryError> for ExtendedError {
    fn from(error: RegistryError) -> Self {
        let code = match &error {
            RegistryError::AlreadyRegistered { .. } => ErrorCode::AlreadyRegistered,
            RegistryError::UnknownService { .. } => ErrorCode::UnknownService,
        };
        ExtendedError::new(error.to_string(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_registered_converts_to_the_stable_error_code() {
        let error = RegistryError::AlreadyRegistered { name: "svc".into() };
        assert!(error.is_conflict());
        let extended: ExtendedError = error.into();
        assert_eq!(extended.code(), ErrorCode::AlreadyRegistered);
    }

    #[test]
    fn unknown_service_is_not_found() {
        let error = RegistryError::UnknownService { name: "svc".into() };
        assert!(error.is_not_found());
    }
}
