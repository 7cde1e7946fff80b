//! [`ErrorCode`] (spec §6.2, stable and exit-code meaningful) and
//! [`ExtendedError`], the chained error that flows through shutdown
//! reasons, response payloads, and supervisor escalation (spec §3
//! "Extended error", §7 "Propagation").

// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use crate::util::RequestId;

/// Stable error codes, shared across every subsystem (spec §6.2).
///
/// These are intentionally a flat enum rather than per-module error
/// types: callers that only care about "did this succeed, and if not,
/// which of a small stable set of reasons" (e.g. a requester matching on
/// a response's error) should not need to depend on every module's
/// error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Success,
    Cancelled,
    RequestTimeout,
    SupervisorDefined,
    AlreadyRegistered,
    ActorMisconfigured,
    ActorNotLinkable,
    AlreadyLinked,
    FailureEscalation,
    UnknownService,
    DiscoveryFailed,
    RegistrationFailed,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Success => "success",
            Self::Cancelled => "cancelled",
            Self::RequestTimeout => "request_timeout",
            Self::SupervisorDefined => "supervisor_defined",
            Self::AlreadyRegistered => "already_registered",
            Self::ActorMisconfigured => "actor_misconfigured",
            Self::ActorNotLinkable => "actor_not_linkable",
            Self::AlreadyLinked => "already_linked",
            Self::FailureEscalation => "failure_escalation",
            Self::UnknownService => "unknown_service",
            Self::DiscoveryFailed => "discovery_failed",
            Self::RegistrationFailed => "registration_failed",
        };
        f.write_str(text)
    }
}

/// Shutdown reason codes (spec §6.2 "Shutdown codes").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownCode {
    Normal,
    SupervisorShutdown,
    ChildInitFailed,
    ChildDown,
    InitFailed,
    LinkFailed,
    UnlinkRequested,
}

impl fmt::Display for ShutdownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Normal => "normal",
            Self::SupervisorShutdown => "supervisor_shutdown",
            Self::ChildInitFailed => "child_init_failed",
            Self::ChildDown => "child_down",
            Self::InitFailed => "init_failed",
            Self::LinkFailed => "link_failed",
            Self::UnlinkRequested => "unlink_requested",
        };
        f.write_str(text)
    }
}

/// A chainable error carrying `{context, code, optional cause, optional
/// originating request}` (spec §3 "Extended error").
///
/// Walking `.cause()` repeatedly reaches the root cause (spec §7
/// "Propagation": "The root cause is retrievable by walking `.cause` to
/// the end").
#[derive(Debug, Clone)]
pub struct ExtendedError {
    context: String,
    code: ErrorCode,
    cause: Option<Box<ExtendedError>>,
    request: Option<RequestId>,
}

impl ExtendedError {
    /// Build a root-level extended error with no cause.
    pub fn new(context: impl Into<String>, code: ErrorCode) -> Self {
        Self {
            context: context.into(),
            code,
            cause: None,
            request: None,
        }
    }

    /// Wrap an existing extended error, adding a layer of context.
    pub fn wrap(context: impl Into<String>, code: ErrorCode, cause: ExtendedError) -> Self {
        Self {
            context: context.into(),
            code,
            cause: Some(Box::new(cause)),
            request: None,
        }
    }

    /// Attach the request this error originated from (used by
    /// request/response timeout synthesis, spec §4.6 "Timeout semantics").
    pub fn with_request(mut self, request: RequestId) -> Self {
        self.request = Some(request);
        self
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn cause(&self) -> Option<&ExtendedError> {
        self.cause.as_deref()
    }

    pub fn originating_request(&self) -> Option<RequestId> {
        self.request
    }

    /// Walk the cause chain to its end.
    pub fn root_cause(&self) -> &ExtendedError {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }
}

impl fmt::Display for ExtendedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.context, self.code)?;
        if let Some(cause) = &self.cause {
            write!(f, ": caused by {cause}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ExtendedError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_cause_walks_to_the_end_of_the_chain() {
        let root = ExtendedError::new("timer fired", ErrorCode::RequestTimeout);
        let mid = ExtendedError::wrap("request failed", ErrorCode::RequestTimeout, root);
        let top = ExtendedError::wrap("actor shutting down", ErrorCode::SupervisorDefined, mid);

        assert_eq!(top.root_cause().context(), "timer fired");
        assert_eq!(top.root_cause().code(), ErrorCode::RequestTimeout);
    }

    #[test]
    fn root_cause_of_a_childless_error_is_itself() {
        let only = ExtendedError::new("standalone", ErrorCode::Cancelled);
        assert_eq!(only.root_cause().context(), "standalone");
    }

    #[test]
    fn display_includes_causal_chain() {
        let root = ExtendedError::new("inner", ErrorCode::UnknownService);
        let top = ExtendedError::wrap("outer", ErrorCode::DiscoveryFailed, root);
        let rendered = top.to_string();
        assert!(rendered.contains("outer"));
        assert!(rendered.contains("inner"));
    }

    #[test]
    fn originating_request_is_attached_and_readable() {
        let allocator = crate::util::RequestIdAllocator::new();
        let req = allocator.allocate(|_| false);
        let err = ExtendedError::new("timed out", ErrorCode::RequestTimeout).with_request(req);
        assert_eq!(err.originating_request(), Some(req));
    }
}
