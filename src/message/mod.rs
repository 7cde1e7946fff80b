//! Messages, envelopes, handlers, and the chained [`ExtendedError`] type.
//!
//! Declarations only; see submodules for implementation (spec §3
//! "Message", "Handler", "Extended error").

mod envelope;
mod error;
mod handler;
mod traits;

pub use envelope::{Envelope, Kind, Outcome, Payload};
pub use error::{ErrorCode, ExtendedError, ShutdownCode};
pub use handler::{Continuation, Handler, HandlerFn, InterceptHost, InterceptTag};
pub use traits::{Message, Request};
