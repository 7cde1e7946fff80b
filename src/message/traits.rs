//! The [`Message`] trait: compile-time type identity for dynamically
//! dispatched payloads.
//!
//! Unlike a single-message-type actor, a subscription point in this
//! runtime can bind to any number of distinct message types on the same
//! address (spec §3 "Subscription point"). That forces the payload to be
//! type-erased at the edge (`Box<dyn Any + Send + Sync>`) and recovered
//! by a checked downcast inside the handler (spec §9 "Design Notes" —
//! "Handler polymorphism over message types"). `Message::type_id()` is
//! what lets the subscription map route an erased payload to the right
//! handlers without ever deserializing it.

// Layer 1: Standard library imports
use std::any::{Any, TypeId};
use std::fmt::Debug;

/// A message that can flow through the runtime.
///
/// Implementors only need `Send + Sync + Debug + 'static` — there is no
/// `Clone` requirement, because messages are shared by reference
/// (spec §3: "Messages are shared by reference; lifetime ends when all
/// queues and in-flight handler callbacks release them").
pub trait Message: Any + Send + Sync + Debug {
    /// The static type identity used to key subscriptions and route
    /// deliveries. Has a default based on `TypeId::of::<Self>()`; message
    /// types never need to override it.
    fn type_id_of(&self) -> TypeId
    where
        Self: Sized,
    {
        TypeId::of::<Self>()
    }

    /// Upcast to `&dyn Any` so the delivery engine can downcast back to a
    /// concrete type inside a handler.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync + Debug> Message for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A [`Message`] that names the reply type an `ActorContext::request`
/// call expects back (spec §4.6: "reply_to(req_msg, args) — construct a
/// response message of Req's associated response type"). Only the
/// request side needs this binding; a response type never implements
/// `Request` itself.
pub trait Request: Message {
    type Response: Message;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;

    #[derive(Debug)]
    struct Pong;

    impl Request for Ping {
        type Response = Pong;
    }

    #[test]
    fn request_names_its_response_type_at_compile_time() {
        fn response_type_id<R: Request>() -> TypeId {
            TypeId::of::<R::Response>()
        }
        assert_eq!(response_type_id::<Ping>(), TypeId::of::<Pong>());
    }

    #[test]
    fn distinct_types_have_distinct_type_ids() {
        let ping = Ping;
        let pong = Pong;
        assert_ne!(ping.type_id_of(), pong.as_any().type_id());
    }

    #[test]
    fn as_any_round_trips_through_downcast() {
        let ping = Ping;
        let erased: &dyn Any = ping.as_any();
        assert!(erased.downcast_ref::<Ping>().is_some());
        assert!(erased.downcast_ref::<Pong>().is_none());
    }
}
