//! [`Envelope`], the immutable, reference-shared message shell that
//! carries a destination, a type-erased payload, and routing metadata for
//! the three sub-kinds spec §3 defines: plain, request, response.

// Layer 1: Standard library imports
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

// Layer 3: Internal module imports
use super::error::ExtendedError;
use super::traits::{Message, Request};
use crate::util::{Address, RequestId};

/// A type-erased message payload, held behind `Arc<dyn Message>` so
/// envelopes can cross locality threads and be cheaply retargeted onto a
/// fallback address without re-boxing the message (spec §9 "Design
/// Notes": "Erase the message type at the edge").
pub struct Payload {
    type_id: TypeId,
    type_name: &'static str,
    inner: Arc<dyn Message + Send + Sync>,
}

impl Payload {
    /// Box up a concrete message, recording its static type identity for
    /// routing (spec §4.2: "the type-tag is derived statically from the
    /// message type").
    pub fn new<M: Message + Send + Sync + 'static>(message: M) -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: std::any::type_name::<M>(),
            inner: Arc::new(message),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Recover the concrete message, if `M` matches the type this payload
    /// was built from.
    pub fn downcast_ref<M: Message + 'static>(&self) -> Option<&M> {
        self.inner.as_any().downcast_ref::<M>()
    }
}

impl Clone for Payload {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            inner: self.inner.clone(),
        }
    }
}

impl Payload {
    /// A value-less payload tagged with someone else's type identity.
    /// Used to give an error response the same dispatch key a successful
    /// one would have carried, so a handler subscribed on the response
    /// type receives either outcome (spec §3: a response "carries...
    /// either a payload or an extended error" to the *same* subscriber).
    fn tagged_unit(type_id: TypeId, type_name: &'static str) -> Self {
        Self { type_id, type_name, inner: Arc::new(()) }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("type_name", &self.type_name)
            .field("value", &self.inner)
            .finish()
    }
}

/// The outcome carried by a response envelope: either the reply payload
/// or a chained [`ExtendedError`] (spec §3: "carries... either a payload
/// or an extended error").
#[derive(Debug)]
pub enum Outcome {
    Payload(Payload),
    Error(ExtendedError),
}

/// Routing metadata distinguishing the three message sub-kinds (spec §3).
#[derive(Debug)]
pub enum Kind {
    /// A plain, fire-and-forget message.
    Plain,
    /// A request: carries a fresh id, the address replies should go to,
    /// and the `TypeId` of the response type the requester expects (so
    /// an error reply can be dispatch-tagged the same as a success one).
    Request {
        id: RequestId,
        reply_to: Address,
        response_type: TypeId,
    },
    /// A response correlated to an earlier request.
    Response { id: RequestId, outcome: Outcome },
}

/// An immutable, reference-counted message envelope (spec §3 "Message").
///
/// Cloning an `Envelope` is cheap (`Arc` clone); all clones share the same
/// payload, matching "lifetime ends when all queues and in-flight handler
/// callbacks release them."
#[derive(Debug, Clone)]
pub struct Envelope(Arc<EnvelopeInner>);

#[derive(Debug)]
struct EnvelopeInner {
    destination: Address,
    sender: Option<Address>,
    payload: Payload,
    kind: Kind,
    /// A routed message's fallback target (spec §4.4 "Dropped-message
    /// policy"): if `destination` has no recipients, the delivery engine
    /// re-targets here before giving up.
    fallback: Option<Address>,
}

impl Envelope {
    /// Build a plain, fire-and-forget envelope.
    pub fn plain<M: Message + Send + Sync + 'static>(destination: Address, message: M) -> Self {
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::new(message),
            kind: Kind::Plain,
            fallback: None,
        }))
    }

    /// Build a plain envelope with a fallback address (spec §4.4 "routed"
    /// message variant).
    pub fn routed<M: Message + Send + Sync + 'static>(
        destination: Address,
        message: M,
        fallback: Address,
    ) -> Self {
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::new(message),
            kind: Kind::Plain,
            fallback: Some(fallback),
        }))
    }

    /// Build a request envelope with a fresh request id and reply-to
    /// address. The response dispatch tag defaults to `M` itself; control
    /// messages consumed through `actor::ActorCore`'s direct-call plugins
    /// (link/registry) never look this tag up, so it goes unused there.
    /// Use [`Envelope::request_for`] when the caller wants error replies
    /// to reach a handler subscribed on the real response type.
    pub fn request<M: Message + Send + Sync + 'static>(
        destination: Address,
        message: M,
        id: RequestId,
        reply_to: Address,
    ) -> Self {
        let response_type = TypeId::of::<M>();
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::new(message),
            kind: Kind::Request { id, reply_to, response_type },
            fallback: None,
        }))
    }

    /// Build a request envelope whose `response_type` is `Req::Response`
    /// (spec §4.6 `request<Req>(addr, args).send(timeout)`), so a
    /// `request_timeout`/error reply dispatches to the same subscriber a
    /// successful `Req::Response` would have.
    pub fn request_for<Req: Request + Send + Sync + 'static>(
        destination: Address,
        message: Req,
        id: RequestId,
        reply_to: Address,
    ) -> Self {
        let response_type = TypeId::of::<Req::Response>();
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::new(message),
            kind: Kind::Request { id, reply_to, response_type },
            fallback: None,
        }))
    }

    /// Build a successful response envelope correlated to `id`.
    pub fn response<M: Message + Send + Sync + 'static>(
        destination: Address,
        message: M,
        id: RequestId,
    ) -> Self {
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::new(()),
            kind: Kind::Response {
                id,
                outcome: Outcome::Payload(Payload::new(message)),
            },
            fallback: None,
        }))
    }

    /// Build an error response envelope correlated to `id`, dispatch-tagged
    /// as `()` — fine for control messages routed by direct call, but a
    /// generic-request error reply should go through
    /// [`Envelope::response_error_for`] instead so it still reaches the
    /// handler subscribed on the real response type.
    pub fn response_error(destination: Address, id: RequestId, error: ExtendedError) -> Self {
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::new(()),
            kind: Kind::Response {
                id,
                outcome: Outcome::Error(error),
            },
            fallback: None,
        }))
    }

    /// Build an error response envelope tagged with `response_type` so it
    /// dispatches to whatever handler is subscribed on that response type
    /// (spec §3: "carries... either a payload or an extended error" to the
    /// same subscriber).
    pub fn response_error_for(
        destination: Address,
        id: RequestId,
        error: ExtendedError,
        response_type: TypeId,
    ) -> Self {
        Self(Arc::new(EnvelopeInner {
            destination,
            sender: None,
            payload: Payload::tagged_unit(response_type, "<response-error>"),
            kind: Kind::Response {
                id,
                outcome: Outcome::Error(error),
            },
            fallback: None,
        }))
    }

    pub fn destination(&self) -> &Address {
        &self.0.destination
    }

    pub fn sender(&self) -> Option<&Address> {
        self.0.sender.as_ref()
    }

    /// The reply payload for a response envelope's success outcome.
    pub fn payload(&self) -> &Payload {
        match &self.0.kind {
            Kind::Response { outcome: Outcome::Payload(payload), .. } => payload,
            _ => &self.0.payload,
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    pub fn fallback(&self) -> Option<&Address> {
        self.0.fallback.as_ref()
    }

    pub fn request_id(&self) -> Option<RequestId> {
        match &self.0.kind {
            Kind::Request { id, .. } | Kind::Response { id, .. } => Some(*id),
            _ => None,
        }
    }

    pub fn reply_to(&self) -> Option<&Address> {
        match &self.0.kind {
            Kind::Request { reply_to, .. } => Some(reply_to),
            _ => None,
        }
    }

    /// Build a copy of this envelope retargeted at its fallback address,
    /// for the delivery engine's dropped-message policy (spec §4.4: "a
    /// routed message variant carries a fallback address... the engine
    /// re-targets the message to the fallback before dropping"). Returns
    /// `None` if this envelope carries no fallback.
    pub fn redirect_to_fallback(&self) -> Option<Envelope> {
        let fallback = self.0.fallback.as_ref()?.clone();
        Some(Envelope(Arc::new(EnvelopeInner {
            destination: fallback,
            sender: self.0.sender.clone(),
            payload: self.0.payload.clone(),
            kind: Kind::Plain,
            fallback: None,
        })))
    }
}
