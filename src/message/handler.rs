//! [`Handler`]: a binding between a message type and either an actor
//! method or a closure, with support for tagged interception (spec §3
//! "Handler", §4.2).
//!
//! Handlers are `!Send` by design: all state owned by a single locality
//! (handlers, the subscription map, the plugin chain, actor state) is
//! built and lives entirely on the OS thread that locality runs on — a
//! `LoopAdapter` backend is expected to construct a locality's actors via
//! a factory that runs *on* the target thread, never construct-then-move
//! (spec §5 "Scheduling": "a locality runs single-threaded cooperative").
//! That lets handlers close over `Rc<RefCell<_>>` actor state directly
//! instead of paying for synchronization nothing ever contends on.

// Layer 1: Standard library imports
use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

// Layer 3: Internal module imports
use super::envelope::Envelope;
use crate::util::{ActorId, HandlerId};

/// A unique tag identifying who is intercepting a handler (typically a
/// supervisor's identity). Tagging the same handler with the same tag
/// twice is a no-op (spec §3: "tagging is idempotent per tag").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InterceptTag(ActorId);

impl InterceptTag {
    pub fn new(owner: ActorId) -> Self {
        Self(owner)
    }
}

/// The "rest of the call" an interceptor may invoke to run the original
/// handler body. Supervisors that don't want to preempt a call invoke
/// this immediately (spec §4.2: "the supervisor's default continuation
/// runs the original").
#[derive(Clone)]
pub struct Continuation(Rc<RefCell<dyn FnMut(Envelope)>>);

impl Continuation {
    fn new(inner: Rc<RefCell<dyn FnMut(Envelope)>>) -> Self {
        Self(inner)
    }

    /// Run the wrapped original handler body.
    pub fn run(&self, envelope: Envelope) {
        (self.0.borrow_mut())(envelope);
    }
}

impl fmt::Debug for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Continuation(..)")
    }
}

/// A host that can preempt, reorder, or drop a tagged handler's calls
/// (spec §4.2: "invoke on an interceptor calls
/// `supervisor.intercept(message, tag, continuation)`"). Implemented by
/// whatever owns the tag — ordinarily a supervisor.
pub trait InterceptHost {
    fn intercept(&self, envelope: Envelope, tag: InterceptTag, continuation: Continuation);
}

/// A function signature for `Handler`'s boxed callback body: operates on
/// the still-erased envelope so the subscription map never needs to know
/// concrete message types.
pub type HandlerFn = Rc<RefCell<dyn FnMut(Envelope)>>;

enum Body {
    Direct(HandlerFn),
    Intercepted {
        tag: InterceptTag,
        host: Rc<dyn InterceptHost>,
        continuation: Continuation,
    },
}

/// A binding between a message type and a handler body (spec §3
/// "Handler"). May be a plain callback or, after [`Handler::upgrade`], a
/// tagged interceptor.
pub struct Handler {
    id: HandlerId,
    type_id: TypeId,
    body: Body,
}

impl Handler {
    /// Bind a callback for message type `M`, owned by `owner`.
    pub fn new<M, F>(owner: ActorId, mut callback: F) -> Self
    where
        M: 'static,
        F: FnMut(&M) + 'static,
    {
        Self::with_envelope::<M, _>(owner, move |_envelope, message| callback(message))
    }

    /// Like [`Handler::new`], but the callback also receives the whole
    /// envelope — needed by a handler that must reply (spec §4.6
    /// `reply_to`/`reply_with_error` take the original envelope to read
    /// its `request_id`/`reply_to`, which the downcast payload alone
    /// doesn't carry).
    pub fn with_envelope<M, F>(owner: ActorId, mut callback: F) -> Self
    where
        M: 'static,
        F: FnMut(&Envelope, &M) + 'static,
    {
        let type_id = TypeId::of::<M>();
        let wrapped: HandlerFn = Rc::new(RefCell::new(move |envelope: Envelope| {
            if let Some(message) = envelope.payload().downcast_ref::<M>() {
                callback(&envelope, message);
            }
        }));
        Self {
            id: HandlerId::new(type_id, owner),
            type_id,
            body: Body::Direct(wrapped),
        }
    }

    pub fn id(&self) -> HandlerId {
        self.id
    }

    /// True if `envelope`'s payload matches this handler's message type.
    pub fn selects(&self, envelope: &Envelope) -> bool {
        envelope.payload().type_id() == self.type_id
    }

    /// Run the handler body against `envelope`. For a direct handler this
    /// just invokes the callback; for an intercepted one it calls
    /// `host.intercept(envelope, tag, continuation)` and leaves the
    /// decision of whether/when to run the original body to the host.
    pub fn invoke(&self, envelope: Envelope) {
        match &self.body {
            Body::Direct(callback) => (callback.borrow_mut())(envelope),
            Body::Intercepted { tag, host, continuation } => {
                host.intercept(envelope, *tag, continuation.clone());
            }
        }
    }

    /// Return a handler that runs the same body but routes calls through
    /// `host.intercept` first. If this handler is already tagged with
    /// `tag`, returns an equivalent handler unchanged (spec §3: "tagging
    /// is idempotent per tag"); otherwise wraps the *current* body as the
    /// continuation, so repeated upgrades with different tags nest in
    /// the order they were applied.
    pub fn upgrade(&self, tag: InterceptTag, host: Rc<dyn InterceptHost>) -> Handler {
        if let Body::Intercepted { tag: existing, .. } = &self.body {
            if *existing == tag {
                return self.shallow_clone();
            }
        }
        let continuation = match &self.body {
            Body::Direct(callback) => Continuation::new(callback.clone()),
            Body::Intercepted { continuation, .. } => continuation.clone(),
        };
        Handler {
            id: self.id,
            type_id: self.type_id,
            body: Body::Intercepted { tag, host, continuation },
        }
    }

    fn shallow_clone(&self) -> Handler {
        let body = match &self.body {
            Body::Direct(callback) => Body::Direct(callback.clone()),
            Body::Intercepted { tag, host, continuation } => Body::Intercepted {
                tag: *tag,
                host: host.clone(),
                continuation: continuation.clone(),
            },
        };
        Handler {
            id: self.id,
            type_id: self.type_id,
            body,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{Address, LocalityId};
    use std::cell::Cell;

    #[derive(Debug)]
    struct Ping(u32);

    fn addr() -> Address {
        Address::new(LocalityId::new(), ActorId::new(), None)
    }

    #[test]
    fn direct_handler_invokes_callback_for_matching_type() {
        let seen = Rc::new(Cell::new(0u32));
        let seen_clone = seen.clone();
        let handler = Handler::new::<Ping, _>(ActorId::new(), move |msg: &Ping| {
            seen_clone.set(msg.0);
        });

        let envelope = Envelope::plain(addr(), Ping(42));
        assert!(handler.selects(&envelope));
        handler.invoke(envelope);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn with_envelope_handler_sees_the_request_id() {
        use crate::util::RequestIdAllocator;

        let seen = Rc::new(Cell::new(None));
        let seen_clone = seen.clone();
        let handler = Handler::with_envelope::<Ping, _>(ActorId::new(), move |envelope, msg: &Ping| {
            seen_clone.set(Some((envelope.request_id(), msg.0)));
        });

        let allocator = RequestIdAllocator::new();
        let id = allocator.allocate(|_| false);
        let envelope = Envelope::request(addr(), Ping(5), id, addr());
        handler.invoke(envelope);
        assert_eq!(seen.get(), Some((Some(id), 5)));
    }

    #[test]
    fn handler_does_not_select_mismatched_type() {
        #[derive(Debug)]
        struct Other;
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let envelope = Envelope::plain(addr(), Other);
        assert!(!handler.selects(&envelope));
    }

    struct RecordingHost {
        calls: RefCell<Vec<InterceptTag>>,
    }

    impl InterceptHost for RecordingHost {
        fn intercept(&self, envelope: Envelope, tag: InterceptTag, continuation: Continuation) {
            self.calls.borrow_mut().push(tag);
            continuation.run(envelope);
        }
    }

    #[test]
    fn upgrade_routes_through_the_host_then_runs_the_original_body() {
        let seen = Rc::new(Cell::new(0u32));
        let seen_clone = seen.clone();
        let handler = Handler::new::<Ping, _>(ActorId::new(), move |msg: &Ping| {
            seen_clone.set(msg.0);
        });

        let host = Rc::new(RecordingHost { calls: RefCell::new(vec![]) });
        let tag = InterceptTag::new(ActorId::new());
        let tagged = handler.upgrade(tag, host.clone());

        tagged.invoke(Envelope::plain(addr(), Ping(7)));

        assert_eq!(host.calls.borrow().as_slice(), &[tag]);
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn upgrading_with_the_same_tag_twice_is_idempotent() {
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let host = Rc::new(RecordingHost { calls: RefCell::new(vec![]) });
        let tag = InterceptTag::new(ActorId::new());

        let once = handler.upgrade(tag, host.clone());
        let twice = once.upgrade(tag, host.clone());

        twice.invoke(Envelope::plain(addr(), Ping(1)));
        assert_eq!(host.calls.borrow().len(), 1, "second upgrade with the same tag should not add another interception layer");
    }
}
