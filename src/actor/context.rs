//! [`ActorContext`]: the per-actor handle onto its locality's shared
//! delivery engine, subscription map, and request table (spec §4.6
//! "Actor Core" operations table). Implements [`PluginHost`] so every
//! builtin plugin can subscribe/enqueue through it without depending on
//! `actor` directly.
//!
//! Every `Rc<RefCell<_>>` field here is the *same* instance shared by
//! every actor and the [`DeliveryEngine`] in one locality — this type
//! owns no state of its own beyond its address and its pending
//! subscription-event queue, matching the "single locality leader owns
//! the subscription map" invariant (spec §4.3).

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::locality::DeliveryEngine;
use crate::loop_adapter::LoopAdapter;
use crate::message::{Envelope, ErrorCode, ExtendedError, Handler, Kind, Message, Request};
use crate::plugin::{PluginHost, SubscriptionEvent};
use crate::subscription::{OwnerTag, SubscriptionError, SubscriptionMap};
use crate::timer::RequestTable;
use crate::util::{Address, HandlerId, RequestId, RequestIdAllocator};

/// Extract `(request_id, reply_to, response_type)` from a request-kind
/// envelope; `None` for anything else (spec §4.6 `reply_to`/
/// `reply_with_error` only make sense against a request).
fn reply_target(request: &Envelope) -> Option<(RequestId, Address, TypeId)> {
    match request.kind() {
        Kind::Request { id, reply_to, response_type } => Some((*id, reply_to.clone(), *response_type)),
        _ => None,
    }
}

#[derive(Clone)]
pub struct ActorContext {
    address: Address,
    engine: Rc<RefCell<DeliveryEngine>>,
    subscriptions: Rc<RefCell<SubscriptionMap>>,
    requests: Rc<RefCell<RequestTable>>,
    request_ids: Rc<RequestIdAllocator>,
    loop_adapter: Rc<RefCell<dyn LoopAdapter>>,
    pending_events: Rc<RefCell<VecDeque<SubscriptionEvent>>>,
}

impl ActorContext {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: Address,
        engine: Rc<RefCell<DeliveryEngine>>,
        subscriptions: Rc<RefCell<SubscriptionMap>>,
        requests: Rc<RefCell<RequestTable>>,
        request_ids: Rc<RequestIdAllocator>,
        loop_adapter: Rc<RefCell<dyn LoopAdapter>>,
    ) -> Self {
        Self {
            address,
            engine,
            subscriptions,
            requests,
            request_ids,
            loop_adapter,
            pending_events: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    /// Drain the subscription events recorded since the last drain, so
    /// `actor::ActorCore` can hand each one to `PluginChain::notify_subscription`
    /// (spec §4.5: the chain and the context are separate objects, both
    /// owned by whatever drives the actor).
    pub fn take_subscription_events(&self) -> Vec<SubscriptionEvent> {
        self.pending_events.borrow_mut().drain(..).collect()
    }

    /// Materialize a subscription under an explicit [`OwnerTag`] — used
    /// by application-level `send`/`subscribe` (tagged `Anonymous`) as
    /// well as the `PluginHost` impl below (tagged `Plugin`).
    pub fn subscribe_tagged(
        &self,
        address: Address,
        handler: Handler,
        owner_tag: OwnerTag,
    ) -> Result<(), SubscriptionError> {
        let handler_id = handler.id();
        let external = !address.same_locality(&self.address);
        self.subscriptions
            .borrow_mut()
            .subscribe(address.clone(), handler, owner_tag, self.address.locality())?;
        self.pending_events
            .borrow_mut()
            .push_back(SubscriptionEvent::Subscribed { address, handler: handler_id, external });
        Ok(())
    }

    fn unsubscribe_inner(&self, address: &Address, handler: HandlerId) -> Result<(), SubscriptionError> {
        let external = !address.same_locality(&self.address);
        self.subscriptions.borrow_mut().unsubscribe(address, handler)?;
        self.pending_events.borrow_mut().push_back(SubscriptionEvent::Unsubscribed {
            address: address.clone(),
            handler,
            external,
        });
        Ok(())
    }

    /// Fire-and-forget delivery (spec §4.6 `send<M>(addr, args)`).
    pub fn send<M: Message + Send + Sync + 'static>(&self, destination: Address, message: M) {
        self.engine.borrow_mut().enqueue(Envelope::plain(destination, message));
    }

    /// Start a request (spec §4.6 `request<Req>(addr, args).send(timeout)`):
    /// allocates a request id, registers a timeout timer and a request
    /// table entry, and sends the request with `reply_to` set to this
    /// actor's own address. Use [`ActorContext::request_to`] to target a
    /// different reply address.
    pub fn request<Req: Request + Send + Sync + 'static>(
        &self,
        destination: Address,
        message: Req,
        timeout: Duration,
    ) -> RequestId {
        self.request_to(destination, message, timeout, self.address.clone())
    }

    /// Like [`ActorContext::request`], but lets the caller supply an
    /// explicit reply-to address (e.g. a synthetic one it is already
    /// subscribed on).
    pub fn request_to<Req: Request + Send + Sync + 'static>(
        &self,
        destination: Address,
        message: Req,
        timeout: Duration,
        reply_to: Address,
    ) -> RequestId {
        let requests = self.requests.clone();
        let id = self
            .request_ids
            .allocate(|candidate| requests.borrow().contains(candidate));

        let engine_for_timeout = self.engine.clone();
        let requests_for_timeout = self.requests.clone();
        let timer_id = self.loop_adapter.borrow_mut().do_start_timer(
            timeout,
            Box::new(move |timer_id, cancelled| {
                if cancelled {
                    return;
                }
                if let Some(envelope) = requests_for_timeout.borrow_mut().resolve_timeout(timer_id) {
                    let mut engine = engine_for_timeout.borrow_mut();
                    engine.enqueue(envelope);
                    engine.uplift_last_message();
                }
            }),
        );

        let reply_to_for_timeout = reply_to.clone();
        let response_type = TypeId::of::<Req::Response>();
        self.requests.borrow_mut().insert(
            id,
            timer_id,
            reply_to.clone(),
            self.address.clone(),
            move || {
                let error = ExtendedError::new("request timed out", ErrorCode::RequestTimeout).with_request(id);
                Envelope::response_error_for(reply_to_for_timeout, id, error, response_type)
            },
        );

        let request = Envelope::request_for(destination, message, id, reply_to);
        self.engine.borrow_mut().enqueue(request);
        id
    }

    /// A real response arrived for `request_id`: cancel its timer so the
    /// synthesized timeout never fires (spec §4.9 invariant: "every live
    /// request has a paired live timer; discarding a request cancels its
    /// timer and vice versa"). The caller's own response handler is
    /// responsible for calling this — the crate does not infer which
    /// incoming message correlates to which outstanding request.
    pub fn acknowledge_response(&self, request_id: RequestId) {
        if let Some(timer_id) = self.requests.borrow_mut().resolve(request_id) {
            self.loop_adapter.borrow_mut().do_cancel_timer(timer_id);
        }
    }

    /// Construct and enqueue a success response to `request` (spec §4.6
    /// `reply_to(req_msg, args)`). A no-op if `request` is not a
    /// request-kind envelope.
    pub fn reply_to<Res: Message + Send + Sync + 'static>(&self, request: &Envelope, response: Res) {
        if let Some((id, destination, _response_type)) = reply_target(request) {
            self.deliver_response(Envelope::response(destination, response, id));
        }
    }

    /// Construct and enqueue an error response to `request` (spec §4.6
    /// `reply_with_error(req_msg, err)`). Tagged with the request's
    /// recorded response type so it reaches the same subscriber a
    /// successful [`ActorContext::reply_to`] would have.
    pub fn reply_with_error(&self, request: &Envelope, error: ExtendedError) {
        if let Some((id, destination, response_type)) = reply_target(request) {
            self.deliver_response(Envelope::response_error_for(destination, id, error, response_type));
        }
    }

    /// Enqueue a response envelope, uplifting it to the front of the
    /// local queue when it targets this locality (spec §9
    /// "response-before-notify ordering": a reply to a co-local
    /// synthetic address must not be overtaken by whatever the handler
    /// sends next).
    fn deliver_response(&self, envelope: Envelope) {
        let local = envelope.destination().same_locality(&self.address);
        let mut engine = self.engine.borrow_mut();
        engine.enqueue(envelope);
        if local {
            engine.uplift_last_message();
        }
    }
}

impl PluginHost for ActorContext {
    fn address(&self) -> &Address {
        &self.address
    }

    fn subscribe(&mut self, address: Address, handler: Handler) -> Result<(), SubscriptionError> {
        ActorContext::subscribe_tagged(self, address, handler, OwnerTag::Plugin)
    }

    fn unsubscribe(&mut self, address: &Address, handler: HandlerId) -> Result<(), SubscriptionError> {
        self.unsubscribe_inner(address, handler)
    }

    fn enqueue(&mut self, envelope: Envelope) {
        self.engine.borrow_mut().enqueue(envelope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locality::LocalityDirectory;
    use crate::loop_adapter::testing::InlineLoopAdapter;
    use crate::util::ActorId;
    use std::time::Duration as StdDuration;
    use tokio::sync::mpsc;

    #[derive(Debug)]
    struct Ping;

    #[derive(Debug, Clone)]
    struct Pong;

    impl Request for Ping {
        type Response = Pong;
    }

    fn context() -> (ActorContext, Rc<RefCell<InlineLoopAdapter>>) {
        let directory = LocalityDirectory::new();
        let subscriptions = Rc::new(RefCell::new(SubscriptionMap::new()));
        let engine = Rc::new(RefCell::new(DeliveryEngine::new(
            subscriptions.clone(),
            directory,
            StdDuration::from_millis(5),
        )));
        let locality = engine.borrow().id();
        let address = Address::new(locality, ActorId::new(), None);
        let (tx, _rx) = mpsc::unbounded_channel();
        let loop_adapter = Rc::new(RefCell::new(InlineLoopAdapter::new(tx)));
        let requests = Rc::new(RefCell::new(RequestTable::new()));
        let request_ids = Rc::new(RequestIdAllocator::new());
        let context = ActorContext::new(address, engine, subscriptions, requests, request_ids, loop_adapter.clone());
        (context, loop_adapter)
    }

    #[test]
    fn subscribing_records_a_subscription_event() {
        let (context, _loop_adapter) = context();
        let handler = Handler::new::<Ping, _>(context.address().actor_id(), |_: &Ping| {});
        context.subscribe_tagged(context.address().clone(), handler, OwnerTag::Anonymous).unwrap();

        let events = context.take_subscription_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], SubscriptionEvent::Subscribed { external: false, .. }));
    }

    #[test]
    fn request_registers_a_timer_and_sends_the_request_envelope() {
        let (context, loop_adapter) = context();
        let destination = context.address().clone();
        let id = context.request(destination, Ping, StdDuration::from_secs(5));
        assert!(context.requests.borrow().contains(id));
        assert_eq!(loop_adapter.borrow().pending_timers(), 1);
    }

    #[test]
    fn acknowledging_a_response_cancels_its_timer() {
        let (context, loop_adapter) = context();
        let destination = context.address().clone();
        let id = context.request(destination, Ping, StdDuration::from_secs(5));

        context.acknowledge_response(id);
        assert!(!context.requests.borrow().contains(id));

        loop_adapter.borrow().process_due();
        assert_eq!(loop_adapter.borrow().pending_timers(), 0);
    }

    #[test]
    fn reply_to_a_non_request_envelope_is_a_no_op() {
        let (context, _loop_adapter) = context();
        let plain = Envelope::plain(context.address().clone(), Ping);
        context.reply_to(&plain, Pong);
    }
}
