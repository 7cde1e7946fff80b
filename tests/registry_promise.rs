//! Scenario 3 (spec §8): "Client discovers 'srv' with `delayed=true`
//! before the server registers; server registers 10ms later. Expect:
//! exactly one resolution. On client shutdown before register, client
//! observes `cancelled`."
//!
//! `registry::Registry` (server) and `plugin::builtin::registry::
//! RegistryClientPlugin` (client) only ever talk through direct method
//! calls in this crate (DESIGN.md: "routed here as direct method calls by
//! whatever owns this actor's `ActorCore`, not through the generic
//! subscription map"); wiring the envelope each side enqueues back into
//! the other's `on_*` call is ordinarily a `LoopAdapter` backend's job, so
//! this harness does that translation itself.

mod support;

use std::cell::RefCell;
use std::rc::Rc;

use kestrel_rt::message::{Envelope, ErrorCode, ExtendedError, Handler, Kind, Outcome};
use kestrel_rt::plugin::builtin::{DiscoveryPhase, DiscoveryPromise, DiscoveryRequest, RegistryClientPlugin};
use kestrel_rt::plugin::PluginHost;
use kestrel_rt::registry::{DiscoveryResolved, Registry};
use kestrel_rt::subscription::SubscriptionError;
use kestrel_rt::util::{HandlerId, RequestIdAllocator};
use kestrel_rt::Address;
use support::Harness;

struct RecordingHost {
    address: Address,
    sent: RefCell<Vec<Envelope>>,
}

impl RecordingHost {
    fn new(address: Address) -> Self {
        Self { address, sent: RefCell::new(vec![]) }
    }

    fn drain(&self) -> Vec<Envelope> {
        self.sent.borrow_mut().drain(..).collect()
    }
}

impl PluginHost for RecordingHost {
    fn address(&self) -> &Address {
        &self.address
    }
    fn subscribe(&mut self, _address: Address, _handler: Handler) -> Result<(), SubscriptionError> {
        unreachable!("this scenario never subscribes through the registry plugins")
    }
    fn unsubscribe(&mut self, _address: &Address, _handler: HandlerId) -> Result<(), SubscriptionError> {
        unreachable!("this scenario never subscribes through the registry plugins")
    }
    fn enqueue(&mut self, envelope: Envelope) {
        self.sent.borrow_mut().push(envelope);
    }
}

/// Decode a response envelope into `Result<Address, ExtendedError>` — the
/// client side of discovery resolution, which a `LoopAdapter` backend
/// would otherwise perform before calling `on_discovery_response`.
fn decode_discovery(envelope: &Envelope) -> Result<Address, ExtendedError> {
    match envelope.kind() {
        Kind::Response { outcome: Outcome::Payload(payload), .. } => {
            Ok(payload.downcast_ref::<DiscoveryResolved>().expect("discovery payload").address.clone())
        }
        Kind::Response { outcome: Outcome::Error(error), .. } => Err(error.clone()),
        _ => panic!("expected a response envelope"),
    }
}

#[test]
fn a_promise_made_before_registration_resolves_exactly_once_on_register() {
    let harness = Harness::new();
    let server_address = harness.new_address();
    let client_address = harness.new_address();

    let mut server = Registry::new();
    let mut server_host = RecordingHost::new(server_address.clone());

    let mut client = RegistryClientPlugin::new(server_address.clone());
    let mut client_host = RecordingHost::new(client_address.clone());

    let resolutions = Rc::new(RefCell::new(Vec::new()));
    let resolutions_clone = resolutions.clone();
    client.discover_name(&mut client_host, "srv", true, None, move |phase, err| {
        resolutions_clone.borrow_mut().push((phase, err.is_some()));
    });

    let request = client_host.drain().pop().expect("one discovery_promise sent");
    let promise = request.payload().downcast_ref::<DiscoveryPromise>().expect("DiscoveryPromise");
    let request_id = request.request_id().expect("request carries an id");
    server.on_discovery_promise(&mut server_host, client_address.clone(), request_id, promise.name.clone());
    assert!(server_host.drain().is_empty(), "no registration yet — the promise just waits");
    assert!(resolutions.borrow().is_empty());

    let target = harness.new_address();
    let register_id = RequestIdAllocator::new().allocate(|_| false);
    server.on_register_request(&mut server_host, server_address.clone(), register_id, "srv".into(), target.clone());
    let responses = server_host.drain();
    assert_eq!(responses.len(), 2, "register ack to itself plus the resolved promise");

    let resolution = responses.iter().find(|e| e.request_id() == Some(request_id)).expect("promise response present");
    let resolved = decode_discovery(resolution).expect("resolves successfully");
    assert_eq!(resolved, target);

    client.on_discovery_response("srv", Ok(resolved));
    assert_eq!(resolutions.borrow().as_slice(), &[(DiscoveryPhase::Discovering, false)]);

    // A second register_request for the same name must not resolve the
    // (already-consumed) promise again.
    let second_id = RequestIdAllocator::new().allocate(|_| false);
    server.on_register_request(&mut server_host, server_address, second_id, "srv".into(), target);
    assert_eq!(resolutions.borrow().len(), 1, "promise resolves exactly once");
}

#[test]
fn cancelling_a_promise_before_registration_replies_cancelled() {
    let harness = Harness::new();
    let server_address = harness.new_address();
    let client_address = harness.new_address();

    let mut server = Registry::new();
    let mut server_host = RecordingHost::new(server_address.clone());

    let mut client = RegistryClientPlugin::new(server_address.clone());
    let mut client_host = RecordingHost::new(client_address.clone());

    let seen = Rc::new(RefCell::new(None));
    let seen_clone = seen.clone();
    client.discover_name(&mut client_host, "srv", true, None, move |_, err| {
        *seen_clone.borrow_mut() = Some(err);
    });
    let request = client_host.drain().pop().expect("one discovery_promise sent");
    let request_id = request.request_id().expect("request carries an id");

    server.on_discovery_cancel(&mut server_host, client_address, request_id);
    let cancelled = server_host.drain().pop().expect("a cancelled reply is sent to the matching promise");
    let result = decode_discovery(&cancelled);
    assert_eq!(result.as_ref().unwrap_err().code(), ErrorCode::Cancelled);

    client.on_discovery_response("srv", result);
    assert_eq!(seen.borrow().as_ref().unwrap().as_ref().map(|e| e.code()), Some(ErrorCode::Cancelled));

    let target = harness.new_address();
    server.on_register_request(&mut server_host, server_address, request_id, "srv".into(), target);
    let responses = server_host.drain();
    assert_eq!(responses.len(), 1, "only the register ack — the cancelled promise is already gone");
}

#[test]
fn a_request_style_discovery_of_an_unknown_name_fails_immediately() {
    let harness = Harness::new();
    let server_address = harness.new_address();
    let client_address = harness.new_address();

    let mut server = Registry::new();
    let mut server_host = RecordingHost::new(server_address.clone());
    let mut client = RegistryClientPlugin::new(server_address.clone());
    let mut client_host = RecordingHost::new(client_address.clone());

    let failed = Rc::new(RefCell::new(false));
    let failed_clone = failed.clone();
    client.discover_name(&mut client_host, "ghost", false, None, move |_, err| {
        *failed_clone.borrow_mut() = err.is_some();
    });

    let request = client_host.drain().pop().expect("one discovery_request sent");
    let discovery = request.payload().downcast_ref::<DiscoveryRequest>().expect("DiscoveryRequest");
    let request_id = request.request_id().expect("request carries an id");
    server.on_discovery_request(&mut server_host, client_address, request_id, &discovery.name);

    let response = server_host.drain().pop().expect("one response");
    let result = decode_discovery(&response);
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().code(), ErrorCode::UnknownService);

    client.on_discovery_response("ghost", result);
    assert!(*failed.borrow());
}
