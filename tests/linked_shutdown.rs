//! Scenario 4 (spec §8): "A client links to a server in another
//! locality. Server initiates shutdown. Expect: server becomes
//! SHUT_DOWN only after client replies to unlink."
//!
//! `LinkServerPlugin`/`LinkClientPlugin` talk through direct method
//! calls (DESIGN.md), so — same as `registry_promise.rs` — this test
//! plays the part of the `LoopAdapter` backend that would otherwise
//! decode each side's outgoing envelope and hand it to the other's
//! `on_*` method.

mod support;

use kestrel_rt::message::{Envelope, ErrorCode, ExtendedError, Handler, Kind};
use kestrel_rt::plugin::builtin::{LinkClientPlugin, LinkRequest, LinkServerPlugin, UnlinkRequest};
use kestrel_rt::plugin::{Plugin, PluginHost, Reactions, ShutdownReadiness};
use kestrel_rt::subscription::SubscriptionError;
use kestrel_rt::util::{Address, HandlerId};
use support::Harness;

use std::cell::RefCell;

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
        unreachable!("this scenario never subscribes through the link plugins")
    }
    fn unsubscribe(&mut self, _address: &Address, _handler: HandlerId) -> Result<(), SubscriptionError> {
        unreachable!("this scenario never subscribes through the link plugins")
    }
    fn enqueue(&mut self, envelope: Envelope) {
        self.sent.borrow_mut().push(envelope);
    }
}

#[test]
fn a_server_only_finishes_shutdown_once_its_client_has_replied_to_unlink() {
    let harness = Harness::new();
    let server_address = harness.new_address();
    let client_address = harness.new_address();

    let mut server = LinkServerPlugin::default();
    let mut server_host = RecordingHost::new(server_address.clone());

    let mut client = LinkClientPlugin::default();
    let mut client_host = RecordingHost::new(client_address.clone());

    client.link(&mut client_host, server_address.clone(), true, |outcome| {
        outcome.expect("link should succeed");
    });
    let link_request = client_host.drain().pop().expect("one link_request sent");
    assert!(link_request.payload().downcast_ref::<LinkRequest>().unwrap().operational_only);
    let link_id = link_request.request_id().expect("request carries an id");

    server.on_link_request(&mut server_host, client_address.clone(), link_id, true);
    let link_response = server_host.drain().pop().expect("one link_response sent");
    let outcome = match link_response.kind() {
        Kind::Response { outcome: kestrel_rt::message::Outcome::Payload(_), .. } => Ok(()),
        Kind::Response { outcome: kestrel_rt::message::Outcome::Error(error), .. } => Err(error.clone()),
        _ => panic!("expected a response"),
    };
    client.on_link_response(&server_address, outcome);
    assert!(!client.is_linking());

    let reason = ExtendedError::new("server shutting down", ErrorCode::Cancelled);
    let mut reactions = Reactions::NONE;
    let readiness = server.poll_shutdown(&mut server_host, &mut reactions, &reason);
    assert_eq!(readiness, ShutdownReadiness::NotReady, "still has an operational client pending unlink");

    let unlink_request = server_host.drain().pop().expect("one unlink_request sent to the client");
    assert!(unlink_request.payload().downcast_ref::<UnlinkRequest>().is_some());
    let unlink_id = unlink_request.request_id().expect("unlink_request carries an id");

    // Polling again before the client has replied must not re-send the
    // unlink request and must still report not-ready.
    let readiness_again = server.poll_shutdown(&mut server_host, &mut reactions, &reason);
    assert_eq!(readiness_again, ShutdownReadiness::NotReady);
    assert!(server_host.drain().is_empty(), "unlink_request is sent at most once per client");

    client.on_unlink_request(&mut client_host, &server_address, unlink_id);
    assert!(!client.has_servers());
    let unlink_response = client_host.drain().pop().expect("client replies to the unlink request");
    assert_eq!(unlink_response.request_id(), Some(unlink_id));

    server.on_unlink_response(&client_address);
    let readiness_final = server.poll_shutdown(&mut server_host, &mut reactions, &reason);
    assert_eq!(readiness_final, ShutdownReadiness::Ready, "shutdown completes only after the unlink reply lands");
}

#[test]
fn a_pending_client_linking_before_the_server_is_operational_is_acked_on_mark_operational() {
    let harness = Harness::new();
    let server_address = harness.new_address();
    let client_address = harness.new_address();

    let mut server = LinkServerPlugin::default();
    let mut server_host = RecordingHost::new(server_address);

    let mut client = LinkClientPlugin::default();
    let mut client_host = RecordingHost::new(client_address.clone());

    client.link(&mut client_host, server_host.address.clone(), true, |outcome| {
        outcome.expect("link should eventually succeed");
    });
    let link_request = client_host.drain().pop().unwrap();
    let link_id = link_request.request_id().unwrap();

    server.on_link_request(&mut server_host, client_address, link_id, true);
    assert!(server_host.drain().is_empty(), "server is not operational yet, reply withheld");
    assert!(client.is_linking());

    server.mark_operational(&mut server_host);
    let response = server_host.drain().pop().expect("pending client acked once operational");
    assert_eq!(response.request_id(), Some(link_id));
}
