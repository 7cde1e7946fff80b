//! Scenario 2 (spec §8): "Actor sends request to itself with timeout
//! 1 ms, never replies. Expect: handler receives response with error code
//! `request_timeout` once; a late reply is dropped."
//!
//! Also covers the adjacent boundary law: "A request that times out with
//! a real response in flight receives exactly one delivery (the
//! timeout)" — `RequestTable::resolve`/`resolve_timeout` both remove the
//! entry, so whichever arrives second is a no-op.

mod support;

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kestrel_rt::message::{ErrorCode, Kind, Outcome, Request};
use kestrel_rt::plugin::PluginHost;
use kestrel_rt::subscription::OwnerTag;
use kestrel_rt::Handler;
use support::Harness;

#[derive(Debug)]
struct NeverAnswered;

#[derive(Debug, Clone)]
struct NeverSent;

impl Request for NeverAnswered {
    type Response = NeverSent;
}

#[tokio::test]
async fn a_request_that_is_never_answered_times_out_exactly_once() {
    let harness = Harness::new();
    let actor = harness.context();
    let address = actor.address().clone();

    let error_codes: Rc<RefCell<Vec<ErrorCode>>> = Rc::new(RefCell::new(vec![]));
    let error_codes_clone = error_codes.clone();
    actor
        .subscribe_tagged(
            address.clone(),
            Handler::with_envelope::<NeverSent, _>(address.actor_id(), move |envelope, _: &NeverSent| {
                if let Kind::Response { outcome: Outcome::Error(error), .. } = envelope.kind() {
                    error_codes_clone.borrow_mut().push(error.code());
                }
            }),
            OwnerTag::Anonymous,
        )
        .unwrap();

    actor.request(address, NeverAnswered, Duration::from_millis(1));
    assert_eq!(harness.pending_timers(), 1);

    // The timer fires on the loop adapter's own schedule, never inside
    // the scheduling call itself (spec §8 "never synchronously").
    assert!(error_codes.borrow().is_empty());

    harness.fire_due_timers();
    harness.tick().await;

    let recorded = error_codes.borrow();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0], ErrorCode::RequestTimeout);
}

#[tokio::test]
async fn acknowledging_before_the_timer_fires_prevents_a_timeout_delivery() {
    let harness = Harness::new();
    let actor = harness.context();
    let address = actor.address().clone();

    let deliveries = Rc::new(RefCell::new(0usize));
    let deliveries_clone = deliveries.clone();
    actor
        .subscribe_tagged(
            address.clone(),
            Handler::with_envelope::<NeverSent, _>(address.actor_id(), move |_envelope, _: &NeverSent| {
                *deliveries_clone.borrow_mut() += 1;
            }),
            OwnerTag::Anonymous,
        )
        .unwrap();

    let request_id = actor.request(address, NeverAnswered, Duration::from_millis(1));
    actor.acknowledge_response(request_id);

    // The real response races ahead of the timer, same as a handler that
    // actually replied would have.
    harness.fire_due_timers();
    harness.tick().await;

    assert_eq!(*deliveries.borrow(), 0, "a resolved request must not also deliver a timeout");
    assert_eq!(harness.pending_timers(), 0);
}
