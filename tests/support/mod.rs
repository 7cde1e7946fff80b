//! Shared harness for the scenario tests in this directory: one locality
//! (one `DeliveryEngine` + `SubscriptionMap` + `RequestTable`, all the
//! state spec §3 says a locality shares) with an `InlineLoopAdapter`
//! standing in for the real event-loop backend spec §6.1 leaves out of
//! this crate's scope.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kestrel_rt::prelude::*;
use kestrel_rt::loop_adapter::testing::InlineLoopAdapter;
use kestrel_rt::locality::{DeliveryEngine, LocalityDirectory};
use kestrel_rt::subscription::SubscriptionMap;
use kestrel_rt::timer::RequestTable;
use kestrel_rt::util::RequestIdAllocator;

pub struct Harness {
    engine: Rc<RefCell<DeliveryEngine>>,
    subscriptions: Rc<RefCell<SubscriptionMap>>,
    requests: Rc<RefCell<RequestTable>>,
    request_ids: Rc<RequestIdAllocator>,
    pub loop_adapter: Rc<RefCell<InlineLoopAdapter>>,
}

impl Harness {
    pub fn new() -> Self {
        let directory = LocalityDirectory::new();
        let subscriptions = Rc::new(RefCell::new(SubscriptionMap::new()));
        let engine = Rc::new(RefCell::new(DeliveryEngine::new(
            subscriptions.clone(),
            directory,
            Duration::from_millis(5),
        )));
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let loop_adapter = Rc::new(RefCell::new(InlineLoopAdapter::new(tx)));
        Self {
            engine,
            subscriptions,
            requests: Rc::new(RefCell::new(RequestTable::new())),
            request_ids: Rc::new(RequestIdAllocator::new()),
            loop_adapter,
        }
    }

    pub fn locality(&self) -> LocalityId {
        self.engine.borrow().id()
    }

    /// A fresh address in this harness's one locality (spec §3
    /// `make_address(locality)`).
    pub fn new_address(&self) -> Address {
        Address::make_address(self.locality())
    }

    /// A context for a new actor at a fresh address.
    pub fn context(&self) -> ActorContext {
        ActorContext::new(
            self.new_address(),
            self.engine.clone(),
            self.subscriptions.clone(),
            self.requests.clone(),
            self.request_ids.clone(),
            self.loop_adapter.clone(),
        )
    }

    /// Run one delivery tick (spec §4.4 "Delivery Engine", steps 1-5).
    pub async fn tick(&self) -> kestrel_rt::locality::ProcessStats {
        self.engine.borrow_mut().process().await
    }

    /// Fire every timer currently due.
    pub fn fire_due_timers(&self) -> usize {
        self.loop_adapter.borrow().process_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.loop_adapter.borrow().pending_timers()
    }

    /// A `SupervisorTree` rooted in this harness's one locality, so
    /// integration tests can exercise `create_actor`/spawn the same way
    /// they exercise any other actor.
    pub fn supervisor_tree(&self) -> SupervisorTree {
        SupervisorTree::new(
            self.new_address(),
            self.engine.clone(),
            self.subscriptions.clone(),
            self.requests.clone(),
            self.request_ids.clone(),
            self.loop_adapter.clone(),
            SupervisorConfig::default(),
        )
    }
}
