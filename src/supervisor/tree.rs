//! [`SupervisorTree`]: the public API for creating children (spec §4.7
//! "Creation": "`create_actor<T>()` returns a builder; `finish()`
//! validates the config ..., constructs the actor, and registers a
//! child record").
//!
//! Grounded on the same single-locality construction path every
//! integration test already drives through `tests/support::Harness`
//! (`ActorContext::new` sharing one locality's `DeliveryEngine`/
//! `SubscriptionMap`/`RequestTable`/`RequestIdAllocator`/`LoopAdapter`):
//! a supervisor and its children are plain `ActorCore`s in that same
//! locality, so no concrete `loop_adapter::LoopAdapter` backend beyond
//! the one this crate already ships is needed to spawn one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::actor::{ActorContext, ActorCore, ActorCoreConfig};
use crate::locality::DeliveryEngine;
use crate::loop_adapter::LoopAdapter;
use crate::plugin::builtin::{ChildFlags, InitFailurePolicy};
use crate::subscription::SubscriptionMap;
use crate::system::{ActorConfig, ActorConfigBuilder, SupervisorConfig};
use crate::timer::RequestTable;
use crate::util::{Address, RequestIdAllocator};
use std::time::Duration;

use super::error::SupervisorError;
use super::policy::SupervisorPolicy;

fn init_failure_policy_for(policy: SupervisorPolicy) -> InitFailurePolicy {
    match policy {
        SupervisorPolicy::ShutdownSelf => InitFailurePolicy::ShutdownSelf,
        SupervisorPolicy::ShutdownFailed => InitFailurePolicy::ShutdownFailed,
    }
}

/// Owns a supervisor's own [`ActorCore`] plus the children it has
/// created, and drives `synchronize_start`'s sibling-wait gate (spec
/// §4.7 "Init synchronization").
pub struct SupervisorTree {
    supervisor: Rc<RefCell<ActorCore>>,
    engine: Rc<RefCell<DeliveryEngine>>,
    subscriptions: Rc<RefCell<SubscriptionMap>>,
    requests: Rc<RefCell<RequestTable>>,
    request_ids: Rc<RequestIdAllocator>,
    loop_adapter: Rc<RefCell<dyn LoopAdapter>>,
    children: HashMap<Address, Rc<RefCell<ActorCore>>>,
}

impl SupervisorTree {
    /// Build the supervisor's own actor in the locality shared by
    /// `engine`/`subscriptions`/`requests`/`request_ids`/`loop_adapter`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: Address,
        engine: Rc<RefCell<DeliveryEngine>>,
        subscriptions: Rc<RefCell<SubscriptionMap>>,
        requests: Rc<RefCell<RequestTable>>,
        request_ids: Rc<RequestIdAllocator>,
        loop_adapter: Rc<RefCell<dyn LoopAdapter>>,
        config: SupervisorConfig,
    ) -> Self {
        let context = ActorContext::new(
            address,
            engine.clone(),
            subscriptions.clone(),
            requests.clone(),
            request_ids.clone(),
            loop_adapter.clone(),
        );
        let core_config = ActorCoreConfig {
            supervisor: true,
            is_locality_leader: true,
            registry_address: config.registry_address.clone(),
            is_registry_host: config.create_registry,
            init_failure_policy: init_failure_policy_for(config.policy),
            synchronize_start: config.synchronize_start,
            on_start: None,
        };
        let supervisor = Rc::new(RefCell::new(ActorCore::new(context, core_config)));
        Self { supervisor, engine, subscriptions, requests, request_ids, loop_adapter, children: HashMap::new() }
    }

    /// The supervisor's own actor handle, so a caller can drive its
    /// lifecycle (`activate`/`poll_init`/`trigger_start`/`begin_shutdown`)
    /// the same way it drives any other `ActorCore`.
    pub fn supervisor(&self) -> Rc<RefCell<ActorCore>> {
        self.supervisor.clone()
    }

    fn new_address(&self) -> Address {
        Address::make_address(self.engine.borrow().id())
    }

    /// Begin building a new child (spec §4.7 "Creation").
    pub fn create_actor(&mut self) -> ChildBuilder<'_> {
        ChildBuilder { tree: self, config: ActorConfig::builder() }
    }

    /// A previously created child's handle, if it is still tracked.
    pub fn child(&self, address: &Address) -> Option<Rc<RefCell<ActorCore>>> {
        self.children.get(address).cloned()
    }

    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    /// Poll a child's INIT gate; once it reports ready, inform the
    /// supervisor (spec §3 INIT gate: "the actor ... transitions to
    /// INITIALIZED, and informs the supervisor") and start every child
    /// [`SupervisorTree::on_child_initialized`] says is now owed
    /// `start_trigger`.
    pub fn poll_child_init(&mut self, address: &Address) -> bool {
        let Some(child) = self.children.get(address).cloned() else { return false };
        let ready = child.borrow_mut().poll_init();
        if ready {
            self.on_child_initialized(address);
        }
        ready
    }

    /// Tell the supervisor that `address` reported INITIALIZED, and
    /// issue `start_trigger` to whichever children that unblocks (spec
    /// §4.7 "Init synchronization").
    pub fn on_child_initialized(&mut self, address: &Address) {
        let ready = self.supervisor.borrow_mut().on_child_initialized(address);
        for ready_address in ready {
            if let Some(child) = self.children.get(&ready_address) {
                child.borrow_mut().trigger_start();
            }
        }
    }

    /// Drop a child this tree no longer tracks, e.g. after the
    /// supervisor's `child_manager` has removed its record (shutdown,
    /// `shutdown_failed` on init failure).
    pub fn forget_child(&mut self, address: &Address) -> Option<Rc<RefCell<ActorCore>>> {
        self.children.remove(address)
    }
}

/// Builder returned by [`SupervisorTree::create_actor`] (spec §4.7
/// "Creation"). Mirrors [`ActorConfigBuilder`]'s fluent shape, since a
/// child's config *is* an [`ActorConfig`].
pub struct ChildBuilder<'a> {
    tree: &'a mut SupervisorTree,
    config: ActorConfigBuilder,
}

impl<'a> ChildBuilder<'a> {
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.config = self.config.identity(identity);
        self
    }

    pub fn init_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.init_timeout(timeout);
        self
    }

    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.shutdown_timeout(timeout);
        self
    }

    pub fn unlink_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.unlink_timeout(timeout);
        self
    }

    pub fn escalate_failure(mut self, escalate: bool) -> Self {
        self.config = self.config.escalate_failure(escalate);
        self
    }

    pub fn autoshutdown_supervisor(mut self, autoshutdown: bool) -> Self {
        self.config = self.config.autoshutdown_supervisor(autoshutdown);
        self
    }

    pub fn spawner_address(mut self, address: Address) -> Self {
        self.config = self.config.spawner_address(address);
        self
    }

    /// Validate the config (required fields present, `unlink_timeout <=
    /// shutdown_timeout`), construct the child actor, and register its
    /// child record with the supervisor (spec §4.7 "Creation").
    pub fn finish(self) -> Result<Address, SupervisorError> {
        let config = self.config.build().map_err(SupervisorError::InvalidChildConfig)?;
        if config.identity.is_empty() {
            return Err(SupervisorError::InvalidChildConfig("identity is required".to_string()));
        }

        let address = self.tree.new_address();
        let context = ActorContext::new(
            address.clone(),
            self.tree.engine.clone(),
            self.tree.subscriptions.clone(),
            self.tree.requests.clone(),
            self.tree.request_ids.clone(),
            self.tree.loop_adapter.clone(),
        );
        let mut core = ActorCore::new(context, ActorCoreConfig::default());
        core.activate();

        let flags = ChildFlags {
            autoshutdown_supervisor: config.autoshutdown_supervisor,
            escalate_failure: config.escalate_failure,
        };
        self.tree.supervisor.borrow_mut().register_child(address.clone(), flags);
        self.tree.children.insert(address.clone(), Rc::new(RefCell::new(core)));
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locality::LocalityDirectory;
    use crate::subscription::SubscriptionMap;
    use crate::system::SupervisorConfigBuilder;
    use crate::loop_adapter::testing::InlineLoopAdapter;
    use std::time::Duration;

    fn tree(config: SupervisorConfig) -> SupervisorTree {
        let directory = LocalityDirectory::new();
        let subscriptions = Rc::new(RefCell::new(SubscriptionMap::new()));
        let engine = Rc::new(RefCell::new(DeliveryEngine::new(subscriptions.clone(), directory, Duration::from_millis(5))));
        let requests = Rc::new(RefCell::new(RequestTable::new()));
        let request_ids = Rc::new(RequestIdAllocator::new());
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let loop_adapter: Rc<RefCell<dyn LoopAdapter>> = Rc::new(RefCell::new(InlineLoopAdapter::new(tx)));
        let address = Address::make_address(engine.borrow().id());
        SupervisorTree::new(address, engine, subscriptions, requests, request_ids, loop_adapter, config)
    }

    #[test]
    fn finish_without_identity_is_rejected() {
        let mut tree = tree(SupervisorConfig::default());
        let error = tree.create_actor().finish().unwrap_err();
        assert!(error.is_invalid_config());
        assert_eq!(tree.children_len(), 0);
    }

    #[test]
    fn finish_registers_the_child_and_returns_its_address() {
        let mut tree = tree(SupervisorConfig::default());
        let address = tree.create_actor().identity("worker").finish().expect("valid config");
        assert_eq!(tree.children_len(), 1);
        assert!(tree.child(&address).is_some());
        assert_eq!(tree.supervisor().borrow().active_children(), 1);
    }

    #[test]
    fn without_synchronize_start_a_child_starts_as_soon_as_it_initializes() {
        let mut tree = tree(SupervisorConfig::default());
        tree.supervisor().borrow_mut().activate();
        while !tree.supervisor().borrow_mut().poll_init() {}

        let address = tree.create_actor().identity("worker").finish().unwrap();
        let child = tree.child(&address).unwrap();
        while !child.borrow_mut().poll_init() {}

        assert!(tree.poll_child_init(&address));
        assert_eq!(child.borrow().phase(), crate::actor::ActorPhase::Operational);
    }

    #[test]
    fn synchronize_start_holds_every_child_until_the_last_sibling_initializes() {
        let config = SupervisorConfigBuilder::default().synchronize_start(true).build().unwrap();
        let mut tree = tree(config);
        tree.supervisor().borrow_mut().activate();
        while !tree.supervisor().borrow_mut().poll_init() {}

        let a = tree.create_actor().identity("a").finish().unwrap();
        let b = tree.create_actor().identity("b").finish().unwrap();
        let child_a = tree.child(&a).unwrap();
        let child_b = tree.child(&b).unwrap();
        while !child_a.borrow_mut().poll_init() {}
        while !child_b.borrow_mut().poll_init() {}

        tree.poll_child_init(&a);
        assert_eq!(child_a.borrow().phase(), crate::actor::ActorPhase::Initialized, "still waiting on b");

        tree.poll_child_init(&b);
        assert_eq!(child_a.borrow().phase(), crate::actor::ActorPhase::Operational, "a starts once b settles too");
        assert_eq!(child_b.borrow().phase(), crate::actor::ActorPhase::Operational);
    }
}
