//! [`ActorCore`]: owns one actor's [`ActorPhase`], [`PluginChain`], and
//! [`ActorContext`], and routes control messages (link/registry/child
//! bookkeeping) to the concrete plugins that handle them (spec §4.6
//! "Actor Core", §4.10, §4.11).
//!
//! The chain only ever sees plugins through `Box<dyn Plugin>`; this type
//! additionally keeps `Rc<RefCell<_>>` handles to the plugins whose
//! inherent methods it needs to call directly (`link_server`,
//! `link_client`, `registry`, `child_manager`), using the blanket
//! `Plugin` impl in `plugin::shared` so one instance serves both roles.
//! `registry_server` is the one exception — it never joins the chain at
//! all, since only the single actor hosting the registry carries one.

use std::cell::RefCell;
use std::rc::Rc;

use crate::message::{ExtendedError, Handler};
use crate::plugin::builtin::{
    AddressMakerPlugin, ChildFlags, ChildManagerPlugin, DeliveryPlugin, DiscoveryPhase, InitFailurePolicy,
    InitShutdownPlugin, LifetimePlugin, LinkClientPlugin, LinkOutcome, LinkServerPlugin, LocalityPlugin,
    RegistryClientPlugin, ResourcesPlugin, ShutdownOutcome, StarterPlugin,
};
use crate::plugin::{PluginChain, PluginHost};
use crate::registry::Registry;
use crate::subscription::{OwnerTag, SubscriptionError};
use crate::util::{Address, HandlerId, RequestId};

use super::context::ActorContext;
use super::phase::ActorPhase;

/// Construction options for [`ActorCore`] (spec §4.5 chain note: plain
/// actors and supervisors share most of the canonical chain, differing
/// only in `locality`/`child_manager`/`delivery`).
pub struct ActorCoreConfig {
    pub supervisor: bool,
    pub is_locality_leader: bool,
    pub registry_address: Option<Address>,
    /// True if this actor itself hosts the registry's server-side state
    /// (spec §4.11: a single well-known actor in the supervisor tree).
    pub is_registry_host: bool,
    pub init_failure_policy: InitFailurePolicy,
    /// Hold every child at `start_trigger` until all siblings report
    /// INITIALIZED (spec §4.7 "Init synchronization"). Ignored unless
    /// `supervisor` is set.
    pub synchronize_start: bool,
    pub on_start: Option<Box<dyn FnMut()>>,
}

impl Default for ActorCoreConfig {
    fn default() -> Self {
        Self {
            supervisor: false,
            is_locality_leader: false,
            registry_address: None,
            is_registry_host: false,
            init_failure_policy: InitFailurePolicy::default(),
            synchronize_start: false,
            on_start: None,
        }
    }
}

pub struct ActorCore {
    phase: ActorPhase,
    chain: PluginChain,
    context: ActorContext,
    link_server: Rc<RefCell<LinkServerPlugin>>,
    link_client: Rc<RefCell<LinkClientPlugin>>,
    registry: Option<Rc<RefCell<RegistryClientPlugin>>>,
    child_manager: Option<Rc<RefCell<ChildManagerPlugin>>>,
    registry_server: Option<Rc<RefCell<Registry>>>,
    shutdown_reason: Option<ExtendedError>,
}

impl ActorCore {
    /// Assemble the chain in spec §4.5's canonical order and wrap it
    /// around `context`.
    pub fn new(context: ActorContext, config: ActorCoreConfig) -> Self {
        let link_server = Rc::new(RefCell::new(LinkServerPlugin::default()));
        let link_client = Rc::new(RefCell::new(LinkClientPlugin::default()));
        let registry = config
            .registry_address
            .map(|address| Rc::new(RefCell::new(RegistryClientPlugin::new(address))));
        let child_manager = config
            .supervisor
            .then(|| Rc::new(RefCell::new(ChildManagerPlugin::new(config.init_failure_policy, config.synchronize_start))));
        let registry_server = config.is_registry_host.then(|| Rc::new(RefCell::new(Registry::new())));

        let mut chain = PluginChain::new();
        chain.push(Box::new(AddressMakerPlugin));
        if config.supervisor {
            chain.push(Box::new(LocalityPlugin::new(config.is_locality_leader)));
        }
        chain.push(Box::new(LifetimePlugin::default()));
        chain.push(Box::new(InitShutdownPlugin));
        chain.push(Box::new(link_server.clone()));
        chain.push(Box::new(link_client.clone()));
        if let Some(registry) = &registry {
            chain.push(Box::new(registry.clone()));
        }
        if let Some(child_manager) = &child_manager {
            chain.push(Box::new(child_manager.clone()));
        }
        chain.push(Box::new(ResourcesPlugin::default()));
        if config.supervisor {
            chain.push(Box::new(DeliveryPlugin));
        }
        if let Some(on_start) = config.on_start {
            chain.push(Box::new(StarterPlugin::new(on_start)));
        }

        Self {
            phase: ActorPhase::New,
            chain,
            context,
            link_server,
            link_client,
            registry,
            child_manager,
            registry_server,
            shutdown_reason: None,
        }
    }

    pub fn phase(&self) -> ActorPhase {
        self.phase
    }

    pub fn context(&self) -> &ActorContext {
        &self.context
    }

    fn advance(&mut self, next: ActorPhase) {
        debug_assert!(self.phase.can_advance_to(next), "illegal transition {} -> {}", self.phase, next);
        self.phase = next;
    }

    /// Drain subscription events recorded by `context` since the last
    /// call and hand each to the chain (spec §4.5: `ActorCore` is the
    /// one object that owns both the context and the chain).
    fn flush_subscription_events(&mut self) {
        for event in self.context.take_subscription_events() {
            self.chain.notify_subscription(&mut self.context, &event);
        }
    }

    /// Run the chain's forward activation walk (spec §3 `NEW -> INITIALIZING`).
    pub fn activate(&mut self) {
        self.chain.activate_all(&mut self.context);
        self.flush_subscription_events();
        self.advance(ActorPhase::Initializing);
    }

    /// Poll the INIT gate. Returns `true` once every interested plugin is
    /// ready, at which point the phase advances to `INITIALIZED`.
    pub fn poll_init(&mut self) -> bool {
        let ready = self.chain.poll_init_all(&mut self.context);
        self.flush_subscription_events();
        if ready {
            self.advance(ActorPhase::Initialized);
        }
        ready
    }

    /// Run the reverse `START` walk and become OPERATIONAL (spec §3
    /// `INITIALIZED -> OPERATIONAL`). Replies to every client pending on
    /// `operational_only` links (spec §4.10).
    pub fn trigger_start(&mut self) {
        self.chain.handle_start_all(&mut self.context);
        self.flush_subscription_events();
        self.advance(ActorPhase::Operational);
        self.link_server.borrow_mut().mark_operational(&mut self.context);
    }

    /// Begin shutdown with `reason` (spec §3 `OPERATIONAL -> SHUTTING_DOWN`,
    /// or the init-failure shortcut from `INITIALIZING`/`INITIALIZED`).
    /// A no-op if shutdown is already underway.
    pub fn begin_shutdown(&mut self, reason: ExtendedError) {
        if self.phase.is_shutting_down() {
            return;
        }
        self.shutdown_reason = Some(reason);
        self.advance(ActorPhase::ShuttingDown);
        self.link_client.borrow_mut().notify_all_and_clear(&mut self.context);
        if let Some(registry) = &self.registry {
            registry.borrow_mut().cancel_all(&mut self.context);
            registry.borrow_mut().deregister_all(&mut self.context);
        }
    }

    /// Poll the SHUTDOWN gate. Returns `true` once the actor has fully
    /// deactivated and reached `SHUT_DOWN`.
    pub fn poll_shutdown(&mut self) -> bool {
        let Some(reason) = self.shutdown_reason.clone() else {
            return false;
        };
        let ready = self.chain.poll_shutdown_all(&mut self.context, &reason);
        self.flush_subscription_events();
        if ready {
            self.chain.deactivate_all(&mut self.context);
            self.advance(ActorPhase::ShutDown);
        }
        ready
    }

    // -- Application-facing subscription API (spec §4.6 `subscribe`/`unsubscribe`) --

    pub fn subscribe(&mut self, address: Address, handler: Handler) -> Result<(), SubscriptionError> {
        self.context.subscribe_tagged(address, handler, OwnerTag::Anonymous)?;
        self.flush_subscription_events();
        Ok(())
    }

    pub fn unsubscribe(&mut self, address: &Address, handler: HandlerId) -> Result<(), SubscriptionError> {
        self.context.unsubscribe(address, handler)?;
        self.flush_subscription_events();
        Ok(())
    }

    // -- Link control messages (spec §4.10), routed here as direct calls --

    pub fn on_link_request(&mut self, client: Address, request_id: RequestId, operational_only: bool) {
        let link_server = self.link_server.clone();
        link_server.borrow_mut().on_link_request(&mut self.context, client, request_id, operational_only);
    }

    pub fn on_unlink_response(&mut self, client: &Address) {
        self.link_server.borrow_mut().on_unlink_response(client);
    }

    pub fn on_unlink_notify(&mut self, client: &Address) {
        self.link_server.borrow_mut().on_unlink_notify(client);
    }

    pub fn link_to(&mut self, address: Address, operational_only: bool, callback: impl FnOnce(LinkOutcome) + 'static) {
        let link_client = self.link_client.clone();
        link_client.borrow_mut().link(&mut self.context, address, operational_only, callback);
    }

    pub fn on_link_response(&mut self, server: &Address, outcome: LinkOutcome) {
        self.link_client.borrow_mut().on_link_response(server, outcome);
    }

    pub fn on_unlink_request(&mut self, server: &Address, request_id: RequestId) {
        let link_client = self.link_client.clone();
        link_client.borrow_mut().on_unlink_request(&mut self.context, server, request_id);
    }

    // -- Registry control messages (spec §4.11) --

    pub fn register_name(&mut self, name: impl Into<String>, address: Address) {
        let Some(registry) = self.registry.clone() else { return };
        registry.borrow_mut().register_name(&mut self.context, name, address);
    }

    pub fn discover_name(
        &mut self,
        name: impl Into<String>,
        delayed: bool,
        link: Option<bool>,
        callback: impl FnMut(DiscoveryPhase, Option<ExtendedError>) + 'static,
    ) {
        let Some(registry) = self.registry.clone() else { return };
        registry.borrow_mut().discover_name(&mut self.context, name, delayed, link, callback);
    }

    pub fn on_registration_response(&mut self, name: &str, result: Result<(), ExtendedError>) {
        let Some(registry) = &self.registry else { return };
        registry.borrow_mut().on_registration_response(name, result);
    }

    /// A `discovery_response`/`discovery_future` arrived: resolve it
    /// against the registry plugin and, if a link is owed, kick it off
    /// through `link_client` (spec §4.11: "the caller is responsible for
    /// actually invoking `link` and reporting back via
    /// `on_link_completed`" — `ActorCore` is that caller).
    pub fn on_discovery_response(&mut self, name: &str, result: Result<Address, ExtendedError>) {
        let Some(registry) = self.registry.clone() else { return };
        let intent = registry.borrow_mut().on_discovery_response(name, result);
        if let Some(intent) = intent {
            let address = intent.address.clone();
            self.link_to(intent.address, intent.operational_only, move |outcome| {
                registry.borrow_mut().on_link_completed(&address, outcome);
            });
        }
    }

    // -- Registry server messages (spec §4.11), registry host actor only --

    pub fn on_register_request(&mut self, client: Address, request_id: RequestId, name: String, address: Address) {
        let Some(registry_server) = self.registry_server.clone() else { return };
        registry_server.borrow_mut().on_register_request(&mut self.context, client, request_id, name, address);
    }

    pub fn on_deregister_service(&mut self, name: &str) {
        let Some(registry_server) = &self.registry_server else { return };
        registry_server.borrow_mut().on_deregister_service(name);
    }

    pub fn on_discovery_request(&mut self, client: Address, request_id: RequestId, name: &str) {
        let Some(registry_server) = self.registry_server.clone() else { return };
        registry_server.borrow_mut().on_discovery_request(&mut self.context, client, request_id, name);
    }

    pub fn on_discovery_promise(&mut self, client: Address, request_id: RequestId, name: String) {
        let Some(registry_server) = self.registry_server.clone() else { return };
        registry_server.borrow_mut().on_discovery_promise(&mut self.context, client, request_id, name);
    }

    pub fn on_discovery_cancel(&mut self, source: Address, request_id: RequestId) {
        let Some(registry_server) = self.registry_server.clone() else { return };
        registry_server.borrow_mut().on_discovery_cancel(&mut self.context, source, request_id);
    }

    /// Drop every name registered to `address` — used by a supervisor
    /// that hosts the registry when it learns a child has died (spec
    /// §10 supplement, no wire trigger).
    pub fn deregister_address(&mut self, address: &Address) {
        let Some(registry_server) = &self.registry_server else { return };
        registry_server.borrow_mut().deregister_address(address);
    }

    // -- Child-manager control messages (spec §4.7), supervisors only --

    pub fn register_child(&mut self, address: Address, flags: ChildFlags) {
        if let Some(child_manager) = &self.child_manager {
            child_manager.borrow_mut().register_child(address, flags);
        }
    }

    /// Returns the addresses that should now receive `start_trigger`
    /// (spec §4.7 "Init synchronization") — empty if this actor isn't a
    /// supervisor or the child is still awaiting settled siblings.
    pub fn on_child_initialized(&mut self, address: &Address) -> Vec<Address> {
        let Some(child_manager) = &self.child_manager else { return Vec::new() };
        child_manager.borrow_mut().on_child_initialized(address)
    }

    pub fn on_child_init_failed(&mut self, address: &Address, reason: ExtendedError) {
        let Some(child_manager) = self.child_manager.clone() else { return };
        let outcome = child_manager.borrow_mut().on_child_init_failed(address, reason);
        self.apply_shutdown_outcome(outcome);
    }

    pub fn on_child_shutdown(&mut self, address: &Address, reason: ExtendedError) {
        let Some(child_manager) = self.child_manager.clone() else { return };
        let outcome = child_manager.borrow_mut().on_child_shutdown(address, reason);
        self.apply_shutdown_outcome(outcome);
    }

    fn apply_shutdown_outcome(&mut self, outcome: ShutdownOutcome) {
        if let ShutdownOutcome::ShutdownSupervisor(reason) = outcome {
            if let Some(child_manager) = &self.child_manager {
                child_manager.borrow_mut().mark_supervisor_shutting_down();
            }
            self.begin_shutdown(reason);
        }
    }

    pub fn active_children(&self) -> usize {
        self.child_manager.as_ref().map(|manager| manager.borrow().active_actors()).unwrap_or(0)
    }
}
