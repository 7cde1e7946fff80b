//! `registry`: client-side access to the registry actor for name
//! registration and discovery (spec §4.11 "Registry plugin"). Grounded
//! on `rotor::plugin::registry_plugin_t`
//! (`original_source/include/rotor/plugin/registry.h`).
//!
//! Simplified relative to rotor: requests go straight to the registry
//! actor's well-known address rather than through an explicit
//! `link_client` handshake first — the registry actor does no I/O and
//! is always reachable through the supervisor tree, so the extra link
//! step buys nothing here. Discovery tasks that ask to link on
//! resolution still produce a real link: this plugin hands the caller a
//! [`LinkIntent`] and the actual `link_client_plugin_t::link` call is
//! made by `actor::ActorCore`, which later reports the outcome back via
//! [`RegistryClientPlugin::on_link_completed`].
//!
//! The message types here (`RegisterRequest`, `DiscoveryRequest`, ...)
//! are the registry actor's wire vocabulary; the future `registry`
//! module's `Registry` actor handles them on the server side.

use std::collections::HashMap;

use crate::message::{Envelope, ErrorCode, ExtendedError};
use crate::plugin::{InitReadiness, Plugin, PluginHost, Reactions};
use crate::util::{Address, RequestId};

#[derive(Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub address: Address,
}

#[derive(Debug)]
pub struct DeregisterService {
    pub name: String,
}

#[derive(Debug)]
pub struct DiscoveryRequest {
    pub name: String,
}

#[derive(Debug)]
pub struct DiscoveryPromise {
    pub name: String,
}

#[derive(Debug)]
pub struct DiscoveryCancel {
    pub request_id: RequestId,
    pub source: Address,
}

/// Phase a discovery task's callback is reported for (spec §4.11:
/// "`.callback(fn(phase ∈ {discovering, linking}, err?))`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryPhase {
    Discovering,
    Linking,
}

/// Emitted when a discovered address needs linking; the caller (
/// `actor::ActorCore`) is responsible for actually invoking
/// `LinkClientPlugin::link` and reporting back via
/// [`RegistryClientPlugin::on_link_completed`].
#[derive(Debug, Clone)]
pub struct LinkIntent {
    pub address: Address,
    pub operational_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegisterState {
    Registering,
    Operational,
}

struct RegisterInfo {
    address: Address,
    state: RegisterState,
}

type DiscoveryCallback = Box<dyn FnMut(DiscoveryPhase, Option<ExtendedError>)>;

struct DiscoveryTask {
    request_id: RequestId,
    link_operational_only: Option<bool>,
    callback: Option<DiscoveryCallback>,
    resolved_address: Option<Address>,
}

/// Client-side registry access: name registration plus discovery tasks
/// with an optional link-on-resolve step (spec §4.11).
pub struct RegistryClientPlugin {
    registry_address: Address,
    register_map: HashMap<String, RegisterInfo>,
    discovery_map: HashMap<String, DiscoveryTask>,
    /// Discovered addresses already being linked, so a second discovery
    /// task resolving to the same address piggybacks instead of linking
    /// twice (spec §4.11: "Aliases... collapse into a single link attempt").
    aliases: HashMap<Address, Vec<String>>,
    next_request_id: u64,
}

impl RegistryClientPlugin {
    pub fn new(registry_address: Address) -> Self {
        Self {
            registry_address,
            register_map: HashMap::new(),
            discovery_map: HashMap::new(),
            aliases: HashMap::new(),
            next_request_id: 1,
        }
    }

    fn fresh_request_id(&mut self) -> RequestId {
        let id = RequestId::from_raw(self.next_request_id);
        self.next_request_id += 1;
        id
    }

    /// Register `address` under `name` with the registry actor.
    pub fn register_name(&mut self, host: &mut dyn PluginHost, name: impl Into<String>, address: Address) {
        let name = name.into();
        let id = self.fresh_request_id();
        let request = Envelope::request(
            self.registry_address.clone(),
            RegisterRequest { name: name.clone(), address: address.clone() },
            id,
            host.address().clone(),
        );
        host.enqueue(request);
        self.register_map.insert(name, RegisterInfo { address, state: RegisterState::Registering });
    }

    /// Start a discovery task for `name`. `delayed` sends a
    /// `discovery_promise` instead of a `discovery_request` (waits for a
    /// future registration rather than failing immediately). `link`,
    /// when `Some(operational_only)`, asks to link to the discovered
    /// address once resolved.
    pub fn discover_name(
        &mut self,
        host: &mut dyn PluginHost,
        name: impl Into<String>,
        delayed: bool,
        link: Option<bool>,
        callback: impl FnMut(DiscoveryPhase, Option<ExtendedError>) + 'static,
    ) {
        let name = name.into();
        let id = self.fresh_request_id();
        let request = if delayed {
            Envelope::request(self.registry_address.clone(), DiscoveryPromise { name: name.clone() }, id, host.address().clone())
        } else {
            Envelope::request(self.registry_address.clone(), DiscoveryRequest { name: name.clone() }, id, host.address().clone())
        };
        host.enqueue(request);
        self.discovery_map.insert(
            name,
            DiscoveryTask {
                request_id: id,
                link_operational_only: link,
                callback: Some(Box::new(callback)),
                resolved_address: None,
            },
        );
    }

    pub fn on_registration_response(&mut self, name: &str, result: Result<(), ExtendedError>) {
        match result {
            Ok(()) => {
                if let Some(info) = self.register_map.get_mut(name) {
                    info.state = RegisterState::Operational;
                }
            }
            Err(_) => {
                self.register_map.remove(name);
            }
        }
    }

    /// A `discovery_response`/`discovery_future` arrived for `name`.
    /// Returns a [`LinkIntent`] if the task asked to link and no link is
    /// already in flight for the resolved address.
    pub fn on_discovery_response(&mut self, name: &str, result: Result<Address, ExtendedError>) -> Option<LinkIntent> {
        let Some(task) = self.discovery_map.get_mut(name) else { return None };

        let address = match result {
            Ok(address) => address,
            Err(error) => {
                if let Some(mut callback) = task.callback.take() {
                    callback(DiscoveryPhase::Discovering, Some(error));
                }
                self.discovery_map.remove(name);
                return None;
            }
        };

        task.resolved_address = Some(address.clone());
        if let Some(mut callback) = task.callback.take() {
            callback(DiscoveryPhase::Discovering, None);
            task.callback = Some(callback);
        }

        let Some(operational_only) = task.link_operational_only else {
            self.discovery_map.remove(name);
            return None;
        };

        if let Some(names) = self.aliases.get_mut(&address) {
            names.push(name.to_string());
            return None;
        }

        self.aliases.insert(address.clone(), vec![name.to_string()]);
        Some(LinkIntent { address, operational_only })
    }

    /// The link for `address` (requested by an earlier [`LinkIntent`])
    /// completed; fire every aliased task's callback and drop them all.
    pub fn on_link_completed(&mut self, address: &Address, outcome: Result<(), ExtendedError>) {
        let Some(names) = self.aliases.remove(address) else { return };
        for name in names {
            if let Some(mut task) = self.discovery_map.remove(&name) {
                if let Some(mut callback) = task.callback.take() {
                    callback(DiscoveryPhase::Linking, outcome.clone().err());
                }
            }
        }
    }

    pub fn has_registering(&self) -> bool {
        self.register_map.values().any(|info| info.state == RegisterState::Registering)
    }

    pub fn has_discovering(&self) -> bool {
        !self.discovery_map.is_empty()
    }

    /// On shutdown, deregister every service this actor successfully
    /// registered (spec §4.11 server-side `deregister_service` is
    /// idempotent, so no response tracking is needed here).
    pub fn deregister_all(&mut self, host: &mut dyn PluginHost) {
        for (name, info) in self.register_map.drain() {
            if info.state == RegisterState::Operational {
                host.enqueue(Envelope::plain(self.registry_address.clone(), DeregisterService { name }));
            }
        }
    }

    /// On shutdown, cancel every outstanding discovery task: send
    /// `discovery_cancel` to the registry and fire each task's callback
    /// with [`ErrorCode::Cancelled`] (spec §4.11 scenario: "on client
    /// shutdown before register, client observes `cancelled`").
    pub fn cancel_all(&mut self, host: &mut dyn PluginHost) {
        for (_, mut task) in self.discovery_map.drain() {
            host.enqueue(Envelope::plain(
                self.registry_address.clone(),
                DiscoveryCancel { request_id: task.request_id, source: host.address().clone() },
            ));
            if let Some(mut callback) = task.callback.take() {
                let error = ExtendedError::new("discovery cancelled on shutdown", ErrorCode::Cancelled);
                callback(DiscoveryPhase::Discovering, Some(error));
            }
        }
        self.aliases.clear();
    }
}

impl Plugin for RegistryClientPlugin {
    fn name(&self) -> &'static str {
        "registry"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
        reactions.insert(Reactions::INIT);
    }

    fn poll_init(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) -> InitReadiness {
        if self.has_registering() || self.has_discovering() {
            InitReadiness::NotReady
        } else {
            InitReadiness::Ready
        }
    }
}
