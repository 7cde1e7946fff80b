//! [`Registry`]: server-side bookkeeping for the name registration and
//! discovery actor (spec §4.11 "Registry plugin", server half).
//! Grounded on `rotor::plugin::registry_plugin_t`
//! (`original_source/include/rotor/plugin/registry.h`), which keeps the
//! same `name -> address` table and a FIFO of pending promise waiters
//! per name.
//!
//! Like [`crate::plugin::builtin::link_server::LinkServerPlugin`], the
//! registry's wire messages (`RegisterRequest`, `DiscoveryRequest`, ...)
//! are routed here as direct method calls by whatever owns this actor's
//! `ActorCore`, not through the generic subscription map — the registry
//! is a single well-known actor, so there is no per-actor chain slot for
//! it the way there is for `link_server`.

use std::collections::{HashMap, VecDeque};

use crate::message::{Envelope, ErrorCode, ExtendedError};
use crate::plugin::PluginHost;
use crate::util::{Address, RequestId};

use super::error::RegistryError;

/// Successful discovery response payload (spec §4.11 `discovery_response`
/// / `discovery_future`): the resolved address for the requested name.
#[derive(Debug, Clone)]
pub struct DiscoveryResolved {
    pub address: Address,
}

/// `name -> address` table plus a FIFO of `discovery_promise` waiters
/// per name (spec §4.11: "a promise blocks until some future
/// registration resolves it, in registration order").
#[derive(Default)]
pub struct Registry {
    services: HashMap<String, Address>,
    names_by_address: HashMap<Address, Vec<String>>,
    promises_by_name: HashMap<String, VecDeque<(RequestId, Address)>>,
    promise_names: HashMap<RequestId, String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Incoming `register_request` (spec §4.11 invariant: re-registering
    /// the same name to the same address is a no-op success; a
    /// different address conflicts).
    pub fn on_register_request(
        &mut self,
        host: &mut dyn PluginHost,
        client: Address,
        request_id: RequestId,
        name: String,
        address: Address,
    ) {
        if let Some(existing) = self.services.get(&name) {
            if existing != &address {
                let error = RegistryError::AlreadyRegistered { name };
                host.enqueue(Envelope::response_error(client, request_id, error.into()));
                return;
            }
        } else {
            self.names_by_address.entry(address.clone()).or_default().push(name.clone());
        }

        self.services.insert(name.clone(), address.clone());
        host.enqueue(Envelope::response(client, (), request_id));
        self.resolve_promises(host, &name, &address);
    }

    /// Incoming `deregister_service` — fire-and-forget and idempotent
    /// (spec §4.11: deregistering an unknown name is a no-op), so there
    /// is no response to send.
    pub fn on_deregister_service(&mut self, name: &str) {
        let Some(address) = self.services.remove(name) else { return };
        if let Some(names) = self.names_by_address.get_mut(&address) {
            names.retain(|registered| registered != name);
            if names.is_empty() {
                self.names_by_address.remove(&address);
            }
        }
    }

    /// Incoming `discovery_request`: resolves immediately or fails if
    /// the name is unknown (spec §4.11, non-delayed discovery).
    pub fn on_discovery_request(
        &mut self,
        host: &mut dyn PluginHost,
        client: Address,
        request_id: RequestId,
        name: &str,
    ) {
        match self.services.get(name) {
            Some(address) => {
                host.enqueue(Envelope::response(client, DiscoveryResolved { address: address.clone() }, request_id));
            }
            None => {
                let error = RegistryError::UnknownService { name: name.to_string() };
                host.enqueue(Envelope::response_error(client, request_id, error.into()));
            }
        }
    }

    /// Incoming `discovery_promise`: resolves immediately if already
    /// registered, otherwise queues the waiter (spec §4.11, delayed
    /// discovery).
    pub fn on_discovery_promise(&mut self, host: &mut dyn PluginHost, client: Address, request_id: RequestId, name: String) {
        if let Some(address) = self.services.get(&name) {
            host.enqueue(Envelope::response(client, DiscoveryResolved { address: address.clone() }, request_id));
            return;
        }
        self.promise_names.insert(request_id, name.clone());
        self.promises_by_name.entry(name).or_default().push_back((request_id, client));
    }

    /// Incoming `discovery_cancel`: reply `cancelled` to the matching
    /// promise and drop it (spec §4.11 "`discovery_cancel(request_id,
    /// source)` -> reply `cancelled` to the matching promise and drop
    /// it"). A no-op if the promise already resolved or was never
    /// outstanding (spec §7 "never-fatal").
    pub fn on_discovery_cancel(&mut self, host: &mut dyn PluginHost, source: Address, request_id: RequestId) {
        let Some(name) = self.promise_names.remove(&request_id) else { return };
        if let Some(queue) = self.promises_by_name.get_mut(&name) {
            queue.retain(|(id, _)| *id != request_id);
            if queue.is_empty() {
                self.promises_by_name.remove(&name);
            }
        }
        let error = ExtendedError::new("discovery promise cancelled", ErrorCode::Cancelled);
        host.enqueue(Envelope::response_error(source, request_id, error));
    }

    /// Clear every name registered to `address` regardless of which name
    /// triggered it — used when a supervisor learns a child has died,
    /// since there is no wire message for that (spec §10 supplement:
    /// "registrations do not outlive the actor that owns them").
    pub fn deregister_address(&mut self, address: &Address) {
        let Some(names) = self.names_by_address.remove(address) else { return };
        for name in names {
            self.services.remove(&name);
        }
    }

    fn resolve_promises(&mut self, host: &mut dyn PluginHost, name: &str, address: &Address) {
        let Some(queue) = self.promises_by_name.remove(name) else { return };
        for (request_id, client) in queue {
            self.promise_names.remove(&request_id);
            host.enqueue(Envelope::response(client, DiscoveryResolved { address: address.clone() }, request_id));
        }
    }
}
