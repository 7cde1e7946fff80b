//! `link_server`: passive (server) side of actor linking (spec §4.10
//! "Server side"). Grounded on `rotor::plugin::link_server_plugin_t`
//! (`original_source/include/rotor/plugin/link_server.h`).
//!
//! Control messages (`link_request`/`unlink_response`/`unlink_notify`)
//! are routed here by `actor::ActorCore` as direct method calls rather
//! than through the generic subscription map — see `DESIGN.md` ("Link,
//! registry, and child-manager control messages").

use std::collections::HashMap;

use crate::message::{ErrorCode, Envelope, ExtendedError};
use crate::plugin::{Plugin, PluginHost, Reactions, ShutdownReadiness};
use crate::util::{Address, RequestId};

/// Sent by the server to an OPERATIONAL client when the server starts
/// shutting down (spec §4.10 "On shutdown, the server sends
/// `unlink_request` to each OPERATIONAL client").
#[derive(Debug)]
pub struct UnlinkRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClientState {
    Pending,
    Operational,
}

struct ClientRecord {
    state: ClientState,
    pending_request: Option<RequestId>,
    unlink_request: Option<RequestId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerPhase {
    Initializing,
    Operational,
    ShuttingDown,
}

/// Server-side link bookkeeping. `ActorCore` owns one per actor and
/// drives `mark_operational`/`mark_shutting_down` from its own phase
/// transitions.
pub struct LinkServerPlugin {
    clients: HashMap<Address, ClientRecord>,
    phase: ServerPhase,
    /// Ids for the `unlink_request`s this plugin sends out itself. Only
    /// needs to be unique among this plugin's own in-flight unlinks, so a
    /// local counter is enough — no shared allocator required.
    next_unlink_id: u64,
}

impl Default for LinkServerPlugin {
    fn default() -> Self {
        Self { clients: HashMap::new(), phase: ServerPhase::Initializing, next_unlink_id: 1 }
    }
}

impl LinkServerPlugin {
    pub fn has_clients(&self) -> bool {
        !self.clients.is_empty()
    }

    /// Incoming `link_request` from `client` (spec §4.10 "Server side").
    pub fn on_link_request(
        &mut self,
        host: &mut dyn PluginHost,
        client: Address,
        request_id: RequestId,
        operational_only: bool,
    ) {
        if self.phase == ServerPhase::ShuttingDown {
            let error = ExtendedError::new("server is shutting down", ErrorCode::ActorNotLinkable);
            host.enqueue(Envelope::response_error(client, request_id, error));
            return;
        }

        if self.clients.contains_key(&client) {
            let error = ExtendedError::new("client already linked", ErrorCode::AlreadyLinked);
            host.enqueue(Envelope::response_error(client, request_id, error));
            return;
        }

        if operational_only && self.phase != ServerPhase::Operational {
            self.clients.insert(
                client,
                ClientRecord { state: ClientState::Pending, pending_request: Some(request_id), unlink_request: None },
            );
            return;
        }

        self.clients.insert(
            client.clone(),
            ClientRecord { state: ClientState::Operational, pending_request: None, unlink_request: None },
        );
        host.enqueue(Envelope::response(client, (), request_id));
    }

    /// The server actor has become OPERATIONAL: reply success to every
    /// client still PENDING (spec §4.10 "When the server becomes
    /// operational, it replies success to all PENDING clients").
    pub fn mark_operational(&mut self, host: &mut dyn PluginHost) {
        self.phase = ServerPhase::Operational;
        for (address, record) in &mut self.clients {
            if record.state == ClientState::Pending {
                record.state = ClientState::Operational;
                if let Some(request_id) = record.pending_request.take() {
                    host.enqueue(Envelope::response(address.clone(), (), request_id));
                }
            }
        }
    }

    /// `unlink_response` arrived for a server-initiated unlink.
    pub fn on_unlink_response(&mut self, client: &Address) {
        self.clients.remove(client);
    }

    /// Client-initiated `unlink_notify` — fire-and-forget, no reply owed.
    pub fn on_unlink_notify(&mut self, client: &Address) {
        self.clients.remove(client);
    }
}

impl Plugin for LinkServerPlugin {
    fn name(&self) -> &'static str {
        "link_server"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
        reactions.insert(Reactions::SHUTDOWN);
    }

    fn poll_shutdown(
        &mut self,
        host: &mut dyn PluginHost,
        _reactions: &mut Reactions,
        reason: &ExtendedError,
    ) -> ShutdownReadiness {
        if self.phase != ServerPhase::ShuttingDown {
            self.phase = ServerPhase::ShuttingDown;
            let operational: Vec<Address> = self
                .clients
                .iter()
                .filter(|(_, record)| record.state == ClientState::Operational && record.unlink_request.is_none())
                .map(|(address, _)| address.clone())
                .collect();
            let _ = reason;
            for address in operational {
                if let Some(record) = self.clients.get_mut(&address) {
                    let id = RequestId::from_raw(self.next_unlink_id);
                    self.next_unlink_id += 1;
                    let request = Envelope::request(address.clone(), UnlinkRequest, id, host.address().clone());
                    record.unlink_request = Some(id);
                    host.enqueue(request);
                }
            }
        }

        if self.has_clients() {
            ShutdownReadiness::NotReady
        } else {
            ShutdownReadiness::Ready
        }
    }
}
