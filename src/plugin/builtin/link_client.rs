//! `link_client`: active (client) side of actor linking (spec §4.10
//! "Client side"). Grounded on `rotor::plugin::link_client_plugin_t`
//! (`original_source/include/rotor/plugin/link_client.h`).
//!
//! Simplified relative to rotor: the client does not wait for
//! `unlink_response` on its own shutdown — every actor already gets a
//! bounded shutdown timeout (spec §4.6), so a best-effort
//! `unlink_notify` fire-and-forget is enough; this plugin never holds
//! the SHUTDOWN gate open.

use std::collections::HashMap;

use crate::message::{Envelope, ExtendedError};
use crate::plugin::{Plugin, PluginHost, Reactions};
use crate::util::{Address, RequestId};

/// Sent to a server to establish a link (spec §4.10 "Client side").
#[derive(Debug)]
pub struct LinkRequest {
    pub operational_only: bool,
}

/// Fire-and-forget notice sent to every linked server on client shutdown.
#[derive(Debug)]
pub struct UnlinkNotify;

/// The result handed to a `link()` caller's completion callback.
pub type LinkOutcome = Result<(), ExtendedError>;

type LinkCallback = Box<dyn FnOnce(LinkOutcome)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerState {
    Linking,
    Operational,
}

struct ServerRecord {
    state: ServerState,
    #[allow(dead_code)]
    request_id: RequestId,
    callback: Option<LinkCallback>,
}

/// Tracks every server this actor has linked to. `actor::ActorCore` owns
/// one per actor and routes `link_response` arrivals here via
/// [`LinkClientPlugin::on_link_response`].
#[derive(Default)]
pub struct LinkClientPlugin {
    servers: HashMap<Address, ServerRecord>,
    next_request_id: u64,
}

impl LinkClientPlugin {
    /// Send a `link_request` to `address` (spec §4.10: "If
    /// `operational_only` is set, the server side will respond only
    /// upon becoming operational. The link callback is always invoked
    /// upon response").
    pub fn link(
        &mut self,
        host: &mut dyn PluginHost,
        address: Address,
        operational_only: bool,
        callback: impl FnOnce(LinkOutcome) + 'static,
    ) {
        self.next_request_id += 1;
        let id = RequestId::from_raw(self.next_request_id);
        let request = Envelope::request(address.clone(), LinkRequest { operational_only }, id, host.address().clone());
        host.enqueue(request);
        self.servers.insert(address, ServerRecord { state: ServerState::Linking, request_id: id, callback: Some(Box::new(callback)) });
    }

    /// A `link_response` arrived from `server`.
    pub fn on_link_response(&mut self, server: &Address, outcome: LinkOutcome) {
        let Some(record) = self.servers.get_mut(server) else { return };
        let callback = record.callback.take();
        if outcome.is_err() {
            self.servers.remove(server);
        } else {
            record.state = ServerState::Operational;
        }
        if let Some(callback) = callback {
            callback(outcome);
        }
    }

    /// True while any link is still awaiting its `link_response`; the
    /// INIT gate holds open for this plugin while this is true (spec
    /// §4.10: init does not complete while a link is outstanding).
    pub fn is_linking(&self) -> bool {
        self.servers.values().any(|record| record.state == ServerState::Linking)
    }

    pub fn has_servers(&self) -> bool {
        !self.servers.is_empty()
    }

    /// Send `unlink_notify` to every linked server and forget them all.
    pub fn notify_all_and_clear(&mut self, host: &mut dyn PluginHost) {
        let servers: Vec<Address> = self.servers.keys().cloned().collect();
        for address in servers {
            host.enqueue(Envelope::plain(address, UnlinkNotify));
        }
        self.servers.clear();
    }

    /// Incoming `unlink_request` from a server we're linked to (spec
    /// §4.10: "On server-initiated unlink request, the client by
    /// default unlinks immediately"). No `on_unlink` interceptor hook
    /// exists in this crate, so this always forgets the link and
    /// replies with this actor's own address, matching rotor's
    /// `forget_link` default path.
    pub fn on_unlink_request(&mut self, host: &mut dyn PluginHost, server: &Address, request_id: RequestId) {
        if self.servers.remove(server).is_some() {
            host.enqueue(Envelope::response(server.clone(), host.address().clone(), request_id));
        }
    }
}

impl Plugin for LinkClientPlugin {
    fn name(&self) -> &'static str {
        "link_client"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
        reactions.insert(Reactions::INIT);
    }

    fn poll_init(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) -> crate::plugin::InitReadiness {
        if self.is_linking() {
            crate::plugin::InitReadiness::NotReady
        } else {
            crate::plugin::InitReadiness::Ready
        }
    }
}
