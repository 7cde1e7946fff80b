//! Blanket [`Plugin`] impl for `Rc<RefCell<P>>`.
//!
//! `actor::ActorCore` needs concrete, non-erased access to a handful of
//! plugins (`link_server`, `link_client`, `registry`, `child_manager`) so
//! it can route control messages to their inherent methods directly
//! (spec §4.10/§4.11). Wrapping each in `Rc<RefCell<_>>` lets the same
//! instance be pushed into the chain as `Box<dyn Plugin>` for lifecycle
//! participation *and* kept by `ActorCore` for direct calls — the same
//! "shared handle, two consumers" shape `subscription::SubscriptionInfo`
//! already uses for its handler.

use std::cell::RefCell;
use std::rc::Rc;

use super::host::{PluginHost, SubscriptionEvent};
use super::reactions::{InitReadiness, Reactions, ShutdownReadiness};
use super::Plugin;
use crate::message::ExtendedError;

impl<P: Plugin> Plugin for Rc<RefCell<P>> {
    fn name(&self) -> &'static str {
        self.borrow().name()
    }

    fn activate(&mut self, host: &mut dyn PluginHost, reactions: &mut Reactions) {
        self.borrow_mut().activate(host, reactions);
    }

    fn deactivate(&mut self, host: &mut dyn PluginHost) {
        self.borrow_mut().deactivate(host);
    }

    fn poll_init(&mut self, host: &mut dyn PluginHost, reactions: &mut Reactions) -> InitReadiness {
        self.borrow_mut().poll_init(host, reactions)
    }

    fn handle_start(&mut self, host: &mut dyn PluginHost, reactions: &mut Reactions) {
        self.borrow_mut().handle_start(host, reactions);
    }

    fn poll_shutdown(
        &mut self,
        host: &mut dyn PluginHost,
        reactions: &mut Reactions,
        reason: &ExtendedError,
    ) -> ShutdownReadiness {
        self.borrow_mut().poll_shutdown(host, reactions, reason)
    }

    fn on_subscription_event(&mut self, host: &mut dyn PluginHost, event: &SubscriptionEvent) {
        self.borrow_mut().on_subscription_event(host, event);
    }
}
