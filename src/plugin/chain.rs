//! [`PluginChain`]: the ordered list of plugins an actor owns, and the
//! forward/reverse walks that drive activation, INIT, START, and
//! SHUTDOWN (spec §4.5).

// Layer 3: Internal module imports
use super::host::{PluginHost, SubscriptionEvent};
use super::reactions::{InitReadiness, Reactions, ShutdownReadiness};
use super::Plugin;
use crate::message::ExtendedError;

struct Slot {
    plugin: Box<dyn Plugin>,
    reactions: Reactions,
}

/// An actor's plugin chain, in activation order (spec §4.5: "Each actor
/// owns an ordered list of plugins"). Grounded on
/// `rotor::actor_base_t`'s plugin storage
/// (`original_source/include/rotor/actor_base.h`) and the teacher's
/// `supervisor::node` activation ordering.
#[derive(Default)]
pub struct PluginChain {
    slots: Vec<Slot>,
}

impl PluginChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin to the end of the chain — this crate's canonical
    /// chains are assembled by pushing in the fixed order spec §4.5
    /// names (`address_maker → lifetime → ...`).
    pub fn push(&mut self, plugin: Box<dyn Plugin>) {
        self.slots.push(Slot { plugin, reactions: Reactions::NONE });
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn reactions_of(&self, index: usize) -> Reactions {
        self.slots[index].reactions
    }

    /// Walk the chain forward, activating each plugin in turn (spec:
    /// "The actor advances to the next plugin only after activation
    /// completes").
    pub fn activate_all(&mut self, host: &mut dyn PluginHost) {
        for slot in &mut self.slots {
            slot.plugin.activate(host, &mut slot.reactions);
        }
    }

    /// Poll every plugin with the `INIT` reaction enabled. Returns
    /// `true` once none remain (spec §4.5 "INIT gate").
    pub fn poll_init_all(&mut self, host: &mut dyn PluginHost) -> bool {
        let mut all_ready = true;
        for slot in &mut self.slots {
            if !slot.reactions.contains(Reactions::INIT) {
                continue;
            }
            match slot.plugin.poll_init(host, &mut slot.reactions) {
                InitReadiness::Ready => slot.reactions.remove(Reactions::INIT),
                InitReadiness::NotReady => all_ready = false,
            }
        }
        all_ready
    }

    /// Walk the chain in reverse, running `handle_start` on every plugin
    /// with the `START` reaction enabled, then clearing it (spec: "Upon
    /// receiving `start_trigger`, the actor walks plugins in reverse").
    pub fn handle_start_all(&mut self, host: &mut dyn PluginHost) {
        for slot in self.slots.iter_mut().rev() {
            if !slot.reactions.contains(Reactions::START) {
                continue;
            }
            slot.plugin.handle_start(host, &mut slot.reactions);
            slot.reactions.remove(Reactions::START);
        }
    }

    /// Poll, in reverse chain order, every plugin with the `SHUTDOWN`
    /// reaction enabled. Returns `true` once none remain (spec §4.5
    /// "SHUTDOWN gate").
    pub fn poll_shutdown_all(&mut self, host: &mut dyn PluginHost, reason: &ExtendedError) -> bool {
        let mut all_ready = true;
        for slot in self.slots.iter_mut().rev() {
            if !slot.reactions.contains(Reactions::SHUTDOWN) {
                continue;
            }
            match slot.plugin.poll_shutdown(host, &mut slot.reactions, reason) {
                ShutdownReadiness::Ready => slot.reactions.remove(Reactions::SHUTDOWN),
                ShutdownReadiness::NotReady => all_ready = false,
            }
        }
        all_ready
    }

    /// Deactivate every plugin in reverse activation order (spec
    /// invariant: "A plugin never observes itself active after
    /// `deactivate()` returns").
    pub fn deactivate_all(&mut self, host: &mut dyn PluginHost) {
        for slot in self.slots.iter_mut().rev() {
            slot.plugin.deactivate(host);
            slot.reactions = Reactions::NONE;
        }
    }

    /// Notify every plugin with the `SUBSCRIPTION` reaction enabled.
    pub fn notify_subscription(&mut self, host: &mut dyn PluginHost, event: &SubscriptionEvent) {
        for slot in &mut self.slots {
            if slot.reactions.contains(Reactions::SUBSCRIPTION) {
                slot.plugin.on_subscription_event(host, event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Envelope, Handler};
    use crate::subscription::SubscriptionError;
    use crate::util::{Address, ActorId, HandlerId, LocalityId};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct NullHost {
        address: Address,
    }

    impl PluginHost for NullHost {
        fn address(&self) -> &Address {
            &self.address
        }
        fn subscribe(&mut self, _address: Address, _handler: Handler) -> Result<(), SubscriptionError> {
            Ok(())
        }
        fn unsubscribe(&mut self, _address: &Address, _handler: HandlerId) -> Result<(), SubscriptionError> {
            Ok(())
        }
        fn enqueue(&mut self, _envelope: Envelope) {}
    }

    fn host() -> NullHost {
        NullHost { address: Address::new(LocalityId::new(), ActorId::new(), None) }
    }

    struct TrackingPlugin {
        order: Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        init_calls: u32,
    }

    impl Plugin for TrackingPlugin {
        fn name(&self) -> &'static str {
            self.name
        }

        fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
            self.order.borrow_mut().push(self.name);
            reactions.insert(Reactions::INIT);
        }

        fn deactivate(&mut self, _host: &mut dyn PluginHost) {
            self.order.borrow_mut().push(self.name);
        }

        fn poll_init(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) -> InitReadiness {
            self.init_calls += 1;
            if self.init_calls >= 2 {
                InitReadiness::Ready
            } else {
                InitReadiness::NotReady
            }
        }
    }

    #[test]
    fn activation_runs_forward_and_deactivation_runs_in_reverse() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut chain = PluginChain::new();
        chain.push(Box::new(TrackingPlugin { order: order.clone(), name: "a", init_calls: 0 }));
        chain.push(Box::new(TrackingPlugin { order: order.clone(), name: "b", init_calls: 0 }));

        let mut host = host();
        chain.activate_all(&mut host);
        assert_eq!(order.borrow().as_slice(), &["a", "b"]);

        order.borrow_mut().clear();
        chain.deactivate_all(&mut host);
        assert_eq!(order.borrow().as_slice(), &["b", "a"]);
    }

    #[test]
    fn init_gate_waits_until_every_interested_plugin_is_ready() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut chain = PluginChain::new();
        chain.push(Box::new(TrackingPlugin { order: order.clone(), name: "a", init_calls: 0 }));

        let mut host = host();
        chain.activate_all(&mut host);
        assert!(chain.reactions_of(0).contains(Reactions::INIT));

        assert!(!chain.poll_init_all(&mut host));
        assert!(chain.poll_init_all(&mut host));
        assert!(!chain.reactions_of(0).contains(Reactions::INIT));
    }
}
