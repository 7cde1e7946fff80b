//! [`SubscriptionInfo`]: a materialized subscription point plus its
//! lifecycle state (spec §3 "Subscription point", "Subscription info").

// Layer 1: Standard library imports
use std::cell::RefCell;
use std::rc::Rc;

// Layer 3: Internal module imports
use crate::message::Handler;
use crate::util::{Address, LocalityId};

/// Who owns a subscription, used by the plugin chain to tell apart
/// subscriptions it placed itself from ones application code placed
/// (spec §3 "Subscription point"). Not used for access control — only
/// for bookkeeping (e.g. `resources` plugin counts SUPERVISOR/PLUGIN
/// subscriptions differently than ANONYMOUS ones when deciding whether
/// shutdown can proceed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerTag {
    Anonymous,
    Plugin,
    Supervisor,
    Foreign,
}

/// Lifecycle state of a materialized subscription (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    Subscribing,
    Established,
    Unsubscribing,
}

/// A materialized (address, handler, owner-tag) subscription point.
///
/// The handler is held behind `RefCell<Rc<Handler>>` rather than
/// `Rc<RefCell<Handler>>` so that [`SubscriptionInfo::tag`] can *replace*
/// the handler with a freshly built interceptor while deliveries already
/// in flight keep their own `Rc` clone of the old one (spec §4.3:
/// "Tagging a subscription replaces its handler with an interceptor;
/// in-flight deliveries keep the old reference").
#[derive(Debug)]
pub struct SubscriptionInfo {
    address: Address,
    handler: RefCell<Rc<Handler>>,
    owner_tag: OwnerTag,
    /// Locality of the actor that *owns* the handler (the subscriber),
    /// which can differ from `address.locality()` — that difference is
    /// exactly what makes a subscription "external" (spec §4.3).
    handler_locality: LocalityId,
    state: RefCell<SubscriptionState>,
}

impl SubscriptionInfo {
    pub fn new(
        address: Address,
        handler: Handler,
        owner_tag: OwnerTag,
        handler_locality: LocalityId,
    ) -> Self {
        Self {
            address,
            handler: RefCell::new(Rc::new(handler)),
            owner_tag,
            handler_locality,
            state: RefCell::new(SubscriptionState::Subscribing),
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn handler(&self) -> Rc<Handler> {
        self.handler.borrow().clone()
    }

    pub fn replace_handler(&self, handler: Handler) {
        *self.handler.borrow_mut() = Rc::new(handler);
    }

    pub fn owner_tag(&self) -> OwnerTag {
        self.owner_tag
    }

    /// Locality the subscribing handler's owner runs in — where an
    /// external subscription's `handler_call` envelope must be forwarded
    /// (spec §4.4 step 3).
    pub fn handler_locality(&self) -> LocalityId {
        self.handler_locality
    }

    pub fn state(&self) -> SubscriptionState {
        *self.state.borrow()
    }

    pub fn set_state(&self, state: SubscriptionState) {
        *self.state.borrow_mut() = state;
    }

    /// True if the subscribing actor runs in the same locality as the
    /// subscribed address (spec §3 "Marked *internal* if the address and
    /// the owner share a locality; otherwise *external*").
    pub fn is_internal(&self) -> bool {
        self.handler_locality == self.address.locality()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::ActorId;

    #[derive(Debug)]
    struct Ping;

    fn addr(locality: LocalityId) -> Address {
        Address::new(locality, ActorId::new(), None)
    }

    #[test]
    fn internal_when_handler_and_address_share_a_locality() {
        let locality = LocalityId::new();
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let info = SubscriptionInfo::new(addr(locality), handler, OwnerTag::Anonymous, locality);
        assert!(info.is_internal());
    }

    #[test]
    fn external_when_localities_differ() {
        let address_locality = LocalityId::new();
        let handler_locality = LocalityId::new();
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let info = SubscriptionInfo::new(
            addr(address_locality),
            handler,
            OwnerTag::Foreign,
            handler_locality,
        );
        assert!(!info.is_internal());
    }

    #[test]
    fn replace_handler_swaps_the_shared_pointer() {
        let locality = LocalityId::new();
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let info = SubscriptionInfo::new(addr(locality), handler, OwnerTag::Anonymous, locality);
        let before = info.handler();

        let replacement = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        info.replace_handler(replacement);
        let after = info.handler();

        assert!(!Rc::ptr_eq(&before, &after), "in-flight holders should keep the pre-tag handler");
    }
}
