//! [`SubscriptionMap`]: maps `(address, type)` to an ordered list of
//! subscription points and splits dispatch recipients into internal vs.
//! external (spec §4.3).

// Layer 1: Standard library imports
use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;

// Layer 3: Internal module imports
use super::error::SubscriptionError;
use super::point::{OwnerTag, SubscriptionInfo, SubscriptionState};
use crate::message::{Envelope, Handler, InterceptHost, InterceptTag};
use crate::util::{Address, HandlerId, LocalityId};

/// The split result of [`SubscriptionMap::recipients`]: handlers whose
/// owner shares a locality with the destination address, and handlers
/// that live elsewhere and must be forwarded (spec §4.3).
#[derive(Debug, Default)]
pub struct Recipients {
    pub internal: Vec<Rc<Handler>>,
    pub external: Vec<Rc<SubscriptionInfo>>,
}

/// Maps `(address, type)` to an ordered list of [`SubscriptionInfo`].
///
/// Owned solely by the locality leader that owns the addresses it
/// indexes (spec §4.3 invariant "Owner consistency"). Never shared across
/// threads, so plain `HashMap`/`Vec` are enough — no interior locking.
#[derive(Default)]
pub struct SubscriptionMap {
    entries: HashMap<(Address, TypeId), Vec<Rc<SubscriptionInfo>>>,
}

impl SubscriptionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize a new subscription point. Errors if `(address, handler)`
    /// already has a point (spec §3 invariant: "Uniqueness").
    pub fn subscribe(
        &mut self,
        address: Address,
        handler: Handler,
        owner_tag: OwnerTag,
        handler_locality: LocalityId,
    ) -> Result<Rc<SubscriptionInfo>, SubscriptionError> {
        let key = (address.clone(), handler.id().message_type());
        let bucket = self.entries.entry(key).or_default();

        if bucket.iter().any(|info| info.handler().id() == handler.id()) {
            return Err(SubscriptionError::AlreadySubscribed {
                address,
                handler: handler.id(),
            });
        }

        let info = Rc::new(SubscriptionInfo::new(address, handler, owner_tag, handler_locality));
        info.set_state(SubscriptionState::Established);
        bucket.push(info.clone());
        Ok(info)
    }

    /// Remove the point for `(address, handler)`. Errors if absent (spec
    /// §4.6: "idempotent if not present → error").
    pub fn unsubscribe(
        &mut self,
        address: &Address,
        handler: HandlerId,
    ) -> Result<(), SubscriptionError> {
        let key = (address.clone(), handler.message_type());
        let Some(bucket) = self.entries.get_mut(&key) else {
            return Err(SubscriptionError::NotSubscribed {
                address: address.clone(),
                handler,
            });
        };

        let position = bucket.iter().position(|info| info.handler().id() == handler);
        let Some(position) = position else {
            return Err(SubscriptionError::NotSubscribed {
                address: address.clone(),
                handler,
            });
        };

        bucket[position].set_state(SubscriptionState::Unsubscribing);
        bucket.remove(position);
        if bucket.is_empty() {
            self.entries.remove(&key);
        }
        Ok(())
    }

    /// Split the subscribers for `envelope`'s destination and payload
    /// type into internal handlers (ready to invoke directly) and
    /// external subscription infos (must be forwarded), preserving
    /// insertion order within each (spec §4.3 "Ordered iteration", §4.4).
    pub fn recipients(&self, envelope: &Envelope) -> Recipients {
        let key = (envelope.destination().clone(), envelope.payload().type_id());
        let mut result = Recipients::default();
        let Some(bucket) = self.entries.get(&key) else {
            return result;
        };
        for info in bucket {
            if info.state() != SubscriptionState::Established {
                continue;
            }
            if info.is_internal() {
                result.internal.push(info.handler());
            } else {
                result.external.push(info.clone());
            }
        }
        result
    }

    /// True if `address` has at least one established subscriber for any
    /// message type — used by the delivery engine's dropped-message
    /// fallback routing (spec §4.4).
    pub fn has_any_recipient(&self, address: &Address) -> bool {
        self.entries
            .keys()
            .filter(|(addr, _)| addr == address)
            .any(|key| {
                self.entries[key]
                    .iter()
                    .any(|info| info.state() == SubscriptionState::Established)
            })
    }

    /// Replace the handler for `(address, handler)` with an interceptor
    /// tagged `tag`, routed through `host` (spec §4.3 "Tagging a
    /// subscription replaces its handler with an interceptor").
    pub fn tag(
        &mut self,
        address: &Address,
        handler: HandlerId,
        tag: InterceptTag,
        host: Rc<dyn InterceptHost>,
    ) -> Result<(), SubscriptionError> {
        let key = (address.clone(), handler.message_type());
        let bucket = self.entries.get_mut(&key).ok_or_else(|| SubscriptionError::NotSubscribed {
            address: address.clone(),
            handler,
        })?;
        let info = bucket
            .iter()
            .find(|info| info.handler().id() == handler)
            .ok_or_else(|| SubscriptionError::NotSubscribed {
                address: address.clone(),
                handler,
            })?;
        let upgraded = info.handler().upgrade(tag, host);
        info.replace_handler(upgraded);
        Ok(())
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
    fn subscribe_then_unsubscribe_leaves_the_map_empty() {
        let locality = LocalityId::new();
        let address = addr(locality);
        let mut map = SubscriptionMap::new();
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let handler_id = handler.id();

        map.subscribe(address.clone(), handler, OwnerTag::Anonymous, locality).unwrap();
        map.unsubscribe(&address, handler_id).unwrap();

        let envelope = Envelope::plain(address, Ping);
        let recipients = map.recipients(&envelope);
        assert!(recipients.internal.is_empty());
        assert!(recipients.external.is_empty());
    }

    #[test]
    fn duplicate_subscription_is_rejected() {
        let locality = LocalityId::new();
        let address = addr(locality);
        let owner = ActorId::new();
        let mut map = SubscriptionMap::new();

        let first = Handler::new::<Ping, _>(owner, |_: &Ping| {});
        map.subscribe(address.clone(), first, OwnerTag::Anonymous, locality).unwrap();

        let second = Handler::new::<Ping, _>(owner, |_: &Ping| {});
        let result = map.subscribe(address, second, OwnerTag::Anonymous, locality);
        assert!(matches!(result, Err(SubscriptionError::AlreadySubscribed { .. })));
    }

    #[test]
    fn unsubscribing_absent_point_is_an_error() {
        let locality = LocalityId::new();
        let address = addr(locality);
        let mut map = SubscriptionMap::new();
        let handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        let result = map.unsubscribe(&address, handler.id());
        assert!(matches!(result, Err(SubscriptionError::NotSubscribed { .. })));
    }

    #[test]
    fn recipients_split_internal_from_external_by_locality() {
        let address_locality = LocalityId::new();
        let other_locality = LocalityId::new();
        let address = addr(address_locality);
        let mut map = SubscriptionMap::new();

        let internal_handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        map.subscribe(address.clone(), internal_handler, OwnerTag::Anonymous, address_locality)
            .unwrap();

        let external_handler = Handler::new::<Ping, _>(ActorId::new(), |_: &Ping| {});
        map.subscribe(address.clone(), external_handler, OwnerTag::Foreign, other_locality)
            .unwrap();

        let envelope = Envelope::plain(address, Ping);
        let recipients = map.recipients(&envelope);
        assert_eq!(recipients.internal.len(), 1);
        assert_eq!(recipients.external.len(), 1);
    }

    #[test]
    fn ordering_is_preserved_within_a_bucket() {
        let locality = LocalityId::new();
        let address = addr(locality);
        let mut map = SubscriptionMap::new();

        let owners: Vec<ActorId> = (0..3).map(|_| ActorId::new()).collect();
        for owner in &owners {
            let handler = Handler::new::<Ping, _>(*owner, |_: &Ping| {});
            map.subscribe(address.clone(), handler, OwnerTag::Anonymous, locality).unwrap();
        }

        let envelope = Envelope::plain(address, Ping);
        let recipients = map.recipients(&envelope);
        let order: Vec<ActorId> = recipients.internal.iter().map(|h| h.id().owner()).collect();
        assert_eq!(order, owners);
    }
}
