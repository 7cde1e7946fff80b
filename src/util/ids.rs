//! Identity primitives: [`ActorId`], [`Address`], [`RequestId`], [`HandlerId`].
//!
//! Addresses are the mailbox identities messages and subscriptions are
//! keyed on (spec §3 "Address"). They can only be minted inside the
//! crate (via [`Address::new`], `pub(crate)`) so that application code can
//! never forge a foreign address — it can only ever hold addresses it was
//! handed by a supervisor.

// Layer 1: Standard library imports
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque locality tag. Two addresses sharing a `LocalityId` run handlers
/// serially on the same loop thread (spec §3 "Locality").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalityId(Uuid);

impl LocalityId {
    /// Mint a fresh, globally-unique locality tag.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocalityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "locality-{}", self.0)
    }
}

/// Unique identifier for an actor, independent of its address.
///
/// An actor keeps the same `ActorId` across its whole lifetime even
/// though [`Address`] is the thing messages actually target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(Uuid);

impl ActorId {
    /// Generate a new random `ActorId`.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct AddressInner {
    id: ActorId,
    locality: LocalityId,
    /// The actor id of the supervisor that minted this address. Metadata
    /// only; the supervisor itself is reached through the registry/tree,
    /// never dereferenced from here, so this never creates a cycle.
    owner: ActorId,
    name: Option<String>,
}

/// A mailbox identity, shared by reference (spec §3 "Address").
///
/// Equality and hashing are by raw identity (the wrapped [`ActorId`]), not
/// by structural content, matching spec §4.1: "Equality is identity.
/// Hashing is by raw identity." Cloning an `Address` is cheap (`Arc` clone)
/// and all clones refer to the same mailbox.
#[derive(Debug, Clone)]
pub struct Address(Arc<AddressInner>);

impl Address {
    /// `make_address(locality)` (spec §3 "Address" operations list): mint
    /// a fresh, anonymous address in `locality`. This is the one public
    /// minting entry point — the owning supervisor is whatever code holds
    /// the `LocalityId` and calls this, since a `LocalityId` is itself
    /// only ever handed out by a locality's own `DeliveryEngine`.
    pub fn make_address(locality: LocalityId) -> Self {
        Self::new(locality, ActorId::new(), None)
    }

    /// Mint a new address for `owner`'s locality, with an optional
    /// display name. Only reachable from inside the crate — used when a
    /// supervisor mints a named child address internally.
    pub(crate) fn new(locality: LocalityId, owner: ActorId, name: Option<String>) -> Self {
        Self(Arc::new(AddressInner {
            id: ActorId::new(),
            locality,
            owner,
            name,
        }))
    }

    /// The actor identity behind this address.
    pub fn actor_id(&self) -> ActorId {
        self.0.id
    }

    /// The locality this address's actor runs in.
    pub fn locality(&self) -> LocalityId {
        self.0.locality
    }

    /// The actor id of the supervisor that created this address.
    pub fn owner(&self) -> ActorId {
        self.0.owner
    }

    /// Human-readable name, if the actor was given one at creation.
    pub fn name(&self) -> Option<&str> {
        self.0.name.as_deref()
    }

    /// True if both addresses run handlers on the same serial execution
    /// context (spec §4.1 `same_locality`).
    pub fn same_locality(&self, other: &Address) -> bool {
        self.0.locality == other.0.locality
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}@{}", self.0.id),
            None => write!(f, "{}", self.0.id),
        }
    }
}

/// Monotonically increasing request identifier, scoped to a single
/// locality leader (spec §4.2, §4.9). Wraps a `u64` counter rather than a
/// `Uuid` because the request table needs ordered, skip-aware allocation
/// ("the counter skips values already present in the request table").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    /// Construct a request id with an explicit numeric value. Exposed for
    /// the request-table allocator; not meant for use outside it.
    pub(crate) fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw numeric value, useful for logging/monitoring.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// Monotonic counter backing [`RequestId`] allocation within one locality
/// leader, skipping ids still present in the request table (spec §4.9).
#[derive(Debug, Default)]
pub struct RequestIdAllocator {
    next: AtomicU64,
}

impl RequestIdAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Allocate the next id, re-drawing while `in_use` reports a
    /// collision (wrap-around is rare but the contract requires it be
    /// handled, not just assumed away).
    pub fn allocate(&self, in_use: impl Fn(RequestId) -> bool) -> RequestId {
        loop {
            let raw = self.next.fetch_add(1, Ordering::Relaxed);
            let id = RequestId::from_raw(raw);
            if !in_use(id) {
                return id;
            }
        }
    }
}

/// Stable identity for a [`crate::message::Handler`] binding, derived from
/// (message type, owner actor) per spec §3 "Handler". Uses `TypeId`
/// directly rather than a hashed constant, so two distinct message types
/// can never collide (spec §9 "Design Notes": "the type-tag is derived
/// statically from the message type").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId {
    message_type: TypeId,
    owner: ActorId,
}

impl HandlerId {
    /// Build a handler id from a message type's `TypeId` and the owning actor.
    pub fn new(message_type: TypeId, owner: ActorId) -> Self {
        Self { message_type, owner }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    pub fn message_type(&self) -> TypeId {
        self.message_type
    }
}
