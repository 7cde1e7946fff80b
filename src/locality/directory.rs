//! [`LocalityDirectory`]: process-wide lookup from [`LocalityId`] to the
//! [`LocalityHandle`] that can reach it, shared by every locality leader's
//! delivery engine (spec §4.4 step 3/4: "enqueue M to the destination
//! locality via its loop").

// Layer 2: Third-party crate imports
use dashmap::DashMap;

// Layer 3: Internal module imports
use super::handle::LocalityHandle;
use crate::util::LocalityId;
use std::sync::Arc;

/// Shared, lock-free directory of live localities. Grounded on the
/// teacher's `broker::registry::ActorRegistry` (DashMap-keyed resolution
/// table shared across actors via `Arc`).
#[derive(Debug, Clone, Default)]
pub struct LocalityDirectory {
    handles: Arc<DashMap<LocalityId, LocalityHandle>>,
}

impl LocalityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `handle` so other localities can forward to it.
    pub fn register(&self, handle: LocalityHandle) {
        self.handles.insert(handle.locality(), handle);
    }

    /// Stop routing to `locality` — called once its leader shuts down.
    pub fn deregister(&self, locality: LocalityId) {
        self.handles.remove(&locality);
    }

    pub fn resolve(&self, locality: LocalityId) -> Option<LocalityHandle> {
        self.handles.get(&locality).map(|entry| entry.clone())
    }
}
