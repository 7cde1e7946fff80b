//! `child_manager`: supervisor-only plugin for child-actor bookkeeping
//! (spec §4.7 "Supervisor & Child Manager"). Grounded on
//! `rotor::plugin::child_manager_plugin_t`
//! (`original_source/include/rotor/plugin/child_manager.h`,
//! `original_source/include/rotor/detail/child_info.h`).
//!
//! The `supervisor::tree::SupervisorTree` builder is the public API for
//! creating children; it drives this plugin's methods (including acting
//! on the addresses [`ChildManagerPlugin::on_child_initialized`] returns)
//! rather than duplicating child-record storage itself.

use std::collections::HashMap;

use crate::message::ExtendedError;
use crate::plugin::{InitReadiness, Plugin, PluginHost, Reactions};
use crate::util::Address;

/// Policy applied when a child fails to initialize (spec §4.7
/// "Supervisor policies on child init failure").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFailurePolicy {
    /// The supervisor shuts itself down with cause `child_init_failed`.
    ShutdownSelf,
    /// Only the failed child is shut down; the supervisor continues.
    ShutdownFailed,
}

impl Default for InitFailurePolicy {
    fn default() -> Self {
        Self::ShutdownSelf
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildState {
    Initializing,
    Operational,
    ShuttingDown,
}

/// Per-child configuration carried alongside its record (spec §4.7 "An
/// `autoshutdown_supervisor` flag... An `escalate_failure` flag").
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildFlags {
    pub autoshutdown_supervisor: bool,
    pub escalate_failure: bool,
}

struct ChildRecord {
    state: ChildState,
    flags: ChildFlags,
}

/// What the supervisor should do after `on_child_shutdown` runs.
#[derive(Debug)]
pub enum ShutdownOutcome {
    /// Nothing further — the supervisor keeps running.
    Continue,
    /// The supervisor should begin its own shutdown with this reason.
    ShutdownSupervisor(ExtendedError),
}

/// Holds one record per live child, gates supervisor INIT on
/// in-progress children, and decides supervisor-level consequences of
/// child init failure / shutdown (spec §4.7).
#[derive(Default)]
pub struct ChildManagerPlugin {
    children: HashMap<Address, ChildRecord>,
    init_failure_policy: InitFailurePolicy,
    supervisor_shutting_down: bool,
    /// Hold every child at `start_trigger` until all siblings initialize
    /// (spec §4.7 "Init synchronization"); wired from
    /// `SupervisorConfig::synchronize_start`.
    synchronize_start: bool,
}

impl ChildManagerPlugin {
    pub fn with_init_failure_policy(policy: InitFailurePolicy) -> Self {
        Self { init_failure_policy: policy, ..Self::default() }
    }

    pub fn new(policy: InitFailurePolicy, synchronize_start: bool) -> Self {
        Self { init_failure_policy: policy, synchronize_start, ..Self::default() }
    }

    /// Register a freshly created child (spec §4.7 "Creation": `finish()`
    /// ... registers a child record").
    pub fn register_child(&mut self, address: Address, flags: ChildFlags) {
        self.children.insert(address, ChildRecord { state: ChildState::Initializing, flags });
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn active_actors(&self) -> usize {
        self.children.values().filter(|record| record.state != ChildState::ShuttingDown).count()
    }

    pub fn has_initializing(&self) -> bool {
        self.children.values().any(|record| record.state == ChildState::Initializing)
    }

    /// The child at `address` reported INITIALIZED. Returns the
    /// addresses that should now receive `start_trigger`: just `address`
    /// itself under the default (unsynchronized) behavior, every settled
    /// sibling at once the moment the last one reports in under
    /// `synchronize_start`, or nothing while siblings are still pending
    /// (spec §4.7 "Init synchronization").
    pub fn on_child_initialized(&mut self, address: &Address) -> Vec<Address> {
        let Some(record) = self.children.get_mut(address) else { return Vec::new() };
        record.state = ChildState::Operational;

        if !self.synchronize_start {
            return vec![address.clone()];
        }

        if self.has_initializing() {
            Vec::new()
        } else {
            self.children.keys().cloned().collect()
        }
    }

    /// The child at `address` failed to initialize. Returns the policy
    /// outcome — the supervisor acts on it (spec §4.7 "Supervisor
    /// policies on child init failure").
    pub fn on_child_init_failed(&mut self, address: &Address, reason: ExtendedError) -> ShutdownOutcome {
        match self.init_failure_policy {
            InitFailurePolicy::ShutdownSelf => {
                let wrapped = ExtendedError::wrap(
                    "child failed to initialize",
                    crate::message::ErrorCode::SupervisorDefined,
                    reason,
                );
                ShutdownOutcome::ShutdownSupervisor(wrapped)
            }
            InitFailurePolicy::ShutdownFailed => {
                self.children.remove(address);
                ShutdownOutcome::Continue
            }
        }
    }

    pub fn mark_supervisor_shutting_down(&mut self) {
        self.supervisor_shutting_down = true;
    }

    /// The child at `address` has shut down, with `reason` being its
    /// shutdown cause (spec §4.7 "On child shutdown").
    pub fn on_child_shutdown(&mut self, address: &Address, reason: ExtendedError) -> ShutdownOutcome {
        let flags = self.children.remove(address).map(|record| record.flags).unwrap_or_default();

        if flags.autoshutdown_supervisor {
            return ShutdownOutcome::ShutdownSupervisor(reason);
        }

        if flags.escalate_failure && reason.code() != crate::message::ErrorCode::Success {
            let wrapped = ExtendedError::wrap(
                "child shutdown reason escalated",
                crate::message::ErrorCode::FailureEscalation,
                reason,
            );
            return ShutdownOutcome::ShutdownSupervisor(wrapped);
        }

        if self.supervisor_shutting_down {
            return ShutdownOutcome::ShutdownSupervisor(reason);
        }

        ShutdownOutcome::Continue
    }
}

impl Plugin for ChildManagerPlugin {
    fn name(&self) -> &'static str {
        "child_manager"
    }

    fn activate(&mut self, _host: &mut dyn PluginHost, reactions: &mut Reactions) {
        reactions.insert(Reactions::INIT);
    }

    fn poll_init(&mut self, _host: &mut dyn PluginHost, _reactions: &mut Reactions) -> InitReadiness {
        if self.has_initializing() {
            InitReadiness::NotReady
        } else {
            InitReadiness::Ready
        }
    }
}
