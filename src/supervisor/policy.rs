//! Policy enums for supervision and spawning (spec §6.3 configuration
//! surface). Grounded on `rotor::policy.h`'s `supervisor_policy_t` and
//! `restart_policy_t` — same variants, same names.

use serde::{Deserialize, Serialize};

/// How a supervisor reacts to a child failing during its own
/// initialization phase (spec §6.3 "Supervisor: ... policy").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupervisorPolicy {
    /// Shut the whole supervisor (and every other child) down.
    ShutdownSelf,
    /// Shut down only the failed child and continue initializing the rest.
    ShutdownFailed,
}

/// How a child exited, for [`super::spawner::Spawner`] to decide whether
/// a restart is owed (spec §4.8 "Spawner").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// Shut down cleanly (shutdown code `normal`).
    Normal,
    /// Shut down due to an error (any other shutdown code).
    Failed,
}

/// Which child exits trigger a respawn (spec §6.3 "Spawner:
/// restart_policy"). Grounded on `rotor::restart_policy_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Never respawn.
    Never,
    /// Respawn on every exit.
    Always,
    /// Respawn only on a clean exit.
    NormalOnly,
    /// Respawn only on a failed exit.
    FailOnly,
}

impl RestartPolicy {
    pub fn allows(&self, exit: ChildExit) -> bool {
        match self {
            RestartPolicy::Never => false,
            RestartPolicy::Always => true,
            RestartPolicy::NormalOnly => exit == ChildExit::Normal,
            RestartPolicy::FailOnly => exit == ChildExit::Failed,
        }
    }
}
