//! The spawner: restart-rate tracking and policy enforcement behind a
//! single child slot (spec §4.8 "Spawner"). Grounded on
//! `rotor::spawner_t`'s fluent `restart_period`/`restart_policy`/
//! `max_attempts`/`escalate_failure` fields, paired with
//! [`super::backoff::RestartBackoff`] for the actual delay math.

use std::time::Duration;

use super::backoff::RestartBackoff;
use super::error::SpawnerError;
use super::policy::{ChildExit, RestartPolicy};

/// Decides whether and when a failed or exited child should be respawned.
///
/// A `Spawner` does not itself hold a child's address or spawn anything —
/// that stays with [`crate::plugin::builtin::child_manager::ChildManagerPlugin`].
/// It only answers "is another attempt owed, and after how long".
#[derive(Debug, Clone)]
pub struct Spawner {
    restart_policy: RestartPolicy,
    max_attempts: usize,
    escalate_failure: bool,
    backoff: RestartBackoff,
    attempts: usize,
}

impl Spawner {
    pub fn new(restart_policy: RestartPolicy, restart_period: Duration, max_attempts: usize, escalate_failure: bool) -> Self {
        Self {
            restart_policy,
            max_attempts,
            escalate_failure,
            backoff: RestartBackoff::new(max_attempts as u32, restart_period),
            attempts: 0,
        }
    }

    pub fn escalate_failure(&self) -> bool {
        self.escalate_failure
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Records a child exit and returns the delay before the next spawn
    /// attempt, or an error if no further attempt is owed.
    ///
    /// Matches spec §8 "Spawner with max_attempts=N and an always-failing
    /// factory makes exactly N attempts": the Nth call still succeeds and
    /// returns a delay, the (N+1)th returns [`SpawnerError::LimitExceeded`].
    /// `max_attempts == 0` means uncapped (spec §4.8 "Period guard":
    /// "max_attempts > 0 caps total attempts"; matches `child_info_t`'s
    /// default `max_attempts_ = 0` in
    /// `original_source/include/rotor/detail/child_info.h`).
    pub fn attempt(&mut self, exit: ChildExit) -> Result<Duration, SpawnerError> {
        if !self.restart_policy.allows(exit) {
            return Err(SpawnerError::RestartDenied { policy: policy_name(self.restart_policy) });
        }
        if self.max_attempts != 0 && self.attempts >= self.max_attempts {
            return Err(SpawnerError::LimitExceeded { max_attempts: self.max_attempts });
        }
        self.attempts += 1;
        self.backoff.record_restart();
        Ok(self.backoff.calculate_delay())
    }

    /// Clears attempt and backoff history, e.g. once a respawned child
    /// reaches `Running` and stays there past its own restart period.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.backoff.reset();
    }
}

fn policy_name(policy: RestartPolicy) -> &'static str {
    match policy {
        RestartPolicy::Never => "never",
        RestartPolicy::Always => "always",
        RestartPolicy::NormalOnly => "normal_only",
        RestartPolicy::FailOnly => "fail_only",
    }
}
