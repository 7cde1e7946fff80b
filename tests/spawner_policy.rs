//! Unit-level coverage of [`Spawner`]'s restart-decision table (spec
//! §4.8): which `RestartPolicy` allows which `ChildExit`, and how
//! `max_attempts` caps the count. `tests/supervisor_tree.rs` covers
//! Scenario 5 (spec §8) end to end, actually spawning and respawning
//! children through `SupervisorTree::create_actor`.

use std::time::Duration;

use kestrel_rt::supervisor::{ChildExit, RestartPolicy, Spawner};

#[test]
fn fail_only_respawns_every_failure_and_stops_on_the_clean_exit() {
    let mut spawner = Spawner::new(RestartPolicy::FailOnly, Duration::from_secs(60), 10, false);

    for attempt in 1..=3 {
        let delay = spawner.attempt(ChildExit::Failed).expect("a failure is always respawned under fail_only");
        assert!(delay >= Duration::ZERO);
        assert_eq!(spawner.attempts(), attempt);
    }

    let denied = spawner.attempt(ChildExit::Normal).unwrap_err();
    assert!(denied.is_retryable(), "denied-by-policy is not the same failure mode as hitting max_attempts");
    assert_eq!(spawner.attempts(), 3, "the denied clean exit must not count as a consumed attempt");
}

#[test]
fn always_with_max_attempts_two_makes_exactly_two_attempts_after_the_first_failure() {
    let mut spawner = Spawner::new(RestartPolicy::Always, Duration::from_secs(60), 2, false);

    assert!(spawner.attempt(ChildExit::Failed).is_ok());
    assert!(spawner.attempt(ChildExit::Failed).is_ok());
    assert_eq!(spawner.attempts(), 2);

    let error = spawner.attempt(ChildExit::Failed).unwrap_err();
    assert!(error.is_fatal(), "exhausting max_attempts is a fatal spawner error, not a policy denial");
    assert_eq!(spawner.attempts(), 2, "the rejected third attempt must not be counted");
}

#[test]
fn always_also_respawns_a_clean_exit_unlike_fail_only() {
    let mut spawner = Spawner::new(RestartPolicy::Always, Duration::from_secs(60), 5, false);
    assert!(spawner.attempt(ChildExit::Failed).is_ok());
    assert!(spawner.attempt(ChildExit::Failed).is_ok());
    assert!(spawner.attempt(ChildExit::Normal).is_ok());
    assert_eq!(spawner.attempts(), 3);
}
