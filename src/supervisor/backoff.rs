//! Restart rate limiting and exponential backoff (spec §4.8 "Spawner").
//! Grounded on the teacher's `supervisor/backoff.rs` — same sliding
//! window plus capped exponential delay, reused here as the mechanism
//! behind [`super::spawner::Spawner`]'s `restart_period`/`max_attempts`.

use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Tracks restart history in a sliding time window and computes an
/// exponential backoff delay from it.
#[derive(Debug, Clone)]
pub struct RestartBackoff {
    max_restarts: u32,
    restart_window: Duration,
    restart_history: VecDeque<DateTime<Utc>>,
    base_delay: Duration,
    max_delay: Duration,
}

impl RestartBackoff {
    pub fn new(max_restarts: u32, restart_window: Duration) -> Self {
        Self::with_delays(max_restarts, restart_window, Duration::from_millis(100), Duration::from_secs(60))
    }

    pub fn with_delays(max_restarts: u32, restart_window: Duration, base_delay: Duration, max_delay: Duration) -> Self {
        Self { max_restarts, restart_window, restart_history: VecDeque::new(), base_delay, max_delay }
    }

    pub fn is_limit_exceeded(&mut self) -> bool {
        self.cleanup_expired_restarts();
        self.restart_history.len() >= self.max_restarts as usize
    }

    pub fn record_restart(&mut self) {
        self.restart_history.push_front(Utc::now());
    }

    /// `delay = base_delay * 2^(min(restart_count, 10))`, capped at `max_delay`.
    pub fn calculate_delay(&mut self) -> Duration {
        self.cleanup_expired_restarts();
        let capped_count = (self.restart_history.len() as u32).min(10);
        let multiplier = 2u64.pow(capped_count);
        let delay_ms = self.base_delay.as_millis() as u64 * multiplier;
        Duration::from_millis(delay_ms).min(self.max_delay)
    }

    pub fn restart_count(&mut self) -> u32 {
        self.cleanup_expired_restarts();
        self.restart_history.len() as u32
    }

    pub fn reset(&mut self) {
        self.restart_history.clear();
    }

    fn cleanup_expired_restarts(&mut self) {
        let now = Utc::now();
        let Ok(chrono_window) = chrono::Duration::from_std(self.restart_window) else { return };
        let window_start = now - chrono_window;
        while let Some(&oldest) = self.restart_history.back() {
            if oldest < window_start {
                self.restart_history.pop_back();
            } else {
                break;
            }
        }
    }
}

impl Default for RestartBackoff {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn exponential_backoff_doubles_per_restart() {
        let mut backoff = RestartBackoff::new(10, Duration::from_secs(60));
        assert_eq!(backoff.calculate_delay(), Duration::from_millis(100));
        backoff.record_restart();
        assert_eq!(backoff.calculate_delay(), Duration::from_millis(200));
        backoff.record_restart();
        assert_eq!(backoff.calculate_delay(), Duration::from_millis(400));
    }

    #[test]
    fn delay_is_capped_at_max_delay() {
        let mut backoff = RestartBackoff::with_delays(20, Duration::from_secs(300), Duration::from_millis(100), Duration::from_secs(5));
        for _ in 0..15 {
            backoff.record_restart();
        }
        assert_eq!(backoff.calculate_delay(), Duration::from_secs(5));
    }

    #[test]
    fn limit_exceeded_once_window_is_full() {
        let mut backoff = RestartBackoff::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            backoff.record_restart();
        }
        assert!(backoff.is_limit_exceeded());
    }

    #[test]
    fn restarts_expire_out_of_the_sliding_window() {
        let mut backoff = RestartBackoff::new(3, Duration::from_millis(100));
        backoff.record_restart();
        backoff.record_restart();
        thread::sleep(Duration::from_millis(150));
        assert_eq!(backoff.restart_count(), 0);
    }

    #[test]
    fn reset_clears_history() {
        let mut backoff = RestartBackoff::new(5, Duration::from_secs(60));
        backoff.record_restart();
        backoff.reset();
        assert_eq!(backoff.restart_count(), 0);
    }
}
