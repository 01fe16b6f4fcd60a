//! Exponential backoff with jitter.
//!
//! The delay before attempt `i + 1` is `base_delay * 2^i` plus a random
//! jitter drawn uniformly from `[0, jitter)`. With the defaults (1000 ms base,
//! 1000 ms jitter) the schedule is ~1-2 s, ~2-3 s, ~4-5 s, ~8-9 s, ~16-17 s.

use rand::Rng;
use std::time::Duration;

use crate::config::RetryConfig;

/// Computes backoff delays between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    base_delay: Duration,
    jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl BackoffPolicy {
    /// Creates a policy with the given base delay and jitter range.
    pub fn new(base_delay: Duration, jitter: Duration) -> Self {
        Self { base_delay, jitter }
    }

    /// Creates a policy from a retry configuration.
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.base_delay, config.jitter)
    }

    /// Exponential part of the delay that follows the failed attempt `attempt` (0-based).
    ///
    /// Saturates at `Duration::MAX` instead of overflowing.
    pub fn base_delay_for(&self, attempt: u32) -> Duration {
        2u32.checked_pow(attempt)
            .and_then(|factor| self.base_delay.checked_mul(factor))
            .unwrap_or(Duration::MAX)
    }

    /// Delay after attempt `attempt` with an explicit jitter value in milliseconds.
    ///
    /// `jitter_ms` is clamped below the configured jitter range.
    pub fn delay_with_jitter(&self, attempt: u32, jitter_ms: u64) -> Duration {
        let range = self.jitter_range_ms();
        let jitter_ms = if range == 0 { 0 } else { jitter_ms.min(range - 1) };
        self.base_delay_for(attempt)
            .saturating_add(Duration::from_millis(jitter_ms))
    }

    /// Delay after attempt `attempt` with random jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let range = self.jitter_range_ms();
        let jitter_ms = if range == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..range)
        };
        self.delay_with_jitter(attempt, jitter_ms)
    }

    fn jitter_range_ms(&self) -> u64 {
        u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_bounds() {
        let policy = BackoffPolicy::default();

        for attempt in 0..5u32 {
            let lower = Duration::from_millis(1000 * 2u64.pow(attempt));
            let upper = lower + Duration::from_millis(1000);

            for _ in 0..200 {
                let delay = policy.delay_for(attempt);
                assert!(delay >= lower, "attempt {attempt}: {delay:?} < {lower:?}");
                assert!(delay < upper, "attempt {attempt}: {delay:?} >= {upper:?}");
            }
        }
    }

    #[test]
    fn test_delay_with_explicit_jitter() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.delay_with_jitter(0, 0), Duration::from_millis(1000));
        assert_eq!(policy.delay_with_jitter(2, 250), Duration::from_millis(4250));
        // Clamped to the exclusive upper bound of the jitter range.
        assert_eq!(policy.delay_with_jitter(1, 5000), Duration::from_millis(2999));
    }

    #[test]
    fn test_zero_jitter_is_deterministic() {
        let policy = BackoffPolicy::new(Duration::from_millis(10), Duration::ZERO);
        assert_eq!(policy.delay_for(0), Duration::from_millis(10));
        assert_eq!(policy.delay_for(3), Duration::from_millis(80));
    }

    #[test]
    fn test_base_delay_saturates() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.base_delay_for(40), Duration::MAX);
        assert_eq!(policy.delay_for(64), Duration::MAX);
    }

    #[test]
    fn test_from_config() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(50),
            jitter: Duration::from_millis(5),
        };
        let policy = BackoffPolicy::from_config(&config);
        assert_eq!(policy.base_delay_for(1), Duration::from_millis(100));
    }
}
