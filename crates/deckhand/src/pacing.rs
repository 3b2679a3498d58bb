//! Request pacing.
//!
//! AnkiConnect resets connections when requests arrive too quickly, so the
//! client waits before each operation. The wait is controlled by a
//! [`PacingPolicy`] held in the client configuration; tests use
//! [`PacingPolicy::Disabled`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use deckhand::{DeckClient, PacingPolicy};
//!
//! let client = DeckClient::builder()
//!     .pacing(PacingPolicy::MinInterval(Duration::from_millis(100)))
//!     .build();
//! ```

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep, sleep_until};

/// Default delay applied before each operation.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(250);

/// How long to wait before each client operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingPolicy {
    /// Never wait.
    Disabled,
    /// Sleep for the given duration before every operation, regardless of
    /// when the previous one ran.
    FixedDelay(Duration),
    /// Wait only as long as needed so consecutive operations start at
    /// least this far apart.
    MinInterval(Duration),
}

impl Default for PacingPolicy {
    fn default() -> Self {
        PacingPolicy::FixedDelay(DEFAULT_DELAY)
    }
}

/// Applies a [`PacingPolicy`].
#[derive(Debug)]
pub struct Pacer {
    policy: PacingPolicy,
    last_start: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer for the given policy.
    pub fn new(policy: PacingPolicy) -> Self {
        Self {
            policy,
            last_start: Mutex::new(None),
        }
    }

    /// Wait until the next operation may start.
    pub async fn pace(&self) {
        match self.policy {
            PacingPolicy::Disabled => {}
            PacingPolicy::FixedDelay(delay) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
            }
            PacingPolicy::MinInterval(interval) => {
                let mut last_start = self.last_start.lock().await;
                if let Some(previous) = *last_start {
                    sleep_until(previous + interval).await;
                }
                *last_start = Some(Instant::now());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_disabled_does_not_wait() {
        let pacer = Pacer::new(PacingPolicy::Disabled);
        let start = Instant::now();
        pacer.pace().await;
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits_every_time() {
        let pacer = Pacer::new(PacingPolicy::FixedDelay(Duration::from_millis(250)));
        let start = Instant::now();
        pacer.pace().await;
        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_first_call_is_immediate() {
        let pacer = Pacer::new(PacingPolicy::MinInterval(Duration::from_millis(100)));
        let start = Instant::now();
        pacer.pace().await;
        assert_eq!(start.elapsed(), Duration::ZERO);

        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_skips_wait_when_idle_long_enough() {
        let pacer = Pacer::new(PacingPolicy::MinInterval(Duration::from_millis(100)));
        pacer.pace().await;
        tokio::time::advance(Duration::from_millis(150)).await;

        let before = Instant::now();
        pacer.pace().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(PacingPolicy::default(), PacingPolicy::FixedDelay(DEFAULT_DELAY));
    }
}
