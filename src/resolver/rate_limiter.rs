//! Minimum-interval pacing shared by every caller of one resolver.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Enforces a minimum spacing between consecutive permits. The last-tick
/// timestamp is held behind an async mutex, so concurrent callers are
/// serialized and each waits its turn.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_tick: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_tick: Mutex::new(None),
        }
    }

    pub fn from_millis(min_interval_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_interval_ms))
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until a call is allowed, then claim the slot
    pub async fn wait(&self) {
        let mut guard = self.last_tick.lock().await;
        if let Some(prev) = *guard {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        *guard = Some(Instant::now());
    }
}
