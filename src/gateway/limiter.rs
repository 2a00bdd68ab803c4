//! Call-rate limiter for outbound inference calls.

use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Enforces a minimum spacing between consecutive invocations of one
/// operation by stalling the caller. Never rejects, only delays.
///
/// Each wrapped operation owns its own limiter instance; state is not shared
/// across operations.
pub struct RateLimiter {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Limiter allowing `rate` calls per minute. A zero rate is clamped to 1.
    #[must_use]
    pub fn per_minute(rate: u32) -> Self {
        Self::with_interval(Duration::from_secs_f64(60.0 / f64::from(rate.max(1))))
    }

    #[must_use]
    pub const fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Block until the spacing from the previous acquire has elapsed, then
    /// claim the slot.
    pub fn acquire(&self) {
        let mut last = self.last.lock();
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}
