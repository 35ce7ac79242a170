use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::time::Duration;

/// Enforces a minimum spacing between order mutations so we stay under the
/// marketplace rate limit. One permit per period, no burst: the first call
/// passes immediately, every later call waits out the remainder of the
/// spacing window.
pub struct Pacer {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl Pacer {
    pub fn new(spacing: Duration) -> Self {
        // Quota rejects a zero period; treat that as effectively unpaced.
        let quota = Quota::with_period(spacing)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::new(u32::MAX).unwrap()));
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }

    pub async fn until_ready(&self) {
        self.limiter.until_ready().await;
    }
}
