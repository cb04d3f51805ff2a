//! Global request pacing shared by every worker

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::time::Duration;

/// Spaces requests so that at most one starts per pacing period
///
/// One pacer is shared by all workers, so the budget is global: adding
/// workers overlaps slow responses but never raises the request rate.
#[derive(Debug)]
pub struct Pacer {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    period: Duration,
}

impl Pacer {
    /// Creates a pacer allowing one request per `period`
    ///
    /// A zero period disables pacing entirely.
    pub fn new(period: Duration) -> Self {
        let limiter = Quota::with_period(period).map(RateLimiter::direct);
        Self { limiter, period }
    }

    /// Creates a pacer from a delay in milliseconds
    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    /// Waits until the next request may start
    pub async fn wait(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }

    /// Returns true when requests are actually spaced
    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// The configured spacing between requests
    pub fn period(&self) -> Duration {
        self.period
    }
}
