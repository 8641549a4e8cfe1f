//! Rate limiter for VK API calls.
//!
//! User tokens are limited to three requests per second. A digest run issues
//! one `wall.get` per sign back to back, so calls are spaced client-side
//! instead of waiting for VK to answer with error 6.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

/// Spacing that keeps a user token under three requests per second.
pub const VK_MIN_INTERVAL: Duration = Duration::from_millis(340);

/// Rate limiter that enforces a minimum interval between requests.
#[derive(Debug)]
pub struct RateLimiter {
    /// Minimum duration between two requests.
    min_interval: Duration,

    /// When the previous request was let through.
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a new rate limiter with the specified minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Waits until a request is allowed, then records it.
    ///
    /// Returns the duration waited (0 if no wait was needed). The lock is held
    /// across the sleep so concurrent callers queue up in order.
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_request.lock().await;

        let wait = last.map_or(Duration::ZERO, |at| {
            self.min_interval.saturating_sub(at.elapsed())
        });

        if !wait.is_zero() {
            debug!("VK rate limiter: waiting {:?} before next request", wait);
            tokio::time::sleep(wait).await;
        }

        *last = Some(Instant::now());
        wait
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(VK_MIN_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        assert_eq!(limiter.acquire().await, Duration::ZERO);
    }

    #[tokio::test]
    async fn test_second_request_waits() {
        let limiter = RateLimiter::new(Duration::from_millis(100));
        limiter.acquire().await;

        let waited = limiter.acquire().await;
        assert!(waited > Duration::ZERO);
        assert!(waited <= Duration::from_millis(100));
    }
}
