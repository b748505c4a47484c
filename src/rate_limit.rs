//! Request pacing for the Notion API
//!
//! A single limiter instance is shared by every remote call in the run, so
//! creates and lookups across all years and seasons execute strictly
//! one-at-a-time with a minimum inter-call spacing. Callers queue FIFO on
//! the internal mutex. The limiter is constructed explicitly and injected
//! into the client; tests substitute a zero-interval instance.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Default spacing between Notion API calls
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Rate limiter granting one permit per fixed interval
pub struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval,
        }
    }

    /// Wait until the configured interval has elapsed since the previous permit
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("Rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limiter_creation() {
        let limiter = RateLimiter::new(Duration::from_millis(500));
        assert_eq!(limiter.min_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_default_interval() {
        let limiter = RateLimiter::default();
        assert_eq!(limiter.min_interval, DEFAULT_INTERVAL);
    }

    #[tokio::test]
    async fn test_limiter_spacing() {
        let limiter = RateLimiter::new(Duration::from_millis(50));

        let start = Instant::now();

        // First permit - no wait
        limiter.wait().await;
        let first_elapsed = start.elapsed();

        // Second permit - should wait ~50ms
        limiter.wait().await;
        let second_elapsed = start.elapsed();

        // Third permit - should wait another ~50ms
        limiter.wait().await;
        let third_elapsed = start.elapsed();

        assert!(first_elapsed < Duration::from_millis(20));
        assert!(second_elapsed >= Duration::from_millis(45));
        assert!(third_elapsed >= Duration::from_millis(90));
    }

    #[tokio::test]
    async fn test_zero_interval_does_not_block() {
        let limiter = RateLimiter::new(Duration::ZERO);

        let start = Instant::now();
        for _ in 0..10 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
