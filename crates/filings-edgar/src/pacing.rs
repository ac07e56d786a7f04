//! Request pacing for EDGAR endpoints.
//!
//! SEC asks automated clients to stay under 10 requests per second. The
//! client calls [`Pacer::pace`] before every request.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Default spacing between consecutive requests.
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(200);

/// Waits as needed before each outbound request.
#[async_trait]
pub trait Pacer: Send + Sync + Debug {
    /// Returns once the next request may be sent.
    async fn pace(&self);
}

/// Keeps at least a fixed interval between consecutive requests.
#[derive(Debug)]
pub struct FixedIntervalPacer {
    interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl FixedIntervalPacer {
    /// Creates a pacer with the given minimum interval.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Mutex::new(None),
        }
    }

    /// Minimum interval between requests.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for FixedIntervalPacer {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL)
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn pace(&self) {
        // Held across the sleep so concurrent callers queue up
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Pacer that never waits. Intended for tests and local mirrors.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

#[async_trait]
impl Pacer for NoPacing {
    async fn pace(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_is_not_delayed() {
        let pacer = FixedIntervalPacer::new(Duration::from_secs(5));
        let start = Instant::now();
        pacer.pace().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let pacer = FixedIntervalPacer::new(Duration::from_millis(40));
        let start = Instant::now();
        pacer.pace().await;
        pacer.pace().await;
        pacer.pace().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_no_pacing() {
        let start = Instant::now();
        for _ in 0..100 {
            NoPacing.pace().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_default_interval() {
        assert_eq!(
            FixedIntervalPacer::default().interval(),
            DEFAULT_REQUEST_INTERVAL
        );
    }
}
