//! Request pacing.
//!
//! The remote service rate-limits bursts; each stage spaces its calls with a fixed
//! minimum interval instead of adaptive backoff. Stages never sleep themselves: the
//! pacer is injected into the client so tests swap in [`Unpaced`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Gate awaited before each paced remote call.
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait until the next call is allowed to start.
    async fn pace(&self);
}

/// Enforces a minimum interval between successive call starts.
#[derive(Debug)]
pub struct IntervalPacer {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl IntervalPacer {
    /// Create a pacer with the given spacing.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    /// Shared pacer for `min_interval`; a zero interval yields [`Unpaced`].
    #[must_use]
    pub fn shared(min_interval: Duration) -> Arc<dyn Pacer> {
        if min_interval.is_zero() {
            Arc::new(Unpaced)
        } else {
            Arc::new(Self::new(min_interval))
        }
    }
}

#[async_trait]
impl Pacer for IntervalPacer {
    async fn pace(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::trace!(wait_ms = wait.as_millis(), "pacing next request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Pacer that never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

#[async_trait]
impl Pacer for Unpaced {
    async fn pace(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_is_immediate_and_later_calls_are_spaced() {
        let pacer = IntervalPacer::new(Duration::from_millis(60));
        let start = Instant::now();

        pacer.pace().await;
        let first = start.elapsed();
        pacer.pace().await;
        let second = start.elapsed();
        pacer.pace().await;
        let third = start.elapsed();

        assert!(first < Duration::from_millis(40));
        assert!(second >= Duration::from_millis(55));
        assert!(third >= Duration::from_millis(115));
    }

    #[tokio::test]
    async fn unpaced_never_waits() {
        let pacer = IntervalPacer::shared(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..50 {
            pacer.pace().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
