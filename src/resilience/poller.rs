//! Bounded-retry detection polling.
//!
//! Wallet extensions inject their API object some time after page load,
//! in no fixed order and with no common "ready" event. The only portable
//! strategy is to check on an interval until the binding shows up or the
//! attempt budget runs out.
//!
//! # Cancellation
//! The poll holds no handles. Dropping the future stops it; nothing keeps
//! running in the background.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::DetectionConfig;
use crate::observability::metrics;

/// Diagnostics hook for poll progress. Never affects the result.
pub trait PollObserver: Send + Sync {
    /// Called after each failed check.
    fn on_miss(&self, label: &'static str, attempt: u32, max_attempts: u32);
    /// Called when the check succeeds.
    fn on_found(&self, label: &'static str, attempt: u32);
    /// Called once the budget is exhausted.
    fn on_exhausted(&self, label: &'static str, max_attempts: u32);
}

/// Observer that emits `tracing` events and metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl PollObserver for TracingObserver {
    fn on_miss(&self, label: &'static str, attempt: u32, max_attempts: u32) {
        metrics::record_detection_attempt(label);
        tracing::trace!(binding = label, attempt, max_attempts, "Binding not injected yet");
    }

    fn on_found(&self, label: &'static str, attempt: u32) {
        metrics::record_detection_attempt(label);
        tracing::debug!(binding = label, attempt, "Binding found");
    }

    fn on_exhausted(&self, label: &'static str, max_attempts: u32) {
        tracing::debug!(binding = label, max_attempts, "Binding not found, giving up");
    }
}

/// Checks a predicate on a fixed interval up to a bounded number of times.
#[derive(Clone)]
pub struct DetectionPoller {
    interval: Duration,
    max_attempts: u32,
    observer: Arc<dyn PollObserver>,
}

impl DetectionPoller {
    /// Create a poller. `max_attempts` is clamped to at least one check.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Poller used by `detect`.
    pub fn for_detection(config: &DetectionConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms), config.detect_attempts)
    }

    /// Poller used before `connect` gives up.
    pub fn for_connect(config: &DetectionConfig) -> Self {
        Self::new(Duration::from_millis(config.interval_ms), config.connect_attempts)
    }

    /// Replace the diagnostics observer.
    pub fn with_observer(mut self, observer: Arc<dyn PollObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Check until `present` returns true or the budget is spent.
    ///
    /// The first check runs immediately; each later one waits `interval`.
    pub async fn poll<F>(&self, label: &'static str, mut present: F) -> bool
    where
        F: FnMut() -> bool,
    {
        for attempt in 1..=self.max_attempts {
            if present() {
                self.observer.on_found(label, attempt);
                return true;
            }
            self.observer.on_miss(label, attempt, self.max_attempts);
            if attempt < self.max_attempts {
                sleep(self.interval).await;
            }
        }
        self.observer.on_exhausted(label, self.max_attempts);
        false
    }
}

impl std::fmt::Debug for DetectionPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionPoller")
            .field("interval", &self.interval)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl PollObserver for Recorder {
        fn on_miss(&self, label: &'static str, attempt: u32, max_attempts: u32) {
            self.events.lock().unwrap().push(format!("miss {} {}/{}", label, attempt, max_attempts));
        }

        fn on_found(&self, label: &'static str, attempt: u32) {
            self.events.lock().unwrap().push(format!("found {} {}", label, attempt));
        }

        fn on_exhausted(&self, label: &'static str, max_attempts: u32) {
            self.events.lock().unwrap().push(format!("exhausted {} {}", label, max_attempts));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_fourth_attempt() {
        let poller = DetectionPoller::new(Duration::from_millis(100), 15);
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let found = poller
            .poll("test", || calls.fetch_add(1, Ordering::SeqCst) + 1 >= 4)
            .await;

        assert!(found);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300) && elapsed < Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_budget() {
        let poller = DetectionPoller::new(Duration::from_millis(100), 15);
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let found = poller
            .poll("test", || {
                calls.fetch_add(1, Ordering::SeqCst);
                false
            })
            .await;

        assert!(!found);
        assert_eq!(calls.load(Ordering::SeqCst), 15);
        // No trailing sleep after the last check
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1400) && elapsed < Duration::from_millis(1500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_hit_does_not_sleep() {
        let poller = DetectionPoller::new(Duration::from_millis(100), 20);
        let start = Instant::now();
        assert!(poller.poll("test", || true).await);
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_progress() {
        let recorder = Arc::new(Recorder::default());
        let poller = DetectionPoller::new(Duration::from_millis(100), 3).with_observer(recorder.clone());

        assert!(!poller.poll("xbull", || false).await);

        let events = recorder.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec!["miss xbull 1/3", "miss xbull 2/3", "miss xbull 3/3", "exhausted xbull 3"]
        );
    }

    #[test]
    fn test_zero_attempts_clamped() {
        let poller = DetectionPoller::new(Duration::from_millis(100), 0);
        assert_eq!(poller.max_attempts(), 1);
    }

    #[test]
    fn test_config_constructors() {
        let config = DetectionConfig::default();
        assert_eq!(DetectionPoller::for_detection(&config).max_attempts(), 15);
        assert_eq!(DetectionPoller::for_connect(&config).max_attempts(), 20);
        assert_eq!(DetectionPoller::for_detection(&config).interval(), Duration::from_millis(100));
    }
}
