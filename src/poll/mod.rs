//! Background polling loop
//!
//! One thread fetches from the reading source on a cadence and publishes the
//! result into a shared [`PollState`]. The presentation surface never gets
//! called into directly: the loop sends a [`RefreshEvent`] onto a channel and
//! the surface re-reads the state on its own execution context.

use crate::core::PollState;
use crate::source::ReadingSource;
use chrono::Utc;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Granularity at which the sleep between fetches checks the stop flag.
/// Bounds shutdown latency to about one second regardless of the interval.
const TICK: Duration = Duration::from_secs(1);

/// Request that the presentation surface re-read the poll state.
///
/// Carries no payload: the surface takes a fresh snapshot via
/// [`Poller::state`], so a slow surface coalesces refreshes naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshEvent;

struct Shared {
    state: Mutex<PollState>,
    stop: AtomicBool,
    running: AtomicBool,
}

/// Handle to the background poll loop
pub struct Poller {
    shared: Arc<Shared>,
}

impl Poller {
    /// Spawn the poll thread and start fetching immediately.
    ///
    /// Each cycle fetches once, stores the sample (a failed or empty fetch
    /// leaves the previous state untouched), emits one refresh event, and
    /// then sleeps `interval` in one-second slices so `stop()` takes effect
    /// within a slice rather than after a full interval.
    pub fn start(
        mut source: Box<dyn ReadingSource + Send>,
        interval: Duration,
        events: Sender<RefreshEvent>,
    ) -> Self {
        let shared = Arc::new(Shared {
            state: Mutex::new(PollState::default()),
            stop: AtomicBool::new(false),
            running: AtomicBool::new(true),
        });

        let loop_shared = Arc::clone(&shared);
        thread::spawn(move || {
            log::info!("Polling {} every {}s", source.name(), interval.as_secs());

            while !loop_shared.stop.load(Ordering::SeqCst) {
                match source.fetch_current() {
                    Ok(Some(sample)) => {
                        log::debug!(
                            "Stored reading: {} mg/dL ({})",
                            sample.value_mg_dl,
                            sample.trend.description()
                        );
                        let mut state = loop_shared.state.lock().unwrap();
                        state.last_sample = Some(sample);
                        state.last_update = Some(Utc::now());
                    }
                    Ok(None) => {
                        log::debug!("No recent glucose reading available");
                    }
                    Err(e) => {
                        log::warn!("Fetch failed, keeping previous reading: {}", e);
                    }
                }

                // Refresh after every fetch, successful or not
                if events.send(RefreshEvent).is_err() {
                    log::info!("Refresh channel closed, stopping poll loop");
                    break;
                }

                let mut slept = Duration::ZERO;
                while slept < interval && !loop_shared.stop.load(Ordering::SeqCst) {
                    let step = TICK.min(interval - slept);
                    thread::sleep(step);
                    slept += step;
                }
            }

            loop_shared.running.store(false, Ordering::SeqCst);
            log::info!("Poll loop stopped");
        });

        Self { shared }
    }

    /// Consistent snapshot of the poll state
    pub fn state(&self) -> PollState {
        self.shared.state.lock().unwrap().clone()
    }

    /// Whether the loop thread is still running
    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Signal the loop to exit.
    ///
    /// Idempotent and non-blocking: the fetch in flight is not interrupted
    /// (the source owns its own timeout), so this does not join the thread.
    /// The loop observes the flag within one tick.
    pub fn stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Error, GlucoseSample, Result, TrendCode};
    use crate::source::MockSource;
    use std::time::Instant;

    /// Source whose fetches always fail with a transport-style error
    struct FailingSource;

    impl ReadingSource for FailingSource {
        fn fetch_current(&mut self) -> Result<Option<GlucoseSample>> {
            Err(Error::Source("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "Failing (test)"
        }
    }

    fn wait_until_stopped(poller: &Poller, deadline: Duration) -> bool {
        let start = Instant::now();
        while poller.is_running() {
            if start.elapsed() > deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(20));
        }
        true
    }

    #[test]
    fn test_stop_bounds_shutdown_to_one_tick() {
        let source = MockSource::with_default_scenarios();
        let fetches = source.fetch_counter();
        let (tx, _rx) = crossbeam_channel::unbounded();

        let poller = Poller::start(Box::new(source), Duration::from_secs(60), tx);
        thread::sleep(Duration::from_millis(50));
        poller.stop();
        poller.stop(); // idempotent

        assert!(wait_until_stopped(&poller, Duration::from_secs(3)));
        // At most one extra fetch after stop was signaled
        assert!(fetches.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_successful_fetch_updates_state_as_a_pair() {
        let source = MockSource::with_script(vec![(120, TrendCode::Flat)]);
        let (tx, rx) = crossbeam_channel::unbounded();

        let poller = Poller::start(Box::new(source), Duration::from_secs(60), tx);
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        let state = poller.state();
        let sample = state.last_sample.expect("sample stored");
        assert_eq!(sample.value_mg_dl, 120);
        assert!(state.last_update.is_some());

        poller.stop();
        assert!(wait_until_stopped(&poller, Duration::from_secs(3)));
    }

    #[test]
    fn test_failed_fetch_keeps_state_but_still_refreshes() {
        let (tx, rx) = crossbeam_channel::unbounded();

        let poller = Poller::start(Box::new(FailingSource), Duration::from_secs(60), tx);
        let event = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(event, RefreshEvent);

        let state = poller.state();
        assert!(state.last_sample.is_none());
        assert!(state.last_update.is_none());

        poller.stop();
        assert!(wait_until_stopped(&poller, Duration::from_secs(3)));
    }

    #[test]
    fn test_loop_exits_when_surface_goes_away() {
        let source = MockSource::with_script(vec![(100, TrendCode::Flat)]);
        let (tx, rx) = crossbeam_channel::unbounded();

        let poller = Poller::start(Box::new(source), Duration::from_millis(100), tx);
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        drop(rx);

        assert!(wait_until_stopped(&poller, Duration::from_secs(3)));
    }
}
