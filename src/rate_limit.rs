//! Sliding-window throttle for token refreshes.
//!
//! The token endpoint tolerates only a handful of authentication calls per
//! minute, so refreshes are admitted through a rolling window of recent
//! request timestamps. A full window rejects immediately with the remaining
//! wait time rather than blocking the caller.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A sliding-window request counter.
///
/// Tracks the instants of recent admissions in a queue. Before each check,
/// entries older than the window are evicted from the front; if the queue is
/// still at capacity the admission is rejected with the time remaining until
/// the oldest entry ages out.
///
/// This is a pure data structure: callers pass in the current instant, which
/// keeps it deterministic under test.
#[derive(Debug)]
pub(crate) struct SlidingWindow {
    limit: usize,
    window: Duration,
    timestamps: VecDeque<Instant>,
}

impl SlidingWindow {
    /// Creates a window admitting at most `limit` requests per `window`.
    pub(crate) fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            timestamps: VecDeque::with_capacity(limit),
        }
    }

    /// Attempts to admit a request at `now`.
    ///
    /// On success the timestamp is recorded. On rejection, returns the
    /// duration until the oldest recorded request leaves the window.
    pub(crate) fn try_admit(&mut self, now: Instant) -> std::result::Result<(), Duration> {
        while let Some(&oldest) = self.timestamps.front() {
            if now.duration_since(oldest) > self.window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }

        if self.timestamps.len() >= self.limit {
            if let Some(&oldest) = self.timestamps.front() {
                let wait = self.window.saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    return Err(wait);
                }
                self.timestamps.pop_front();
            }
        }

        self.timestamps.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admits_up_to_limit() {
        let mut window = SlidingWindow::new(3, Duration::from_secs(60));
        let now = Instant::now();

        assert!(window.try_admit(now).is_ok());
        assert!(window.try_admit(now).is_ok());
        assert!(window.try_admit(now).is_ok());
        assert!(window.try_admit(now).is_err());
    }

    #[test]
    fn rejection_reports_remaining_wait() {
        let mut window = SlidingWindow::new(1, Duration::from_secs(60));
        let start = Instant::now();

        window.try_admit(start).unwrap();

        let wait = window
            .try_admit(start + Duration::from_secs(20))
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(40));
    }

    #[test]
    fn evicts_aged_entries_from_the_front() {
        let mut window = SlidingWindow::new(2, Duration::from_secs(60));
        let start = Instant::now();

        window.try_admit(start).unwrap();
        window.try_admit(start + Duration::from_secs(1)).unwrap();

        // Both entries have aged out 61 seconds later.
        assert!(window.try_admit(start + Duration::from_secs(62)).is_ok());
        assert!(window.try_admit(start + Duration::from_secs(62)).is_ok());
        assert!(window.try_admit(start + Duration::from_secs(62)).is_err());
    }

    #[test]
    fn entry_at_exact_window_boundary_is_replaced() {
        let mut window = SlidingWindow::new(1, Duration::from_secs(60));
        let start = Instant::now();

        window.try_admit(start).unwrap();

        // Exactly 60 seconds later the wait is zero, so the slot is reusable.
        assert!(window.try_admit(start + Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn window_refills_gradually() {
        let mut window = SlidingWindow::new(2, Duration::from_secs(60));
        let start = Instant::now();

        window.try_admit(start).unwrap();
        window.try_admit(start + Duration::from_secs(30)).unwrap();

        // First entry ages out at t=60+, second at t=90+.
        assert!(window.try_admit(start + Duration::from_secs(61)).is_ok());
        let wait = window
            .try_admit(start + Duration::from_secs(61))
            .unwrap_err();
        assert_eq!(wait, Duration::from_secs(29));
    }
}
