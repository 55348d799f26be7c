#![forbid(unsafe_code)]

//! Latest-wins debouncing of configuration changes.
//!
//! Editing a form produces a burst of change notifications. Re-planning on
//! each of them would restart the animation over and over, so
//! [`Debounce`] keeps only the newest value and releases it once no new
//! value has arrived for the quiet period.
//!
//! The struct holds no timer of its own: callers pass `now` into
//! [`push`](Debounce::push) and [`poll`](Debounce::poll), and use
//! [`deadline`](Debounce::deadline) to decide how long to block.
//!
//! # Usage
//!
//! ```
//! use hanoi_runtime::debounce::Debounce;
//! use web_time::{Duration, Instant};
//!
//! let mut debounce = Debounce::new(Duration::from_secs(1));
//! let t0 = Instant::now();
//!
//! debounce.push(3, t0);
//! debounce.push(4, t0 + Duration::from_millis(400));
//! assert_eq!(debounce.poll(t0 + Duration::from_millis(900)), None);
//! assert_eq!(debounce.poll(t0 + Duration::from_millis(1400)), Some(4));
//! ```

use web_time::{Duration, Instant};

/// Reference quiet period between the last change and a re-plan.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(1);

/// Coalesces rapid values into the latest one.
///
/// Not thread-safe; drive it from the controller thread.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
    /// Values replaced before they were released.
    coalesced: u64,
}

impl<T> Debounce<T> {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            coalesced: 0,
        }
    }

    #[must_use]
    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record a new value, replacing any pending one and restarting the
    /// quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        if self.pending.is_some() {
            self.coalesced += 1;
        }
        self.pending = Some((value, now));
    }

    /// When the pending value becomes ready.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.quiet)
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Take the pending value regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Drop the pending value without releasing it.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debounce<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn new_debounce_has_nothing_pending() {
        let mut debounce: Debounce<u32> = Debounce::default();
        assert!(!debounce.has_pending());
        assert_eq!(debounce.deadline(), None);
        assert_eq!(debounce.poll(Instant::now()), None);
        assert_eq!(debounce.quiet_period(), DEFAULT_QUIET_PERIOD);
    }

    #[test]
    fn value_released_after_quiet_period() {
        let mut debounce = Debounce::new(100 * MS);
        let t0 = Instant::now();
        debounce.push("a", t0);
        assert_eq!(debounce.poll(t0 + 99 * MS), None);
        assert_eq!(debounce.poll(t0 + 100 * MS), Some("a"));
        assert!(!debounce.has_pending());
    }

    #[test]
    fn burst_coalesces_to_latest() {
        let mut debounce = Debounce::new(100 * MS);
        let t0 = Instant::now();
        for i in 0..10u32 {
            debounce.push(i, t0 + i * 50 * MS);
        }
        // Each push restarts the quiet period.
        assert_eq!(debounce.poll(t0 + 500 * MS), None);
        assert_eq!(debounce.deadline(), Some(t0 + 550 * MS));
        assert_eq!(debounce.poll(t0 + 550 * MS), Some(9));
        assert_eq!(debounce.coalesced(), 9);
    }

    #[test]
    fn released_value_is_not_released_twice() {
        let mut debounce = Debounce::new(10 * MS);
        let t0 = Instant::now();
        debounce.push(1, t0);
        assert_eq!(debounce.poll(t0 + 20 * MS), Some(1));
        assert_eq!(debounce.poll(t0 + 40 * MS), None);
    }

    #[test]
    fn flush_ignores_the_quiet_period() {
        let mut debounce = Debounce::new(Duration::from_secs(60));
        let t0 = Instant::now();
        debounce.push(7, t0);
        assert_eq!(debounce.flush(), Some(7));
        assert_eq!(debounce.flush(), None);
    }

    #[test]
    fn clear_discards_pending() {
        let mut debounce = Debounce::new(10 * MS);
        let t0 = Instant::now();
        debounce.push(1, t0);
        debounce.clear();
        assert_eq!(debounce.poll(t0 + Duration::from_secs(1)), None);
    }
}
