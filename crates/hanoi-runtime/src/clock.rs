#![forbid(unsafe_code)]

//! Suspension points for the replay worker.
//!
//! The scheduler never sleeps directly. It asks a [`Clock`] to pause, and the
//! clock reports whether the run was cancelled while paused.
//!
//! - [`SystemClock`] waits on the cancellation token for real.
//! - [`VirtualClock`] returns at once and only accumulates the time it was
//!   asked to spend, which keeps headless replays and tests deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use web_time::Duration;

use crate::cancellation::CancellationToken;

/// Source of timed suspension.
pub trait Clock: Send + Sync {
    /// Suspend for `duration` unless `token` is cancelled first.
    ///
    /// Returns `true` if the run was cancelled.
    fn pause(&self, duration: Duration, token: &CancellationToken) -> bool;
}

/// Wall-clock pauses that wake early on cancellation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn pause(&self, duration: Duration, token: &CancellationToken) -> bool {
        if duration.is_zero() {
            return token.is_cancelled();
        }
        token.wait_timeout(duration)
    }
}

/// Instant pauses with an accumulated virtual elapsed time.
///
/// Clones share their counters.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    elapsed_nanos: Arc<AtomicU64>,
    pauses: Arc<AtomicU64>,
}

impl VirtualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time spent in pauses that were not cancelled.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::Acquire))
    }

    /// Number of pauses requested, cancelled or not.
    #[must_use]
    pub fn pauses(&self) -> u64 {
        self.pauses.load(Ordering::Acquire)
    }
}

impl Clock for VirtualClock {
    fn pause(&self, duration: Duration, token: &CancellationToken) -> bool {
        self.pauses.fetch_add(1, Ordering::AcqRel);
        if token.is_cancelled() {
            return true;
        }
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::AcqRel);
        false
    }
}
