//! Cooperative cancellation for replay runs.
//!
//! Each run owns a [`CancellationSource`]; its worker holds a
//! [`CancellationToken`] and waits on it between animation phases instead of
//! sleeping. Cancelling wakes the worker immediately, and the worker stops at
//! the next phase boundary without touching its board or surface again.
//!
//! The first cancellation wins: a run superseded by a new configuration keeps
//! [`CancelReason::Superseded`] even if shutdown follows.
//!
//! # Example
//!
//! ```
//! use hanoi_runtime::cancellation::{CancelReason, CancellationSource};
//! use web_time::Duration;
//!
//! let source = CancellationSource::new();
//! let token = source.token();
//!
//! let worker = std::thread::spawn(move || token.wait_timeout(Duration::from_secs(10)));
//! source.cancel(CancelReason::Superseded);
//! assert!(worker.join().unwrap());
//! ```

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};

use web_time::Duration;

/// Why a run was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// A newer configuration replaced the run.
    Superseded,
    /// The controller is shutting down.
    Shutdown,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Superseded => f.write_str("superseded"),
            Self::Shutdown => f.write_str("shutdown"),
        }
    }
}

struct Shared {
    reason: Mutex<Option<CancelReason>>,
    wake: Condvar,
}

impl Shared {
    fn reason(&self) -> Option<CancelReason> {
        *self.reason.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Control side of a run's cancellation.
///
/// Dropping the source does not cancel; call [`cancel`](Self::cancel).
pub struct CancellationSource {
    shared: Arc<Shared>,
}

/// Worker side: poll or wait for cancellation.
#[derive(Clone)]
pub struct CancellationToken {
    shared: Arc<Shared>,
}

impl CancellationSource {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                reason: Mutex::new(None),
                wake: Condvar::new(),
            }),
        }
    }

    pub fn token(&self) -> CancellationToken {
        CancellationToken {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Request cancellation and wake every waiting token.
    ///
    /// Returns `false` if the run was already cancelled.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let mut guard = self.shared.reason.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return false;
        }
        *guard = Some(reason);
        self.shared.wake.notify_all();
        true
    }

    pub fn reason(&self) -> Option<CancelReason> {
        self.shared.reason()
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }
}

impl Default for CancellationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationSource")
            .field("reason", &self.reason())
            .finish()
    }
}

impl CancellationToken {
    pub fn reason(&self) -> Option<CancelReason> {
        self.shared.reason()
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }

    /// Block until cancelled or until `duration` elapses.
    ///
    /// Returns `true` if cancelled.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let guard = self.shared.reason.lock().unwrap_or_else(|e| e.into_inner());
        let (guard, _) = self
            .shared
            .wake
            .wait_timeout_while(guard, duration, |reason| reason.is_none())
            .unwrap_or_else(|e| e.into_inner());
        guard.is_some()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("reason", &self.reason())
            .finish()
    }
}
