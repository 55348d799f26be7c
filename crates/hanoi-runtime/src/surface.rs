#![forbid(unsafe_code)]

//! Presentation surface contract.
//!
//! A surface consumes disc state and produces pixels (or text, or nothing).
//! The runtime creates a fresh surface for every run, calls
//! [`build`](PresentationSurface::build) once, then streams per-disc updates
//! and progress from the replay worker. A surface is never shared between
//! runs, so an abandoned run cannot draw on its successor's view.
//!
//! [`RecordingSurface`] keeps an in-memory event log for headless runs and
//! tests; the log handle can be cloned out before the surface moves to the
//! worker.

use std::sync::{Arc, Mutex};

use hanoi_core::{Anchor, DiscId, Progress, Scene};

/// Failures reported by a surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// A view element the surface cannot work without.
    #[error("missing {element} ({role})")]
    MissingElement {
        element: &'static str,
        role: &'static str,
    },

    #[error("surface I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Consumer of disc state.
pub trait PresentationSurface: Send {
    /// Create pegs and discs for a run.
    fn build(&mut self, scene: &Scene) -> Result<(), SurfaceError>;

    /// Raise a disc above every stack.
    fn disc_lifted(&mut self, disc: DiscId, elevation: usize) -> Result<(), SurfaceError>;

    /// Move a disc horizontally to a peg.
    fn disc_anchor(&mut self, disc: DiscId, anchor: &Anchor) -> Result<(), SurfaceError>;

    /// Lower a disc to its one-based stack position.
    fn disc_position(&mut self, disc: DiscId, position: usize) -> Result<(), SurfaceError>;

    /// Report the running move counter.
    fn progress(&mut self, progress: Progress) -> Result<(), SurfaceError>;
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Built { pegs: usize, discs: usize },
    Lifted { disc: DiscId, elevation: usize },
    Anchored { disc: DiscId, peg: usize },
    Positioned { disc: DiscId, position: usize },
    Progress(Progress),
}

/// Shared handle to a recording surface's events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SurfaceEvent>>>,
}

impl EventLog {
    fn push(&self, event: SurfaceEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }

    /// Snapshot of every event so far.
    #[must_use]
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Completed counters reported so far, in order.
    #[must_use]
    pub fn completed(&self) -> Vec<u64> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SurfaceEvent::Progress(p) => Some(p.completed),
                _ => None,
            })
            .collect()
    }

    /// The most recent progress report.
    #[must_use]
    pub fn last_progress(&self) -> Option<Progress> {
        self.events().into_iter().rev().find_map(|event| match event {
            SurfaceEvent::Progress(p) => Some(p),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: EventLog,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into an existing log.
    #[must_use]
    pub fn with_log(log: EventLog) -> Self {
        Self { log }
    }

    #[must_use]
    pub fn log(&self) -> EventLog {
        self.log.clone()
    }
}

impl PresentationSurface for RecordingSurface {
    fn build(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        self.log.push(SurfaceEvent::Built {
            pegs: scene.anchors.len(),
            discs: scene.discs.len(),
        });
        Ok(())
    }

    fn disc_lifted(&mut self, disc: DiscId, elevation: usize) -> Result<(), SurfaceError> {
        self.log.push(SurfaceEvent::Lifted { disc, elevation });
        Ok(())
    }

    fn disc_anchor(&mut self, disc: DiscId, anchor: &Anchor) -> Result<(), SurfaceError> {
        self.log.push(SurfaceEvent::Anchored {
            disc,
            peg: anchor.peg,
        });
        Ok(())
    }

    fn disc_position(&mut self, disc: DiscId, position: usize) -> Result<(), SurfaceError> {
        self.log.push(SurfaceEvent::Positioned { disc, position });
        Ok(())
    }

    fn progress(&mut self, progress: Progress) -> Result<(), SurfaceError> {
        self.log.push(SurfaceEvent::Progress(progress));
        Ok(())
    }
}
