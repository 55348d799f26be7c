#![forbid(unsafe_code)]

//! Sequential replay of a move list.
//!
//! A run is a single worker that owns its [`Board`] and its surface and
//! walks the move list strictly in order. Each move is four phases:
//!
//! ```text
//! transfer ─ lift_delay ─► lifted ─ ⅓ ─► anchored ─ ⅓ ─► positioned ─ ⅓ ─► progress
//! ```
//!
//! The transfer is structural and instantaneous; the rest are surface
//! updates separated by pauses on the run's [`Clock`]. The next move starts
//! only after the previous one reported progress, so no two moves ever
//! interleave.
//!
//! # Cancellation
//!
//! The worker checks its [`CancellationToken`] at every phase boundary and
//! pauses on it, so cancelling wakes the worker at once. A cancelled run
//! returns its report with the reason and stops touching its surface.
//!
//! # Failure Modes
//!
//! - A move that pops an empty peg or breaks the stacking order means the
//!   move list is corrupt: the run aborts with
//!   [`ReplayError::CorruptMoveList`] and logs at error level.
//! - A surface error aborts the run with [`ReplayError::Surface`].

use std::sync::Arc;
use std::thread;

use hanoi_core::{Board, BoardError, Move, MoveCount, Progress, Scene, Solution};
use web_time::Duration;

use crate::cancellation::{CancelReason, CancellationSource, CancellationToken};
use crate::clock::Clock;
use crate::surface::{PresentationSurface, SurfaceError};

/// Per-move timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Time from lift to progress report.
    pub per_move: Duration,
    /// Pause between the structural transfer and the lift.
    pub lift_delay: Duration,
}

impl Timing {
    #[must_use]
    pub const fn new(per_move: Duration, lift_delay: Duration) -> Self {
        Self {
            per_move,
            lift_delay,
        }
    }

    /// Length of each of the three visible phases.
    #[must_use]
    pub fn phase(&self) -> Duration {
        self.per_move / 3
    }
}

/// Errors that end a run early.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("corrupt move list at move {index}: {source}")]
    CorruptMoveList {
        index: usize,
        #[source]
        source: BoardError,
    },

    #[error("scene has no anchor for peg {peg}")]
    MissingAnchor { peg: usize },

    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("failed to spawn replay worker: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("replay worker panicked")]
    WorkerPanicked,
}

/// Everything one run consumes.
pub struct ReplayJob<S> {
    pub moves: Vec<Move>,
    pub board: Board,
    pub scene: Scene,
    pub surface: S,
    /// Total shown next to the completed counter.
    pub total: MoveCount,
}

impl<S> ReplayJob<S> {
    /// Job for a planned solution.
    pub fn from_solution(solution: Solution, board: Board, scene: Scene, surface: S) -> Self {
        Self {
            moves: solution.moves,
            board,
            scene,
            surface,
            total: solution.total,
        }
    }
}

/// What a run hands back when it ends.
#[derive(Debug)]
pub struct RunReport<S> {
    pub surface: S,
    pub board: Board,
    /// Moves that reached the progress phase.
    pub completed: u64,
    pub scheduled: usize,
    /// `Some` if the run stopped before the end of its list.
    pub cancelled: Option<CancelReason>,
}

impl<S> RunReport<S> {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_none() && self.completed == self.scheduled as u64
    }
}

/// Replays move lists on a [`Clock`].
#[derive(Clone)]
pub struct Scheduler {
    clock: Arc<dyn Clock>,
    timing: Timing,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

impl Scheduler {
    pub fn new(clock: Arc<dyn Clock>, timing: Timing) -> Self {
        Self { clock, timing }
    }

    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Same clock, different timing (builder pattern).
    #[must_use]
    pub fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Replay a job on the current thread until it ends or is cancelled.
    pub fn replay<S: PresentationSurface>(
        &self,
        mut job: ReplayJob<S>,
        token: &CancellationToken,
    ) -> Result<RunReport<S>, ReplayError> {
        let scheduled = job.moves.len();
        tracing::info!(
            moves = scheduled,
            pegs = job.board.peg_count(),
            discs = job.board.disc_count(),
            per_move_ms = self.timing.per_move.as_millis() as u64,
            "replay started"
        );

        let mut completed = 0u64;
        let cancelled = self.replay_moves(&mut job, token, &mut completed)?;

        match cancelled {
            Some(reason) => {
                tracing::info!(completed, scheduled, %reason, "replay cancelled");
            }
            None => tracing::info!(completed, "replay finished"),
        }

        Ok(RunReport {
            surface: job.surface,
            board: job.board,
            completed,
            scheduled,
            cancelled,
        })
    }

    /// Replay a job on a dedicated worker thread.
    pub fn spawn<S>(&self, job: ReplayJob<S>) -> Result<RunHandle<S>, ReplayError>
    where
        S: PresentationSurface + 'static,
    {
        let source = CancellationSource::new();
        let token = source.token();
        let scheduler = self.clone();
        let scheduled = job.moves.len();

        let thread = thread::Builder::new()
            .name("hanoi-replay".into())
            .spawn(move || scheduler.replay(job, &token))
            .map_err(ReplayError::Spawn)?;

        Ok(RunHandle {
            source,
            thread: Some(thread),
            scheduled,
        })
    }

    fn replay_moves<S: PresentationSurface>(
        &self,
        job: &mut ReplayJob<S>,
        token: &CancellationToken,
        completed: &mut u64,
    ) -> Result<Option<CancelReason>, ReplayError> {
        let phase = self.timing.phase();

        for (index, mv) in job.moves.iter().enumerate() {
            if let Some(reason) = token.reason() {
                return Ok(Some(reason));
            }

            let transfer = job.board.apply(*mv).map_err(|source| {
                tracing::error!(index, %mv, error = %source, "move list corrupt");
                ReplayError::CorruptMoveList { index, source }
            })?;
            tracing::trace!(index, %mv, disc = transfer.disc.rank(), "transfer");

            if let Some(reason) = self.pause(self.timing.lift_delay, token) {
                return Ok(Some(reason));
            }
            job.surface
                .disc_lifted(transfer.disc, job.scene.lifted_elevation)?;

            if let Some(reason) = self.pause(phase, token) {
                return Ok(Some(reason));
            }
            let anchor = job
                .scene
                .anchor(transfer.to)
                .ok_or(ReplayError::MissingAnchor { peg: transfer.to })?;
            job.surface.disc_anchor(transfer.disc, anchor)?;

            if let Some(reason) = self.pause(phase, token) {
                return Ok(Some(reason));
            }
            job.surface
                .disc_position(transfer.disc, transfer.position)?;

            if let Some(reason) = self.pause(phase, token) {
                return Ok(Some(reason));
            }
            *completed += 1;
            job.surface.progress(Progress::new(*completed, job.total))?;
        }

        Ok(None)
    }

    fn pause(&self, duration: Duration, token: &CancellationToken) -> Option<CancelReason> {
        if self.clock.pause(duration, token) {
            // A pause only reports cancellation after the reason is set.
            token.reason()
        } else {
            None
        }
    }
}

/// A run in progress; [`wait`](Self::wait) is its completion signal.
///
/// Dropping the handle cancels the run with [`CancelReason::Shutdown`]
/// without joining the worker.
pub struct RunHandle<S> {
    source: CancellationSource,
    thread: Option<thread::JoinHandle<Result<RunReport<S>, ReplayError>>>,
    scheduled: usize,
}

impl<S> RunHandle<S> {
    /// Ask the worker to stop at its next phase boundary.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        self.source.cancel(reason)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Block until the worker ends and take its report.
    pub fn wait(mut self) -> Result<RunReport<S>, ReplayError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| ReplayError::WorkerPanicked)?,
            None => Err(ReplayError::WorkerPanicked),
        }
    }
}

impl<S> Drop for RunHandle<S> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            self.source.cancel(CancelReason::Shutdown);
        }
    }
}

impl<S> std::fmt::Debug for RunHandle<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunHandle")
            .field("scheduled", &self.scheduled)
            .field("cancel", &self.source.reason())
            .field("finished", &self.is_finished())
            .finish()
    }
}
