#![forbid(unsafe_code)]

//! Configuration-driven planning and replay.
//!
//! The [`Controller`] owns the planner, the scheduler, and at most one active
//! run. Applying a configuration:
//!
//! 1. cancels the active run ([`CancelReason::Superseded`]) and joins it,
//! 2. validates the configuration and builds the [`Scene`],
//! 3. creates a fresh surface and builds it,
//! 4. plans; an unsolvable board reports `0 of ∞` and stops there,
//! 5. spawns a new run.
//!
//! The planner cache survives across runs: results are a pure function of
//! the key.
//!
//! [`Controller::run_loop`] applies an initial configuration at once and then
//! debounces changes arriving on a channel.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};

use hanoi_core::{Board, BoardError, MoveCount, PlanError, Planner, Progress, Scene};
use web_time::{Duration, Instant};

use crate::cancellation::CancelReason;
use crate::clock::Clock;
use crate::config::{AnimatorConfig, ConfigError, HanoiConfig};
use crate::debounce::Debounce;
use crate::scheduler::{ReplayError, ReplayJob, RunHandle, RunReport, Scheduler, Timing};
use crate::surface::{PresentationSurface, SurfaceError};

/// A run could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("missing {element} ({role})")]
    MissingElement {
        element: &'static str,
        role: &'static str,
    },

    #[error("presentation surface could not be built: {0}")]
    Surface(#[from] SurfaceError),
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Startup(#[from] StartupError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Replay(#[from] ReplayError),
}

impl ControllerError {
    /// Errors the user can fix by changing the inputs.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Config(ConfigError::Validation(_))
                | Self::Startup(StartupError::MissingElement { .. })
                | Self::Plan(PlanError::MoveListTooLong { .. })
        )
    }
}

/// Outcome of [`Controller::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Started {
        moves: usize,
        total: MoveCount,
        truncated: bool,
    },
    Unsolvable {
        discs: u32,
        pegs: u32,
    },
}

/// Plans and replays one configuration at a time.
pub struct Controller<S, F> {
    planner: Planner,
    scheduler: Scheduler,
    debounce: Duration,
    make_surface: F,
    active: Option<RunHandle<S>>,
    runs_started: u64,
}

impl<S, F> std::fmt::Debug for Controller<S, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("planner", &self.planner.stats())
            .field("scheduler", &self.scheduler)
            .field("active", &self.active)
            .field("runs_started", &self.runs_started)
            .finish_non_exhaustive()
    }
}

impl<S, F> Controller<S, F>
where
    S: PresentationSurface + 'static,
    F: FnMut() -> S,
{
    pub fn new(animator: &AnimatorConfig, clock: Arc<dyn Clock>, make_surface: F) -> Self {
        Self {
            planner: Planner::new().with_three_peg_disc_limit(animator.disc_limit()),
            scheduler: Scheduler::new(clock, Timing::new(Duration::ZERO, animator.lift_delay())),
            debounce: animator.debounce(),
            make_surface,
            active: None,
            runs_started: 0,
        }
    }

    #[must_use]
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|run| !run.is_finished())
    }

    #[must_use]
    pub fn runs_started(&self) -> u64 {
        self.runs_started
    }

    /// Replace whatever is running with a run for `config`.
    pub fn apply(&mut self, config: &HanoiConfig) -> Result<RunStatus, ControllerError> {
        self.retire(CancelReason::Superseded)?;

        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors).into());
        }

        let pegs = config.pegs as usize;
        let scene = Scene::new(pegs, config.discs, config.per_move());
        // Validation guarantees a source peg; a single peg has no destination.
        if scene.destination().is_none() {
            return Err(StartupError::MissingElement {
                element: "destination peg",
                role: "receives the solved stack",
            }
            .into());
        }

        let mut surface = (self.make_surface)();
        surface.build(&scene).map_err(StartupError::Surface)?;

        let plan = self.planner.optimal_plan(config.discs, config.pegs)?;
        if !plan.is_solvable() {
            surface
                .progress(Progress::new(0, MoveCount::Unbounded))
                .map_err(StartupError::Surface)?;
            tracing::warn!(
                discs = config.discs,
                pegs = config.pegs,
                "configuration is unsolvable, nothing scheduled"
            );
            return Ok(RunStatus::Unsolvable {
                discs: config.discs,
                pegs: config.pegs,
            });
        }

        let solution = self.planner.solve(config.discs, config.pegs)?;
        let status = RunStatus::Started {
            moves: solution.moves.len(),
            total: solution.total,
            truncated: solution.is_truncated(),
        };
        if solution.is_truncated() {
            tracing::info!(
                discs = solution.discs,
                planned = solution.planned_discs,
                "three-peg board truncated"
            );
        }

        let board = Board::new(pegs, config.discs)?;
        let job = ReplayJob::from_solution(solution, board, scene, surface);
        let scheduler = self
            .scheduler
            .clone()
            .with_timing(Timing::new(config.per_move(), self.scheduler.timing().lift_delay));
        self.active = Some(scheduler.spawn(job)?);
        self.runs_started += 1;

        tracing::debug!(run = self.runs_started, ?status, "run started");
        Ok(status)
    }

    /// Block until the active run ends.
    pub fn wait(&mut self) -> Result<Option<RunReport<S>>, ControllerError> {
        match self.active.take() {
            Some(run) => Ok(Some(run.wait()?)),
            None => Ok(None),
        }
    }

    /// Cancel the active run and collect its report.
    pub fn shutdown(&mut self) -> Result<Option<RunReport<S>>, ControllerError> {
        self.retire(CancelReason::Shutdown)
    }

    fn retire(&mut self, reason: CancelReason) -> Result<Option<RunReport<S>>, ControllerError> {
        let Some(run) = self.active.take() else {
            return Ok(None);
        };
        run.cancel(reason);
        let report = run.wait()?;
        tracing::debug!(
            completed = report.completed,
            scheduled = report.scheduled,
            cancelled = ?report.cancelled,
            "run retired"
        );
        Ok(Some(report))
    }

    /// Apply `initial`, then every debounced change from `changes`.
    ///
    /// Failures of the initial configuration are fatal. Later invalid or
    /// unsolvable inputs are logged and the loop keeps waiting. Once the
    /// channel closes, a pending change is applied and the last run plays
    /// to the end.
    pub fn run_loop(
        &mut self,
        initial: Option<HanoiConfig>,
        changes: &Receiver<HanoiConfig>,
    ) -> Result<Option<RunReport<S>>, ControllerError> {
        if let Some(config) = initial {
            self.apply(&config)?;
        }

        let mut debounce = Debounce::new(self.debounce);
        loop {
            let now = Instant::now();
            if let Some(config) = debounce.poll(now) {
                self.apply_change(&config)?;
                continue;
            }

            let received = match debounce.deadline() {
                Some(deadline) => changes.recv_timeout(deadline.saturating_duration_since(now)),
                None => changes.recv().map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(config) => {
                    tracing::debug!(?config, "configuration changed");
                    debounce.push(config, Instant::now());
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if let Some(config) = debounce.flush() {
            self.apply_change(&config)?;
        }
        if debounce.coalesced() > 0 {
            tracing::debug!(coalesced = debounce.coalesced(), "changes coalesced");
        }
        self.wait()
    }

    fn apply_change(&mut self, config: &HanoiConfig) -> Result<(), ControllerError> {
        match self.apply(config) {
            Ok(status) => {
                tracing::info!(?status, "configuration applied");
                Ok(())
            }
            Err(error) if error.is_recoverable() => {
                tracing::warn!(%error, "configuration rejected");
                Ok(())
            }
            Err(error) => Err(error),
        }
    }
}

impl<S, F> Drop for Controller<S, F> {
    fn drop(&mut self) {
        if let Some(run) = self.active.take() {
            run.cancel(CancelReason::Shutdown);
        }
    }
}
