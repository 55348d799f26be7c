#![forbid(unsafe_code)]

//! Runtime: replay scheduling, cancellation, debouncing, and configuration.
//!
//! # Role in the workspace
//! `hanoi-runtime` turns a planned [`Solution`](hanoi_core::Solution) into a
//! timed sequence of surface updates. It owns threads and clocks; the
//! planner and board it drives live in `hanoi-core`.
//!
//! # Primary responsibilities
//! - **Scheduler**: one worker per run, four timed phases per move.
//! - **Cancellation**: a run stops at its next phase boundary once its
//!   token fires, and the first reason wins.
//! - **Controller**: applies configurations, supersedes stale runs, and
//!   debounces bursts of changes.
//! - **Config**: TOML/JSON settings with validation.
//!
//! # How it fits in the system
//! The `hanoi` binary loads [`Settings`], builds a [`Controller`] around a
//! surface factory, and feeds it configurations. Tests swap
//! [`SystemClock`] for [`VirtualClock`] and render into a
//! [`RecordingSurface`].

pub mod cancellation;
pub mod clock;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod scheduler;
pub mod surface;

pub use cancellation::{CancelReason, CancellationSource, CancellationToken};
pub use clock::{Clock, SystemClock, VirtualClock};
pub use config::{AnimatorConfig, ConfigError, HanoiConfig, Settings};
pub use controller::{Controller, ControllerError, RunStatus, StartupError};
pub use debounce::Debounce;
pub use scheduler::{ReplayError, ReplayJob, RunHandle, RunReport, Scheduler, Timing};
pub use surface::{EventLog, PresentationSurface, RecordingSurface, SurfaceError, SurfaceEvent};
