#![forbid(unsafe_code)]

//! Terminal shell for the Hanoi animator.
//!
//! Loads settings, applies command-line overrides, installs logging, and
//! drives a [`Controller`](hanoi_runtime::Controller) that renders into a
//! [`TerminalSurface`].

pub mod cli;
pub mod error;
pub mod logging;
pub mod terminal;

pub use cli::{Cli, run, run_from_env};
pub use error::{AppError, Result};
pub use terminal::TerminalSurface;
