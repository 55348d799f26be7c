#![forbid(unsafe_code)]

//! Core: move planning, board model, and scene geometry for multi-peg Hanoi.
//!
//! # Role in the workspace
//! `hanoi-core` is the pure layer. It owns the Frame–Stewart planner and its
//! memo cache, the arena-backed board that replays moves transactionally,
//! and the scene description handed to presentation surfaces.
//!
//! # Primary responsibilities
//! - **Planner**: split-point search ([`Planner::optimal_plan`]) and move
//!   generation ([`Planner::generate_moves`]).
//! - **Board**: pegs own disc ids, every disc records its owning peg.
//! - **Scene**: peg anchors, disc styles, and animation constants.
//! - **Format**: progress display values.
//!
//! # How it fits in the system
//! The runtime (`hanoi-runtime`) asks the planner for a [`Solution`], builds a
//! [`Board`] and a [`Scene`], and replays the moves on a worker. Nothing in
//! this crate sleeps, spawns, or performs I/O.

pub mod board;
pub mod count;
pub mod format;
pub mod layout;
pub mod moves;
pub mod palette;
pub mod plan;

pub use board::{Board, BoardError, DiscId, Peg, Transfer};
pub use count::{Magnitude, MoveCount};
pub use format::{MoveTotal, Progress, group_thousands};
pub use layout::{Anchor, DiscStyle, Scene};
pub use moves::{Move, Solution};
pub use palette::{Color, PALETTE};
pub use plan::{
    ChunkPlan, DEFAULT_MOVE_LIST_LIMIT, DEFAULT_THREE_PEG_DISC_LIMIT, PlanCache, PlanCacheStats,
    PlanError, PlanKey, Planner,
};
