#![forbid(unsafe_code)]

//! Arena-backed board: pegs own disc ids, discs record their owning peg.
//!
//! # Invariants
//!
//! 1. Every disc id appears in exactly one peg stack.
//! 2. `owner[disc]` names the peg whose stack holds `disc`.
//! 3. Within a stack, ranks strictly decrease from bottom to top (the
//!    smallest disc is on top).
//!
//! [`Board::apply`] validates a move completely before mutating anything, so
//! a rejected move leaves the board untouched.

use std::fmt;

use crate::moves::Move;

/// Size rank of a disc; 0 is the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DiscId(u32);

impl DiscId {
    #[inline]
    #[must_use]
    pub const fn new(rank: u32) -> Self {
        Self(rank)
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> u32 {
        self.0
    }

    /// One-based label shown on the disc.
    #[inline]
    #[must_use]
    pub const fn label(self) -> u32 {
        self.0 + 1
    }
}

impl fmt::Display for DiscId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.label())
    }
}

/// One peg's stack, bottom first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Peg {
    stack: Vec<DiscId>,
}

impl Peg {
    #[must_use]
    pub fn discs(&self) -> &[DiscId] {
        &self.stack
    }

    #[must_use]
    pub fn top(&self) -> Option<DiscId> {
        self.stack.last().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

/// Result of a successful structural move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub disc: DiscId,
    pub from: usize,
    pub to: usize,
    /// One-based height of the disc in `to` after the move.
    pub position: usize,
}

/// A move the board refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("a board needs at least one peg")]
    NoPegs,

    #[error("move {mv} references peg {peg}, but the board has {pegs} pegs")]
    PegOutOfRange { mv: Move, peg: usize, pegs: usize },

    #[error("move {mv} pops from empty peg {peg}")]
    EmptyPeg { mv: Move, peg: usize },

    #[error("move {mv} places disc {disc} on smaller disc {below}")]
    Oversize {
        mv: Move,
        disc: DiscId,
        below: DiscId,
    },
}

/// The pegs and discs of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pegs: Vec<Peg>,
    owner: Vec<usize>,
}

impl Board {
    /// A board with every disc stacked on peg 0, largest at the bottom.
    pub fn new(pegs: usize, discs: u32) -> Result<Self, BoardError> {
        if pegs == 0 {
            return Err(BoardError::NoPegs);
        }
        let mut board = Self {
            pegs: vec![Peg::default(); pegs],
            owner: vec![0; discs as usize],
        };
        board.pegs[0].stack = (0..discs).rev().map(DiscId::new).collect();
        Ok(board)
    }

    #[must_use]
    pub fn peg_count(&self) -> usize {
        self.pegs.len()
    }

    #[must_use]
    pub fn disc_count(&self) -> usize {
        self.owner.len()
    }

    #[must_use]
    pub fn peg(&self, index: usize) -> Option<&Peg> {
        self.pegs.get(index)
    }

    #[must_use]
    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    /// Index of the peg currently holding `disc`.
    #[must_use]
    pub fn owner(&self, disc: DiscId) -> Option<usize> {
        self.owner.get(disc.rank() as usize).copied()
    }

    /// Move the top disc of `mv.from` onto `mv.to`.
    pub fn apply(&mut self, mv: Move) -> Result<Transfer, BoardError> {
        let pegs = self.pegs.len();
        for peg in [mv.from, mv.to] {
            if peg >= pegs {
                return Err(BoardError::PegOutOfRange { mv, peg, pegs });
            }
        }

        let disc = self.pegs[mv.from]
            .top()
            .ok_or(BoardError::EmptyPeg { mv, peg: mv.from })?;
        if mv.from != mv.to
            && let Some(below) = self.pegs[mv.to].top()
            && below < disc
        {
            return Err(BoardError::Oversize { mv, disc, below });
        }

        self.pegs[mv.from].stack.pop();
        self.pegs[mv.to].stack.push(disc);
        self.owner[disc.rank() as usize] = mv.to;

        Ok(Transfer {
            disc,
            from: mv.from,
            to: mv.to,
            position: self.pegs[mv.to].len(),
        })
    }

    /// Returns `true` if every disc of the board sits on `peg`.
    #[must_use]
    pub fn is_gathered_on(&self, peg: usize) -> bool {
        self.pegs
            .get(peg)
            .is_some_and(|p| p.len() == self.owner.len())
    }

    /// Check the stacking and ownership invariants.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut seen = vec![false; self.owner.len()];
        for (index, peg) in self.pegs.iter().enumerate() {
            if peg.stack.windows(2).any(|w| w[0] <= w[1]) {
                return false;
            }
            for disc in &peg.stack {
                let rank = disc.rank() as usize;
                if rank >= seen.len() || seen[rank] || self.owner[rank] != index {
                    return false;
                }
                seen[rank] = true;
            }
        }
        seen.into_iter().all(|s| s)
    }
}
