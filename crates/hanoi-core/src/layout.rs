#![forbid(unsafe_code)]

//! Scene geometry handed to presentation surfaces.
//!
//! Horizontal positions are in viewport-width units: pegs split the left 90
//! units of the view evenly, so peg `i` of `n` is centred at
//! `45 / n * (2i + 1)`. Vertical values are in disc heights, counted from
//! the base.

use std::fmt;
use std::time::Duration;

use crate::board::DiscId;
use crate::palette::Color;

/// Half the horizontal span shared by all pegs.
const PEG_HALF_SPAN: f64 = 45.0;

/// Extra peg height above a full stack, in disc heights.
const PEG_HEADROOM: f64 = 1.5;

/// How far above a full stack a lifted disc travels.
const LIFT_HEADROOM: usize = 3;

/// Width offset so the smallest disc is still wider than the peg.
const WIDTH_OFFSET: u32 = 3;

/// Spatial anchor of a peg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub peg: usize,
    /// Horizontal centre, rounded to three decimals.
    pub center: f64,
}

impl Anchor {
    #[must_use]
    pub fn for_peg(peg: usize, pegs: usize) -> Self {
        let pegs = pegs.max(1) as f64;
        Self {
            peg,
            center: round3(PEG_HALF_SPAN / pegs * (2 * peg + 1) as f64),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}vw", self.center)
    }
}

/// How a disc looks when the surface creates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscStyle {
    pub disc: DiscId,
    pub color: Color,
    /// Width relative to the per-peg slot, rounded to three decimals.
    pub width_ratio: f64,
    /// One-based height on the source peg.
    pub initial_position: usize,
}

/// Everything a surface needs to build a run's view.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub anchors: Vec<Anchor>,
    /// Indexed by disc rank.
    pub discs: Vec<DiscStyle>,
    pub peg_height: f64,
    /// Position value of a lifted disc.
    pub lifted_elevation: usize,
    /// Length of each of the three visible transitions of a move.
    pub transition: Duration,
}

impl Scene {
    #[must_use]
    pub fn new(pegs: usize, discs: u32, per_move: Duration) -> Self {
        let anchors = (0..pegs).map(|peg| Anchor::for_peg(peg, pegs)).collect();
        let styles = (0..discs)
            .map(|rank| DiscStyle {
                disc: DiscId::new(rank),
                color: Color::for_rank(rank),
                width_ratio: round3(
                    f64::from(rank + WIDTH_OFFSET) / f64::from(discs + WIDTH_OFFSET),
                ),
                initial_position: (discs - rank) as usize,
            })
            .collect();
        Self {
            anchors,
            discs: styles,
            peg_height: f64::from(discs) + PEG_HEADROOM,
            lifted_elevation: discs as usize + LIFT_HEADROOM,
            transition: per_move / 3,
        }
    }

    #[must_use]
    pub fn anchor(&self, peg: usize) -> Option<&Anchor> {
        self.anchors.get(peg)
    }

    #[must_use]
    pub fn source(&self) -> Option<&Anchor> {
        self.anchors.first()
    }

    /// The last peg, if it differs from the source.
    #[must_use]
    pub fn destination(&self) -> Option<&Anchor> {
        match self.anchors.len() {
            0 | 1 => None,
            n => self.anchors.get(n - 1),
        }
    }

    #[must_use]
    pub fn style(&self, disc: DiscId) -> Option<&DiscStyle> {
        self.discs.get(disc.rank() as usize)
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
