#![forbid(unsafe_code)]

//! Move counts that may be unbounded.
//!
//! Boards with fewer than three pegs cannot relocate more than one disc, so
//! the planner needs a count that can say "never". [`MoveCount::Unbounded`]
//! absorbs every arithmetic operation and orders after every finite count,
//! which lets the split-point search compare candidates without special
//! cases.
//!
//! Exact counts live in a `u128`. Three-peg totals outgrow it past 128
//! discs; from there on a count is carried as its base-ten logarithm
//! ([`MoveCount::Huge`]), which is plenty for display and for ordering split
//! candidates but too coarse to replay.

use std::cmp::Ordering;
use std::f64::consts::LOG10_2;
use std::hash::{Hash, Hasher};
use std::ops::Add;

/// Base-ten logarithm of a count beyond `u128::MAX`.
///
/// Ordered with [`f64::total_cmp`], so it can sit inside a derived `Ord`.
#[derive(Debug, Clone, Copy)]
pub struct Magnitude(f64);

impl Magnitude {
    #[inline]
    #[must_use]
    pub const fn log10(self) -> f64 {
        self.0
    }

    /// `log10(10^a + 10^b)` without leaving log space.
    fn sum(a: f64, b: f64) -> Self {
        let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
        Self(hi + 10f64.powf(lo - hi).ln_1p() / std::f64::consts::LN_10)
    }
}

impl PartialEq for Magnitude {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Magnitude {}

impl PartialOrd for Magnitude {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Magnitude {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Magnitude {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Total number of single-disc moves for a plan.
///
/// Variant order matters: the derived `Ord` puts every `Finite` value
/// before every `Huge` one, and both before `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveCount {
    /// An exact, reachable number of moves.
    Finite(u128),
    /// A reachable number of moves too large for `u128`.
    Huge(Magnitude),
    /// No finite sequence of legal moves exists.
    Unbounded,
}

impl MoveCount {
    /// Zero moves.
    pub const ZERO: Self = Self::Finite(0);

    /// Returns `true` for any reachable count, exact or not.
    #[inline]
    #[must_use]
    pub const fn is_finite(self) -> bool {
        !matches!(self, Self::Unbounded)
    }

    /// The exact value, if it fits in a `u128`.
    #[inline]
    #[must_use]
    pub const fn finite(self) -> Option<u128> {
        match self {
            Self::Finite(n) => Some(n),
            Self::Huge(_) | Self::Unbounded => None,
        }
    }

    /// Base-ten logarithm of the count; `None` when unbounded.
    #[must_use]
    pub fn log10(self) -> Option<f64> {
        match self {
            Self::Finite(n) => Some(log10_of(n)),
            Self::Huge(magnitude) => Some(magnitude.log10()),
            Self::Unbounded => None,
        }
    }

    /// Twice this count (a chunk travels out and back).
    #[must_use]
    pub fn doubled(self) -> Self {
        match self {
            Self::Finite(n) => n
                .checked_mul(2)
                .map_or_else(|| Self::Huge(Magnitude(log10_of(n) + LOG10_2)), Self::Finite),
            Self::Huge(magnitude) => Self::Huge(Magnitude(magnitude.log10() + LOG10_2)),
            Self::Unbounded => Self::Unbounded,
        }
    }
}

fn log10_of(n: u128) -> f64 {
    (n as f64).log10()
}

impl Default for MoveCount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<u128> for MoveCount {
    fn from(n: u128) -> Self {
        Self::Finite(n)
    }
}

impl Add for MoveCount {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Finite(a), Self::Finite(b)) => a.checked_add(b).map_or_else(
                || Self::Huge(Magnitude::sum(log10_of(a), log10_of(b))),
                Self::Finite,
            ),
            (lhs, rhs) => match (lhs.log10(), rhs.log10()) {
                (Some(a), Some(b)) => Self::Huge(Magnitude::sum(a, b)),
                _ => Self::Unbounded,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unbounded_orders_after_every_finite_count() {
        assert!(MoveCount::Finite(u128::MAX) < MoveCount::Unbounded);
        assert!(MoveCount::Finite(3) < MoveCount::Finite(4));
        assert!(MoveCount::Finite(u128::MAX) < MoveCount::Finite(u128::MAX).doubled());
        assert!(MoveCount::Finite(u128::MAX).doubled() < MoveCount::Unbounded);
    }

    #[test]
    fn unbounded_absorbs_addition() {
        assert_eq!(
            MoveCount::Finite(1) + MoveCount::Unbounded,
            MoveCount::Unbounded
        );
        assert_eq!(
            MoveCount::Finite(u128::MAX).doubled() + MoveCount::Unbounded,
            MoveCount::Unbounded
        );
        assert_eq!(MoveCount::Unbounded.doubled(), MoveCount::Unbounded);
    }

    #[test]
    fn overflow_keeps_the_magnitude() {
        let doubled = MoveCount::Finite(u128::MAX).doubled();
        assert!(doubled.is_finite());
        assert_eq!(doubled.finite(), None);
        // 2 * (2^128 - 1) is within rounding of 2^129.
        assert!(close(doubled.log10().unwrap(), 129.0 * LOG10_2));

        let summed = MoveCount::Finite(u128::MAX) + MoveCount::Finite(u128::MAX);
        assert!(close(summed.log10().unwrap(), doubled.log10().unwrap()));

        let quadrupled = doubled.doubled() + MoveCount::Finite(1);
        assert!(close(quadrupled.log10().unwrap(), 130.0 * LOG10_2));
        assert!(quadrupled > doubled);
    }

    #[test]
    fn finite_accessor() {
        assert_eq!(MoveCount::Finite(7).finite(), Some(7));
        assert_eq!(MoveCount::Unbounded.finite(), None);
        assert_eq!(MoveCount::Unbounded.log10(), None);
        assert_eq!(MoveCount::default(), MoveCount::ZERO);
    }
}
