#![forbid(unsafe_code)]

//! Move generation mirroring the planner's split points.

use std::fmt;

use crate::count::MoveCount;
use crate::plan::{PlanError, Planner, validate_counts};

/// Upper bound for the up-front allocation of a move list.
const MAX_PREALLOCATED_MOVES: u128 = 1 << 20;

/// A single-disc move between two pegs.
///
/// Moves carry no disc identity: the replay pops whatever sits on top of
/// `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl Move {
    #[inline]
    #[must_use]
    pub const fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.from, self.to)
    }
}

/// A planned run for a whole board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Requested disc count.
    pub discs: u32,
    pub pegs: u32,
    /// Discs covered by `moves` after the three-peg limit.
    pub planned_discs: u32,
    /// Plan total for the requested disc count.
    pub total: MoveCount,
    pub moves: Vec<Move>,
}

impl Solution {
    #[must_use]
    pub const fn source(&self) -> usize {
        0
    }

    #[must_use]
    pub const fn destination(&self) -> usize {
        self.pegs as usize - 1
    }

    /// Returns `true` if the move list covers fewer discs than requested.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.planned_discs < self.discs
    }
}

impl Planner {
    /// Full move list for `discs` discs from `from` to `to`.
    ///
    /// `others` lists the auxiliary pegs in preference order; the first one
    /// receives the chunk. The peg count used for split lookups is
    /// `others.len() + 2`.
    ///
    /// Refuses unsolvable input with [`PlanError::Unsolvable`] rather than
    /// recursing without an auxiliary peg, and a total past `u128` with
    /// [`PlanError::MoveListTooLong`].
    pub fn generate_moves(
        &mut self,
        discs: u32,
        from: usize,
        to: usize,
        others: &[usize],
    ) -> Result<Vec<Move>, PlanError> {
        let pegs = u32::try_from(others.len() + 2).map_err(|_| PlanError::InvalidInput {
            message: format!("{} auxiliary pegs exceed the supported range", others.len()),
        })?;
        validate_counts(discs, pegs)?;

        let plan = self.plan_for(discs, pegs);
        let total = match plan.moves {
            MoveCount::Unbounded => return Err(PlanError::Unsolvable { discs, pegs }),
            MoveCount::Huge(_) => {
                return Err(PlanError::MoveListTooLong {
                    discs,
                    pegs,
                    moves: plan.moves,
                    limit: self.move_list_limit(),
                });
            }
            MoveCount::Finite(total) => total,
        };

        let capacity = total.min(MAX_PREALLOCATED_MOVES) as usize;
        let mut moves = Vec::with_capacity(capacity);
        self.push_moves(discs, from, to, others, &mut moves);

        #[cfg(feature = "tracing")]
        tracing::debug!(discs, pegs, moves = moves.len(), "move list generated");

        Ok(moves)
    }

    /// Plan and generate the run for a whole board.
    ///
    /// Discs start on peg 0 and finish on the last peg; the pegs in between
    /// are auxiliaries in index order.
    pub fn solve(&mut self, discs: u32, pegs: u32) -> Result<Solution, PlanError> {
        let plan = self.optimal_plan(discs, pegs)?;
        if !plan.is_solvable() {
            return Err(PlanError::Unsolvable { discs, pegs });
        }

        let planned_discs = self.planned_discs(discs, pegs);
        let planned = self.plan_for(planned_discs, pegs).moves;
        if planned.finite().is_none_or(|moves| moves > self.move_list_limit()) {
            return Err(PlanError::MoveListTooLong {
                discs: planned_discs,
                pegs,
                moves: planned,
                limit: self.move_list_limit(),
            });
        }

        let destination = pegs as usize - 1;
        let others: Vec<usize> = (1..destination).collect();
        let moves = self.generate_moves(planned_discs, 0, destination, &others)?;

        Ok(Solution {
            discs,
            pegs,
            planned_discs,
            total: plan.moves,
            moves,
        })
    }

    fn push_moves(
        &mut self,
        discs: u32,
        from: usize,
        to: usize,
        others: &[usize],
        out: &mut Vec<Move>,
    ) {
        if discs <= 1 {
            out.push(Move::new(from, to));
            return;
        }

        // A finite plan always leaves an auxiliary for more than one disc.
        let Some((&temp, rest)) = others.split_first() else {
            unreachable!("solvable plan for {discs} discs has no auxiliary peg");
        };
        let pegs = others.len() as u32 + 2;
        let chunk_at = self.plan_for(discs, pegs).chunk_at;

        let mut aux = Vec::with_capacity(others.len());
        aux.push(to);
        aux.extend_from_slice(rest);
        self.push_moves(chunk_at, from, temp, &aux, out);

        self.push_moves(discs - chunk_at, from, to, rest, out);

        aux.clear();
        aux.extend_from_slice(rest);
        aux.push(from);
        self.push_moves(chunk_at, temp, to, &aux, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(moves: &[Move]) -> Vec<(usize, usize)> {
        moves.iter().map(|m| (m.from, m.to)).collect()
    }

    #[test]
    fn three_discs_three_pegs_exact_sequence() {
        let mut planner = Planner::new();
        let moves = planner.generate_moves(3, 0, 2, &[1]).unwrap();
        assert_eq!(
            pairs(&moves),
            vec![(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)]
        );
    }

    #[test]
    fn single_disc_is_one_direct_move() {
        let mut planner = Planner::new();
        let moves = planner.generate_moves(1, 4, 7, &[]).unwrap();
        assert_eq!(moves, vec![Move::new(4, 7)]);
    }

    #[test]
    fn two_pegs_refuse_more_than_one_disc() {
        let mut planner = Planner::new();
        assert_eq!(
            planner.generate_moves(2, 0, 1, &[]),
            Err(PlanError::Unsolvable { discs: 2, pegs: 2 })
        );
    }

    #[test]
    fn four_discs_four_pegs_take_nine_moves() {
        let mut planner = Planner::new();
        let moves = planner.generate_moves(4, 0, 3, &[1, 2]).unwrap();
        assert_eq!(moves.len(), 9);
        assert_eq!(moves.first(), Some(&Move::new(0, 1)));
        assert_eq!(moves.last(), Some(&Move::new(1, 3)));
    }

    #[test]
    fn solve_uses_first_and_last_peg() {
        let mut planner = Planner::new();
        let solution = planner.solve(3, 3).unwrap();
        assert_eq!(solution.source(), 0);
        assert_eq!(solution.destination(), 2);
        assert_eq!(solution.total, MoveCount::Finite(7));
        assert_eq!(solution.moves.len(), 7);
        assert!(!solution.is_truncated());
    }

    #[test]
    fn solve_truncates_three_peg_boards_but_reports_full_total() {
        let mut planner = Planner::new();
        let solution = planner.solve(22, 3).unwrap();
        assert_eq!(solution.planned_discs, 20);
        assert!(solution.is_truncated());
        assert_eq!(solution.moves.len(), (1 << 20) - 1);
        assert_eq!(solution.total, MoveCount::Finite((1 << 22) - 1));
    }

    #[test]
    fn solve_reports_unsolvable() {
        let mut planner = Planner::new();
        assert_eq!(
            planner.solve(3, 2),
            Err(PlanError::Unsolvable { discs: 3, pegs: 2 })
        );
        assert!(planner.solve(1, 2).is_ok());
    }

    #[test]
    fn solve_refuses_lists_over_the_limit() {
        let mut planner = Planner::new().with_move_list_limit(100);
        assert_eq!(
            planner.solve(7, 3),
            Err(PlanError::MoveListTooLong {
                discs: 7,
                pegs: 3,
                moves: MoveCount::Finite(127),
                limit: 100,
            })
        );
        assert_eq!(planner.solve(6, 3).map(|s| s.moves.len()), Ok(63));
    }

    #[test]
    fn solve_keeps_totals_beyond_u128() {
        let mut planner = Planner::new();
        let solution = planner.solve(200, 3).unwrap();
        assert_eq!(solution.planned_discs, 20);
        assert_eq!(solution.moves.len(), (1 << 20) - 1);
        assert!(matches!(solution.total, MoveCount::Huge(_)));

        let mut unclamped = Planner::new().with_three_peg_disc_limit(None);
        let err = unclamped.solve(200, 3).unwrap_err();
        assert!(matches!(
            err,
            PlanError::MoveListTooLong { discs: 200, moves: MoveCount::Huge(_), .. }
        ));
        assert!(err.to_string().contains("1.61×10^60"), "{err}");
        assert!(matches!(
            unclamped.generate_moves(200, 0, 2, &[1]),
            Err(PlanError::MoveListTooLong { .. })
        ));
    }

    #[test]
    fn move_display_is_a_pair() {
        assert_eq!(Move::new(0, 2).to_string(), "(0,2)");
    }
}
