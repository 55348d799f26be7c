#![forbid(unsafe_code)]

//! Frame–Stewart split-point search with an instance-owned memo cache.
//!
//! For `discs` discs on `pegs` pegs the planner picks a chunk size `k`: the
//! top `k` discs go to an auxiliary peg using every peg, the remaining
//! `discs - k` go to the destination with one peg fewer (the auxiliary is
//! occupied), and the chunk follows them. The cost of a split is
//!
//! ```text
//! 2 * moves(k, pegs) + moves(discs - k, pegs - 1)
//! ```
//!
//! # Cases
//!
//! 1. `discs < pegs`: every disc can park on its own peg, `2 * discs - 1`
//!    moves with `chunk_at = 1`.
//! 2. `pegs < 3`: unsolvable for more than one disc, [`MoveCount::Unbounded`]
//!    with `chunk_at = 1`.
//! 3. Otherwise a linear scan over `k in 1..discs` keeps the first strict
//!    minimum, so the smallest chunk wins ties.
//!
//! # Invariants
//!
//! 1. Results are a pure function of `(discs, pegs)`.
//! 2. Every key is evaluated at most once per [`PlanCache`]; later lookups
//!    are hits and never recurse.
//! 3. The cache is never evicted. Realistic keys number `discs * pegs`.

use ahash::AHashMap;

use crate::count::MoveCount;

/// Disc count above which a three-peg solution is truncated by default.
///
/// Three-peg totals grow as `2^n - 1`; twenty discs already need a little
/// over a million moves.
pub const DEFAULT_THREE_PEG_DISC_LIMIT: u32 = 20;

/// Longest move list [`Planner::solve`] materialises by default.
pub const DEFAULT_MOVE_LIST_LIMIT: u128 = 1 << 24;

/// Composite memo key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanKey {
    pub discs: u32,
    pub pegs: u32,
}

impl PlanKey {
    #[inline]
    #[must_use]
    pub const fn new(discs: u32, pegs: u32) -> Self {
        Self { discs, pegs }
    }
}

/// The chosen split for one `(discs, pegs)` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Number of top discs relocated as a unit to the auxiliary peg.
    pub chunk_at: u32,
    /// Total moves for the whole key under this split.
    pub moves: MoveCount,
}

impl ChunkPlan {
    /// Returns `true` if the plan has a finite move count.
    #[inline]
    #[must_use]
    pub const fn is_solvable(&self) -> bool {
        self.moves.is_finite()
    }
}

/// Errors reported by the planner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Fewer than three pegs for more than one disc.
    #[error("{discs} disc(s) cannot be moved with only {pegs} peg(s)")]
    Unsolvable { discs: u32, pegs: u32 },

    /// A zero disc or peg count.
    #[error("invalid planner input: {message}")]
    InvalidInput { message: String },

    /// The move list for the planned discs would exceed the limit.
    #[error("{discs} disc(s) on {pegs} peg(s) need {moves} moves, over the limit of {limit}")]
    MoveListTooLong {
        discs: u32,
        pegs: u32,
        moves: MoveCount,
        limit: u128,
    },
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanCacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to descend into the recursion.
    pub misses: u64,
    /// Entries currently stored.
    pub entries: usize,
}

/// Memo cache for [`ChunkPlan`] values.
///
/// Owned by a [`Planner`]; two planners never share state.
#[derive(Debug, Default, Clone)]
pub struct PlanCache {
    entries: AHashMap<PlanKey, ChunkPlan>,
    hits: u64,
    misses: u64,
}

impl PlanCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, counting the hit or miss.
    pub fn get(&mut self, key: &PlanKey) -> Option<ChunkPlan> {
        match self.entries.get(key) {
            Some(plan) => {
                self.hits += 1;
                Some(*plan)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up a key without touching the counters.
    #[must_use]
    pub fn peek(&self, key: &PlanKey) -> Option<ChunkPlan> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: PlanKey, plan: ChunkPlan) {
        self.entries.insert(key, plan);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn stats(&self) -> PlanCacheStats {
        PlanCacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

/// Frame–Stewart planner.
///
/// # Usage
///
/// ```
/// use hanoi_core::{MoveCount, Planner};
///
/// let mut planner = Planner::new();
/// let plan = planner.optimal_plan(4, 4).unwrap();
/// assert_eq!(plan.moves, MoveCount::Finite(9));
/// ```
#[derive(Debug, Clone)]
pub struct Planner {
    cache: PlanCache,
    three_peg_disc_limit: Option<u32>,
    move_list_limit: u128,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    /// Create a planner with an empty cache and the default three-peg limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: PlanCache::new(),
            three_peg_disc_limit: Some(DEFAULT_THREE_PEG_DISC_LIMIT),
            move_list_limit: DEFAULT_MOVE_LIST_LIMIT,
        }
    }

    /// Set the three-peg truncation limit (builder pattern).
    ///
    /// `None` disables truncation.
    #[must_use]
    pub fn with_three_peg_disc_limit(mut self, limit: Option<u32>) -> Self {
        self.three_peg_disc_limit = limit;
        self
    }

    #[must_use]
    pub fn three_peg_disc_limit(&self) -> Option<u32> {
        self.three_peg_disc_limit
    }

    /// Cap the length of move lists built by [`solve`](Self::solve).
    #[must_use]
    pub fn with_move_list_limit(mut self, limit: u128) -> Self {
        self.move_list_limit = limit;
        self
    }

    #[must_use]
    pub fn move_list_limit(&self) -> u128 {
        self.move_list_limit
    }

    #[must_use]
    pub fn cache(&self) -> &PlanCache {
        &self.cache
    }

    #[must_use]
    pub fn stats(&self) -> PlanCacheStats {
        self.cache.stats()
    }

    /// Minimal move count and split point for `discs` discs on `pegs` pegs.
    ///
    /// Unsolvable keys are returned as a plan with
    /// [`MoveCount::Unbounded`], not as an error; only zero counts fail.
    pub fn optimal_plan(&mut self, discs: u32, pegs: u32) -> Result<ChunkPlan, PlanError> {
        validate_counts(discs, pegs)?;
        Ok(self.plan_for(discs, pegs))
    }

    /// Number of discs actually planned for a request.
    ///
    /// Applies the three-peg limit; every other peg count plans the full
    /// stack.
    #[must_use]
    pub fn planned_discs(&self, discs: u32, pegs: u32) -> u32 {
        match self.three_peg_disc_limit {
            Some(limit) if pegs == 3 && discs > limit => limit,
            _ => discs,
        }
    }

    pub(crate) fn plan_for(&mut self, discs: u32, pegs: u32) -> ChunkPlan {
        let key = PlanKey::new(discs, pegs);
        if let Some(plan) = self.cache.get(&key) {
            return plan;
        }

        let plan = if discs < pegs {
            ChunkPlan {
                chunk_at: 1,
                moves: MoveCount::Finite((2 * u128::from(discs)).saturating_sub(1)),
            }
        } else if pegs < 3 {
            ChunkPlan {
                chunk_at: 1,
                moves: MoveCount::Unbounded,
            }
        } else {
            self.search_split(discs, pegs)
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(
            discs,
            pegs,
            chunk_at = plan.chunk_at,
            moves = ?plan.moves,
            "split point evaluated"
        );

        self.cache.insert(key, plan);
        plan
    }

    fn search_split(&mut self, discs: u32, pegs: u32) -> ChunkPlan {
        let mut best = ChunkPlan {
            chunk_at: 0,
            moves: MoveCount::Unbounded,
        };
        for chunk_at in 1..discs {
            let moves = self.plan_for(chunk_at, pegs).moves.doubled()
                + self.plan_for(discs - chunk_at, pegs - 1).moves;
            // Strict comparison: the smallest chunk wins ties.
            if moves < best.moves {
                best = ChunkPlan { chunk_at, moves };
            }
        }
        best
    }
}

pub(crate) fn validate_counts(discs: u32, pegs: u32) -> Result<(), PlanError> {
    if discs == 0 {
        return Err(PlanError::InvalidInput {
            message: "disc count must be at least 1".into(),
        });
    }
    if pegs == 0 {
        return Err(PlanError::InvalidInput {
            message: "peg count must be at least 1".into(),
        });
    }
    Ok(())
}
