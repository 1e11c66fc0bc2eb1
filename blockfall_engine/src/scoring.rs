/*!
This module implements the pure scoring and leveling policy applied whenever
a locked piece completes lines.
*/

use std::time::Duration;

/// Base points awarded by number of lines cleared in one lock cycle, before
/// the level multiplier.
pub const BASE_CLEAR_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

/// Points per level: the level is always `score / POINTS_PER_LEVEL + 1`.
pub const POINTS_PER_LEVEL: u32 = 1000;

/// Points awarded per cell of player-accelerated descent.
pub const SOFT_DROP_POINTS: u32 = 1;

/// Points awarded per cell descended by a hard drop.
pub const HARD_DROP_POINTS: u32 = 2;

/// The gravity interval at level 1.
pub const INITIAL_DROP_INTERVAL: Duration = Duration::from_millis(1000);

/// How much the gravity interval shrinks when the level rises.
pub const DROP_INTERVAL_STEP: Duration = Duration::from_millis(100);

/// The gravity interval never shrinks below this.
pub const MIN_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// The outcome of applying the clear policy once.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Copy, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClearOutcome {
    /// Points awarded for this clear.
    pub score_delta: u32,
    /// The level derived from the total score after the award.
    pub new_level: u32,
    /// The gravity interval to use from now on.
    ///
    /// Unchanged unless `new_level` exceeds the previous level, in which case
    /// it shrinks by a single [`DROP_INTERVAL_STEP`] (never below
    /// [`MIN_DROP_INTERVAL`]), no matter how many levels were gained at once.
    pub new_drop_interval: Duration,
}

/// Computes the score, level and gravity interval changes for a lock cycle
/// that completed `lines_cleared` lines.
///
/// Pure and total: line counts beyond the base table clamp to its last entry,
/// though the grid only admits up to four simultaneous full rows.
pub fn apply_clear(
    lines_cleared: u32,
    level: u32,
    score: u32,
    drop_interval: Duration,
) -> ClearOutcome {
    let base = BASE_CLEAR_POINTS[(lines_cleared as usize).min(BASE_CLEAR_POINTS.len() - 1)];
    let score_delta = base.saturating_mul(level);
    let new_level = score.saturating_add(score_delta) / POINTS_PER_LEVEL + 1;
    let new_drop_interval = if new_level > level {
        MIN_DROP_INTERVAL.max(drop_interval.saturating_sub(DROP_INTERVAL_STEP))
    } else {
        drop_interval
    };
    ClearOutcome {
        score_delta,
        new_level,
        new_drop_interval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_points_scale_with_the_level() {
        for (lines, base) in [(1, 100), (2, 300), (3, 500), (4, 800)] {
            let outcome = apply_clear(lines, 3, 0, INITIAL_DROP_INTERVAL);
            assert_eq!(outcome.score_delta, base * 3, "{lines} lines");
        }
    }

    #[test]
    fn zero_clears_award_nothing_and_change_nothing() {
        let outcome = apply_clear(0, 5, 4321, Duration::from_millis(600));
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(outcome.new_level, 5);
        assert_eq!(outcome.new_drop_interval, Duration::from_millis(600));
    }

    #[test]
    fn line_counts_beyond_the_table_clamp_to_its_last_entry() {
        let outcome = apply_clear(7, 1, 0, INITIAL_DROP_INTERVAL);
        assert_eq!(outcome.score_delta, 800);
    }

    #[test]
    fn reaching_a_thousand_points_levels_up() {
        let outcome = apply_clear(1, 1, 900, INITIAL_DROP_INTERVAL);
        assert_eq!(outcome.score_delta, 100);
        assert_eq!(outcome.new_level, 2);
        assert_eq!(outcome.new_drop_interval, Duration::from_millis(900));
    }

    #[test]
    fn a_multi_level_jump_shrinks_the_interval_once() {
        // At level 2 with 1999 points, a quadruple awards 1600 and lands on
        // level 4, yet the interval only steps from 900ms to 800ms.
        let outcome = apply_clear(4, 2, 1999, Duration::from_millis(900));
        assert_eq!(outcome.score_delta, 1600);
        assert_eq!(outcome.new_level, 4);
        assert_eq!(outcome.new_drop_interval, Duration::from_millis(800));
    }

    #[test]
    fn the_interval_never_shrinks_below_the_floor() {
        let outcome = apply_clear(1, 10, 9999, MIN_DROP_INTERVAL);
        assert_eq!(outcome.new_level, 11);
        assert_eq!(outcome.new_drop_interval, MIN_DROP_INTERVAL);
    }
}
