use std::time::Duration;

use serde::Serialize;

use crate::ClearedRows;

/// Base score values for line clears, multiplied by the level.
///
/// Index corresponds to number of lines cleared simultaneously:
/// - 0 lines: 0 points
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points
const SCORE_TABLE: [u64; 5] = [0, 100, 300, 500, 800];

const LINES_PER_LEVEL: u32 = 10;

const BASE_DROP_INTERVAL_MILLIS: u64 = 1000;
const DROP_INTERVAL_STEP_MILLIS: u64 = 100;
const MIN_DROP_INTERVAL_MILLIS: u64 = 50;

/// Points per cell descended by a soft drop.
pub const SOFT_DROP_POINTS: u64 = 1;
/// Points per cell descended by a hard drop.
pub const HARD_DROP_POINTS: u64 = 2;

/// Result of locking a piece into the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockOutcome {
    /// Indices of the removed rows (before compaction), bottom-most first.
    pub cleared_rows: ClearedRows,
    /// Number of removed rows (0-4).
    pub lines_cleared: usize,
    /// Line-clear points awarded by this lock, excluding drop points.
    pub score_delta: u64,
    /// Level after the lock.
    pub level: u32,
    pub level_up: bool,
    /// `true` if the piece spawned after this lock did not fit.
    pub topped_out: bool,
}

/// Game statistics tracking score, lines cleared, and piece count.
///
/// # Scoring
///
/// - Line clears award `[0, 100, 300, 500, 800][lines] × level`, using the
///   level before the lock
/// - Soft drops award 1 point per cell, hard drops 2 points per cell
/// - No combo, back-to-back or T-spin bonuses
///
/// # Example
///
/// ```
/// use arcade_engine::{ClearedRows, GameStats};
///
/// let mut stats = GameStats::new();
/// let cleared: ClearedRows = [19, 18, 17, 16].into_iter().collect();
/// let outcome = stats.complete_piece_drop(cleared);
///
/// assert_eq!(outcome.score_delta, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    lines: u32,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
    play_time: Duration,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates a new game statistics tracker with all counters at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            lines: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
            play_time: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Returns the total number of lines cleared.
    #[must_use]
    pub const fn lines(&self) -> u32 {
        self.lines
    }

    /// Returns the current level, `lines / 10 + 1`.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.lines / LINES_PER_LEVEL + 1
    }

    /// Returns the gravity interval for the current level.
    ///
    /// Starts at 1000 ms on level 1 and shrinks by 100 ms per level, never
    /// going below 50 ms.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        let step = u64::from(self.level() - 1) * DROP_INTERVAL_STEP_MILLIS;
        let millis = BASE_DROP_INTERVAL_MILLIS
            .saturating_sub(step)
            .max(MIN_DROP_INTERVAL_MILLIS);
        Duration::from_millis(millis)
    }

    /// Returns the total number of pieces that have been locked into place.
    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns a histogram of line clears by count.
    ///
    /// `[0]` counts locks that cleared nothing, `[4]` counts tetrises.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Returns the time spent in the playing state.
    #[must_use]
    pub const fn play_time(&self) -> Duration {
        self.play_time
    }

    pub fn add_play_time(&mut self, elapsed: Duration) {
        self.play_time = self.play_time.saturating_add(elapsed);
    }

    /// Awards soft drop points for `cells` cells descended.
    pub fn add_soft_drop(&mut self, cells: u32) {
        self.score += u64::from(cells) * SOFT_DROP_POINTS;
    }

    /// Awards hard drop points for `cells` cells descended.
    pub fn add_hard_drop(&mut self, cells: u32) {
        self.score += u64::from(cells) * HARD_DROP_POINTS;
    }

    /// Updates statistics after a piece lock and returns what changed.
    ///
    /// More than four cleared rows score like a tetris.
    ///
    /// The returned outcome always has `topped_out == false`; the caller sets
    /// it once the next piece has spawned.
    pub fn complete_piece_drop(&mut self, cleared_rows: ClearedRows) -> LockOutcome {
        let lines_cleared = cleared_rows.len();
        let level_before = self.level();
        let base_points = SCORE_TABLE
            .get(lines_cleared)
            .or(SCORE_TABLE.last())
            .copied()
            .unwrap_or(0);
        let score_delta = base_points * u64::from(level_before);

        self.completed_pieces += 1;
        if let Some(count) = self.line_cleared_counter.get_mut(lines_cleared) {
            *count += 1;
        }
        self.lines += u32::try_from(lines_cleared).unwrap_or(u32::MAX);
        self.score += score_delta;

        LockOutcome {
            cleared_rows,
            lines_cleared,
            score_delta,
            level: self.level(),
            level_up: self.level() > level_before,
            topped_out: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> ClearedRows {
        (0..n).map(|i| 19 - i).collect()
    }

    #[test]
    fn test_initial_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.lines(), 0);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.drop_interval(), Duration::from_millis(1000));
        assert_eq!(stats.play_time(), Duration::ZERO);
    }

    #[test]
    fn test_line_clear_scores_use_level_before_lock() {
        let mut stats = GameStats::new();
        for _ in 0..2 {
            stats.complete_piece_drop(rows(4));
        }
        assert_eq!(stats.lines(), 8);
        assert_eq!(stats.level(), 1);
        assert_eq!(stats.score(), 1600);

        // Reaching 10 lines scores at level 1, then levels up
        let outcome = stats.complete_piece_drop(rows(2));
        assert_eq!(outcome.score_delta, 300);
        assert_eq!(outcome.level, 2);
        assert!(outcome.level_up);
        assert_eq!(stats.score(), 1900);

        // Next clear is worth double
        let outcome = stats.complete_piece_drop(rows(1));
        assert_eq!(outcome.score_delta, 200);
        assert!(!outcome.level_up);
    }

    #[test]
    fn test_oversized_clear_scores_like_tetris() {
        let mut stats = GameStats::new();
        let outcome = stats.complete_piece_drop(rows(6));
        assert_eq!(outcome.lines_cleared, 6);
        assert_eq!(outcome.score_delta, 800);
        assert_eq!(stats.lines(), 6);
        assert_eq!(stats.line_cleared_counter(), &[0; 5]);
    }

    #[test]
    fn test_lock_without_clear() {
        let mut stats = GameStats::new();
        let outcome = stats.complete_piece_drop(ClearedRows::new());
        assert_eq!(outcome.lines_cleared, 0);
        assert_eq!(outcome.score_delta, 0);
        assert!(!outcome.topped_out);
        assert_eq!(stats.completed_pieces(), 1);
        assert_eq!(stats.line_cleared_counter(), &[1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_level_follows_lines() {
        let mut stats = GameStats::new();
        for _ in 0..30 {
            stats.complete_piece_drop(rows(1));
            assert_eq!(stats.level(), stats.lines() / 10 + 1);
        }
        assert_eq!(stats.level(), 4);
    }

    #[test]
    fn test_drop_interval_has_floor() {
        let mut stats = GameStats::new();
        let mut previous = stats.drop_interval();
        for _ in 0..100 {
            stats.complete_piece_drop(rows(4));
            let interval = stats.drop_interval();
            let expected = 1000u64
                .saturating_sub(u64::from(stats.level() - 1) * 100)
                .max(50);
            assert_eq!(interval, Duration::from_millis(expected));
            assert!(interval <= previous);
            previous = interval;
        }
        assert_eq!(previous, Duration::from_millis(50));
    }

    #[test]
    fn test_drop_points() {
        let mut stats = GameStats::new();
        stats.add_soft_drop(3);
        stats.add_hard_drop(18);
        assert_eq!(stats.score(), 3 + 36);
    }
}
