use chrono::Utc;

use crate::{ScoreStore, ScoreTable};

/// A [`ScoreStore`] that lives only as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    table: ScoreTable,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn table(&self) -> &ScoreTable {
        &self.table
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best(&self, game_id: &str) -> u64 {
        self.table.best(game_id)
    }

    fn submit(&mut self, game_id: &str, score: u64) -> bool {
        self.table.record(game_id, score, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_never_decreases() {
        let mut store = MemoryScoreStore::new();
        let mut best = 0;
        for score in [100, 50, 300, 300, 10, 1000, 999] {
            let is_record = store.submit("tetris", score);
            assert_eq!(is_record, score > best);
            best = best.max(score);
            assert_eq!(store.best("tetris"), best);
        }
    }
}
