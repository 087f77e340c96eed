use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best score for a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    /// When the score was achieved (RFC 3339 in JSON)
    pub achieved_at: DateTime<Utc>,
}

/// Best scores of every game, as stored on disk.
///
/// ```json
/// { "scores": { "tetris": { "score": 1200, "achieved_at": "2025-01-01T12:00:00Z" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTable {
    #[serde(default)]
    scores: BTreeMap<String, ScoreRecord>,
}

impl ScoreTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, game_id: &str) -> Option<&ScoreRecord> {
        self.scores.get(game_id)
    }

    #[must_use]
    pub fn best(&self, game_id: &str) -> u64 {
        self.get(game_id).map_or(0, |record| record.score)
    }

    /// Returns all records ordered by game id.
    pub fn records(&self) -> impl Iterator<Item = (&str, &ScoreRecord)> {
        self.scores.iter().map(|(id, record)| (id.as_str(), record))
    }

    /// Stores `score` achieved at `achieved_at` if it beats the current best.
    pub fn record(&mut self, game_id: &str, score: u64, achieved_at: DateTime<Utc>) -> bool {
        if score <= self.best(game_id) {
            return false;
        }
        self.scores.insert(
            game_id.to_owned(),
            ScoreRecord { score, achieved_at },
        );
        true
    }
}
