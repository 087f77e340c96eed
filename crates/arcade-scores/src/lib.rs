//! High-score persistence keyed by game id.
//!
//! Stores only ever raise a stored best: [`ScoreStore::submit`] records a
//! score iff it beats the previous one. Storage failures never reach the
//! caller as errors; [`JsonScoreStore`] keeps working in memory and exposes
//! the most recent failure through [`JsonScoreStore::last_error`].
//!
//! # Example
//!
//! ```
//! use arcade_scores::{MemoryScoreStore, ScoreStore};
//!
//! let mut store = MemoryScoreStore::new();
//! assert_eq!(store.best("tetris"), 0);
//!
//! assert!(store.submit("tetris", 1200));
//! assert!(!store.submit("tetris", 800));
//! assert_eq!(store.best("tetris"), 1200);
//! ```

use std::{io, path::PathBuf};

pub use self::{json_file::*, memory::*, table::*};

mod json_file;
mod memory;
mod table;

/// A high-score store keyed by game id.
pub trait ScoreStore {
    /// Returns the best stored score for `game_id`, or `0` if there is none.
    fn best(&self, game_id: &str) -> u64;

    /// Stores `score` if it is greater than the current best.
    ///
    /// Returns `true` if `score` is a new record.
    fn submit(&mut self, game_id: &str, score: u64) -> bool;
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ScoreStoreError {
    #[display("failed to access score file {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("invalid score file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}
