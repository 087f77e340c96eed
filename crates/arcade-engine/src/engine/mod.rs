//! Game engine logic and state management.
//!
//! This module orchestrates the core data structures into Tetris gameplay:
//!
//! - [`GameSession`] - A whole game: state machine, gravity, scoring
//! - [`GameField`] - Single-turn state (board, falling piece, next piece, hold)
//! - [`GameStats`] - Score, lines, level and drop interval
//! - [`PieceBag`] - 7-bag piece generation
//! - [`PieceSeed`] - Seed for deterministic piece generation
//! - [`GameSnapshot`] - Owned, serializable view for renderers
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] (optionally with a seed); it starts in `Ready`
//! 2. `start()` it, then drive gravity with `advance(elapsed)` every frame
//! 3. Apply player [`Command`]s as they arrive
//! 4. Each lock clears lines, scores, and spawns the next piece
//! 5. When a spawned piece does not fit, the session is over; hand the
//!    [`GameOverReport`] to a score store and `reset()` for a new game
//!
//! # Example
//!
//! ```
//! use arcade_engine::{Command, CommandOutcome, GameSession, PieceSeed};
//!
//! let mut session = GameSession::with_seed(PieceSeed::from_bytes([3; 16]));
//! session.apply(Command::Start).unwrap();
//!
//! while !session.state().is_game_over() {
//!     let outcome = session.apply(Command::HardDrop).unwrap();
//!     assert!(outcome.is_locked());
//! }
//!
//! let report = session.game_over_report().unwrap();
//! assert_eq!(report.game_id, "tetris");
//! assert!(report.final_score > 0);
//! ```

pub use self::{
    command::*, config::*, game_field::*, game_stats::*, piece_bag::*, session::*, snapshot::*,
};

mod command;
mod config;
mod game_field;
mod game_stats;
mod piece_bag;
mod session;
mod snapshot;
