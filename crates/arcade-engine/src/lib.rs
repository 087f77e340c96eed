//! Headless Tetris engine.
//!
//! - [`core`]: board, pieces, rotation tables and wall kicks
//! - [`engine`]: piece bag, scoring, the game session state machine and snapshots
//!
//! The engine has no clock and no I/O. Front-ends call
//! [`GameSession::advance`] with the elapsed frame time, apply [`Command`]s,
//! and render [`GameSnapshot`]s.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding when setting falling piece")]
pub struct PieceCollisionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum HoldError {
    #[display("hold already used for this piece")]
    HoldAlreadyUsed,
    #[display("held piece does not fit at the spawn position")]
    TopOut,
}

/// Error returned when a session rejects a command.
///
/// A rejected command never changes the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CommandError {
    #[display("piece movement blocked")]
    Blocked,
    #[display("hold already used for this piece")]
    HoldAlreadyUsed,
    #[display("command not allowed while {state}")]
    NotAllowed { state: SessionState },
}
