use serde::{Deserialize, Serialize};

use super::{LockOutcome, SessionState};

/// A player or driver command that can be queued and applied later.
///
/// See [`GameSession::apply`](super::GameSession::apply).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    RotateCounterclockwise,
    Hold,
    Start,
    Pause,
    Resume,
    TogglePause,
    Reset,
}

/// What an accepted command did.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum CommandOutcome {
    /// The falling piece moved, rotated, or was swapped by hold.
    Moved,
    /// The falling piece locked into the board.
    Locked(LockOutcome),
    /// The session moved to a new state.
    StateChanged(SessionState),
}
