use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::{Board, Piece, PieceKind};

use super::SessionState;

/// Owned, read-only view of a session for renderers and serialization.
///
/// # Serialization
///
/// The board is written as one string per row, the active piece in its
/// compact `kind#rotation@x,y` form, and the drop interval in milliseconds:
///
/// ```
/// use arcade_engine::{GameSession, PieceSeed};
///
/// let session = GameSession::with_seed(PieceSeed::from_bytes([0; 16]));
/// let json = serde_json::to_value(session.snapshot()).unwrap();
/// assert_eq!(json["state"], "ready");
/// assert_eq!(json["drop_interval_ms"], 1000);
/// assert_eq!(json["board"].as_array().unwrap().len(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub game_id: String,
    pub state: SessionState,
    pub board: Board,
    pub active: Piece,
    pub next: PieceKind,
    pub held: Option<PieceKind>,
    pub can_hold: bool,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    #[serde(rename = "drop_interval_ms", serialize_with = "serialize_millis")]
    pub drop_interval: Duration,
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

impl GameSnapshot {
    /// Returns where the active piece would land with a hard drop.
    #[must_use]
    pub fn ghost_piece(&self) -> Piece {
        self.active.simulate_drop_position(&self.board)
    }
}

/// Final result of a game, handed to the score store on game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOverReport {
    pub game_id: String,
    pub final_score: u64,
    pub lines: u32,
    pub level: u32,
}
