pub use self::{board::*, kick::*, piece::*};

pub(crate) mod board;
pub(crate) mod kick;
pub(crate) mod piece;

/// Number of columns on the board.
pub const BOARD_WIDTH: usize = 10;
/// Number of rows on the board.
pub const BOARD_HEIGHT: usize = 20;

/// Column of the top-left corner of a freshly spawned piece's 4×4 box.
pub const SPAWN_X: i32 = 3;
/// Row of the top-left corner of a freshly spawned piece's 4×4 box.
pub const SPAWN_Y: i32 = 0;
