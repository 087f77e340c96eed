use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    SPAWN_X, SPAWN_Y,
    board::Board,
    kick::{KickTable, RotationDirection},
};

/// A falling tetromino with position, rotation, and type.
///
/// Pieces are immutable values: movement and rotation return new `Piece`s, and
/// the caller decides whether to commit them after checking
/// [`Board::is_valid_placement`].
///
/// # Coordinate System
///
/// - The position is the top-left corner of the piece's 4×4 bounding box
/// - X grows rightward (columns), Y grows downward (rows)
/// - Coordinates may be negative while a piece is partly above the board
///
/// # Example
///
/// ```
/// use arcade_engine::{Board, Piece, PieceKind};
///
/// let board = Board::EMPTY;
/// let piece = Piece::spawn(PieceKind::T);
/// let moved = piece.shifted(1, 0);
/// assert!(board.is_valid_placement(&moved));
///
/// let rotated = moved.rotated_right();
/// assert_eq!(rotated.rotation().index(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    position: PiecePosition,
    rotation: PieceRotation,
    kind: PieceKind,
}

/// Error returned when parsing a [`Piece`] from its `kind#rotation@x,y` form.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece '{input}': {reason}")]
pub struct ParsePieceError {
    input: String,
    reason: &'static str,
}

impl fmt::Display for Piece {
    // Format: "kind#rotation@x,y" (e.g., "S#1@4,-1")
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{},{}",
            self.kind.as_char(),
            self.rotation.0,
            self.position.x,
            self.position.y
        )
    }
}

impl FromStr for Piece {
    type Err = ParsePieceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| ParsePieceError {
            input: s.to_owned(),
            reason,
        };

        let (kind_str, rest) = s.split_once('#').ok_or_else(|| err("missing '#'"))?;
        let (rotation_str, position_str) =
            rest.split_once('@').ok_or_else(|| err("missing '@'"))?;
        let (x_str, y_str) = position_str
            .split_once(',')
            .ok_or_else(|| err("missing ','"))?;

        let mut kind_chars = kind_str.chars();
        let kind = match (kind_chars.next(), kind_chars.next()) {
            (Some(c), None) => PieceKind::from_char(c).ok_or_else(|| err("unknown piece kind"))?,
            _ => return Err(err("piece kind must be a single character")),
        };
        let rotation = rotation_str
            .parse::<u8>()
            .ok()
            .and_then(PieceRotation::new)
            .ok_or_else(|| err("rotation must be 0-3"))?;
        let x = x_str.parse().map_err(|_| err("invalid x coordinate"))?;
        let y = y_str.parse().map_err(|_| err("invalid y coordinate"))?;

        Ok(Self {
            position: PiecePosition::new(x, y),
            rotation,
            kind,
        })
    }
}

impl Serialize for Piece {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Piece {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Piece {
    /// Creates a piece of the given kind at the spawn origin in rotation 0.
    #[must_use]
    pub const fn spawn(kind: PieceKind) -> Self {
        Self {
            position: PiecePosition::SPAWN,
            rotation: PieceRotation::SPAWN,
            kind,
        }
    }

    #[must_use]
    pub const fn new(kind: PieceKind, position: PiecePosition, rotation: PieceRotation) -> Self {
        Self {
            position,
            rotation,
            kind,
        }
    }

    #[must_use]
    pub const fn position(&self) -> PiecePosition {
        self.position
    }

    #[must_use]
    pub const fn rotation(&self) -> PieceRotation {
        self.rotation
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    /// Returns the board coordinates `(x, y)` of every occupied cell.
    ///
    /// Cells above the board yield negative `y` values.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.kind
            .occupied_offsets(self.rotation)
            .map(move |(dx, dy)| (self.position.x + dx, self.position.y + dy))
    }

    /// Returns this piece moved by `(dx, dy)`.
    #[must_use]
    pub const fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            position: self.position.offset(dx, dy),
            rotation: self.rotation,
            kind: self.kind,
        }
    }

    #[must_use]
    pub const fn rotated_right(&self) -> Self {
        Self {
            position: self.position,
            rotation: self.rotation.rotated_right(),
            kind: self.kind,
        }
    }

    #[must_use]
    pub const fn rotated_left(&self) -> Self {
        Self {
            position: self.position,
            rotation: self.rotation.rotated_left(),
            kind: self.kind,
        }
    }

    /// Rotates the piece, trying each kick offset of `kicks` in order.
    ///
    /// Returns the first valid placement, or `None` if every candidate
    /// collides or leaves the board.
    #[must_use]
    pub fn kicked_rotation(
        &self,
        direction: RotationDirection,
        kicks: KickTable,
        board: &Board,
    ) -> Option<Self> {
        let rotated = match direction {
            RotationDirection::Clockwise => self.rotated_right(),
            RotationDirection::CounterClockwise => self.rotated_left(),
        };
        kicks
            .offsets(self.kind, self.rotation, rotated.rotation)
            .iter()
            .map(|&(dx, dy)| rotated.shifted(dx, dy))
            .find(|candidate| board.is_valid_placement(candidate))
    }

    /// Returns where this piece would lock if dropped straight down.
    #[must_use]
    pub fn simulate_drop_position(&self, board: &Board) -> Self {
        let mut dropped = *self;
        loop {
            let below = dropped.shifted(0, 1);
            if !board.is_valid_placement(&below) {
                return dropped;
            }
            dropped = below;
        }
    }
}

/// Position of a piece's 4×4 bounding box on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct PiecePosition {
    x: i32,
    y: i32,
}

impl PiecePosition {
    pub const SPAWN: Self = Self::new(SPAWN_X, SPAWN_Y);

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }

    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Rotation state of a piece.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise (90° counterclockwise)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PieceRotation(u8);

impl PieceRotation {
    pub const SPAWN: Self = Self(0);

    /// Returns the rotation with the given index, or `None` if it is not 0-3.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 4 { Some(Self(index)) } else { None }
    }

    #[must_use]
    pub const fn rotated_right(self) -> Self {
        Self((self.0 + 1) % 4)
    }

    #[must_use]
    pub const fn rotated_left(self) -> Self {
        Self((self.0 + 3) % 4)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<u8> for PieceRotation {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rotation must be 0-3, got {value}"))
    }
}

impl From<PieceRotation> for u8 {
    fn from(rotation: PieceRotation) -> Self {
        rotation.0
    }
}

/// Enum representing the type of piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece.
    I = 0,
    /// O-piece.
    O = 1,
    /// S-piece.
    S = 2,
    /// Z-piece.
    Z = 3,
    /// J-piece.
    J = 4,
    /// L-piece.
    L = 5,
    /// T-piece.
    T = 6,
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// Every piece kind, in bag refill order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    pub(crate) const fn mask(self, rotation: PieceRotation) -> PieceMask {
        PIECE_MASKS[self as usize][rotation.index()]
    }

    /// Returns the `(dx, dy)` offsets of occupied cells inside the 4×4 box.
    pub fn occupied_offsets(self, rotation: PieceRotation) -> impl Iterator<Item = (i32, i32)> {
        (0..4).zip(self.mask(rotation)).flat_map(|(dy, row)| {
            (0..4)
                .filter(move |&dx| row & (1u8 << dx) != 0)
                .map(move |dx| (dx, dy))
        })
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// ```
    /// use arcade_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::T => 'T',
        }
    }

    /// Parses a piece kind from a single uppercase character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(PieceKind::I),
            'O' => Some(PieceKind::O),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'J' => Some(PieceKind::J),
            'L' => Some(PieceKind::L),
            'T' => Some(PieceKind::T),
            _ => None,
        }
    }
}

/// Occupancy of a piece inside its 4×4 bounding box.
///
/// One byte per row, top to bottom; bit `x` is set when column `x` is occupied.
pub(crate) type PieceMask = [u8; 4];

/// Generates the 4 rotation states of a mask by rotating 90° clockwise
/// inside the top-left `size`×`size` square.
const fn mask_rotations(size: usize, mask: PieceMask) -> [PieceMask; 4] {
    let mut rotates = [mask; 4];
    let mut i = 1;
    while i < 4 {
        let mut new_mask = [0; 4];
        let mut y = 0;
        while y < size {
            let mut x = 0;
            while x < size {
                if (rotates[i - 1][size - 1 - x] & (1 << y)) != 0 {
                    new_mask[y] |= 1 << x;
                }
                x += 1;
            }
            y += 1;
        }
        rotates[i] = new_mask;
        i += 1;
    }
    rotates
}

const PIECE_MASKS: [[PieceMask; 4]; PieceKind::LEN] = {
    const fn m(bits: [bool; 4]) -> u8 {
        let mut mask = 0;
        let mut i = 0;
        while i < 4 {
            if bits[i] {
                mask |= 1 << i;
            }
            i += 1;
        }
        mask
    }

    const C: bool = true;
    const E: bool = false;
    const EEEE: u8 = m([E; 4]);

    [
        // I-piece
        mask_rotations(4, [EEEE, m([C, C, C, C]), EEEE, EEEE]),
        // O-piece (does not move when rotated)
        [[m([E, C, C, E]), m([E, C, C, E]), EEEE, EEEE]; 4],
        // S-piece
        mask_rotations(3, [m([E, C, C, E]), m([C, C, E, E]), EEEE, EEEE]),
        // Z-piece
        mask_rotations(3, [m([C, C, E, E]), m([E, C, C, E]), EEEE, EEEE]),
        // J-piece
        mask_rotations(3, [m([C, E, E, E]), m([C, C, C, E]), EEEE, EEEE]),
        // L-piece
        mask_rotations(3, [m([E, E, C, E]), m([C, C, C, E]), EEEE, EEEE]),
        // T-piece
        mask_rotations(3, [m([E, C, E, E]), m([C, C, C, E]), EEEE, EEEE]),
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(kind: PieceKind, rotation: u8) -> Vec<(i32, i32)> {
        kind.occupied_offsets(PieceRotation(rotation)).collect()
    }

    #[test]
    fn test_every_rotation_has_four_cells() {
        for kind in PieceKind::ALL {
            for rotation in 0..4 {
                assert_eq!(offsets(kind, rotation).len(), 4, "{kind:?} rotation {rotation}");
            }
        }
    }

    #[test]
    fn test_rotation_states_match_reference_shapes() {
        // I: horizontal in row 1, then vertical in column 2
        assert_eq!(offsets(PieceKind::I, 0), [(0, 1), (1, 1), (2, 1), (3, 1)]);
        assert_eq!(offsets(PieceKind::I, 1), [(2, 0), (2, 1), (2, 2), (2, 3)]);
        assert_eq!(offsets(PieceKind::I, 2), [(0, 2), (1, 2), (2, 2), (3, 2)]);
        assert_eq!(offsets(PieceKind::I, 3), [(1, 0), (1, 1), (1, 2), (1, 3)]);

        // O: columns 1-2 of rows 0-1 in every rotation
        for rotation in 0..4 {
            assert_eq!(offsets(PieceKind::O, rotation), [(1, 0), (2, 0), (1, 1), (2, 1)]);
        }

        // T pointing up, right, down, left
        assert_eq!(offsets(PieceKind::T, 0), [(1, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(offsets(PieceKind::T, 1), [(1, 0), (1, 1), (2, 1), (1, 2)]);
        assert_eq!(offsets(PieceKind::T, 2), [(0, 1), (1, 1), (2, 1), (1, 2)]);
        assert_eq!(offsets(PieceKind::T, 3), [(1, 0), (0, 1), (1, 1), (1, 2)]);

        assert_eq!(offsets(PieceKind::S, 1), [(1, 0), (1, 1), (2, 1), (2, 2)]);
        assert_eq!(offsets(PieceKind::Z, 3), [(1, 0), (0, 1), (1, 1), (0, 2)]);
        assert_eq!(offsets(PieceKind::J, 1), [(1, 0), (2, 0), (1, 1), (1, 2)]);
        assert_eq!(offsets(PieceKind::L, 3), [(0, 0), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_rotation_wraps_around() {
        let rotation = PieceRotation::SPAWN;
        assert_eq!(rotation.rotated_left(), PieceRotation(3));
        assert_eq!(rotation.rotated_right().rotated_right().rotated_right().rotated_right(), rotation);
        assert_eq!(PieceRotation::new(4), None);
    }

    #[test]
    fn test_occupied_cells_follow_position() {
        let piece = Piece::spawn(PieceKind::O).shifted(0, -1);
        let cells: Vec<_> = piece.occupied_cells().collect();
        assert_eq!(cells, [(4, -1), (5, -1), (4, 0), (5, 0)]);
    }

    #[test]
    fn test_piece_serialization() {
        let piece = Piece::new(PieceKind::S, PiecePosition::new(4, -1), PieceRotation(1));

        let serialized = serde_json::to_string(&piece).unwrap();
        assert_eq!(serialized, "\"S#1@4,-1\"");

        let deserialized: Piece = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, piece);
    }

    #[test]
    fn test_piece_deserialization_error_cases() {
        assert!(serde_json::from_str::<Piece>("\"S1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1#4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@4\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"X#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"SS#1@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#4@4,18\"").is_err());
        assert!(serde_json::from_str::<Piece>("\"S#1@abc,18\"").is_err());

        let err = "T#9@0,0".parse::<Piece>().unwrap_err();
        assert_eq!(err.to_string(), "invalid piece 'T#9@0,0': rotation must be 0-3");
    }

    #[test]
    fn test_rotation_serializes_as_index() {
        assert_eq!(serde_json::to_string(&PieceRotation(2)).unwrap(), "2");
        assert!(serde_json::from_str::<PieceRotation>("5").is_err());
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_char('X'), None);
        assert_eq!(PieceKind::from_char('t'), None);
    }
}
