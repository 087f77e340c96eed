use crate::{
    HoldError, PieceCollisionError,
    core::{Board, ClearedRows, KickTable, Piece, PieceKind, RotationDirection},
};

use super::piece_bag::PieceBag;

/// Single-turn game state: board, falling piece, next and held pieces.
///
/// `GameField` validates every mutation against the board but knows nothing
/// about scoring or session state; see [`GameSession`](super::GameSession).
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Piece,
    next_piece: PieceKind,
    held_piece: Option<PieceKind>,
    can_hold: bool,
    bag: PieceBag,
}

impl GameField {
    /// Creates a field with an empty board, drawing the falling and next pieces from `bag`.
    #[must_use]
    pub fn new(mut bag: PieceBag) -> Self {
        let falling_piece = Piece::spawn(bag.draw());
        let next_piece = bag.draw();
        Self {
            board: Board::EMPTY,
            falling_piece,
            next_piece,
            held_piece: None,
            can_hold: true,
            bag,
        }
    }

    /// Clears the board and hold slot and starts a fresh bag.
    ///
    /// The bag's random stream continues where it left off.
    pub fn reset(&mut self) {
        self.bag.reset();
        self.board = Board::EMPTY;
        self.held_piece = None;
        self.can_hold = true;
        self.falling_piece = Piece::spawn(self.bag.draw());
        self.next_piece = self.bag.draw();
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Piece {
        self.falling_piece
    }

    #[must_use]
    pub fn next_piece(&self) -> PieceKind {
        self.next_piece
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<PieceKind> {
        self.held_piece
    }

    /// Returns `false` once hold has been used for the current piece.
    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    #[must_use]
    pub fn bag(&self) -> &PieceBag {
        &self.bag
    }

    /// Returns where the falling piece would land with a hard drop.
    #[must_use]
    pub fn simulate_drop_position(&self) -> Piece {
        self.falling_piece.simulate_drop_position(&self.board)
    }

    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !self.board.is_valid_placement(&piece) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_shift(&mut self, dx: i32, dy: i32) -> Result<(), PieceCollisionError> {
        self.set_falling_piece(self.falling_piece.shifted(dx, dy))
    }

    pub fn try_rotate(
        &mut self,
        direction: RotationDirection,
        kicks: KickTable,
    ) -> Result<(), PieceCollisionError> {
        let piece = self
            .falling_piece
            .kicked_rotation(direction, kicks, &self.board)
            .ok_or(PieceCollisionError)?;
        self.falling_piece = piece;
        Ok(())
    }

    /// Swaps the falling piece with the held one, or stows it and spawns the next piece.
    ///
    /// The piece brought in starts at the spawn origin. If it does not fit
    /// there, the swap still happens and [`HoldError::TopOut`] is returned.
    pub fn try_hold(&mut self) -> Result<(), HoldError> {
        if !self.can_hold {
            return Err(HoldError::HoldAlreadyUsed);
        }

        let current = self.falling_piece.kind();
        let result = match self.held_piece.replace(current) {
            Some(held) => {
                self.falling_piece = Piece::spawn(held);
                if self.board.is_valid_placement(&self.falling_piece) {
                    Ok(())
                } else {
                    Err(HoldError::TopOut)
                }
            }
            None => self.spawn_next().map_err(|_| HoldError::TopOut),
        };
        self.can_hold = false;
        result
    }

    /// Writes the falling piece into the board, clears full rows and spawns the next piece.
    ///
    /// Returns the cleared rows and whether the new piece fits.
    pub fn complete_piece_drop(&mut self) -> (ClearedRows, Result<(), PieceCollisionError>) {
        self.board.fill_piece(&self.falling_piece);
        let cleared = self.board.clear_lines();
        let spawned = self.spawn_next();
        (cleared, spawned)
    }

    fn spawn_next(&mut self) -> Result<(), PieceCollisionError> {
        self.falling_piece = Piece::spawn(self.next_piece);
        self.next_piece = self.bag.draw();
        self.can_hold = true;
        if self.board.is_valid_placement(&self.falling_piece) {
            Ok(())
        } else {
            Err(PieceCollisionError)
        }
    }

    #[cfg(test)]
    pub(crate) fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    /// Replaces the falling piece without validating it.
    #[cfg(test)]
    pub(crate) fn force_falling_piece(&mut self, piece: Piece) {
        self.falling_piece = piece;
    }
}

#[cfg(test)]
mod tests {
    use crate::{PiecePosition, PieceRotation, PieceSeed};

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn field() -> GameField {
        GameField::new(PieceBag::with_seed(SEED))
    }

    fn lock_at_bottom(field: &mut GameField) -> ClearedRows {
        let landing = field.simulate_drop_position();
        field.force_falling_piece(landing);
        let (cleared, result) = field.complete_piece_drop();
        result.unwrap();
        cleared
    }

    #[test]
    fn test_new_field_spawns_at_origin() {
        let field = field();
        let piece = field.falling_piece();
        assert_eq!(piece.position(), PiecePosition::new(3, 0));
        assert_eq!(piece.rotation(), PieceRotation::SPAWN);
        assert!(field.board().is_empty());
        assert!(field.can_hold());
        assert_eq!(field.held_piece(), None);
    }

    #[test]
    fn test_shift_is_rejected_at_walls() {
        let mut field = field();
        field.force_falling_piece(Piece::spawn(PieceKind::O));

        // O occupies columns 4-5 at spawn; four steps reach the left wall
        for _ in 0..4 {
            field.try_shift(-1, 0).unwrap();
        }
        let before = field.falling_piece();
        assert!(field.try_shift(-1, 0).is_err());
        assert_eq!(field.falling_piece(), before);

        for _ in 0..8 {
            field.try_shift(1, 0).unwrap();
        }
        assert!(field.try_shift(1, 0).is_err());
    }

    #[test]
    fn test_rotation_kicks_off_wall() {
        let mut field = field();
        // T pointing right, stem in column 0
        let piece = Piece::new(
            PieceKind::T,
            PiecePosition::new(-1, 5),
            PieceRotation::new(1).unwrap(),
        );
        field.force_falling_piece(piece);

        field
            .try_rotate(RotationDirection::Clockwise, KickTable::Simplified)
            .unwrap();
        let rotated = field.falling_piece();
        assert_eq!(rotated.rotation().index(), 2);
        assert_eq!(rotated.position(), PiecePosition::new(0, 5));
    }

    #[test]
    fn test_srs_rotation_kicks_two_columns() {
        let mut field = field();
        // Vertical I flush against the left wall
        let piece = Piece::new(
            PieceKind::I,
            PiecePosition::new(-2, 5),
            PieceRotation::new(1).unwrap(),
        );
        field.force_falling_piece(piece);

        // The simplified table only reaches one column
        assert!(
            field
                .try_rotate(RotationDirection::Clockwise, KickTable::Simplified)
                .is_err()
        );
        field
            .try_rotate(RotationDirection::Clockwise, KickTable::Srs)
            .unwrap();
        assert_eq!(field.falling_piece().position(), PiecePosition::new(0, 5));
    }

    #[test]
    fn test_failed_rotation_changes_nothing() {
        let mut field = field();
        // Horizontal I resting on the floor: vertical I needs three more rows
        // below than any kick can lift it.
        let piece = Piece::new(PieceKind::I, PiecePosition::new(3, 18), PieceRotation::SPAWN);
        field.force_falling_piece(piece);
        assert!(field.board().is_valid_placement(&piece));

        let result = field.try_rotate(RotationDirection::Clockwise, KickTable::Simplified);
        assert!(result.is_err());
        assert_eq!(field.falling_piece(), piece);
    }

    #[test]
    fn test_hold_stows_then_swaps() {
        let mut field = field();
        let first = field.falling_piece().kind();
        let next = field.next_piece();

        field.try_hold().unwrap();
        assert_eq!(field.held_piece(), Some(first));
        assert_eq!(field.falling_piece(), Piece::spawn(next));
        assert!(!field.can_hold());

        // Second hold before a lock is rejected and changes nothing
        let before = field.falling_piece();
        assert!(matches!(field.try_hold(), Err(HoldError::HoldAlreadyUsed)));
        assert_eq!(field.falling_piece(), before);
        assert_eq!(field.held_piece(), Some(first));

        // After a lock, hold swaps with the held piece
        lock_at_bottom(&mut field);
        assert!(field.can_hold());
        let current = field.falling_piece().kind();
        field.try_hold().unwrap();
        assert_eq!(field.falling_piece(), Piece::spawn(first));
        assert_eq!(field.held_piece(), Some(current));
    }

    #[test]
    fn test_hold_into_blocked_spawn_tops_out() {
        let mut field = field();
        field.try_hold().unwrap();
        lock_at_bottom(&mut field);

        field.set_board(Board::from_rows(["IIIIIIIIII"; 20]).unwrap());
        assert!(matches!(field.try_hold(), Err(HoldError::TopOut)));
        assert!(!field.can_hold());
    }

    #[test]
    fn test_complete_piece_drop_spawns_next() {
        let mut field = field();
        let next = field.next_piece();

        let cleared = lock_at_bottom(&mut field);
        assert!(cleared.is_empty());
        assert!(!field.board().is_empty());
        assert_eq!(field.falling_piece(), Piece::spawn(next));
        assert!(field.can_hold());
    }

    #[test]
    fn test_lock_reports_blocked_spawn() {
        let mut field = field();
        let mut rows = vec![".........."; 20];
        rows[1] = "...####...";
        field.set_board(Board::from_rows(rows).unwrap());
        field.force_falling_piece(Piece::new(
            PieceKind::O,
            PiecePosition::new(-1, 10),
            PieceRotation::SPAWN,
        ));

        // Every piece occupies row 1 between columns 3 and 6 at spawn
        let (cleared, result) = field.complete_piece_drop();
        assert!(cleared.is_empty());
        assert!(result.is_err());
    }

    #[test]
    fn test_reset_keeps_random_stream() {
        let mut field = field();
        lock_at_bottom(&mut field);
        field.try_hold().unwrap();

        field.reset();
        assert!(field.board().is_empty());
        assert_eq!(field.held_piece(), None);
        assert!(field.can_hold());
        assert_eq!(field.bag().remaining().count(), PieceKind::LEN - 2);

        // The fresh bag is the second shuffle of the same stream
        let mut replay = PieceBag::with_seed(SEED);
        for _ in 0..PieceKind::LEN {
            replay.draw();
        }
        let expected = (replay.draw(), replay.draw());
        assert_eq!((field.falling_piece().kind(), field.next_piece()), expected);
    }
}
