use std::iter;

use arcade_engine::{BOARD_HEIGHT, BOARD_WIDTH, Board, Piece};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::{BlockDisplay, Tile};

type TileGrid = [[Tile; BOARD_WIDTH]; BOARD_HEIGHT];

#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Piece) -> Self {
        Self {
            ghost: Some(piece),
            ..self
        }
    }

    pub fn falling_piece(self, piece: Piece) -> Self {
        Self {
            falling_piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        10 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        20 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }

    /// Board cells with the ghost and the falling piece drawn on top.
    fn tiles(&self) -> TileGrid {
        let mut tiles = [[Tile::Empty; BOARD_WIDTH]; BOARD_HEIGHT];
        for (tile_row, row) in iter::zip(&mut tiles, self.board.rows()) {
            for (tile, cell) in iter::zip(tile_row, row.cells()) {
                *tile = Tile::from(*cell);
            }
        }
        if let Some(ghost) = self.ghost {
            overlay(&mut tiles, &ghost, Tile::Ghost);
        }
        if let Some(piece) = self.falling_piece {
            overlay(&mut tiles, &piece, Tile::Piece(piece.kind()));
        }
        tiles
    }
}

/// Cells above the visible board are skipped.
fn overlay(tiles: &mut TileGrid, piece: &Piece, tile: Tile) {
    for (x, y) in piece.occupied_cells() {
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            continue;
        };
        if let Some(slot) = tiles.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = tile;
        }
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints = (0..BOARD_WIDTH).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints =
            (0..BOARD_HEIGHT).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_cells = area
            .layout::<{ BOARD_HEIGHT }>(&vertical)
            .into_iter()
            .map(|row| row.layout::<{ BOARD_WIDTH }>(&horizontal));

        for (grid_row, row) in iter::zip(grid_cells, self.tiles()) {
            for (grid_cell, tile) in iter::zip(grid_row, row) {
                BlockDisplay::from_tile(tile, true).render(grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use arcade_engine::{PieceKind, PiecePosition, PieceRotation};

    use super::*;

    #[test]
    fn test_tiles_overlay_pieces() {
        let board = Board::from_ascii("IIII......");
        let piece = Piece::new(
            PieceKind::O,
            PiecePosition::new(4, 0),
            PieceRotation::SPAWN,
        );
        let display = BoardDisplay::new(&board)
            .ghost(piece.simulate_drop_position(&board))
            .falling_piece(piece);
        let tiles = display.tiles();

        assert_eq!(tiles[19][0], Tile::Piece(PieceKind::I));
        assert_eq!(tiles[19][4], Tile::Empty);
        let count = |tile| tiles.iter().flatten().filter(|t| **t == tile).count();
        assert_eq!(count(Tile::Piece(PieceKind::O)), 4);
        assert_eq!(count(Tile::Ghost), 4);
        assert_eq!(tiles[19][5], Tile::Ghost);
    }

    #[test]
    fn test_cells_above_board_are_hidden() {
        let board = Board::EMPTY;
        let piece = Piece::new(
            PieceKind::I,
            PiecePosition::new(3, -1),
            PieceRotation::SPAWN,
        );
        let tiles = BoardDisplay::new(&board).falling_piece(piece).tiles();
        assert_eq!(tiles[0][3..7], [Tile::Piece(PieceKind::I); 4]);
    }
}
