use arcade_engine::{PieceKind, PieceRotation};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{BlockDisplay, Tile};

/// Preview of a piece in its spawn rotation, used for NEXT and HOLD.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    piece: Option<PieceKind>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn piece(self, piece: Option<PieceKind>) -> Self {
        Self { piece, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        4 * BlockDisplay::width() + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        2 * BlockDisplay::height() + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Offsets of `kind` moved to the top-left corner, with the shape size.
fn normalized_cells(kind: PieceKind) -> (Vec<(i32, i32)>, (u16, u16)) {
    let offsets: Vec<_> = kind.occupied_offsets(PieceRotation::SPAWN).collect();
    let min_x = offsets.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = offsets.iter().map(|&(_, y)| y).min().unwrap_or(0);
    let cells: Vec<_> = offsets
        .into_iter()
        .map(|(x, y)| (x - min_x, y - min_y))
        .collect();
    let extent = |f: fn(&(i32, i32)) -> i32| {
        cells
            .iter()
            .map(f)
            .max()
            .map_or(0, |max| u16::try_from(max + 1).unwrap_or(0))
    };
    let size = (extent(|&(x, _)| x), extent(|&(_, y)| y));
    (cells, size)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let Some(piece) = self.piece else {
            return;
        };
        let (cells, (width, height)) = normalized_cells(piece);
        let piece_area = area.centered(
            Constraint::Length(width * BlockDisplay::width()),
            Constraint::Length(height * BlockDisplay::height()),
        );

        let col_constraints = (0..width).map(|_| Constraint::Length(BlockDisplay::width()));
        let row_constraints = (0..height).map(|_| Constraint::Length(BlockDisplay::height()));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let empty_block = BlockDisplay::from_tile(Tile::Empty, false);
        let occupied_block = BlockDisplay::from_tile(Tile::Piece(piece), false);
        for (y, grid_row) in (0..).zip(grid_rows) {
            for (x, grid_cell) in (0..).zip(grid_row) {
                let block = if cells.contains(&(x, y)) {
                    &occupied_block
                } else {
                    &empty_block
                };
                Widget::render(block, grid_cell, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_sizes() {
        assert_eq!(normalized_cells(PieceKind::I).1, (4, 1));
        assert_eq!(normalized_cells(PieceKind::O).1, (2, 2));
        assert_eq!(normalized_cells(PieceKind::T).1, (3, 2));

        let (cells, _) = normalized_cells(PieceKind::O);
        assert_eq!(cells, [(0, 0), (1, 0), (0, 1), (1, 1)]);
    }
}
