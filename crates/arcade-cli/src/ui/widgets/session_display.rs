use arcade_engine::{GameSnapshot, GameStats, SessionState};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use crate::ui::widgets::{BoardDisplay, PieceDisplay, StatsDisplay, color, style};

/// Full play field: HOLD and STATS on the left, the board, NEXT on the right.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: &'a GameSnapshot,
    stats: &'a GameStats,
    high_score: u64,
    status: &'a str,
    show_ghost: bool,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot, stats: &'a GameStats) -> Self {
        Self {
            snapshot,
            stats,
            high_score: 0,
            status: "",
            show_ghost: true,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn high_score(self, high_score: u64) -> Self {
        Self { high_score, ..self }
    }

    pub fn status(self, status: &'a str) -> Self {
        Self { status, ..self }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = self.snapshot;
        let style = style::DEFAULT;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match snapshot.state {
            SessionState::Ready => color::CYAN,
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style)
        };

        let game_board = {
            let widget = BoardDisplay::new(&snapshot.board)
                .falling_piece(snapshot.active)
                .block(Block::bordered().border_style(border_style).style(style));
            if self.show_ghost && snapshot.state.is_playing() {
                widget.ghost(snapshot.ghost_piece())
            } else {
                widget
            }
        };
        let hold_panel = PieceDisplay::new()
            .piece(snapshot.held)
            .block(panel("HOLD"));
        let next_panel = PieceDisplay::new()
            .piece(Some(snapshot.next))
            .block(panel("NEXT"));
        let session_stats = StatsDisplay::new(snapshot, self.stats)
            .high_score(self.high_score)
            .status(self.status)
            .block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), session_stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(next_panel.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(session_stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(session_stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area] =
            Layout::vertical([Constraint::Length(next_panel.height())]).areas(right_column);

        let game_board_width = game_board.width();
        hold_panel.render(hold_area, buf);
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);

        let popup = match snapshot.state {
            SessionState::Playing => None,
            SessionState::Ready => Some((
                "PRESS ENTER",
                Style::new().fg(color::BLACK).bg(color::CYAN),
            )),
            SessionState::Paused => {
                Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW)))
            }
            SessionState::GameOver => {
                Some(("GAME OVER", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}
