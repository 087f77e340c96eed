use std::iter;

use arcade_engine::{GameSnapshot, GameStats};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

pub struct StatsDisplay<'a> {
    snapshot: &'a GameSnapshot,
    stats: &'a GameStats,
    high_score: u64,
    status: &'a str,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot, stats: &'a GameStats) -> Self {
        Self {
            snapshot,
            stats,
            high_score: 0,
            status: "",
            block: None,
        }
    }

    /// Stored best score; the current score is shown instead once it is higher.
    pub fn high_score(self, high_score: u64) -> Self {
        Self { high_score, ..self }
    }

    /// Short message shown at the bottom of the panel.
    pub fn status(self, status: &'a str) -> Self {
        Self { status, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&StatsDisplay<'_>) -> String),
    LabelValue(&'static str, &'static dyn Fn(&StatsDisplay<'_>) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|display| display.snapshot.score.to_string()),
    Row::FullLabel("HIGH SCORE:"),
    Row::FullValue(&|display| display.high_score.max(display.snapshot.score).to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|display| {
        let dur = display.stats.play_time();
        format!(
            "{:0}:{:0>2}.{:0>2}",
            dur.as_secs() / 60,
            dur.as_secs() % 60,
            dur.subsec_millis() / 10
        )
    }),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|display| display.snapshot.level.to_string()),
    Row::LabelValue("LINES:", &|display| display.snapshot.lines.to_string()),
    Row::Empty,
    Row::LabelValue("PIECES:", &|display| {
        display.stats.completed_pieces().to_string()
    }),
    Row::LabelValue("SINGLES:", &|display| {
        display.stats.line_cleared_counter()[1].to_string()
    }),
    Row::LabelValue("DOUBLES:", &|display| {
        display.stats.line_cleared_counter()[2].to_string()
    }),
    Row::LabelValue("TRIPLES:", &|display| {
        display.stats.line_cleared_counter()[3].to_string()
    }),
    Row::LabelValue("TETRIS:", &|display| {
        display.stats.line_cleared_counter()[4].to_string()
    }),
    Row::Empty,
    Row::FullLabel("STATUS:"),
    Row::FullValue(&|display| {
        if display.status.is_empty() {
            display.snapshot.state.to_string().to_uppercase()
        } else {
            display.status.to_owned()
        }
    }),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
