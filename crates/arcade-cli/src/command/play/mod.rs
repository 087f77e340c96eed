use std::path::PathBuf;

use anyhow::Context;
use arcade_engine::GameSession;
use arcade_scores::JsonScoreStore;

use crate::{
    command::{GameConfigArg, play::app::PlayApp},
    tui::Runtime,
};

mod app;
mod keymap;

pub(crate) const DEFAULT_SCORES_PATH: &str = "./data/scores.json";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// High score file
    #[clap(long, default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,
    /// Tick and render rate (frames per second)
    #[clap(long, default_value_t = 60)]
    fps: u32,
    #[clap(flatten)]
    game: GameConfigArg,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            scores: PathBuf::from(DEFAULT_SCORES_PATH),
            fps: 60,
            game: GameConfigArg::default(),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { scores, fps, game } = arg;

    let config = game.to_config()?;
    let store = JsonScoreStore::open(scores);
    if let Some(e) = store.last_error() {
        eprintln!("Warning: high scores unavailable, new records will not be saved: {e}");
    }

    let mut app = PlayApp::new(GameSession::new(config), store, *fps);
    Runtime::new()
        .run(&mut app)
        .context("Failed to run terminal UI")?;

    let stats = app.session().stats();
    eprintln!(
        "Final score: {} (level {}, {} lines)",
        stats.score(),
        stats.level(),
        stats.lines()
    );
    let store = app.into_store();
    if let Some(e) = store.last_error() {
        eprintln!("Warning: {e}");
    }
    Ok(())
}
