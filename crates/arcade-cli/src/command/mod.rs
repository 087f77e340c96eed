use std::path::PathBuf;

use arcade_engine::{GameConfig, KickTable, PieceSeed};
use clap::{Parser, Subcommand};

use self::{play::PlayArg, scores::ScoresArg, simulate::SimulateArg};
use crate::util;

mod play;
mod scores;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal (default)
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game with a scripted player and print the result as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print stored high scores
    Scores(#[clap(flatten)] ScoresArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Scores(arg) => scores::run(&arg)?,
    }
    Ok(())
}

/// Game settings shared by every command that runs a session.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct GameConfigArg {
    /// JSON file with a game config; flags below override its values
    #[clap(long)]
    config: Option<PathBuf>,
    /// Piece seed as 32 hex digits
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Rotation kick table (simplified or srs)
    #[clap(long)]
    kick_table: Option<KickTable>,
}

impl GameConfigArg {
    /// Builds the config: defaults, then the `--config` file, then flags.
    pub(crate) fn to_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("config", path)?,
            None => GameConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(kick_table) = self.kick_table {
            config.kick_table = kick_table;
        }
        Ok(config)
    }
}
