use std::{cmp::Reverse, path::PathBuf};

use arcade_engine::{
    BOARD_HEIGHT, BOARD_WIDTH, Board, Command, CommandOutcome, GameSession, GameSnapshot,
    GameStats, KickTable, PieceSeed,
};
use serde::Serialize;

use crate::{command::GameConfigArg, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Stop after this many pieces have locked
    #[clap(long, default_value_t = 100)]
    pub(super) pieces: usize,
    /// Output file path (default: stdout)
    #[clap(long)]
    output: Option<PathBuf>,
    #[clap(flatten)]
    pub(super) game: GameConfigArg,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    seed: PieceSeed,
    kick_table: KickTable,
    snapshot: GameSnapshot,
    stats: &'a GameStats,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        pieces,
        output,
        game,
    } = arg;

    let mut config = game.to_config()?;
    let seed = *config.seed.get_or_insert_with(rand::random);
    let kick_table = config.kick_table;
    eprintln!("Simulating up to {pieces} pieces with seed {seed} ({kick_table} kicks)...");

    let session = simulate(GameSession::new(config), *pieces);
    let stats = session.stats();
    eprintln!(
        "Simulation finished: {} pieces, {} lines, score {} ({})",
        stats.completed_pieces(),
        stats.lines(),
        stats.score(),
        session.state()
    );

    let report = SimulationReport {
        seed,
        kick_table,
        snapshot: session.snapshot(),
        stats,
    };
    Output::save_json(&report, output.clone())?;
    Ok(())
}

/// Plays `session` with [`best_placement`] until `pieces` pieces have locked
/// or the game is over.
fn simulate(mut session: GameSession, pieces: usize) -> GameSession {
    _ = session.start();
    while session.state().is_playing() && session.stats().completed_pieces() < pieces {
        match best_placement(&session) {
            Some(next) => session = next,
            None => break,
        }
    }
    session
}

/// Tries every rotation and column for the falling piece and returns the
/// session after the best hard drop.
///
/// Placements are ranked by: not topping out, most lines cleared, fewest
/// holes, lowest aggregate height. Ties keep the first candidate.
fn best_placement(session: &GameSession) -> Option<GameSession> {
    (0..4)
        .flat_map(|rotations| (-5i32..=5).map(move |shift| (rotations, shift)))
        .filter_map(|(rotations, shift)| {
            let mut candidate = session.clone();
            for _ in 0..rotations {
                candidate.rotate().ok()?;
            }
            let step = if shift < 0 {
                Command::MoveLeft
            } else {
                Command::MoveRight
            };
            for _ in 0..shift.unsigned_abs() {
                candidate.apply(step).ok()?;
            }
            let CommandOutcome::Locked(outcome) = candidate.hard_drop().ok()? else {
                return None;
            };
            let board = candidate.field().board();
            let key = (
                outcome.topped_out,
                Reverse(outcome.lines_cleared),
                holes(board),
                aggregate_height(board),
            );
            Some((key, candidate))
        })
        .min_by_key(|(key, _)| *key)
        .map(|(_, candidate)| candidate)
}

/// Height of each column, counted from the floor to its top block.
fn column_heights(board: &Board) -> [usize; BOARD_WIDTH] {
    let mut heights = [0; BOARD_WIDTH];
    for (y, row) in board.rows().enumerate() {
        for (height, cell) in heights.iter_mut().zip(row.cells()) {
            if *height == 0 && !cell.is_empty() {
                *height = BOARD_HEIGHT - y;
            }
        }
    }
    heights
}

fn aggregate_height(board: &Board) -> usize {
    column_heights(board).iter().sum()
}

/// Number of empty cells with a block somewhere above them.
fn holes(board: &Board) -> usize {
    let heights = column_heights(board);
    board
        .rows()
        .enumerate()
        .flat_map(|(y, row)| {
            let heights = &heights;
            row.cells()
                .iter()
                .enumerate()
                .filter(move |&(x, cell)| cell.is_empty() && BOARD_HEIGHT - y < heights[x])
        })
        .count()
}
