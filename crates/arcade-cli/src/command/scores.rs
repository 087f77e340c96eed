use std::path::PathBuf;

use arcade_scores::{JsonScoreStore, ScoreTable};
use chrono::Local;

use crate::command::play::DEFAULT_SCORES_PATH;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoresArg {
    /// High score file
    #[clap(long, default_value = DEFAULT_SCORES_PATH)]
    scores: PathBuf,
}

pub(crate) fn run(arg: &ScoresArg) -> anyhow::Result<()> {
    let ScoresArg { scores } = arg;

    let store = JsonScoreStore::open(scores);
    if let Some(e) = store.last_error() {
        eprintln!("Warning: {e}");
    }
    for line in format_table(store.table()) {
        println!("{line}");
    }
    Ok(())
}

fn format_table(table: &ScoreTable) -> Vec<String> {
    let mut lines = vec![format!("{:<16} {:>10}  {}", "GAME", "SCORE", "ACHIEVED")];
    let records: Vec<_> = table.records().collect();
    if records.is_empty() {
        lines.push("(no scores yet)".to_owned());
    }
    for (game_id, record) in records {
        let achieved_at = record.achieved_at.with_timezone(&Local);
        lines.push(format!(
            "{game_id:<16} {:>10}  {}",
            record.score,
            achieved_at.format("%Y-%m-%d %H:%M")
        ));
    }
    lines
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};

    use super::*;

    #[test]
    fn test_format_table() {
        assert_eq!(format_table(&ScoreTable::new())[1], "(no scores yet)");

        let mut table = ScoreTable::new();
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        table.record("tetris", 1200, at);
        let lines = format_table(&table);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("tetris"));
        assert!(lines[1].contains("      1200  "));
    }
}
