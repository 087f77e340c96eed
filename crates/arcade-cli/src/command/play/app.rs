use std::time::Duration;

use arcade_engine::{GameOverReport, GameSession, SessionState};
use arcade_scores::ScoreStore;
use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::{
    command::play::keymap::KeyAction,
    tui::{App, Runtime},
    ui::widgets::{SessionDisplay, style},
};

/// Submits the final score of a finished game.
///
/// Returns `true` if it is a new high score.
pub(crate) fn report_game_over<S>(store: &mut S, report: &GameOverReport) -> bool
where
    S: ScoreStore,
{
    store.submit(&report.game_id, report.final_score)
}

/// Interactive play screen.
#[derive(Debug)]
pub(crate) struct PlayApp<S> {
    session: GameSession,
    store: S,
    fps: u32,
    high_score: u64,
    status: &'static str,
    reported: bool,
    is_exiting: bool,
}

impl<S> PlayApp<S>
where
    S: ScoreStore,
{
    pub(crate) fn new(session: GameSession, store: S, fps: u32) -> Self {
        let high_score = store.best(&session.config().game_id);
        Self {
            session,
            store,
            fps,
            high_score,
            status: "",
            reported: false,
            is_exiting: false,
        }
    }

    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    pub(crate) fn into_store(self) -> S {
        self.store
    }

    fn handle_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Command(command) => _ = self.session.apply(command),
            KeyAction::NewGame => self.new_game(),
            KeyAction::Quit => self.is_exiting = true,
        }
        self.check_game_over();
    }

    fn new_game(&mut self) {
        match self.session.state() {
            SessionState::Ready => {}
            SessionState::GameOver => {
                self.session.reset();
                self.high_score = self.store.best(&self.session.config().game_id);
                self.status = "";
                self.reported = false;
            }
            SessionState::Playing | SessionState::Paused => return,
        }
        _ = self.session.start();
    }

    fn check_game_over(&mut self) {
        if self.reported {
            return;
        }
        let Some(report) = self.session.game_over_report() else {
            return;
        };
        self.reported = true;
        if report_game_over(&mut self.store, &report) {
            self.high_score = report.final_score;
            self.status = "NEW HIGH SCORE!";
        }
    }
}

impl<S> App for PlayApp<S>
where
    S: ScoreStore,
{
    fn init(&mut self, runtime: &mut Runtime) {
        runtime.set_rate(self.fps);
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) {
        if let Some(event) = event.as_key_press_event()
            && let Some(action) = KeyAction::from_key_event(&event)
        {
            self.handle_action(action);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let session_display = SessionDisplay::new(&snapshot, self.session.stats())
            .high_score(self.high_score)
            .status(self.status);
        let help_text = match snapshot.state {
            SessionState::Ready => "Controls: Enter (Start) | Q (Quit)",
            SessionState::Playing => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | Space (Hard Drop) | ↑ Z X (Rotate) | C (Hold) | P (Pause) | Q (Quit)"
            }
            SessionState::Paused => "Controls: P (Resume) | Q (Quit)",
            SessionState::GameOver => "Controls: Enter (New Game) | Q (Quit)",
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(26), Constraint::Length(1)])
                .areas::<2>(frame.area());
        frame.render_widget(session_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    fn update(&mut self, _runtime: &mut Runtime, elapsed: Duration) {
        self.session.advance(elapsed);
        self.check_game_over();
    }
}

#[cfg(test)]
mod tests {
    use arcade_engine::{Command, PieceSeed};
    use arcade_scores::MemoryScoreStore;

    use super::*;

    fn app() -> PlayApp<MemoryScoreStore> {
        let session = GameSession::with_seed(PieceSeed::from_bytes([7; 16]));
        PlayApp::new(session, MemoryScoreStore::new(), 60)
    }

    fn play_until_game_over(app: &mut PlayApp<MemoryScoreStore>) {
        app.handle_action(KeyAction::NewGame);
        while !app.session().state().is_game_over() {
            app.handle_action(KeyAction::Command(Command::HardDrop));
        }
    }

    #[test]
    fn test_report_game_over_only_raises_best() {
        let mut store = MemoryScoreStore::new();
        let report = |final_score| GameOverReport {
            game_id: "tetris".to_owned(),
            final_score,
            lines: 0,
            level: 1,
        };
        assert!(report_game_over(&mut store, &report(120)));
        assert!(!report_game_over(&mut store, &report(80)));
        assert_eq!(store.best("tetris"), 120);
    }

    #[test]
    fn test_enter_starts_game() {
        let mut app = app();
        assert!(app.session().state().is_ready());
        app.handle_action(KeyAction::Command(Command::MoveLeft));
        assert!(app.session().state().is_ready());
        app.handle_action(KeyAction::NewGame);
        assert!(app.session().state().is_playing());
    }

    #[test]
    fn test_game_over_records_score_once() {
        let mut app = app();
        play_until_game_over(&mut app);

        let score = app.session().stats().score();
        assert!(score > 0);
        assert_eq!(app.high_score, score);
        assert_eq!(app.status, "NEW HIGH SCORE!");

        // Further events after game over do not submit again
        app.update(&mut Runtime::new(), Duration::from_secs(1));
        app.handle_action(KeyAction::Command(Command::HardDrop));
        assert!(app.reported);

        let store = app.into_store();
        assert_eq!(store.best("tetris"), score);
    }

    #[test]
    fn test_new_game_after_game_over() {
        let mut app = app();
        play_until_game_over(&mut app);
        let best = app.high_score;

        app.handle_action(KeyAction::NewGame);
        assert!(app.session().state().is_playing());
        assert_eq!(app.session().stats().score(), 0);
        assert_eq!(app.high_score, best);
        assert_eq!(app.status, "");
        assert!(!app.reported);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.should_exit());
        app.handle_action(KeyAction::Quit);
        assert!(app.should_exit());
    }
}
