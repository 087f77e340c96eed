use std::time::Duration;

use serde::Serialize;

use crate::{CommandError, HoldError, PieceSeed, RotationDirection};

use super::{
    Command, CommandOutcome, GameConfig, GameField, GameOverReport, GameSnapshot, GameStats,
    LockOutcome, PieceBag,
};

/// Lifecycle state of a [`GameSession`].
///
/// ```text
/// Ready --start--> Playing <--pause/resume--> Paused
///                     |
///                  top out
///                     v
///                  GameOver
/// ```
///
/// `reset` returns to `Ready` from any state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[display("ready")]
    Ready,
    #[display("playing")]
    Playing,
    #[display("paused")]
    Paused,
    #[display("game over")]
    GameOver,
}

/// A single game: field, statistics, state machine and gravity timer.
///
/// All commands are synchronous `&mut self` methods that either apply fully or
/// change nothing. Gravity is driven externally through [`Self::advance`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use arcade_engine::{GameSession, PieceSeed, SessionState};
///
/// let mut session = GameSession::with_seed(PieceSeed::from_bytes([1; 16]));
/// assert_eq!(session.state(), SessionState::Ready);
///
/// session.start().unwrap();
/// session.move_left().unwrap();
///
/// // One second of gravity at level 1 moves the piece down one row
/// assert_eq!(session.advance(Duration::from_secs(1)), 1);
/// assert_eq!(session.snapshot().active.position().y(), 1);
///
/// session.hard_drop().unwrap();
/// assert_eq!(session.stats().completed_pieces(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    field: GameField,
    stats: GameStats,
    state: SessionState,
    gravity_elapsed: Duration,
    last_lock: Option<LockOutcome>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameSession {
    /// Creates a session in the [`Ready`](SessionState::Ready) state.
    ///
    /// Uses `config.seed` for the piece bag, or a random seed if it is `None`.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let bag = config.seed.map_or_else(PieceBag::new, PieceBag::with_seed);
        Self {
            config,
            field: GameField::new(bag),
            stats: GameStats::new(),
            state: SessionState::Ready,
            gravity_elapsed: Duration::ZERO,
            last_lock: None,
        }
    }

    /// Like [`Self::new`] with the default config and a specific seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::new(GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the outcome of the most recent lock, if any piece has locked
    /// since the session was created or reset.
    #[must_use]
    pub fn last_lock(&self) -> Option<&LockOutcome> {
        self.last_lock.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            game_id: self.config.game_id.clone(),
            state: self.state,
            board: self.field.board().clone(),
            active: self.field.falling_piece(),
            next: self.field.next_piece(),
            held: self.field.held_piece(),
            can_hold: self.field.can_hold(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.lines(),
            drop_interval: self.stats.drop_interval(),
        }
    }

    /// Returns the final result once the game is over.
    #[must_use]
    pub fn game_over_report(&self) -> Option<GameOverReport> {
        self.state.is_game_over().then(|| GameOverReport {
            game_id: self.config.game_id.clone(),
            final_score: self.stats.score(),
            lines: self.stats.lines(),
            level: self.stats.level(),
        })
    }

    /// Applies a queued command.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, CommandError> {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop(),
            Command::HardDrop => self.hard_drop(),
            Command::Rotate => self.rotate(),
            Command::RotateCounterclockwise => self.rotate_counterclockwise(),
            Command::Hold => self.hold(),
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => Ok(self.reset()),
        }
    }

    pub fn start(&mut self) -> Result<CommandOutcome, CommandError> {
        self.transition(SessionState::Ready, SessionState::Playing)
    }

    pub fn pause(&mut self) -> Result<CommandOutcome, CommandError> {
        self.transition(SessionState::Playing, SessionState::Paused)
    }

    pub fn resume(&mut self) -> Result<CommandOutcome, CommandError> {
        self.transition(SessionState::Paused, SessionState::Playing)
    }

    pub fn toggle_pause(&mut self) -> Result<CommandOutcome, CommandError> {
        match self.state {
            SessionState::Playing => self.pause(),
            SessionState::Paused => self.resume(),
            state => Err(CommandError::NotAllowed { state }),
        }
    }

    /// Returns to [`Ready`](SessionState::Ready) with an empty board, zeroed
    /// statistics, no held piece and a fresh bag.
    ///
    /// The piece generator's random stream continues; it is not re-seeded.
    pub fn reset(&mut self) -> CommandOutcome {
        self.field.reset();
        self.stats = GameStats::new();
        self.state = SessionState::Ready;
        self.gravity_elapsed = Duration::ZERO;
        self.last_lock = None;
        CommandOutcome::StateChanged(SessionState::Ready)
    }

    pub fn move_left(&mut self) -> Result<CommandOutcome, CommandError> {
        self.shift(-1)
    }

    pub fn move_right(&mut self) -> Result<CommandOutcome, CommandError> {
        self.shift(1)
    }

    /// Moves the piece down one row for 1 point, or locks it if it cannot descend.
    pub fn soft_drop(&mut self) -> Result<CommandOutcome, CommandError> {
        self.ensure_playing()?;
        if self.field.try_shift(0, 1).is_ok() {
            self.stats.add_soft_drop(1);
            return Ok(CommandOutcome::Moved);
        }
        Ok(CommandOutcome::Locked(self.lock()))
    }

    /// Drops the piece as far as it goes, awarding 2 points per row, and locks it.
    pub fn hard_drop(&mut self) -> Result<CommandOutcome, CommandError> {
        self.ensure_playing()?;
        let mut cells = 0;
        while self.field.try_shift(0, 1).is_ok() {
            cells += 1;
        }
        self.stats.add_hard_drop(cells);
        Ok(CommandOutcome::Locked(self.lock()))
    }

    pub fn rotate(&mut self) -> Result<CommandOutcome, CommandError> {
        self.rotate_towards(RotationDirection::Clockwise)
    }

    pub fn rotate_counterclockwise(&mut self) -> Result<CommandOutcome, CommandError> {
        self.rotate_towards(RotationDirection::CounterClockwise)
    }

    /// Swaps the falling piece with the held piece, once per lock.
    ///
    /// If the incoming piece does not fit at the spawn origin the game ends
    /// and `StateChanged(GameOver)` is returned.
    pub fn hold(&mut self) -> Result<CommandOutcome, CommandError> {
        self.ensure_playing()?;
        match self.field.try_hold() {
            Ok(()) => Ok(CommandOutcome::Moved),
            Err(HoldError::HoldAlreadyUsed) => Err(CommandError::HoldAlreadyUsed),
            Err(HoldError::TopOut) => {
                self.game_over();
                Ok(CommandOutcome::StateChanged(SessionState::GameOver))
            }
        }
    }

    /// Advances the gravity timer by `elapsed` and returns the number of
    /// gravity steps applied.
    ///
    /// Time only accumulates while playing. Each time the accumulated time
    /// reaches the current drop interval the piece moves down one row (or
    /// locks), and the interval is subtracted. The interval is re-read after
    /// every step, so a level-up mid-catch-up speeds up the remaining steps.
    ///
    /// A step fires as soon as the accumulated time equals the interval, one
    /// tick earlier than a strict "elapsed exceeds interval" timer. Exactly
    /// `floor(total / interval)` steps are applied for a run of ticks.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.state.is_playing() {
            return 0;
        }
        self.stats.add_play_time(elapsed);
        self.gravity_elapsed = self.gravity_elapsed.saturating_add(elapsed);

        let mut steps = 0;
        while self.state.is_playing() {
            let interval = self.stats.drop_interval();
            if self.gravity_elapsed < interval {
                break;
            }
            self.gravity_elapsed -= interval;
            steps += 1;
            if self.field.try_shift(0, 1).is_err() {
                self.lock();
            }
        }
        steps
    }

    fn transition(
        &mut self,
        from: SessionState,
        to: SessionState,
    ) -> Result<CommandOutcome, CommandError> {
        if self.state != from {
            return Err(CommandError::NotAllowed { state: self.state });
        }
        self.state = to;
        Ok(CommandOutcome::StateChanged(to))
    }

    fn ensure_playing(&self) -> Result<(), CommandError> {
        if self.state.is_playing() {
            Ok(())
        } else {
            Err(CommandError::NotAllowed { state: self.state })
        }
    }

    fn shift(&mut self, dx: i32) -> Result<CommandOutcome, CommandError> {
        self.ensure_playing()?;
        self.field
            .try_shift(dx, 0)
            .map_err(|_| CommandError::Blocked)?;
        Ok(CommandOutcome::Moved)
    }

    fn rotate_towards(
        &mut self,
        direction: RotationDirection,
    ) -> Result<CommandOutcome, CommandError> {
        self.ensure_playing()?;
        self.field
            .try_rotate(direction, self.config.kick_table)
            .map_err(|_| CommandError::Blocked)?;
        Ok(CommandOutcome::Moved)
    }

    fn lock(&mut self) -> LockOutcome {
        let (cleared, spawned) = self.field.complete_piece_drop();
        let mut outcome = self.stats.complete_piece_drop(cleared);
        if spawned.is_err() {
            outcome.topped_out = true;
            self.game_over();
        }
        self.last_lock = Some(outcome.clone());
        outcome
    }

    fn game_over(&mut self) {
        self.state = SessionState::GameOver;
        self.gravity_elapsed = Duration::ZERO;
    }

    #[cfg(test)]
    pub(crate) fn field_mut(&mut self) -> &mut GameField {
        &mut self.field
    }
}
