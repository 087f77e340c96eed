use arcade_engine::Command;
use crossterm::event::{KeyCode, KeyEvent};

/// What a key press asks the play screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum KeyAction {
    Command(Command),
    /// Start the first game, or a new one after game over.
    NewGame,
    Quit,
}

impl KeyAction {
    pub(super) fn from_key_event(event: &KeyEvent) -> Option<Self> {
        let action = match event.code {
            KeyCode::Left | KeyCode::Char('a' | 'A') => Self::Command(Command::MoveLeft),
            KeyCode::Right | KeyCode::Char('d' | 'D') => Self::Command(Command::MoveRight),
            KeyCode::Down | KeyCode::Char('s' | 'S') => Self::Command(Command::SoftDrop),
            KeyCode::Up | KeyCode::Char('w' | 'W' | 'z' | 'Z') => Self::Command(Command::Rotate),
            KeyCode::Char('x' | 'X') => Self::Command(Command::RotateCounterclockwise),
            KeyCode::Char(' ') => Self::Command(Command::HardDrop),
            KeyCode::Char('c' | 'C') => Self::Command(Command::Hold),
            KeyCode::Char('p' | 'P') => Self::Command(Command::TogglePause),
            KeyCode::Enter => Self::NewGame,
            KeyCode::Char('q' | 'Q') | KeyCode::Esc => Self::Quit,
            _ => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn action(code: KeyCode) -> Option<KeyAction> {
        KeyAction::from_key_event(&KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_and_letter_keys_agree() {
        let pairs = [
            (KeyCode::Left, 'a'),
            (KeyCode::Right, 'd'),
            (KeyCode::Down, 's'),
            (KeyCode::Up, 'w'),
        ];
        for (arrow, letter) in pairs {
            assert!(action(arrow).is_some());
            assert_eq!(action(arrow), action(KeyCode::Char(letter)));
            assert_eq!(
                action(arrow),
                action(KeyCode::Char(letter.to_ascii_uppercase()))
            );
        }
    }

    #[test]
    fn test_bindings() {
        assert_eq!(
            action(KeyCode::Char('z')),
            Some(KeyAction::Command(Command::Rotate))
        );
        assert_eq!(
            action(KeyCode::Char('x')),
            Some(KeyAction::Command(Command::RotateCounterclockwise))
        );
        assert_eq!(
            action(KeyCode::Char(' ')),
            Some(KeyAction::Command(Command::HardDrop))
        );
        assert_eq!(
            action(KeyCode::Char('c')),
            Some(KeyAction::Command(Command::Hold))
        );
        assert_eq!(
            action(KeyCode::Char('p')),
            Some(KeyAction::Command(Command::TogglePause))
        );
        assert_eq!(action(KeyCode::Enter), Some(KeyAction::NewGame));
        assert_eq!(action(KeyCode::Esc), Some(KeyAction::Quit));
        assert_eq!(action(KeyCode::Char('Q')), Some(KeyAction::Quit));
        assert_eq!(action(KeyCode::Char('k')), None);
    }
}
