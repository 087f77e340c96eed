use serde::{Deserialize, Serialize};

use crate::{KickTable, PieceSeed};

/// Game id used for high scores when none is configured.
pub const DEFAULT_GAME_ID: &str = "tetris";

/// Settings for a [`GameSession`](super::GameSession).
///
/// Every field has a default, so a JSON config only needs the keys it
/// overrides:
///
/// ```
/// use arcade_engine::{GameConfig, KickTable};
///
/// let config: GameConfig = serde_json::from_str(r#"{ "kick_table": "srs" }"#).unwrap();
/// assert_eq!(config.kick_table, KickTable::Srs);
/// assert_eq!(config.game_id, "tetris");
/// assert_eq!(config.seed, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Key under which high scores are stored.
    pub game_id: String,
    pub kick_table: KickTable,
    /// Seed for the piece bag. A random seed is drawn when `None`.
    pub seed: Option<PieceSeed>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            game_id: DEFAULT_GAME_ID.to_owned(),
            kick_table: KickTable::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_from_json() {
        let json = r#"{
            "game_id": "tetris-srs",
            "kick_table": "srs",
            "seed": "000102030405060708090a0b0c0d0e0f"
        }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.game_id, "tetris-srs");
        assert_eq!(config.kick_table, KickTable::Srs);
        assert_eq!(
            config.seed,
            Some(PieceSeed::from_bytes([
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15
            ]))
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<GameConfig>(r#"{ "speed": 3 }"#).is_err());
        assert!(serde_json::from_str::<GameConfig>(r#"{ "kick_table": "ars" }"#).is_err());
    }
}
