//! Game configuration: pacing delays, naming and RNG seeding.
//!
//! The controller never hardcodes timings. Narration pacing is driven by the
//! delays below, so tests can shrink or fast-forward them.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Server-side game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Delay before a new participant's `join` is broadcast.
    pub join_delay_ms: u64,

    /// Delay between a move broadcast and turn advancement. Also paces the
    /// narration that follows a game start.
    pub move_delay_ms: u64,

    /// Delay before a bot's move is applied.
    pub bot_delay_ms: u64,

    /// Spacing of the cascading end-of-game messages.
    pub end_delay_ms: u64,

    /// Length of generated room codes.
    pub room_code_len: usize,

    /// Name given to humans who enter without one.
    pub default_human_name: String,

    /// Name given to bots.
    pub bot_name: String,

    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            join_delay_ms: 200,
            move_delay_ms: 2000,
            bot_delay_ms: 2000,
            end_delay_ms: 2000,
            room_code_len: 4,
            default_human_name: "Player".to_string(),
            bot_name: "Computer".to_string(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Set a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Scale every delay by `factor` (0.0 makes all callbacks immediate).
    pub fn with_pace(mut self, factor: f64) -> Self {
        let scale = |ms: u64| (ms as f64 * factor.max(0.0)).round() as u64;
        self.join_delay_ms = scale(self.join_delay_ms);
        self.move_delay_ms = scale(self.move_delay_ms);
        self.bot_delay_ms = scale(self.bot_delay_ms);
        self.end_delay_ms = scale(self.end_delay_ms);
        self
    }

    /// Set the room code length.
    pub fn with_room_code_len(mut self, len: usize) -> Self {
        self.room_code_len = len;
        self
    }

    #[must_use]
    pub fn join_delay(&self) -> Duration {
        Duration::from_millis(self.join_delay_ms)
    }

    #[must_use]
    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.move_delay_ms)
    }

    #[must_use]
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    #[must_use]
    pub fn end_delay(&self) -> Duration {
        Duration::from_millis(self.end_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.join_delay(), Duration::from_millis(200));
        assert_eq!(config.move_delay(), Duration::from_secs(2));
        assert_eq!(config.room_code_len, 4);
        assert_eq!(config.bot_name, "Computer");
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = GameConfig::default().with_seed(7).with_pace(0.5).with_room_code_len(6);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.join_delay_ms, 100);
        assert_eq!(config.end_delay_ms, 1000);
        assert_eq!(config.room_code_len, 6);

        let instant = GameConfig::default().with_pace(0.0);
        assert_eq!(instant.move_delay(), Duration::ZERO);
    }

    #[test]
    fn test_serialization() {
        let config = GameConfig::default().with_seed(3);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
