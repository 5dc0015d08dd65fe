//! Session configuration loaded by adapters before the first frame.

use alien_onslaught_core::{GameMode, Settings, SpeedupScale};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parameters chosen before a session starts.
///
/// Every field has a default, so a configuration file only needs the keys it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ruleset of the session. Unknown keys fall back to normal mode.
    pub mode: GameMode,
    /// Difficulty tier.
    pub difficulty: SpeedupScale,
    /// Number of ships taking part, one or two.
    pub players: u8,
    /// Seed of the spawning random stream.
    pub seed: u64,
    /// Wall time represented by one frame when the clock is driven manually.
    pub frame_duration_ms: u64,
    /// Tunable overrides applied on top of the defaults.
    pub settings: Settings,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::Normal,
            difficulty: SpeedupScale::Easy,
            players: 1,
            seed: 0x5eed,
            frame_duration_ms: 16,
            settings: Settings::default(),
        }
    }
}

impl SessionConfig {
    /// Checks the values a session cannot recover from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.settings.screen_width;
        let height = self.settings.screen_height;
        let usable = |value: f32| value.is_finite() && value > 0.0;
        if !usable(width) || !usable(height) {
            return Err(ConfigError::InvalidScreen { width, height });
        }
        if self.frame_duration_ms == 0 {
            return Err(ConfigError::ZeroFrameDuration);
        }
        if !(1..=2).contains(&self.players) {
            return Err(ConfigError::InvalidPlayers {
                players: self.players,
            });
        }
        if self.mode.is_pvp() && self.players != 2 {
            return Err(ConfigError::PvpNeedsTwoPlayers { mode: self.mode });
        }
        Ok(())
    }

    /// Reports whether only Thunderbird takes part.
    #[must_use]
    pub fn singleplayer(&self) -> bool {
        self.players == 1
    }

    /// Settings the world starts from, with the difficulty tier applied.
    #[must_use]
    pub fn starting_settings(&self) -> Settings {
        Settings {
            speedup_scale: self.difficulty,
            ..self.settings.clone()
        }
    }
}

/// Errors raised while validating a [`SessionConfig`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The playfield has no usable area.
    #[error("screen size must be positive (received {width}x{height})")]
    InvalidScreen {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// Manually driven clocks need a non-zero step.
    #[error("frame duration must be positive")]
    ZeroFrameDuration,
    /// Only one or two ships exist.
    #[error("players must be 1 or 2 (received {players})")]
    InvalidPlayers {
        /// Configured ship count.
        players: u8,
    },
    /// Player versus player modes need both ships.
    #[error("{} needs two players", .mode.key())]
    PvpNeedsTwoPlayers {
        /// Configured mode.
        mode: GameMode,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SessionConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_unplayable_values() {
        let mut config = SessionConfig::default();
        config.settings.screen_width = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScreen { .. })
        ));

        let config = SessionConfig {
            frame_duration_ms: 0,
            ..SessionConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFrameDuration));

        let config = SessionConfig {
            players: 3,
            ..SessionConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPlayers { players: 3 })
        );
    }

    #[test]
    fn player_versus_player_needs_both_ships() {
        let config = SessionConfig {
            mode: GameMode::CosmicConflict,
            ..SessionConfig::default()
        };
        let error = config.validate().expect_err("one ship cannot duel");
        assert_eq!(error.to_string(), "cosmic_conflict needs two players");
    }

    #[test]
    fn difficulty_overrides_the_settings_tier() {
        let config = SessionConfig {
            difficulty: SpeedupScale::Hard,
            ..SessionConfig::default()
        };
        assert_eq!(config.starting_settings().speedup_scale, SpeedupScale::Hard);
    }
}
