//! Tunable gameplay settings shared by the world and every system.

use serde::{Deserialize, Serialize};

use crate::{tables, GameMode, PerPlayer, Rect, Tunable};

/// Difficulty tier selected before a session starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SpeedupScale {
    /// Gentle per-level speed-up.
    #[default]
    Easy,
    /// Faster speed-up and tougher bosses.
    Medium,
    /// Fastest speed-up and the toughest bosses.
    Hard,
}

impl SpeedupScale {
    /// Resolves a tier from its key, falling back to [`SpeedupScale::Easy`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "medium" => Self::Medium,
            "hard" => Self::Hard,
            _ => Self::Easy,
        }
    }

    /// Canonical key of the tier.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Alien speed added at every level advance.
    #[must_use]
    pub const fn alien_speedup(self) -> f32 {
        match self {
            Self::Easy => 0.3,
            Self::Medium => 0.5,
            Self::Hard => 0.7,
        }
    }
}

impl From<String> for SpeedupScale {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<SpeedupScale> for String {
    fn from(scale: SpeedupScale) -> Self {
        scale.key().to_owned()
    }
}

/// Process-wide tunables read and mutated by the game mode rules.
///
/// Speeds are expressed in screen units per reference frame. Missing fields
/// fall back to their defaults when deserialising partial overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Playfield width.
    pub screen_width: f32,
    /// Playfield height.
    pub screen_height: f32,
    /// Difficulty tier.
    pub speedup_scale: SpeedupScale,
    /// Steering speed per ship.
    pub ship_speed: PerPlayer<f32>,
    /// Bullet speed per ship.
    pub bullet_speed: PerPlayer<f32>,
    /// Bullets a ship may have in flight at once.
    pub bullets_allowed: PerPlayer<u32>,
    /// Bullets fired per volley.
    pub bullet_count: PerPlayer<u32>,
    /// Missile speed.
    pub missile_speed: f32,
    /// Hit points each ship starts with.
    pub starting_health: i32,
    /// Upper bound for health restored by powers.
    pub max_health: i32,
    /// Missiles each ship starts every level with.
    pub starting_missiles: u32,
    /// Laser charges each ship starts with.
    pub starting_lasers: u32,
    /// Horizontal fleet speed.
    pub alien_speed: f32,
    /// Upper bound for the level-driven alien speed-up.
    pub max_alien_speed: f32,
    /// Alien bullet speed.
    pub alien_bullet_speed: f32,
    /// Distance the fleet drops when it reverses.
    pub fleet_drop_speed: f32,
    /// Score credited per fleet alien.
    pub alien_points: u64,
    /// Multiplier applied to `alien_points` at every level advance.
    pub score_scale: f32,
    /// Upper bound for `alien_points`.
    pub max_alien_points: u64,
    /// Hits required to destroy the current boss.
    pub boss_hp: u32,
    /// Score credited for the current boss.
    pub boss_points: u64,
    /// Falling speed of asteroids.
    pub asteroid_speed: f32,
    /// Milliseconds between asteroid spawns.
    pub asteroid_frequency_ms: f32,
    /// Falling speed of powers.
    pub power_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: tables::SCREEN_WIDTH,
            screen_height: tables::SCREEN_HEIGHT,
            speedup_scale: SpeedupScale::Easy,
            ship_speed: PerPlayer::splat(3.5),
            bullet_speed: PerPlayer::splat(5.0),
            bullets_allowed: PerPlayer::splat(3),
            bullet_count: PerPlayer::splat(1),
            missile_speed: 5.0,
            starting_health: 3,
            max_health: 5,
            starting_missiles: 3,
            starting_lasers: 0,
            alien_speed: 1.0,
            max_alien_speed: 4.0,
            alien_bullet_speed: 1.5,
            fleet_drop_speed: 10.0,
            alien_points: 50,
            score_scale: 1.2,
            max_alien_points: 3_000,
            boss_hp: 50,
            boss_points: 2_500,
            asteroid_speed: 1.5,
            asteroid_frequency_ms: 1_000.0,
            power_speed: 1.5,
        }
    }
}

impl Settings {
    /// Rectangle covering the playfield.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_xywh(0.0, 0.0, self.screen_width, self.screen_height)
    }

    /// Current value of a tunable setting.
    #[must_use]
    pub fn tunable(&self, tunable: Tunable) -> f32 {
        match tunable {
            Tunable::AlienSpeed => self.alien_speed,
            Tunable::AlienBulletSpeed => self.alien_bullet_speed,
            Tunable::ShipSpeed(player) => self.ship_speed[player],
            Tunable::BulletSpeed(player) => self.bullet_speed[player],
            Tunable::AsteroidSpeed => self.asteroid_speed,
            Tunable::AsteroidFrequency => self.asteroid_frequency_ms,
        }
    }

    /// Mutable access to a tunable setting.
    pub fn tunable_mut(&mut self, tunable: Tunable) -> &mut f32 {
        match tunable {
            Tunable::AlienSpeed => &mut self.alien_speed,
            Tunable::AlienBulletSpeed => &mut self.alien_bullet_speed,
            Tunable::ShipSpeed(player) => &mut self.ship_speed[player],
            Tunable::BulletSpeed(player) => &mut self.bullet_speed[player],
            Tunable::AsteroidSpeed => &mut self.asteroid_speed,
            Tunable::AsteroidFrequency => &mut self.asteroid_frequency_ms,
        }
    }

    /// Applies the per-mode overrides used when a session starts.
    pub fn apply_mode_defaults(&mut self, mode: GameMode) {
        if mode == GameMode::MeteorMadness {
            self.asteroid_frequency_ms = 600.0;
        }
    }
}
