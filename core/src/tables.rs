//! Fixed gameplay tables: entity dimensions, timers, level-keyed stats and
//! mode constants.

use std::time::Duration;

use glam::Vec2;

use crate::{BossStats, EffectKind, PowerKind, Rect, WeaponKind};

/// Simulation rate that all per-frame speeds are expressed against.
pub const REFERENCE_FPS: f32 = 60.0;

/// Default playfield width.
pub const SCREEN_WIDTH: f32 = 1260.0;
/// Default playfield height.
pub const SCREEN_HEIGHT: f32 = 700.0;

/// Hitbox of an unscaled ship.
pub const SHIP_SIZE: Vec2 = Vec2::new(60.0, 60.0);
/// Hitbox of a fleet alien.
pub const ALIEN_SIZE: Vec2 = Vec2::new(50.0, 50.0);
/// Hitbox of a boss alien.
pub const BOSS_SIZE: Vec2 = Vec2::new(180.0, 140.0);
/// Hitbox of an asteroid.
pub const ASTEROID_SIZE: Vec2 = Vec2::new(60.0, 60.0);
/// Hitbox of a falling power.
pub const POWER_SIZE: Vec2 = Vec2::new(30.0, 30.0);
/// Hitbox of a flying missile.
pub const MISSILE_SIZE: Vec2 = Vec2::new(12.0, 30.0);
/// Hitbox of an alien bullet.
pub const ALIEN_BULLET_SIZE: Vec2 = Vec2::new(10.0, 20.0);
/// Width of a laser beam; the beam spans from the ship to the screen edge.
pub const LASER_WIDTH: f32 = 30.0;
/// Extra reach of an active shield around the ship hitbox.
pub const SHIELD_PADDING: Vec2 = Vec2::new(20.0, 20.0);
/// Hitbox multiplier applied while a ship carries the scale penalty.
pub const SCALED_SHIP_FACTOR: f32 = 1.5;
/// Horizontal gap between bullets fired in a single volley.
pub const BULLET_SPREAD: f32 = 20.0;

/// Immunity granted after a ship takes a hit.
pub const SHIP_IMMUNITY: Duration = Duration::from_secs(3);
/// Length of the ship explosion animation.
pub const SHIP_EXPLOSION: Duration = Duration::from_millis(800);
/// Length of the warp animation played when a level starts.
pub const SHIP_WARP: Duration = Duration::from_secs(1);
/// How long the empowered glow lasts after a pickup.
pub const EMPOWER_DURATION: Duration = Duration::from_secs(1);
/// Immunity window of freshly spawned aliens.
pub const ALIEN_SPAWN_IMMUNITY: Duration = Duration::from_secs(1);
/// Lifetime of an unused shield.
pub const SHIELD_DURATION: Duration = Duration::from_secs(20);
/// Length of the invincibility power.
pub const INVINCIBILITY_DURATION: Duration = Duration::from_secs(10);
/// Length of the alien freeze power.
pub const FREEZE_DURATION: Duration = Duration::from_secs(5);
/// Length of the reverse, disarm and scale penalties.
pub const PENALTY_DURATION: Duration = Duration::from_secs(15);
/// Lifetime of a laser beam.
pub const LASER_DURATION: Duration = Duration::from_millis(300);
/// Duration of a single missile explosion frame.
pub const EXPLOSION_FRAME_DURATION: Duration = Duration::from_millis(50);
/// Number of frames in the missile explosion animation.
pub const MISSILE_EXPLOSION_FRAMES: u32 = 6;
/// Explosion hitbox at frame zero.
pub const EXPLOSION_BASE_SIZE: Vec2 = Vec2::new(60.0, 60.0);
/// Growth of the explosion hitbox per frame.
pub const EXPLOSION_GROWTH: Vec2 = Vec2::new(30.0, 30.0);
/// Interval between power spawns.
pub const POWER_INTERVAL: Duration = Duration::from_secs(10);

/// Hits a boss takes from one missile explosion.
pub const MISSILE_BOSS_DAMAGE: u32 = 5;
/// Hits a boss takes from one laser beam.
pub const LASER_BOSS_DAMAGE: u32 = 3;
/// Upper bound for bullets a ship may have in flight.
pub const MAX_BULLETS_ALLOWED: u32 = 8;
/// Upper bound for bullets fired per volley.
pub const MAX_BULLET_COUNT: u32 = 3;
/// Upper bound for stored missiles.
pub const MAX_MISSILES: u32 = 5;
/// Upper bound for stored laser charges.
pub const MAX_LASERS: u32 = 3;
/// Speed bonus granted by speed powers.
pub const POWER_SPEED_BONUS: f32 = 0.3;
/// Alien speed bonus applied by the alien upgrade penalty.
pub const ALIEN_UPGRADE_BONUS: f32 = 0.2;
/// Multiple of `alien_points` awarded by the bonus points power.
pub const BONUS_POINTS_FACTOR: u64 = 20;

/// Level from which normal-mode games start dropping asteroids.
pub const ASTEROID_START_LEVEL: u32 = 7;
/// Level at which dead ships are revived in multiplayer normal games.
pub const REVIVE_LEVEL: u32 = 21;
/// Alien population ceiling kept by Endless Onslaught.
pub const ENDLESS_MAX_ALIENS: usize = 50;
/// Rows spawned by each Endless Onslaught top-up.
pub const ENDLESS_BATCH_ROWS: u32 = 1;
/// Minimum gap between Endless Onslaught top-ups.
pub const ENDLESS_TOP_UP_INTERVAL: Duration = Duration::from_secs(5);
/// Interval between Endless Onslaught speed ramps.
pub const ENDLESS_INTERVAL: Duration = Duration::from_secs(120);
/// Alien and alien bullet speed added by each Endless Onslaught ramp.
pub const ENDLESS_SPEED_INCREMENT: f32 = 0.3;
/// Interval between Slow Burn speed decays.
pub const SLOW_BURN_INTERVAL: Duration = Duration::from_secs(120);
/// Ship and bullet speed removed by each Slow Burn decay.
pub const SLOW_BURN_DECREMENT: f32 = 0.4;
/// Lowest ship or bullet speed reachable in Slow Burn.
pub const SLOW_BURN_FLOOR: f32 = 2.0;
/// Interval between Meteor Madness level advances.
pub const METEOR_LEVEL_INTERVAL: Duration = Duration::from_secs(60);
/// Score awarded by every Meteor Madness level advance.
pub const METEOR_LEVEL_BONUS: u64 = 3000;
/// Asteroid speed added by every Meteor Madness level advance.
pub const METEOR_SPEED_INCREMENT: f32 = 0.3;
/// Asteroid spawn interval removed by every Meteor Madness level advance.
pub const METEOR_FREQUENCY_DECREMENT_MS: f32 = 100.0;
/// Shortest asteroid spawn interval in Meteor Madness.
pub const METEOR_FREQUENCY_FLOOR_MS: f32 = 300.0;
/// Final boss level of Boss Rush.
pub const BOSS_RUSH_FINAL_LEVEL: u32 = 15;
/// Boss Rush level after which bosses fire faster.
pub const BOSS_RUSH_FAST_FIRE_LEVEL: u32 = 10;
/// Score awarded for landing a hit on the opposing ship in Cosmic Conflict.
pub const PVP_HIT_POINTS: u64 = 1000;
/// Score removed from every ship when an alien escapes in Cosmic Conflict.
pub const PVP_ESCAPE_PENALTY: u64 = 500;

/// Boss HP bonus in normal games on medium difficulty.
pub const NORMAL_BOSS_MEDIUM_BONUS: u32 = 25;
/// Boss HP bonus in normal games on hard difficulty.
pub const NORMAL_BOSS_HARD_BONUS: u32 = 45;
/// Boss HP bonus in Boss Rush on medium difficulty.
pub const BOSS_RUSH_MEDIUM_BONUS: u32 = 15;
/// Boss HP bonus in Boss Rush on hard difficulty.
pub const BOSS_RUSH_HARD_BONUS: u32 = 25;

/// Alien hit thresholds keyed by the first level they apply to, highest first.
pub const ALIENS_HP_MAP: [(u32, u32); 2] = [(20, 5), (12, 4)];
/// Alien hit threshold for levels not listed in [`ALIENS_HP_MAP`].
pub const DEFAULT_ALIEN_HP: u32 = 3;

/// Levels that replace the fleet with a single boss outside Boss Rush.
pub const NORMAL_BOSS_LEVELS: [u32; 6] = [5, 10, 15, 20, 25, 30];

const NORMAL_BOSS_TABLE: [(u32, BossStats); 6] = [
    (5, BossStats::new(40, 2_500)),
    (10, BossStats::new(60, 4_000)),
    (15, BossStats::new(80, 6_000)),
    (20, BossStats::new(100, 8_000)),
    (25, BossStats::new(125, 10_000)),
    (30, BossStats::new(150, 15_000)),
];

/// Powers that may fall, drawn uniformly by the spawner.
pub const POWER_POOL: [PowerKind; 19] = [
    PowerKind::Health,
    PowerKind::Weapon(WeaponKind::Bolt),
    PowerKind::Weapon(WeaponKind::Firebird),
    PowerKind::Weapon(WeaponKind::Starburst),
    PowerKind::Effect(EffectKind::ShipSpeed),
    PowerKind::Effect(EffectKind::BulletSpeed),
    PowerKind::Effect(EffectKind::BulletsAllowed),
    PowerKind::Effect(EffectKind::BulletCount),
    PowerKind::Effect(EffectKind::Shield),
    PowerKind::Effect(EffectKind::FreezeAliens),
    PowerKind::Effect(EffectKind::Invincibility),
    PowerKind::Effect(EffectKind::BonusPoints),
    PowerKind::Effect(EffectKind::ExtraMissile),
    PowerKind::Effect(EffectKind::LaserCharge),
    PowerKind::Effect(EffectKind::ReverseKeys),
    PowerKind::Effect(EffectKind::Disarm),
    PowerKind::Effect(EffectKind::FewerBullets),
    PowerKind::Effect(EffectKind::ScaleShip),
    PowerKind::Effect(EffectKind::AlienUpgrade),
];

const DEFAULT_BOSS: BossStats = BossStats::new(50, 2_500);

const FLEET_ROWS: [(u32, u32); 4] = [(16, 5), (9, 4), (4, 3), (1, 2)];

/// Hit threshold of a fleet alien on the provided level.
#[must_use]
pub fn alien_hp_for_level(level: u32) -> u32 {
    ALIENS_HP_MAP
        .iter()
        .find(|(first_level, _)| level >= *first_level)
        .map_or(DEFAULT_ALIEN_HP, |(_, hp)| *hp)
}

/// Reports whether `level` is a boss level outside Boss Rush.
#[must_use]
pub fn is_normal_boss_level(level: u32) -> bool {
    NORMAL_BOSS_LEVELS.contains(&level)
}

/// Base boss stats for a normal-mode boss level, before difficulty bonuses.
#[must_use]
pub fn normal_boss_base(level: u32) -> BossStats {
    NORMAL_BOSS_TABLE
        .iter()
        .find(|(boss_level, _)| *boss_level == level)
        .map_or(DEFAULT_BOSS, |(_, stats)| *stats)
}

/// Base boss stats for a Boss Rush level, before difficulty bonuses.
#[must_use]
pub fn boss_rush_base(level: u32) -> BossStats {
    let step = level.clamp(1, BOSS_RUSH_FINAL_LEVEL) - 1;
    BossStats::new(25 + 10 * step, 2_000 + 500 * u64::from(step))
}

/// Bullets granted per ship at the start of a Last Bullet level.
#[must_use]
pub fn last_bullet_allowance(level: u32, singleplayer: bool) -> u32 {
    let step = level.max(1) - 1;
    if singleplayer {
        (35 + 5 * step).min(80)
    } else {
        (25 + 5 * step).min(70)
    }
}

/// Number of fleet rows spawned at the start of `level`.
#[must_use]
pub fn fleet_rows(level: u32) -> u32 {
    FLEET_ROWS
        .iter()
        .find(|(first_level, _)| level >= *first_level)
        .map_or(2, |(_, rows)| *rows)
}

/// Hitbox of a missile explosion on the given animation frame.
#[must_use]
pub fn explosion_rect(center: Vec2, frame: u32) -> Rect {
    Rect::centered_on(center, EXPLOSION_BASE_SIZE + EXPLOSION_GROWTH * frame as f32)
}

/// Converts elapsed time into a multiple of the reference frame.
#[must_use]
pub fn frame_scale(dt: Duration) -> f32 {
    dt.as_secs_f32() * REFERENCE_FPS
}
