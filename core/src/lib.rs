#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Alien Onslaught engine.
//!
//! This crate defines the message surface that connects the session
//! orchestrator, the authoritative world, and pure systems. Systems inspect
//! immutable snapshots and submit [`Command`] values describing desired
//! mutations, the world executes those commands via its `apply` entry point,
//! and then broadcasts [`Event`] values that the session forwards to the
//! scoreboard and sound collaborators.

mod clock;
mod geometry;
mod settings;
pub mod tables;

use std::{
    ops::{Index, IndexMut},
    time::Duration,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use geometry::Rect;
pub use settings::{Settings, SpeedupScale};

/// Identifies one of the two ships that can take part in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// First player; the only ship in singleplayer sessions.
    Thunderbird,
    /// Second player.
    Phoenix,
}

impl PlayerId {
    /// Every player in canonical order.
    pub const ALL: [PlayerId; 2] = [PlayerId::Thunderbird, PlayerId::Phoenix];

    /// Position of the player inside per-player storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Thunderbird => 0,
            Self::Phoenix => 1,
        }
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Thunderbird => Self::Phoenix,
            Self::Phoenix => Self::Thunderbird,
        }
    }

    /// Human readable ship name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thunderbird => "thunderbird",
            Self::Phoenix => "phoenix",
        }
    }
}

/// Storage holding one value for each player, indexed by [`PlayerId`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    thunderbird: T,
    phoenix: T,
}

impl<T> PerPlayer<T> {
    /// Creates storage from explicit per-player values.
    #[must_use]
    pub const fn new(thunderbird: T, phoenix: T) -> Self {
        Self {
            thunderbird,
            phoenix,
        }
    }

    /// Builds storage by evaluating `init` once per player.
    #[must_use]
    pub fn from_fn(mut init: impl FnMut(PlayerId) -> T) -> Self {
        Self::new(init(PlayerId::Thunderbird), init(PlayerId::Phoenix))
    }

    /// Value stored for `player`.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        match player {
            PlayerId::Thunderbird => &self.thunderbird,
            PlayerId::Phoenix => &self.phoenix,
        }
    }

    /// Mutable value stored for `player`.
    #[must_use]
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        match player {
            PlayerId::Thunderbird => &mut self.thunderbird,
            PlayerId::Phoenix => &mut self.phoenix,
        }
    }

    /// Iterates over every player together with its value.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL
            .into_iter()
            .zip([&self.thunderbird, &self.phoenix])
    }

    /// Iterates mutably over every player together with its value.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        PlayerId::ALL
            .into_iter()
            .zip([&mut self.thunderbird, &mut self.phoenix])
    }

    /// Transforms every value, keeping the player association.
    #[must_use]
    pub fn map<U>(&self, mut f: impl FnMut(PlayerId, &T) -> U) -> PerPlayer<U> {
        PerPlayer::new(
            f(PlayerId::Thunderbird, &self.thunderbird),
            f(PlayerId::Phoenix, &self.phoenix),
        )
    }
}

impl<T: Clone> PerPlayer<T> {
    /// Creates storage holding the same value for both players.
    #[must_use]
    pub fn splat(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}

impl<T> Index<PlayerId> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        self.get_mut(player)
    }
}

/// Unique identifier assigned to an alien.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AlienId(u32);

impl AlienId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile of any kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an asteroid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AsteroidId(u32);

impl AsteroidId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a falling power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PowerId(u32);

impl PowerId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reference to any non-ship entity tracked by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityRef {
    /// An alien or boss.
    Alien(AlienId),
    /// A bullet, missile or laser owned by a ship or an alien.
    Projectile(ProjectileId),
    /// A falling asteroid.
    Asteroid(AsteroidId),
    /// A falling power.
    Power(PowerId),
}

/// Ruleset governing spawns, pacing and win conditions for a session.
///
/// Modes parse from their snake case key. Unknown keys resolve to
/// [`GameMode::Normal`] instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameMode {
    /// Fleets and periodic bosses, asteroids from level 7.
    #[default]
    Normal,
    /// Fifteen back-to-back bosses.
    BossRush,
    /// Continuous fleet top-ups with periodic speed ramps.
    EndlessOnslaught,
    /// Asteroids only, levels advance on a timer.
    MeteorMadness,
    /// Ship and bullet speeds decay over time.
    SlowBurn,
    /// Finite bullet allowance per level.
    LastBullet,
    /// Player versus player, no aliens.
    CosmicConflict,
}

impl GameMode {
    /// Every mode in menu order.
    pub const ALL: [GameMode; 7] = [
        GameMode::Normal,
        GameMode::BossRush,
        GameMode::EndlessOnslaught,
        GameMode::MeteorMadness,
        GameMode::SlowBurn,
        GameMode::LastBullet,
        GameMode::CosmicConflict,
    ];

    /// Resolves a mode from its key, ignoring case and separators.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        let normalized: String = key
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|mode| mode.key() == normalized)
            .unwrap_or_default()
    }

    /// Canonical key used in configuration files and high score tables.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::BossRush => "boss_rush",
            Self::EndlessOnslaught => "endless_onslaught",
            Self::MeteorMadness => "meteor_madness",
            Self::SlowBurn => "slow_burn",
            Self::LastBullet => "last_bullet",
            Self::CosmicConflict => "cosmic_conflict",
        }
    }

    /// Reports whether ships fight each other instead of aliens.
    #[must_use]
    pub const fn is_pvp(self) -> bool {
        matches!(self, Self::CosmicConflict)
    }
}

impl From<String> for GameMode {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        mode.key().to_owned()
    }
}

/// Distinguishes fleet aliens from bosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlienKind {
    /// Fleet alien destroyed after a level-dependent number of hits.
    Normal,
    /// Boss alien destroyed after `boss_hp` hits.
    Boss,
}

impl AlienKind {
    /// Reports whether the alien is a boss.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }
}

/// Category of a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Consumed on first contact.
    Bullet,
    /// Detonates into an area explosion on contact.
    Missile,
    /// Short-lived beam that pierces every alien it touches.
    Laser,
}

/// Entity that fired a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProjectileOwner {
    /// Fired by a ship.
    Player(PlayerId),
    /// Fired by an alien.
    Alien(AlienId),
}

impl ProjectileOwner {
    /// Player that fired the projectile, if a ship did.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        match self {
            Self::Player(player) => Some(player),
            Self::Alien(_) => None,
        }
    }
}

/// Lifecycle stage of a missile. Bullets and lasers stay [`MissilePhase::Flying`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissilePhase {
    /// Travelling towards a target.
    Flying,
    /// Playing the explosion animation.
    Exploding {
        /// Current animation frame, starting at zero.
        frame: u32,
    },
}

/// Bullet style carried by a ship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    /// Default narrow bolt.
    #[default]
    Bolt,
    /// Wider flame bullet.
    Firebird,
    /// Large square burst.
    Starburst,
}

impl WeaponKind {
    /// Hitbox of a vertically travelling bullet of this weapon.
    #[must_use]
    pub const fn bullet_size(self) -> Vec2 {
        match self {
            Self::Bolt => Vec2::new(8.0, 25.0),
            Self::Firebird => Vec2::new(14.0, 30.0),
            Self::Starburst => Vec2::new(20.0, 20.0),
        }
    }
}

/// Effects carried by generic powers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Raises the collecting ship's speed.
    ShipSpeed,
    /// Raises the collecting ship's bullet speed.
    BulletSpeed,
    /// Allows one more bullet in flight.
    BulletsAllowed,
    /// Adds one bullet to every volley.
    BulletCount,
    /// Grants a single-use shield.
    Shield,
    /// Freezes every alien in place.
    FreezeAliens,
    /// Grants long immunity.
    Invincibility,
    /// Awards a score bonus.
    BonusPoints,
    /// Adds a missile.
    ExtraMissile,
    /// Adds a laser charge.
    LaserCharge,
    /// Penalty: inverts steering.
    ReverseKeys,
    /// Penalty: prevents firing.
    Disarm,
    /// Penalty: allows one fewer bullet in flight.
    FewerBullets,
    /// Penalty: enlarges the ship hitbox.
    ScaleShip,
    /// Penalty: speeds aliens and their bullets up.
    AlienUpgrade,
}

impl EffectKind {
    /// Reports whether the effect hurts the collecting player.
    #[must_use]
    pub const fn is_penalty(self) -> bool {
        matches!(
            self,
            Self::ReverseKeys
                | Self::Disarm
                | Self::FewerBullets
                | Self::ScaleShip
                | Self::AlienUpgrade
        )
    }
}

/// Concrete power that can fall from the top of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerKind {
    /// Restores one hit point.
    Health,
    /// Swaps the ship's weapon.
    Weapon(WeaponKind),
    /// Applies a generic effect.
    Effect(EffectKind),
}

impl PowerKind {
    /// Reports whether collecting the power penalises the player.
    #[must_use]
    pub const fn is_penalty(self) -> bool {
        match self {
            Self::Effect(effect) => effect.is_penalty(),
            Self::Health | Self::Weapon(_) => false,
        }
    }
}

/// Timed or permanent flags in a ship's state bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipFlag {
    /// Explosion animation after a hit.
    Exploding,
    /// Single-use shield is active.
    Shielded,
    /// Warp animation at the start of a level.
    Warping,
    /// Cannot be hit.
    Immune,
    /// Cannot fire.
    Disarmed,
    /// Steering is inverted.
    Reversed,
    /// Hitbox is enlarged.
    Scaled,
    /// Visual glow after a pickup.
    Empowered,
}

impl ShipFlag {
    /// Every timed flag.
    pub const ALL: [ShipFlag; 8] = [
        ShipFlag::Exploding,
        ShipFlag::Shielded,
        ShipFlag::Warping,
        ShipFlag::Immune,
        ShipFlag::Disarmed,
        ShipFlag::Reversed,
        ShipFlag::Scaled,
        ShipFlag::Empowered,
    ];

    /// Position of the flag inside per-flag storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Exploding => 0,
            Self::Shielded => 1,
            Self::Warping => 2,
            Self::Immune => 3,
            Self::Disarmed => 4,
            Self::Reversed => 5,
            Self::Scaled => 6,
            Self::Empowered => 7,
        }
    }
}

/// State bundle carried by every ship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ShipState {
    /// The ship takes part in gameplay.
    pub alive: bool,
    /// Explosion animation is playing.
    pub exploding: bool,
    /// Shield is active.
    pub shielded: bool,
    /// Warp animation is playing.
    pub warping: bool,
    /// Hits are ignored.
    pub immune: bool,
    /// Firing is blocked.
    pub disarmed: bool,
    /// Steering is inverted.
    pub reverse: bool,
    /// Hitbox is enlarged.
    pub scaled: bool,
    /// Pickup glow is visible.
    pub empowered: bool,
}

impl ShipState {
    /// State of a freshly spawned ship.
    #[must_use]
    pub fn spawned() -> Self {
        Self {
            alive: true,
            ..Self::default()
        }
    }

    /// Reads a timed flag.
    #[must_use]
    pub const fn flag(&self, flag: ShipFlag) -> bool {
        match flag {
            ShipFlag::Exploding => self.exploding,
            ShipFlag::Shielded => self.shielded,
            ShipFlag::Warping => self.warping,
            ShipFlag::Immune => self.immune,
            ShipFlag::Disarmed => self.disarmed,
            ShipFlag::Reversed => self.reverse,
            ShipFlag::Scaled => self.scaled,
            ShipFlag::Empowered => self.empowered,
        }
    }

    /// Writes a timed flag.
    pub fn set(&mut self, flag: ShipFlag, value: bool) {
        let slot = match flag {
            ShipFlag::Exploding => &mut self.exploding,
            ShipFlag::Shielded => &mut self.shielded,
            ShipFlag::Warping => &mut self.warping,
            ShipFlag::Immune => &mut self.immune,
            ShipFlag::Disarmed => &mut self.disarmed,
            ShipFlag::Reversed => &mut self.reverse,
            ShipFlag::Scaled => &mut self.scaled,
            ShipFlag::Empowered => &mut self.empowered,
        };
        *slot = value;
    }

    /// Reports whether the hit pipeline accepts a hit on this ship.
    #[must_use]
    pub const fn is_vulnerable(&self) -> bool {
        self.alive && !self.immune && !self.exploding && !self.warping
    }
}

/// Adjustable settings that game modes ramp over time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tunable {
    /// Horizontal fleet speed.
    AlienSpeed,
    /// Alien bullet speed.
    AlienBulletSpeed,
    /// Steering speed of one ship.
    ShipSpeed(PlayerId),
    /// Bullet speed of one ship.
    BulletSpeed(PlayerId),
    /// Falling speed of asteroids.
    AsteroidSpeed,
    /// Milliseconds between asteroid spawns.
    AsteroidFrequency,
}

/// Final result of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Every boss of a Boss Rush was defeated.
    Victory,
    /// Every active ship died.
    Defeat,
    /// Both ships died in the same frame of a player versus player match.
    Draw,
    /// One ship outlived the other in a player versus player match.
    Winner(PlayerId),
}

/// Source of a hit on a ship.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitCause {
    /// Body contact with an alien.
    Alien,
    /// Body contact with an asteroid.
    Asteroid,
    /// An alien bullet.
    AlienBullet,
    /// A projectile fired by the other ship.
    Opponent,
}

/// Penalty applied when an alien crosses the bottom of the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EscapePenalty {
    /// Every active ship loses one hit point.
    Health,
    /// Every active ship loses the given number of points.
    Score(u64),
}

impl EscapePenalty {
    /// Penalty applied by the provided mode.
    #[must_use]
    pub const fn for_mode(mode: GameMode) -> Self {
        if mode.is_pvp() {
            Self::Score(tables::PVP_ESCAPE_PENALTY)
        } else {
            Self::Health
        }
    }
}

/// Sound cues played by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundKey {
    /// A ship fired bullets.
    Fire,
    /// A ship launched a missile.
    MissileLaunch,
    /// A ship fired a laser.
    Laser,
    /// A missile detonated.
    MissileImpact,
    /// An alien was destroyed.
    AlienExploding,
    /// A ship took a hit.
    ShipHit,
    /// A shield absorbed contact.
    Shield,
    /// A beneficial power was collected.
    Power,
    /// A penalty power was collected.
    Penalty,
    /// A new level started.
    LevelUp,
    /// The session ended without a victory.
    GameOver,
    /// The session ended in a victory.
    Victory,
}

/// Hit points and score awarded by the active boss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BossStats {
    /// Hits required to destroy the boss.
    pub hp: u32,
    /// Score credited for destroying the boss.
    pub points: u64,
}

impl BossStats {
    /// Creates a stat pair.
    #[must_use]
    pub const fn new(hp: u32, points: u64) -> Self {
        Self { hp, points }
    }
}

/// How aliens are populated while a mode is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienPopulation {
    /// Aliens are seeded once per level by the game mode rules.
    Seeded,
    /// Fleet rows are topped up whenever the population drops under `ceiling`.
    TopUp {
        /// Population ceiling.
        ceiling: usize,
        /// Rows spawned per top-up.
        rows: u32,
    },
    /// Aliens never spawn.
    None,
}

/// Cadence of alien bullet volleys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlienFire {
    /// Aliens that fire per volley.
    pub count: usize,
    /// Minimum gap between volleys.
    pub global_interval: Duration,
    /// Minimum gap between two bullets of the same alien.
    pub per_alien_interval: Duration,
}

impl AlienFire {
    /// Creates a cadence from millisecond intervals.
    #[must_use]
    pub const fn from_millis(count: usize, global_ms: u64, per_alien_ms: u64) -> Self {
        Self {
            count,
            global_interval: Duration::from_millis(global_ms),
            per_alien_interval: Duration::from_millis(per_alien_ms),
        }
    }
}

/// Spawners enabled for the current mode and level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPolicy {
    /// Alien population strategy.
    pub aliens: AlienPopulation,
    /// Alien bullet cadence, if aliens fire at all.
    pub alien_fire: Option<AlienFire>,
    /// Asteroids fall.
    pub asteroids: bool,
    /// Powers fall.
    pub powers: bool,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets the world for a new session.
    ConfigureSession {
        /// Ruleset of the session.
        mode: GameMode,
        /// Only Thunderbird takes part.
        singleplayer: bool,
        /// Settings the session starts from.
        settings: Box<Settings>,
        /// Best score recorded for the mode so far.
        high_score: u64,
    },
    /// Advances the gameplay clock to `now`.
    Tick {
        /// Gameplay time with paused time already removed.
        now: Duration,
    },
    /// Moves a ship along the provided input direction.
    SteerShip {
        /// Ship to move.
        player: PlayerId,
        /// Raw input direction; components range from -1 to 1.
        direction: Vec2,
    },
    /// Fires a bullet volley.
    FireBullet {
        /// Firing ship.
        player: PlayerId,
    },
    /// Launches a missile.
    FireMissile {
        /// Firing ship.
        player: PlayerId,
    },
    /// Fires a laser beam.
    FireLaser {
        /// Firing ship.
        player: PlayerId,
    },
    /// Spawns fleet rows at the top of the screen.
    SpawnFleet {
        /// Number of rows to spawn.
        rows: u32,
    },
    /// Spawns a single boss.
    SpawnBoss,
    /// Replaces the boss hit points and score.
    ConfigureBoss {
        /// Hits required to destroy the boss.
        hp: u32,
        /// Score credited for the kill.
        points: u64,
    },
    /// Makes an alien fire one bullet.
    FireAlienBullet {
        /// Firing alien.
        alien: AlienId,
    },
    /// Spawns an asteroid above the screen.
    SpawnAsteroid {
        /// Left edge of the asteroid.
        x: f32,
    },
    /// Spawns a power above the screen.
    SpawnPower {
        /// Payload of the power.
        kind: PowerKind,
        /// Left edge of the power.
        x: f32,
    },
    /// Translates an entity.
    MoveEntity {
        /// Entity to move.
        entity: EntityRef,
        /// Offset in screen units.
        delta: Vec2,
    },
    /// Reverses the fleet and drops it one step.
    ReverseFleet,
    /// Reverses the horizontal direction of a single alien.
    ReverseAlien {
        /// Alien to turn around.
        alien: AlienId,
    },
    /// Moves a missile explosion to its next animation frame.
    AdvanceExplosion {
        /// Exploding missile.
        projectile: ProjectileId,
    },
    /// Removes an entity without side effects.
    Despawn {
        /// Entity to remove.
        entity: EntityRef,
    },
    /// Runs the ship hit pipeline.
    HitShip {
        /// Ship to hit.
        player: PlayerId,
        /// Source of the hit.
        cause: HitCause,
    },
    /// An entity touched an active shield.
    ShieldContact {
        /// Shielded ship.
        player: PlayerId,
        /// Entity that touched the shield.
        entity: EntityRef,
    },
    /// A player bullet touched an alien.
    BulletHitAlien {
        /// Bullet that landed.
        projectile: ProjectileId,
        /// Alien that was hit.
        alien: AlienId,
    },
    /// A flying missile touched an alien and starts exploding.
    DetonateMissile {
        /// Missile to detonate.
        projectile: ProjectileId,
    },
    /// A missile explosion frame overlaps an alien.
    ExplosionHitAlien {
        /// Exploding missile.
        projectile: ProjectileId,
        /// Alien inside the blast.
        alien: AlienId,
    },
    /// A laser beam overlaps an alien.
    LaserHitAlien {
        /// Laser beam.
        projectile: ProjectileId,
        /// Alien inside the beam.
        alien: AlienId,
    },
    /// A hostile projectile touched a ship.
    ProjectileHitShip {
        /// Projectile that landed.
        projectile: ProjectileId,
        /// Ship that was hit.
        player: PlayerId,
    },
    /// Destroys an asteroid.
    DestroyAsteroid {
        /// Asteroid to destroy.
        asteroid: AsteroidId,
    },
    /// A ship picked up a power.
    CollectPower {
        /// Collecting ship.
        player: PlayerId,
        /// Power that was touched.
        power: PowerId,
    },
    /// An alien crossed the bottom of the screen.
    AlienEscaped {
        /// Escaping alien.
        alien: AlienId,
        /// Penalty to apply.
        penalty: EscapePenalty,
    },
    /// Adjusts a tunable setting, clamping the result to optional bounds.
    AdjustTunable {
        /// Setting to adjust.
        tunable: Tunable,
        /// Signed change.
        delta: f32,
        /// Lowest allowed value.
        floor: Option<f32>,
        /// Highest allowed value.
        ceiling: Option<f32>,
    },
    /// Awards points to every living active ship.
    AwardBonus {
        /// Points to award.
        points: u64,
    },
    /// Sets the remaining bullets of a ship.
    SetBulletAllowance {
        /// Ship to arm.
        player: PlayerId,
        /// Bullets the ship may still fire this level.
        bullets: u32,
    },
    /// Marks a ship as dead without a hit.
    DisableShip {
        /// Ship to disable.
        player: PlayerId,
    },
    /// Brings every dead active ship back.
    ReviveShips,
    /// Clears transient entities and moves to the next level.
    AdvanceLevel,
    /// Ends the session.
    EndGame {
        /// Final result.
        outcome: Outcome,
    },
}

/// Events emitted by the world after applying commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A new session started.
    SessionStarted {
        /// Ruleset of the session.
        mode: GameMode,
        /// Only Thunderbird takes part.
        singleplayer: bool,
    },
    /// Gameplay time advanced.
    TimeAdvanced {
        /// Time elapsed since the previous tick.
        dt: Duration,
        /// Current gameplay time.
        now: Duration,
    },
    /// A ship took a hit.
    ShipHit {
        /// Ship that was hit.
        player: PlayerId,
        /// Source of the hit.
        cause: HitCause,
        /// Remaining hit points, possibly negative.
        health: i32,
    },
    /// A ship ran out of hit points.
    ShipDestroyed {
        /// Destroyed ship.
        player: PlayerId,
    },
    /// A dead ship was brought back.
    ShipRevived {
        /// Revived ship.
        player: PlayerId,
    },
    /// A ship was taken out of play without a hit.
    ShipDisabled {
        /// Disabled ship.
        player: PlayerId,
    },
    /// A shield absorbed contact and disappeared.
    ShieldConsumed {
        /// Ship that lost its shield.
        player: PlayerId,
    },
    /// A power effect started.
    EffectStarted {
        /// Collecting ship.
        player: PlayerId,
        /// Effect that started.
        effect: EffectKind,
    },
    /// A timed ship flag ran out.
    EffectExpired {
        /// Affected ship.
        player: PlayerId,
        /// Flag that was cleared.
        flag: ShipFlag,
    },
    /// Frozen aliens started moving again.
    AliensThawed,
    /// A projectile entered play.
    ProjectileFired {
        /// New projectile.
        projectile: ProjectileId,
        /// Firing entity.
        owner: ProjectileOwner,
        /// Projectile category.
        kind: ProjectileKind,
    },
    /// A missile started exploding.
    MissileDetonated {
        /// Exploding missile.
        projectile: ProjectileId,
    },
    /// A projectile left play.
    ProjectileExpired {
        /// Removed projectile.
        projectile: ProjectileId,
    },
    /// An alien entered play.
    AlienSpawned {
        /// New alien.
        alien: AlienId,
        /// Alien category.
        kind: AlienKind,
    },
    /// An alien accumulated hits.
    AlienDamaged {
        /// Damaged alien.
        alien: AlienId,
        /// Accumulated hits.
        hit_count: u32,
    },
    /// An alien was destroyed and removed.
    AlienDestroyed {
        /// Destroyed alien.
        alien: AlienId,
        /// Alien category.
        kind: AlienKind,
        /// Player credited with the kill.
        by: Option<PlayerId>,
    },
    /// An alien crossed the bottom of the screen.
    AlienEscaped {
        /// Escaped alien.
        alien: AlienId,
    },
    /// An asteroid entered play.
    AsteroidSpawned {
        /// New asteroid.
        asteroid: AsteroidId,
    },
    /// An asteroid was destroyed.
    AsteroidDestroyed {
        /// Destroyed asteroid.
        asteroid: AsteroidId,
    },
    /// A power entered play.
    PowerSpawned {
        /// New power.
        power: PowerId,
        /// Payload of the power.
        kind: PowerKind,
    },
    /// A ship consumed a power.
    PowerCollected {
        /// Collecting ship.
        player: PlayerId,
        /// Consumed power.
        power: PowerId,
        /// Payload of the power.
        kind: PowerKind,
    },
    /// A ship's score changed.
    ScoreChanged {
        /// Ship whose score changed.
        player: PlayerId,
        /// New score.
        score: u64,
    },
    /// The session high score changed.
    HighScoreChanged {
        /// New high score.
        score: u64,
    },
    /// A ship's hit points changed.
    HealthChanged {
        /// Ship whose health changed.
        player: PlayerId,
        /// New hit points.
        health: i32,
    },
    /// A ship's bullet, missile or laser inventory changed.
    BulletsChanged {
        /// Ship whose inventory changed.
        player: PlayerId,
    },
    /// A tunable setting changed.
    TunableChanged {
        /// Changed setting.
        tunable: Tunable,
        /// New value.
        value: f32,
    },
    /// Boss stats were replaced.
    BossConfigured {
        /// Hits required to destroy the boss.
        hp: u32,
        /// Score credited for the kill.
        points: u64,
    },
    /// A new level started.
    LevelAdvanced {
        /// New level.
        level: u32,
    },
    /// The session ended.
    GameOver {
        /// Final result.
        outcome: Outcome,
    },
}

/// Immutable representation of a ship used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShipSnapshot {
    /// Owning player.
    pub player: PlayerId,
    /// The ship takes part in this session.
    pub active: bool,
    /// Current hitbox.
    pub rect: Rect,
    /// Remaining hit points.
    pub health: i32,
    /// State bundle.
    pub state: ShipState,
    /// Bullet style.
    pub weapon: WeaponKind,
    /// Stored missiles.
    pub missiles: u32,
    /// Stored laser charges.
    pub lasers: u32,
    /// Bullets left this level when the mode limits them.
    pub remaining_bullets: Option<u32>,
}

impl ShipSnapshot {
    /// Reports whether the ship is active and alive.
    #[must_use]
    pub const fn in_play(&self) -> bool {
        self.active && self.state.alive
    }
}

/// Immutable representation of an alien used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienSnapshot {
    /// Unique identifier assigned to the alien.
    pub id: AlienId,
    /// Fleet alien or boss.
    pub kind: AlienKind,
    /// Current hitbox.
    pub rect: Rect,
    /// Accumulated hits.
    pub hit_count: u32,
    /// The alien is inside its spawn immunity window.
    pub immune: bool,
    /// The alien is frozen by a power.
    pub frozen: bool,
    /// Horizontal travel direction, `1.0` or `-1.0`.
    pub direction: f32,
    /// Gameplay time of the alien's last bullet.
    pub last_bullet_time: Option<Duration>,
}

/// Immutable representation of a projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Projectile category.
    pub kind: ProjectileKind,
    /// Firing entity.
    pub owner: ProjectileOwner,
    /// Current hitbox; the blast area while a missile explodes.
    pub rect: Rect,
    /// Travel per reference frame.
    pub velocity: Vec2,
    /// Missile lifecycle stage.
    pub phase: MissilePhase,
    /// Gameplay time the projectile was fired.
    pub fired_at: Duration,
    /// Gameplay time a missile started exploding.
    pub exploded_at: Option<Duration>,
}

impl ProjectileSnapshot {
    /// Player that fired the projectile, if a ship did.
    #[must_use]
    pub const fn player(&self) -> Option<PlayerId> {
        self.owner.player()
    }
}

/// Immutable representation of an asteroid used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AsteroidSnapshot {
    /// Unique identifier assigned to the asteroid.
    pub id: AsteroidId,
    /// Current hitbox.
    pub rect: Rect,
}

/// Immutable representation of a power used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerSnapshot {
    /// Unique identifier assigned to the power.
    pub id: PowerId,
    /// Payload of the power.
    pub kind: PowerKind,
    /// Current hitbox.
    pub rect: Rect,
}

/// Read-only snapshot describing all aliens.
#[derive(Clone, Debug, Default)]
pub struct AlienView {
    snapshots: Vec<AlienSnapshot>,
}

impl AlienView {
    /// Creates a new alien view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AlienSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured alien snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AlienSnapshot> {
        self.snapshots.iter()
    }

    /// Number of aliens in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no alien is in play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Looks up a single alien.
    #[must_use]
    pub fn get(&self, id: AlienId) -> Option<&AlienSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<AlienSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all projectiles.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Projectiles fired by `player`.
    pub fn fired_by(&self, player: PlayerId) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots
            .iter()
            .filter(move |snapshot| snapshot.player() == Some(player))
    }

    /// Projectiles fired by aliens.
    pub fn hostile(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots
            .iter()
            .filter(|snapshot| matches!(snapshot.owner, ProjectileOwner::Alien(_)))
    }

    /// Number of projectiles in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no projectile is in play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot describing all asteroids.
#[derive(Clone, Debug, Default)]
pub struct AsteroidView {
    snapshots: Vec<AsteroidSnapshot>,
}

impl AsteroidView {
    /// Creates a new asteroid view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<AsteroidSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured asteroid snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &AsteroidSnapshot> {
        self.snapshots.iter()
    }

    /// Number of asteroids in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no asteroid is in play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Read-only snapshot describing all falling powers.
#[derive(Clone, Debug, Default)]
pub struct PowerView {
    snapshots: Vec<PowerSnapshot>,
}

impl PowerView {
    /// Creates a new power view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<PowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured power snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &PowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of powers in play.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no power is in play.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Values displayed by the scoreboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudSnapshot {
    /// Current level.
    pub level: u32,
    /// Only Thunderbird takes part.
    pub singleplayer: bool,
    /// Score per player.
    pub scores: PerPlayer<u64>,
    /// Best score of the mode.
    pub high_score: u64,
    /// Hit points per player.
    pub health: PerPlayer<i32>,
    /// Stored missiles per player.
    pub missiles: PerPlayer<u32>,
    /// Stored laser charges per player.
    pub lasers: PerPlayer<u32>,
    /// Bullets left this level per player, when limited.
    pub remaining_bullets: PerPlayer<Option<u32>>,
}

/// Fire-and-forget sound trigger.
pub trait SoundPlayer {
    /// Plays a cue. Never blocks.
    fn play(&mut self, sound: SoundKey);
}

/// Side-effecting scoreboard refreshes. Every call is idempotent.
pub trait Scoreboard {
    /// Redraws scores and level.
    fn render_scores(&mut self, hud: &HudSnapshot);
    /// Redraws the high score.
    fn update_high_score(&mut self, hud: &HudSnapshot);
    /// Redraws the health indicators.
    fn create_health(&mut self, hud: &HudSnapshot);
    /// Redraws bullet, missile and laser counters.
    fn render_bullets_num(&mut self, hud: &HudSnapshot);
}

/// Per-mode high score table, read and written only at session boundaries.
pub trait HighScoreStore {
    /// Recorded scores for `mode`, best first.
    fn scores(&self, mode: GameMode) -> Vec<u64>;
    /// Records a finished session's score.
    fn record(&mut self, mode: GameMode, score: u64);
}
