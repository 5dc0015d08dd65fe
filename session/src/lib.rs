#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration for a single Alien Onslaught session.
//!
//! A [`Session`] owns the world and every system. Each call to
//! [`Session::frame`] runs one cooperative iteration: ticking the gameplay
//! clock, applying player input, then spawning, movement, collision and
//! game-mode rules in that order. Events emitted along the way are forwarded
//! to the scoreboard and sound collaborators once the frame settles.

mod config;
mod high_scores;
mod pause;

use alien_onslaught_core::{
    Clock, Command, Event, GameMode, HighScoreStore, Outcome, PerPlayer, ProjectileKind,
    ProjectileOwner, Scoreboard, SoundKey, SoundPlayer,
};
use alien_onslaught_system_collision::Collision;
use alien_onslaught_system_game_modes::{spawn_policy, GameModes, ModeInputs};
use alien_onslaught_system_movement::Movement;
use alien_onslaught_system_spawning::{Config as SpawningConfig, Spawning};
use alien_onslaught_world::{self as world, query, World};
use glam::Vec2;
use tracing::{info, trace};

pub use config::{ConfigError, SessionConfig};
pub use high_scores::{MemoryHighScores, HIGH_SCORE_ENTRIES};
pub use pause::PauseLedger;

/// Input sampled for one ship during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShipInput {
    /// Steering direction; components range from -1 to 1.
    pub steer: Vec2,
    /// Fire a bullet volley.
    pub fire: bool,
    /// Launch a missile.
    pub missile: bool,
    /// Fire a laser.
    pub laser: bool,
}

/// State of the session after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Gameplay was skipped because the session is paused.
    Paused,
    /// Gameplay advanced and continues.
    Running,
    /// The session ended.
    Finished(Outcome),
}

/// Side-effecting collaborators driven by the session.
pub struct Collaborators {
    /// Scoreboard refreshed after displayed values change.
    pub scoreboard: Box<dyn Scoreboard>,
    /// Sound cues.
    pub sound: Box<dyn SoundPlayer>,
    /// Per-mode high score table.
    pub high_scores: Box<dyn HighScoreStore>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// One running game.
#[derive(Debug)]
pub struct Session<C: Clock> {
    world: World,
    clock: C,
    pause: PauseLedger,
    spawning: Spawning,
    movement: Movement,
    collision: Collision,
    modes: GameModes,
    collaborators: Collaborators,
}

impl<C: Clock> Session<C> {
    /// Validates `config`, resets the world and seeds level one.
    pub fn new(
        config: &SessionConfig,
        clock: C,
        collaborators: Collaborators,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let singleplayer = config.singleplayer();
        let settings = config.starting_settings();
        let high_score = collaborators
            .high_scores
            .scores(config.mode)
            .first()
            .copied()
            .unwrap_or(0);
        let modes = GameModes::new(config.mode, singleplayer);

        let mut session = Self {
            world: World::new(),
            clock,
            pause: PauseLedger::default(),
            spawning: Spawning::new(SpawningConfig::new(config.seed)),
            movement: Movement,
            collision: Collision,
            modes,
            collaborators,
        };

        let mut commands = vec![Command::ConfigureSession {
            mode: config.mode,
            singleplayer,
            settings: Box::new(settings),
            high_score,
        }];
        session
            .modes
            .opening_commands(config.difficulty, &mut commands);
        let mut events = Vec::new();
        session.apply_all(commands, &mut events);
        session.dispatch(&events);

        info!(
            mode = config.mode.key(),
            players = config.players,
            seed = config.seed,
            "session started"
        );
        Ok(session)
    }

    /// Read access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Ruleset of the session.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.modes.mode()
    }

    /// Reports whether the session is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    /// Pauses gameplay; wall time from now on is not counted.
    pub fn pause(&mut self) {
        self.pause.pause(self.clock.now());
    }

    /// Resumes gameplay.
    pub fn resume(&mut self) {
        self.pause.resume(self.clock.now());
    }

    /// Runs one frame.
    pub fn frame(&mut self, inputs: &PerPlayer<ShipInput>) -> FrameStatus {
        if let Some(outcome) = query::outcome(&self.world) {
            return FrameStatus::Finished(outcome);
        }
        if self.pause.is_paused() {
            return FrameStatus::Paused;
        }

        let now = self.pause.gameplay_time(self.clock.now());
        let mut events = Vec::new();
        let mut commands = vec![Command::Tick { now }];
        push_inputs(inputs, &mut commands);
        self.apply_all(commands, &mut events);

        let mode = self.modes.mode();
        let mut commands = Vec::new();
        let policy = spawn_policy(mode, query::level(&self.world));
        self.spawning.handle(
            now,
            &policy,
            &query::alien_view(&self.world),
            query::settings(&self.world),
            &mut commands,
        );
        trace!(commands = commands.len(), "spawning");
        self.apply_all(commands, &mut events);

        let mut commands = Vec::new();
        self.movement.handle(
            &events,
            &query::alien_view(&self.world),
            &query::projectile_view(&self.world),
            &query::asteroid_view(&self.world),
            &query::power_view(&self.world),
            query::settings(&self.world),
            &mut commands,
        );
        trace!(commands = commands.len(), "movement");
        self.apply_all(commands, &mut events);

        let mut commands = Vec::new();
        self.collision.handle(
            mode,
            &query::ships(&self.world),
            &query::alien_view(&self.world),
            &query::projectile_view(&self.world),
            &query::asteroid_view(&self.world),
            &query::power_view(&self.world),
            query::settings(&self.world),
            &mut commands,
        );
        trace!(commands = commands.len(), "collision");
        self.apply_all(commands, &mut events);

        let mut commands = Vec::new();
        let ships = query::ships(&self.world);
        let bullets_in_flight = query::bullets_in_flight_per_player(&self.world);
        let mode_inputs = ModeInputs {
            now,
            level: query::level(&self.world),
            ships: &ships,
            alien_count: query::alien_count(&self.world),
            bullets_in_flight: &bullets_in_flight,
            settings: query::settings(&self.world),
            outcome: query::outcome(&self.world),
        };
        self.modes.handle(&mode_inputs, &mut commands);
        trace!(commands = commands.len(), "game modes");
        self.apply_all(commands, &mut events);

        self.dispatch(&events);

        match query::outcome(&self.world) {
            Some(outcome) => {
                self.record_high_score();
                FrameStatus::Finished(outcome)
            }
            None => FrameStatus::Running,
        }
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Forwards a frame's events to the collaborators. Scoreboard refreshes
    /// are coalesced to one call per kind.
    fn dispatch(&mut self, events: &[Event]) {
        let mut scores = false;
        let mut high_score = false;
        let mut health = false;
        let mut bullets = false;

        for event in events {
            match event {
                Event::ScoreChanged { .. } => scores = true,
                Event::HighScoreChanged { .. } => high_score = true,
                Event::HealthChanged { .. } | Event::ShipRevived { .. } => health = true,
                Event::BulletsChanged { .. } => bullets = true,
                Event::LevelAdvanced { .. } => {
                    scores = true;
                    bullets = true;
                }
                Event::SessionStarted { .. } => {
                    scores = true;
                    high_score = true;
                    health = true;
                    bullets = true;
                }
                _ => {}
            }
            if let Some(sound) = sound_for(event) {
                self.collaborators.sound.play(sound);
            }
        }

        let hud = query::hud(&self.world);
        let scoreboard = &mut self.collaborators.scoreboard;
        if scores {
            scoreboard.render_scores(&hud);
        }
        if high_score {
            scoreboard.update_high_score(&hud);
        }
        if health {
            scoreboard.create_health(&hud);
        }
        if bullets {
            scoreboard.render_bullets_num(&hud);
        }
    }

    fn record_high_score(&mut self) {
        let mode = self.modes.mode();
        let scores = query::stats(&self.world).scores;
        let best = query::ships(&self.world)
            .iter()
            .filter(|(_, ship)| ship.active)
            .map(|(player, _)| scores[player])
            .max()
            .unwrap_or(0);
        info!(mode = mode.key(), score = best, "recording high score");
        self.collaborators.high_scores.record(mode, best);
    }
}

fn push_inputs(inputs: &PerPlayer<ShipInput>, out: &mut Vec<Command>) {
    for (player, input) in inputs.iter() {
        if input.steer != Vec2::ZERO {
            out.push(Command::SteerShip {
                player,
                direction: input.steer.clamp(Vec2::NEG_ONE, Vec2::ONE),
            });
        }
        if input.fire {
            out.push(Command::FireBullet { player });
        }
        if input.missile {
            out.push(Command::FireMissile { player });
        }
        if input.laser {
            out.push(Command::FireLaser { player });
        }
    }
}

fn sound_for(event: &Event) -> Option<SoundKey> {
    let sound = match event {
        Event::ProjectileFired {
            owner: ProjectileOwner::Player(_),
            kind,
            ..
        } => match kind {
            ProjectileKind::Bullet => SoundKey::Fire,
            ProjectileKind::Missile => SoundKey::MissileLaunch,
            ProjectileKind::Laser => SoundKey::Laser,
        },
        Event::MissileDetonated { .. } => SoundKey::MissileImpact,
        Event::AlienDestroyed { .. } => SoundKey::AlienExploding,
        Event::ShipHit { .. } => SoundKey::ShipHit,
        Event::ShieldConsumed { .. } => SoundKey::Shield,
        Event::PowerCollected { kind, .. } if kind.is_penalty() => SoundKey::Penalty,
        Event::PowerCollected { .. } => SoundKey::Power,
        Event::LevelAdvanced { .. } => SoundKey::LevelUp,
        Event::GameOver {
            outcome: Outcome::Victory | Outcome::Winner(_),
        } => SoundKey::Victory,
        Event::GameOver { .. } => SoundKey::GameOver,
        _ => return None,
    };
    Some(sound)
}

/// Inputs with every control released.
#[must_use]
pub fn idle_inputs() -> PerPlayer<ShipInput> {
    PerPlayer::splat(ShipInput::default())
}
