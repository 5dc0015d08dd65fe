#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game mode rule engine.
//!
//! Exactly one mode is active per session. The engine decides which spawners
//! run, ramps tunables on timers, seeds every level and detects the end of
//! the game. It reads immutable snapshots and answers with commands; the
//! world applies them.

use std::time::Duration;

use alien_onslaught_core::{
    tables, AlienFire, AlienPopulation, BossStats, Command, GameMode, Outcome, PerPlayer,
    PlayerId, Settings, ShipSnapshot, SpawnPolicy, SpeedupScale, Tunable,
};
use tracing::debug;

/// Spawners enabled for `mode` while `level` is being played.
#[must_use]
pub fn spawn_policy(mode: GameMode, level: u32) -> SpawnPolicy {
    match mode {
        GameMode::Normal | GameMode::LastBullet => SpawnPolicy {
            aliens: AlienPopulation::Seeded,
            alien_fire: Some(fleet_fire(level)),
            asteroids: level >= tables::ASTEROID_START_LEVEL,
            powers: true,
        },
        GameMode::SlowBurn => SpawnPolicy {
            aliens: AlienPopulation::Seeded,
            alien_fire: Some(fleet_fire(level)),
            asteroids: true,
            powers: true,
        },
        GameMode::BossRush => SpawnPolicy {
            aliens: AlienPopulation::Seeded,
            alien_fire: Some(if level > tables::BOSS_RUSH_FAST_FIRE_LEVEL {
                AlienFire::from_millis(1, 450, 450)
            } else {
                AlienFire::from_millis(1, 800, 800)
            }),
            asteroids: true,
            powers: true,
        },
        GameMode::EndlessOnslaught => SpawnPolicy {
            aliens: AlienPopulation::TopUp {
                ceiling: tables::ENDLESS_MAX_ALIENS,
                rows: tables::ENDLESS_BATCH_ROWS,
            },
            alien_fire: Some(AlienFire::from_millis(3, 1_200, 2_500)),
            asteroids: false,
            powers: true,
        },
        GameMode::MeteorMadness => SpawnPolicy {
            aliens: AlienPopulation::None,
            alien_fire: None,
            asteroids: true,
            powers: true,
        },
        GameMode::CosmicConflict => SpawnPolicy {
            aliens: AlienPopulation::None,
            alien_fire: None,
            asteroids: false,
            powers: true,
        },
    }
}

fn fleet_fire(level: u32) -> AlienFire {
    if tables::is_normal_boss_level(level) {
        AlienFire::from_millis(1, 700, 700)
    } else if level >= 10 {
        AlienFire::from_millis(3, 1_200, 2_500)
    } else {
        AlienFire::from_millis(2, 1_600, 3_000)
    }
}

/// Boss hit points and score for `level`, including the difficulty bonus.
///
/// Boss Rush grants smaller bonuses than the other modes because its bosses
/// arrive back to back.
#[must_use]
pub fn boss_stats(mode: GameMode, level: u32, scale: SpeedupScale) -> BossStats {
    let rush = mode == GameMode::BossRush;
    let base = if rush {
        tables::boss_rush_base(level)
    } else {
        tables::normal_boss_base(level)
    };
    let bonus = match (scale, rush) {
        (SpeedupScale::Easy, _) => 0,
        (SpeedupScale::Medium, true) => tables::BOSS_RUSH_MEDIUM_BONUS,
        (SpeedupScale::Medium, false) => tables::NORMAL_BOSS_MEDIUM_BONUS,
        (SpeedupScale::Hard, true) => tables::BOSS_RUSH_HARD_BONUS,
        (SpeedupScale::Hard, false) => tables::NORMAL_BOSS_HARD_BONUS,
    };
    BossStats::new(base.hp + bonus, base.points)
}

/// Gameplay times at which the timed rules last fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModeTimers {
    /// Last Endless Onslaught or Slow Burn speed change.
    pub last_increase: Duration,
    /// Last Meteor Madness level advance.
    pub last_level: Duration,
}

/// Read-only state consulted once per frame.
#[derive(Clone, Copy, Debug)]
pub struct ModeInputs<'a> {
    /// Gameplay time of the frame, paused time excluded.
    pub now: Duration,
    /// Level being played.
    pub level: u32,
    /// Both ships after this frame's collisions were applied.
    pub ships: &'a PerPlayer<ShipSnapshot>,
    /// Aliens still in play.
    pub alien_count: usize,
    /// Player bullets still in flight.
    pub bullets_in_flight: &'a PerPlayer<usize>,
    /// Live settings.
    pub settings: &'a Settings,
    /// Result of the session if it already ended.
    pub outcome: Option<Outcome>,
}

/// Pure system that applies the active mode's rules.
#[derive(Debug)]
pub struct GameModes {
    mode: GameMode,
    singleplayer: bool,
    timers: ModeTimers,
}

impl GameModes {
    /// Creates the rule engine for one session.
    #[must_use]
    pub fn new(mode: GameMode, singleplayer: bool) -> Self {
        Self {
            mode,
            singleplayer,
            timers: ModeTimers::default(),
        }
    }

    /// Replaces the rule timers, for sessions resumed mid-game.
    #[must_use]
    pub fn with_timers(mut self, timers: ModeTimers) -> Self {
        self.timers = timers;
        self
    }

    /// Active mode.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Current rule timers.
    #[must_use]
    pub fn timers(&self) -> ModeTimers {
        self.timers
    }

    /// Commands that populate level one.
    pub fn opening_commands(&self, scale: SpeedupScale, out: &mut Vec<Command>) {
        self.seed_level(1, scale, out);
    }

    /// Evaluates timed ramps, Last Bullet exhaustion, the end of the game and
    /// level progression, in that order.
    pub fn handle(&mut self, inputs: &ModeInputs<'_>, out: &mut Vec<Command>) {
        if inputs.outcome.is_some() {
            return;
        }

        self.ramp(inputs, out);

        let mut down = inputs
            .ships
            .map(|_, ship| ship.active && !ship.state.alive);
        if self.mode == GameMode::LastBullet {
            for (player, ship) in inputs.ships.iter() {
                let exhausted = ship.in_play()
                    && ship.remaining_bullets == Some(0)
                    && inputs.bullets_in_flight[player] == 0
                    && inputs.alien_count > 0;
                if exhausted {
                    down[player] = true;
                    out.push(Command::DisableShip { player });
                }
            }
        }

        if let Some(outcome) = self.outcome(inputs.ships, &down) {
            out.push(Command::EndGame { outcome });
            return;
        }

        self.progress(inputs, out);
    }

    fn ramp(&mut self, inputs: &ModeInputs<'_>, out: &mut Vec<Command>) {
        let since_increase = inputs.now.saturating_sub(self.timers.last_increase);
        let since_level = inputs.now.saturating_sub(self.timers.last_level);
        match self.mode {
            GameMode::EndlessOnslaught if since_increase >= tables::ENDLESS_INTERVAL => {
                self.timers.last_increase = inputs.now;
                debug!(now = ?inputs.now, "endless onslaught speed-up");
                for tunable in [Tunable::AlienSpeed, Tunable::AlienBulletSpeed] {
                    out.push(Command::AdjustTunable {
                        tunable,
                        delta: tables::ENDLESS_SPEED_INCREMENT,
                        floor: None,
                        ceiling: None,
                    });
                }
            }
            GameMode::SlowBurn if since_increase >= tables::SLOW_BURN_INTERVAL => {
                self.timers.last_increase = inputs.now;
                debug!(now = ?inputs.now, "slow burn slow-down");
                for player in PlayerId::ALL {
                    for tunable in [Tunable::ShipSpeed(player), Tunable::BulletSpeed(player)] {
                        out.push(Command::AdjustTunable {
                            tunable,
                            delta: -tables::SLOW_BURN_DECREMENT,
                            floor: Some(tables::SLOW_BURN_FLOOR),
                            ceiling: None,
                        });
                    }
                }
            }
            GameMode::MeteorMadness if since_level >= tables::METEOR_LEVEL_INTERVAL => {
                self.timers.last_level = inputs.now;
                debug!(level = inputs.level + 1, "meteor madness level timer");
                out.push(Command::AdvanceLevel);
                out.push(Command::AwardBonus {
                    points: tables::METEOR_LEVEL_BONUS,
                });
                out.push(Command::AdjustTunable {
                    tunable: Tunable::AsteroidSpeed,
                    delta: tables::METEOR_SPEED_INCREMENT,
                    floor: None,
                    ceiling: None,
                });
                out.push(Command::AdjustTunable {
                    tunable: Tunable::AsteroidFrequency,
                    delta: -tables::METEOR_FREQUENCY_DECREMENT_MS,
                    floor: Some(tables::METEOR_FREQUENCY_FLOOR_MS),
                    ceiling: None,
                });
            }
            _ => {}
        }
    }

    fn outcome(&self, ships: &PerPlayer<ShipSnapshot>, down: &PerPlayer<bool>) -> Option<Outcome> {
        if self.mode.is_pvp() {
            return match (down[PlayerId::Thunderbird], down[PlayerId::Phoenix]) {
                (true, true) => Some(Outcome::Draw),
                (true, false) => Some(Outcome::Winner(PlayerId::Phoenix)),
                (false, true) => Some(Outcome::Winner(PlayerId::Thunderbird)),
                (false, false) => None,
            };
        }
        let defeated = ships
            .iter()
            .filter(|(_, ship)| ship.active)
            .all(|(player, _)| down[player]);
        defeated.then_some(Outcome::Defeat)
    }

    fn progress(&self, inputs: &ModeInputs<'_>, out: &mut Vec<Command>) {
        let cleared_by_aliens = !matches!(
            self.mode,
            GameMode::MeteorMadness | GameMode::CosmicConflict | GameMode::EndlessOnslaught
        );
        if !cleared_by_aliens || inputs.alien_count > 0 {
            return;
        }

        if self.mode == GameMode::BossRush && inputs.level >= tables::BOSS_RUSH_FINAL_LEVEL {
            out.push(Command::EndGame {
                outcome: Outcome::Victory,
            });
            return;
        }

        let next = inputs.level + 1;
        debug!(mode = self.mode.key(), level = next, "level cleared");
        out.push(Command::AdvanceLevel);
        self.seed_level(next, inputs.settings.speedup_scale, out);

        if self.mode == GameMode::Normal && !self.singleplayer && next == tables::REVIVE_LEVEL {
            out.push(Command::ReviveShips);
        }
    }

    fn seed_level(&self, level: u32, scale: SpeedupScale, out: &mut Vec<Command>) {
        match self.mode {
            GameMode::BossRush => self.seed_boss(level, scale, out),
            GameMode::Normal | GameMode::SlowBurn | GameMode::LastBullet => {
                if tables::is_normal_boss_level(level) {
                    self.seed_boss(level, scale, out);
                } else {
                    out.push(Command::SpawnFleet {
                        rows: tables::fleet_rows(level),
                    });
                }
            }
            GameMode::EndlessOnslaught => out.push(Command::SpawnFleet {
                rows: tables::fleet_rows(level),
            }),
            GameMode::MeteorMadness | GameMode::CosmicConflict => {}
        }

        if self.mode == GameMode::LastBullet {
            let bullets = tables::last_bullet_allowance(level, self.singleplayer);
            for player in PlayerId::ALL {
                out.push(Command::SetBulletAllowance { player, bullets });
            }
        }
    }

    fn seed_boss(&self, level: u32, scale: SpeedupScale, out: &mut Vec<Command>) {
        let stats = boss_stats(self.mode, level, scale);
        out.push(Command::ConfigureBoss {
            hp: stats.hp,
            points: stats.points,
        });
        out.push(Command::SpawnBoss);
    }
}
