#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for fleets, alien volleys,
//! asteroids and powers.
//!
//! Each spawner remembers when it last fired and only emits commands once
//! its interval has elapsed on the gameplay clock. A seeded ChaCha stream
//! picks positions, shooters and power kinds, so a seed reproduces a session.

use std::time::Duration;

use alien_onslaught_core::{
    tables, AlienFire, AlienPopulation, AlienView, Command, SpawnPolicy, Settings,
};
use glam::Vec2;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided random seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits spawn commands once their intervals elapse.
#[derive(Debug)]
pub struct Spawning {
    rng: ChaCha8Rng,
    last_top_up: Duration,
    last_alien_fire: Duration,
    last_asteroid: Duration,
    last_power: Duration,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            last_top_up: Duration::ZERO,
            last_alien_fire: Duration::ZERO,
            last_asteroid: Duration::ZERO,
            last_power: Duration::ZERO,
        }
    }

    /// Emits the spawn commands that are due at `now` under `policy`.
    pub fn handle(
        &mut self,
        now: Duration,
        policy: &SpawnPolicy,
        aliens: &AlienView,
        settings: &Settings,
        out: &mut Vec<Command>,
    ) {
        if let AlienPopulation::TopUp { ceiling, rows } = policy.aliens {
            self.top_up_fleet(now, ceiling, rows, aliens, out);
        }
        if let Some(fire) = policy.alien_fire {
            self.fire_alien_bullets(now, fire, aliens, out);
        }
        if policy.asteroids {
            self.spawn_asteroid(now, settings, out);
        }
        if policy.powers {
            self.spawn_power(now, settings, out);
        }
    }

    fn top_up_fleet(
        &mut self,
        now: Duration,
        ceiling: usize,
        rows: u32,
        aliens: &AlienView,
        out: &mut Vec<Command>,
    ) {
        if aliens.len() >= ceiling || !elapsed(now, self.last_top_up, tables::ENDLESS_TOP_UP_INTERVAL)
        {
            return;
        }
        self.last_top_up = now;
        out.push(Command::SpawnFleet { rows });
    }

    /// Picks up to `fire.count` aliens whose own cooldown elapsed.
    fn fire_alien_bullets(
        &mut self,
        now: Duration,
        fire: AlienFire,
        aliens: &AlienView,
        out: &mut Vec<Command>,
    ) {
        if !elapsed(now, self.last_alien_fire, fire.global_interval) {
            return;
        }
        let ready: Vec<_> = aliens
            .iter()
            .filter(|alien| !alien.frozen)
            .filter(|alien| {
                alien
                    .last_bullet_time
                    .map_or(true, |last| elapsed(now, last, fire.per_alien_interval))
            })
            .map(|alien| alien.id)
            .collect();
        if ready.is_empty() {
            return;
        }
        self.last_alien_fire = now;
        out.extend(
            ready
                .choose_multiple(&mut self.rng, fire.count)
                .map(|alien| Command::FireAlienBullet { alien: *alien }),
        );
    }

    fn spawn_asteroid(&mut self, now: Duration, settings: &Settings, out: &mut Vec<Command>) {
        let frequency = Duration::from_millis(settings.asteroid_frequency_ms.max(0.0) as u64);
        if !elapsed(now, self.last_asteroid, frequency) {
            return;
        }
        self.last_asteroid = now;
        let x = self.random_x(settings, tables::ASTEROID_SIZE);
        out.push(Command::SpawnAsteroid { x });
    }

    fn spawn_power(&mut self, now: Duration, settings: &Settings, out: &mut Vec<Command>) {
        if !elapsed(now, self.last_power, tables::POWER_INTERVAL) {
            return;
        }
        self.last_power = now;
        let Some(kind) = tables::POWER_POOL.choose(&mut self.rng).copied() else {
            return;
        };
        let x = self.random_x(settings, tables::POWER_SIZE);
        out.push(Command::SpawnPower { kind, x });
    }

    fn random_x(&mut self, settings: &Settings, size: Vec2) -> f32 {
        let span = (settings.screen_width - size.x).max(1.0);
        self.rng.gen_range(0.0..span)
    }
}

fn elapsed(now: Duration, since: Duration, interval: Duration) -> bool {
    now.saturating_sub(since) >= interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals_compare_inclusively() {
        assert!(elapsed(Duration::from_secs(5), Duration::ZERO, Duration::from_secs(5)));
        assert!(!elapsed(Duration::from_secs(4), Duration::ZERO, Duration::from_secs(5)));
        assert!(!elapsed(Duration::ZERO, Duration::from_secs(3), Duration::from_secs(1)));
    }

    #[test]
    fn random_positions_stay_on_screen() {
        let mut spawning = Spawning::new(Config::new(7));
        let settings = Settings::default();
        for _ in 0..100 {
            let x = spawning.random_x(&settings, tables::ASTEROID_SIZE);
            assert!((0.0..settings.screen_width - tables::ASTEROID_SIZE.x).contains(&x));
        }
    }
}
