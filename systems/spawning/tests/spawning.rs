use std::{collections::BTreeSet, time::Duration};

use alien_onslaught_core::{
    tables, AlienFire, AlienPopulation, AlienView, Command, EffectKind, Event, GameMode, PlayerId,
    PowerId, PowerKind, Settings, SpawnPolicy, Tunable,
};
use alien_onslaught_system_spawning::{Config, Spawning};
use alien_onslaught_world::{self as world, query, World};

const QUIET: SpawnPolicy = SpawnPolicy {
    aliens: AlienPopulation::Seeded,
    alien_fire: None,
    asteroids: false,
    powers: false,
};

fn configured(mode: GameMode) -> World {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![Command::ConfigureSession {
            mode,
            singleplayer: true,
            settings: Box::default(),
            high_score: 0,
        }],
    );
    world
}

fn apply_all(world: &mut World, commands: Vec<Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn spawn_at(
    spawning: &mut Spawning,
    world: &mut World,
    policy: &SpawnPolicy,
    millis: u64,
) -> Vec<Command> {
    let now = Duration::from_millis(millis);
    let _ = apply_all(world, vec![Command::Tick { now }]);
    let mut commands = Vec::new();
    spawning.handle(
        now,
        policy,
        &query::alien_view(world),
        query::settings(world),
        &mut commands,
    );
    commands
}

fn shooters(commands: &[Command]) -> BTreeSet<u32> {
    commands
        .iter()
        .filter_map(|command| match command {
            Command::FireAlienBullet { alien } => Some(alien.get()),
            _ => None,
        })
        .collect()
}

#[test]
fn top_up_requests_fleet_rows_below_the_ceiling() {
    let mut world = configured(GameMode::EndlessOnslaught);
    let mut spawning = Spawning::new(Config::new(0x1234_5678));
    let policy = SpawnPolicy {
        aliens: AlienPopulation::TopUp {
            ceiling: tables::ENDLESS_MAX_ALIENS,
            rows: tables::ENDLESS_BATCH_ROWS,
        },
        ..QUIET
    };

    assert!(spawn_at(&mut spawning, &mut world, &policy, 4_000).is_empty());
    let commands = spawn_at(&mut spawning, &mut world, &policy, 5_000);
    assert_eq!(commands, vec![Command::SpawnFleet { rows: 1 }]);
    let _ = apply_all(&mut world, commands);

    assert!(
        spawn_at(&mut spawning, &mut world, &policy, 6_000).is_empty(),
        "top-ups are rate limited"
    );

    let _ = apply_all(&mut world, vec![Command::SpawnFleet { rows: 4 }]);
    assert!(query::alien_count(&world) >= tables::ENDLESS_MAX_ALIENS);
    assert!(
        spawn_at(&mut spawning, &mut world, &policy, 20_000).is_empty(),
        "a full fleet is not topped up"
    );
}

#[test]
fn alien_volleys_respect_the_per_alien_cooldown() {
    let mut world = configured(GameMode::Normal);
    let _ = apply_all(&mut world, vec![Command::SpawnFleet { rows: 1 }]);
    let mut spawning = Spawning::new(Config::new(42));
    let policy = SpawnPolicy {
        alien_fire: Some(AlienFire::from_millis(2, 1_000, 3_000)),
        ..QUIET
    };

    assert!(spawn_at(&mut spawning, &mut world, &policy, 500).is_empty());

    let first = spawn_at(&mut spawning, &mut world, &policy, 1_000);
    let first_shooters = shooters(&first);
    assert_eq!(first.len(), 2);
    assert_eq!(first_shooters.len(), 2, "shooters are distinct");
    let _ = apply_all(&mut world, first);

    assert!(spawn_at(&mut spawning, &mut world, &policy, 1_500).is_empty());

    let second = spawn_at(&mut spawning, &mut world, &policy, 2_000);
    let second_shooters = shooters(&second);
    assert_eq!(second_shooters.len(), 2);
    assert!(
        first_shooters.is_disjoint(&second_shooters),
        "aliens wait for their own cooldown"
    );
}

#[test]
fn frozen_aliens_hold_their_fire() {
    let mut world = configured(GameMode::Normal);
    let _ = apply_all(
        &mut world,
        vec![
            Command::SpawnFleet { rows: 1 },
            Command::SpawnPower {
                kind: PowerKind::Effect(EffectKind::FreezeAliens),
                x: 0.0,
            },
            Command::CollectPower {
                player: PlayerId::Thunderbird,
                power: PowerId::new(0),
            },
        ],
    );
    let mut spawning = Spawning::new(Config::new(3));
    let policy = SpawnPolicy {
        alien_fire: Some(AlienFire::from_millis(3, 100, 100)),
        ..QUIET
    };

    assert!(spawn_at(&mut spawning, &mut world, &policy, 2_000).is_empty());
    assert_eq!(
        shooters(&spawn_at(&mut spawning, &mut world, &policy, 5_000)).len(),
        3
    );
}

#[test]
fn asteroid_cadence_follows_the_live_frequency() {
    let mut world = configured(GameMode::MeteorMadness);
    let mut spawning = Spawning::new(Config::new(9));
    let policy = SpawnPolicy {
        aliens: AlienPopulation::None,
        asteroids: true,
        ..QUIET
    };
    let frequency = query::settings(&world).asteroid_frequency_ms as u64;

    assert!(spawn_at(&mut spawning, &mut world, &policy, frequency - 1).is_empty());
    let commands = spawn_at(&mut spawning, &mut world, &policy, frequency);
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Command::SpawnAsteroid { .. }));
    let _ = apply_all(&mut world, commands);

    let _ = apply_all(
        &mut world,
        vec![Command::AdjustTunable {
            tunable: Tunable::AsteroidFrequency,
            delta: -10_000.0,
            floor: Some(tables::METEOR_FREQUENCY_FLOOR_MS),
            ceiling: None,
        }],
    );
    assert!(spawn_at(&mut spawning, &mut world, &policy, frequency + 299).is_empty());
    assert_eq!(
        spawn_at(&mut spawning, &mut world, &policy, frequency + 300).len(),
        1
    );
}

#[test]
fn powers_fall_every_ten_seconds_from_the_pool() {
    let mut world = configured(GameMode::Normal);
    let mut spawning = Spawning::new(Config::new(11));
    let policy = SpawnPolicy {
        powers: true,
        ..QUIET
    };
    let width = query::settings(&world).screen_width;

    let mut spawned = 0;
    for second in 1..=60_u64 {
        for command in spawn_at(&mut spawning, &mut world, &policy, second * 1_000) {
            match command {
                Command::SpawnPower { kind, x } => {
                    assert!(tables::POWER_POOL.contains(&kind));
                    assert!((0.0..width).contains(&x));
                    spawned += 1;
                }
                other => panic!("unexpected command emitted: {other:?}"),
            }
        }
    }
    assert_eq!(spawned, 6);
}

#[test]
fn seed_reproduces_the_spawn_sequence() {
    let policy = SpawnPolicy {
        aliens: AlienPopulation::None,
        alien_fire: None,
        asteroids: true,
        powers: true,
    };
    let run = |seed: u64| {
        let mut spawning = Spawning::new(Config::new(seed));
        let settings = Settings::default();
        let aliens = AlienView::default();
        let mut commands = Vec::new();
        for frame in 1..=600_u64 {
            spawning.handle(
                Duration::from_millis(frame * 100),
                &policy,
                &aliens,
                &settings,
                &mut commands,
            );
        }
        commands
    };

    assert_eq!(run(0xfeed), run(0xfeed));
    assert_ne!(run(0xfeed), run(0xbeef));
}

#[test]
fn disabled_spawners_stay_silent() {
    let mut world = configured(GameMode::CosmicConflict);
    let mut spawning = Spawning::new(Config::new(1));
    let policy = SpawnPolicy {
        aliens: AlienPopulation::None,
        ..QUIET
    };
    for second in 1..=30_u64 {
        assert!(spawn_at(&mut spawning, &mut world, &policy, second * 1_000).is_empty());
    }
}
