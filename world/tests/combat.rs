use std::time::Duration;

use alien_onslaught_core::{
    AlienId, AlienKind, Command, EffectKind, EntityRef, EscapePenalty, Event, GameMode, HitCause,
    PlayerId, PowerId, PowerKind, ProjectileId, ProjectileKind, Settings,
};
use alien_onslaught_world::{self as world, query, World};

fn configured(mode: GameMode, singleplayer: bool, settings: Settings) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureSession {
            mode,
            singleplayer,
            settings: Box::new(settings),
            high_score: 0,
        },
        &mut events,
    );
    world
}

fn run(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn tick(world: &mut World, millis: u64) -> Vec<Event> {
    run(
        world,
        [Command::Tick {
            now: Duration::from_millis(millis),
        }],
    )
}

fn last_projectile(world: &World) -> ProjectileId {
    query::projectile_view(world)
        .iter()
        .last()
        .map(|projectile| projectile.id)
        .expect("a projectile is in flight")
}

fn fire_and_land(world: &mut World, alien: AlienId) -> Vec<Event> {
    let _ = run(
        world,
        [Command::FireBullet {
            player: PlayerId::Thunderbird,
        }],
    );
    let projectile = last_projectile(world);
    run(
        world,
        [
            Command::BulletHitAlien { projectile, alien },
            Command::Despawn {
                entity: EntityRef::Projectile(projectile),
            },
        ],
    )
}

fn destroyed(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::AlienDestroyed { .. }))
        .count()
}

#[test]
fn third_bullet_destroys_alien_and_credits_once() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = run(&mut world, [Command::SpawnFleet { rows: 1 }]);
    let _ = tick(&mut world, 2_000);
    let alien = AlienId::new(0);
    let points = query::settings(&world).alien_points;

    let first = fire_and_land(&mut world, alien);
    let second = fire_and_land(&mut world, alien);
    assert_eq!(destroyed(&first) + destroyed(&second), 0);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 0);
    assert_eq!(query::alien_view(&world).get(alien).map(|a| a.hit_count), Some(2));

    let third = fire_and_land(&mut world, alien);
    assert_eq!(destroyed(&third), 1);
    assert!(query::alien_view(&world).get(alien).is_none());
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], points);

    let fourth = fire_and_land(&mut world, alien);
    assert_eq!(destroyed(&fourth), 0);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], points);
}

#[test]
fn spawn_immunity_defers_destruction() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = run(&mut world, [Command::SpawnFleet { rows: 1 }]);
    let alien = AlienId::new(3);

    for _ in 0..3 {
        assert_eq!(destroyed(&fire_and_land(&mut world, alien)), 0);
    }
    assert_eq!(query::alien_view(&world).get(alien).map(|a| a.hit_count), Some(3));

    let _ = tick(&mut world, 1_500);
    assert_eq!(destroyed(&fire_and_land(&mut world, alien)), 1);
}

#[test]
fn boss_takes_explosion_damage_once_per_missile() {
    let mut settings = Settings::default();
    settings.starting_missiles = 2;
    let mut world = configured(GameMode::Normal, true, settings);
    let _ = run(
        &mut world,
        [
            Command::ConfigureBoss {
                hp: 10,
                points: 4_000,
            },
            Command::SpawnBoss,
        ],
    );
    let _ = tick(&mut world, 2_000);
    let boss = AlienId::new(0);

    let blast = |world: &mut World| {
        let _ = run(
            world,
            [Command::FireMissile {
                player: PlayerId::Thunderbird,
            }],
        );
        let missile = last_projectile(world);
        let hit = Command::ExplosionHitAlien {
            projectile: missile,
            alien: boss,
        };
        let events = run(
            world,
            [
                Command::DetonateMissile {
                    projectile: missile,
                },
                hit.clone(),
                hit.clone(),
                Command::AdvanceExplosion {
                    projectile: missile,
                },
                hit,
            ],
        );
        (missile, events)
    };

    let (first_missile, first) = blast(&mut world);
    assert!(query::collision_handled(&world, first_missile, boss));
    assert_eq!(query::alien_view(&world).get(boss).map(|a| a.hit_count), Some(5));
    assert_eq!(destroyed(&first), 0);

    let _ = run(
        &mut world,
        [Command::Despawn {
            entity: EntityRef::Projectile(first_missile),
        }],
    );
    assert!(!query::collision_handled(&world, first_missile, boss));

    let (_, second) = blast(&mut world);
    assert_eq!(destroyed(&second), 1);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 4_000);
}

#[test]
fn explosion_destroys_fleet_alien_immediately() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = run(&mut world, [Command::SpawnFleet { rows: 1 }]);
    let _ = tick(&mut world, 2_000);
    let _ = run(
        &mut world,
        [Command::FireMissile {
            player: PlayerId::Thunderbird,
        }],
    );
    let missile = last_projectile(&world);
    let events = run(
        &mut world,
        [
            Command::DetonateMissile {
                projectile: missile,
            },
            Command::ExplosionHitAlien {
                projectile: missile,
                alien: AlienId::new(4),
            },
        ],
    );
    assert!(events.contains(&Event::AlienDestroyed {
        alien: AlienId::new(4),
        kind: AlienKind::Normal,
        by: Some(PlayerId::Thunderbird),
    }));
}

#[test]
fn area_hits_ignore_fleet_spawn_immunity() {
    let mut settings = Settings::default();
    settings.starting_lasers = 1;
    let mut world = configured(GameMode::Normal, true, settings);
    let _ = run(&mut world, [Command::SpawnFleet { rows: 1 }]);
    assert!(query::alien_view(&world)
        .get(AlienId::new(2))
        .is_some_and(|alien| alien.immune));

    let _ = run(
        &mut world,
        [Command::FireMissile {
            player: PlayerId::Thunderbird,
        }],
    );
    let missile = last_projectile(&world);
    let _ = run(
        &mut world,
        [Command::FireLaser {
            player: PlayerId::Thunderbird,
        }],
    );
    let beam = last_projectile(&world);
    let events = run(
        &mut world,
        [
            Command::DetonateMissile {
                projectile: missile,
            },
            Command::ExplosionHitAlien {
                projectile: missile,
                alien: AlienId::new(2),
            },
            Command::LaserHitAlien {
                projectile: beam,
                alien: AlienId::new(3),
            },
        ],
    );
    for alien in [AlienId::new(2), AlienId::new(3)] {
        assert!(events.contains(&Event::AlienDestroyed {
            alien,
            kind: AlienKind::Normal,
            by: Some(PlayerId::Thunderbird),
        }));
        assert!(query::alien_view(&world).get(alien).is_none());
    }
}

#[test]
fn hit_pipeline_grants_immunity() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let hit = Command::HitShip {
        player: PlayerId::Thunderbird,
        cause: HitCause::Alien,
    };
    let events = run(&mut world, [hit.clone(), hit.clone()]);
    let hits = events
        .iter()
        .filter(|event| matches!(event, Event::ShipHit { .. }))
        .count();
    assert_eq!(hits, 1);
    let ship = query::ship(&world, PlayerId::Thunderbird);
    assert_eq!(ship.health, 2);
    assert!(ship.state.immune && ship.state.exploding);

    let _ = tick(&mut world, 3_000);
    let _ = run(&mut world, [hit]);
    assert_eq!(query::ship(&world, PlayerId::Thunderbird).health, 1);
}

#[test]
fn last_hit_point_kills_the_ship() {
    let mut settings = Settings::default();
    settings.starting_health = 1;
    let mut world = configured(GameMode::Normal, true, settings);
    let events = run(
        &mut world,
        [Command::HitShip {
            player: PlayerId::Thunderbird,
            cause: HitCause::Asteroid,
        }],
    );
    assert!(events.contains(&Event::ShipDestroyed {
        player: PlayerId::Thunderbird,
    }));
    let ship = query::ship(&world, PlayerId::Thunderbird);
    assert_eq!(ship.health, 0);
    assert!(!ship.state.alive);
}

#[test]
fn shield_absorbs_one_contact() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = run(
        &mut world,
        [
            Command::SpawnPower {
                kind: PowerKind::Effect(EffectKind::Shield),
                x: 100.0,
            },
            Command::CollectPower {
                player: PlayerId::Thunderbird,
                power: PowerId::new(0),
            },
            Command::SpawnFleet { rows: 1 },
        ],
    );
    assert!(query::ship(&world, PlayerId::Thunderbird).state.shielded);

    let events = run(
        &mut world,
        [
            Command::ShieldContact {
                player: PlayerId::Thunderbird,
                entity: EntityRef::Alien(AlienId::new(0)),
            },
            Command::ShieldContact {
                player: PlayerId::Thunderbird,
                entity: EntityRef::Alien(AlienId::new(1)),
            },
        ],
    );
    assert_eq!(destroyed(&events), 1);
    assert!(!query::ship(&world, PlayerId::Thunderbird).state.shielded);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 0);
}

#[test]
fn escape_costs_every_active_ship_one_hit_point() {
    let mut world = configured(GameMode::Normal, false, Settings::default());
    let _ = run(&mut world, [Command::SpawnFleet { rows: 1 }]);
    let _ = run(
        &mut world,
        [Command::AlienEscaped {
            alien: AlienId::new(0),
            penalty: EscapePenalty::Health,
        }],
    );
    for player in PlayerId::ALL {
        assert_eq!(query::ship(&world, player).health, 2);
    }

    let mut single = configured(GameMode::Normal, true, Settings::default());
    let _ = run(&mut single, [Command::SpawnFleet { rows: 1 }]);
    let events = run(
        &mut single,
        [Command::AlienEscaped {
            alien: AlienId::new(0),
            penalty: EscapePenalty::Health,
        }],
    );
    let health_changes = events
        .iter()
        .filter(|event| matches!(event, Event::HealthChanged { .. }))
        .count();
    assert_eq!(health_changes, 1);
}

#[test]
fn opponent_bullet_scores_a_thousand() {
    let mut world = configured(GameMode::CosmicConflict, false, Settings::default());
    let _ = run(
        &mut world,
        [Command::FireBullet {
            player: PlayerId::Thunderbird,
        }],
    );
    let bullet = last_projectile(&world);
    let events = run(
        &mut world,
        [Command::ProjectileHitShip {
            projectile: bullet,
            player: PlayerId::Phoenix,
        }],
    );
    assert!(events.contains(&Event::ShipHit {
        player: PlayerId::Phoenix,
        cause: HitCause::Opponent,
        health: 2,
    }));
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 1_000);
    assert!(query::projectile_view(&world).is_empty());
}

#[test]
fn advancing_level_clears_transient_entities() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = run(
        &mut world,
        [
            Command::FireBullet {
                player: PlayerId::Thunderbird,
            },
            Command::SpawnAsteroid { x: 10.0 },
            Command::SpawnPower {
                kind: PowerKind::Health,
                x: 20.0,
            },
        ],
    );
    let points = query::settings(&world).alien_points;
    let events = run(&mut world, [Command::AdvanceLevel]);

    assert!(events.contains(&Event::LevelAdvanced { level: 2 }));
    assert!(query::projectile_view(&world).is_empty());
    assert!(query::asteroid_view(&world).is_empty());
    assert!(query::power_view(&world).is_empty());
    assert!(query::settings(&world).alien_points > points);
    assert!(query::ship(&world, PlayerId::Thunderbird).state.warping);
}

#[test]
fn bullet_allowance_limits_firing() {
    let mut world = configured(GameMode::LastBullet, true, Settings::default());
    let _ = run(
        &mut world,
        [
            Command::SetBulletAllowance {
                player: PlayerId::Thunderbird,
                bullets: 1,
            },
            Command::FireBullet {
                player: PlayerId::Thunderbird,
            },
            Command::FireBullet {
                player: PlayerId::Thunderbird,
            },
        ],
    );
    let bullets = query::projectile_view(&world)
        .iter()
        .filter(|projectile| projectile.kind == ProjectileKind::Bullet)
        .count();
    assert_eq!(bullets, 1);
    assert_eq!(
        query::ship(&world, PlayerId::Thunderbird).remaining_bullets,
        Some(0)
    );
}
