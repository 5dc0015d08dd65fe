use std::time::Duration;

use alien_onslaught_core::{
    AlienId, AlienKind, AsteroidId, Command, EffectKind, EntityRef, EscapePenalty, Event,
    GameMode, HitCause, PlayerId, PowerId, PowerKind, ProjectileId, Settings,
};
use alien_onslaught_system_collision::Collision;
use alien_onslaught_world::{self as world, query, World};
use glam::Vec2;

fn configured(mode: GameMode, singleplayer: bool, settings: Settings) -> World {
    let mut world = World::new();
    let _ = apply_all(
        &mut world,
        vec![Command::ConfigureSession {
            mode,
            singleplayer,
            settings: Box::new(settings),
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

fn detect(world: &World) -> Vec<Command> {
    let mut commands = Vec::new();
    Collision.handle(
        query::mode(world),
        &query::ships(world),
        &query::alien_view(world),
        &query::projectile_view(world),
        &query::asteroid_view(world),
        &query::power_view(world),
        query::settings(world),
        &mut commands,
    );
    commands
}

fn resolve(world: &mut World) -> (Vec<Command>, Vec<Event>) {
    let commands = detect(world);
    let events = apply_all(world, commands.clone());
    (commands, events)
}

fn center_of(world: &World, entity: EntityRef) -> Vec2 {
    let rect = match entity {
        EntityRef::Alien(id) => query::alien_view(world).get(id).map(|alien| alien.rect),
        EntityRef::Projectile(id) => query::projectile_view(world)
            .iter()
            .find(|projectile| projectile.id == id)
            .map(|projectile| projectile.rect),
        EntityRef::Asteroid(id) => query::asteroid_view(world)
            .iter()
            .find(|asteroid| asteroid.id == id)
            .map(|asteroid| asteroid.rect),
        EntityRef::Power(id) => query::power_view(world)
            .iter()
            .find(|power| power.id == id)
            .map(|power| power.rect),
    };
    rect.expect("entity is in play").center()
}

fn place(world: &mut World, entity: EntityRef, target: Vec2) {
    let delta = target - center_of(world, entity);
    let _ = apply_all(world, vec![Command::MoveEntity { entity, delta }]);
}

fn ship_center(world: &World, player: PlayerId) -> Vec2 {
    query::ship(world, player).rect.center()
}

fn tick(world: &mut World, millis: u64) {
    let _ = apply_all(
        world,
        vec![Command::Tick {
            now: Duration::from_millis(millis),
        }],
    );
}

fn fire(world: &mut World, command: Command) -> ProjectileId {
    let _ = apply_all(world, vec![command]);
    query::projectile_view(world)
        .iter()
        .last()
        .map(|projectile| projectile.id)
        .expect("a projectile was fired")
}

fn count(events: &[Event], predicate: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

#[test]
fn third_overlapping_bullet_destroys_the_alien() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = apply_all(&mut world, vec![Command::SpawnFleet { rows: 1 }]);
    tick(&mut world, 2_000);
    let alien = AlienId::new(0);
    let target = center_of(&world, EntityRef::Alien(alien));

    let mut scores = Vec::new();
    for _ in 0..3 {
        let bullet = fire(
            &mut world,
            Command::FireBullet {
                player: PlayerId::Thunderbird,
            },
        );
        place(&mut world, EntityRef::Projectile(bullet), target);
        let (commands, _) = resolve(&mut world);
        assert_eq!(
            commands,
            vec![
                Command::BulletHitAlien {
                    projectile: bullet,
                    alien
                },
                Command::Despawn {
                    entity: EntityRef::Projectile(bullet)
                },
            ]
        );
        assert!(query::projectile_view(&world).is_empty(), "bullet consumed");
        scores.push(query::stats(&world).scores[PlayerId::Thunderbird]);
    }

    let points = query::settings(&world).alien_points;
    assert_eq!(scores, vec![0, 0, points]);
    assert!(query::alien_view(&world).get(alien).is_none());
}

#[test]
fn shield_absorbs_a_single_contact_then_the_ship_is_exposed() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = apply_all(
        &mut world,
        vec![
            Command::SpawnPower {
                kind: PowerKind::Effect(EffectKind::Shield),
                x: 0.0,
            },
            Command::CollectPower {
                player: PlayerId::Thunderbird,
                power: PowerId::new(0),
            },
            Command::SpawnAsteroid { x: 0.0 },
            Command::SpawnAsteroid { x: 100.0 },
        ],
    );
    tick(&mut world, 1_500);
    let ship = ship_center(&world, PlayerId::Thunderbird);
    place(&mut world, EntityRef::Asteroid(AsteroidId::new(0)), ship);
    place(&mut world, EntityRef::Asteroid(AsteroidId::new(1)), ship);

    let (commands, events) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![Command::ShieldContact {
            player: PlayerId::Thunderbird,
            entity: EntityRef::Asteroid(AsteroidId::new(0)),
        }]
    );
    assert!(events.contains(&Event::ShieldConsumed {
        player: PlayerId::Thunderbird
    }));
    assert!(!query::ship(&world, PlayerId::Thunderbird).state.shielded);
    assert_eq!(query::asteroid_view(&world).len(), 1);

    let (commands, _) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![
            Command::HitShip {
                player: PlayerId::Thunderbird,
                cause: HitCause::Asteroid,
            },
            Command::DestroyAsteroid {
                asteroid: AsteroidId::new(1)
            },
        ]
    );
}

#[test]
fn a_ship_takes_at_most_one_hit_per_frame() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = apply_all(
        &mut world,
        vec![
            Command::SpawnFleet { rows: 1 },
            Command::SpawnAsteroid { x: 0.0 },
            Command::FireAlienBullet {
                alien: AlienId::new(0),
            },
        ],
    );
    let ship = ship_center(&world, PlayerId::Thunderbird);
    place(&mut world, EntityRef::Asteroid(AsteroidId::new(0)), ship);
    place(&mut world, EntityRef::Projectile(ProjectileId::new(0)), ship);

    let (commands, events) = resolve(&mut world);
    let hits = commands
        .iter()
        .filter(|command| {
            matches!(
                command,
                Command::HitShip { .. } | Command::ProjectileHitShip { .. }
            )
        })
        .count();
    assert_eq!(hits, 1);
    assert_eq!(count(&events, |event| matches!(event, Event::ShipHit { .. })), 1);
    assert_eq!(query::ship(&world, PlayerId::Thunderbird).health, 2);

    let (commands, _) = resolve(&mut world);
    assert!(
        commands
            .iter()
            .all(|command| !matches!(command, Command::ProjectileHitShip { .. })),
        "immune ship ignores the remaining bullet"
    );
}

#[test]
fn missile_detonates_on_contact_and_explosion_kills_the_alien() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = apply_all(&mut world, vec![Command::SpawnFleet { rows: 1 }]);
    tick(&mut world, 2_000);
    let alien = AlienId::new(0);
    let missile = fire(
        &mut world,
        Command::FireMissile {
            player: PlayerId::Thunderbird,
        },
    );
    let target = center_of(&world, EntityRef::Alien(alien));
    place(&mut world, EntityRef::Projectile(missile), target);

    let (commands, _) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![Command::DetonateMissile {
            projectile: missile
        }]
    );

    let (commands, events) = resolve(&mut world);
    assert!(commands.contains(&Command::ExplosionHitAlien {
        projectile: missile,
        alien
    }));
    assert!(events.contains(&Event::AlienDestroyed {
        alien,
        kind: AlienKind::Normal,
        by: Some(PlayerId::Thunderbird),
    }));
    assert_eq!(
        query::stats(&world).scores[PlayerId::Thunderbird],
        query::settings(&world).alien_points
    );
}

#[test]
fn boss_is_damaged_once_per_missile_across_explosion_frames() {
    let mut world = configured(GameMode::Normal, true, Settings::default());
    let _ = apply_all(
        &mut world,
        vec![
            Command::ConfigureBoss {
                hp: 20,
                points: 2_500,
            },
            Command::SpawnBoss,
        ],
    );
    tick(&mut world, 2_000);
    let boss = AlienId::new(0);
    let missile = fire(
        &mut world,
        Command::FireMissile {
            player: PlayerId::Thunderbird,
        },
    );
    let target = center_of(&world, EntityRef::Alien(boss));
    place(&mut world, EntityRef::Projectile(missile), target);

    let _ = resolve(&mut world);
    for frame in 0..4 {
        let (commands, _) = resolve(&mut world);
        assert!(
            commands.contains(&Command::ExplosionHitAlien {
                projectile: missile,
                alien: boss
            }),
            "explosion still overlaps on frame {frame}"
        );
        let _ = apply_all(
            &mut world,
            vec![Command::AdvanceExplosion {
                projectile: missile,
            }],
        );
    }

    let boss_state = query::alien_view(&world).get(boss).copied().expect("boss survives");
    assert_eq!(boss_state.hit_count, 5);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 0);
}

#[test]
fn laser_pierces_every_alien_in_the_beam() {
    let mut settings = Settings::default();
    settings.starting_lasers = 1;
    let mut world = configured(GameMode::Normal, true, settings);
    let _ = apply_all(&mut world, vec![Command::SpawnFleet { rows: 2 }]);
    tick(&mut world, 2_000);

    let column = ship_center(&world, PlayerId::Thunderbird).x;
    for alien in [AlienId::new(0), AlienId::new(11)] {
        let center = center_of(&world, EntityRef::Alien(alien));
        place(&mut world, EntityRef::Alien(alien), Vec2::new(column, center.y));
    }
    let beam = fire(
        &mut world,
        Command::FireLaser {
            player: PlayerId::Thunderbird,
        },
    );

    let (commands, events) = resolve(&mut world);
    let laser_hits = commands
        .iter()
        .filter(|command| {
            matches!(command, Command::LaserHitAlien { projectile, .. } if *projectile == beam)
        })
        .count();
    assert_eq!(laser_hits, 2);
    assert_eq!(
        count(&events, |event| matches!(event, Event::AlienDestroyed { .. })),
        2
    );
    assert_eq!(query::projectile_view(&world).len(), 1, "the beam persists");
}

#[test]
fn opponent_bullet_hits_the_other_ship_and_scores() {
    let mut world = configured(GameMode::CosmicConflict, false, Settings::default());
    let bullet = fire(
        &mut world,
        Command::FireBullet {
            player: PlayerId::Thunderbird,
        },
    );

    let shooter = ship_center(&world, PlayerId::Thunderbird);
    place(&mut world, EntityRef::Projectile(bullet), shooter);
    assert!(detect(&world).is_empty(), "own bullets never hit");

    let target = ship_center(&world, PlayerId::Phoenix);
    place(&mut world, EntityRef::Projectile(bullet), target);
    let (commands, _) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![Command::ProjectileHitShip {
            projectile: bullet,
            player: PlayerId::Phoenix,
        }]
    );
    assert_eq!(query::ship(&world, PlayerId::Phoenix).health, 2);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 1_000);
}

#[test]
fn shield_absorbs_one_opponent_bullet_in_cosmic_conflict() {
    let mut world = configured(GameMode::CosmicConflict, false, Settings::default());
    let _ = apply_all(
        &mut world,
        vec![
            Command::SpawnPower {
                kind: PowerKind::Effect(EffectKind::Shield),
                x: 0.0,
            },
            Command::CollectPower {
                player: PlayerId::Phoenix,
                power: PowerId::new(0),
            },
        ],
    );
    let target = ship_center(&world, PlayerId::Phoenix);

    let absorbed = fire(
        &mut world,
        Command::FireBullet {
            player: PlayerId::Thunderbird,
        },
    );
    place(&mut world, EntityRef::Projectile(absorbed), target);
    let (commands, events) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![Command::ShieldContact {
            player: PlayerId::Phoenix,
            entity: EntityRef::Projectile(absorbed),
        }]
    );
    assert!(events.contains(&Event::ShieldConsumed {
        player: PlayerId::Phoenix
    }));
    let phoenix = query::ship(&world, PlayerId::Phoenix);
    assert!(!phoenix.state.shielded);
    assert_eq!(phoenix.health, 3);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 0);
    assert_eq!(query::projectile_view(&world).len(), 0);

    let bullet = fire(
        &mut world,
        Command::FireBullet {
            player: PlayerId::Thunderbird,
        },
    );
    place(&mut world, EntityRef::Projectile(bullet), target);
    let (commands, _) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![Command::ProjectileHitShip {
            projectile: bullet,
            player: PlayerId::Phoenix,
        }]
    );
    assert_eq!(query::ship(&world, PlayerId::Phoenix).health, 2);
    assert_eq!(query::stats(&world).scores[PlayerId::Thunderbird], 1_000);
}

#[test]
fn touching_a_power_collects_it_once() {
    let mut world = configured(GameMode::Normal, false, Settings::default());
    let _ = apply_all(
        &mut world,
        vec![Command::SpawnPower {
            kind: PowerKind::Health,
            x: 0.0,
        }],
    );
    let ship = ship_center(&world, PlayerId::Phoenix);
    place(&mut world, EntityRef::Power(PowerId::new(0)), ship);

    let (commands, events) = resolve(&mut world);
    assert_eq!(
        commands,
        vec![Command::CollectPower {
            player: PlayerId::Phoenix,
            power: PowerId::new(0),
        }]
    );
    assert!(events.contains(&Event::HealthChanged {
        player: PlayerId::Phoenix,
        health: 4,
    }));
    assert!(query::ship(&world, PlayerId::Phoenix).state.empowered);
    assert!(detect(&world).is_empty());
}

#[test]
fn escaped_aliens_cost_health_or_score_by_mode() {
    for (mode, penalty) in [
        (GameMode::Normal, EscapePenalty::Health),
        (GameMode::CosmicConflict, EscapePenalty::Score(500)),
    ] {
        let mut world = configured(mode, false, Settings::default());
        let _ = apply_all(&mut world, vec![Command::SpawnFleet { rows: 1 }]);
        let alien = AlienId::new(0);
        let center = center_of(&world, EntityRef::Alien(alien));
        let height = query::settings(&world).screen_height;
        place(
            &mut world,
            EntityRef::Alien(alien),
            Vec2::new(center.x, height - 25.0),
        );

        let (commands, events) = resolve(&mut world);
        assert_eq!(commands, vec![Command::AlienEscaped { alien, penalty }]);
        assert!(events.contains(&Event::AlienEscaped { alien }));
        assert!(query::alien_view(&world).get(alien).is_none());
    }
}
