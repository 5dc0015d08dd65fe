#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collision detection over immutable snapshots.
//!
//! The system never mutates anything. It walks the views in a fixed order and
//! emits one command per contact; the world then applies the removals one by
//! one. Entities claimed by an earlier contact are skipped for the rest of
//! the frame so that no entity is consumed twice.
//!
//! Evaluation order: shields, ship contact, alien bullets, player bullets,
//! missiles, lasers, player versus player projectiles, power pickup and
//! finally bottom-of-screen escapes.

use std::collections::BTreeSet;

use alien_onslaught_core::{
    tables, AlienId, AlienSnapshot, AlienView, AsteroidId, AsteroidView, Command, EntityRef,
    EscapePenalty, GameMode, HitCause, MissilePhase, PerPlayer, PlayerId, PowerView,
    ProjectileId, ProjectileKind, ProjectileOwner, ProjectileView, Rect, Settings, ShipSnapshot,
};

/// Pure system that turns overlapping hitboxes into world commands.
#[derive(Debug, Default)]
pub struct Collision;

impl Collision {
    /// Detects every contact of the current frame and emits its command.
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &self,
        mode: GameMode,
        ships: &PerPlayer<ShipSnapshot>,
        aliens: &AlienView,
        projectiles: &ProjectileView,
        asteroids: &AsteroidView,
        powers: &PowerView,
        settings: &Settings,
        out: &mut Vec<Command>,
    ) {
        let mut frame = Frame::new(ships);

        frame.shields(mode, aliens, projectiles, asteroids, out);
        frame.ship_contact(aliens, asteroids, out);
        frame.alien_bullets(projectiles, out);
        frame.player_bullets(aliens, projectiles, out);
        frame.missiles(aliens, projectiles, out);
        frame.lasers(aliens, projectiles, out);
        if mode.is_pvp() {
            frame.crossfire(projectiles, out);
        }
        frame.pickups(powers, out);
        frame.escapes(aliens, settings.screen_height, EscapePenalty::for_mode(mode), out);
    }
}

/// Marks collected while one frame is evaluated.
struct Frame<'a> {
    ships: &'a PerPlayer<ShipSnapshot>,
    hit: PerPlayer<bool>,
    claimed_aliens: BTreeSet<AlienId>,
    spent_projectiles: BTreeSet<ProjectileId>,
    spent_asteroids: BTreeSet<AsteroidId>,
}

impl<'a> Frame<'a> {
    fn new(ships: &'a PerPlayer<ShipSnapshot>) -> Self {
        Self {
            ships,
            hit: PerPlayer::default(),
            claimed_aliens: BTreeSet::new(),
            spent_projectiles: BTreeSet::new(),
            spent_asteroids: BTreeSet::new(),
        }
    }

    /// Ships that can take a hit this frame. Shielded ships absorb contact
    /// instead, and a ship takes at most one hit per frame.
    fn exposed(&self, player: PlayerId) -> Option<Rect> {
        let ship = self.ships.get(player);
        let exposed = ship.in_play()
            && ship.state.is_vulnerable()
            && !ship.state.shielded
            && !self.hit[player];
        exposed.then_some(ship.rect)
    }

    fn shields(
        &mut self,
        mode: GameMode,
        aliens: &AlienView,
        projectiles: &ProjectileView,
        asteroids: &AsteroidView,
        out: &mut Vec<Command>,
    ) {
        for player in PlayerId::ALL {
            let ship = self.ships.get(player);
            if !ship.in_play() || !ship.state.shielded {
                continue;
            }
            let shield = ship.rect.inflated(tables::SHIELD_PADDING);

            let alien = live(aliens, &self.claimed_aliens)
                .find(|alien| alien.rect.intersects(&shield))
                .map(|alien| (alien.id, alien.kind.is_boss()));
            if let Some((alien, boss)) = alien {
                if !boss {
                    let _ = self.claimed_aliens.insert(alien);
                }
                out.push(Command::ShieldContact {
                    player,
                    entity: EntityRef::Alien(alien),
                });
                continue;
            }

            let opponent = mode.is_pvp().then(|| player.opponent());
            let bullet = projectiles
                .hostile()
                .chain(opponent.into_iter().flat_map(move |rival| projectiles.fired_by(rival)))
                .filter(|bullet| !self.spent_projectiles.contains(&bullet.id))
                .find(|bullet| bullet.rect.intersects(&shield))
                .map(|bullet| bullet.id);
            if let Some(bullet) = bullet {
                let _ = self.spent_projectiles.insert(bullet);
                out.push(Command::ShieldContact {
                    player,
                    entity: EntityRef::Projectile(bullet),
                });
                continue;
            }

            let asteroid = asteroids
                .iter()
                .filter(|asteroid| !self.spent_asteroids.contains(&asteroid.id))
                .find(|asteroid| asteroid.rect.intersects(&shield))
                .map(|asteroid| asteroid.id);
            if let Some(asteroid) = asteroid {
                let _ = self.spent_asteroids.insert(asteroid);
                out.push(Command::ShieldContact {
                    player,
                    entity: EntityRef::Asteroid(asteroid),
                });
            }
        }
    }

    fn ship_contact(&mut self, aliens: &AlienView, asteroids: &AsteroidView, out: &mut Vec<Command>) {
        for player in PlayerId::ALL {
            let Some(ship) = self.exposed(player) else {
                continue;
            };
            let touching =
                live(aliens, &self.claimed_aliens).any(|alien| alien.rect.intersects(&ship));
            if touching {
                self.hit[player] = true;
                out.push(Command::HitShip {
                    player,
                    cause: HitCause::Alien,
                });
                continue;
            }

            let asteroid = asteroids
                .iter()
                .filter(|asteroid| !self.spent_asteroids.contains(&asteroid.id))
                .find(|asteroid| asteroid.rect.intersects(&ship))
                .map(|asteroid| asteroid.id);
            if let Some(asteroid) = asteroid {
                self.hit[player] = true;
                let _ = self.spent_asteroids.insert(asteroid);
                out.push(Command::HitShip {
                    player,
                    cause: HitCause::Asteroid,
                });
                out.push(Command::DestroyAsteroid { asteroid });
            }
        }
    }

    fn alien_bullets(&mut self, projectiles: &ProjectileView, out: &mut Vec<Command>) {
        for bullet in projectiles.hostile() {
            if self.spent_projectiles.contains(&bullet.id) {
                continue;
            }
            let target = PlayerId::ALL.into_iter().find(|player| {
                self.exposed(*player)
                    .is_some_and(|ship| bullet.rect.intersects(&ship))
            });
            if let Some(player) = target {
                self.hit[player] = true;
                let _ = self.spent_projectiles.insert(bullet.id);
                out.push(Command::ProjectileHitShip {
                    projectile: bullet.id,
                    player,
                });
            }
        }
    }

    /// A bullet damages every alien it overlaps and is consumed once.
    fn player_bullets(
        &mut self,
        aliens: &AlienView,
        projectiles: &ProjectileView,
        out: &mut Vec<Command>,
    ) {
        for bullet in projectiles.iter() {
            if bullet.kind != ProjectileKind::Bullet
                || bullet.player().is_none()
                || self.spent_projectiles.contains(&bullet.id)
            {
                continue;
            }
            let before = out.len();
            out.extend(
                live(aliens, &self.claimed_aliens)
                    .filter(|alien| alien.rect.intersects(&bullet.rect))
                    .map(|alien| Command::BulletHitAlien {
                        projectile: bullet.id,
                        alien: alien.id,
                    }),
            );
            if out.len() > before {
                let _ = self.spent_projectiles.insert(bullet.id);
                out.push(Command::Despawn {
                    entity: EntityRef::Projectile(bullet.id),
                });
            }
        }
    }

    fn missiles(&mut self, aliens: &AlienView, projectiles: &ProjectileView, out: &mut Vec<Command>) {
        for missile in projectiles.iter() {
            if missile.kind != ProjectileKind::Missile
                || self.spent_projectiles.contains(&missile.id)
            {
                continue;
            }
            match missile.phase {
                MissilePhase::Flying => {
                    if live(aliens, &self.claimed_aliens)
                        .any(|alien| alien.rect.intersects(&missile.rect))
                    {
                        out.push(Command::DetonateMissile {
                            projectile: missile.id,
                        });
                    }
                }
                MissilePhase::Exploding { .. } => {
                    let mut caught = Vec::new();
                    for alien in live(aliens, &self.claimed_aliens) {
                        if alien.rect.intersects(&missile.rect) {
                            caught.push((alien.id, alien.kind.is_boss()));
                        }
                    }
                    for (alien, boss) in caught {
                        if !boss {
                            let _ = self.claimed_aliens.insert(alien);
                        }
                        out.push(Command::ExplosionHitAlien {
                            projectile: missile.id,
                            alien,
                        });
                    }
                }
            }
        }
    }

    fn lasers(&mut self, aliens: &AlienView, projectiles: &ProjectileView, out: &mut Vec<Command>) {
        for beam in projectiles.iter() {
            if beam.kind != ProjectileKind::Laser {
                continue;
            }
            let caught: Vec<_> = live(aliens, &self.claimed_aliens)
                .filter(|alien| alien.rect.intersects(&beam.rect))
                .map(|alien| (alien.id, alien.kind.is_boss()))
                .collect();
            for (alien, boss) in caught {
                if !boss {
                    let _ = self.claimed_aliens.insert(alien);
                }
                out.push(Command::LaserHitAlien {
                    projectile: beam.id,
                    alien,
                });
            }
        }
    }

    /// Player versus player: a projectile hitting the opposing ship.
    fn crossfire(&mut self, projectiles: &ProjectileView, out: &mut Vec<Command>) {
        for projectile in projectiles.iter() {
            let ProjectileOwner::Player(shooter) = projectile.owner else {
                continue;
            };
            if self.spent_projectiles.contains(&projectile.id) {
                continue;
            }
            let target = shooter.opponent();
            let struck = self
                .exposed(target)
                .is_some_and(|ship| projectile.rect.intersects(&ship));
            if !struck {
                continue;
            }
            self.hit[target] = true;
            if projectile.kind != ProjectileKind::Laser {
                let _ = self.spent_projectiles.insert(projectile.id);
            }
            out.push(Command::ProjectileHitShip {
                projectile: projectile.id,
                player: target,
            });
        }
    }

    fn pickups(&self, powers: &PowerView, out: &mut Vec<Command>) {
        for power in powers.iter() {
            let collector = PlayerId::ALL.into_iter().find(|player| {
                let ship = self.ships.get(*player);
                ship.in_play() && ship.rect.intersects(&power.rect)
            });
            if let Some(player) = collector {
                out.push(Command::CollectPower {
                    player,
                    power: power.id,
                });
            }
        }
    }

    fn escapes(
        &mut self,
        aliens: &AlienView,
        screen_height: f32,
        penalty: EscapePenalty,
        out: &mut Vec<Command>,
    ) {
        let escaped: Vec<_> = live(aliens, &self.claimed_aliens)
            .filter(|alien| alien.rect.bottom() >= screen_height)
            .map(|alien| alien.id)
            .collect();
        for alien in escaped {
            let _ = self.claimed_aliens.insert(alien);
            out.push(Command::AlienEscaped { alien, penalty });
        }
    }
}

fn live<'v>(
    aliens: &'v AlienView,
    claimed: &'v BTreeSet<AlienId>,
) -> impl Iterator<Item = &'v AlienSnapshot> + 'v {
    aliens.iter().filter(move |alien| !claimed.contains(&alien.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alien_onslaught_core::{AlienKind, ShipState, WeaponKind};
    use glam::Vec2;

    fn ship(player: PlayerId, rect: Rect) -> ShipSnapshot {
        ShipSnapshot {
            player,
            active: true,
            rect,
            health: 3,
            state: ShipState::spawned(),
            weapon: WeaponKind::Bolt,
            missiles: 0,
            lasers: 0,
            remaining_bullets: None,
        }
    }

    fn alien(id: u32, rect: Rect) -> AlienSnapshot {
        AlienSnapshot {
            id: AlienId::new(id),
            kind: AlienKind::Normal,
            rect,
            hit_count: 0,
            immune: false,
            frozen: false,
            direction: 1.0,
            last_bullet_time: None,
        }
    }

    #[test]
    fn exposure_excludes_shielded_and_already_hit_ships() {
        let rect = Rect::centered_on(Vec2::new(100.0, 100.0), tables::SHIP_SIZE);
        let mut shielded = ship(PlayerId::Phoenix, rect);
        shielded.state.shielded = true;
        let ships = PerPlayer::new(ship(PlayerId::Thunderbird, rect), shielded);

        let mut frame = Frame::new(&ships);
        assert_eq!(frame.exposed(PlayerId::Thunderbird), Some(rect));
        assert_eq!(frame.exposed(PlayerId::Phoenix), None);
        frame.hit[PlayerId::Thunderbird] = true;
        assert_eq!(frame.exposed(PlayerId::Thunderbird), None);
    }

    #[test]
    fn claimed_aliens_are_skipped() {
        let ships = PerPlayer::splat(ship(PlayerId::Thunderbird, Rect::default()));
        let view = AlienView::from_snapshots(vec![
            alien(1, Rect::from_xywh(0.0, 0.0, 10.0, 10.0)),
            alien(2, Rect::from_xywh(20.0, 0.0, 10.0, 10.0)),
        ]);
        let mut frame = Frame::new(&ships);
        let _ = frame.claimed_aliens.insert(AlienId::new(1));
        let alive: Vec<_> = live(&view, &frame.claimed_aliens)
            .map(|alien| alien.id)
            .collect();
        assert_eq!(alive, vec![AlienId::new(2)]);
    }
}
