#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Alien Onslaught.
//!
//! The world owns every entity, the mutable [`Settings`] and the score
//! bookkeeping. Systems never touch it directly: they detect contacts on
//! immutable snapshots and the world removes entities one command at a time,
//! so no collection is mutated while it is being iterated.

mod alien;
mod entities;
mod ship;

use std::{collections::BTreeSet, time::Duration};

use alien_onslaught_core::{
    tables, AlienId, AlienKind, AsteroidId, Command, EffectKind, EntityRef, EscapePenalty, Event,
    GameMode, HitCause, MissilePhase, Outcome, PerPlayer, PlayerId, PowerId, PowerKind,
    ProjectileId, ProjectileKind, ProjectileOwner, Rect, Settings, ShipFlag, Tunable,
};
use glam::Vec2;
use tracing::{debug, info};

use crate::{
    alien::Alien,
    entities::{Asteroid, Power, Projectile},
    ship::Ship,
};

/// Level and score bookkeeping for the running session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    /// Current level, starting at one.
    pub level: u32,
    /// Score per player.
    pub scores: PerPlayer<u64>,
    /// Best score of the mode, including the running session.
    pub high_score: u64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            level: 1,
            scores: PerPlayer::default(),
            high_score: 0,
        }
    }
}

/// Represents the authoritative Alien Onslaught world state.
#[derive(Debug)]
pub struct World {
    settings: Settings,
    mode: GameMode,
    singleplayer: bool,
    stats: Stats,
    ships: PerPlayer<Ship>,
    aliens: Vec<Alien>,
    projectiles: Vec<Projectile>,
    asteroids: Vec<Asteroid>,
    powers: Vec<Power>,
    handled_collisions: BTreeSet<(ProjectileId, AlienId)>,
    now: Duration,
    last_dt: Duration,
    fleet_direction: f32,
    frozen_until: Option<Duration>,
    outcome: Option<Outcome>,
    next_alien_id: u32,
    next_projectile_id: u32,
    next_asteroid_id: u32,
    next_power_id: u32,
}

impl World {
    /// Creates a singleplayer normal-mode world with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::configured(GameMode::Normal, true, Settings::default(), 0)
    }

    fn configured(mode: GameMode, singleplayer: bool, settings: Settings, high_score: u64) -> Self {
        let ships = PerPlayer::from_fn(|player| Ship::spawn(player, singleplayer, mode, &settings));
        Self {
            settings,
            mode,
            singleplayer,
            stats: Stats {
                high_score,
                ..Stats::default()
            },
            ships,
            aliens: Vec::new(),
            projectiles: Vec::new(),
            asteroids: Vec::new(),
            powers: Vec::new(),
            handled_collisions: BTreeSet::new(),
            now: Duration::ZERO,
            last_dt: Duration::ZERO,
            fleet_direction: 1.0,
            frozen_until: None,
            outcome: None,
            next_alien_id: 0,
            next_projectile_id: 0,
            next_asteroid_id: 0,
            next_power_id: 0,
        }
    }

    fn is_frozen(&self) -> bool {
        self.frozen_until.is_some_and(|until| self.now < until)
    }

    fn alien_index(&self, alien: AlienId) -> Option<usize> {
        self.aliens.iter().position(|candidate| candidate.id == alien)
    }

    fn projectile_index(&self, projectile: ProjectileId) -> Option<usize> {
        self.projectiles
            .iter()
            .position(|candidate| candidate.id == projectile)
    }

    fn bullets_in_flight(&self, player: PlayerId) -> usize {
        self.projectiles
            .iter()
            .filter(|projectile| {
                projectile.kind == ProjectileKind::Bullet
                    && projectile.owner == ProjectileOwner::Player(player)
            })
            .count()
    }

    fn configure(
        &mut self,
        mode: GameMode,
        singleplayer: bool,
        mut settings: Settings,
        high_score: u64,
        out_events: &mut Vec<Event>,
    ) {
        settings.apply_mode_defaults(mode);
        *self = Self::configured(mode, singleplayer, settings, high_score);
        info!(mode = mode.key(), singleplayer, "session configured");

        out_events.push(Event::SessionStarted { mode, singleplayer });
        for player in PlayerId::ALL {
            let ship = self.ships.get(player);
            if !ship.active {
                continue;
            }
            out_events.push(Event::HealthChanged {
                player,
                health: ship.health,
            });
            out_events.push(Event::ScoreChanged { player, score: 0 });
            out_events.push(Event::BulletsChanged { player });
        }
        out_events.push(Event::HighScoreChanged { score: high_score });
    }

    fn tick(&mut self, now: Duration, out_events: &mut Vec<Event>) {
        let dt = now.saturating_sub(self.now);
        self.now = self.now.max(now);
        self.last_dt = dt;
        out_events.push(Event::TimeAdvanced { dt, now: self.now });

        let mut expired = Vec::new();
        for (player, ship) in self.ships.iter_mut() {
            expired.clear();
            ship.expire(self.now, &mut expired);
            out_events.extend(
                expired
                    .iter()
                    .map(|flag| Event::EffectExpired { player, flag: *flag }),
            );
        }

        if self.frozen_until.is_some() && !self.is_frozen() {
            self.frozen_until = None;
            out_events.push(Event::AliensThawed);
        }
    }

    fn steer(&mut self, player: PlayerId, direction: Vec2) {
        let distance = self.settings.ship_speed[player] * tables::frame_scale(self.last_dt);
        let bounds = self.settings.bounds();
        let ship = self.ships.get_mut(player);
        if !ship.in_play() {
            return;
        }
        let mut direction = direction.clamp_length_max(1.0);
        if ship.state.reverse {
            direction = -direction;
        }
        ship.rect = ship
            .rect
            .translated(direction * distance)
            .clamped_within(&bounds);
    }

    fn spawn_projectile(
        &mut self,
        kind: ProjectileKind,
        owner: ProjectileOwner,
        rect: Rect,
        velocity: Vec2,
        out_events: &mut Vec<Event>,
    ) {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id += 1;
        self.projectiles.push(Projectile {
            id,
            kind,
            owner,
            rect,
            velocity,
            phase: MissilePhase::Flying,
            fired_at: self.now,
            exploded_at: None,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            owner,
            kind,
        });
    }

    fn fire_bullets(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let allowed = self.settings.bullets_allowed[player] as usize;
        if self.bullets_in_flight(player) >= allowed {
            return;
        }
        let mode = self.mode;
        let speed = self.settings.bullet_speed[player];
        let ship = self.ships.get_mut(player);
        if !ship.can_fire() {
            return;
        }
        let mut volley = self.settings.bullet_count[player];
        if let Some(remaining) = ship.remaining_bullets.as_mut() {
            volley = volley.min(*remaining);
            *remaining -= volley;
        }
        if volley == 0 {
            return;
        }
        let limited = ship.remaining_bullets.is_some();
        let heading = ship::heading(mode, player);
        let size = ship::orient(ship.weapon.bullet_size(), heading);
        let muzzle = ship.muzzle(mode);

        let lateral = Vec2::new(heading.y.abs(), heading.x.abs());
        let reach = size.dot(heading.abs()) * 0.5;
        for index in 0..volley {
            let offset = (index as f32 - (volley as f32 - 1.0) * 0.5) * tables::BULLET_SPREAD;
            let center = muzzle + lateral * offset + heading * reach;
            self.spawn_projectile(
                ProjectileKind::Bullet,
                ProjectileOwner::Player(player),
                Rect::centered_on(center, size),
                heading * speed,
                out_events,
            );
        }
        if limited {
            out_events.push(Event::BulletsChanged { player });
        }
    }

    fn fire_missile(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let mode = self.mode;
        let speed = self.settings.missile_speed;
        let ship = self.ships.get_mut(player);
        if !ship.can_fire() || ship.missiles == 0 {
            return;
        }
        ship.missiles -= 1;
        let heading = ship::heading(mode, player);
        let size = ship::orient(tables::MISSILE_SIZE, heading);
        let center = ship.muzzle(mode) + heading * size.dot(heading.abs()) * 0.5;
        self.spawn_projectile(
            ProjectileKind::Missile,
            ProjectileOwner::Player(player),
            Rect::centered_on(center, size),
            heading * speed,
            out_events,
        );
        out_events.push(Event::BulletsChanged { player });
    }

    fn fire_laser(&mut self, player: PlayerId, out_events: &mut Vec<Event>) {
        let mode = self.mode;
        let width = self.settings.screen_width;
        let ship = self.ships.get_mut(player);
        if !ship.can_fire() || ship.lasers == 0 {
            return;
        }
        ship.lasers -= 1;
        let heading = ship::heading(mode, player);
        let muzzle = ship.muzzle(mode);
        let half = tables::LASER_WIDTH * 0.5;
        let thickness = tables::LASER_WIDTH;
        let beam = if heading.x > 0.0 {
            Rect::from_xywh(muzzle.x, muzzle.y - half, (width - muzzle.x).max(0.0), thickness)
        } else if heading.x < 0.0 {
            Rect::from_xywh(0.0, muzzle.y - half, muzzle.x.max(0.0), thickness)
        } else {
            Rect::from_xywh(muzzle.x - half, 0.0, thickness, muzzle.y.max(0.0))
        };
        self.spawn_projectile(
            ProjectileKind::Laser,
            ProjectileOwner::Player(player),
            beam,
            Vec2::ZERO,
            out_events,
        );
        out_events.push(Event::BulletsChanged { player });
    }

    fn spawn_alien(&mut self, kind: AlienKind, rect: Rect, out_events: &mut Vec<Event>) {
        let id = AlienId::new(self.next_alien_id);
        self.next_alien_id += 1;
        self.aliens.push(Alien::new(id, kind, rect, self.now));
        out_events.push(Event::AlienSpawned { alien: id, kind });
    }

    fn fire_alien_bullet(&mut self, alien: AlienId, out_events: &mut Vec<Event>) {
        if self.is_frozen() {
            return;
        }
        let Some(index) = self.alien_index(alien) else {
            return;
        };
        let now = self.now;
        let shooter = &mut self.aliens[index];
        shooter.last_bullet_time = Some(now);
        let size = tables::ALIEN_BULLET_SIZE;
        let center = Vec2::new(shooter.rect.center().x, shooter.rect.bottom() + size.y * 0.5);
        let velocity = Vec2::new(0.0, self.settings.alien_bullet_speed);
        self.spawn_projectile(
            ProjectileKind::Bullet,
            ProjectileOwner::Alien(alien),
            Rect::centered_on(center, size),
            velocity,
            out_events,
        );
    }

    fn spawn_asteroid(&mut self, x: f32, out_events: &mut Vec<Event>) {
        let id = AsteroidId::new(self.next_asteroid_id);
        self.next_asteroid_id += 1;
        let size = tables::ASTEROID_SIZE;
        self.asteroids.push(Asteroid {
            id,
            rect: Rect::new(Vec2::new(x, -size.y), size),
        });
        out_events.push(Event::AsteroidSpawned { asteroid: id });
    }

    fn spawn_power(&mut self, kind: PowerKind, x: f32, out_events: &mut Vec<Event>) {
        let id = PowerId::new(self.next_power_id);
        self.next_power_id += 1;
        let size = tables::POWER_SIZE;
        self.powers.push(Power {
            id,
            kind,
            rect: Rect::new(Vec2::new(x, -size.y), size),
        });
        out_events.push(Event::PowerSpawned { power: id, kind });
    }

    fn move_entity(&mut self, entity: EntityRef, delta: Vec2) {
        let rect = match entity {
            EntityRef::Alien(id) => self
                .aliens
                .iter_mut()
                .find(|alien| alien.id == id)
                .map(|alien| &mut alien.rect),
            EntityRef::Projectile(id) => self
                .projectiles
                .iter_mut()
                .find(|projectile| projectile.id == id)
                .map(|projectile| &mut projectile.rect),
            EntityRef::Asteroid(id) => self
                .asteroids
                .iter_mut()
                .find(|asteroid| asteroid.id == id)
                .map(|asteroid| &mut asteroid.rect),
            EntityRef::Power(id) => self
                .powers
                .iter_mut()
                .find(|power| power.id == id)
                .map(|power| &mut power.rect),
        };
        if let Some(rect) = rect {
            *rect = rect.translated(delta);
        }
    }

    fn reverse_fleet(&mut self) {
        self.fleet_direction = -self.fleet_direction;
        let drop = Vec2::new(0.0, self.settings.fleet_drop_speed);
        for alien in self.aliens.iter_mut().filter(|alien| !alien.kind.is_boss()) {
            alien.rect = alien.rect.translated(drop);
        }
    }

    fn advance_explosion(&mut self, projectile: ProjectileId) {
        let Some(index) = self.projectile_index(projectile) else {
            return;
        };
        let missile = &mut self.projectiles[index];
        if let MissilePhase::Exploding { frame } = missile.phase {
            let frame = (frame + 1).min(tables::MISSILE_EXPLOSION_FRAMES - 1);
            missile.phase = MissilePhase::Exploding { frame };
            missile.rect = tables::explosion_rect(missile.rect.center(), frame);
        }
    }

    fn despawn(&mut self, entity: EntityRef, out_events: &mut Vec<Event>) {
        match entity {
            EntityRef::Alien(id) => {
                if let Some(index) = self.alien_index(id) {
                    let _ = self.aliens.remove(index);
                }
            }
            EntityRef::Projectile(id) => {
                let _ = self.remove_projectile(id, out_events);
            }
            EntityRef::Asteroid(id) => self.asteroids.retain(|asteroid| asteroid.id != id),
            EntityRef::Power(id) => self.powers.retain(|power| power.id != id),
        }
    }

    fn remove_projectile(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) -> bool {
        let Some(index) = self.projectile_index(projectile) else {
            return false;
        };
        let _ = self.projectiles.remove(index);
        self.handled_collisions
            .retain(|(handled, _)| *handled != projectile);
        out_events.push(Event::ProjectileExpired { projectile });
        true
    }

    fn destroy_asteroid(&mut self, asteroid: AsteroidId, out_events: &mut Vec<Event>) -> bool {
        let Some(index) = self
            .asteroids
            .iter()
            .position(|candidate| candidate.id == asteroid)
        else {
            return false;
        };
        let _ = self.asteroids.remove(index);
        out_events.push(Event::AsteroidDestroyed { asteroid });
        true
    }

    /// Runs the hit pipeline and reports whether the hit landed.
    fn hit_ship(&mut self, player: PlayerId, cause: HitCause, out_events: &mut Vec<Event>) -> bool {
        let now = self.now;
        let ship = self.ships.get_mut(player);
        if !ship.active || !ship.state.is_vulnerable() {
            return false;
        }
        let destroyed = ship.take_hit(now);
        let health = ship.health;
        out_events.push(Event::ShipHit {
            player,
            cause,
            health,
        });
        out_events.push(Event::HealthChanged { player, health });
        if destroyed {
            debug!(player = player.name(), ?cause, "ship destroyed");
            out_events.push(Event::ShipDestroyed { player });
        }
        true
    }

    fn shield_contact(&mut self, player: PlayerId, entity: EntityRef, out_events: &mut Vec<Event>) {
        let ship = self.ships.get(player);
        if !ship.in_play() || !ship.state.shielded {
            return;
        }
        let absorbed = match entity {
            EntityRef::Alien(id) => match self.alien_index(id) {
                Some(index) => {
                    if !self.aliens[index].kind.is_boss() {
                        self.destroy_alien(index, None, out_events);
                    }
                    true
                }
                None => false,
            },
            EntityRef::Projectile(id) => self.remove_projectile(id, out_events),
            EntityRef::Asteroid(id) => self.destroy_asteroid(id, out_events),
            EntityRef::Power(_) => false,
        };
        if absorbed {
            self.ships.get_mut(player).clear(ShipFlag::Shielded);
            out_events.push(Event::ShieldConsumed { player });
        }
    }

    fn credit(&mut self, player: PlayerId, points: u64, out_events: &mut Vec<Event>) {
        let score = self.stats.scores[player].saturating_add(points);
        self.stats.scores[player] = score;
        out_events.push(Event::ScoreChanged { player, score });
        if score > self.stats.high_score {
            self.stats.high_score = score;
            out_events.push(Event::HighScoreChanged { score });
        }
    }

    fn destroy_alien(&mut self, index: usize, by: Option<PlayerId>, out_events: &mut Vec<Event>) {
        let alien = self.aliens.remove(index);
        out_events.push(Event::AlienDestroyed {
            alien: alien.id,
            kind: alien.kind,
            by,
        });
        let points = if alien.kind.is_boss() {
            self.settings.boss_points
        } else {
            self.settings.alien_points
        };
        if let Some(player) = by {
            self.credit(player, points, out_events);
        }
    }

    /// Adds hits and destroys the alien once its threshold is reached outside
    /// the spawn immunity window.
    fn damage_alien(
        &mut self,
        alien: AlienId,
        hits: u32,
        by: Option<PlayerId>,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self.alien_index(alien) else {
            return;
        };
        let threshold = if self.aliens[index].kind.is_boss() {
            self.settings.boss_hp
        } else {
            tables::alien_hp_for_level(self.stats.level)
        };
        let now = self.now;
        let target = &mut self.aliens[index];
        target.hit_count = target.hit_count.saturating_add(hits);
        let hit_count = target.hit_count;
        let lethal = hit_count >= threshold && !target.is_immune(now);
        out_events.push(Event::AlienDamaged { alien, hit_count });
        if lethal {
            self.destroy_alien(index, by, out_events);
        }
    }

    fn bullet_hit_alien(
        &mut self,
        projectile: ProjectileId,
        alien: AlienId,
        out_events: &mut Vec<Event>,
    ) {
        let shooter = self
            .projectile_index(projectile)
            .map(|index| self.projectiles[index])
            .filter(|bullet| bullet.kind == ProjectileKind::Bullet)
            .and_then(|bullet| bullet.owner.player());
        if let Some(player) = shooter {
            self.damage_alien(alien, 1, Some(player), out_events);
        }
    }

    fn detonate(&mut self, projectile: ProjectileId, out_events: &mut Vec<Event>) {
        let now = self.now;
        let Some(index) = self.projectile_index(projectile) else {
            return;
        };
        let missile = &mut self.projectiles[index];
        if missile.kind != ProjectileKind::Missile || missile.is_exploding() {
            return;
        }
        missile.phase = MissilePhase::Exploding { frame: 0 };
        missile.exploded_at = Some(now);
        missile.velocity = Vec2::ZERO;
        missile.rect = tables::explosion_rect(missile.rect.center(), 0);
        out_events.push(Event::MissileDetonated { projectile });
    }

    /// Area hit from a missile explosion or a laser beam: fleet aliens die at
    /// once, bosses take `boss_damage` at most once per projectile.
    fn blast_alien(
        &mut self,
        projectile: ProjectileId,
        alien: AlienId,
        kind: ProjectileKind,
        boss_damage: u32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(source) = self
            .projectile_index(projectile)
            .map(|index| self.projectiles[index])
        else {
            return;
        };
        if source.kind != kind || (kind == ProjectileKind::Missile && !source.is_exploding()) {
            return;
        }
        let Some(index) = self.alien_index(alien) else {
            return;
        };
        let by = source.owner.player();
        if self.aliens[index].kind.is_boss() {
            if self.handled_collisions.insert((projectile, alien)) {
                self.damage_alien(alien, boss_damage, by, out_events);
            }
        } else {
            self.destroy_alien(index, by, out_events);
        }
    }

    fn projectile_hit_ship(
        &mut self,
        projectile: ProjectileId,
        player: PlayerId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(source) = self
            .projectile_index(projectile)
            .map(|index| self.projectiles[index])
        else {
            return;
        };
        let cause = match source.owner {
            ProjectileOwner::Player(shooter) if shooter == player => return,
            ProjectileOwner::Player(_) => HitCause::Opponent,
            ProjectileOwner::Alien(_) => HitCause::AlienBullet,
        };
        if source.kind != ProjectileKind::Laser {
            let _ = self.remove_projectile(projectile, out_events);
        }
        let landed = self.hit_ship(player, cause, out_events);
        if let (true, ProjectileOwner::Player(shooter)) = (landed, source.owner) {
            self.credit(shooter, tables::PVP_HIT_POINTS, out_events);
        }
    }

    fn collect_power(&mut self, player: PlayerId, power: PowerId, out_events: &mut Vec<Event>) {
        if !self.ships.get(player).in_play() {
            return;
        }
        let Some(index) = self.powers.iter().position(|candidate| candidate.id == power) else {
            return;
        };
        let kind = self.powers.remove(index).kind;
        out_events.push(Event::PowerCollected {
            player,
            power,
            kind,
        });

        let now = self.now;
        let max_health = self.settings.max_health;
        match kind {
            PowerKind::Health => {
                let ship = self.ships.get_mut(player);
                ship.health = (ship.health + 1).min(max_health);
                out_events.push(Event::HealthChanged {
                    player,
                    health: ship.health,
                });
            }
            PowerKind::Weapon(weapon) => self.ships.get_mut(player).weapon = weapon,
            PowerKind::Effect(effect) => self.apply_effect(player, effect, out_events),
        }
        self.ships
            .get_mut(player)
            .start(ShipFlag::Empowered, now, tables::EMPOWER_DURATION);
    }

    fn apply_effect(&mut self, player: PlayerId, effect: EffectKind, out_events: &mut Vec<Event>) {
        let now = self.now;
        out_events.push(Event::EffectStarted { player, effect });
        match effect {
            EffectKind::ShipSpeed => self.adjust(
                Tunable::ShipSpeed(player),
                tables::POWER_SPEED_BONUS,
                None,
                None,
                out_events,
            ),
            EffectKind::BulletSpeed => self.adjust(
                Tunable::BulletSpeed(player),
                tables::POWER_SPEED_BONUS,
                None,
                None,
                out_events,
            ),
            EffectKind::BulletsAllowed => {
                let allowed = &mut self.settings.bullets_allowed[player];
                *allowed = (*allowed + 1).min(tables::MAX_BULLETS_ALLOWED);
                out_events.push(Event::BulletsChanged { player });
            }
            EffectKind::BulletCount => {
                let count = &mut self.settings.bullet_count[player];
                *count = (*count + 1).min(tables::MAX_BULLET_COUNT);
            }
            EffectKind::Shield => {
                self.ships
                    .get_mut(player)
                    .start(ShipFlag::Shielded, now, tables::SHIELD_DURATION);
            }
            EffectKind::FreezeAliens => {
                self.frozen_until = Some(now.saturating_add(tables::FREEZE_DURATION));
            }
            EffectKind::Invincibility => {
                self.ships
                    .get_mut(player)
                    .start(ShipFlag::Immune, now, tables::INVINCIBILITY_DURATION);
            }
            EffectKind::BonusPoints => {
                let points = self
                    .settings
                    .alien_points
                    .saturating_mul(tables::BONUS_POINTS_FACTOR);
                self.credit(player, points, out_events);
            }
            EffectKind::ExtraMissile => {
                let ship = self.ships.get_mut(player);
                ship.missiles = (ship.missiles + 1).min(tables::MAX_MISSILES);
                out_events.push(Event::BulletsChanged { player });
            }
            EffectKind::LaserCharge => {
                let ship = self.ships.get_mut(player);
                ship.lasers = (ship.lasers + 1).min(tables::MAX_LASERS);
                out_events.push(Event::BulletsChanged { player });
            }
            EffectKind::ReverseKeys => {
                self.ships
                    .get_mut(player)
                    .start(ShipFlag::Reversed, now, tables::PENALTY_DURATION);
            }
            EffectKind::Disarm => {
                self.ships
                    .get_mut(player)
                    .start(ShipFlag::Disarmed, now, tables::PENALTY_DURATION);
            }
            EffectKind::FewerBullets => {
                let allowed = &mut self.settings.bullets_allowed[player];
                *allowed = allowed.saturating_sub(1).max(1);
                out_events.push(Event::BulletsChanged { player });
            }
            EffectKind::ScaleShip => {
                let ship = self.ships.get_mut(player);
                if !ship.state.scaled {
                    ship.rect = ship.rect.scaled(tables::SCALED_SHIP_FACTOR);
                }
                ship.start(ShipFlag::Scaled, now, tables::PENALTY_DURATION);
            }
            EffectKind::AlienUpgrade => {
                self.adjust(
                    Tunable::AlienSpeed,
                    tables::ALIEN_UPGRADE_BONUS,
                    None,
                    None,
                    out_events,
                );
                self.adjust(
                    Tunable::AlienBulletSpeed,
                    tables::ALIEN_UPGRADE_BONUS,
                    None,
                    None,
                    out_events,
                );
            }
        }
    }

    fn adjust(
        &mut self,
        tunable: Tunable,
        delta: f32,
        floor: Option<f32>,
        ceiling: Option<f32>,
        out_events: &mut Vec<Event>,
    ) {
        let slot = self.settings.tunable_mut(tunable);
        let mut value = *slot + delta;
        if let Some(floor) = floor {
            value = value.max(floor);
        }
        if let Some(ceiling) = ceiling {
            value = value.min(ceiling);
        }
        *slot = value;
        out_events.push(Event::TunableChanged { tunable, value });
    }

    fn alien_escaped(&mut self, alien: AlienId, penalty: EscapePenalty, out_events: &mut Vec<Event>) {
        let Some(index) = self.alien_index(alien) else {
            return;
        };
        let _ = self.aliens.remove(index);
        out_events.push(Event::AlienEscaped { alien });

        for player in PlayerId::ALL {
            match penalty {
                EscapePenalty::Health => {
                    let ship = self.ships.get_mut(player);
                    if !ship.in_play() {
                        continue;
                    }
                    let destroyed = ship.lose_health();
                    out_events.push(Event::HealthChanged {
                        player,
                        health: ship.health,
                    });
                    if destroyed {
                        out_events.push(Event::ShipDestroyed { player });
                    }
                }
                EscapePenalty::Score(points) => {
                    if !self.ships.get(player).active {
                        continue;
                    }
                    let score = self.stats.scores[player].saturating_sub(points);
                    self.stats.scores[player] = score;
                    out_events.push(Event::ScoreChanged { player, score });
                }
            }
        }
    }

    fn award_bonus(&mut self, points: u64, out_events: &mut Vec<Event>) {
        for player in PlayerId::ALL {
            if self.ships.get(player).in_play() {
                self.credit(player, points, out_events);
            }
        }
    }

    fn revive_ships(&mut self, out_events: &mut Vec<Event>) {
        let now = self.now;
        let health = self.settings.starting_health;
        for (player, ship) in self.ships.iter_mut() {
            if !ship.active || ship.state.alive {
                continue;
            }
            ship.state.alive = true;
            ship.health = health;
            ship.clear(ShipFlag::Exploding);
            ship.start(ShipFlag::Immune, now, tables::SHIP_IMMUNITY);
            out_events.push(Event::ShipRevived { player });
            out_events.push(Event::HealthChanged { player, health });
        }
    }

    fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        self.projectiles.clear();
        self.powers.clear();
        self.asteroids.clear();
        self.handled_collisions.clear();
        self.frozen_until = None;
        self.fleet_direction = 1.0;

        let speed = self.settings.alien_speed;
        let cap = self.settings.max_alien_speed;
        if speed < cap {
            let raised = (speed + self.settings.speedup_scale.alien_speedup()).min(cap);
            self.adjust(Tunable::AlienSpeed, raised - speed, None, None, out_events);
        }
        let scaled_points = (self.settings.alien_points as f32 * self.settings.score_scale).round();
        self.settings.alien_points = (scaled_points as u64).min(self.settings.max_alien_points);

        self.stats.level += 1;
        let level = self.stats.level;
        debug!(level, alien_points = self.settings.alien_points, "level advanced");
        out_events.push(Event::LevelAdvanced { level });

        let now = self.now;
        let missiles = self.settings.starting_missiles;
        for (player, ship) in self.ships.iter_mut() {
            if !ship.in_play() {
                continue;
            }
            ship.start(ShipFlag::Warping, now, tables::SHIP_WARP);
            ship.missiles = ship.missiles.max(missiles);
            out_events.push(Event::BulletsChanged { player });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands that reference entities which no longer exist are ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSession {
            mode,
            singleplayer,
            settings,
            high_score,
        } => world.configure(mode, singleplayer, *settings, high_score, out_events),
        Command::Tick { now } => world.tick(now, out_events),
        Command::SteerShip { player, direction } => world.steer(player, direction),
        Command::FireBullet { player } => world.fire_bullets(player, out_events),
        Command::FireMissile { player } => world.fire_missile(player, out_events),
        Command::FireLaser { player } => world.fire_laser(player, out_events),
        Command::SpawnFleet { rows } => {
            for rect in alien::fleet_layout(rows, &world.settings) {
                world.spawn_alien(AlienKind::Normal, rect, out_events);
            }
        }
        Command::SpawnBoss => {
            let rect = alien::boss_rect(&world.settings);
            world.spawn_alien(AlienKind::Boss, rect, out_events);
        }
        Command::ConfigureBoss { hp, points } => {
            world.settings.boss_hp = hp;
            world.settings.boss_points = points;
            debug!(hp, points, level = world.stats.level, "boss configured");
            out_events.push(Event::BossConfigured { hp, points });
        }
        Command::FireAlienBullet { alien } => world.fire_alien_bullet(alien, out_events),
        Command::SpawnAsteroid { x } => world.spawn_asteroid(x, out_events),
        Command::SpawnPower { kind, x } => world.spawn_power(kind, x, out_events),
        Command::MoveEntity { entity, delta } => world.move_entity(entity, delta),
        Command::ReverseFleet => world.reverse_fleet(),
        Command::ReverseAlien { alien } => {
            if let Some(index) = world.alien_index(alien) {
                world.aliens[index].direction = -world.aliens[index].direction;
            }
        }
        Command::AdvanceExplosion { projectile } => world.advance_explosion(projectile),
        Command::Despawn { entity } => world.despawn(entity, out_events),
        Command::HitShip { player, cause } => {
            let _ = world.hit_ship(player, cause, out_events);
        }
        Command::ShieldContact { player, entity } => {
            world.shield_contact(player, entity, out_events)
        }
        Command::BulletHitAlien { projectile, alien } => {
            world.bullet_hit_alien(projectile, alien, out_events)
        }
        Command::DetonateMissile { projectile } => world.detonate(projectile, out_events),
        Command::ExplosionHitAlien { projectile, alien } => world.blast_alien(
            projectile,
            alien,
            ProjectileKind::Missile,
            tables::MISSILE_BOSS_DAMAGE,
            out_events,
        ),
        Command::LaserHitAlien { projectile, alien } => world.blast_alien(
            projectile,
            alien,
            ProjectileKind::Laser,
            tables::LASER_BOSS_DAMAGE,
            out_events,
        ),
        Command::ProjectileHitShip { projectile, player } => {
            world.projectile_hit_ship(projectile, player, out_events)
        }
        Command::DestroyAsteroid { asteroid } => {
            let _ = world.destroy_asteroid(asteroid, out_events);
        }
        Command::CollectPower { player, power } => world.collect_power(player, power, out_events),
        Command::AlienEscaped { alien, penalty } => {
            world.alien_escaped(alien, penalty, out_events)
        }
        Command::AdjustTunable {
            tunable,
            delta,
            floor,
            ceiling,
        } => world.adjust(tunable, delta, floor, ceiling, out_events),
        Command::AwardBonus { points } => world.award_bonus(points, out_events),
        Command::SetBulletAllowance { player, bullets } => {
            let ship = world.ships.get_mut(player);
            if ship.active {
                ship.remaining_bullets = Some(bullets);
                out_events.push(Event::BulletsChanged { player });
            }
        }
        Command::DisableShip { player } => {
            let ship = world.ships.get_mut(player);
            if ship.in_play() {
                ship.state.alive = false;
                out_events.push(Event::ShipDisabled { player });
            }
        }
        Command::ReviveShips => world.revive_ships(out_events),
        Command::AdvanceLevel => world.advance_level(out_events),
        Command::EndGame { outcome } => {
            if world.outcome.is_none() {
                world.outcome = Some(outcome);
                info!(?outcome, level = world.stats.level, "game over");
                out_events.push(Event::GameOver { outcome });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use alien_onslaught_core::{
        AlienId, AlienView, AsteroidView, BossStats, GameMode, HudSnapshot, Outcome, PerPlayer,
        PlayerId, PowerView, ProjectileId, ProjectileView, Settings, ShipSnapshot,
    };

    use super::{Stats, World};

    /// Provides read-only access to the live settings.
    #[must_use]
    pub fn settings(world: &World) -> &Settings {
        &world.settings
    }

    /// Active game mode.
    #[must_use]
    pub fn mode(world: &World) -> GameMode {
        world.mode
    }

    /// Reports whether only Thunderbird takes part.
    #[must_use]
    pub fn singleplayer(world: &World) -> bool {
        world.singleplayer
    }

    /// Level and score bookkeeping.
    #[must_use]
    pub fn stats(world: &World) -> &Stats {
        &world.stats
    }

    /// Current level.
    #[must_use]
    pub fn level(world: &World) -> u32 {
        world.stats.level
    }

    /// Gameplay time of the latest tick.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.now
    }

    /// Final result, once the session ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Snapshot of both ships.
    #[must_use]
    pub fn ships(world: &World) -> PerPlayer<ShipSnapshot> {
        world.ships.map(|_, ship| ship.snapshot())
    }

    /// Snapshot of a single ship.
    #[must_use]
    pub fn ship(world: &World, player: PlayerId) -> ShipSnapshot {
        world.ships.get(player).snapshot()
    }

    /// Captures a read-only view of the aliens in play.
    #[must_use]
    pub fn alien_view(world: &World) -> AlienView {
        let frozen = world.is_frozen();
        AlienView::from_snapshots(
            world
                .aliens
                .iter()
                .map(|alien| alien.snapshot(world.now, world.fleet_direction, frozen))
                .collect(),
        )
    }

    /// Captures a read-only view of every projectile, alien bullets included.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the falling asteroids.
    #[must_use]
    pub fn asteroid_view(world: &World) -> AsteroidView {
        AsteroidView::from_snapshots(
            world
                .asteroids
                .iter()
                .map(|asteroid| asteroid.snapshot())
                .collect(),
        )
    }

    /// Captures a read-only view of the falling powers.
    #[must_use]
    pub fn power_view(world: &World) -> PowerView {
        PowerView::from_snapshots(world.powers.iter().map(|power| power.snapshot()).collect())
    }

    /// Number of aliens in play.
    #[must_use]
    pub fn alien_count(world: &World) -> usize {
        world.aliens.len()
    }

    /// Bullets fired by `player` that are still in flight.
    #[must_use]
    pub fn bullets_in_flight(world: &World, player: PlayerId) -> usize {
        world.bullets_in_flight(player)
    }

    /// Bullets in flight for both players.
    #[must_use]
    pub fn bullets_in_flight_per_player(world: &World) -> PerPlayer<usize> {
        PerPlayer::from_fn(|player| world.bullets_in_flight(player))
    }

    /// Hit points and score of the current boss.
    #[must_use]
    pub fn boss_stats(world: &World) -> BossStats {
        BossStats::new(world.settings.boss_hp, world.settings.boss_points)
    }

    /// Reports whether a projectile already damaged an alien through an area hit.
    #[must_use]
    pub fn collision_handled(world: &World, projectile: ProjectileId, alien: AlienId) -> bool {
        world.handled_collisions.contains(&(projectile, alien))
    }

    /// Values displayed by the scoreboard.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            level: world.stats.level,
            singleplayer: world.singleplayer,
            scores: world.stats.scores,
            high_score: world.stats.high_score,
            health: world.ships.map(|_, ship| ship.health),
            missiles: world.ships.map(|_, ship| ship.missiles),
            lasers: world.ships.map(|_, ship| ship.lasers),
            remaining_bullets: world.ships.map(|_, ship| ship.remaining_bullets),
        }
    }
}
