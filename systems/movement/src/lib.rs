#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that drifts aliens, flies projectiles and
//! drops falling entities.
//!
//! Every distance is expressed per reference frame and scaled by the elapsed
//! time reported in [`Event::TimeAdvanced`], so frame rate never changes the
//! pace of the game.

use std::time::Duration;

use alien_onslaught_core::{
    tables, AlienSnapshot, AlienView, AsteroidView, Command, EntityRef, Event, MissilePhase,
    PowerView, ProjectileKind, ProjectileSnapshot, ProjectileView, Rect, Settings,
};
use glam::Vec2;

/// Pure system that reacts to world events and emits movement commands.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Nothing moves unless the batch contains a [`Event::TimeAdvanced`].
    #[allow(clippy::too_many_arguments)]
    pub fn handle(
        &self,
        events: &[Event],
        aliens: &AlienView,
        projectiles: &ProjectileView,
        asteroids: &AsteroidView,
        powers: &PowerView,
        settings: &Settings,
        out: &mut Vec<Command>,
    ) {
        let Some((dt, now)) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { dt, now } => Some((*dt, *now)),
            _ => None,
        }) else {
            return;
        };

        let scale = tables::frame_scale(dt);
        let bounds = settings.bounds();

        drift_aliens(aliens, settings.alien_speed * scale, &bounds, out);
        for projectile in projectiles.iter() {
            advance_projectile(projectile, scale, now, &bounds, out);
        }

        let asteroid_fall = Vec2::new(0.0, settings.asteroid_speed * scale);
        for asteroid in asteroids.iter() {
            fall(
                EntityRef::Asteroid(asteroid.id),
                asteroid.rect,
                asteroid_fall,
                &bounds,
                out,
            );
        }
        let power_fall = Vec2::new(0.0, settings.power_speed * scale);
        for power in powers.iter() {
            fall(EntityRef::Power(power.id), power.rect, power_fall, &bounds, out);
        }
    }
}

fn drift_aliens(aliens: &AlienView, distance: f32, bounds: &Rect, out: &mut Vec<Command>) {
    if distance <= 0.0 || aliens.iter().any(|alien| alien.frozen) {
        return;
    }

    let (bosses, fleet): (Vec<&AlienSnapshot>, Vec<&AlienSnapshot>) =
        aliens.iter().partition(|alien| alien.kind.is_boss());

    if let Some(direction) = fleet.first().map(|alien| alien.direction) {
        let step = Vec2::new(direction * distance, 0.0);
        let at_edge = fleet
            .iter()
            .any(|alien| crosses_side(&alien.rect.translated(step), bounds));
        if at_edge {
            out.push(Command::ReverseFleet);
        } else {
            out.extend(fleet.iter().map(|alien| Command::MoveEntity {
                entity: EntityRef::Alien(alien.id),
                delta: step,
            }));
        }
    }

    for boss in bosses {
        let step = Vec2::new(boss.direction * distance, 0.0);
        if crosses_side(&boss.rect.translated(step), bounds) {
            out.push(Command::ReverseAlien { alien: boss.id });
        } else {
            out.push(Command::MoveEntity {
                entity: EntityRef::Alien(boss.id),
                delta: step,
            });
        }
    }
}

fn crosses_side(rect: &Rect, bounds: &Rect) -> bool {
    rect.left() < bounds.left() || rect.right() > bounds.right()
}

fn advance_projectile(
    projectile: &ProjectileSnapshot,
    scale: f32,
    now: Duration,
    bounds: &Rect,
    out: &mut Vec<Command>,
) {
    let entity = EntityRef::Projectile(projectile.id);

    if let MissilePhase::Exploding { frame } = projectile.phase {
        let started = projectile.exploded_at.unwrap_or(projectile.fired_at);
        let elapsed = now.saturating_sub(started);
        let target = explosion_frame(elapsed);
        if target >= tables::MISSILE_EXPLOSION_FRAMES {
            out.push(Command::Despawn { entity });
        } else if target > frame {
            out.push(Command::AdvanceExplosion {
                projectile: projectile.id,
            });
        }
        return;
    }

    if projectile.kind == ProjectileKind::Laser {
        if now.saturating_sub(projectile.fired_at) >= tables::LASER_DURATION {
            out.push(Command::Despawn { entity });
        }
        return;
    }

    if projectile.velocity == Vec2::ZERO {
        return;
    }
    let delta = projectile.velocity * scale;
    if projectile.rect.translated(delta).is_outside(bounds) {
        out.push(Command::Despawn { entity });
    } else {
        out.push(Command::MoveEntity { entity, delta });
    }
}

fn explosion_frame(elapsed: Duration) -> u32 {
    let frame = elapsed.as_millis() / tables::EXPLOSION_FRAME_DURATION.as_millis();
    u32::try_from(frame).unwrap_or(u32::MAX)
}

fn fall(entity: EntityRef, rect: Rect, delta: Vec2, bounds: &Rect, out: &mut Vec<Command>) {
    if rect.translated(delta).top() > bounds.bottom() {
        out.push(Command::Despawn { entity });
    } else {
        out.push(Command::MoveEntity { entity, delta });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_frames_follow_fifty_millisecond_steps() {
        assert_eq!(explosion_frame(Duration::ZERO), 0);
        assert_eq!(explosion_frame(Duration::from_millis(49)), 0);
        assert_eq!(explosion_frame(Duration::from_millis(120)), 2);
        assert_eq!(explosion_frame(Duration::from_millis(300)), 6);
    }

    #[test]
    fn side_crossing_ignores_vertical_overflow() {
        let bounds = Rect::from_xywh(0.0, 0.0, 100.0, 100.0);
        assert!(crosses_side(&Rect::from_xywh(-1.0, 10.0, 10.0, 10.0), &bounds));
        assert!(crosses_side(&Rect::from_xywh(95.0, 10.0, 10.0, 10.0), &bounds));
        assert!(!crosses_side(&Rect::from_xywh(10.0, 150.0, 10.0, 10.0), &bounds));
    }
}
