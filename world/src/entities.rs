use std::time::Duration;

use alien_onslaught_core::{
    AsteroidId, AsteroidSnapshot, MissilePhase, PowerId, PowerKind, PowerSnapshot, ProjectileId,
    ProjectileKind, ProjectileOwner, ProjectileSnapshot, Rect,
};
use glam::Vec2;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) kind: ProjectileKind,
    pub(crate) owner: ProjectileOwner,
    pub(crate) rect: Rect,
    pub(crate) velocity: Vec2,
    pub(crate) phase: MissilePhase,
    pub(crate) fired_at: Duration,
    pub(crate) exploded_at: Option<Duration>,
}

impl Projectile {
    pub(crate) fn is_exploding(&self) -> bool {
        matches!(self.phase, MissilePhase::Exploding { .. })
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            kind: self.kind,
            owner: self.owner,
            rect: self.rect,
            velocity: self.velocity,
            phase: self.phase,
            fired_at: self.fired_at,
            exploded_at: self.exploded_at,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Asteroid {
    pub(crate) id: AsteroidId,
    pub(crate) rect: Rect,
}

impl Asteroid {
    pub(crate) fn snapshot(&self) -> AsteroidSnapshot {
        AsteroidSnapshot {
            id: self.id,
            rect: self.rect,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Power {
    pub(crate) id: PowerId,
    pub(crate) kind: PowerKind,
    pub(crate) rect: Rect,
}

impl Power {
    pub(crate) fn snapshot(&self) -> PowerSnapshot {
        PowerSnapshot {
            id: self.id,
            kind: self.kind,
            rect: self.rect,
        }
    }
}
