use std::time::Duration;

use alien_onslaught_core::{tables, AlienId, AlienKind, AlienSnapshot, Rect, Settings};
use glam::Vec2;

#[derive(Clone, Debug)]
pub(crate) struct Alien {
    pub(crate) id: AlienId,
    pub(crate) kind: AlienKind,
    pub(crate) rect: Rect,
    pub(crate) hit_count: u32,
    /// Own travel direction; fleet aliens follow the shared fleet direction.
    pub(crate) direction: f32,
    pub(crate) immune_until: Duration,
    pub(crate) last_bullet_time: Option<Duration>,
}

impl Alien {
    pub(crate) fn new(id: AlienId, kind: AlienKind, rect: Rect, now: Duration) -> Self {
        Self {
            id,
            kind,
            rect,
            hit_count: 0,
            direction: 1.0,
            immune_until: now.saturating_add(tables::ALIEN_SPAWN_IMMUNITY),
            last_bullet_time: None,
        }
    }

    pub(crate) fn is_immune(&self, now: Duration) -> bool {
        now < self.immune_until
    }

    pub(crate) fn snapshot(&self, now: Duration, fleet_direction: f32, frozen: bool) -> AlienSnapshot {
        AlienSnapshot {
            id: self.id,
            kind: self.kind,
            rect: self.rect,
            hit_count: self.hit_count,
            immune: self.is_immune(now),
            frozen,
            direction: if self.kind.is_boss() {
                self.direction
            } else {
                fleet_direction
            },
            last_bullet_time: self.last_bullet_time,
        }
    }
}

/// Grid positions for `rows` fleet rows, left to right then top to bottom.
///
/// Columns are spaced two alien widths apart with one alien width of margin
/// on each side, so a 1260 wide screen holds eleven columns.
pub(crate) fn fleet_layout(rows: u32, settings: &Settings) -> Vec<Rect> {
    let size = tables::ALIEN_SIZE;
    let available = settings.screen_width - 2.0 * size.x;
    let columns = (available / (2.0 * size.x)).floor().max(1.0) as u32;
    let mut rects = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        for column in 0..columns {
            let origin = Vec2::new(
                size.x + column as f32 * 2.0 * size.x,
                size.y + row as f32 * 1.5 * size.y,
            );
            rects.push(Rect::new(origin, size));
        }
    }
    rects
}

pub(crate) fn boss_rect(settings: &Settings) -> Rect {
    let size = tables::BOSS_SIZE;
    Rect::new(Vec2::new((settings.screen_width - size.x) * 0.5, 40.0), size)
}
