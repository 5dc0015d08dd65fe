//! Scripted pilots that stand in for keyboard input in headless runs.

use alien_onslaught_core::{PerPlayer, Rect};
use alien_onslaught_session::ShipInput;
use alien_onslaught_world::{query, World};
use glam::Vec2;

/// Horizontal distance under which a pilot stops steering.
const DEAD_ZONE: f32 = 8.0;

/// Steers every active ship at its target and keeps the trigger held.
#[derive(Debug, Default)]
pub(crate) struct Autopilot {
    frame: u64,
}

impl Autopilot {
    pub(crate) fn inputs(&mut self, world: &World) -> PerPlayer<ShipInput> {
        self.frame += 1;
        let pvp = query::mode(world).is_pvp();
        let ships = query::ships(world);
        let aliens = query::alien_view(world);
        let boss_present = aliens.iter().any(|alien| alien.kind.is_boss());
        let frame = self.frame;

        ships.map(|player, ship| {
            if !ship.in_play() {
                return ShipInput::default();
            }
            let target = if pvp {
                Some(ships[player.opponent()].rect)
            } else {
                aliens
                    .iter()
                    .map(|alien| alien.rect)
                    .min_by(|a, b| distance(ship.rect, *a).total_cmp(&distance(ship.rect, *b)))
            };
            ShipInput {
                steer: target.map_or(Vec2::ZERO, |target| steer(ship.rect, target, pvp)),
                fire: true,
                missile: boss_present && frame % 90 == 0,
                laser: ship.lasers > 0 && aliens.len() > 20 && frame % 120 == 0,
            }
        })
    }
}

fn distance(ship: Rect, target: Rect) -> f32 {
    ship.center().distance_squared(target.center())
}

/// Lines the ship up with `target` along the axis its bullets do not travel.
fn steer(ship: Rect, target: Rect, pvp: bool) -> Vec2 {
    let offset = target.center() - ship.center();
    let along = if pvp { offset.y } else { offset.x };
    if along.abs() < DEAD_ZONE {
        return Vec2::ZERO;
    }
    let push = along.signum();
    if pvp {
        Vec2::new(0.0, push)
    } else {
        Vec2::new(push, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pilots_line_up_on_the_firing_axis() {
        let ship = Rect::from_xywh(100.0, 600.0, 60.0, 60.0);
        let alien = Rect::from_xywh(400.0, 50.0, 50.0, 50.0);
        assert_eq!(steer(ship, alien, false), Vec2::new(1.0, 0.0));

        let rival = Rect::from_xywh(1_200.0, 100.0, 60.0, 60.0);
        assert_eq!(steer(ship, rival, true), Vec2::new(0.0, -1.0));

        let aligned = Rect::from_xywh(103.0, 50.0, 60.0, 60.0);
        assert_eq!(steer(ship, aligned, false), Vec2::ZERO);
    }
}
