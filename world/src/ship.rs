use std::time::Duration;

use alien_onslaught_core::{
    tables, GameMode, PlayerId, Rect, Settings, ShipFlag, ShipSnapshot, ShipState, WeaponKind,
};
use glam::Vec2;

/// Ship owned by one player, created once per session.
#[derive(Clone, Debug)]
pub(crate) struct Ship {
    pub(crate) player: PlayerId,
    pub(crate) active: bool,
    pub(crate) rect: Rect,
    pub(crate) health: i32,
    pub(crate) state: ShipState,
    pub(crate) weapon: WeaponKind,
    pub(crate) missiles: u32,
    pub(crate) lasers: u32,
    pub(crate) remaining_bullets: Option<u32>,
    expires_at: [Option<Duration>; 8],
}

impl Ship {
    pub(crate) fn spawn(
        player: PlayerId,
        singleplayer: bool,
        mode: GameMode,
        settings: &Settings,
    ) -> Self {
        let active = player == PlayerId::Thunderbird || !singleplayer;
        let mut state = ShipState::spawned();
        state.alive = active;
        Self {
            player,
            active,
            rect: Rect::centered_on(spawn_point(player, singleplayer, mode, settings), tables::SHIP_SIZE),
            health: settings.starting_health,
            state,
            weapon: WeaponKind::default(),
            missiles: settings.starting_missiles,
            lasers: settings.starting_lasers,
            remaining_bullets: None,
            expires_at: [None; 8],
        }
    }

    pub(crate) fn in_play(&self) -> bool {
        self.active && self.state.alive
    }

    pub(crate) fn can_fire(&self) -> bool {
        self.in_play() && !self.state.disarmed && !self.state.exploding
    }

    /// Raises `flag` until `now + duration`, extending any running timer.
    pub(crate) fn start(&mut self, flag: ShipFlag, now: Duration, duration: Duration) {
        self.state.set(flag, true);
        self.expires_at[flag.index()] = Some(now.saturating_add(duration));
    }

    pub(crate) fn clear(&mut self, flag: ShipFlag) {
        self.state.set(flag, false);
        self.expires_at[flag.index()] = None;
        if flag == ShipFlag::Scaled {
            self.rect = Rect::centered_on(self.rect.center(), tables::SHIP_SIZE);
        }
    }

    /// Clears every flag whose timer ran out and reports it in `expired`.
    pub(crate) fn expire(&mut self, now: Duration, expired: &mut Vec<ShipFlag>) {
        for flag in ShipFlag::ALL {
            let due = self.expires_at[flag.index()].is_some_and(|deadline| now >= deadline);
            if due {
                self.clear(flag);
                expired.push(flag);
            }
        }
    }

    /// Hit pipeline: loses one hit point without clamping, starts the
    /// explosion and immunity, and reports whether the ship died.
    pub(crate) fn take_hit(&mut self, now: Duration) -> bool {
        self.start(ShipFlag::Exploding, now, tables::SHIP_EXPLOSION);
        self.start(ShipFlag::Immune, now, tables::SHIP_IMMUNITY);
        self.lose_health()
    }

    pub(crate) fn lose_health(&mut self) -> bool {
        self.health -= 1;
        if self.health <= 0 && self.state.alive {
            self.state.alive = false;
            return true;
        }
        false
    }

    /// Middle of the ship's front edge.
    pub(crate) fn muzzle(&self, mode: GameMode) -> Vec2 {
        let center = self.rect.center();
        let heading = heading(mode, self.player);
        if heading.x > 0.0 {
            Vec2::new(self.rect.right(), center.y)
        } else if heading.x < 0.0 {
            Vec2::new(self.rect.left(), center.y)
        } else {
            Vec2::new(center.x, self.rect.top())
        }
    }

    pub(crate) fn snapshot(&self) -> ShipSnapshot {
        ShipSnapshot {
            player: self.player,
            active: self.active,
            rect: self.rect,
            health: self.health,
            state: self.state,
            weapon: self.weapon,
            missiles: self.missiles,
            lasers: self.lasers,
            remaining_bullets: self.remaining_bullets,
        }
    }
}

/// Direction a ship's projectiles travel.
pub(crate) fn heading(mode: GameMode, player: PlayerId) -> Vec2 {
    if !mode.is_pvp() {
        return Vec2::NEG_Y;
    }
    match player {
        PlayerId::Thunderbird => Vec2::X,
        PlayerId::Phoenix => Vec2::NEG_X,
    }
}

/// Rotates a vertical hitbox so that it lies along `heading`.
pub(crate) fn orient(size: Vec2, heading: Vec2) -> Vec2 {
    if heading.x != 0.0 {
        Vec2::new(size.y, size.x)
    } else {
        size
    }
}

fn spawn_point(player: PlayerId, singleplayer: bool, mode: GameMode, settings: &Settings) -> Vec2 {
    let width = settings.screen_width;
    let height = settings.screen_height;
    let margin = tables::SHIP_SIZE * 0.5 + Vec2::splat(10.0);
    if mode.is_pvp() {
        return match player {
            PlayerId::Thunderbird => Vec2::new(margin.x, height * 0.5),
            PlayerId::Phoenix => Vec2::new(width - margin.x, height * 0.5),
        };
    }
    let x = match (singleplayer, player) {
        (true, _) => width * 0.5,
        (false, PlayerId::Thunderbird) => width / 3.0,
        (false, PlayerId::Phoenix) => width * 2.0 / 3.0,
    };
    Vec2::new(x, height - margin.y)
}
