//! Collaborators that turn scoreboard refreshes and sound cues into log lines.

use std::{cell::RefCell, fs, path::Path, rc::Rc};

use alien_onslaught_core::{
    GameMode, HighScoreStore, HudSnapshot, PlayerId, Scoreboard, SoundKey, SoundPlayer,
};
use alien_onslaught_session::MemoryHighScores;
use anyhow::{Context, Result};
use tracing::{debug, trace};

/// Scoreboard that logs every refresh.
#[derive(Debug, Default)]
pub(crate) struct TracingScoreboard;

impl Scoreboard for TracingScoreboard {
    fn render_scores(&mut self, hud: &HudSnapshot) {
        debug!(
            level = hud.level,
            thunderbird = hud.scores[PlayerId::Thunderbird],
            phoenix = hud.scores[PlayerId::Phoenix],
            "scores"
        );
    }

    fn update_high_score(&mut self, hud: &HudSnapshot) {
        debug!(high_score = hud.high_score, "high score");
    }

    fn create_health(&mut self, hud: &HudSnapshot) {
        debug!(
            thunderbird = hud.health[PlayerId::Thunderbird],
            phoenix = hud.health[PlayerId::Phoenix],
            "health"
        );
    }

    fn render_bullets_num(&mut self, hud: &HudSnapshot) {
        for player in PlayerId::ALL {
            if hud.singleplayer && player == PlayerId::Phoenix {
                continue;
            }
            debug!(
                player = player.name(),
                missiles = hud.missiles[player],
                lasers = hud.lasers[player],
                remaining_bullets = ?hud.remaining_bullets[player],
                "ammunition"
            );
        }
    }
}

/// Sound player that logs every cue.
#[derive(Debug, Default)]
pub(crate) struct TracingSound;

impl SoundPlayer for TracingSound {
    fn play(&mut self, sound: SoundKey) {
        trace!(?sound, "sound");
    }
}

/// High score table shared between the session and the adapter that saves it.
#[derive(Clone, Debug, Default)]
pub(crate) struct SharedHighScores(Rc<RefCell<MemoryHighScores>>);

impl SharedHighScores {
    /// Loads the table at `path`, starting empty when the file does not exist.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read high scores from {}", path.display()))?;
        let table: MemoryHighScores = toml::from_str(&text)
            .with_context(|| format!("failed to parse high scores in {}", path.display()))?;
        Ok(Self(Rc::new(RefCell::new(table))))
    }

    /// Writes the table to `path`.
    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string(&*self.0.borrow()).context("failed to encode high scores")?;
        fs::write(path, text)
            .with_context(|| format!("failed to write high scores to {}", path.display()))
    }
}

impl HighScoreStore for SharedHighScores {
    fn scores(&self, mode: GameMode) -> Vec<u64> {
        self.0.borrow().scores(mode)
    }

    fn record(&mut self, mode: GameMode, score: u64) {
        self.0.borrow_mut().record(mode, score);
    }
}
