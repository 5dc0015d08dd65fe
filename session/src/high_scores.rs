use std::collections::BTreeMap;

use alien_onslaught_core::{GameMode, HighScoreStore};
use serde::{Deserialize, Serialize};

/// Entries kept per mode.
pub const HIGH_SCORE_ENTRIES: usize = 10;

/// In-memory per-mode high score table.
///
/// Serialises as one list per mode key, best score first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryHighScores {
    tables: BTreeMap<String, Vec<u64>>,
}

impl MemoryHighScores {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl HighScoreStore for MemoryHighScores {
    fn scores(&self, mode: GameMode) -> Vec<u64> {
        self.tables.get(mode.key()).cloned().unwrap_or_default()
    }

    fn record(&mut self, mode: GameMode, score: u64) {
        let table = self.tables.entry(mode.key().to_owned()).or_default();
        let position = table.partition_point(|&existing| existing >= score);
        table.insert(position, score);
        table.truncate(HIGH_SCORE_ENTRIES);
    }
}
