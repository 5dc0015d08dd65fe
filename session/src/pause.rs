//! Bookkeeping that removes paused wall time from the gameplay clock.

use std::time::Duration;

/// Accumulates the wall time spent paused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PauseLedger {
    paused_at: Option<Duration>,
    total: Duration,
}

impl PauseLedger {
    /// Starts a pause at wall time `wall`. Pausing twice keeps the first start.
    pub fn pause(&mut self, wall: Duration) {
        if self.paused_at.is_none() {
            self.paused_at = Some(wall);
        }
    }

    /// Ends the running pause at wall time `wall`.
    pub fn resume(&mut self, wall: Duration) {
        if let Some(start) = self.paused_at.take() {
            self.total += wall.saturating_sub(start);
        }
    }

    /// Reports whether a pause is running.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Wall time spent in finished pauses.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Gameplay time matching wall time `wall`.
    #[must_use]
    pub fn gameplay_time(&self, wall: Duration) -> Duration {
        let wall = self.paused_at.map_or(wall, |start| start.min(wall));
        wall.saturating_sub(self.total)
    }
}
