//! Score bookkeeping
//!
//! One tracker per game session. The current score counts pairs passed in
//! this run; the best score survives runs and is written through a
//! `ScoreStore` when the player dies.

use std::path::PathBuf;

use crate::persistence::{FileScoreStore, ScoreStore};
use crate::sim::{GameEvent, Player};

/// Best-score value meaning "never recorded"
pub const NO_BEST_SCORE: i64 = -1;

/// Current and best score
pub struct ScoreTracker {
    current: u64,
    best: i64,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for ScoreTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreTracker")
            .field("current", &self.current)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl ScoreTracker {
    /// Create a tracker, loading the previous best from `store`
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        let best = match store.load() {
            Ok(Some(best)) => {
                log::info!("Loaded best score {best}");
                best
            }
            Ok(None) => {
                log::info!("No best score recorded yet");
                NO_BEST_SCORE
            }
            Err(e) => {
                log::error!("Failed to load best score: {e:#}");
                NO_BEST_SCORE
            }
        };
        Self {
            current: 0,
            best,
            store,
        }
    }

    /// Tracker backed by a score file
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileScoreStore::new(path)))
    }

    /// Count one passed pair. Dead players do not score.
    pub fn score(&mut self, player: &Player, events: &mut Vec<GameEvent>) {
        if player.is_dead() {
            return;
        }
        self.current += 1;
        events.push(GameEvent::Score);
        log::debug!("Score {}", self.current);
    }

    /// Fold the current score into the best and persist it.
    ///
    /// A failed write is logged; the in-memory best is kept either way.
    pub fn save_score(&mut self) {
        let current = i64::try_from(self.current).unwrap_or(i64::MAX);
        self.best = self.best.max(current);
        match self.store.save(self.best) {
            Ok(()) => log::info!("Best score saved: {}", self.best),
            Err(e) => log::error!("Failed to save best score: {e:#}"),
        }
    }

    /// Start a new run; best is untouched
    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn current_score(&self) -> u64 {
        self.current
    }

    /// Best score, `NO_BEST_SCORE` if never recorded
    pub fn best_score(&self) -> i64 {
        self.best
    }
}
