//! Best-score bookkeeping
//!
//! One integer per game, compared when a run ends. Only a strictly greater
//! score is written.

use crate::platform::ScoreStore;

/// Store key for each game
pub const BREAKOUT_KEY: &str = "arcade_sim_breakout_best";
pub const PONG_KEY: &str = "arcade_sim_pong_best";
pub const FLAPPY_KEY: &str = "arcade_sim_flappy_best";

/// Cached best score for one store key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestScore {
    key: &'static str,
    value: u64,
}

impl BestScore {
    /// Read the current best from `store`
    pub fn load<S: ScoreStore + ?Sized>(store: &S, key: &'static str) -> Self {
        let value = store.get(key);
        log::info!("Best score for {key}: {value}");
        Self { key, value }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Offer a final score. Writes and returns true only if it beats the
    /// stored best; the store is re-read first in case another session
    /// raised it.
    pub fn submit<S: ScoreStore + ?Sized>(&mut self, store: &mut S, score: u64) -> bool {
        let previous = store.get(self.key).max(self.value);
        if score > previous {
            store.set(self.key, score);
            self.value = score;
            log::info!("New best for {}: {} (was {})", self.key, score, previous);
            true
        } else {
            self.value = previous;
            false
        }
    }
}
