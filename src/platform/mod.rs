//! Platform abstraction layer
//!
//! The collaborators the kernel talks to, as traits:
//! - Input (polled once per tick)
//! - Rendering (read-only, every frame)
//! - Audio cues (fire-and-forget)
//! - Best-score storage (LocalStorage on web, JSON file or memory natively)

pub mod input;
pub mod storage;

use crate::audio::AudioCue;
use crate::sim::TickInput;

pub use input::ScriptedInput;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorageStore;
pub use storage::{JsonFileStore, MemoryStore};

/// Source of per-tick input; keyboard, pointer and touch all look the same here
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Draws a read-only view of a game. Never mutates simulation state.
pub trait Renderer<G: ?Sized> {
    fn render(&mut self, game: &G);
}

/// Receives audio cues. Nothing it does is observed by the caller.
pub trait CueSink {
    fn play(&mut self, cue: AudioCue);
}

/// Integer key-value store for best scores.
///
/// Missing keys read as 0. Writes must not fail the caller: implementations
/// log and drop errors.
pub trait ScoreStore {
    fn get(&self, key: &str) -> u64;
    fn set(&mut self, key: &str, value: u64);
}

impl<T: ScoreStore + ?Sized> ScoreStore for &mut T {
    fn get(&self, key: &str) -> u64 {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: u64) {
        (**self).set(key, value)
    }
}

impl<T: CueSink + ?Sized> CueSink for &mut T {
    fn play(&mut self, cue: AudioCue) {
        (**self).play(cue)
    }
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl<G: ?Sized> Renderer<G> for NullRenderer {
    fn render(&mut self, _game: &G) {}
}
