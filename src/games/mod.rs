//! The three games, built on the `sim` kernel
//!
//! Each game owns a state machine, a per-run session (recreated on every
//! start), a best-score record and its collaborators (store and cue sink).
//! Simulation code appends `GameEvent`s; the game forwards them to the cue
//! sink and keeps them until the host drains them.

pub mod breakout;
pub mod flappy;
pub mod pong;

pub use breakout::{Breakout, BreakoutSession};
pub use flappy::{Bird, Flappy, FlappySession, Pipe};
pub use pong::{Player, Pong, PongMode, PongSession};

use crate::audio::AudioCue;
use crate::platform::CueSink;
use crate::sim::GameEvent;

/// Play the cue for every event in `events`
fn play_cues<C: CueSink + ?Sized>(cues: &mut C, events: &[GameEvent]) {
    for cue in events.iter().filter_map(AudioCue::from_event) {
        cues.play(cue);
    }
}

/// Move `current` toward `target` by at most `max_step`
fn approach(current: f32, target: f32, max_step: f32) -> f32 {
    current + (target - current).clamp(-max_step, max_step)
}
