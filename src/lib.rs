//! Arcade Sim - Breakout, Pong and Flappy on one deterministic kernel
//!
//! Core modules:
//! - `sim`: Deterministic kernel (geometry, collisions, physics, entities, state machine)
//! - `games`: The three games built on the kernel
//! - `scheduler`: Fixed-rate stepping from frame timestamps
//! - `platform`: Input, rendering, audio and storage interfaces
//! - `settings`: Data-driven tuning and runtime config
//! - `highscores`: Best-score bookkeeping

pub mod audio;
pub mod error;
pub mod games;
pub mod highscores;
pub mod platform;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use audio::AudioCue;
pub use error::{ArcadeError, Result};
pub use games::{Breakout, Flappy, Pong, PongMode};
pub use highscores::BestScore;
pub use scheduler::FrameScheduler;
pub use settings::{Settings, StepPolicy};

/// Shared configuration constants
pub mod consts {
    /// Fixed simulation timestep at the default tick rate
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Default simulation rate
    pub const TICK_RATE_HZ: f64 = 60.0;
    /// Default cap on steps per frame under `StepPolicy::CatchUp`
    pub const MAX_CATCH_UP_STEPS: u32 = 8;
    /// Seed used when none is configured
    pub const DEFAULT_SEED: u64 = 0x5EED_A4CA_DE00_0001;
}
