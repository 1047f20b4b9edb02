//! Fixed timestep tick contract
//!
//! Every game consumes the same polled input and reports what happened as
//! events. Events flow upward to audio and score bookkeeping; entities never
//! touch the state machine directly.

use glam::Vec2;

use super::phase::GamePhase;
use super::state::{EntityId, PowerUpKind};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Move left (Breakout paddle)
    pub left: bool,
    /// Move right (Breakout paddle)
    pub right: bool,
    /// Move up (Pong left paddle)
    pub up: bool,
    /// Move down (Pong left paddle)
    pub down: bool,
    /// Second player up (Pong right paddle in two-player mode)
    pub alt_up: bool,
    /// Second player down
    pub alt_down: bool,
    /// Absolute pointer position in field coordinates (mouse/touch)
    pub pointer: Option<Vec2>,
    /// Start, launch or flap (click/tap/space)
    pub action: bool,
    /// Pause toggle
    pub pause: bool,
    /// Level chosen on a menu or end screen
    pub select_level: Option<u8>,
    /// Explicit return to the menu from an end screen
    pub back_to_menu: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Input with only `action` set
    pub fn action() -> Self {
        Self {
            action: true,
            ..Default::default()
        }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    WallBounce,
    PaddleHit,
    ObstacleDestroyed { id: EntityId, points: u64 },
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    /// A pickup fell off the field uncollected
    PowerUpExpired,
    /// A timed effect ran out
    EffectExpired,
    BallLost,
    LifeLost { remaining: u8 },
    /// Pong goal; `left` is true when the left player scored
    PointScored { left: bool },
    PipePassed,
    Flap,
    PhaseChanged { from: GamePhase, to: GamePhase },
    NewBest { score: u64 },
}

/// A game that advances by fixed ticks
pub trait Simulation {
    /// Advance one fixed step of `dt` seconds
    fn tick(&mut self, input: &TickInput, dt: f32);

    fn phase(&self) -> GamePhase;
}
