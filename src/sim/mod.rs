//! Deterministic simulation kernel
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Explicit `dt` only, velocities in px/s
//! - Seeded RNG only (owned by each game session)
//! - Stable iteration order (spawn order = entity ID order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod effects;
pub mod geometry;
pub mod phase;
pub mod physics;
pub mod registry;
pub mod state;
pub mod tick;

pub use collision::{
    CollisionResult, MovingCircle, ball_shape_collision, circle_circle_hit, circle_rect_hit,
    circle_triangle_hit,
};
pub use effects::{ActiveEffects, TimedEffect};
pub use geometry::{Circle, Rect, Shape, Side, Triangle};
pub use phase::{GamePhase, PhaseCommand, Scoreboard, StateMachine, Variant};
pub use physics::{Walls, integrate, paddle_bounce, reflect_off_walls};
pub use registry::{EntityKind, EntityRef, EntityRegistry, Spawn};
pub use state::{Ball, EntityId, Obstacle, Paddle, Particle, PowerUp, PowerUpKind};
pub use tick::{GameEvent, Simulation, TickInput};
