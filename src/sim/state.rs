//! Entity types shared by the games
//!
//! Entities are plain data. The registry owns them, the physics step mutates
//! them, and renderers read them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::MovingCircle;
use super::geometry::{Rect, Shape};

/// Stable identifier handed out by the registry
pub type EntityId = u32;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: EntityId,
    pub pos: Vec2,
    /// Position at the start of the current tick
    pub prev_pos: Vec2,
    /// Velocity in pixels per second
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(id: EntityId, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            vel,
            radius,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// View of this ball for the swept collision tests
    pub fn as_moving(&self) -> MovingCircle {
        MovingCircle {
            pos: self.pos,
            prev: self.prev_pos,
            vel: self.vel,
            radius: self.radius,
        }
    }

    /// Whether position and velocity are usable numbers
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// A horizontal or vertical paddle, stored as an axis-aligned box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Width the paddle reverts to when a widening effect ends
    pub base_width: f32,
}

impl Paddle {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            base_width: size.x,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Change the width, keeping the left edge in place
    pub fn set_width(&mut self, width: f32) {
        self.size.x = width;
    }

    /// Keep the paddle horizontally inside `[min_x, max_x]`
    pub fn clamp_x(&mut self, min_x: f32, max_x: f32) {
        self.pos.x = self.pos.x.min(max_x - self.size.x).max(min_x);
    }

    /// Keep the paddle vertically inside `[min_y, max_y]`
    pub fn clamp_y(&mut self, min_y: f32, max_y: f32) {
        self.pos.y = self.pos.y.min(max_y - self.size.y).max(min_y);
    }
}

/// A destructible obstacle (brick, peg, wall segment)
///
/// The shape never changes after creation; `alive` only ever goes from true to false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    shape: Shape,
    alive: bool,
    /// Palette index for the renderer
    pub color_tag: u8,
}

impl Obstacle {
    pub fn new(id: EntityId, shape: Shape, color_tag: u8) -> Self {
        Self {
            id,
            shape,
            alive: true,
            color_tag,
        }
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Terminal: a destroyed obstacle never comes back within a level
    pub fn destroy(&mut self) {
        self.alive = false;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    MultiBall,
    WidePaddle,
    SlowBall,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::MultiBall,
        PowerUpKind::WidePaddle,
        PowerUpKind::SlowBall,
    ];

    /// Single-letter label drawn on the pickup
    pub fn symbol(self) -> char {
        match self {
            PowerUpKind::MultiBall => 'M',
            PowerUpKind::WidePaddle => 'W',
            PowerUpKind::SlowBall => 'S',
        }
    }
}

/// A falling pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    /// Centre of the pickup box
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left before removal
    pub life: f32,
    /// Initial life, for fade-out
    pub max_life: f32,
    pub size: f32,
    pub color_tag: u8,
}

impl Particle {
    /// Remaining life as a 0..1 fraction
    pub fn fade(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
