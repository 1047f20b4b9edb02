//! Per-tick integration and the reflection rules shared by the games
//!
//! Velocities are in pixels per second and every step takes an explicit `dt`.

use glam::Vec2;

use super::collision::{CollisionResult, ball_shape_collision, circle_rect_hit};
use super::geometry::Rect;
use super::state::{Ball, Obstacle};

/// Which edges of the play field reflect a ball
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Walls {
    /// Open floor: balls fall out of the bottom
    pub const BREAKOUT: Walls = Walls {
        left: true,
        right: true,
        top: true,
        bottom: false,
    };

    /// Open sides: balls leave through the goals
    pub const PONG: Walls = Walls {
        left: false,
        right: false,
        top: true,
        bottom: true,
    };
}

/// Remember the current position, then advance by `vel * dt`
#[inline]
pub fn integrate(ball: &mut Ball, dt: f32) {
    ball.prev_pos = ball.pos;
    ball.pos += ball.vel * dt;
}

/// Reflect off the enabled walls of `field`.
///
/// A wall only reflects a ball moving into it: the position is clamped to
/// the wall and that velocity component inverted. Returns true if any wall
/// was hit.
pub fn reflect_off_walls(ball: &mut Ball, field: &Rect, walls: Walls) -> bool {
    let r = ball.radius;
    let mut hit = false;

    if walls.left && ball.pos.x - r < field.left() && ball.vel.x < 0.0 {
        ball.pos.x = field.left() + r;
        ball.vel.x = -ball.vel.x;
        hit = true;
    }
    if walls.right && ball.pos.x + r > field.right() && ball.vel.x > 0.0 {
        ball.pos.x = field.right() - r;
        ball.vel.x = -ball.vel.x;
        hit = true;
    }
    if walls.top && ball.pos.y - r < field.top() && ball.vel.y < 0.0 {
        ball.pos.y = field.top() + r;
        ball.vel.y = -ball.vel.y;
        hit = true;
    }
    if walls.bottom && ball.pos.y + r > field.bottom() && ball.vel.y > 0.0 {
        ball.pos.y = field.bottom() - r;
        ball.vel.y = -ball.vel.y;
        hit = true;
    }

    hit
}

/// True once the whole ball is below the bottom of the field
#[inline]
pub fn fell_out(ball: &Ball, field: &Rect) -> bool {
    ball.pos.y - ball.radius > field.bottom()
}

/// Where along the paddle's width `x` lies: -1 at the left edge, +1 at the right
pub fn hit_position(x: f32, paddle: &Rect) -> f32 {
    let half = paddle.size.x / 2.0;
    if half <= 0.0 {
        return 0.0;
    }
    ((x - paddle.center().x) / half).clamp(-1.0, 1.0)
}

/// Bounce angle from vertical for a hit position in [-1, 1]
#[inline]
pub fn bounce_angle(hit_pos: f32, max_angle: f32) -> f32 {
    hit_pos.clamp(-1.0, 1.0) * max_angle
}

/// Bounce a downward-moving ball off a horizontal paddle.
///
/// The ball is placed on top of the paddle and leaves at an angle chosen by
/// where it struck, keeping the pre-bounce speed.
pub fn paddle_bounce(ball: &mut Ball, paddle: &Rect, max_angle: f32) -> bool {
    if ball.vel.y <= 0.0 || !circle_rect_hit(ball.pos, ball.radius, paddle) {
        return false;
    }

    ball.pos.y = paddle.top() - ball.radius;
    let angle = bounce_angle(hit_position(ball.pos.x, paddle), max_angle);
    let speed = ball.vel.length();
    ball.vel = Vec2::new(speed * angle.sin(), -speed * angle.cos());
    true
}

/// First live obstacle touching the ball, in registry order.
///
/// Later obstacles are not examined, so a ball destroys at most one per tick.
pub fn first_obstacle_hit(ball: &Ball, obstacles: &[Obstacle]) -> Option<(usize, CollisionResult)> {
    let moving = ball.as_moving();
    obstacles
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_alive())
        .find_map(|(i, o)| {
            let result = ball_shape_collision(&moving, o.shape());
            result.hit.then_some((i, result))
        })
}

/// Vertical body under constant gravity (semi-implicit Euler).
///
/// A flap replaces gravity for that tick by setting the velocity outright.
pub fn integrate_vertical(y: &mut f32, vel_y: &mut f32, gravity: f32, flap: Option<f32>, dt: f32) {
    match flap {
        Some(impulse) => *vel_y = impulse,
        None => *vel_y += gravity * dt,
    }
    *y += *vel_y * dt;
}
