//! Swept circle-vs-shape collision detection
//!
//! Each test takes a moving circle (current centre, previous centre, velocity,
//! radius) and a static shape and reports whether they touch and which face
//! was struck. The physics step turns the face into an axis inversion.

use glam::Vec2;

use super::geometry::{Circle, Rect, Shape, Side, Triangle};

/// Lower bound (degrees) of the edge/velocity angle difference that counts as
/// a near-perpendicular triangle hit
pub const TRIANGLE_PERPENDICULAR_MIN_DEG: f32 = 60.0;
/// Upper bound (degrees) of the near-perpendicular band
pub const TRIANGLE_PERPENDICULAR_MAX_DEG: f32 = 120.0;

/// A circle in motion: where it is now, where it was one tick ago, and where it is heading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingCircle {
    pub pos: Vec2,
    pub prev: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Face of the obstacle that was struck (meaningless on a miss)
    pub side: Side,
    /// Outward normal of the struck face, zero on a miss
    pub normal: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            side: Side::Top,
            normal: Vec2::ZERO,
        }
    }

    fn on_side(side: Side) -> Self {
        Self {
            hit: true,
            side,
            normal: side.outward_normal(),
        }
    }
}

/// Overlap test: closest point on the rectangle within `radius` of the centre
pub fn circle_rect_hit(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.distance_squared(rect.closest_point(center)) <= radius * radius
}

/// Overlap test: centre distance strictly less than the sum of radii
pub fn circle_circle_hit(center: Vec2, radius: f32, other: &Circle) -> bool {
    center.distance(other.center) < radius + other.radius
}

/// Overlap test: centre inside the triangle, or any edge closer than `radius`
pub fn circle_triangle_hit(center: Vec2, radius: f32, tri: &Triangle) -> bool {
    tri.contains_point(center) || tri.edges().iter().any(|e| e.distance_to(center) < radius)
}

/// Face chosen from the dominant velocity axis.
///
/// Moving mostly downward strikes a top face, mostly rightward a left face.
/// Ties go to the horizontal axis, so a zero velocity yields `Right`.
pub fn velocity_side(vel: Vec2) -> Side {
    if vel.y.abs() > vel.x.abs() {
        if vel.y > 0.0 { Side::Top } else { Side::Bottom }
    } else if vel.x > 0.0 {
        Side::Left
    } else {
        Side::Right
    }
}

/// Circle vs axis-aligned rectangle with previous-position side disambiguation
pub fn ball_rect_collision(ball: &MovingCircle, rect: &Rect) -> CollisionResult {
    if !circle_rect_hit(ball.pos, ball.radius, rect) {
        return CollisionResult::miss();
    }

    let r = ball.radius;
    let (prev, cur, vel) = (ball.prev, ball.pos, ball.vel);

    let side = if prev.y + r <= rect.top() && cur.y + r > rect.top() && vel.y > 0.0 {
        Side::Top
    } else if prev.y - r >= rect.bottom() && cur.y - r < rect.bottom() && vel.y < 0.0 {
        Side::Bottom
    } else if prev.x + r <= rect.left() && cur.x + r > rect.left() && vel.x > 0.0 {
        Side::Left
    } else if prev.x - r >= rect.right() && cur.x - r < rect.right() && vel.x < 0.0 {
        Side::Right
    } else {
        // Corner clip or tunnelling: no single edge was crossed this tick
        velocity_side(vel)
    };

    CollisionResult::on_side(side)
}

/// Circle vs triangle, resolved against the nearest edge
pub fn ball_triangle_collision(ball: &MovingCircle, tri: &Triangle) -> CollisionResult {
    if !circle_triangle_hit(ball.pos, ball.radius, tri) {
        return CollisionResult::miss();
    }

    let edges = tri.edges();
    let nearest = edges
        .iter()
        .min_by(|a, b| a.distance_to(ball.pos).total_cmp(&b.distance_to(ball.pos)))
        .copied()
        .unwrap_or(edges[0]);

    let vel_angle = ball.vel.y.atan2(ball.vel.x);
    // Edges have no direction, so fold the difference into [0°, 180°)
    let diff = (nearest.angle() - vel_angle)
        .abs()
        .rem_euclid(std::f32::consts::PI)
        .to_degrees();

    let band = TRIANGLE_PERPENDICULAR_MIN_DEG..=TRIANGLE_PERPENDICULAR_MAX_DEG;
    let side = if band.contains(&diff) {
        velocity_side(ball.vel)
    } else {
        nearest.side
    };

    CollisionResult::on_side(side)
}

/// Circle vs circle, classified by the dominant axis of the centre-to-centre normal
pub fn ball_circle_collision(ball: &MovingCircle, circle: &Circle) -> CollisionResult {
    if !circle_circle_hit(ball.pos, ball.radius, circle) {
        return CollisionResult::miss();
    }

    let delta = ball.pos - circle.center;
    let dist = delta.length();
    if dist < f32::EPSILON {
        // Coincident centres: no usable normal
        return CollisionResult::on_side(Side::Top);
    }

    let n = delta / dist;
    let side = if n.x.abs() > n.y.abs() {
        if n.x > 0.0 { Side::Right } else { Side::Left }
    } else if n.y > 0.0 {
        Side::Bottom
    } else {
        Side::Top
    };

    CollisionResult {
        hit: true,
        side,
        normal: n,
    }
}

/// Single entry point used by the physics step
pub fn ball_shape_collision(ball: &MovingCircle, shape: &Shape) -> CollisionResult {
    match shape {
        Shape::Rect(r) => ball_rect_collision(ball, r),
        Shape::Triangle(t) => ball_triangle_collision(ball, t),
        Shape::Circle(c) => ball_circle_collision(ball, c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn moving(pos: Vec2, prev: Vec2, vel: Vec2) -> MovingCircle {
        MovingCircle {
            pos,
            prev,
            vel,
            radius: 8.0,
        }
    }

    #[test]
    fn test_rect_hit_from_above() {
        let rect = Rect::new(100.0, 100.0, 64.0, 20.0);
        let ball = moving(Vec2::new(130.0, 95.0), Vec2::new(130.0, 88.0), Vec2::new(0.0, 7.0));
        let result = ball_rect_collision(&ball, &rect);
        assert!(result.hit);
        assert_eq!(result.side, Side::Top);
        assert_eq!(result.normal, Vec2::NEG_Y);
    }

    #[test]
    fn test_rect_hit_from_left() {
        let rect = Rect::new(100.0, 100.0, 64.0, 20.0);
        let ball = moving(Vec2::new(95.0, 110.0), Vec2::new(90.0, 110.0), Vec2::new(5.0, 1.0));
        let result = ball_rect_collision(&ball, &rect);
        assert!(result.hit);
        assert_eq!(result.side, Side::Left);
    }

    #[test]
    fn test_rect_miss() {
        let rect = Rect::new(100.0, 100.0, 64.0, 20.0);
        let ball = moving(Vec2::new(50.0, 50.0), Vec2::new(45.0, 45.0), Vec2::new(5.0, 5.0));
        assert!(!ball_rect_collision(&ball, &rect).hit);
    }

    #[test]
    fn test_rect_fallback_uses_dominant_velocity() {
        let rect = Rect::new(100.0, 100.0, 64.0, 20.0);
        // Already overlapping last tick: no edge crossed, fall back to velocity
        let ball = moving(Vec2::new(130.0, 110.0), Vec2::new(131.0, 112.0), Vec2::new(-1.0, -2.0));
        let result = ball_rect_collision(&ball, &rect);
        assert!(result.hit);
        assert_eq!(result.side, Side::Bottom);

        let ball = moving(Vec2::new(130.0, 110.0), Vec2::new(126.0, 109.0), Vec2::new(4.0, 1.0));
        assert_eq!(ball_rect_collision(&ball, &rect).side, Side::Left);
    }

    #[test]
    fn test_velocity_side_zero_velocity_is_deterministic() {
        assert_eq!(velocity_side(Vec2::ZERO), Side::Right);
        assert_eq!(velocity_side(Vec2::new(3.0, 3.0)), Side::Left);
    }

    #[test]
    fn test_circle_coincident_centres() {
        let c = Circle::new(Vec2::new(50.0, 50.0), 18.0);
        let ball = moving(c.center, c.center, Vec2::new(3.0, 4.0));
        let result = ball_circle_collision(&ball, &c);
        assert!(result.hit);
        assert_eq!(result.side, Side::Top);
        assert!(result.normal.is_finite());
    }

    #[test]
    fn test_circle_side_from_normal() {
        let c = Circle::new(Vec2::new(50.0, 50.0), 18.0);
        let below = moving(Vec2::new(52.0, 70.0), Vec2::new(52.0, 75.0), Vec2::new(0.0, -5.0));
        assert_eq!(ball_circle_collision(&below, &c).side, Side::Bottom);
        let left = moving(Vec2::new(28.0, 51.0), Vec2::new(24.0, 51.0), Vec2::new(4.0, 0.0));
        assert_eq!(ball_circle_collision(&left, &c).side, Side::Left);
        let far = moving(Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), Vec2::ZERO);
        assert!(!ball_circle_collision(&far, &c).hit);
    }

    #[test]
    fn test_circle_touching_is_not_a_hit() {
        let c = Circle::new(Vec2::ZERO, 10.0);
        let ball = moving(Vec2::new(18.0, 0.0), Vec2::new(18.0, 0.0), Vec2::ZERO);
        assert!(!ball_circle_collision(&ball, &c).hit);
    }

    #[test]
    fn test_triangle_glancing_hit_uses_edge_tag() {
        // Inverted triangle: top edge runs along y = 100
        let tri = Triangle::new(Vec2::new(100.0, 100.0), 50.0, false);
        // Ball skimming almost parallel to the top edge, just touching it
        let ball = moving(Vec2::new(125.0, 93.0), Vec2::new(120.0, 92.5), Vec2::new(5.0, 0.5));
        let result = ball_triangle_collision(&ball, &tri);
        assert!(result.hit);
        assert_eq!(result.side, Side::Top);
    }

    #[test]
    fn test_triangle_perpendicular_hit_uses_velocity() {
        let tri = Triangle::new(Vec2::new(100.0, 100.0), 50.0, false);
        // Falling straight onto the top edge
        let ball = moving(Vec2::new(125.0, 94.0), Vec2::new(125.0, 89.0), Vec2::new(0.0, 5.0));
        let result = ball_triangle_collision(&ball, &tri);
        assert!(result.hit);
        assert_eq!(result.side, Side::Top);

        // Rising straight into the base of an upright triangle
        let up = Triangle::new(Vec2::new(100.0, 100.0), 50.0, true);
        let base_y = 100.0 + up.height();
        let ball = moving(
            Vec2::new(125.0, base_y + 6.0),
            Vec2::new(125.0, base_y + 11.0),
            Vec2::new(0.0, -5.0),
        );
        let result = ball_triangle_collision(&ball, &up);
        assert!(result.hit);
        assert_eq!(result.side, Side::Bottom);
    }

    /// Ball centre 6 px outside the midpoint of the left slant of a 50 px
    /// triangle anchored at (100, 100)
    fn beside_left_slant(upright: bool) -> (Triangle, Vec2) {
        use crate::sim::geometry::SQRT3_OVER_2;
        let tri = Triangle::new(Vec2::new(100.0, 100.0), 50.0, upright);
        let mid = Vec2::new(112.5, 100.0 + tri.height() / 2.0);
        let outward = if upright {
            Vec2::new(-SQRT3_OVER_2, -0.5)
        } else {
            Vec2::new(-SQRT3_OVER_2, 0.5)
        };
        (tri, mid + outward * 6.0)
    }

    #[test]
    fn test_falling_onto_upright_slant_bounces_up() {
        let (tri, pos) = beside_left_slant(true);
        let vel = Vec2::new(0.0, 300.0);
        let ball = moving(pos, pos - vel / 60.0, vel);
        let result = ball_triangle_collision(&ball, &tri);
        assert!(result.hit);
        assert_eq!(result.side, Side::Top);
        assert_eq!(result.side.reflect(vel), Vec2::new(0.0, -300.0));
    }

    #[test]
    fn test_rising_into_inverted_slant_bounces_down() {
        let (tri, pos) = beside_left_slant(false);
        let vel = Vec2::new(0.0, -300.0);
        let ball = moving(pos, pos - vel / 60.0, vel);
        let result = ball_triangle_collision(&ball, &tri);
        assert!(result.hit);
        assert_eq!(result.side, Side::Bottom);
        assert_eq!(result.side.reflect(vel), Vec2::new(0.0, 300.0));
    }

    #[test]
    fn test_square_hit_on_slant_uses_velocity() {
        // About 109° off the slant: inside the near-perpendicular band
        let (tri, pos) = beside_left_slant(true);
        let vel = Vec2::new(300.0, 60.0);
        let ball = moving(pos, pos - vel / 60.0, vel);
        let result = ball_triangle_collision(&ball, &tri);
        assert!(result.hit);
        assert_eq!(result.side, Side::Left);
        assert_eq!(result.side.reflect(vel), Vec2::new(-300.0, 60.0));
    }

    #[test]
    fn test_triangle_miss() {
        let tri = Triangle::new(Vec2::new(100.0, 100.0), 50.0, true);
        // Top-left corner of the bounding box, well away from the slanted edge
        let ball = moving(Vec2::new(98.0, 98.0), Vec2::new(95.0, 95.0), Vec2::new(3.0, 3.0));
        assert!(!ball_triangle_collision(&ball, &tri).hit);
    }

    #[test]
    fn test_shape_dispatch() {
        let ball = moving(Vec2::new(10.0, 10.0), Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0));
        let rect = Shape::Rect(Rect::new(0.0, 0.0, 20.0, 20.0));
        let circle = Shape::Circle(Circle::new(Vec2::new(200.0, 200.0), 5.0));
        assert!(ball_shape_collision(&ball, &rect).hit);
        assert!(!ball_shape_collision(&ball, &circle).hit);
    }

    /// Brute-force oracle: sample the rectangle densely and take the nearest sample
    fn sampled_min_distance(center: Vec2, rect: &Rect) -> f32 {
        const STEPS: usize = 64;
        let mut best = f32::INFINITY;
        for i in 0..=STEPS {
            for j in 0..=STEPS {
                let p = rect.min
                    + Vec2::new(
                        rect.size.x * i as f32 / STEPS as f32,
                        rect.size.y * j as f32 / STEPS as f32,
                    );
                best = best.min(center.distance(p));
            }
        }
        best
    }

    proptest! {
        #[test]
        fn prop_rect_hit_matches_sampling_oracle(
            cx in -50.0f32..150.0,
            cy in -50.0f32..150.0,
            radius in 1.0f32..30.0,
            rx in 0.0f32..60.0,
            ry in 0.0f32..60.0,
            rw in 1.0f32..40.0,
            rh in 1.0f32..40.0,
        ) {
            let rect = Rect::new(rx, ry, rw, rh);
            let center = Vec2::new(cx, cy);
            let oracle = sampled_min_distance(center, &rect);
            // Sampling overestimates by at most half a grid diagonal
            let slack = (rw.max(rh) / 64.0) * 1.5 + 1e-3;
            if oracle <= radius - slack {
                prop_assert!(circle_rect_hit(center, radius, &rect));
            }
            if oracle > radius + slack {
                prop_assert!(!circle_rect_hit(center, radius, &rect));
            }
        }

        #[test]
        fn prop_every_hit_has_a_side(
            px in 0.0f32..200.0,
            py in 0.0f32..200.0,
            vx in -10.0f32..10.0,
            vy in -10.0f32..10.0,
        ) {
            let ball = MovingCircle {
                pos: Vec2::new(px, py),
                prev: Vec2::new(px - vx, py - vy),
                vel: Vec2::new(vx, vy),
                radius: 8.0,
            };
            let shapes = [
                Shape::Rect(Rect::new(80.0, 80.0, 64.0, 20.0)),
                Shape::Triangle(Triangle::new(Vec2::new(80.0, 80.0), 50.0, true)),
                Shape::Circle(Circle::new(Vec2::new(100.0, 100.0), 18.0)),
            ];
            for shape in &shapes {
                let result = ball_shape_collision(&ball, shape);
                if result.hit {
                    prop_assert!(result.normal.is_finite());
                    prop_assert!(result.normal.length() > 0.5);
                }
            }
        }
    }
}
