//! Obstacle shapes and the planar geometry the collision tests are built on
//!
//! Screen coordinates: x grows to the right, y grows downward. A rectangle is
//! stored by its top-left corner and size; a triangle by the top-left corner
//! of its bounding box, its side length and an orientation flag.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Height of an equilateral triangle with unit side
pub const SQRT3_OVER_2: f32 = 0.866_025_4;

/// Face of an obstacle struck by a ball, used to pick the reflection axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// True for faces whose hit inverts the vertical velocity component
    #[inline]
    pub fn is_horizontal_face(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }

    /// Unit normal pointing out of the struck face
    pub fn outward_normal(self) -> Vec2 {
        match self {
            Side::Top => Vec2::NEG_Y,
            Side::Bottom => Vec2::Y,
            Side::Left => Vec2::NEG_X,
            Side::Right => Vec2::X,
        }
    }

    /// Axis-aligned inversion: top/bottom flip vy, left/right flip vx.
    ///
    /// Slanted triangle faces reflect the same way, not about their normal.
    #[inline]
    pub fn reflect(self, vel: Vec2) -> Vec2 {
        if self.is_horizontal_face() {
            Vec2::new(vel.x, -vel.y)
        } else {
            Vec2::new(-vel.x, vel.y)
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Closest point of the rectangle (boundary or interior) to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        // max/min instead of Vec2::clamp: no panic on inverted extents
        Vec2::new(
            p.x.min(self.right()).max(self.left()),
            p.y.min(self.bottom()).max(self.top()),
        )
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }

    /// Strict overlap test (touching edges do not overlap)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.right() > other.left()
            && self.left() < other.right()
            && self.bottom() > other.top()
            && self.top() < other.bottom()
    }
}

/// A triangle edge tagged with the face it represents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub a: Vec2,
    pub b: Vec2,
    pub side: Side,
}

impl Edge {
    /// Direction angle of the edge in radians
    pub fn angle(&self) -> f32 {
        let d = self.b - self.a;
        d.y.atan2(d.x)
    }

    pub fn distance_to(&self, p: Vec2) -> f32 {
        point_segment_distance(p, self.a, self.b)
    }
}

/// Equilateral-ish triangle brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    /// Top-left corner of the bounding box
    pub anchor: Vec2,
    /// Side length (also the bounding-box width)
    pub size: f32,
    /// Apex on top when true, apex at the bottom when false
    pub upright: bool,
}

impl Triangle {
    pub fn new(anchor: Vec2, size: f32, upright: bool) -> Self {
        Self {
            anchor,
            size,
            upright,
        }
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size * SQRT3_OVER_2
    }

    /// Vertices in drawing order.
    ///
    /// Upright: apex, bottom-left, bottom-right.
    /// Inverted: top-left, bottom apex, top-right.
    pub fn vertices(&self) -> [Vec2; 3] {
        let Vec2 { x, y } = self.anchor;
        let s = self.size;
        let h = self.height();
        if self.upright {
            [
                Vec2::new(x + s / 2.0, y),
                Vec2::new(x, y + h),
                Vec2::new(x + s, y + h),
            ]
        } else {
            [
                Vec2::new(x, y),
                Vec2::new(x + s / 2.0, y + h),
                Vec2::new(x + s, y),
            ]
        }
    }

    /// The three edges, each tagged by the vertical direction it faces.
    ///
    /// Slanted faces of an upright triangle point up and are tagged `Top`;
    /// those of an inverted one point down and are tagged `Bottom`, so a
    /// glancing hit on a slant flips vy.
    pub fn edges(&self) -> [Edge; 3] {
        let [v1, v2, v3] = self.vertices();
        if self.upright {
            [
                Edge { a: v1, b: v2, side: Side::Top },
                Edge { a: v2, b: v3, side: Side::Bottom },
                Edge { a: v3, b: v1, side: Side::Top },
            ]
        } else {
            [
                Edge { a: v1, b: v2, side: Side::Bottom },
                Edge { a: v2, b: v3, side: Side::Bottom },
                Edge { a: v3, b: v1, side: Side::Top },
            ]
        }
    }

    /// Sign-based point-in-triangle test (boundary counts as inside)
    pub fn contains_point(&self, p: Vec2) -> bool {
        let [v1, v2, v3] = self.vertices();
        let d1 = edge_sign(p, v1, v2);
        let d2 = edge_sign(p, v2, v3);
        let d3 = edge_sign(p, v3, v1);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    pub fn centroid(&self) -> Vec2 {
        let [v1, v2, v3] = self.vertices();
        (v1 + v2 + v3) / 3.0
    }
}

#[inline]
fn edge_sign(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
}

/// Circle obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Obstacle geometry, dispatched through [`crate::sim::collision::ball_shape_collision`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Triangle(Triangle),
    Circle(Circle),
}

impl Shape {
    /// Representative point (used as the spawn point for drops and particles)
    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Rect(r) => r.center(),
            Shape::Triangle(t) => t.centroid(),
            Shape::Circle(c) => c.center,
        }
    }

    /// Axis-aligned bounding box
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) => *r,
            Shape::Triangle(t) => Rect {
                min: t.anchor,
                size: Vec2::new(t.size, t.height()),
            },
            Shape::Circle(c) => Rect::from_center(c.center, Vec2::splat(c.radius * 2.0)),
        }
    }
}

/// Distance from `p` to the segment `a`-`b`; a zero-length segment is treated as the point `a`
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
