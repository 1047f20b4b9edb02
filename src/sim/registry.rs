//! Entity registry: owns every ball, obstacle, pickup and particle of one session
//!
//! Collections are kept in spawn order, which is also ID order, so iteration
//! is deterministic.

use glam::Vec2;

use super::geometry::Shape;
use super::state::{Ball, EntityId, Obstacle, Particle, PowerUp, PowerUpKind};

/// Which collection an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Ball,
    Obstacle,
    PowerUp,
    Particle,
}

/// Spawn parameters, one variant per entity kind
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Ball {
        pos: Vec2,
        vel: Vec2,
        radius: f32,
    },
    Obstacle {
        shape: Shape,
        color_tag: u8,
    },
    PowerUp {
        kind: PowerUpKind,
        pos: Vec2,
        vel_y: f32,
        size: Vec2,
    },
    Particle(Particle),
}

/// Borrowed view of one entity
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Ball(&'a Ball),
    Obstacle(&'a Obstacle),
    PowerUp(&'a PowerUp),
    Particle(&'a Particle),
}

impl EntityRef<'_> {
    /// Destroyed obstacles and spent particles are not alive; balls and
    /// pickups are alive for as long as they are in the registry
    pub fn is_alive(&self) -> bool {
        match self {
            EntityRef::Ball(_) | EntityRef::PowerUp(_) => true,
            EntityRef::Obstacle(o) => o.is_alive(),
            EntityRef::Particle(p) => p.life > 0.0,
        }
    }

    pub fn position(&self) -> Vec2 {
        match self {
            EntityRef::Ball(b) => b.pos,
            EntityRef::Obstacle(o) => o.shape().center(),
            EntityRef::PowerUp(p) => p.pos,
            EntityRef::Particle(p) => p.pos,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    balls: Vec<Ball>,
    obstacles: Vec<Obstacle>,
    power_ups: Vec<PowerUp>,
    particles: Vec<Particle>,
    next_id: EntityId,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        id
    }

    /// Add an entity; particles are anonymous and get ID 0
    pub fn spawn(&mut self, spawn: Spawn) -> EntityId {
        match spawn {
            Spawn::Ball { pos, vel, radius } => {
                let id = self.next_entity_id();
                self.balls.push(Ball::new(id, pos, vel, radius));
                id
            }
            Spawn::Obstacle { shape, color_tag } => {
                let id = self.next_entity_id();
                self.obstacles.push(Obstacle::new(id, shape, color_tag));
                id
            }
            Spawn::PowerUp {
                kind,
                pos,
                vel_y,
                size,
            } => {
                let id = self.next_entity_id();
                self.power_ups.push(PowerUp {
                    id,
                    kind,
                    pos,
                    vel_y,
                    size,
                });
                id
            }
            Spawn::Particle(p) => {
                self.particles.push(p);
                0
            }
        }
    }

    /// Visit every live entity of `kind` in spawn order
    pub fn for_each_alive<F>(&self, kind: EntityKind, mut f: F)
    where
        F: FnMut(EntityRef<'_>),
    {
        let mut visit = |e: EntityRef<'_>| {
            if e.is_alive() {
                f(e);
            }
        };
        match kind {
            EntityKind::Ball => self.balls.iter().for_each(|b| visit(EntityRef::Ball(b))),
            EntityKind::Obstacle => self
                .obstacles
                .iter()
                .for_each(|o| visit(EntityRef::Obstacle(o))),
            EntityKind::PowerUp => self
                .power_ups
                .iter()
                .for_each(|p| visit(EntityRef::PowerUp(p))),
            EntityKind::Particle => self
                .particles
                .iter()
                .for_each(|p| visit(EntityRef::Particle(p))),
        }
    }

    /// Remove every entity of `kind` matching `pred`; returns how many were removed
    pub fn remove_if<F>(&mut self, kind: EntityKind, mut pred: F) -> usize
    where
        F: FnMut(EntityRef<'_>) -> bool,
    {
        fn retain_counting<T>(v: &mut Vec<T>, mut remove: impl FnMut(&T) -> bool) -> usize {
            let before = v.len();
            v.retain(|item| !remove(item));
            before - v.len()
        }

        match kind {
            EntityKind::Ball => retain_counting(&mut self.balls, |b| pred(EntityRef::Ball(b))),
            EntityKind::Obstacle => {
                retain_counting(&mut self.obstacles, |o| pred(EntityRef::Obstacle(o)))
            }
            EntityKind::PowerUp => {
                retain_counting(&mut self.power_ups, |p| pred(EntityRef::PowerUp(p)))
            }
            EntityKind::Particle => {
                retain_counting(&mut self.particles, |p| pred(EntityRef::Particle(p)))
            }
        }
    }

    /// Drop every collection; IDs keep increasing
    pub fn reset(&mut self) {
        self.balls.clear();
        self.obstacles.clear();
        self.power_ups.clear();
        self.particles.clear();
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn balls_mut(&mut self) -> &mut [Ball] {
        &mut self.balls
    }

    /// First ball in spawn order
    pub fn primary_ball(&self) -> Option<&Ball> {
        self.balls.first()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn power_ups(&self) -> &[PowerUp] {
        &self.power_ups
    }

    pub fn power_ups_mut(&mut self) -> &mut [PowerUp] {
        &mut self.power_ups
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Balls and obstacles borrowed together for the collision pass
    pub fn balls_and_obstacles_mut(&mut self) -> (&mut [Ball], &mut [Obstacle]) {
        (&mut self.balls, &mut self.obstacles)
    }

    pub fn alive_obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|o| o.is_alive()).count()
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Ball => self.balls.len(),
            EntityKind::Obstacle => self.obstacles.len(),
            EntityKind::PowerUp => self.power_ups.len(),
            EntityKind::Particle => self.particles.len(),
        }
    }
}
