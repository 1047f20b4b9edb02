//! Breakout
//!
//! Features:
//! - Three levels: rectangle grid, triangle pyramid, rings of circles
//! - Multi-ball, wide-paddle and slow-ball pickups (30% drop chance)
//! - Angle-by-hit-position paddle bounce, one obstacle per ball per tick
//! - Lives, score, best score on game over and win
//! - Autopilot (`idle_mode`) for demos

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{approach, play_cues};
use crate::highscores::{BREAKOUT_KEY, BestScore};
use crate::platform::{CueSink, ScoreStore};
use crate::settings::{BreakoutTuning, Settings};
use crate::sim::geometry::SQRT3_OVER_2;
use crate::sim::physics::{fell_out, first_obstacle_hit, integrate};
use crate::sim::{
    ActiveEffects, Circle, EntityId, EntityKind, EntityRef, EntityRegistry, GameEvent, GamePhase,
    Paddle, Particle, PhaseCommand, PowerUpKind, Rect, Scoreboard, Shape, Simulation, Spawn,
    StateMachine, TickInput, Triangle, Variant, Walls, paddle_bounce, reflect_off_walls,
};

/// Number of selectable levels
pub const LEVEL_COUNT: u8 = 3;

// Level 1 grid
const BRICK_ROWS: usize = 5;
const BRICK_COLS: usize = 10;
const BRICK_WIDTH: f32 = 64.0;
const BRICK_HEIGHT: f32 = 20.0;
const BRICK_PADDING: f32 = 8.0;
const BRICK_OFFSET_TOP: f32 = 60.0;
const BRICK_OFFSET_LEFT: f32 = 32.0;

// Level 2 pyramid
const TRIANGLE_ROWS: usize = 7;
const TRIANGLE_SIZE: f32 = 50.0;
/// Upright rows sit this much higher so the rows interlock
const UPRIGHT_LIFT: f32 = 15.0;

// Level 3 rings
const CIRCLE_LAYERS: usize = 5;
const CIRCLE_RADIUS: f32 = 18.0;
const RING_CENTER_DROP: f32 = 150.0;

/// Number of distinct obstacle colours
const PALETTE_SIZE: usize = 6;

/// Spawn the obstacles of `level` (1-based) into `registry`; returns how many
pub fn build_level(level: u8, field_width: f32, registry: &mut EntityRegistry) -> usize {
    let before = registry.count(EntityKind::Obstacle);
    let tag = |row: usize| (row % PALETTE_SIZE) as u8;

    match level {
        2 => {
            let height = TRIANGLE_SIZE * SQRT3_OVER_2;
            for row in 0..TRIANGLE_ROWS {
                let count = row + 1;
                let upright = row % 2 == 0;
                let start_x = field_width / 2.0 - count as f32 * TRIANGLE_SIZE / 2.0;
                let mut y = BRICK_OFFSET_TOP + row as f32 * height;
                if upright {
                    y -= UPRIGHT_LIFT;
                }
                for col in 0..count {
                    let x = start_x + col as f32 * TRIANGLE_SIZE;
                    let triangle = Triangle::new(Vec2::new(x, y), TRIANGLE_SIZE, upright);
                    registry.spawn(Spawn::Obstacle {
                        shape: Shape::Triangle(triangle),
                        color_tag: tag(row),
                    });
                }
            }
        }
        3 => {
            let center = Vec2::new(field_width / 2.0, BRICK_OFFSET_TOP + RING_CENTER_DROP);
            let spacing = CIRCLE_RADIUS * 2.5;
            for layer in 0..CIRCLE_LAYERS {
                let ring = layer as f32 * spacing;
                let count = if layer == 0 { 1 } else { layer * 6 };
                let step = std::f32::consts::TAU / count as f32;
                for i in 0..count {
                    let angle = i as f32 * step;
                    let pos = center + Vec2::new(angle.cos(), angle.sin()) * ring;
                    registry.spawn(Spawn::Obstacle {
                        shape: Shape::Circle(Circle::new(pos, CIRCLE_RADIUS)),
                        color_tag: tag(layer),
                    });
                }
            }
        }
        _ => {
            for row in 0..BRICK_ROWS {
                for col in 0..BRICK_COLS {
                    let x = BRICK_OFFSET_LEFT + col as f32 * (BRICK_WIDTH + BRICK_PADDING);
                    let y = BRICK_OFFSET_TOP + row as f32 * (BRICK_HEIGHT + BRICK_PADDING);
                    registry.spawn(Spawn::Obstacle {
                        shape: Shape::Rect(Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT)),
                        color_tag: tag(row),
                    });
                }
            }
        }
    }

    registry.count(EntityKind::Obstacle) - before
}

/// Pickup drop probability, with anything that is not a number read as never
fn drop_chance(chance: f64) -> f64 {
    if chance.is_nan() {
        0.0
    } else {
        chance.clamp(0.0, 1.0)
    }
}

/// What a simulation step asks of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepOutcome {
    Continue,
    /// Every obstacle destroyed
    Cleared,
    /// Last life lost
    OutOfLives,
}

/// Everything that belongs to one run. Rebuilt on every start, so nothing
/// (balls, pickups, pending effects) leaks into the next run.
#[derive(Debug, Clone)]
pub struct BreakoutSession {
    pub registry: EntityRegistry,
    pub paddle: Paddle,
    pub board: Scoreboard,
    pub effects: ActiveEffects,
    /// Seconds simulated since the run started
    pub clock: f64,
    rng: Pcg32,
}

impl BreakoutSession {
    pub fn new(tuning: &BreakoutTuning, level: u8, seed: u64) -> Self {
        let paddle = Paddle::new(
            Vec2::new((tuning.width - tuning.paddle_width) / 2.0, tuning.paddle_y),
            Vec2::new(tuning.paddle_width, tuning.paddle_height),
        );
        let mut session = Self {
            registry: EntityRegistry::new(),
            paddle,
            board: Scoreboard::new(tuning.lives, level),
            effects: ActiveEffects::default(),
            clock: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        };
        let obstacles = build_level(level, tuning.width, &mut session.registry);
        log::info!("Level {level} built with {obstacles} obstacles");
        session.serve(tuning);
        session
    }

    fn field(tuning: &BreakoutTuning) -> Rect {
        Rect::new(0.0, 0.0, tuning.width, tuning.height)
    }

    /// Place a fresh ball above the paddle, heading up within ±45°
    fn serve(&mut self, t: &BreakoutTuning) {
        let pos = Vec2::new(t.width / 2.0, self.paddle.pos.y - t.ball_radius - 10.0);
        let angle = self.rng.random_range(-45.0f32..=45.0).to_radians();
        self.registry.spawn(Spawn::Ball {
            pos,
            vel: Vec2::new(angle.sin(), -angle.cos()) * t.ball_speed,
            radius: t.ball_radius,
        });
    }

    /// Apply a collected pickup
    pub fn activate(&mut self, t: &BreakoutTuning, kind: PowerUpKind) {
        match kind {
            PowerUpKind::MultiBall => {
                let Some(primary) = self.registry.primary_ball() else {
                    log::debug!("Multi-ball with no ball in play, ignored");
                    return;
                };
                let pos = primary.pos;
                let speed = match primary.speed() {
                    s if s > 0.0 => s,
                    _ => t.ball_speed,
                };
                for _ in 0..2 {
                    let angle = self.rng.random_range(-45.0f32..=45.0).to_radians();
                    self.registry.spawn(Spawn::Ball {
                        pos,
                        vel: Vec2::new(angle.sin(), -angle.cos()) * speed,
                        radius: t.ball_radius,
                    });
                }
            }
            PowerUpKind::WidePaddle => {
                self.effects
                    .wide_paddle
                    .activate(self.clock, t.wide_paddle_secs);
                self.paddle.set_width(t.wide_paddle_width);
                self.paddle.clamp_x(0.0, t.width);
            }
            PowerUpKind::SlowBall => {
                for ball in self.registry.balls_mut() {
                    ball.vel *= t.slow_factor;
                }
            }
        }
        log::debug!("Power-up {kind:?} active at t={:.2}", self.clock);
    }

    fn move_paddle(&mut self, t: &BreakoutTuning, input: &TickInput, dt: f32) {
        let half = self.paddle.size.x / 2.0;
        if input.idle_mode {
            // Follow the lowest descending ball, slightly off-centre for varied angles
            let target = self
                .registry
                .balls()
                .iter()
                .filter(|b| b.vel.y > 0.0)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .or_else(|| self.registry.primary_ball())
                .map(|b| b.pos.x);
            if let Some(x) = target {
                let offset = (self.clock as f32 * 0.7).sin() * half * 0.5;
                let center = approach(self.paddle.center().x, x + offset, t.paddle_speed * dt);
                self.paddle.pos.x = center - half;
            }
        } else if let Some(p) = input.pointer {
            self.paddle.pos.x = p.x - half;
        } else {
            let dir = input.right as i8 - input.left as i8;
            self.paddle.pos.x += f32::from(dir) * t.paddle_speed * dt;
        }
        self.paddle.clamp_x(0.0, t.width);
    }

    fn update_particles(&mut self, t: &BreakoutTuning, dt: f32) {
        for p in self.registry.particles_mut() {
            p.pos += p.vel * dt;
            p.vel.y += t.particle_gravity * dt;
            p.life -= dt;
        }
        self.registry
            .remove_if(EntityKind::Particle, |e| !e.is_alive());
    }

    fn update_power_ups(&mut self, t: &BreakoutTuning, dt: f32, events: &mut Vec<GameEvent>) {
        for p in self.registry.power_ups_mut() {
            p.pos.y += p.vel_y * dt;
        }

        let paddle = self.paddle.rect();
        let mut collected = Vec::new();
        let mut missed = 0;
        self.registry.remove_if(EntityKind::PowerUp, |e| {
            let EntityRef::PowerUp(p) = e else {
                return false;
            };
            if p.rect().overlaps(&paddle) {
                collected.push(p.kind);
                true
            } else if p.pos.y > t.height {
                missed += 1;
                true
            } else {
                false
            }
        });

        for kind in collected {
            self.activate(t, kind);
            events.push(GameEvent::PowerUpCollected { kind });
        }
        events.extend(std::iter::repeat_n(GameEvent::PowerUpExpired, missed));
    }

    /// Move every ball, resolve walls, paddle and obstacles. Returns the
    /// obstacles destroyed this tick as `(id, centre, colour)`.
    fn update_balls(
        &mut self,
        t: &BreakoutTuning,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> Vec<(EntityId, Vec2, u8)> {
        let field = Self::field(t);
        let paddle = self.paddle.rect();
        let max_angle = t.max_bounce_deg.to_radians();
        let mut destroyed = Vec::new();

        let (balls, obstacles) = self.registry.balls_and_obstacles_mut();
        for ball in balls.iter_mut() {
            integrate(ball, dt);
            if !ball.is_finite() {
                continue;
            }
            if reflect_off_walls(ball, &field, Walls::BREAKOUT) {
                events.push(GameEvent::WallBounce);
            }
            if fell_out(ball, &field) {
                continue;
            }
            if paddle_bounce(ball, &paddle, max_angle) {
                events.push(GameEvent::PaddleHit);
            }
            if let Some((index, hit)) = first_obstacle_hit(ball, obstacles) {
                let obstacle = &mut obstacles[index];
                obstacle.destroy();
                ball.vel = hit.side.reflect(ball.vel);
                destroyed.push((obstacle.id, obstacle.shape().center(), obstacle.color_tag));
            }
        }

        let broken = self.registry.remove_if(EntityKind::Ball, |e| match e {
            EntityRef::Ball(b) => !b.is_finite(),
            _ => false,
        });
        if broken > 0 {
            log::warn!("Dropped {broken} ball(s) with non-finite state");
        }
        let lost = self.registry.remove_if(EntityKind::Ball, |e| match e {
            EntityRef::Ball(b) => fell_out(b, &field),
            _ => false,
        });
        events.extend(std::iter::repeat_n(GameEvent::BallLost, lost));

        destroyed
    }

    fn on_destroyed(
        &mut self,
        t: &BreakoutTuning,
        (id, center, color_tag): (EntityId, Vec2, u8),
        events: &mut Vec<GameEvent>,
    ) {
        self.board.add_points(t.points_per_obstacle);
        events.push(GameEvent::ObstacleDestroyed {
            id,
            points: t.points_per_obstacle,
        });

        for _ in 0..t.particles_per_hit {
            let vel = Vec2::new(
                self.rng.random_range(-1.0f32..=1.0),
                self.rng.random_range(-1.0f32..=1.0),
            ) * t.particle_speed;
            let size = self.rng.random_range(2.0f32..6.0);
            self.registry.spawn(Spawn::Particle(Particle {
                pos: center,
                vel,
                life: t.particle_life,
                max_life: t.particle_life,
                size,
                color_tag,
            }));
        }

        if self.rng.random_bool(drop_chance(t.power_up_chance)) {
            let kind = PowerUpKind::ALL[self.rng.random_range(0..PowerUpKind::ALL.len())];
            self.registry.spawn(Spawn::PowerUp {
                kind,
                pos: center,
                vel_y: t.power_up_fall_speed,
                size: t.power_up_size,
            });
            events.push(GameEvent::PowerUpSpawned { kind });
        }
    }

    /// One fixed step of play
    fn step(
        &mut self,
        t: &BreakoutTuning,
        input: &TickInput,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> StepOutcome {
        self.clock += f64::from(dt);

        self.move_paddle(t, input, dt);
        if self.effects.wide_paddle.expire_if_due(self.clock) {
            self.paddle.set_width(self.paddle.base_width);
            self.paddle.clamp_x(0.0, t.width);
            events.push(GameEvent::EffectExpired);
        }

        self.update_particles(t, dt);
        self.update_power_ups(t, dt, events);

        for destroyed in self.update_balls(t, dt, events) {
            self.on_destroyed(t, destroyed, events);
        }

        if self.registry.alive_obstacle_count() == 0 {
            return StepOutcome::Cleared;
        }
        if self.registry.balls().is_empty() {
            let remaining = self.board.lose_life();
            events.push(GameEvent::LifeLost { remaining });
            if remaining == 0 {
                return StepOutcome::OutOfLives;
            }
            self.serve(t);
        }
        StepOutcome::Continue
    }
}

/// A Breakout game: state machine, current run and best score
pub struct Breakout<S: ScoreStore, C: CueSink> {
    tuning: BreakoutTuning,
    machine: StateMachine,
    session: BreakoutSession,
    selected_level: u8,
    seed: u64,
    games_started: u64,
    best: BestScore,
    store: S,
    cues: C,
    events: Vec<GameEvent>,
}

impl<S: ScoreStore, C: CueSink> Breakout<S, C> {
    pub fn new(settings: &Settings, store: S, cues: C) -> Self {
        let tuning = settings.breakout.clone();
        let session = BreakoutSession::new(&tuning, 1, settings.seed);
        Self {
            best: BestScore::load(&store, BREAKOUT_KEY),
            machine: StateMachine::new(Variant::Breakout),
            session,
            selected_level: 1,
            seed: settings.seed,
            games_started: 0,
            tuning,
            store,
            cues,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn session(&self) -> &BreakoutSession {
        &self.session
    }

    /// Mutable access to the run, for scripted setups
    pub fn session_mut(&mut self) -> &mut BreakoutSession {
        &mut self.session
    }

    pub fn tuning(&self) -> &BreakoutTuning {
        &self.tuning
    }

    pub fn selected_level(&self) -> u8 {
        self.selected_level
    }

    pub fn best_score(&self) -> u64 {
        self.best.value()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start a fresh run on `level` (clamped to 1..=3). Only valid from the
    /// menu and the end screens; returns false otherwise.
    pub fn start_level(&mut self, level: u8) -> bool {
        let phase = self.phase();
        if crate::sim::phase::transition(Variant::Breakout, phase, PhaseCommand::Start).is_none() {
            return false;
        }
        self.selected_level = level.clamp(1, LEVEL_COUNT);
        self.games_started += 1;
        let seed = self.seed.wrapping_add(self.games_started);
        self.session = BreakoutSession::new(&self.tuning, self.selected_level, seed);
        log::info!("Breakout run {} started on level {}", self.games_started, self.selected_level);
        self.command(PhaseCommand::Start)
    }

    /// Apply a pickup to the current run as if it had been collected
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        self.session.activate(&self.tuning, kind);
        self.emit(GameEvent::PowerUpCollected { kind });
    }

    fn emit(&mut self, event: GameEvent) {
        play_cues(&mut self.cues, std::slice::from_ref(&event));
        self.events.push(event);
    }

    fn command(&mut self, cmd: PhaseCommand) -> bool {
        let Some((from, to)) = self.machine.apply(cmd) else {
            return false;
        };
        self.emit(GameEvent::PhaseChanged { from, to });
        if to.is_terminal() {
            let score = self.session.board.score;
            log::info!("Breakout {to:?} with score {score}");
            if self.best.submit(&mut self.store, score) {
                self.emit(GameEvent::NewBest { score });
            }
        }
        true
    }

    fn handle_commands(&mut self, input: &TickInput) {
        match self.phase() {
            GamePhase::Menu => {
                if let Some(level) = input.select_level {
                    self.start_level(level);
                } else if input.action || input.idle_mode {
                    self.start_level(self.selected_level);
                }
            }
            GamePhase::Playing | GamePhase::Paused => {
                if input.pause {
                    self.command(PhaseCommand::TogglePause);
                }
            }
            GamePhase::GameOver | GamePhase::Win => {
                if let Some(level) = input.select_level {
                    self.start_level(level);
                } else if input.action || input.back_to_menu {
                    self.command(PhaseCommand::ReturnToMenu);
                } else if input.idle_mode {
                    self.start_level(self.selected_level);
                }
            }
        }
    }
}

impl<S: ScoreStore, C: CueSink> Simulation for Breakout<S, C> {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        self.handle_commands(input);
        if !self.phase().simulates() {
            return;
        }

        let start = self.events.len();
        let outcome = self.session.step(&self.tuning, input, dt, &mut self.events);
        play_cues(&mut self.cues, &self.events[start..]);

        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::Cleared => {
                self.command(PhaseCommand::Clear);
            }
            StepOutcome::OutOfLives => {
                self.command(PhaseCommand::Lose);
            }
        }
    }

    fn phase(&self) -> GamePhase {
        self.machine.phase()
    }
}
