//! Pong
//!
//! Two vertical paddles, open goals, first to `winning_score`. The right
//! paddle is either a simple tracking AI or a second player.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{approach, play_cues};
use crate::highscores::{BestScore, PONG_KEY};
use crate::platform::{CueSink, ScoreStore};
use crate::settings::{PongTuning, Settings};
use crate::sim::{
    Ball, GameEvent, GamePhase, Paddle, PhaseCommand, Rect, Simulation, StateMachine, TickInput,
    Variant, Walls, circle_rect_hit, integrate, reflect_off_walls,
};

/// Who controls the right paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PongMode {
    #[default]
    VersusAi,
    /// Right paddle on `alt_up` / `alt_down`
    TwoPlayer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    Left,
    Right,
}

/// One match
#[derive(Debug, Clone)]
pub struct PongSession {
    pub left: Paddle,
    pub right: Paddle,
    pub ball: Ball,
    pub left_score: u32,
    pub right_score: u32,
    rng: Pcg32,
}

impl PongSession {
    pub fn new(t: &PongTuning, seed: u64) -> Self {
        let y = (t.height - t.paddle_height) / 2.0;
        let size = Vec2::new(t.paddle_width, t.paddle_height);
        let mut session = Self {
            left: Paddle::new(Vec2::new(0.0, y), size),
            right: Paddle::new(Vec2::new(t.width - t.paddle_width, y), size),
            ball: Ball::new(1, Vec2::new(t.width, t.height) / 2.0, Vec2::ZERO, t.ball_radius),
            left_score: 0,
            right_score: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        let dir = if session.rng.random_bool(0.5) { 1.0 } else { -1.0 };
        session.serve(t, dir);
        session
    }

    /// Centre the ball and send it toward `dir` (+1 right, -1 left) at a slight angle
    fn serve(&mut self, t: &PongTuning, dir: f32) {
        let slope = self.rng.random_range(-0.3f32..0.3);
        self.ball = Ball::new(
            self.ball.id,
            Vec2::new(t.width, t.height) / 2.0,
            Vec2::new(t.ball_speed * dir, t.ball_speed * slope),
            t.ball_radius,
        );
    }

    pub fn winner(&self, t: &PongTuning) -> Option<Player> {
        if self.left_score >= t.winning_score {
            Some(Player::Left)
        } else if self.right_score >= t.winning_score {
            Some(Player::Right)
        } else {
            None
        }
    }

    /// Tracking AI: chase the ball's y outside a small dead zone
    fn follow_ball(paddle: &mut Paddle, ball_y: f32, t: &PongTuning, dt: f32) {
        let center = paddle.center().y;
        if (center - ball_y).abs() > t.ai_dead_zone {
            let step = t.paddle_speed * t.ai_speed_factor * dt;
            paddle.pos.y += approach(center, ball_y, step) - center;
        }
    }

    fn move_paddles(&mut self, t: &PongTuning, mode: PongMode, input: &TickInput, dt: f32) {
        let step = t.paddle_speed * dt;
        if input.idle_mode {
            Self::follow_ball(&mut self.left, self.ball.pos.y, t, dt);
        } else if let Some(p) = input.pointer {
            self.left.pos.y = p.y - self.left.size.y / 2.0;
        } else {
            let dir = input.down as i8 - input.up as i8;
            self.left.pos.y += f32::from(dir) * step;
        }

        match mode {
            PongMode::VersusAi => Self::follow_ball(&mut self.right, self.ball.pos.y, t, dt),
            PongMode::TwoPlayer => {
                let dir = input.alt_down as i8 - input.alt_up as i8;
                self.right.pos.y += f32::from(dir) * step;
            }
        }

        self.left.clamp_y(0.0, t.height);
        self.right.clamp_y(0.0, t.height);
    }

    /// Send the ball back with a speed-up and a hit-position slope
    fn return_ball(&mut self, t: &PongTuning, paddle: Rect) {
        let half = paddle.size.y / 2.0;
        let hit = ((self.ball.pos.y - paddle.center().y) / half).clamp(-1.0, 1.0);
        let spread = t.spin_jitter.abs();
        let jitter = if spread.is_finite() && spread > 0.0 {
            self.rng.random_range(-spread..=spread)
        } else {
            0.0
        };
        self.ball.vel.x = -self.ball.vel.x * t.speed_up;
        self.ball.vel.y = t.ball_speed * hit + jitter;
    }

    /// One fixed step; returns true when the match is decided
    fn step(
        &mut self,
        t: &PongTuning,
        mode: PongMode,
        input: &TickInput,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        self.move_paddles(t, mode, input, dt);

        integrate(&mut self.ball, dt);
        let field = Rect::new(0.0, 0.0, t.width, t.height);
        if reflect_off_walls(&mut self.ball, &field, Walls::PONG) {
            events.push(GameEvent::WallBounce);
        }

        let (left, right) = (self.left.rect(), self.right.rect());
        let (pos, radius) = (self.ball.pos, self.ball.radius);
        if self.ball.vel.x < 0.0 && circle_rect_hit(pos, radius, &left) {
            self.return_ball(t, left);
            events.push(GameEvent::PaddleHit);
        } else if self.ball.vel.x > 0.0 && circle_rect_hit(pos, radius, &right) {
            self.return_ball(t, right);
            events.push(GameEvent::PaddleHit);
        }

        let scorer = if self.ball.pos.x < 0.0 {
            self.right_score += 1;
            Some(Player::Right)
        } else if self.ball.pos.x > t.width {
            self.left_score += 1;
            Some(Player::Left)
        } else {
            None
        };
        let Some(scorer) = scorer else {
            return false;
        };

        events.push(GameEvent::PointScored {
            left: scorer == Player::Left,
        });
        if self.winner(t).is_some() {
            self.ball.vel = Vec2::ZERO;
            self.ball.pos = Vec2::new(t.width, t.height) / 2.0;
            return true;
        }
        // Serve toward the player who just scored
        let dir = match scorer {
            Player::Right => 1.0,
            Player::Left => -1.0,
        };
        self.serve(t, dir);
        false
    }
}

/// A Pong match with its state machine and best score (left player's points)
pub struct Pong<S: ScoreStore, C: CueSink> {
    tuning: PongTuning,
    mode: PongMode,
    machine: StateMachine,
    session: PongSession,
    seed: u64,
    games_started: u64,
    best: BestScore,
    store: S,
    cues: C,
    events: Vec<GameEvent>,
}

impl<S: ScoreStore, C: CueSink> Pong<S, C> {
    pub fn new(settings: &Settings, mode: PongMode, store: S, cues: C) -> Self {
        let tuning = settings.pong.clone();
        Self {
            best: BestScore::load(&store, PONG_KEY),
            machine: StateMachine::new(Variant::Pong),
            session: PongSession::new(&tuning, settings.seed),
            seed: settings.seed,
            games_started: 0,
            tuning,
            mode,
            store,
            cues,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.phase()
    }

    pub fn mode(&self) -> PongMode {
        self.mode
    }

    pub fn session(&self) -> &PongSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut PongSession {
        &mut self.session
    }

    pub fn tuning(&self) -> &PongTuning {
        &self.tuning
    }

    pub fn winner(&self) -> Option<Player> {
        self.session.winner(&self.tuning)
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

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
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
            let score = u64::from(self.session.left_score);
            log::info!(
                "Pong match over {}-{}",
                self.session.left_score,
                self.session.right_score
            );
            if self.best.submit(&mut self.store, score) {
                self.emit(GameEvent::NewBest { score });
            }
        }
        true
    }

    /// Start a new match from the menu or the game-over screen
    pub fn start(&mut self) -> bool {
        let next = crate::sim::phase::transition(Variant::Pong, self.phase(), PhaseCommand::Start);
        if next.is_none() {
            return false;
        }
        self.games_started += 1;
        self.session = PongSession::new(&self.tuning, self.seed.wrapping_add(self.games_started));
        log::info!("Pong match {} started ({:?})", self.games_started, self.mode);
        self.command(PhaseCommand::Start)
    }
}

impl<S: ScoreStore, C: CueSink> Simulation for Pong<S, C> {
    fn tick(&mut self, input: &TickInput, dt: f32) {
        match self.phase() {
            GamePhase::Menu => {
                if input.action || input.idle_mode {
                    self.start();
                }
            }
            GamePhase::GameOver => {
                if input.back_to_menu {
                    self.command(PhaseCommand::ReturnToMenu);
                } else if input.action || input.idle_mode {
                    self.start();
                }
            }
            _ => {}
        }
        if !self.phase().simulates() {
            return;
        }

        let start = self.events.len();
        let decided = self
            .session
            .step(&self.tuning, self.mode, input, dt, &mut self.events);
        play_cues(&mut self.cues, &self.events[start..]);
        if decided {
            self.command(PhaseCommand::Lose);
        }
    }

    fn phase(&self) -> GamePhase {
        self.machine.phase()
    }
}
