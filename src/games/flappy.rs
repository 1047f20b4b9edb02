//! Flappy
//!
//! A bird under constant gravity, pipe pairs scrolling left. One input does
//! everything: start, flap, and restart after a crash.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::play_cues;
use crate::highscores::{BestScore, FLAPPY_KEY};
use crate::platform::{CueSink, ScoreStore};
use crate::settings::{FlappyTuning, Settings};
use crate::sim::physics::integrate_vertical;
use crate::sim::{
    GameEvent, GamePhase, PhaseCommand, Rect, Simulation, StateMachine, TickInput, Variant,
};

/// The player's bird, an axis-aligned square around `pos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: f32,
}

impl Bird {
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.size))
    }
}

/// A pipe pair with a vertical gap centred on `gap_y`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_y: f32,
    /// Set once the bird has passed it, so it scores exactly once
    pub scored: bool,
}

impl Pipe {
    pub fn top_rect(&self, t: &FlappyTuning) -> Rect {
        Rect::new(self.x, 0.0, t.pipe_width, self.gap_y - t.pipe_gap / 2.0)
    }

    pub fn bottom_rect(&self, t: &FlappyTuning) -> Rect {
        let top = self.gap_y + t.pipe_gap / 2.0;
        Rect::new(self.x, top, t.pipe_width, t.height - t.floor_height - top)
    }

    pub fn right(&self, t: &FlappyTuning) -> f32 {
        self.x + t.pipe_width
    }
}

/// One flight
#[derive(Debug, Clone)]
pub struct FlappySession {
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub score: u64,
    /// Seconds since the last pipe spawned
    pub spawn_timer: f32,
    rng: Pcg32,
}

impl FlappySession {
    pub fn new(t: &FlappyTuning, seed: u64) -> Self {
        Self {
            bird: Bird {
                pos: Vec2::new(t.bird_x, t.height / 2.0),
                vel_y: 0.0,
                size: t.bird_size,
            },
            pipes: Vec::new(),
            score: 0,
            spawn_timer: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    fn spawn_pipe(&mut self, t: &FlappyTuning) {
        let available = (t.height - t.floor_height - t.pipe_gap - t.gap_margin * 2.0).max(0.0);
        let gap_top = t.gap_margin + self.rng.random::<f32>() * available;
        self.pipes.push(Pipe {
            x: t.width + t.pipe_width,
            gap_y: gap_top + t.pipe_gap / 2.0,
            scored: false,
        });
    }

    /// Flap when the bird sinks below the next gap
    fn autopilot(&self, t: &FlappyTuning) -> bool {
        let left = self.bird.pos.x - self.bird.size / 2.0;
        let target = self
            .pipes
            .iter()
            .find(|p| p.right(t) > left)
            .map_or((t.height - t.floor_height) / 2.0, |p| p.gap_y);
        self.bird.pos.y > target + t.pipe_gap / 6.0 && self.bird.vel_y >= 0.0
    }

    /// One fixed step; returns true if the bird crashed
    fn step(
        &mut self,
        t: &FlappyTuning,
        input: &TickInput,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let flap = input.action || (input.idle_mode && self.autopilot(t));
        if flap {
            events.push(GameEvent::Flap);
        }
        integrate_vertical(
            &mut self.bird.pos.y,
            &mut self.bird.vel_y,
            t.gravity,
            flap.then_some(t.flap_velocity),
            dt,
        );

        let half = self.bird.size / 2.0;
        if self.bird.pos.y - half < 0.0 {
            self.bird.pos.y = half;
            self.bird.vel_y = 0.0;
        }
        let floor_y = t.height - t.floor_height;
        if self.bird.pos.y + half > floor_y {
            self.bird.pos.y = floor_y - half;
            return true;
        }

        for pipe in &mut self.pipes {
            pipe.x -= t.pipe_speed * dt;
        }
        self.pipes.retain(|p| p.right(t) > -t.cull_margin);

        self.spawn_timer += dt;
        if self.spawn_timer >= t.pipe_interval {
            self.spawn_pipe(t);
            self.spawn_timer = 0.0;
        }

        let bird = self.bird.rect();
        let mut crashed = false;
        for pipe in &mut self.pipes {
            if bird.overlaps(&pipe.top_rect(t)) || bird.overlaps(&pipe.bottom_rect(t)) {
                crashed = true;
            }
            if !pipe.scored && pipe.right(t) < self.bird.pos.x {
                pipe.scored = true;
                self.score += 1;
                events.push(GameEvent::PipePassed);
            }
        }
        crashed
    }
}

/// A Flappy game with its state machine and best score
pub struct Flappy<S: ScoreStore, C: CueSink> {
    tuning: FlappyTuning,
    machine: StateMachine,
    session: FlappySession,
    seed: u64,
    games_started: u64,
    best: BestScore,
    store: S,
    cues: C,
    events: Vec<GameEvent>,
}

impl<S: ScoreStore, C: CueSink> Flappy<S, C> {
    pub fn new(settings: &Settings, store: S, cues: C) -> Self {
        let tuning = settings.flappy.clone();
        Self {
            best: BestScore::load(&store, FLAPPY_KEY),
            machine: StateMachine::new(Variant::Flappy),
            session: FlappySession::new(&tuning, settings.seed),
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

    pub fn session(&self) -> &FlappySession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut FlappySession {
        &mut self.session
    }

    pub fn tuning(&self) -> &FlappyTuning {
        &self.tuning
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
            let score = self.session.score;
            log::info!("Flappy crashed with score {score}");
            if self.best.submit(&mut self.store, score) {
                self.emit(GameEvent::NewBest { score });
            }
        }
        true
    }

    /// Start a flight. From the game-over screen the old flight is discarded first.
    pub fn start(&mut self) -> bool {
        match self.phase() {
            GamePhase::Menu => {}
            GamePhase::GameOver => {
                self.games_started += 1;
                let seed = self.seed.wrapping_add(self.games_started);
                self.session = FlappySession::new(&self.tuning, seed);
            }
            _ => return false,
        }
        log::info!("Flappy flight started");
        self.command(PhaseCommand::Start)
    }
}

impl<S: ScoreStore, C: CueSink> Simulation for Flappy<S, C> {
    /// The input that starts a flight is spent on starting it; flapping
    /// begins on the next tick.
    fn tick(&mut self, input: &TickInput, dt: f32) {
        match self.phase() {
            GamePhase::Menu | GamePhase::GameOver => {
                if input.action || input.idle_mode {
                    self.start();
                }
                return;
            }
            GamePhase::Playing => {}
            _ => return,
        }

        let start = self.events.len();
        let crashed = self.session.step(&self.tuning, input, dt, &mut self.events);
        play_cues(&mut self.cues, &self.events[start..]);
        if crashed {
            self.command(PhaseCommand::Lose);
        }
    }

    fn phase(&self) -> GamePhase {
        self.machine.phase()
    }
}
