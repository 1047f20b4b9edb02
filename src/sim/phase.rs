//! Game lifecycle: phases, the per-variant transition table, and the scoreboard
//!
//! Only `Playing` advances the simulation. Every other phase is render-only.

use serde::{Deserialize, Serialize};

/// Current phase of a play session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title or level-select screen
    Menu,
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended in a loss (or, for Pong, a decided match)
    GameOver,
    /// Every obstacle cleared
    Win,
}

impl GamePhase {
    /// Phases that end a run and trigger the best-score comparison
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Win)
    }

    /// Whether physics and input-driven movement run in this phase
    pub fn simulates(self) -> bool {
        self == GamePhase::Playing
    }
}

/// Which game's transition table applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// menu ⇄ playing ⇄ paused, playing → gameOver | win, terminal → menu | playing
    Breakout,
    /// menu → playing → gameOver → menu | playing
    Pong,
    /// menu → playing → gameOver → playing
    Flappy,
}

/// Requests that may move the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseCommand {
    /// Start (or restart) a run
    Start,
    TogglePause,
    /// Lives exhausted, bird crashed, or a Pong match decided
    Lose,
    /// Last obstacle destroyed
    Clear,
    ReturnToMenu,
}

/// The transition table. `None` means the command is ignored in that phase.
pub fn transition(variant: Variant, from: GamePhase, cmd: PhaseCommand) -> Option<GamePhase> {
    use GamePhase::*;
    use PhaseCommand::*;

    match (variant, from, cmd) {
        (_, Menu, Start) => Some(Playing),
        (Variant::Breakout, GameOver | Win, Start) => Some(Playing),
        (Variant::Pong | Variant::Flappy, GameOver, Start) => Some(Playing),

        (Variant::Breakout, Playing, TogglePause) => Some(Paused),
        (Variant::Breakout, Paused, TogglePause) => Some(Playing),

        (_, Playing, Lose) => Some(GameOver),
        (Variant::Breakout, Playing, Clear) => Some(Win),

        (Variant::Breakout, GameOver | Win, ReturnToMenu) => Some(Menu),
        (Variant::Pong, GameOver, ReturnToMenu) => Some(Menu),

        _ => None,
    }
}

/// Holds the single current phase of a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMachine {
    variant: Variant,
    phase: GamePhase,
}

impl StateMachine {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            phase: GamePhase::Menu,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Apply a command; returns `(from, to)` when the phase changed
    pub fn apply(&mut self, cmd: PhaseCommand) -> Option<(GamePhase, GamePhase)> {
        let from = self.phase;
        match transition(self.variant, from, cmd) {
            Some(to) => {
                self.phase = to;
                log::debug!("{:?}: {:?} --{:?}--> {:?}", self.variant, from, cmd, to);
                Some((from, to))
            }
            None => {
                log::debug!("{:?}: {:?} ignored in {:?}", self.variant, cmd, from);
                None
            }
        }
    }
}

/// Score, lives and level for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub lives: u8,
    pub level: u8,
}

impl Scoreboard {
    pub fn new(lives: u8, level: u8) -> Self {
        Self {
            score: 0,
            lives,
            level,
        }
    }

    pub fn add_points(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Take one life away; returns the lives left
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }

    pub fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }
}
