//! End-to-end runs through the public API

use glam::Vec2;

use arcade_sim::audio::RecordedCues;
use arcade_sim::consts::SIM_DT;
use arcade_sim::highscores::BREAKOUT_KEY;
use arcade_sim::platform::{MemoryStore, NullRenderer, ScoreStore, ScriptedInput};
use arcade_sim::sim::{
    EntityKind, EntityRegistry, GameEvent, GamePhase, PowerUpKind, Rect, Shape, Simulation, Spawn,
    TickInput,
};
use arcade_sim::{Breakout, Flappy, FrameScheduler, Settings, StepPolicy};

type TestBreakout = Breakout<MemoryStore, RecordedCues>;

fn settings() -> Settings {
    let mut s = Settings::default();
    s.breakout.power_up_chance = 0.0;
    s
}

fn started_breakout(store: MemoryStore) -> TestBreakout {
    let mut g = Breakout::new(&settings(), store, RecordedCues::default());
    g.tick(&TickInput::action(), SIM_DT);
    assert_eq!(g.phase(), GamePhase::Playing);
    g
}

/// Replace the level with one brick the ball can never reach
fn park_level(g: &mut TestBreakout) {
    let session = g.session_mut();
    let balls = session.registry.balls().to_vec();
    session.registry = EntityRegistry::new();
    session.registry.spawn(Spawn::Obstacle {
        shape: Shape::Rect(Rect::new(0.0, -200.0, 64.0, 20.0)),
        color_tag: 0,
    });
    for b in balls {
        session.registry.spawn(Spawn::Ball {
            pos: b.pos,
            vel: b.vel,
            radius: b.radius,
        });
    }
}

#[test]
fn test_paddle_rebound_straight_up() {
    let mut g = started_breakout(MemoryStore::new());
    park_level(&mut g);
    let session = g.session_mut();
    session.registry.remove_if(EntityKind::Ball, |_| true);
    session.registry.spawn(Spawn::Ball {
        pos: Vec2::new(240.0, 300.0),
        vel: Vec2::new(0.0, 300.0),
        radius: 8.0,
    });
    session.paddle.pos = Vec2::new(180.0, 310.0);

    g.tick(&TickInput::default(), SIM_DT);

    let ball = &g.session().registry.balls()[0];
    assert!(ball.vel.x.abs() < 1e-3);
    assert!((ball.vel.y + 300.0).abs() < 1e-3);
    assert!(ball.pos.y + ball.radius <= 310.0 + 1e-3);
    assert!(g.drain_events().contains(&GameEvent::PaddleHit));
}

#[test]
fn test_last_brick_wins() {
    let mut g = started_breakout(MemoryStore::new());
    let session = g.session_mut();
    let (_, obstacles) = session.registry.balls_and_obstacles_mut();
    for o in &mut obstacles[1..] {
        o.destroy();
    }
    assert_eq!(session.registry.alive_obstacle_count(), 1);
    session.registry.remove_if(EntityKind::Ball, |_| true);
    // Just under the first brick (32..96 x 60..80), heading up
    session.registry.spawn(Spawn::Ball {
        pos: Vec2::new(64.0, 88.0),
        vel: Vec2::new(0.0, -300.0),
        radius: 8.0,
    });

    g.tick(&TickInput::default(), SIM_DT);
    assert_eq!(g.phase(), GamePhase::Win);
    assert_eq!(g.session().board.score, 10);
    assert_eq!(g.store().get(BREAKOUT_KEY), 10);

    // Simulation stays frozen on the end screen
    let ball = g.session().registry.balls()[0].pos;
    g.tick(&TickInput::default(), SIM_DT);
    assert_eq!(g.phase(), GamePhase::Win);
    assert_eq!(g.session().registry.balls()[0].pos, ball);
}

#[test]
fn test_life_loss_and_best_score() {
    let mut store = MemoryStore::new();
    store.set(BREAKOUT_KEY, 25);
    let mut g = started_breakout(store);
    assert_eq!(g.best_score(), 25);

    g.session_mut().board.score = 20;
    g.session_mut().board.lives = 2;
    g.session_mut().registry.remove_if(EntityKind::Ball, |_| true);
    g.tick(&TickInput::default(), SIM_DT);
    assert_eq!(g.phase(), GamePhase::Playing);
    assert_eq!(g.session().board.lives, 1);
    assert_eq!(g.session().registry.balls().len(), 1);
    assert!(g.drain_events().contains(&GameEvent::LifeLost { remaining: 1 }));

    g.session_mut().registry.remove_if(EntityKind::Ball, |_| true);
    g.tick(&TickInput::default(), SIM_DT);
    assert_eq!(g.phase(), GamePhase::GameOver);
    // 20 does not beat 25
    assert_eq!(g.store().get(BREAKOUT_KEY), 25);
    assert!(!g.drain_events().iter().any(|e| matches!(e, GameEvent::NewBest { .. })));

    g.tick(
        &TickInput {
            select_level: Some(1),
            ..Default::default()
        },
        SIM_DT,
    );
    assert_eq!(g.phase(), GamePhase::Playing);
    assert_eq!(g.session().board.score, 0);
    g.session_mut().board.score = 30;
    g.session_mut().board.lives = 1;
    g.session_mut().registry.remove_if(EntityKind::Ball, |_| true);
    g.tick(&TickInput::default(), SIM_DT);
    assert_eq!(g.phase(), GamePhase::GameOver);
    assert_eq!(g.store().get(BREAKOUT_KEY), 30);
    assert_eq!(g.best_score(), 30);
    assert!(g.drain_events().contains(&GameEvent::NewBest { score: 30 }));
}

fn count(events: &[GameEvent], wanted: fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| wanted(e)).count()
}

/// Clears the balls and drops one just above the floor, left of the paddle
fn ball_over_floor(g: &mut TestBreakout) {
    park_level(g);
    let session = g.session_mut();
    session.registry.remove_if(EntityKind::Ball, |_| true);
    session.registry.spawn(Spawn::Ball {
        pos: Vec2::new(100.0, 590.0),
        vel: Vec2::new(0.0, 300.0),
        radius: 8.0,
    });
    g.drain_events();
}

#[test]
fn test_last_ball_through_floor_costs_one_life() {
    let mut g = started_breakout(MemoryStore::new());
    ball_over_floor(&mut g);

    let mut events = Vec::new();
    for _ in 0..10 {
        g.tick(&TickInput::default(), SIM_DT);
        events.extend(g.drain_events());
    }

    assert_eq!(count(&events, |e| matches!(e, GameEvent::LifeLost { .. })), 1);
    assert!(events.contains(&GameEvent::LifeLost { remaining: 2 }));
    assert_eq!(count(&events, |e| *e == GameEvent::BallLost), 1);
    assert_eq!(g.phase(), GamePhase::Playing);
    assert_eq!(g.session().board.lives, 2);
    // Re-served above the paddle
    assert_eq!(g.session().registry.balls().len(), 1);
    assert!(g.session().registry.balls()[0].pos.y < 550.0);
}

#[test]
fn test_ball_through_floor_with_another_in_play() {
    let mut g = started_breakout(MemoryStore::new());
    ball_over_floor(&mut g);
    g.session_mut().registry.spawn(Spawn::Ball {
        pos: Vec2::new(400.0, 300.0),
        vel: Vec2::new(0.0, -300.0),
        radius: 8.0,
    });

    let mut events = Vec::new();
    for _ in 0..10 {
        g.tick(&TickInput::default(), SIM_DT);
        events.extend(g.drain_events());
    }

    assert_eq!(count(&events, |e| matches!(e, GameEvent::LifeLost { .. })), 0);
    assert_eq!(count(&events, |e| *e == GameEvent::BallLost), 1);
    assert_eq!(g.session().board.lives, 3);
    let balls = g.session().registry.balls();
    assert_eq!(balls.len(), 1);
    assert_eq!(balls[0].pos.x, 400.0);
}

#[test]
fn test_wide_paddle_refresh_extends_expiry() {
    let mut g = started_breakout(MemoryStore::new());
    park_level(&mut g);
    g.session_mut().board.lives = 200;
    let none = TickInput::default();

    g.apply_power_up(PowerUpKind::WidePaddle);
    for _ in 0..60 {
        g.tick(&none, SIM_DT);
    }
    g.apply_power_up(PowerUpKind::WidePaddle);
    assert_eq!(g.session().paddle.size.x, 180.0);

    // Past the first pickup's expiry, short of the second's
    for _ in 0..570 {
        g.tick(&none, SIM_DT);
    }
    assert_eq!(g.phase(), GamePhase::Playing);
    assert_eq!(g.session().paddle.size.x, 180.0);

    for _ in 0..60 {
        g.tick(&none, SIM_DT);
    }
    assert_eq!(g.session().paddle.size.x, 120.0);
    let expired = g
        .drain_events()
        .iter()
        .filter(|e| **e == GameEvent::EffectExpired)
        .count();
    assert_eq!(expired, 1);
}

#[test]
fn test_flappy_falls_under_gravity() {
    let mut f = Flappy::new(&Settings::default(), MemoryStore::new(), RecordedCues::default());
    f.tick(&TickInput::action(), SIM_DT);
    assert_eq!(f.phase(), GamePhase::Playing);
    assert_eq!(f.session().bird.pos.y, 360.0);

    f.tick(&TickInput::default(), 0.1);
    assert!((f.session().bird.vel_y - 130.0).abs() < 1e-3);
    assert!((f.session().bird.pos.y - 373.0).abs() < 1e-3);
}

#[test]
fn test_seeded_replay_is_identical() {
    let mut s = Settings::default();
    s.seed = 42;
    s.step_policy = StepPolicy::catch_up();

    let run = |settings: &Settings| {
        let mut game = Breakout::new(settings, MemoryStore::new(), RecordedCues::default());
        let mut scheduler = FrameScheduler::from_settings(settings);
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut input = ScriptedInput::new([TickInput::action()]).with_fallback(demo);
        // Uneven frame times, including a long stall
        let mut now = 0.0;
        for i in 0..900u32 {
            now += match i % 7 {
                0 => 40.0,
                3 => 5.0,
                _ => 16.0,
            };
            if i == 450 {
                now += 500.0;
            }
            scheduler.frame(now, &mut game, &mut input, &mut NullRenderer);
        }
        let balls: Vec<Vec2> = game.session().registry.balls().iter().map(|b| b.pos).collect();
        (game.phase(), game.session().board.clone(), balls, game.cues().played.clone())
    };

    assert_eq!(run(&s), run(&s));
}
