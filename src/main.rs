//! Snake Siege headless runner
//!
//! Plays one run with a simple autopilot and prints a JSON report.
//!
//! Usage: `snake-siege [seed] [settings.json]`

use std::collections::BTreeMap;

use serde::Serialize;

use snake_siege::sim::{Direction, GameEvent, Snake, WeaponInfo};
use snake_siege::{Command, Session, Settings};

/// Host frame length (ms)
const FRAME_MS: u64 = 50;
/// Longest run the autopilot plays (ms of wall time)
const MAX_RUN_MS: u64 = 180_000;

#[derive(Debug, Serialize)]
struct Report {
    seed: Option<u64>,
    score: u64,
    elapsed_seconds: u64,
    segments: usize,
    game_over: bool,
    weapons: Vec<WeaponInfo>,
    events: BTreeMap<&'static str, usize>,
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::FoodEaten { .. } => "food_eaten",
        GameEvent::FoodExpired { .. } => "food_expired",
        GameEvent::EnemyKilled { .. } => "enemy_killed",
        GameEvent::EnemyPromoted { .. } => "enemy_promoted",
        GameEvent::SnakeHit { .. } => "snake_hit",
        GameEvent::WeaponUnlocked { .. } => "weapon_unlocked",
        GameEvent::BossAppeared { .. } => "boss_appeared",
        GameEvent::GameOver { .. } => "game_over",
    }
}

/// Pick a heading whose next cell is safe, preferring the current one
fn autopilot(snake: &Snake) -> Option<Direction> {
    let head = snake.head()?;
    let current = snake.direction;
    [
        current,
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ]
    .into_iter()
    .filter(|&dir| dir != current.opposite())
    .find(|&dir| !snake.is_fatal(head + dir.delta()))
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|arg| match arg.parse::<u64>() {
        Ok(seed) => Some(seed),
        Err(e) => {
            log::warn!("Ignoring seed {:?}: {}", arg, e);
            None
        }
    });
    let mut settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    if seed.is_some() {
        settings.seed = seed;
    }

    log::info!("Snake Siege (headless) starting...");
    let mut session = Session::start(settings, 0);
    let mut events = BTreeMap::new();

    let mut wall_ms = 0;
    while wall_ms < MAX_RUN_MS && !session.is_over() {
        if let Some(dir) = autopilot(&session.state().snake) {
            session.handle(Command::Turn(dir), wall_ms);
        }
        wall_ms += FRAME_MS;
        session.advance(wall_ms);

        session.drain_effects();
        for event in session.drain_events() {
            log::debug!("{:?}", event);
            *events.entry(event_name(&event)).or_insert(0) += 1;
        }
    }

    let status = session.snapshot().status;
    let report = Report {
        seed: session.settings().seed,
        score: status.score,
        elapsed_seconds: status.elapsed_seconds,
        segments: status.segment_count,
        game_over: session.is_over(),
        weapons: session.weapon_summary(),
        events,
    };
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to encode report: {}", e),
    }
}
