//! Read-only views for renderers and UI

use serde::Serialize;

use super::bullet::Bullet;
use super::effects::EffectRequest;
use super::enemy::Enemy;
use super::state::{FloatingText, Food, GamePhase, GameState, Snake};
use crate::consts::LEVEL_DURATION_SECS;
use crate::settings::Background;

/// Numbers shown on the status panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusPanel {
    pub segment_count: usize,
    pub speed_multiplier: f32,
    /// `ceil(speed_multiplier)` plus the food bonus
    pub attack_power: f32,
    pub score: u64,
    pub elapsed_seconds: u64,
    pub level: u64,
}

impl StatusPanel {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            segment_count: state.snake.len(),
            speed_multiplier: state.speed_multiplier,
            attack_power: state.speed_multiplier.ceil() + state.attack_bonus,
            score: state.score,
            elapsed_seconds: state.elapsed_secs,
            level: state.elapsed_secs / LEVEL_DURATION_SECS + 1,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub background: Background,
    /// Active-clock time, for food blinking
    pub clock_ms: u64,
    pub snake: &'a Snake,
    pub food: &'a [Food],
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub floating_texts: &'a [FloatingText],
    /// Particle requests not yet drained
    pub effects: &'a [EffectRequest],
    pub status: StatusPanel,
}

impl<'a> Snapshot<'a> {
    pub fn capture(state: &'a GameState, background: Background) -> Self {
        Self {
            phase: state.phase,
            background,
            clock_ms: state.clock_ms,
            snake: &state.snake,
            food: &state.food,
            bullets: &state.bullets,
            enemies: &state.enemies,
            floating_texts: &state.floating_texts,
            effects: &state.effects,
            status: StatusPanel::from_state(state),
        }
    }
}
