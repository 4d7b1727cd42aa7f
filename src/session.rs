//! Session host
//!
//! Owns one run and drives its periodic handlers from a wall clock supplied
//! by the host. Time inside the simulation is active play time: pauses are
//! cut out by shifting the start baseline forward on resume.

use serde::Serialize;

use crate::settings::Settings;
use crate::sim::state::{Direction, GameEvent, GamePhase, GameState};
use crate::sim::tick::{self, step_interval_ms};
use crate::sim::timers::{TimerKind, Timers};
use crate::sim::{EffectRequest, Snapshot, WeaponInfo};

/// Player input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Command {
    Turn(Direction),
    TogglePause,
    ToggleAutoAttack,
}

/// A single run and its timers
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    state: GameState,
    /// Armed only while playing
    timers: Option<Timers>,
    /// Wall time active play counts from
    started_at_ms: u64,
    paused_at_ms: Option<u64>,
}

impl Session {
    /// Begin a new run at `wall_ms`
    pub fn start(settings: Settings, wall_ms: u64) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(seed);
        state.auto_attack = settings.auto_attack;
        log::info!(
            "Game started (seed {}, background {})",
            seed,
            settings.background.as_str()
        );

        Self {
            settings,
            state,
            timers: Some(Timers::arm(0, step_interval_ms(1.0))),
            started_at_ms: wall_ms,
            paused_at_ms: None,
        }
    }

    /// Throw the current run away and start over with the same settings
    pub fn restart(&mut self, wall_ms: u64) {
        *self = Self::start(self.settings.clone(), wall_ms);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Active play time at `wall_ms`, excluding pauses
    pub fn active_ms(&self, wall_ms: u64) -> u64 {
        let end = self.paused_at_ms.unwrap_or(wall_ms);
        end.saturating_sub(self.started_at_ms)
    }

    /// Run every handler due by `wall_ms`, in due order. Returns how many ran.
    ///
    /// Each timer runs at most once per call. Periods missed while the host
    /// was stalled are skipped, not replayed.
    pub fn advance(&mut self, wall_ms: u64) -> usize {
        let now = self.active_ms(wall_ms);
        let Some(timers) = self.timers.as_mut() else {
            return 0;
        };

        let mut ran = 0;
        while let Some((kind, due)) = timers.next_due(now) {
            let skipped = timers.fire(kind, now);
            if skipped > 0 {
                log::debug!("{:?} timer skipped {} missed period(s)", kind, skipped);
            }
            self.state.clock_ms = due;
            match kind {
                TimerKind::Step => {
                    tick::step(&mut self.state);
                    let period = step_interval_ms(self.state.speed_multiplier);
                    if period != timers.step.period_ms {
                        log::info!(
                            "Speed x{:.1}: step every {}ms",
                            self.state.speed_multiplier,
                            period
                        );
                        timers.rearm_step(period, due, now);
                    }
                }
                TimerKind::EnemySpawn => tick::spawn_enemy(&mut self.state),
                TimerKind::BossSpawn => tick::spawn_boss(&mut self.state),
                TimerKind::Clock => tick::tick_clock(&mut self.state),
            }
            ran += 1;
            if self.state.is_over() {
                break;
            }
        }

        if self.state.is_over() {
            self.timers = None;
        } else {
            self.state.clock_ms = now;
        }
        ran
    }

    /// Apply a player command at `wall_ms`
    pub fn handle(&mut self, command: Command, wall_ms: u64) {
        match command {
            Command::Turn(dir) => {
                if self.state.phase == GamePhase::Playing {
                    self.state.snake.turn(dir);
                }
            }
            Command::TogglePause => self.toggle_pause(wall_ms),
            Command::ToggleAutoAttack => {
                self.state.auto_attack = !self.state.auto_attack;
                if self.state.auto_attack {
                    self.state.last_auto_attack_ms = None;
                }
                log::info!(
                    "Auto attack {}",
                    if self.state.auto_attack { "on" } else { "off" }
                );
            }
        }
    }

    fn toggle_pause(&mut self, wall_ms: u64) {
        match self.state.phase {
            GamePhase::Playing => {
                self.advance(wall_ms);
                if self.state.is_over() {
                    return;
                }
                self.timers = None;
                self.paused_at_ms = Some(wall_ms);
                self.state.phase = GamePhase::Paused;
                log::info!("Paused at {}ms of play", self.active_ms(wall_ms));
            }
            GamePhase::Paused => {
                if let Some(paused_at) = self.paused_at_ms.take() {
                    self.started_at_ms += wall_ms.saturating_sub(paused_at);
                }
                let now = self.active_ms(wall_ms);
                self.timers = Some(Timers::arm(
                    now,
                    step_interval_ms(self.state.speed_multiplier),
                ));
                self.state.phase = GamePhase::Playing;
                log::info!("Resumed at {}ms of play", now);
            }
            GamePhase::GameOver => {}
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::capture(&self.state, self.settings.background)
    }

    /// Take queued particle requests
    pub fn drain_effects(&mut self) -> Vec<EffectRequest> {
        std::mem::take(&mut self.state.effects)
    }

    /// Take queued game events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    /// Pause-menu weapon stats
    pub fn weapon_summary(&self) -> Vec<WeaponInfo> {
        self.state
            .weapons
            .summary(self.state.snake.len(), self.state.attack_bonus)
    }
}
