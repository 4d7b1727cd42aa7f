//! Periodic triggers on the active play clock
//!
//! The session owns a `Timers` set while a run is playing and drops it on
//! pause or game over. Timers only know when they are due; the session
//! decides what to run. A timer that falls behind fires once and skips the
//! periods it missed, so a host stall never replays a backlog.

use serde::Serialize;

use crate::consts::*;

/// The four periodic handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum TimerKind {
    /// Game step; period follows the speed multiplier
    Step,
    EnemySpawn,
    BossSpawn,
    /// One-second status clock
    Clock,
}

/// A repeating deadline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub period_ms: u64,
    pub next_due_ms: u64,
}

impl Interval {
    /// First fire one full period after `now_ms`
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: now_ms + period_ms.max(1),
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        self.next_due_ms <= now_ms
    }

    /// Move past a fire. Returns how many whole periods were skipped to land
    /// after `now_ms`.
    fn advance(&mut self, now_ms: u64) -> u64 {
        self.next_due_ms += self.period_ms;
        self.skip_missed(now_ms)
    }

    fn skip_missed(&mut self, now_ms: u64) -> u64 {
        if self.next_due_ms > now_ms {
            return 0;
        }
        let missed = (now_ms - self.next_due_ms) / self.period_ms + 1;
        self.next_due_ms += missed * self.period_ms;
        missed
    }
}

/// The armed timer set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timers {
    pub step: Interval,
    pub enemy_spawn: Interval,
    pub boss_spawn: Interval,
    pub clock: Interval,
}

impl Timers {
    /// Arm every timer from `now_ms`
    pub fn arm(now_ms: u64, step_ms: u64) -> Self {
        Self {
            step: Interval::new(step_ms, now_ms),
            enemy_spawn: Interval::new(ENEMY_SPAWN_INTERVAL_MS, now_ms),
            boss_spawn: Interval::new(BOSS_SPAWN_INTERVAL_MS, now_ms),
            clock: Interval::new(CLOCK_INTERVAL_MS, now_ms),
        }
    }

    fn get(&self, kind: TimerKind) -> &Interval {
        match kind {
            TimerKind::Step => &self.step,
            TimerKind::EnemySpawn => &self.enemy_spawn,
            TimerKind::BossSpawn => &self.boss_spawn,
            TimerKind::Clock => &self.clock,
        }
    }

    fn get_mut(&mut self, kind: TimerKind) -> &mut Interval {
        match kind {
            TimerKind::Step => &mut self.step,
            TimerKind::EnemySpawn => &mut self.enemy_spawn,
            TimerKind::BossSpawn => &mut self.boss_spawn,
            TimerKind::Clock => &mut self.clock,
        }
    }

    /// Earliest timer due at or before `now_ms`. Ties go in `TimerKind` order.
    pub fn next_due(&self, now_ms: u64) -> Option<(TimerKind, u64)> {
        [
            TimerKind::Step,
            TimerKind::EnemySpawn,
            TimerKind::BossSpawn,
            TimerKind::Clock,
        ]
        .into_iter()
        .map(|kind| (kind, self.get(kind).next_due_ms))
        .filter(|&(_, due)| due <= now_ms)
        .min_by_key(|&(kind, due)| (due, kind))
    }

    /// Mark `kind` as fired at active time `now_ms` and schedule its next
    /// deadline after `now_ms`. Returns the number of skipped periods.
    pub fn fire(&mut self, kind: TimerKind, now_ms: u64) -> u64 {
        self.get_mut(kind).advance(now_ms)
    }

    /// Replace the step period, restarting the step timer from `from_ms`.
    /// The first deadline still lands after `now_ms`.
    pub fn rearm_step(&mut self, step_ms: u64, from_ms: u64, now_ms: u64) {
        self.step = Interval::new(step_ms, from_ms);
        self.step.skip_missed(now_ms);
    }
}
