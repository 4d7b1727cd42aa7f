//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Active-clock time only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order (insertion order, IDs from one allocator)
//! - No rendering or platform dependencies

pub mod bullet;
pub mod effects;
pub mod enemy;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timers;
pub mod weapons;

pub use bullet::{AcidZone, Bullet, BulletKind};
pub use effects::{EffectRequest, ParticleSink};
pub use enemy::{BossMood, Enemy, EnemyContext, EnemyKind, Expression, Hop};
pub use snapshot::{Snapshot, StatusPanel};
pub use state::{
    Direction, FloatingText, Food, FoodKind, GameEvent, GamePhase, GameState, KillCounters,
    PowerUp, Snake,
};
pub use tick::{spawn_boss, spawn_enemy, speed_multiplier, step, step_interval_ms, tick_clock};
pub use timers::{Interval, TimerKind, Timers};
pub use weapons::{WeaponError, WeaponInfo, WeaponKind, WeaponManager};
