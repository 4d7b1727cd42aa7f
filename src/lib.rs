//! Snake Siege - A grid snake arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (snake, enemies, weapons, food, scoring)
//! - `session`: Timer-driven session host (pause/resume, commands, snapshots)
//! - `settings`: Start-menu selections

pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Command, Session};
pub use settings::{Background, Settings, SettingsError};

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;
    /// Snake cell size (pixels)
    pub const GRID_SIZE: i32 = 20;

    /// Step interval at speed multiplier 1.0 (ms)
    pub const INITIAL_STEP_MS: u64 = 200;
    /// Active play time between speed-ups (ms)
    pub const SPEED_UP_INTERVAL_MS: u64 = 30_000;
    /// Speed multiplier gained per speed-up
    pub const SPEED_UP_AMOUNT: f32 = 0.2;
    /// Seconds of active play per difficulty level
    pub const LEVEL_DURATION_SECS: u64 = 30;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 30.0;
    pub const BULLET_SIZE: f32 = 8.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 15.0;
    pub const ENEMY_SPEED: f32 = 4.5;
    pub const ENEMY_TRACK_DISTANCE: f32 = 200.0;
    /// Minimum spawn distance from the snake head
    pub const ENEMY_SAFE_DISTANCE: f32 = 100.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: u64 = 1_000;
    /// Cap for the timed spawner only (promotions and bosses ignore it)
    pub const MAX_ENEMIES: usize = 15;

    /// Per-tier health pools
    pub const RED_HEALTH: u32 = 3;
    pub const PURPLE_HEALTH: u32 = 5;
    pub const PINK_HEALTH: u32 = 12;
    pub const ORANGE_HEALTH: u32 = 20;

    pub const PINK_SPEED_MULTIPLIER: f32 = 1.5;
    pub const ORANGE_SPEED_MULTIPLIER: f32 = 2.0;

    /// Kills needed to promote into the next tier
    pub const KILLS_FOR_PURPLE: u32 = 5;
    pub const KILLS_FOR_PINK: u32 = 2;
    pub const KILLS_FOR_ORANGE: u32 = 3;
    /// Credit a higher-tier kill gives to the tier below
    pub const CASCADE_CREDIT: u32 = 2;

    /// Boss tuning
    pub const BOSS_SPAWN_INTERVAL_MS: u64 = 30_000;
    pub const BOSS_BASE_HEALTH: u32 = 30;
    pub const BOSS_SPEED_MULTIPLIER: f32 = 0.5;
    pub const BOSS_SIZE_MULTIPLIER: f32 = 4.0;

    /// Food cap (random generation and kill conversion)
    pub const MAX_FOOD: usize = 20;

    /// Auto-attack gate at the loop level (ms)
    pub const AUTO_ATTACK_INTERVAL_MS: u64 = 200;
    /// Weapon cooldown at attack rate 1.0 (ms)
    pub const WEAPON_BASE_INTERVAL_MS: f32 = 200.0;

    /// Status clock period (ms)
    pub const CLOCK_INTERVAL_MS: u64 = 1_000;

    /// Undrained particle requests kept before new ones are dropped
    pub const MAX_PENDING_EFFECTS: usize = 200;
    /// Undrained game events kept; the oldest go first
    pub const MAX_PENDING_EVENTS: usize = 256;
}

use consts::*;

/// Centre of a grid cell given its top-left pixel corner
#[inline]
pub fn cell_center(cell: IVec2) -> Vec2 {
    cell.as_vec2() + Vec2::splat(GRID_SIZE as f32 / 2.0)
}

/// Snap a continuous position onto the grid cell containing it, clamped to the board
#[inline]
pub fn snap_to_grid(pos: Vec2) -> IVec2 {
    let max_x = (CANVAS_WIDTH as i32 / GRID_SIZE - 1) * GRID_SIZE;
    let max_y = (CANVAS_HEIGHT as i32 / GRID_SIZE - 1) * GRID_SIZE;
    let x = (pos.x / GRID_SIZE as f32).floor() as i32 * GRID_SIZE;
    let y = (pos.y / GRID_SIZE as f32).floor() as i32 * GRID_SIZE;
    IVec2::new(x.clamp(0, max_x), y.clamp(0, max_y))
}

/// Unit vector for an angle in radians
#[inline]
pub fn from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Pack 8-bit channels into 0xRRGGBB
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Convert HSL (hue in degrees, saturation/lightness in 0..=1) to 0xRRGGBB
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> u32 {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    let channel = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    rgb(channel(r), channel(g), channel(b))
}
