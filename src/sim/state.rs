//! Game state and core simulation types
//!
//! Everything a step reads or writes lives on `GameState`. Randomness goes
//! through the state's seeded RNG so a seed replays identically.

use std::collections::VecDeque;

use glam::{IVec2, Vec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::bullet::Bullet;
use super::effects::EffectRequest;
use super::enemy::{Enemy, EnemyKind};
use super::weapons::{WeaponKind, WeaponManager};
use crate::cell_center;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Timers frozen, state untouched
    Paused,
    /// Run ended
    GameOver,
}

/// Snake heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// One cell of movement in pixels
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -GRID_SIZE),
            Direction::Down => IVec2::new(0, GRID_SIZE),
            Direction::Left => IVec2::new(-GRID_SIZE, 0),
            Direction::Right => IVec2::new(GRID_SIZE, 0),
        }
    }

    /// Heading as an angle in radians (screen coordinates, y down)
    pub fn angle(self) -> f32 {
        use std::f32::consts::{FRAC_PI_2, PI};
        match self {
            Direction::Right => 0.0,
            Direction::Down => FRAC_PI_2,
            Direction::Left => PI,
            Direction::Up => -FRAC_PI_2,
        }
    }
}

/// The player's snake
#[derive(Debug, Clone, Serialize)]
pub struct Snake {
    /// Grid-aligned cell corners, head first
    pub segments: VecDeque<IVec2>,
    /// Direction applied on the last step
    pub direction: Direction,
    /// Direction the next step will apply
    pub next_direction: Direction,
}

impl Default for Snake {
    fn default() -> Self {
        let start_x = (CANVAS_WIDTH as i32 / (2 * GRID_SIZE)) * GRID_SIZE;
        let start_y = (CANVAS_HEIGHT as i32 / (2 * GRID_SIZE)) * GRID_SIZE;
        let segments = (0..3)
            .map(|i| IVec2::new(start_x - i * GRID_SIZE, start_y))
            .collect();
        Self {
            segments,
            direction: Direction::Right,
            next_direction: Direction::Right,
        }
    }
}

impl Snake {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn head(&self) -> Option<IVec2> {
        self.segments.front().copied()
    }

    /// Pixel centre of the head cell
    pub fn head_center(&self) -> Option<Vec2> {
        self.head().map(cell_center)
    }

    pub fn occupies(&self, cell: IVec2) -> bool {
        self.segments.contains(&cell)
    }

    /// Buffer a turn. Reversing onto the active direction is ignored.
    pub fn turn(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.next_direction = dir;
        true
    }

    /// Commit the buffered turn and return where the head would go
    pub fn next_head(&mut self) -> Option<IVec2> {
        self.direction = self.next_direction;
        self.head().map(|head| head + self.direction.delta())
    }

    /// Whether `cell` is off the board or on the body
    pub fn is_fatal(&self, cell: IVec2) -> bool {
        let w = CANVAS_WIDTH as i32;
        let h = CANVAS_HEIGHT as i32;
        cell.x < 0 || cell.x >= w || cell.y < 0 || cell.y >= h || self.occupies(cell)
    }

    /// Lose `segments` from the tail after an enemy hit.
    ///
    /// With more than `segments` left the tail is popped. Otherwise the snake
    /// is cut down to its head. Returns false when only the head was left,
    /// which ends the game.
    pub fn shrink(&mut self, segments: usize) -> bool {
        if self.segments.len() > segments {
            for _ in 0..segments {
                self.segments.pop_back();
            }
            true
        } else if self.segments.len() > 1 {
            self.segments.truncate(1);
            true
        } else {
            false
        }
    }
}

/// Pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FoodKind {
    Banana,
    Carrot,
    Cucumber,
    Watermelon,
    Syringe,
}

impl FoodKind {
    pub fn score(self) -> u64 {
        match self {
            FoodKind::Banana => 10,
            FoodKind::Carrot => 25,
            FoodKind::Cucumber => 55,
            FoodKind::Watermelon => 120,
            FoodKind::Syringe => 200,
        }
    }

    /// Permanent attack bonus granted on pickup
    pub fn attack_bonus(self) -> f32 {
        match self {
            FoodKind::Banana | FoodKind::Syringe => 0.0,
            FoodKind::Carrot => 0.2,
            FoodKind::Cucumber => 0.4,
            FoodKind::Watermelon => 0.7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FoodKind::Banana => "banana",
            FoodKind::Carrot => "carrot",
            FoodKind::Cucumber => "cucumber",
            FoodKind::Watermelon => "watermelon",
            FoodKind::Syringe => "syringe",
        }
    }
}

/// What a syringe does when eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerUp {
    /// Unlock a random weapon the snake doesn't own yet
    RandomWeapon,
    /// Unlock a specific weapon
    Weapon(WeaponKind),
}

pub const FOOD_DURATION_MS: u64 = 8_000;
pub const FOOD_BLINK_AFTER_MS: u64 = 6_000;
pub const SYRINGE_DURATION_MS: u64 = 20_000;
pub const SYRINGE_BLINK_AFTER_MS: u64 = 10_000;

/// A food item on the board
#[derive(Debug, Clone, Serialize)]
pub struct Food {
    pub id: u32,
    /// Grid-aligned cell corner
    pub cell: IVec2,
    pub kind: FoodKind,
    /// Active-clock time the food appeared
    pub created_ms: u64,
    pub duration_ms: u64,
    /// Age after which renderers should blink it
    pub blink_after_ms: u64,
    pub power_up: Option<PowerUp>,
}

impl Food {
    pub fn new(id: u32, cell: IVec2, kind: FoodKind, now_ms: u64) -> Self {
        Self {
            id,
            cell,
            kind,
            created_ms: now_ms,
            duration_ms: FOOD_DURATION_MS,
            blink_after_ms: FOOD_BLINK_AFTER_MS,
            power_up: None,
        }
    }

    /// A weapon syringe that lingers longer than ordinary food
    pub fn syringe(id: u32, cell: IVec2, power_up: PowerUp, now_ms: u64) -> Self {
        Self {
            duration_ms: SYRINGE_DURATION_MS,
            blink_after_ms: SYRINGE_BLINK_AFTER_MS,
            power_up: Some(power_up),
            ..Self::new(id, cell, FoodKind::Syringe, now_ms)
        }
    }

    /// Food left behind by a killed enemy
    pub fn dropped_by(id: u32, enemy: &Enemy, now_ms: u64) -> Self {
        let cell = crate::snap_to_grid(enemy.pos);
        match enemy.kind {
            EnemyKind::Boss => Self::syringe(id, cell, PowerUp::RandomWeapon, now_ms),
            kind => Self::new(id, cell, kind.profile().drop, now_ms),
        }
    }

    pub fn age(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_ms)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.age(now_ms) >= self.duration_ms
    }

    pub fn is_blinking(&self, now_ms: u64) -> bool {
        self.age(now_ms) >= self.blink_after_ms
    }
}

/// Rising, fading popup text
#[derive(Debug, Clone, Serialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub color: u32,
    pub alpha: f32,
}

const TEXT_RISE: f32 = 2.0;
const TEXT_FADE: f32 = 0.02;

impl FloatingText {
    pub fn new(pos: Vec2, text: impl Into<String>, color: u32) -> Self {
        Self {
            pos,
            text: text.into(),
            color,
            alpha: 1.0,
        }
    }

    /// Rise and fade. Returns false once fully transparent.
    pub fn update(&mut self) -> bool {
        self.pos.y -= TEXT_RISE;
        self.alpha -= TEXT_FADE;
        self.alpha > 0.0
    }
}

/// Kills counted toward the next promotion, per source tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KillCounters {
    pub red: u32,
    pub purple: u32,
    pub pink: u32,
}

/// Something the host may want to react to (sound, logging, UI)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    FoodEaten { kind: FoodKind, score: u64 },
    FoodExpired { cell: IVec2 },
    EnemyKilled { kind: EnemyKind, score: u64 },
    EnemyPromoted { kind: EnemyKind },
    SnakeHit { kind: EnemyKind, penalty: u64, segments_lost: usize },
    WeaponUnlocked { kind: WeaponKind },
    BossAppeared { max_health: u32 },
    GameOver { score: u64 },
}

/// Monotonic entity ID source
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn allocate(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Active play time at the handler being run (ms)
    pub clock_ms: u64,
    /// Seconds shown by the status clock
    pub elapsed_secs: u64,
    pub score: u64,
    /// Cumulative attack bonus from food
    pub attack_bonus: f32,
    pub speed_multiplier: f32,
    pub snake: Snake,
    /// Active enemies (insertion order)
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub food: Vec<Food>,
    pub floating_texts: Vec<FloatingText>,
    pub weapons: WeaponManager,
    pub kills: KillCounters,
    pub auto_attack: bool,
    pub last_auto_attack_ms: Option<u64>,
    /// Pending particle requests for the host
    pub effects: Vec<EffectRequest>,
    /// Pending game events for the host
    pub events: Vec<GameEvent>,
    pub ids: IdAllocator,
}

impl GameState {
    /// Create a fresh run with the given seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            clock_ms: 0,
            elapsed_secs: 0,
            score: 0,
            attack_bonus: 0.0,
            speed_multiplier: 1.0,
            snake: Snake::default(),
            enemies: Vec::new(),
            bullets: Vec::new(),
            food: Vec::new(),
            floating_texts: Vec::new(),
            weapons: WeaponManager::default(),
            kills: KillCounters::default(),
            auto_attack: true,
            last_auto_attack_ms: None,
            effects: Vec::new(),
            events: Vec::new(),
            ids: IdAllocator::default(),
        };

        state.spawn_random_food();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        self.ids.allocate()
    }

    /// Queue an event for the host, dropping the oldest once the queue is full
    pub fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            let excess = self.events.len() + 1 - MAX_PENDING_EVENTS;
            self.events.drain(..excess);
        }
        self.events.push(event);
    }

    pub fn is_food_full(&self) -> bool {
        self.food.len() >= MAX_FOOD
    }

    /// Place a banana on a random free cell. No-op at the food cap.
    pub fn spawn_random_food(&mut self) -> bool {
        if self.is_food_full() {
            return false;
        }
        let cols = CANVAS_WIDTH as i32 / GRID_SIZE;
        let rows = CANVAS_HEIGHT as i32 / GRID_SIZE;
        let free = (cols * rows) as usize - self.snake.len() - self.food.len();
        if free == 0 {
            log::debug!("No free cell for food");
            return false;
        }

        let cell = loop {
            let cell = IVec2::new(
                self.rng.random_range(0..cols) * GRID_SIZE,
                self.rng.random_range(0..rows) * GRID_SIZE,
            );
            if !self.snake.occupies(cell) && !self.food.iter().any(|f| f.cell == cell) {
                break cell;
            }
        };

        let id = self.next_entity_id();
        self.food.push(Food::new(id, cell, FoodKind::Banana, self.clock_ms));
        true
    }

    /// Queue a popup
    pub fn float_text(&mut self, pos: Vec2, text: impl Into<String>, color: u32) {
        self.floating_texts.push(FloatingText::new(pos, text, color));
    }

    /// Add a spawned enemy and return its ID
    pub fn add_enemy(&mut self, kind: EnemyKind) -> u32 {
        let id = self.next_entity_id();
        let head = self.snake.head_center();
        let enemy = Enemy::spawn(id, kind, head, &mut self.rng);
        self.enemies.push(enemy);
        id
    }

    /// Positions of every orange enemy, for pink homing
    pub fn orange_positions(&self) -> Vec<Vec2> {
        self.enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Orange)
            .map(|e| e.pos)
            .collect()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
