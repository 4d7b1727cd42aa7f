//! Enemy variants, AI and damage
//!
//! Every variant shares one `Enemy` struct. Per-variant behavior comes from a
//! static profile table keyed by `EnemyKind`, so dispatch is a plain `match`.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use super::state::FoodKind;
use crate::consts::*;
use crate::{angle_between, from_angle, hsl_to_rgb};

/// Enemy tiers, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EnemyKind {
    Red,
    Purple,
    Pink,
    Orange,
    Boss,
}

/// Who an enemy chases when it has someone to chase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pursuit {
    /// Track the snake head
    Snake,
    /// Home on the nearest orange enemy, falling back to `Snake`
    NearestOrange,
}

/// Static per-variant parameters
#[derive(Debug, Clone, Copy)]
pub struct EnemyProfile {
    pub max_health: u32,
    pub color: u32,
    pub speed_multiplier: f32,
    pub size_multiplier: f32,
    /// Upward impulse applied on landing (negative = up)
    pub bounce_strength: f32,
    /// Highest the hop may reach above the ground line
    pub bounce_height: f32,
    /// Score lost when this enemy rams the snake
    pub contact_penalty: u64,
    /// Segments lost when this enemy rams the snake
    pub segments_lost: usize,
    /// Score for a kill
    pub kill_score: u64,
    /// Food left behind on death
    pub drop: FoodKind,
    pub pursuit: Pursuit,
}

const RED_PROFILE: EnemyProfile = EnemyProfile {
    max_health: RED_HEALTH,
    color: 0xE74C3C,
    speed_multiplier: 1.0,
    size_multiplier: 1.0,
    bounce_strength: -12.0,
    bounce_height: 40.0,
    contact_penalty: 20,
    segments_lost: 2,
    kill_score: 15,
    drop: FoodKind::Banana,
    pursuit: Pursuit::Snake,
};

const PURPLE_PROFILE: EnemyProfile = EnemyProfile {
    max_health: PURPLE_HEALTH,
    color: 0x9B59B6,
    contact_penalty: 50,
    segments_lost: 3,
    kill_score: 40,
    drop: FoodKind::Carrot,
    ..RED_PROFILE
};

const PINK_PROFILE: EnemyProfile = EnemyProfile {
    max_health: PINK_HEALTH,
    color: 0xFF69B4,
    speed_multiplier: PINK_SPEED_MULTIPLIER,
    contact_penalty: 150,
    segments_lost: 4,
    kill_score: 150,
    drop: FoodKind::Cucumber,
    pursuit: Pursuit::NearestOrange,
    ..RED_PROFILE
};

const ORANGE_PROFILE: EnemyProfile = EnemyProfile {
    max_health: ORANGE_HEALTH,
    color: 0xFF8C00,
    speed_multiplier: ORANGE_SPEED_MULTIPLIER,
    contact_penalty: 300,
    segments_lost: 5,
    kill_score: 280,
    drop: FoodKind::Watermelon,
    ..RED_PROFILE
};

// Boss health and colour are rolled per spawn; these are the fallbacks.
const BOSS_PROFILE: EnemyProfile = EnemyProfile {
    max_health: BOSS_BASE_HEALTH,
    color: 0xFF0000,
    speed_multiplier: BOSS_SPEED_MULTIPLIER,
    size_multiplier: BOSS_SIZE_MULTIPLIER,
    bounce_strength: -15.0,
    bounce_height: 60.0,
    drop: FoodKind::Syringe,
    ..RED_PROFILE
};

impl EnemyKind {
    pub fn profile(self) -> &'static EnemyProfile {
        match self {
            EnemyKind::Red => &RED_PROFILE,
            EnemyKind::Purple => &PURPLE_PROFILE,
            EnemyKind::Pink => &PINK_PROFILE,
            EnemyKind::Orange => &ORANGE_PROFILE,
            EnemyKind::Boss => &BOSS_PROFILE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Red => "red",
            EnemyKind::Purple => "purple",
            EnemyKind::Pink => "pink",
            EnemyKind::Orange => "orange",
            EnemyKind::Boss => "boss",
        }
    }
}

/// Downward acceleration of the hop (per tick)
const HOP_GRAVITY: f32 = 0.8;
/// Vertical squash applied on landing
const LANDING_SQUASH: f32 = 0.6;
const SQUASH_RECOVERY: f32 = 0.1;

/// Health fraction below which an enemy may flee
const FLEE_HEALTH_FRACTION: f32 = 0.25;
/// Per-tick flee probability once wounded
const FLEE_CHANCE: f32 = 0.15;
const FLEE_SPEED_FACTOR: f32 = 1.2;

const PATROL_REROLL_TICKS: u32 = 60;
const PATROL_LEASH: f32 = 100.0;
const PATROL_SPEED_FACTOR: f32 = 0.5;

/// Displacement below which the eyes keep their old direction
const LOOK_DEADZONE: f32 = 0.1;
const DAMAGE_EYE_SCALE: f32 = 1.8;
const EYE_RECOVERY: f32 = 0.05;
const BOSS_EYE_SCALE: f32 = 6.0;

/// Ticks a boss holds a pained expression after a hit
const EXPRESSION_HOLD_TICKS: u32 = 30;

/// Spawn position rerolls before accepting a spot near the head
const SPAWN_ATTEMPTS: u32 = 64;

/// Cosmetic vertical bounce; never moves the logical position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hop {
    pub velocity: f32,
    /// Height above the ground line (zero or negative)
    pub offset: f32,
    /// Vertical render scale (1.0 = unsquashed)
    pub squash: f32,
}

impl Default for Hop {
    fn default() -> Self {
        Self {
            velocity: 0.0,
            offset: 0.0,
            squash: 1.0,
        }
    }
}

impl Hop {
    fn advance(&mut self, strength: f32, max_height: f32) {
        self.velocity += HOP_GRAVITY;
        self.offset += self.velocity;

        if self.offset > 0.0 {
            // Landed
            self.offset = 0.0;
            self.velocity = strength;
            self.squash = LANDING_SQUASH;
        } else {
            self.squash = (self.squash + SQUASH_RECOVERY).min(1.0);
        }

        if self.offset < -max_height {
            self.offset = -max_height;
            self.velocity = 0.0;
        }
    }
}

/// Boss facial expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expression {
    Normal,
    Hurt,
    Angry,
    Furious,
}

/// Boss expression state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BossMood {
    pub expression: Expression,
    /// Ticks left before the expression settles
    pub hold_ticks: u32,
    /// Eyebrow tilt in degrees (negative = scowl)
    pub brow_angle: f32,
}

impl Default for BossMood {
    fn default() -> Self {
        Self {
            expression: Expression::Normal,
            hold_ticks: 0,
            brow_angle: 0.0,
        }
    }
}

impl BossMood {
    /// React to a hit, returning the new eye scale
    fn react(&mut self, health_fraction: f32) -> f32 {
        self.hold_ticks = EXPRESSION_HOLD_TICKS;
        if health_fraction <= 0.25 {
            self.expression = Expression::Furious;
            self.brow_angle = -30.0;
            2.5
        } else if health_fraction <= 0.5 {
            self.expression = Expression::Angry;
            self.brow_angle = -20.0;
            2.3
        } else {
            self.expression = Expression::Hurt;
            self.brow_angle = -10.0;
            2.2
        }
    }

    /// Count down the hold; returns the settled eye scale when it lapses
    fn tick(&mut self, health_fraction: f32) -> Option<f32> {
        if self.hold_ticks == 0 {
            return None;
        }
        self.hold_ticks -= 1;
        if self.hold_ticks > 0 {
            return None;
        }
        if health_fraction <= 0.25 {
            self.expression = Expression::Angry;
            self.brow_angle = -15.0;
            Some(2.2)
        } else {
            self.expression = Expression::Normal;
            self.brow_angle = 0.0;
            Some(2.0)
        }
    }
}

/// World state an enemy reads during its update
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    /// Centre of the snake head cell
    pub head: Vec2,
    /// Current base enemy speed (difficulty-scaled)
    pub speed: f32,
    /// Positions of every orange enemy this tick
    pub oranges: &'a [Vec2],
}

/// An enemy entity
#[derive(Debug, Clone, Serialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub health: u32,
    pub max_health: u32,
    pub color: u32,
    /// Where the enemy returns to when idle
    pub anchor: Vec2,
    pub patrol_angle: f32,
    pub patrol_timer: u32,
    pub hop: Hop,
    /// Unit vector the eyes point along
    pub look: Vec2,
    pub eye_scale: f32,
    /// Whether the last update ran away from the head
    pub fleeing: bool,
    /// Boss-only expression state
    pub mood: Option<BossMood>,
}

impl Enemy {
    /// Create an enemy of `kind` at `pos`
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, rng: &mut impl Rng) -> Self {
        let profile = kind.profile();
        Self {
            id,
            kind,
            pos,
            health: profile.max_health,
            max_health: profile.max_health,
            color: profile.color,
            anchor: pos,
            patrol_angle: rng.random::<f32>() * std::f32::consts::TAU,
            patrol_timer: 0,
            hop: Hop::default(),
            look: Vec2::new(0.0, -1.0),
            eye_scale: 1.0,
            fleeing: false,
            mood: None,
        }
    }

    /// Create an enemy at a random spot clear of the snake head
    pub fn spawn(id: u32, kind: EnemyKind, head: Option<Vec2>, rng: &mut impl Rng) -> Self {
        let pos = spawn_point(head, rng);
        Self::new(id, kind, pos, rng)
    }

    /// Create a boss scaled by active play time
    pub fn boss(id: u32, game_secs: u64, head: Option<Vec2>, rng: &mut impl Rng) -> Self {
        let mut boss = Self::spawn(id, EnemyKind::Boss, head, rng);
        boss.max_health = boss_max_health(game_secs);
        boss.health = boss.max_health;
        boss.color = hsl_to_rgb(rng.random_range(0..360) as f32, 0.8, 0.5);
        boss.eye_scale = BOSS_EYE_SCALE;
        boss.mood = Some(BossMood::default());
        boss
    }

    pub fn profile(&self) -> &'static EnemyProfile {
        self.kind.profile()
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }

    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Advance AI and physics by one tick
    pub fn update(&mut self, ctx: &EnemyContext, rng: &mut impl Rng) {
        if let Some(mood) = self.mood.as_mut() {
            let fraction = self.health as f32 / self.max_health.max(1) as f32;
            if let Some(eyes) = mood.tick(fraction) {
                self.eye_scale = eyes;
            }
        }
        if self.eye_scale > 1.0 {
            self.eye_scale = (self.eye_scale - EYE_RECOVERY).max(1.0);
        }

        let profile = self.profile();
        let speed = ctx.speed * profile.speed_multiplier;

        let escort = match profile.pursuit {
            Pursuit::NearestOrange => self.nearest_orange(ctx.oranges),
            Pursuit::Snake => None,
        };
        let step = match escort {
            Some(orange) => {
                self.fleeing = false;
                from_angle(angle_between(self.pos, orange)) * speed
            }
            None => self.hunt_or_patrol(ctx.head, speed, rng),
        };

        let mut next = self.pos + step;
        if next.x < 0.0 {
            next.x = CANVAS_WIDTH;
        } else if next.x > CANVAS_WIDTH {
            next.x = 0.0;
        }
        if next.y < 0.0 {
            next.y = CANVAS_HEIGHT;
        } else if next.y > CANVAS_HEIGHT {
            next.y = 0.0;
        }

        let moved = next - self.pos;
        if moved.x.abs() > LOOK_DEADZONE || moved.y.abs() > LOOK_DEADZONE {
            self.look = moved.normalize_or_zero();
        }
        self.pos = next;

        self.hop
            .advance(profile.bounce_strength, profile.bounce_height);
    }

    fn nearest_orange(&self, oranges: &[Vec2]) -> Option<Vec2> {
        let mut best = None;
        let mut best_dist = ENEMY_TRACK_DISTANCE;
        for &orange in oranges {
            let dist = self.pos.distance(orange);
            if dist < best_dist {
                best_dist = dist;
                best = Some(orange);
            }
        }
        best
    }

    fn hunt_or_patrol(&mut self, head: Vec2, speed: f32, rng: &mut impl Rng) -> Vec2 {
        let distance = self.pos.distance(head);
        let wounded = self.health_fraction() < FLEE_HEALTH_FRACTION;
        let flee_roll = wounded && rng.random::<f32>() < FLEE_CHANCE;

        if distance < ENEMY_TRACK_DISTANCE {
            let toward = from_angle(angle_between(self.pos, head));
            self.fleeing = flee_roll;
            return if flee_roll {
                -toward * speed * FLEE_SPEED_FACTOR
            } else {
                toward * speed
            };
        }

        self.fleeing = false;
        self.patrol_timer += 1;
        if self.patrol_timer >= PATROL_REROLL_TICKS {
            self.patrol_angle = rng.random::<f32>() * std::f32::consts::TAU;
            self.patrol_timer = 0;
        }

        if self.pos.distance(self.anchor) > PATROL_LEASH {
            from_angle(angle_between(self.pos, self.anchor)) * speed
        } else {
            from_angle(self.patrol_angle) * speed * PATROL_SPEED_FACTOR
        }
    }

    /// Radius inside which the snake head counts as touching this enemy
    pub fn contact_radius(&self) -> f32 {
        (ENEMY_SIZE * self.profile().size_multiplier + GRID_SIZE as f32) / 2.0
    }

    /// Radius inside which a bullet counts as hitting this enemy
    pub fn hit_radius(&self) -> f32 {
        (ENEMY_SIZE * self.profile().size_multiplier + BULLET_SIZE * 1.5) / 2.0
    }

    pub fn touches_head(&self, head_center: Vec2) -> bool {
        self.pos.distance(head_center) < self.contact_radius()
    }

    pub fn is_hit_by(&self, bullet_pos: Vec2) -> bool {
        self.pos.distance(bullet_pos) < self.hit_radius()
    }

    /// Remove one point of health. Returns true only on the hit that kills.
    pub fn take_damage(&mut self) -> bool {
        if self.health == 0 {
            return false;
        }
        self.health -= 1;

        let fraction = self.health_fraction();
        self.eye_scale = match self.mood.as_mut() {
            Some(mood) => mood.react(fraction),
            None => DAMAGE_EYE_SCALE,
        };

        self.health == 0
    }

    /// Apply `amount` single-point hits, stopping at zero health.
    /// Returns true if this call killed the enemy.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let mut killed = false;
        for _ in 0..amount {
            if self.health == 0 {
                break;
            }
            killed |= self.take_damage();
        }
        killed
    }

    /// Shove the enemy directly away from `origin`, keeping it on the board
    pub fn knock_back(&mut self, origin: Vec2, power: f32) {
        let away = self.pos - origin;
        let dist = away.length();
        if dist == 0.0 {
            return;
        }
        self.pos += away / dist * power;
        self.pos.x = self.pos.x.clamp(0.0, CANVAS_WIDTH);
        self.pos.y = self.pos.y.clamp(0.0, CANVAS_HEIGHT);
    }
}

/// Boss health for a spawn at `game_secs` of active play
pub fn boss_max_health(game_secs: u64) -> u32 {
    BOSS_BASE_HEALTH + (game_secs / 2) as u32
}

/// Random point on the board at least `ENEMY_SAFE_DISTANCE` from the head
pub fn spawn_point(head: Option<Vec2>, rng: &mut impl Rng) -> Vec2 {
    let mut candidate = Vec2::ZERO;
    for _ in 0..SPAWN_ATTEMPTS {
        candidate = Vec2::new(
            rng.random::<f32>() * (CANVAS_WIDTH - ENEMY_SIZE * 2.0) + ENEMY_SIZE,
            rng.random::<f32>() * (CANVAS_HEIGHT - ENEMY_SIZE * 2.0) + ENEMY_SIZE,
        );
        match head {
            Some(head) if head.distance(candidate) < ENEMY_SAFE_DISTANCE => continue,
            _ => return candidate,
        }
    }
    log::warn!("No clear spawn point after {} attempts", SPAWN_ATTEMPTS);
    candidate
}
