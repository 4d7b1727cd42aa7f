//! Auto-firing weapons
//!
//! Weapons are a closed set. Each owns its cooldown gate and a firing routine
//! that spawns bullets and, for area weapons, damages enemies directly. The
//! manager fires every active weapon and keeps one weapon's failure from
//! stopping the rest.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::bullet::{Bullet, BulletKind, SONIC_KNOCKBACK};
use super::effects::{ParticleSink, SONIC_SHADES};
use super::enemy::Enemy;
use super::state::{IdAllocator, Snake};
use crate::consts::*;
use crate::{angle_between, from_angle};

/// Weapon variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WeaponKind {
    Default,
    Electric,
    Fire,
    Acid,
    Sonic,
}

/// Weapons a syringe can unlock
pub const UPGRADES: [WeaponKind; 4] = [
    WeaponKind::Electric,
    WeaponKind::Fire,
    WeaponKind::Acid,
    WeaponKind::Sonic,
];

const DEFAULT_RANGE: f32 = 250.0;
const DEFAULT_SPREAD: f32 = PI / 6.0;
const ELECTRIC_RANGE: f32 = 250.0;
const ELECTRIC_JITTER: f32 = 10.0;
const ARC_SEGMENTS: u32 = 3;
const ARC_JITTER: f32 = 20.0;
const FIRE_RANGE: f32 = 200.0;
const FIRE_SPREAD: f32 = PI / 4.0;
const ACID_RANGE: f32 = 300.0;
const ACID_JITTER: f32 = 20.0;
/// Zone damage ticks this many times faster than the base gate
const ACID_DAMAGE_RATE: f32 = 4.0;
const ACID_ZONE_PARTICLE_CHANCE: f32 = 0.3;
const SONIC_BASE_RANGE: f32 = 90.0;
const SONIC_MAX_RANGE: f32 = 180.0;
const SONIC_RING: u32 = 12;

impl WeaponKind {
    pub fn base_power(self) -> f32 {
        match self {
            WeaponKind::Default => 1.0,
            WeaponKind::Electric => 0.2,
            WeaponKind::Fire => 0.3,
            WeaponKind::Acid | WeaponKind::Sonic => 0.1,
        }
    }

    /// Attacks per base interval
    pub fn attack_rate(self) -> f32 {
        match self {
            WeaponKind::Default => 1.0,
            WeaponKind::Electric | WeaponKind::Fire => 2.0,
            WeaponKind::Acid => 0.3,
            WeaponKind::Sonic => 1.0 / 3.0,
        }
    }

    /// Targeting radius for a snake of `len` segments
    pub fn range(self, len: usize) -> f32 {
        match self {
            WeaponKind::Default => DEFAULT_RANGE,
            WeaponKind::Electric => ELECTRIC_RANGE,
            WeaponKind::Fire => FIRE_RANGE,
            WeaponKind::Acid => ACID_RANGE,
            WeaponKind::Sonic => (SONIC_BASE_RANGE + (len / 6) as f32 * 30.0).min(SONIC_MAX_RANGE),
        }
    }

    /// Bullets per volley for a snake of `len` segments
    pub fn projectile_count(self, len: usize) -> usize {
        match self {
            WeaponKind::Default => 1 + len / 5,
            WeaponKind::Electric => len / 4,
            WeaponKind::Fire => len / 2,
            WeaponKind::Acid => (len as f32 * 0.2).floor() as usize,
            WeaponKind::Sonic => SONIC_RING as usize,
        }
    }

    /// Power after the shared attack bonus
    pub fn actual_power(self, attack_bonus: f32) -> f32 {
        self.base_power() * (1.0 + attack_bonus)
    }

    /// Minimum time between volleys (ms)
    pub fn cooldown_ms(self) -> f32 {
        WEAPON_BASE_INTERVAL_MS / self.attack_rate()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponKind::Default => "default",
            WeaponKind::Electric => "electric",
            WeaponKind::Fire => "fire",
            WeaponKind::Acid => "acid",
            WeaponKind::Sonic => "sonic",
        }
    }

    /// Popup colour announcing the unlock
    pub fn color(self) -> u32 {
        match self {
            WeaponKind::Default => 0xFFFFFF,
            WeaponKind::Electric => 0x00FFFF,
            WeaponKind::Fire => 0xFF4500,
            WeaponKind::Acid => 0x32CD32,
            WeaponKind::Sonic => 0xFFD700,
        }
    }
}

/// A weapon invocation that could not complete
#[derive(Debug, Error)]
pub enum WeaponError {
    #[error("{0:?} weapon fired with no snake head")]
    EmptySnake(WeaponKind),
    #[error("{kind:?} weapon computed a non-finite aim angle")]
    NonFiniteAim { kind: WeaponKind },
}

/// Per-weapon entry in the pause-menu summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeaponInfo {
    pub kind: WeaponKind,
    pub actual_power: f32,
    pub attack_rate: f32,
    pub projectile_count: usize,
}

/// Mutable world a volley touches
pub struct FireContext<'a> {
    /// Active-clock time of this volley
    pub now_ms: u64,
    pub snake: &'a Snake,
    pub attack_bonus: f32,
    pub enemies: &'a mut [Enemy],
    pub bullets: &'a mut Vec<Bullet>,
    pub effects: &'a mut dyn ParticleSink,
    pub rng: &'a mut Pcg32,
    pub ids: &'a mut IdAllocator,
}

impl FireContext<'_> {
    fn shoot(&mut self, kind: BulletKind, from: Vec2, target: Vec2) -> &mut Bullet {
        let id = self.ids.allocate();
        self.bullets.push(Bullet::new(id, kind, from, target));
        let last = self.bullets.len() - 1;
        &mut self.bullets[last]
    }

    fn jitter(&mut self, amount: f32) -> Vec2 {
        Vec2::new(
            (self.rng.random::<f32>() - 0.5) * amount,
            (self.rng.random::<f32>() - 0.5) * amount,
        )
    }
}

/// Index of the enemy closest to `origin`, strictly inside `range`
fn nearest_enemy(enemies: &[Enemy], origin: Vec2, range: f32) -> Option<usize> {
    let mut best = None;
    let mut best_dist = range;
    for (i, enemy) in enemies.iter().enumerate() {
        let dist = enemy.pos.distance(origin);
        if dist < best_dist {
            best_dist = dist;
            best = Some(i);
        }
    }
    best
}

/// Jagged lightning from `from` to `to`, as a few jittered segments
fn electric_arc(ctx: &mut FireContext, from: Vec2, to: Vec2) {
    let mut last = from;
    for i in 1..=ARC_SEGMENTS {
        let ratio = i as f32 / ARC_SEGMENTS as f32;
        let end = from.lerp(to, ratio) + ctx.jitter(ARC_JITTER);
        ctx.effects.electric_arc(last, end);
        last = end;
    }
}

fn checked_aim(kind: WeaponKind, angle: f32) -> Result<f32, WeaponError> {
    if angle.is_finite() {
        Ok(angle)
    } else {
        Err(WeaponError::NonFiniteAim { kind })
    }
}

/// An unlocked weapon and its gates
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    /// Inactive weapons stay owned but no longer fire
    pub active: bool,
    last_attack_ms: Option<u64>,
    last_zone_tick_ms: Option<u64>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            active: true,
            last_attack_ms: None,
            last_zone_tick_ms: None,
        }
    }

    /// Whether the cooldown has elapsed
    pub fn can_attack(&self, now_ms: u64) -> bool {
        match self.last_attack_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) as f32 >= self.kind.cooldown_ms(),
        }
    }

    /// Fire a volley if the gate allows, then tick acid zones
    pub fn attack(&mut self, ctx: &mut FireContext) -> Result<(), WeaponError> {
        let center = ctx
            .snake
            .head_center()
            .ok_or(WeaponError::EmptySnake(self.kind))?;

        if self.can_attack(ctx.now_ms) {
            let fired = match self.kind {
                WeaponKind::Default => self.fire_default(ctx, center)?,
                WeaponKind::Electric => self.fire_electric(ctx, center)?,
                WeaponKind::Fire => self.fire_flames(ctx, center)?,
                WeaponKind::Acid => self.fire_acid(ctx, center)?,
                WeaponKind::Sonic => self.fire_sonic(ctx, center),
            };
            if fired {
                self.last_attack_ms = Some(ctx.now_ms);
            }
        }

        if self.kind == WeaponKind::Acid {
            self.corrode(ctx);
        }
        Ok(())
    }

    fn fire_default(&mut self, ctx: &mut FireContext, center: Vec2) -> Result<bool, WeaponError> {
        let base = match nearest_enemy(ctx.enemies, center, DEFAULT_RANGE) {
            Some(i) => angle_between(center, ctx.enemies[i].pos),
            None => ctx.snake.direction.angle(),
        };
        let base = checked_aim(self.kind, base)?;

        for i in 0..self.kind.projectile_count(ctx.snake.len()) {
            let mut angle = base;
            if i > 0 {
                angle += (ctx.rng.random::<f32>() - 0.5) * DEFAULT_SPREAD;
            }
            let target = center + from_angle(angle) * DEFAULT_RANGE;
            ctx.shoot(BulletKind::Default, center, target);
        }
        Ok(true)
    }

    fn fire_electric(&mut self, ctx: &mut FireContext, center: Vec2) -> Result<bool, WeaponError> {
        let count = self.kind.projectile_count(ctx.snake.len());
        if count == 0 {
            return Ok(false);
        }
        let in_range: Vec<usize> = ctx
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.pos.distance(center) <= ELECTRIC_RANGE)
            .map(|(i, _)| i)
            .collect();
        if in_range.is_empty() {
            return Ok(false);
        }
        let target = ctx.enemies[in_range[ctx.rng.random_range(0..in_range.len())]].pos;
        checked_aim(self.kind, angle_between(center, target))?;

        for _ in 0..count {
            let aim = target + ctx.jitter(ELECTRIC_JITTER);
            ctx.shoot(BulletKind::Electric, center, aim);
            electric_arc(ctx, center, target);
        }
        Ok(true)
    }

    fn fire_flames(&mut self, ctx: &mut FireContext, center: Vec2) -> Result<bool, WeaponError> {
        let count = self.kind.projectile_count(ctx.snake.len());
        if count == 0 {
            return Ok(false);
        }
        let Some(i) = nearest_enemy(ctx.enemies, center, FIRE_RANGE) else {
            return Ok(false);
        };
        let base = checked_aim(self.kind, angle_between(center, ctx.enemies[i].pos))?;

        for _ in 0..count {
            let angle = base + (ctx.rng.random::<f32>() - 0.5) * FIRE_SPREAD;
            let target = center + from_angle(angle) * FIRE_RANGE;
            ctx.shoot(BulletKind::Fire, center, target);
        }
        Ok(true)
    }

    fn fire_acid(&mut self, ctx: &mut FireContext, center: Vec2) -> Result<bool, WeaponError> {
        let count = self.kind.projectile_count(ctx.snake.len());
        if count == 0 {
            return Ok(false);
        }
        let Some(i) = nearest_enemy(ctx.enemies, center, ACID_RANGE) else {
            return Ok(false);
        };
        let target = ctx.enemies[i].pos;
        checked_aim(self.kind, angle_between(center, target))?;

        let impact = (self.kind.actual_power(ctx.attack_bonus) * 2.0).floor() as u32;
        for _ in 0..count {
            let aim = target + ctx.jitter(ACID_JITTER);
            ctx.shoot(BulletKind::Acid, center, aim).impact_damage = impact;
        }
        Ok(true)
    }

    fn fire_sonic(&mut self, ctx: &mut FireContext, center: Vec2) -> bool {
        let range = self.kind.range(ctx.snake.len());
        let step = TAU / SONIC_RING as f32;

        for i in 0..SONIC_RING {
            let angle = i as f32 * step;
            ctx.shoot(BulletKind::Sonic, center, center + from_angle(angle) * range);

            for _ in 0..3 {
                let spread = angle + (ctx.rng.random::<f32>() - 0.5) * 0.2;
                let dist = range * (0.3 + ctx.rng.random::<f32>() * 0.7);
                let shade = SONIC_SHADES[ctx.rng.random_range(0..SONIC_SHADES.len())];
                ctx.effects.bullet_hit(center + from_angle(spread) * dist, shade);
            }
        }

        let damage = self.kind.actual_power(ctx.attack_bonus).floor() as u32;
        for enemy in ctx.enemies.iter_mut() {
            if enemy.pos.distance(center) <= range {
                enemy.knock_back(center, SONIC_KNOCKBACK);
                enemy.apply_damage(damage);
            }
        }
        true
    }

    /// Damage every enemy inside every detonated zone, at the zone rate
    fn corrode(&mut self, ctx: &mut FireContext) {
        if let Some(last) = self.last_zone_tick_ms {
            let interval = WEAPON_BASE_INTERVAL_MS / ACID_DAMAGE_RATE;
            if (ctx.now_ms.saturating_sub(last) as f32) < interval {
                return;
            }
        }

        let damage = self.kind.actual_power(ctx.attack_bonus).floor() as u32;
        for zone in ctx.bullets.iter().filter_map(|b| b.zone) {
            if zone.is_spent(ctx.now_ms) {
                continue;
            }
            for enemy in ctx.enemies.iter_mut() {
                if zone.contains(enemy.pos) {
                    enemy.apply_damage(damage);
                    if ctx.rng.random::<f32>() < ACID_ZONE_PARTICLE_CHANCE {
                        ctx.effects.bullet_hit(enemy.pos, BulletKind::Acid.color());
                    }
                }
            }
        }
        self.last_zone_tick_ms = Some(ctx.now_ms);
    }
}

/// The snake's arsenal, in unlock order
#[derive(Debug, Clone)]
pub struct WeaponManager {
    weapons: Vec<Weapon>,
}

impl Default for WeaponManager {
    fn default() -> Self {
        Self {
            weapons: vec![Weapon::new(WeaponKind::Default)],
        }
    }
}

impl WeaponManager {
    /// Active weapon kinds in unlock order
    pub fn kinds(&self) -> Vec<WeaponKind> {
        self.weapons
            .iter()
            .filter(|w| w.active)
            .map(|w| w.kind)
            .collect()
    }

    /// Whether `kind` was ever unlocked this run
    pub fn owns(&self, kind: WeaponKind) -> bool {
        self.weapons.iter().any(|w| w.kind == kind)
    }

    /// Unlock `kind`. No-op if already owned.
    pub fn add_weapon(&mut self, kind: WeaponKind) -> bool {
        if self.owns(kind) {
            return false;
        }
        self.weapons.push(Weapon::new(kind));
        true
    }

    /// Unlock a random weapon not yet owned
    pub fn upgrade_random(&mut self, rng: &mut impl Rng) -> Option<WeaponKind> {
        let candidates: Vec<WeaponKind> = UPGRADES
            .iter()
            .copied()
            .filter(|&kind| !self.owns(kind))
            .collect();
        if candidates.is_empty() {
            return None;
        }
        let kind = candidates[rng.random_range(0..candidates.len())];
        self.add_weapon(kind);
        Some(kind)
    }

    /// Stop firing `kind`. The weapon stays owned.
    pub fn remove(&mut self, kind: WeaponKind) -> bool {
        match self.weapons.iter_mut().find(|w| w.kind == kind && w.active) {
            Some(weapon) => {
                weapon.active = false;
                true
            }
            None => false,
        }
    }

    /// Fire every active weapon. Returns how many failed.
    pub fn fire_all(&mut self, ctx: &mut FireContext) -> usize {
        let mut failures = 0;
        for weapon in self.weapons.iter_mut().filter(|w| w.active) {
            if let Err(err) = weapon.attack(ctx) {
                log::error!("Weapon {} failed: {}", weapon.kind.as_str(), err);
                failures += 1;
            }
        }
        failures
    }

    /// Stats for each active weapon given the current snake and bonus
    pub fn summary(&self, snake_len: usize, attack_bonus: f32) -> Vec<WeaponInfo> {
        self.weapons
            .iter()
            .filter(|w| w.active)
            .map(|w| WeaponInfo {
                kind: w.kind,
                actual_power: w.kind.actual_power(attack_bonus),
                attack_rate: w.kind.attack_rate(),
                projectile_count: w.kind.projectile_count(snake_len),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::EffectRequest;
    use crate::sim::enemy::EnemyKind;
    use glam::IVec2;
    use rand::SeedableRng;

    struct World {
        snake: Snake,
        enemies: Vec<Enemy>,
        bullets: Vec<Bullet>,
        effects: Vec<EffectRequest>,
        rng: Pcg32,
        ids: IdAllocator,
        bonus: f32,
    }

    impl World {
        fn new(len: usize) -> Self {
            let mut snake = Snake::default();
            snake.segments.clear();
            for i in 0..len as i32 {
                snake.segments.push_back(IVec2::new(400 - i * 20, 400));
            }
            Self {
                snake,
                enemies: Vec::new(),
                bullets: Vec::new(),
                effects: Vec::new(),
                rng: Pcg32::seed_from_u64(11),
                ids: IdAllocator::default(),
                bonus: 0.0,
            }
        }

        fn enemy_at(&mut self, kind: EnemyKind, pos: Vec2) {
            let id = self.ids.allocate();
            let enemy = Enemy::new(id, kind, pos, &mut self.rng);
            self.enemies.push(enemy);
        }

        fn fire(&mut self, weapon: &mut Weapon, now_ms: u64) -> Result<(), WeaponError> {
            let mut ctx = FireContext {
                now_ms,
                snake: &self.snake,
                attack_bonus: self.bonus,
                enemies: &mut self.enemies,
                bullets: &mut self.bullets,
                effects: &mut self.effects,
                rng: &mut self.rng,
                ids: &mut self.ids,
            };
            weapon.attack(&mut ctx)
        }

        fn fire_all(&mut self, manager: &mut WeaponManager, now_ms: u64) -> usize {
            let mut ctx = FireContext {
                now_ms,
                snake: &self.snake,
                attack_bonus: self.bonus,
                enemies: &mut self.enemies,
                bullets: &mut self.bullets,
                effects: &mut self.effects,
                rng: &mut self.rng,
                ids: &mut self.ids,
            };
            manager.fire_all(&mut ctx)
        }
    }

    const HEAD: Vec2 = Vec2::new(410.0, 410.0);

    #[test]
    fn test_cooldowns() {
        assert_eq!(WeaponKind::Default.cooldown_ms(), 200.0);
        assert_eq!(WeaponKind::Electric.cooldown_ms(), 100.0);
        assert!((WeaponKind::Sonic.cooldown_ms() - 600.0).abs() < 1e-3);

        let mut weapon = Weapon::new(WeaponKind::Default);
        assert!(weapon.can_attack(0));
        weapon.last_attack_ms = Some(1_000);
        assert!(!weapon.can_attack(1_199));
        assert!(weapon.can_attack(1_200));
    }

    #[test]
    fn test_default_aims_at_nearest() {
        let mut world = World::new(3);
        world.enemy_at(EnemyKind::Red, HEAD + Vec2::new(0.0, -100.0));
        world.enemy_at(EnemyKind::Red, HEAD + Vec2::new(50.0, 0.0));
        let mut weapon = Weapon::new(WeaponKind::Default);
        world.fire(&mut weapon, 0).expect("fires");

        assert_eq!(world.bullets.len(), 1);
        let bullet = &world.bullets[0];
        assert_eq!(bullet.pos, HEAD);
        assert!(bullet.vel.x > 29.9 && bullet.vel.y.abs() < 1e-3);

        // Gate consumed
        world.fire(&mut weapon, 100).expect("gated");
        assert_eq!(world.bullets.len(), 1);
    }

    #[test]
    fn test_default_fires_along_heading_without_targets() {
        let mut world = World::new(10);
        world.snake.direction = crate::sim::state::Direction::Up;
        let mut weapon = Weapon::new(WeaponKind::Default);
        world.fire(&mut weapon, 0).expect("fires");

        assert_eq!(world.bullets.len(), 3);
        assert!(world.bullets[0].vel.y < -29.9);
        for bullet in &world.bullets[1..] {
            let off = (bullet.vel.to_angle() + PI / 2.0).abs();
            assert!(off <= DEFAULT_SPREAD / 2.0 + 1e-3);
        }
    }

    #[test]
    fn test_electric_skips_without_targets() {
        let mut world = World::new(8);
        let mut weapon = Weapon::new(WeaponKind::Electric);
        world.fire(&mut weapon, 0).expect("no-op");
        assert!(world.bullets.is_empty());
        assert!(weapon.last_attack_ms.is_none());

        world.enemy_at(EnemyKind::Red, HEAD + Vec2::new(250.0, 0.0));
        world.fire(&mut weapon, 10).expect("fires");
        assert_eq!(world.bullets.len(), 2);
        assert_eq!(world.effects.len(), 2 * ARC_SEGMENTS as usize);
        assert!(world
            .effects
            .iter()
            .all(|e| matches!(e, EffectRequest::ElectricArc { .. })));
    }

    #[test]
    fn test_fire_volley() {
        let mut world = World::new(6);
        world.enemy_at(EnemyKind::Red, HEAD + Vec2::new(199.0, 0.0));
        let mut weapon = Weapon::new(WeaponKind::Fire);
        world.fire(&mut weapon, 0).expect("fires");
        assert_eq!(world.bullets.len(), 3);
        for bullet in &world.bullets {
            assert!(bullet.penetrating);
            assert!((bullet.vel.length() - BULLET_SPEED * 0.5).abs() < 1e-3);
            assert!(bullet.vel.to_angle().abs() <= FIRE_SPREAD / 2.0 + 1e-3);
        }
    }

    #[test]
    fn test_acid_needs_five_segments() {
        let mut world = World::new(4);
        world.enemy_at(EnemyKind::Red, HEAD + Vec2::new(100.0, 0.0));
        let mut weapon = Weapon::new(WeaponKind::Acid);
        world.fire(&mut weapon, 0).expect("no-op");
        assert!(world.bullets.is_empty());

        world.snake.segments.push_back(IVec2::new(320, 400));
        world.fire(&mut weapon, 0).expect("fires");
        assert_eq!(world.bullets.len(), 1);
        assert_eq!(world.bullets[0].kind, BulletKind::Acid);
    }

    #[test]
    fn test_acid_zones_stack() {
        let mut world = World::new(3);
        world.bonus = 9.0; // acid power 1.0
        world.enemy_at(EnemyKind::Orange, HEAD + Vec2::new(50.0, 0.0));
        for id in 0..2 {
            let mut bullet = Bullet::new(100 + id, BulletKind::Acid, HEAD, HEAD + Vec2::X);
            bullet.detonate(0);
            world.bullets.push(bullet);
        }
        let mut weapon = Weapon::new(WeaponKind::Acid);
        world.fire(&mut weapon, 0).expect("zones tick");
        assert_eq!(world.enemies[0].health, ORANGE_HEALTH - 2);

        // Zone gate is 50ms
        world.fire(&mut weapon, 49).expect("gated");
        assert_eq!(world.enemies[0].health, ORANGE_HEALTH - 2);
        world.fire(&mut weapon, 50).expect("zones tick");
        assert_eq!(world.enemies[0].health, ORANGE_HEALTH - 4);
    }

    #[test]
    fn test_sonic_range_boundary() {
        let mut world = World::new(18);
        assert_eq!(WeaponKind::Sonic.range(18), 180.0);
        assert_eq!(WeaponKind::Sonic.range(5), 90.0);
        assert_eq!(WeaponKind::Sonic.range(12), 150.0);

        world.bonus = 19.0; // power 2.0
        world.enemy_at(EnemyKind::Orange, HEAD + Vec2::new(180.0, 0.0));
        world.enemy_at(EnemyKind::Orange, HEAD + Vec2::new(0.0, 181.0));
        let mut weapon = Weapon::new(WeaponKind::Sonic);
        world.fire(&mut weapon, 0).expect("fires");

        assert_eq!(world.bullets.len(), 12);
        assert_eq!(world.effects.len(), 36);

        let inside = &world.enemies[0];
        assert_eq!(inside.health, ORANGE_HEALTH - 2);
        assert!((inside.pos.x - (HEAD.x + 195.0)).abs() < 1e-3);

        let outside = &world.enemies[1];
        assert_eq!(outside.health, ORANGE_HEALTH);
        assert_eq!(outside.pos, HEAD + Vec2::new(0.0, 181.0));
    }

    #[test]
    fn test_manager_unlocks() {
        let mut manager = WeaponManager::default();
        let mut rng = Pcg32::seed_from_u64(5);
        assert!(!manager.add_weapon(WeaponKind::Default));
        assert!(manager.add_weapon(WeaponKind::Fire));

        let mut unlocked = Vec::new();
        while let Some(kind) = manager.upgrade_random(&mut rng) {
            unlocked.push(kind);
        }
        assert_eq!(unlocked.len(), 3);
        assert!(!unlocked.contains(&WeaponKind::Fire));
        assert_eq!(manager.kinds().len(), 5);
        assert_eq!(manager.upgrade_random(&mut rng), None);
    }

    #[test]
    fn test_manager_remove_keeps_ownership() {
        let mut manager = WeaponManager::default();
        manager.add_weapon(WeaponKind::Electric);
        assert!(manager.remove(WeaponKind::Electric));
        assert!(!manager.remove(WeaponKind::Electric));
        assert_eq!(manager.kinds(), vec![WeaponKind::Default]);
        assert!(!manager.add_weapon(WeaponKind::Electric));
    }

    #[test]
    fn test_failures_are_isolated() {
        let mut world = World::new(0);
        let mut manager = WeaponManager::default();
        manager.add_weapon(WeaponKind::Sonic);
        assert_eq!(world.fire_all(&mut manager, 0), 2);

        world.snake = Snake::default();
        assert_eq!(world.fire_all(&mut manager, 1_000), 0);
        assert!(!world.bullets.is_empty());
    }

    #[test]
    fn test_summary() {
        let mut manager = WeaponManager::default();
        manager.add_weapon(WeaponKind::Electric);
        let summary = manager.summary(10, 0.5);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].kind, WeaponKind::Default);
        assert_eq!(summary[0].actual_power, 1.5);
        assert_eq!(summary[0].projectile_count, 3);
        assert_eq!(summary[1].attack_rate, 2.0);
        assert_eq!(summary[1].projectile_count, 2);
    }
}
