//! Projectiles
//!
//! Bullets fly in a straight line at a fixed speed toward the point they were
//! aimed at. Acid bullets detonate on contact into a stationary damage zone
//! that outlives the projectile.

use glam::Vec2;
use serde::Serialize;

use crate::angle_between;
use crate::consts::*;
use crate::from_angle;

/// Projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BulletKind {
    Default,
    Electric,
    Fire,
    Acid,
    Sonic,
}

/// Static per-variant parameters
#[derive(Debug, Clone, Copy)]
struct BulletProfile {
    size_multiplier: f32,
    speed_multiplier: f32,
    /// Ticks before the bullet fizzles
    lifespan: Option<u32>,
    penetrating: bool,
    color: u32,
}

impl BulletKind {
    fn profile(self) -> BulletProfile {
        let plain = BulletProfile {
            size_multiplier: 1.0,
            speed_multiplier: 1.0,
            lifespan: None,
            penetrating: false,
            color: 0xF1C40F,
        };
        match self {
            BulletKind::Default => plain,
            BulletKind::Electric => BulletProfile {
                size_multiplier: 0.8,
                lifespan: Some(10),
                color: 0x00FFFF,
                ..plain
            },
            BulletKind::Fire => BulletProfile {
                size_multiplier: 2.0,
                speed_multiplier: 0.5,
                lifespan: Some(15),
                penetrating: true,
                color: 0xFF69B4,
                ..plain
            },
            BulletKind::Acid => BulletProfile {
                size_multiplier: 1.5,
                lifespan: Some(20),
                color: 0x32CD32,
                ..plain
            },
            BulletKind::Sonic => BulletProfile {
                size_multiplier: 1.5,
                speed_multiplier: 3.0,
                lifespan: Some(12),
                penetrating: true,
                color: 0xFFD700,
            },
        }
    }

    /// Body colour, also used for hit sparks
    pub fn color(self) -> u32 {
        self.profile().color
    }
}

/// Push applied to every enemy inside a sonic ring
pub const SONIC_KNOCKBACK: f32 = 15.0;
pub const ACID_ZONE_RADIUS: f32 = 120.0;
pub const ACID_ZONE_DURATION_MS: u64 = 3_000;

/// A detonated acid bullet's damage area
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcidZone {
    pub center: Vec2,
    pub radius: f32,
    /// Active-clock time of detonation
    pub started_ms: u64,
    pub duration_ms: u64,
}

impl AcidZone {
    pub fn contains(&self, pos: Vec2) -> bool {
        self.center.distance(pos) <= self.radius
    }

    pub fn is_spent(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) > self.duration_ms
    }
}

/// A projectile entity
#[derive(Debug, Clone, Serialize)]
pub struct Bullet {
    pub id: u32,
    pub kind: BulletKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    /// Ticks left, if the bullet is short-lived
    pub lifespan: Option<u32>,
    /// Keeps flying after a hit
    pub penetrating: bool,
    /// Extra damage applied on a direct hit (acid)
    pub impact_damage: u32,
    /// Set once an acid bullet has detonated
    pub zone: Option<AcidZone>,
}

impl Bullet {
    /// Fire a bullet from `from` aimed at `target`
    pub fn new(id: u32, kind: BulletKind, from: Vec2, target: Vec2) -> Self {
        let profile = kind.profile();
        let vel = from_angle(angle_between(from, target)) * BULLET_SPEED * profile.speed_multiplier;
        Self {
            id,
            kind,
            pos: from,
            vel,
            size: BULLET_SIZE * profile.size_multiplier,
            color: profile.color,
            lifespan: profile.lifespan,
            penetrating: profile.penetrating,
            impact_damage: 0,
            zone: None,
        }
    }

    /// Move one tick. Detonated bullets stay put.
    pub fn update(&mut self) {
        if self.zone.is_some() {
            return;
        }
        self.pos += self.vel;
        if let Some(ticks) = self.lifespan.as_mut() {
            *ticks = ticks.saturating_sub(1);
        }
    }

    /// Whether this bullet can still strike enemies
    pub fn is_live(&self) -> bool {
        self.zone.is_none()
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.x < 0.0 || self.pos.x > CANVAS_WIDTH || self.pos.y < 0.0 || self.pos.y > CANVAS_HEIGHT
    }

    /// Whether the bullet should be pruned
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match &self.zone {
            Some(zone) => zone.is_spent(now_ms),
            None => self.is_out_of_bounds() || self.lifespan == Some(0),
        }
    }

    /// Turn into an acid zone at the current position. Returns false if
    /// already detonated.
    pub fn detonate(&mut self, now_ms: u64) -> bool {
        if self.zone.is_some() {
            return false;
        }
        self.vel = Vec2::ZERO;
        self.zone = Some(AcidZone {
            center: self.pos,
            radius: ACID_ZONE_RADIUS,
            started_ms: now_ms,
            duration_ms: ACID_ZONE_DURATION_MS,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flies_toward_target() {
        let mut bullet = Bullet::new(1, BulletKind::Default, Vec2::new(100.0, 100.0), Vec2::new(400.0, 100.0));
        bullet.update();
        assert!((bullet.pos.x - 130.0).abs() < 1e-3);
        assert!((bullet.pos.y - 100.0).abs() < 1e-3);
        assert_eq!(bullet.size, BULLET_SIZE);
        assert!(!bullet.penetrating);
    }

    #[test]
    fn test_variant_speeds() {
        let from = Vec2::new(400.0, 400.0);
        let target = Vec2::new(400.0, 0.0);
        let fire = Bullet::new(1, BulletKind::Fire, from, target);
        let sonic = Bullet::new(2, BulletKind::Sonic, from, target);
        assert!((fire.vel.length() - 15.0).abs() < 1e-3);
        assert!((sonic.vel.length() - 90.0).abs() < 1e-3);
        assert!(fire.penetrating && sonic.penetrating);
    }

    #[test]
    fn test_lifespan_expiry() {
        let mut bullet = Bullet::new(1, BulletKind::Electric, Vec2::new(400.0, 400.0), Vec2::new(401.0, 400.0));
        for _ in 0..9 {
            bullet.update();
            assert!(!bullet.is_expired(0));
        }
        bullet.update();
        assert!(bullet.is_expired(0));
    }

    #[test]
    fn test_out_of_bounds_expiry() {
        let mut bullet = Bullet::new(1, BulletKind::Default, Vec2::new(790.0, 400.0), Vec2::new(900.0, 400.0));
        assert!(!bullet.is_expired(0));
        bullet.update();
        assert!(bullet.is_expired(0));
    }

    #[test]
    fn test_acid_zone_lifecycle() {
        let mut bullet = Bullet::new(1, BulletKind::Acid, Vec2::new(400.0, 400.0), Vec2::new(500.0, 400.0));
        bullet.update();
        assert!(bullet.detonate(1_000));
        assert!(!bullet.detonate(1_100));
        assert!(!bullet.is_live());

        let pos = bullet.pos;
        bullet.update();
        assert_eq!(bullet.pos, pos);

        let zone = bullet.zone.expect("detonated");
        assert!(zone.contains(pos + Vec2::new(120.0, 0.0)));
        assert!(!zone.contains(pos + Vec2::new(121.0, 0.0)));

        assert!(!bullet.is_expired(4_000));
        assert!(bullet.is_expired(4_001));
    }
}
