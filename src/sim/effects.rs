//! Particle-effect requests
//!
//! The simulation never owns particles. It queues fire-and-forget requests
//! that the host hands to whatever draws them.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::MAX_PENDING_EFFECTS;

/// A single visual effect request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum EffectRequest {
    /// Burst where a bullet struck an enemy
    BulletHit { pos: Vec2, color: u32 },
    /// Lightning arc segment between two points
    ElectricArc { from: Vec2, to: Vec2 },
    /// Corrosion puff inside an acid zone
    Acid { pos: Vec2, color: u32 },
}

/// Consumer of effect requests
pub trait ParticleSink {
    fn bullet_hit(&mut self, pos: Vec2, color: u32);
    fn electric_arc(&mut self, from: Vec2, to: Vec2);
    fn acid(&mut self, pos: Vec2, color: u32);
}

/// Queue `effect` unless the host has let the queue fill up
fn queue(pending: &mut Vec<EffectRequest>, effect: EffectRequest) {
    if pending.len() < MAX_PENDING_EFFECTS {
        pending.push(effect);
    }
}

impl ParticleSink for Vec<EffectRequest> {
    fn bullet_hit(&mut self, pos: Vec2, color: u32) {
        queue(self, EffectRequest::BulletHit { pos, color });
    }

    fn electric_arc(&mut self, from: Vec2, to: Vec2) {
        queue(self, EffectRequest::ElectricArc { from, to });
    }

    fn acid(&mut self, pos: Vec2, color: u32) {
        queue(self, EffectRequest::Acid { pos, color });
    }
}

/// Hit colours for corrosion
pub const ACID_SHADES: [u32; 4] = [0x32CD32, 0x00FF00, 0x7CFC00, 0xADFF2F];
/// Hit colours for sonic rings
pub const SONIC_SHADES: [u32; 4] = [0xFFD700, 0xFFC125, 0xFFCC00, 0xFFD800];

/// Corrosion puffs scattered across a fresh acid zone
pub const ACID_BURST_PARTICLES: usize = 30;

/// Scatter acid puffs uniformly by angle and distance inside `radius`
pub fn acid_burst(sink: &mut dyn ParticleSink, center: Vec2, radius: f32, rng: &mut impl Rng) {
    for _ in 0..ACID_BURST_PARTICLES {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let dist = rng.random::<f32>() * radius;
        let shade = ACID_SHADES[rng.random_range(0..ACID_SHADES.len())];
        sink.acid(center + crate::from_angle(angle) * dist, shade);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_acid_burst_stays_in_zone() {
        let mut sink: Vec<EffectRequest> = Vec::new();
        let center = Vec2::new(300.0, 300.0);
        acid_burst(&mut sink, center, 120.0, &mut Pcg32::seed_from_u64(3));
        assert_eq!(sink.len(), ACID_BURST_PARTICLES);
        for effect in sink {
            match effect {
                EffectRequest::Acid { pos, color } => {
                    assert!(pos.distance(center) <= 120.0 + 1e-3);
                    assert!(ACID_SHADES.contains(&color));
                }
                other => panic!("unexpected effect {:?}", other),
            }
        }
    }

    #[test]
    fn test_undrained_queue_is_bounded() {
        let mut sink: Vec<EffectRequest> = Vec::new();
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..10 {
            acid_burst(&mut sink, Vec2::new(300.0, 300.0), 120.0, &mut rng);
        }
        assert_eq!(sink.len(), MAX_PENDING_EFFECTS);

        sink.clear();
        sink.bullet_hit(Vec2::ZERO, 0xFFFFFF);
        assert_eq!(sink.len(), 1);
    }
}
