//! Per-tick motion: force integration, thermal drift and boundary handling.

use crate::config::Config;
use crate::entity::{Body, Entity, Kind};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Mechanical impulse retained per tick
const MECHANICAL_DECAY: f32 = 0.95;

/// Maps depth ratio to (-1, 1): `2 / (1 + e^(-2x)) - 1`
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    2.0 / (1.0 + (-2.0 * x).exp()) - 1.0
}

/// Advance one entity by one tick.
///
/// Chain-bound monomers ride with their vesicle instead of integrating on
/// their own; their positions are re-derived here before the owner moves.
/// Entities tagged `Absorbed` still integrate but no longer feel the
/// thermal drift, matching their pending removal.
pub fn integrate(entity: &mut Entity, dt: f32, config: &Config, rng: &mut ChaCha8Rng) {
    if let Body::Vesicle(vesicle) = &mut entity.body {
        let anchor = entity.particle.position;
        for polymer in &mut vesicle.polymers {
            for monomer in &mut polymer.chain {
                monomer.position = anchor + monomer.offset * 0.5;
            }
        }
    }

    let p = &mut entity.particle;
    p.metrics.life_timer += dt;
    p.metrics.distance_travelled += p.force.length() * dt;
    p.metrics.distance_travelled += p.mechanical_force.length() * dt;

    p.position += p.force * dt;
    p.position += p.mechanical_force;
    p.mechanical_force *= MECHANICAL_DECAY;

    if p.kind == Kind::Absorbed {
        return;
    }

    let phys = &config.physics;
    let width = config.world.width;
    let height = config.world.height;

    // the deeper an entity sits, the hotter it gets
    p.temperature = sigmoid(p.position.y / height) * 100.0;
    let drift = -(p.position.y / height - 0.5);
    p.force.x = drift * rng.gen_range(phys.drift_min..phys.drift_max) as f32;

    if p.temperature < rng.gen_range(phys.temp_low_min..phys.temp_low_max) as f32 {
        p.force.y += rng.gen_range(0..phys.rise) as f32;
    } else if p.temperature > rng.gen_range(phys.temp_high_min..phys.temp_high_max) as f32 {
        p.force.y -= rng.gen_range(0..phys.rise) as f32;
    } else {
        let half = phys.rise / 2;
        if half > 0 {
            p.position.y += p.force.y * dt * rng.gen_range(0..half) as f32;
        }
    }

    // wrap horizontally, bounce vertically with energy loss
    if p.position.x < 0.0 {
        p.position.x = width;
    }
    if p.position.x > width {
        p.position.x = 0.0;
    }
    if p.position.y < 0.0 {
        p.position.y = 0.0;
        p.force.y *= -0.5;
    }
    if p.position.y > height {
        p.position.y = height;
        p.force.y *= -0.5;
    }
}
