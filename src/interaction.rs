//! Vesicle behavior: monomer absorption, predation and mechanical fission.

use crate::config::Config;
use crate::entity::{Behavior, Body, BoundMonomer, Entity, EntityStore, Kind, Shade};
use crate::grid::SpatialIndex;
use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Uniform draw from [0, span), or 0 when the window is empty
#[inline]
fn scatter(rng: &mut ChaCha8Rng, span: i32) -> i32 {
    if span > 0 {
        rng.gen_range(0..span)
    } else {
        0
    }
}

/// Resolve predation and absorption for the vesicle at `index` against
/// every other entity sharing its partition cell.
///
/// The member list reflects positions at the start of the tick; entities
/// already tagged `Absorbed` this tick fail the kind checks and are
/// skipped naturally. At most one monomer is absorbed per vesicle per
/// tick.
pub fn resolve(
    store: &mut EntityStore,
    index: &SpatialIndex,
    config: &Config,
    dt: f32,
    rng: &mut ChaCha8Rng,
    idx: usize,
) {
    let Some(cell) = store.entities[idx].particle.partition else {
        return;
    };
    let mut fed = false;
    for &target in index.members(cell) {
        // an entity never interacts with itself, even when co-located
        if target == idx || target >= store.len() {
            continue;
        }
        let (vesicle, other) = store.pair_mut(idx, target);
        prey_on(vesicle, other, config, dt, rng);
        if !fed {
            fed = absorb_monomer(vesicle, other, config, rng);
        }
    }
}

/// Bigger vesicles slowly eat smaller ones they overlap.
fn prey_on(vesicle: &mut Entity, target: &mut Entity, config: &Config, dt: f32, rng: &mut ChaCha8Rng) {
    if target.particle.kind != Kind::Vesicle {
        return;
    }
    if vesicle.particle.radius <= target.particle.radius {
        return;
    }
    if vesicle.particle.position.distance(target.particle.position) >= vesicle.particle.radius {
        return;
    }

    let bite = config.interaction.absorb_rate * dt;
    vesicle.particle.radius_threshold += bite;
    vesicle.particle.metrics.volume_growth += bite;
    vesicle.particle.shade = Shade::Fed;
    target.particle.radius -= bite;
    target.particle.radius_threshold = target.particle.radius;
    target.particle.shade = Shade::Shrinking;

    // TODO: confirm whether this transfer was meant to run before the
    // threshold reset above; as written the condition can never hold.
    if target.particle.radius < target.particle.radius_threshold {
        let count = rng.gen_range(0..config.interaction.monomer_move_rate) as usize;
        steal_monomers(vesicle, target, count);
    }

    if target.particle.radius < config.entities.min_viable_radius {
        target.particle.kind = Kind::Absorbed;
        log::debug!("vesicle {} eaten by vesicle {}", target.particle.id, vesicle.particle.id);
    }
}

/// Move the first `count` chain monomers from `target` to `vesicle`.
fn steal_monomers(vesicle: &mut Entity, target: &mut Entity, count: usize) {
    let Body::Vesicle(prey) = &mut target.body else {
        return;
    };
    let Some(source) = prey.polymers.first_mut() else {
        return;
    };
    if source.chain.len() <= count {
        return;
    }
    let Body::Vesicle(predator) = &mut vesicle.body else {
        return;
    };
    let Some(destination) = predator.polymers.first_mut() else {
        return;
    };
    for _ in 0..count {
        destination.chain.push(source.chain.remove(0));
        vesicle.particle.metrics.monomers_eaten += 1;
    }
    target.particle.radius_threshold = target.particle.radius;
}

/// Absorb a free monomer into the vesicle's first chain. Returns whether
/// an absorption happened, so callers can cap it at one per tick.
fn absorb_monomer(vesicle: &mut Entity, target: &mut Entity, config: &Config, rng: &mut ChaCha8Rng) -> bool {
    // only while there is room left to grow
    if vesicle.particle.radius >= vesicle.particle.radius_threshold {
        return false;
    }
    if target.particle.kind != Kind::Monomer {
        return false;
    }
    if vesicle.particle.position.distance(target.particle.position) >= vesicle.particle.radius {
        return false;
    }
    let Body::Monomer(monomer) = &target.body else {
        return false;
    };

    let span = (vesicle.particle.radius * config.interaction.growth_factor) as i32;
    let half = span / 2;
    let offset = Vec2::new(
        (scatter(rng, span) - half) as f32,
        (scatter(rng, span) - half) as f32,
    );
    let bound = BoundMonomer {
        behavior: monomer.behavior,
        affects: monomer.affects,
        offset,
        position: target.particle.position,
    };

    let Body::Vesicle(body) = &mut vesicle.body else {
        return false;
    };
    let Some(chain) = body.polymers.first_mut() else {
        return false;
    };
    chain.chain.push(bound);
    vesicle.particle.radius += config.interaction.growth_per_monomer;
    vesicle.particle.metrics.monomers_eaten += 1;
    target.particle.kind = Kind::Absorbed;
    true
}

/// Roll the stochastic mechanical event for the vesicle at `index` and
/// fission it when both the probability and the radius gate pass.
pub fn maybe_fission(store: &mut EntityStore, config: &Config, rng: &mut ChaCha8Rng, idx: usize) {
    let inter = &config.interaction;
    if (rng.gen_range(0..100) as f32) / 100.0 >= inter.mechanical_event {
        return;
    }
    let gate = rng.gen_range(inter.fission_radius_min..inter.fission_radius_max) as f32;
    if store.entities[idx].particle.radius <= gate {
        return;
    }
    split(store, rng, idx);
}

/// Break the mother vesicle into daughters along `Split`-tagged monomers.
///
/// The first chain is scanned in order with a running fragment counter.
/// Each `Split` monomer closes the current daughter: she spawns at the
/// mother's position with a small mechanical kick and radius equal to the
/// counted fragment. The mother is destroyed regardless of how many
/// daughters were produced; a trailing fragment with no closing `Split`
/// is discarded along with her.
fn split(store: &mut EntityStore, rng: &mut ChaCha8Rng, idx: usize) {
    let (mother_id, mother_position) = {
        let p = &store.entities[idx].particle;
        (p.id, p.position)
    };

    let chain = match &mut store.entities[idx].body {
        Body::Vesicle(v) => v
            .polymers
            .first_mut()
            .map(|p| std::mem::take(&mut p.chain))
            .unwrap_or_default(),
        _ => return,
    };

    let mut fragment: Vec<BoundMonomer> = Vec::new();
    let mut counter = 0.0f32;
    let mut daughters = 0usize;

    for mut monomer in chain {
        counter += 1.0;
        if monomer.behavior != Behavior::Split {
            // tuck it inside the fragment being assembled
            let span = counter as i32;
            monomer.offset = Vec2::new(
                scatter(rng, span) as f32 - counter / 2.0,
                scatter(rng, span) as f32 - counter / 2.0,
            );
            fragment.push(monomer);
        } else {
            fragment.push(monomer);

            let mut daughter = Entity::vesicle(mother_id, counter, mother_position, Vec2::ZERO);
            daughter.particle.mechanical_force = Vec2::new(
                (rng.gen_range(0..20) - 10) as f32,
                (rng.gen_range(0..20) - 10) as f32,
            );

            // only the first daughter inherits the mother's timer and
            // distance; eaten count and growth carry over to all of them
            let mother = &mut store.entities[idx].particle.metrics;
            daughter.particle.metrics.life_timer = mother.life_timer;
            daughter.particle.metrics.distance_travelled = mother.distance_travelled;
            mother.life_timer = 0.0;
            mother.distance_travelled = 0.0;
            daughter.particle.metrics.monomers_eaten = mother.monomers_eaten;
            daughter.particle.metrics.volume_growth = mother.volume_growth;

            if let Body::Vesicle(body) = &mut daughter.body {
                if let Some(polymer) = body.polymers.first_mut() {
                    polymer.chain = std::mem::take(&mut fragment);
                }
            }
            store.push(daughter);
            counter = 0.0;
            daughters += 1;
        }
    }

    store.entities[idx].particle.kind = Kind::Absorbed;
    log::debug!("vesicle {mother_id} fissioned into {daughters} daughters");
}
