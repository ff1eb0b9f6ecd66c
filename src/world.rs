//! Simulation engine - owns the soup and advances it tick by tick.

use crate::config::Config;
use crate::entity::{Behavior, Body, Entity, EntityId, EntityStore, Kind, Polymer, Shade};
use crate::grid::SpatialIndex;
use crate::interaction;
use crate::metrics::{MetricsRecorder, Snapshot};
use crate::motion;
use glam::Vec2;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Read-only view of one cell for grid-overlay rendering
#[derive(Clone, Copy, Debug)]
pub struct PartitionDebug {
    pub id: usize,
    pub min: Vec2,
    pub extent: Vec2,
    pub occupants: usize,
}

/// Kind-specific part of an entity view
#[derive(Clone, Copy, Debug)]
pub enum BodyView<'a> {
    Monomer { behavior: Behavior, affects: u8 },
    Vesicle { polymers: &'a [Polymer] },
}

/// Read-only entity view handed to the render collaborator
#[derive(Clone, Copy, Debug)]
pub struct EntityView<'a> {
    pub id: EntityId,
    pub kind: Kind,
    pub position: Vec2,
    pub radius: f32,
    pub shade: Shade,
    pub body: BodyView<'a>,
}

/// The simulated soup
pub struct Simulation {
    // Population
    pub store: EntityStore,

    // Environment
    pub index: SpatialIndex,

    // Metrics
    pub recorder: MetricsRecorder,

    // Configuration
    pub config: Config,

    // State
    pub clock: f32,
    pub ticks: u64,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl Simulation {
    /// Create a new simulation with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::with_seed(config, seed)
    }

    /// Create a new simulation with a specific seed for reproducibility
    pub fn with_seed(config: Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let index = SpatialIndex::new(
            config.world.width,
            config.world.height,
            config.world.grid_width,
            config.world.grid_height,
        );
        let mut recorder = MetricsRecorder::new(config.logging.metrics_period);
        let mut store = EntityStore::with_capacity(config.entities.total);

        let width = config.world.width as i32;
        let height = config.world.height as i32;

        // 1% of the population are vesicles
        let vesicle_count = config.entities.total / 100;
        for _ in 0..vesicle_count {
            let id = store.alloc_id();
            let radius = rng
                .gen_range(config.entities.vesicle_radius_min..config.entities.vesicle_radius_max)
                as f32;
            let position = Vec2::new(
                rng.gen_range(0..width) as f32,
                rng.gen_range(0..height) as f32,
            );
            let force = Vec2::new(0.0, (rng.gen_range(0..10) - 5) as f32);
            store.push(Entity::vesicle(id, radius, position, force));
            recorder.register(id);
        }

        // the remaining 99% are free monomers
        let monomer_count = config.entities.total * 99 / 100;
        for _ in 0..monomer_count {
            let id = store.alloc_id();
            let behavior = Behavior::random(&mut rng);
            let affects = rng.gen_range(0..10u8);
            let position = Vec2::new(
                rng.gen_range(0..width) as f32,
                rng.gen_range(0..height) as f32,
            );
            let force = Vec2::new(0.0, (rng.gen_range(0..10) - 5) as f32);
            store.push(Entity::monomer(id, behavior, affects, position, force));
        }

        let mut simulation = Self {
            store,
            index,
            recorder,
            config,
            clock: 0.0,
            ticks: 0,
            rng,
            seed,
        };

        simulation.rebuild_partitions();
        simulation
    }

    /// Advance the soup by one tick of `dt` simulated seconds
    pub fn step(&mut self, dt: f32) {
        self.clock += dt;
        if self.recorder.tick(dt) {
            self.recorder.sample(self.clock, &self.store.entities);
        }

        // One sweep in store order. Daughters appended mid-sweep are
        // visited later in the same tick; they carry no partition yet, so
        // they only integrate motion.
        let mut j = 0;
        while j < self.store.len() {
            let scanning = {
                let p = &self.store.entities[j].particle;
                p.kind == Kind::Vesicle && p.partition.is_some()
            };
            if scanning {
                interaction::resolve(&mut self.store, &self.index, &self.config, dt, &mut self.rng, j);
                interaction::maybe_fission(&mut self.store, &self.config, &mut self.rng, j);
            }
            motion::integrate(&mut self.store.entities[j], dt, &self.config, &mut self.rng);
            j += 1;
        }

        let purged = self.store.purge_absorbed();
        if purged > 0 {
            log::debug!("tick {}: purged {} absorbed entities", self.ticks, purged);
        }
        self.rebuild_partitions();
        self.ticks += 1;
    }

    /// Reassign every entity's partition from its current position and
    /// rebuild the per-cell member lists
    pub fn rebuild_partitions(&mut self) {
        self.index.clear();
        for (i, entity) in self.store.entities.iter_mut().enumerate() {
            let p = &mut entity.particle;
            p.partition = self.index.cell_id(p.position.x, p.position.y);
            if let Some(cell) = p.partition {
                self.index.insert(cell, i);
            }
        }
    }

    /// Run the simulation for the given number of ticks
    pub fn run(&mut self, ticks: u64, dt: f32) {
        for _ in 0..ticks {
            self.step(dt);
        }
    }

    /// Run with a callback after every tick
    pub fn run_with_callback<F>(&mut self, ticks: u64, dt: f32, mut callback: F)
    where
        F: FnMut(&Simulation, u64),
    {
        for i in 0..ticks {
            self.step(dt);
            callback(self, i);
        }
    }

    /// Fresh read-only views over the current population
    pub fn active_entities(&self) -> impl Iterator<Item = EntityView<'_>> {
        self.store.entities.iter().map(|entity| EntityView {
            id: entity.particle.id,
            kind: entity.particle.kind,
            position: entity.particle.position,
            radius: entity.particle.radius,
            shade: entity.particle.shade,
            body: match &entity.body {
                Body::Monomer(m) => BodyView::Monomer {
                    behavior: m.behavior,
                    affects: m.affects,
                },
                Body::Vesicle(v) => BodyView::Vesicle {
                    polymers: &v.polymers,
                },
            },
        })
    }

    /// Ordered metric snapshots recorded for a vesicle id
    pub fn metrics_for(&self, id: EntityId) -> Option<&[Snapshot]> {
        self.recorder.snapshots(id)
    }

    /// Per-cell occupancy for grid-overlay rendering
    pub fn partition_debug(&self) -> impl Iterator<Item = PartitionDebug> + '_ {
        self.index.cells().iter().map(|cell| PartitionDebug {
            id: cell.id,
            min: cell.min,
            extent: cell.extent,
            occupants: cell.members.len(),
        })
    }

    /// Current count of active entities
    pub fn population(&self) -> usize {
        self.store.entities.iter().filter(|e| e.is_active()).count()
    }

    pub fn vesicle_count(&self) -> usize {
        self.store
            .entities
            .iter()
            .filter(|e| e.kind() == Kind::Vesicle)
            .count()
    }

    pub fn monomer_count(&self) -> usize {
        self.store
            .entities
            .iter()
            .filter(|e| e.kind() == Kind::Monomer)
            .count()
    }

    /// The soup is extinct once no vesicle remains
    pub fn is_extinct(&self) -> bool {
        self.vesicle_count() == 0
    }

    /// Total simulated seconds so far
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
