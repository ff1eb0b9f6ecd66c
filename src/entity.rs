//! Entity model: particles, monomers, polymer chains and vesicles.

use glam::Vec2;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Stable entity identifier. Fission daughters inherit the mother's id,
/// so ids are unique only up to lineage (see `MetricsRecorder`).
pub type EntityId = u64;

/// Kind tag for every entity in the soup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Monomer,
    /// Transient removal marker; purged before the next tick begins
    Absorbed,
    Vesicle,
}

/// Display marker for the external renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shade {
    #[default]
    Normal,
    /// Flipped when a vesicle feeds on another this tick
    Fed,
    /// Flipped when a vesicle is being eaten
    Shrinking,
}

/// Behavioral tag carried by every monomer.
///
/// Only `Split` is consulted today (it marks fission boundaries in a
/// polymer chain); the rest describe pairing behaviors the chain scanner
/// does not yet execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    None,
    Attach,
    Subtract,
    Attract,
    Repel,
    Split,
    Combine,
    Copy,
    IncreasePh,
    DecreasePh,
}

impl Behavior {
    pub const ALL: [Behavior; 10] = [
        Behavior::None,
        Behavior::Attach,
        Behavior::Subtract,
        Behavior::Attract,
        Behavior::Repel,
        Behavior::Split,
        Behavior::Combine,
        Behavior::Copy,
        Behavior::IncreasePh,
        Behavior::DecreasePh,
    ];

    /// Draw a uniformly random behavioral tag
    pub fn random(rng: &mut ChaCha8Rng) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Per-entity lifetime metrics, accrued every tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsRecord {
    /// Seconds since creation (or since the last fission reset)
    pub life_timer: f32,
    /// Distance covered by directional and mechanical forces
    pub distance_travelled: f32,
    /// Radius threshold gained by preying on other vesicles
    pub volume_growth: f32,
    /// Free monomers absorbed (plus any transferred during predation)
    pub monomers_eaten: u32,
}

/// Attributes shared by every entity kind
#[derive(Debug, Clone)]
pub struct Particle {
    pub id: EntityId,
    pub kind: Kind,
    pub position: Vec2,
    /// Directional force, rewritten every tick by the thermal drift model
    pub force: Vec2,
    /// Averaged collision impulse; decays 5% per tick
    pub mechanical_force: Vec2,
    pub radius: f32,
    /// Growth ceiling; absorption stops once radius reaches it
    pub radius_threshold: f32,
    /// Derived per tick from vertical position
    pub temperature: f32,
    /// Grid cell currently occupied, `None` while outside the bounds
    pub partition: Option<usize>,
    pub shade: Shade,
    pub metrics: MetricsRecord,
}

impl Particle {
    pub fn new(id: EntityId, kind: Kind, position: Vec2, force: Vec2) -> Self {
        Self {
            id,
            kind,
            position,
            force,
            mechanical_force: Vec2::ZERO,
            radius: 1.0,
            radius_threshold: 3.0,
            temperature: 0.0,
            partition: None,
            shade: Shade::Normal,
            metrics: MetricsRecord::default(),
        }
    }
}

/// Free-floating monomer payload
#[derive(Debug, Clone)]
pub struct MonomerBody {
    pub behavior: Behavior,
    /// One of 10 arbitrary classes used to pair monomers
    pub affects: u8,
}

/// A monomer bound into a vesicle's polymer chain.
///
/// Bound monomers stop moving on their own; their position is re-derived
/// every tick as `owner.position + offset * 0.5`.
#[derive(Debug, Clone)]
pub struct BoundMonomer {
    pub behavior: Behavior,
    pub affects: u8,
    /// Placement relative to the owning vesicle's center
    pub offset: Vec2,
    pub position: Vec2,
}

/// Ordered chain of bound monomers owned by exactly one vesicle.
/// Insertion order is preserved; fission scans it linearly.
#[derive(Debug, Clone, Default)]
pub struct Polymer {
    pub chain: Vec<BoundMonomer>,
}

/// Vesicle payload: one or more polymer chains.
/// At least one chain exists at all times; current logic uses chain 0.
#[derive(Debug, Clone)]
pub struct VesicleBody {
    pub polymers: Vec<Polymer>,
}

/// Kind-specific payload, dispatched by matching
#[derive(Debug, Clone)]
pub enum Body {
    Monomer(MonomerBody),
    Vesicle(VesicleBody),
}

/// One entity in the soup: shared attributes plus a kind-specific payload
#[derive(Debug, Clone)]
pub struct Entity {
    pub particle: Particle,
    pub body: Body,
}

impl Entity {
    /// Create a free-floating monomer
    pub fn monomer(id: EntityId, behavior: Behavior, affects: u8, position: Vec2, force: Vec2) -> Self {
        Self {
            particle: Particle::new(id, Kind::Monomer, position, force),
            body: Body::Monomer(MonomerBody { behavior, affects }),
        }
    }

    /// Create a vesicle with one empty polymer chain
    pub fn vesicle(id: EntityId, radius: f32, position: Vec2, force: Vec2) -> Self {
        let mut particle = Particle::new(id, Kind::Vesicle, position, force);
        particle.radius = radius;
        particle.radius_threshold = radius;
        Self {
            particle,
            body: Body::Vesicle(VesicleBody {
                polymers: vec![Polymer::default()],
            }),
        }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.particle.kind
    }

    /// An entity is active until it is tagged for removal
    #[inline]
    pub fn is_active(&self) -> bool {
        self.particle.kind != Kind::Absorbed
    }

    pub fn as_vesicle(&self) -> Option<&VesicleBody> {
        match &self.body {
            Body::Vesicle(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vesicle_mut(&mut self) -> Option<&mut VesicleBody> {
        match &mut self.body {
            Body::Vesicle(v) => Some(v),
            _ => None,
        }
    }
}

/// Ordered arena of active entities.
///
/// Partition member lists reference positions in `entities`; those indices
/// stay valid for a whole tick because removal happens only in the
/// end-of-tick purge, right before the partitions are rebuilt.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    pub entities: Vec<Entity>,
    next_id: EntityId,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: Vec::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Reserve the next fresh entity id
    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append an entity, returning its store index
    pub fn push(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Entity> {
        self.entities.get_mut(index)
    }

    /// Simultaneous mutable access to two distinct entities
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Entity, &mut Entity) {
        debug_assert_ne!(a, b, "pair_mut requires distinct indices");
        if a < b {
            let (left, right) = self.entities.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.entities.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    /// Remove every entity tagged `Absorbed`, returning how many were purged
    pub fn purge_absorbed(&mut self) -> usize {
        let before = self.entities.len();
        self.entities.retain(|e| e.is_active());
        before - self.entities.len()
    }
}
