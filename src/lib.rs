//! # PROTOSOUP
//!
//! Primordial soup simulator: a bounded 2D population of monomers and
//! vesicles loosely modelling abiogenesis.
//!
//! ## Features
//!
//! - **Size-mediated predation**: no fitness function, bigger vesicles
//!   simply eat smaller ones on contact
//! - **Polymer chains**: absorbed monomers assemble in order inside their
//!   vesicle and mark fission boundaries
//! - **Mechanical fission**: oversized vesicles stochastically break into
//!   daughter vesicles
//! - **Configurable**: YAML configuration files
//! - **Reproducible**: seeded random number generation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use protosoup::{Config, Simulation};
//!
//! // Create a soup with the default config
//! let config = Config::default();
//! let mut sim = Simulation::new(config);
//!
//! // Run at 60 ticks per simulated second
//! sim.run(6000, 1.0 / 60.0);
//!
//! println!("Vesicles left: {}", sim.vesicle_count());
//! println!("Free monomers: {}", sim.monomer_count());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use protosoup::Config;
//!
//! let mut config = Config::default();
//! config.entities.total = 5000;
//! config.interaction.mechanical_event = 0.1;
//! ```

pub mod config;
pub mod entity;
pub mod grid;
pub mod interaction;
pub mod metrics;
pub mod motion;
pub mod world;

// Re-export main types
pub use config::Config;
pub use entity::{Behavior, Entity, EntityId, EntityStore, Kind, Shade};
pub use metrics::{MetricsRecorder, Snapshot, Summary};
pub use world::Simulation;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(ticks: u64, entities: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.entities.total = entities;

    let mut sim = Simulation::new(config);
    let initial_population = sim.population();

    let start = Instant::now();
    sim.run(ticks, 1.0 / 60.0);
    let elapsed = start.elapsed();

    BenchmarkResult {
        ticks,
        initial_population,
        final_population: sim.population(),
        final_vesicles: sim.vesicle_count(),
        elapsed_secs: elapsed.as_secs_f64(),
        ticks_per_second: ticks as f64 / elapsed.as_secs_f64(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub initial_population: usize,
    pub final_population: usize,
    pub final_vesicles: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(
            f,
            "Population: {} -> {} ({} vesicles)",
            self.initial_population, self.final_population, self.final_vesicles
        )?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let mut config = Config::default();
        config.entities.total = 300;
        let mut sim = Simulation::new(config);

        sim.run(100, 1.0 / 60.0);

        assert_eq!(sim.ticks, 100);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(50, 300);

        assert_eq!(result.ticks, 50);
        assert!(result.ticks_per_second > 0.0);
    }
}
