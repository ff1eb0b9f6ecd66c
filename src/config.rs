//! Configuration system for the PROTOSOUP simulation.
//!
//! Supports YAML configuration files with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub entities: EntityConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// World/environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Width of the simulation area in world units
    pub width: f32,
    /// Height of the simulation area in world units
    pub height: f32,
    /// Number of partition columns
    pub grid_width: usize,
    /// Number of partition rows
    pub grid_height: usize,
}

/// Population seeding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Total number of entities at start (1% vesicles, 99% monomers)
    pub total: usize,
    /// Lower bound of the seeded vesicle radius band
    pub vesicle_radius_min: i32,
    /// Upper bound (exclusive) of the seeded vesicle radius band
    pub vesicle_radius_max: i32,
    /// Radius below which a preyed-on vesicle dies
    pub min_viable_radius: f32,
}

/// Thermal drift and buoyancy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsConfig {
    /// Cold threshold band; entities colder than a draw from it rise
    pub temp_low_min: i32,
    pub temp_low_max: i32,
    /// Hot threshold band; entities hotter than a draw from it sink
    pub temp_high_min: i32,
    pub temp_high_max: i32,
    /// Lateral drift force magnitude band
    pub drift_min: i32,
    pub drift_max: i32,
    /// Vertical nudge magnitude (upper bound of the rise/sink draw)
    pub rise: i32,
}

/// Absorption, predation and fission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Radius gained per absorbed monomer
    pub growth_per_monomer: f32,
    /// Offset spread window for newly absorbed monomers, scaled by radius
    pub growth_factor: f32,
    /// Radius transferred per second while one vesicle preys on another
    pub absorb_rate: f32,
    /// Per-tick probability of a mechanical fission event
    pub mechanical_event: f32,
    /// Lower bound of the fission radius gate band
    pub fission_radius_min: i32,
    /// Upper bound (exclusive) of the fission radius gate band
    pub fission_radius_max: i32,
    /// Upper bound of the monomer transfer draw during predation
    pub monomer_move_rate: i32,
}

/// Metrics and logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Simulated seconds between metric snapshots
    pub metrics_period: f32,
    /// Ticks between summary lines in the CLI
    pub summary_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            entities: EntityConfig::default(),
            physics: PhysicsConfig::default(),
            interaction: InteractionConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            grid_width: 10,
            grid_height: 8,
        }
    }
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            total: 2000,
            vesicle_radius_min: 10,
            vesicle_radius_max: 25,
            min_viable_radius: 1.0,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            temp_low_min: 5,
            temp_low_max: 25,
            temp_high_min: 65,
            temp_high_max: 75,
            drift_min: 200,
            drift_max: 350,
            rise: 5,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            growth_per_monomer: 0.25,
            growth_factor: 1.5,
            absorb_rate: 2.5,
            mechanical_event: 0.2,
            fission_radius_min: 50,
            fission_radius_max: 75,
            monomer_move_rate: 5,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            metrics_period: 1.0,
            summary_interval: 60,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.world.width < 1.0 || self.world.height < 1.0 {
            return Err("world bounds must be at least 1x1".to_string());
        }
        if self.world.grid_width == 0 || self.world.grid_height == 0 {
            return Err("grid resolution must be at least 1x1".to_string());
        }
        if self.entities.total == 0 {
            return Err("total entity count must be > 0".to_string());
        }
        if self.entities.vesicle_radius_min >= self.entities.vesicle_radius_max {
            return Err("vesicle radius band must be non-empty".to_string());
        }
        if self.physics.temp_low_min >= self.physics.temp_low_max
            || self.physics.temp_high_min >= self.physics.temp_high_max
        {
            return Err("temperature bands must be non-empty".to_string());
        }
        if self.physics.drift_min >= self.physics.drift_max {
            return Err("drift band must be non-empty".to_string());
        }
        if self.physics.rise < 1 {
            return Err("rise must be >= 1".to_string());
        }
        if !(0.0..=1.0).contains(&self.interaction.mechanical_event) {
            return Err("mechanical_event must be a probability in [0, 1]".to_string());
        }
        if self.interaction.fission_radius_min >= self.interaction.fission_radius_max {
            return Err("fission radius band must be non-empty".to_string());
        }
        if self.interaction.growth_factor <= 0.0 {
            return Err("growth_factor must be > 0".to_string());
        }
        if self.interaction.monomer_move_rate < 1 {
            return Err("monomer_move_rate must be >= 1".to_string());
        }
        if self.logging.metrics_period <= 0.0 {
            return Err("metrics_period must be > 0".to_string());
        }
        Ok(())
    }
}
