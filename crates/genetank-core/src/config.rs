//! Tank configuration - the values a host supplies before and during a run.
//!
//! Derived values (drain scaling, mote capacity) are computed from the config
//! on demand, so changing a field takes effect on the next frame without any
//! cached state to refresh.
//!
//! ```
//! use genetank_core::config::TankConfig;
//!
//! let mut config = TankConfig::default();
//! config.temperature = 15.0;
//! assert!(config.validate().is_empty());
//! assert_eq!(config.temperature_factor(), 0.5);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::constants::{genes, motes, spikes, vitals};

/// Host-supplied simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TankConfig {
    /// Tank width in pixels
    pub width: f64,
    /// Tank height in pixels
    pub height: f64,
    /// Kinetic budget for freshly generated bodies; speed is `energy / mass` at most
    pub starting_energy: f64,
    /// Number of random bodies `Tank::populate` creates
    pub starting_body_count: u32,
    /// Ambient temperature; scales spike drain and upkeep (30 = reference)
    pub temperature: f64,
    /// Motes spawned per second while the tank is under capacity
    pub mote_spawn_rate: f64,
    /// Average number of genes in a generated genome
    pub average_gene_count: u32,
    /// Average number of data bytes per generated gene
    pub average_gene_size: u32,
    /// Kinetic budget for the speed bonus newborns get on top of the parent's speed
    pub reproduction_energy: f64,
    /// Seed for the simulation's random generator
    pub seed: u64,
}

impl Default for TankConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 800.0,
            starting_energy: 10_000.0,
            starting_body_count: 40,
            temperature: vitals::REFERENCE_TEMPERATURE,
            mote_spawn_rate: 4.0,
            average_gene_count: 10,
            average_gene_size: 12,
            reproduction_energy: 5_000.0,
            seed: 1,
        }
    }
}

impl TankConfig {
    /// Temperature relative to the reference, never negative
    pub fn temperature_factor(&self) -> f64 {
        self.temperature.max(0.0) / vitals::REFERENCE_TEMPERATURE
    }

    /// Base spike drain adjusted for the current temperature
    pub fn adjusted_base_drain(&self) -> f64 {
        spikes::BASE_DRAIN * self.temperature_factor()
    }

    /// How many bodies the tank holds before mote spawning stops
    pub fn mote_capacity(&self) -> usize {
        let mote_radius = crate::components::radius_for_mass(motes::MASS);
        let footprint = PI * mote_radius * mote_radius * motes::FOOTPRINT_SCALE;
        if footprint <= 0.0 {
            return 0;
        }
        (self.width.max(0.0) * self.height.max(0.0) / footprint).floor() as usize
    }

    /// Validate the configuration, returning all errors found.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            errors.push(ConfigError::InvalidTankSize {
                width: self.width,
                height: self.height,
            });
        }
        if !self.starting_energy.is_finite() || self.starting_energy < 0.0 {
            errors.push(ConfigError::NegativeEnergy(self.starting_energy));
        }
        if !self.reproduction_energy.is_finite() || self.reproduction_energy < 0.0 {
            errors.push(ConfigError::NegativeEnergy(self.reproduction_energy));
        }
        if !self.temperature.is_finite() {
            errors.push(ConfigError::InvalidTemperature(self.temperature));
        }
        if !self.mote_spawn_rate.is_finite() || self.mote_spawn_rate < 0.0 {
            errors.push(ConfigError::InvalidSpawnRate(self.mote_spawn_rate));
        }
        if self.average_gene_count == 0 {
            errors.push(ConfigError::EmptyGenes);
        }
        if self.average_gene_size == 0 {
            errors.push(ConfigError::EmptyGenes);
        }
        if self.average_gene_count > genes::MAX_AVERAGE
            || self.average_gene_size > genes::MAX_AVERAGE
        {
            errors.push(ConfigError::OversizedGenes {
                count: self.average_gene_count,
                size: self.average_gene_size,
            });
        }

        errors
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Tank dimensions must be positive and finite.
    InvalidTankSize { width: f64, height: f64 },
    /// An energy budget is negative or not finite.
    NegativeEnergy(f64),
    /// Temperature is not a finite number.
    InvalidTemperature(f64),
    /// Mote spawn rate is negative or not finite.
    InvalidSpawnRate(f64),
    /// Gene count or gene size averages to zero.
    EmptyGenes,
    /// Gene count or gene size average is above the supported bound.
    OversizedGenes { count: u32, size: u32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidTankSize { width, height } => {
                write!(f, "invalid tank size {}x{}", width, height)
            }
            ConfigError::NegativeEnergy(e) => write!(f, "energy budget must be >= 0, got {}", e),
            ConfigError::InvalidTemperature(t) => write!(f, "temperature must be finite, got {}", t),
            ConfigError::InvalidSpawnRate(r) => write!(f, "mote spawn rate must be >= 0, got {}", r),
            ConfigError::EmptyGenes => write!(f, "average gene count and size must be non-zero"),
            ConfigError::OversizedGenes { count, size } => write!(
                f,
                "average gene count and size must be <= {}, got {} and {}",
                genes::MAX_AVERAGE,
                count,
                size
            ),
        }
    }
}
