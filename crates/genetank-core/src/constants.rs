//! Simulation constants - gene bytes, spike and vitals tuning, mote and physics limits.
//!
//! Anything a player might want to tweak lives in [`crate::config::TankConfig`]
//! instead; these are the fixed rules of the tank.

pub mod genes {
    /// Bytes at or above this value start a new gene
    pub const CONTROL_THRESHOLD: u8 = 0xF0;
    /// Gene that adds the popcount of its data bytes to body mass
    pub const SIZE: u8 = 0xF0;
    /// Gene that grows one spike, two bits per unit of length
    pub const SPIKE: u8 = 0xF1;
    /// Number of recognized gene kinds, counted up from `CONTROL_THRESHOLD`
    pub const KNOWN_KINDS: u8 = 2;
    /// Bits of spike gene data per unit of spike length
    pub const BITS_PER_SPIKE_LENGTH: u32 = 2;
    /// Largest data byte value
    pub const MAX_DATA_BYTE: u8 = CONTROL_THRESHOLD - 1;
    /// Upper bound on the configured average gene count and gene size
    pub const MAX_AVERAGE: u32 = 1024;
}

pub mod body {
    /// Floor applied to decoded mass so every body has a drawable radius
    pub const MIN_MASS: u32 = 32;
    /// Hue range used for random fills
    pub const HUE_RANGE: u16 = 360;
    pub const FILL_SATURATION: u8 = 80;
    pub const FILL_LIGHTNESS: u8 = 50;
}

pub mod spikes {
    /// Drain per second of a length-1 spike at the reference temperature
    pub const BASE_DRAIN: f64 = 2000.0;
    /// Longer spikes drain less: `drain = base / length^exponent`
    pub const DRAIN_EXPONENT: f64 = 0.5;
    /// Half the width of a spike's base, in pixels
    pub const HALF_WIDTH: f64 = 2.0;
}

pub mod vitals {
    /// Upkeep grows with `mass^MASS_UPKEEP_EXPONENT`
    pub const MASS_UPKEEP_EXPONENT: f64 = 0.66;
    /// Flat upkeep per spike
    pub const BASE_SPIKE_UPKEEP: f64 = 10.0;
    /// Additional upkeep per unit of spike length
    pub const SPIKE_LENGTH_UPKEEP: f64 = 1.0;
    pub const SPIKE_UPKEEP_ADJUSTMENT: f64 = 4.0;
    /// Calories per unit mass below which a body is dead
    pub const DEATH_FACTOR: f64 = 1.0;
    /// Calories per unit mass a fresh body starts with
    pub const START_FACTOR: f64 = 6.0;
    /// Calories per unit mass at which a body reproduces
    pub const SPAWN_FACTOR: f64 = 12.0;
    /// Temperature at which drain and upkeep are unscaled
    pub const REFERENCE_TEMPERATURE: f64 = 30.0;
}

pub mod motes {
    pub const MASS: u32 = 64;
    pub const MAX_SPEED: f64 = 8.0;
    /// Tank area per mote slot, in multiples of a mote's own area
    pub const FOOTPRINT_SCALE: f64 = 40.0;
    pub const HUE: u16 = 60;
    pub const SATURATION: u8 = 40;
    pub const LIGHTNESS: u8 = 70;
}

pub mod physics {
    /// Longest frame the integrator will simulate, in seconds
    pub const MAX_DELAY: f64 = 0.1;
    /// Heading offset of each child from the parent, in turns
    pub const REPRODUCTION_ANGLE: f64 = 0.125;
    /// Relocations `separate_bodies` may perform before giving up
    pub const MAX_SEPARATION_ATTEMPTS: usize = 1000;
}
