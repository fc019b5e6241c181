//! Vitals - calorie state, upkeep and the alive/dead lifecycle

use serde::{Deserialize, Serialize};

use super::spike::Spikes;
use crate::config::TankConfig;
use crate::constants::vitals;

/// Calorie bookkeeping for one body.
///
/// `is_dead` is recomputed whenever calories change, but once a body dies it
/// stays dead: a corpse can be eaten, it cannot recover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub calories: f64,
    /// Calories burned per second just by existing
    pub upkeep: f64,
    pub dies_at: f64,
    pub spawns_at: f64,
    pub is_dead: bool,
}

impl Vitals {
    /// Vitals for a freshly built body of `mass` carrying `spikes`
    pub fn new(mass: u32, spikes: &Spikes, config: &TankConfig) -> Self {
        let mass = mass as f64;
        let mass_cost = mass.powf(vitals::MASS_UPKEEP_EXPONENT);
        let spike_total: f64 = spikes
            .iter()
            .map(|s| vitals::BASE_SPIKE_UPKEEP + s.length as f64 * vitals::SPIKE_LENGTH_UPKEEP)
            .sum();
        let spike_cost = if mass_cost > 0.0 {
            spike_total / mass_cost * vitals::SPIKE_UPKEEP_ADJUSTMENT
        } else {
            0.0
        };

        let calories = (mass * vitals::START_FACTOR).floor();
        let dies_at = (mass * vitals::DEATH_FACTOR).floor();

        Self {
            calories,
            upkeep: ((mass_cost + spike_cost) * config.temperature_factor()).floor(),
            dies_at,
            spawns_at: (mass * vitals::SPAWN_FACTOR).floor(),
            is_dead: calories < dies_at,
        }
    }

    /// Vitals for a mote: no upkeep, never reproduces, only dies by being eaten
    pub fn mote(calories: f64) -> Self {
        Self {
            calories,
            upkeep: 0.0,
            dies_at: 0.0,
            spawns_at: f64::INFINITY,
            is_dead: false,
        }
    }

    /// Set calories directly
    pub fn set_calories(&mut self, calories: f64) {
        self.calories = calories.max(0.0);
        self.is_dead = self.is_dead || self.calories < self.dies_at;
    }

    /// Remove up to `amount` calories, returning how many were actually removed
    pub fn drain_calories(&mut self, amount: f64) -> f64 {
        let drained = amount.max(0.0).min(self.calories);
        self.set_calories(self.calories - drained);
        drained
    }

    /// Credit calories, e.g. what a spike drained from its target
    pub fn feed(&mut self, amount: f64) {
        self.set_calories(self.calories + amount.max(0.0));
    }

    /// Alive and stocked enough to split
    pub fn ready_to_spawn(&self) -> bool {
        !self.is_dead && self.calories >= self.spawns_at
    }

    /// Out of calories entirely; the body is removed from the tank
    pub fn is_spent(&self) -> bool {
        self.calories <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::spike::spawn_spike;

    fn vitals(calories: f64, dies_at: f64) -> Vitals {
        Vitals {
            calories,
            upkeep: 0.0,
            dies_at,
            spawns_at: 1000.0,
            is_dead: calories < dies_at,
        }
    }

    #[test]
    fn test_drain_is_clamped() {
        let mut v = vitals(100.0, 50.0);
        assert_eq!(v.drain_calories(200.0), 100.0);
        assert_eq!(v.calories, 0.0);
        assert!(v.is_dead);
        assert!(v.is_spent());
    }

    #[test]
    fn test_partial_drain() {
        let mut v = vitals(100.0, 50.0);
        assert_eq!(v.drain_calories(30.0), 30.0);
        assert_eq!(v.calories, 70.0);
        assert!(!v.is_dead);
        assert_eq!(v.drain_calories(-5.0), 0.0);
    }

    #[test]
    fn test_death_is_one_way() {
        let mut v = vitals(100.0, 50.0);
        v.drain_calories(60.0);
        assert!(v.is_dead);
        v.feed(500.0);
        assert!(v.is_dead);
        assert!(!v.ready_to_spawn());
    }

    #[test]
    fn test_thresholds_from_mass() {
        let config = TankConfig::default();
        let v = Vitals::new(100, &Spikes::default(), &config);
        assert_eq!(v.dies_at, 100.0);
        assert_eq!(v.calories, 600.0);
        assert_eq!(v.spawns_at, 1200.0);
        assert!(v.dies_at < v.calories && v.calories < v.spawns_at);
        assert!(!v.is_dead);
        // 100^0.66 = 20.89...
        assert_eq!(v.upkeep, 20.0);
    }

    #[test]
    fn test_spikes_raise_upkeep() {
        let config = TankConfig::default();
        let spiked = Spikes(vec![spawn_spike(5.0, 0.0, 20, &config)]);
        let bare = Vitals::new(100, &Spikes::default(), &config);
        let armed = Vitals::new(100, &spiked, &config);
        assert!(armed.upkeep > bare.upkeep);
    }

    #[test]
    fn test_mote_vitals() {
        let mut v = Vitals::mote(50.0);
        assert_eq!(v.upkeep, 0.0);
        assert!(!v.ready_to_spawn());
        v.set_calories(1e12);
        assert!(!v.ready_to_spawn());
    }
}
