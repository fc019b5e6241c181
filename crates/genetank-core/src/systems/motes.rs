//! Mote spawning - how many food particles appear this frame

use rand::Rng;

use crate::config::TankConfig;

/// Number of motes to add this frame.
///
/// `rate * delay` whole motes are guaranteed and the fractional remainder is the
/// chance of one more. Nothing spawns once `population` reaches the tank's capacity.
pub fn motes_to_spawn(config: &TankConfig, delay: f64, population: usize, rng: &mut impl Rng) -> usize {
    let room = config.mote_capacity().saturating_sub(population);
    if room == 0 {
        return 0;
    }

    let expected = (config.mote_spawn_rate * delay).max(0.0);
    let whole = expected.floor();
    let mut count = whole as usize;
    if rng.gen::<f64>() < expected - whole {
        count += 1;
    }
    count.min(room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::seeded_rng;

    #[test]
    fn test_whole_rate_is_exact() {
        let config = TankConfig {
            mote_spawn_rate: 10.0,
            ..Default::default()
        };
        let mut rng = seeded_rng(1);
        for _ in 0..20 {
            assert_eq!(motes_to_spawn(&config, 0.1, 0, &mut rng), 1);
        }
        assert_eq!(motes_to_spawn(&config, 0.0, 0, &mut rng), 0);
    }

    #[test]
    fn test_fractional_rate_averages_out() {
        let config = TankConfig {
            mote_spawn_rate: 4.0,
            ..Default::default()
        };
        let mut rng = seeded_rng(2);
        let total: usize = (0..10_000).map(|_| motes_to_spawn(&config, 0.1, 0, &mut rng)).sum();
        // 0.4 per frame
        assert!((3_700..4_300).contains(&total), "got {}", total);
    }

    #[test]
    fn test_capacity_caps_spawns() {
        let config = TankConfig {
            mote_spawn_rate: 1000.0,
            ..Default::default()
        };
        let capacity = config.mote_capacity();
        let mut rng = seeded_rng(3);
        assert_eq!(motes_to_spawn(&config, 0.1, capacity, &mut rng), 0);
        assert_eq!(motes_to_spawn(&config, 0.1, capacity - 3, &mut rng), 3);
    }
}
