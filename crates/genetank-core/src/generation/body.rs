//! Body factory - random organisms, offspring and motes

use rand::Rng;

use crate::components::*;
use crate::config::TankConfig;
use crate::constants::{body as body_consts, motes, vitals as vitals_consts};
use crate::genome::{create_genome, read_genome, replicate_genome, Genome};
use crate::math;

/// Build a body from a genome: mass, spikes and vitals, at the origin and at rest
pub fn build_body(genome: Genome, config: &TankConfig) -> Body {
    let commands = read_genome(&genome);
    let mass = Mass::new(commands.mass);
    let spikes = Spikes::from_commands(mass.radius, &commands.spikes, config);
    let vitals = Vitals::new(mass.mass, &spikes, config);

    Body {
        serial: Serial::default(),
        dna: Some(genome),
        fill: Fill::default(),
        position: Position::default(),
        velocity: Velocity::default(),
        mass,
        vitals,
        spikes,
        scratch: Scratch::default(),
    }
}

/// A fresh organism from a random genome, placed and moving randomly
pub fn get_random_body(config: &TankConfig, rng: &mut impl Rng) -> Body {
    let genome = create_genome(config, rng);
    let mut body = build_body(genome, config);

    body.fill = random_fill(rng);
    let (x, y) = random_position(body.radius(), config, rng);
    let angle = rng.gen::<f64>();
    let speed = rng.gen::<f64>() * config.starting_energy / body.mass.mass as f64;

    body.with_position(x, y).with_velocity(angle, speed)
}

/// Offspring of `parent`, launched along `angle` (turns).
///
/// The child takes half the parent's current calories and starts two of its own
/// radii away from the parent's center so the pair do not overlap on birth.
pub fn replicate_parent(parent: &Body, angle: f64, config: &TankConfig, rng: &mut impl Rng) -> Body {
    let genome = parent.dna.as_ref().map(replicate_genome).unwrap_or_default();
    let mut child = build_body(genome, config);

    child.fill = parent.fill;
    child.vitals.set_calories(parent.vitals.calories / 2.0);

    let (dx, dy) = math::polar(angle, 2.0 * child.radius());
    let bonus = rng.gen::<f64>() * config.reproduction_energy / child.mass.mass as f64;
    let speed = parent.velocity.speed + bonus;

    child
        .with_position(parent.position.x + dx, parent.position.y + dy)
        .with_velocity(angle, speed)
}

/// A spikeless, DNA-less food particle
pub fn spawn_mote(config: &TankConfig, rng: &mut impl Rng) -> Body {
    let mass = Mass::new(motes::MASS);
    let calories = (mass.mass as f64 * vitals_consts::START_FACTOR).floor();
    let (x, y) = random_position(mass.radius, config, rng);
    let angle = rng.gen::<f64>();
    let speed = rng.gen::<f64>() * motes::MAX_SPEED;

    Body {
        serial: Serial::default(),
        dna: None,
        fill: Fill::new(motes::HUE, motes::SATURATION, motes::LIGHTNESS),
        position: Position::default(),
        velocity: Velocity::default(),
        mass,
        vitals: Vitals::mote(calories),
        spikes: Spikes::default(),
        scratch: Scratch::default(),
    }
    .with_position(x, y)
    .with_velocity(angle, speed)
}

/// Random point that keeps a body of `radius` inside the tank
pub fn random_position(radius: f64, config: &TankConfig, rng: &mut impl Rng) -> (f64, f64) {
    // Interpolating never samples an empty range, even for an oversized body
    let x = math::lerp(radius, config.width - radius, rng.gen::<f64>());
    let y = math::lerp(radius, config.height - radius, rng.gen::<f64>());
    (x, y)
}

fn random_fill(rng: &mut impl Rng) -> Fill {
    Fill::new(
        rng.gen_range(0..body_consts::HUE_RANGE),
        body_consts::FILL_SATURATION,
        body_consts::FILL_LIGHTNESS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::body::MIN_MASS;
    use crate::math::seeded_rng;

    #[test]
    fn test_empty_genome_gets_min_mass() {
        let body = build_body(Genome::default(), &TankConfig::default());
        assert_eq!(body.mass.mass, MIN_MASS);
        assert!(body.spikes.is_empty());
        assert!(!body.is_mote());
    }

    #[test]
    fn test_random_bodies_fit_tank() {
        let config = TankConfig::default();
        let mut rng = seeded_rng(5);
        for _ in 0..50 {
            let body = get_random_body(&config, &mut rng);
            let r = body.radius();
            assert!(body.position.x >= r && body.position.x <= config.width - r);
            assert!(body.position.y >= r && body.position.y <= config.height - r);
            assert!(body.velocity.speed <= config.starting_energy / body.mass.mass as f64);
            assert!(body.velocity.angle >= 0.0 && body.velocity.angle < 1.0);
            // Spikes sorted longest first and placed around the body
            for pair in body.spikes.0.windows(2) {
                assert!(pair[0].length >= pair[1].length);
            }
            for spike in body.spikes.iter() {
                assert!((spike.tip().x - body.position.x - spike.tip_offset().x).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_replicate_parent() {
        let config = TankConfig::default();
        let mut rng = seeded_rng(8);
        let mut parent = get_random_body(&config, &mut rng).with_position(500.0, 400.0);
        parent.vitals.set_calories(5000.0);

        let child = replicate_parent(&parent, 0.25, &config, &mut rng);
        assert_eq!(child.dna, parent.dna);
        assert_eq!(child.fill, parent.fill);
        assert_eq!(child.mass, parent.mass);
        assert_eq!(child.vitals.calories, 2500.0);
        assert_eq!(child.velocity.angle, 0.25);
        assert!(child.velocity.speed >= parent.velocity.speed);

        // Two child radii straight "up" (screen y decreases)
        assert!((child.position.x - 500.0).abs() < 1e-9);
        assert!((child.position.y - (400.0 - 2.0 * child.radius())).abs() < 1e-9);
        for spike in child.spikes.iter() {
            assert!((spike.tip().y - child.position.y - spike.tip_offset().y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_spawn_mote() {
        let config = TankConfig::default();
        let mut rng = seeded_rng(2);
        let mote = spawn_mote(&config, &mut rng);
        assert!(mote.is_mote());
        assert!(mote.spikes.is_empty());
        assert_eq!(mote.mass.mass, motes::MASS);
        assert_eq!(mote.vitals.upkeep, 0.0);
        assert_eq!(mote.vitals.dies_at, 0.0);
        assert!(mote.vitals.spawns_at.is_infinite());
        assert!(mote.velocity.speed <= motes::MAX_SPEED);
    }
}
