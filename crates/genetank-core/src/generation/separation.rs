//! Startup placement - push overlapping bodies apart before the first frame

use rand::Rng;

use super::body::random_position;
use crate::components::Body;
use crate::config::TankConfig;
use crate::constants::physics::MAX_SEPARATION_ATTEMPTS;

/// Relocate overlapping bodies until none overlap or the attempt budget runs out.
///
/// The later body of each overlapping pair is moved to a fresh random position.
/// Returns `true` when the set ends up overlap-free. A set that is already
/// separated is left untouched.
pub fn separate_bodies(bodies: &mut [Body], config: &TankConfig, rng: &mut impl Rng) -> bool {
    for _ in 0..MAX_SEPARATION_ATTEMPTS {
        let Some(index) = first_overlap(bodies) else {
            return true;
        };
        let body = &mut bodies[index];
        let (x, y) = random_position(body.radius(), config, rng);
        body.set_position(x, y);
    }

    let separated = first_overlap(bodies).is_none();
    if !separated {
        log::warn!(
            "Gave up separating {} bodies after {} relocations",
            bodies.len(),
            MAX_SEPARATION_ATTEMPTS
        );
    }
    separated
}

/// Index of the later body in the first overlapping pair
fn first_overlap(bodies: &[Body]) -> Option<usize> {
    for (i, body) in bodies.iter().enumerate() {
        for (j, other) in bodies.iter().enumerate().skip(i + 1) {
            if body.overlaps(other) {
                return Some(j);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::build_body;
    use crate::genome::Genome;
    use crate::math::seeded_rng;

    fn blob(x: f64, y: f64) -> Body {
        build_body(Genome::new(vec![0xF0, 0xEF, 0xEF]), &TankConfig::default()).with_position(x, y)
    }

    #[test]
    fn test_separated_set_is_unchanged() {
        let config = TankConfig::default();
        let mut rng = seeded_rng(1);
        let mut bodies = vec![blob(100.0, 100.0), blob(200.0, 100.0), blob(300.0, 300.0)];
        let before = bodies.clone();

        assert!(separate_bodies(&mut bodies, &config, &mut rng));
        assert_eq!(bodies, before);
    }

    #[test]
    fn test_overlaps_are_resolved() {
        let config = TankConfig::default();
        let mut rng = seeded_rng(3);
        let mut bodies: Vec<Body> = (0..10).map(|_| blob(500.0, 400.0)).collect();

        assert!(separate_bodies(&mut bodies, &config, &mut rng));
        assert!(first_overlap(&bodies).is_none());
        // The first body of the pile never moves
        assert_eq!(bodies[0].position.x, 500.0);
        for body in &bodies {
            for spike in body.spikes.iter() {
                assert!((spike.tip().x - body.position.x - spike.tip_offset().x).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_impossible_packing_gives_up() {
        let config = TankConfig {
            width: 8.0,
            height: 8.0,
            ..Default::default()
        };
        let mut rng = seeded_rng(4);
        let mut bodies = vec![blob(4.0, 4.0), blob(4.0, 4.0)];
        assert!(!separate_bodies(&mut bodies, &config, &mut rng));
    }
}
