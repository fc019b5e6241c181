//! Interaction - pairwise broad phase, elastic collisions and spike drain
//!
//! Every ordered pair of bodies is checked each frame (O(n^2), no spatial index).
//! Bodies are copied into a frame-local arena ordered by serial, resolved there,
//! and written back once all pairs have been visited.

use hecs::{Entity, World};

use crate::components::{Mass, Position, Scratch, Serial, Spikes, Velocity, Vitals};
use crate::events::FrameEvent;
use crate::math;

/// Working copy of one body for the interaction pass
#[derive(Debug, Clone)]
pub struct Actor {
    pub entity: Entity,
    pub x: f64,
    pub y: f64,
    pub next_x: f64,
    pub next_y: f64,
    pub velocity: Velocity,
    pub mass: f64,
    pub radius: f64,
    pub vitals: Vitals,
    pub spikes: Spikes,
    pub last_collision: Option<Entity>,
}

impl Actor {
    fn repredict(&mut self, delay: f64) {
        let (vx, vy) = self.velocity.vector();
        self.next_x = self.x + vx * delay;
        self.next_y = self.y + vy * delay;
    }
}

/// Broad phase: `a` can reach `b` with its body or its longest spike.
///
/// Deliberately asymmetric; only the first body's spikes extend the reach.
pub fn can_interact(a: &Actor, b: &Actor) -> bool {
    let reach = a.radius + b.radius + a.spikes.longest();
    math::distance_squared(a.next_x, a.next_y, b.next_x, b.next_y) < reach * reach
}

fn overlapping(ax: f64, ay: f64, bx: f64, by: f64, reach: f64) -> bool {
    math::distance_squared(ax, ay, bx, by) < reach * reach
}

/// Unit vector from `a` toward `b`, preferring predicted centers
fn contact_normal(a: &Actor, b: &Actor) -> (f64, f64) {
    let candidates = [
        (b.next_x - a.next_x, b.next_y - a.next_y),
        (b.x - a.x, b.y - a.y),
    ];
    for (dx, dy) in candidates {
        let length = (dx * dx + dy * dy).sqrt();
        if length > 0.0 {
            return (dx / length, dy / length);
        }
    }
    (1.0, 0.0)
}

/// Resolve a physical collision between `a` and `b`; returns whether they bounced.
///
/// Only circles that overlap at their predicted positions and are closing on each
/// other bounce. A pair that bounced off each other last time and is still in
/// contact is left alone so it can drift apart instead of jittering.
pub fn collide(a: &mut Actor, b: &mut Actor, delay: f64) -> bool {
    let reach = a.radius + b.radius;
    if !overlapping(a.next_x, a.next_y, b.next_x, b.next_y, reach) {
        return false;
    }
    let mutual = a.last_collision == Some(b.entity) && b.last_collision == Some(a.entity);
    if mutual && overlapping(a.x, a.y, b.x, b.y, reach) {
        return false;
    }

    let (nx, ny) = contact_normal(a, b);
    let (avx, avy) = a.velocity.vector();
    let (bvx, bvy) = b.velocity.vector();
    let a_normal = avx * nx + avy * ny;
    let b_normal = bvx * nx + bvy * ny;
    if a_normal - b_normal <= 0.0 {
        // Already separating along the normal
        return false;
    }

    let total = a.mass + b.mass;
    let a_after = (a_normal * (a.mass - b.mass) + 2.0 * b.mass * b_normal) / total;
    let b_after = (b_normal * (b.mass - a.mass) + 2.0 * a.mass * a_normal) / total;

    // Tangential components are untouched; only the normal part changes
    a.velocity = Velocity::from_vector(avx + (a_after - a_normal) * nx, avy + (a_after - a_normal) * ny);
    b.velocity = Velocity::from_vector(bvx + (b_after - b_normal) * nx, bvy + (b_after - b_normal) * ny);
    a.repredict(delay);
    b.repredict(delay);
    a.last_collision = Some(b.entity);
    b.last_collision = Some(a.entity);
    true
}

/// True when spike `index` of `attacker` touches `target` at predicted positions
pub fn spike_hits(attacker: &Actor, index: usize, target: &Actor) -> bool {
    let Some(spike) = attacker.spikes.0.get(index) else {
        return false;
    };
    let tip = spike.tip_offset();
    let tip_x = attacker.next_x + tip.x;
    let tip_y = attacker.next_y + tip.y;
    let radius_sq = target.radius * target.radius;

    if (spike.length as f64) < 2.0 * target.radius {
        math::distance_squared(tip_x, tip_y, target.next_x, target.next_y) < radius_sq
    } else {
        // A long spike can pierce clean through; test the whole shaft
        math::segment_distance_squared(
            target.next_x,
            target.next_y,
            attacker.next_x,
            attacker.next_y,
            tip_x,
            tip_y,
        ) < radius_sq
    }
}

/// Let every spike of `attacker` feed on `target`
pub fn drain_spikes(attacker: &mut Actor, target: &mut Actor, delay: f64, events: &mut Vec<FrameEvent>) {
    if attacker.vitals.is_dead {
        return;
    }

    for index in 0..attacker.spikes.len() {
        if !spike_hits(attacker, index, target) {
            continue;
        }
        let amount = (attacker.spikes.0[index].drain * delay).floor();
        let was_dead = target.vitals.is_dead;
        let drained = target.vitals.drain_calories(amount);
        if drained <= 0.0 {
            continue;
        }
        attacker.vitals.feed(drained);
        events.push(FrameEvent::SpikeDrained {
            attacker: attacker.entity,
            target: target.entity,
            spike: index,
            amount: drained,
        });
        if !was_dead && target.vitals.is_dead {
            events.push(FrameEvent::Died { entity: target.entity });
        }
    }
}

/// Mutable references to two distinct arena slots
fn pair_mut(actors: &mut [Actor], i: usize, j: usize) -> (&mut Actor, &mut Actor) {
    if i < j {
        let (head, tail) = actors.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    } else {
        let (head, tail) = actors.split_at_mut(i);
        (&mut tail[0], &mut head[j])
    }
}

/// Run collisions and spike drain over every ordered pair of actors
pub fn interact_all(actors: &mut [Actor], delay: f64, events: &mut Vec<FrameEvent>) {
    for i in 0..actors.len() {
        for j in 0..actors.len() {
            if i == j {
                continue;
            }
            let (a, b) = pair_mut(actors, i, j);
            if !can_interact(a, b) {
                continue;
            }
            collide(a, b, delay);
            drain_spikes(a, b, delay, events);
        }
    }
}

/// Copy bodies into an arena ordered by serial
pub fn gather_actors(world: &World) -> Vec<Actor> {
    let mut ordered: Vec<(Serial, Actor)> = world
        .query::<(&Serial, &Position, &Velocity, &Mass, &Vitals, &Spikes, &Scratch)>()
        .iter()
        .map(|(entity, (serial, position, velocity, mass, vitals, spikes, scratch))| {
            let actor = Actor {
                entity,
                x: position.x,
                y: position.y,
                next_x: scratch.next_x,
                next_y: scratch.next_y,
                velocity: *velocity,
                mass: mass.mass as f64,
                radius: mass.radius,
                vitals: *vitals,
                spikes: spikes.clone(),
                last_collision: scratch.last_collision,
            };
            (*serial, actor)
        })
        .collect();
    ordered.sort_by_key(|(serial, _)| *serial);
    ordered.into_iter().map(|(_, actor)| actor).collect()
}

/// Write resolved velocities, vitals and predictions back to the world
pub fn scatter_actors(world: &mut World, actors: Vec<Actor>) {
    for actor in actors {
        if let Ok((velocity, vitals, scratch)) =
            world.query_one_mut::<(&mut Velocity, &mut Vitals, &mut Scratch)>(actor.entity)
        {
            *velocity = actor.velocity;
            *vitals = actor.vitals;
            scratch.next_x = actor.next_x;
            scratch.next_y = actor.next_y;
            scratch.last_collision = actor.last_collision;
        }
    }
}

/// Collision and spike pass over the whole tank
pub fn interaction_system(world: &mut World, delay: f64, events: &mut Vec<FrameEvent>) {
    let mut actors = gather_actors(world);
    interact_all(&mut actors, delay, events);
    scatter_actors(world, actors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::spawn_spike;
    use crate::config::TankConfig;

    fn actor(world: &mut World, x: f64, y: f64, angle: f64, speed: f64, delay: f64) -> Actor {
        let mut actor = Actor {
            entity: world.spawn(()),
            x,
            y,
            next_x: x,
            next_y: y,
            velocity: Velocity::new(angle, speed),
            mass: 315.0,
            radius: 10.0,
            vitals: Vitals::mote(1000.0),
            spikes: Spikes::default(),
            last_collision: None,
        };
        actor.repredict(delay);
        actor
    }

    #[test]
    fn test_head_on_equal_masses_swap() {
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.0, 50.0, 0.1);
        let mut b = actor(&mut world, 120.0, 100.0, 0.5, 50.0, 0.1);

        assert!(collide(&mut a, &mut b, 0.1));
        assert!(math::turn_distance(a.velocity.angle, 0.5) < 1e-9);
        assert!(math::turn_distance(b.velocity.angle, 0.0) < 1e-9);
        assert!((a.velocity.speed - 50.0).abs() < 1e-9);
        assert!((b.velocity.speed - 50.0).abs() < 1e-9);
        assert_eq!(a.last_collision, Some(b.entity));
        assert_eq!(b.last_collision, Some(a.entity));

        // The reverse visit in the same frame sees them separating
        assert!(!collide(&mut b, &mut a, 0.1));
    }

    #[test]
    fn test_momentum_conserved() {
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.05, 80.0, 0.1);
        let mut b = actor(&mut world, 117.0, 104.0, 0.6, 20.0, 0.1);
        b.mass = 900.0;

        let momentum = |a: &Actor, b: &Actor| {
            let (ax, ay) = a.velocity.vector();
            let (bx, by) = b.velocity.vector();
            (ax * a.mass + bx * b.mass, ay * a.mass + by * b.mass)
        };
        let before = momentum(&a, &b);
        assert!(collide(&mut a, &mut b, 0.1));
        let after = momentum(&a, &b);
        // Table trig rounds angles, so allow a small tolerance
        let scale = a.mass * 80.0 + b.mass * 20.0;
        assert!((before.0 - after.0).abs() < 0.005 * scale);
        assert!((before.1 - after.1).abs() < 0.005 * scale);
    }

    #[test]
    fn test_resting_partners_do_not_rebounce() {
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.0, 10.0, 0.1);
        let mut b = actor(&mut world, 115.0, 100.0, 0.5, 10.0, 0.1);
        a.last_collision = Some(b.entity);
        b.last_collision = Some(a.entity);
        assert!(!collide(&mut a, &mut b, 0.1));

        // Same geometry with no shared history does bounce
        a.last_collision = None;
        assert!(collide(&mut a, &mut b, 0.1));
    }

    #[test]
    fn test_far_apart_never_interact() {
        let mut world = World::new();
        let a = actor(&mut world, 100.0, 100.0, 0.0, 10.0, 0.1);
        let b = actor(&mut world, 300.0, 100.0, 0.5, 10.0, 0.1);
        assert!(!can_interact(&a, &b));
    }

    #[test]
    fn test_spike_reach_is_asymmetric() {
        let config = TankConfig::default();
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.0, 0.0, 0.1);
        let b = actor(&mut world, 125.0, 100.0, 0.0, 0.0, 0.1);
        a.spikes = Spikes(vec![spawn_spike(10.0, 0.0, 8, &config)]);

        assert!(can_interact(&a, &b));
        assert!(!can_interact(&b, &a));
        assert!(spike_hits(&a, 0, &b));
    }

    #[test]
    fn test_drain_feeds_attacker() {
        let config = TankConfig::default();
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.0, 0.0, 0.1);
        let mut b = actor(&mut world, 125.0, 100.0, 0.0, 0.0, 0.1);
        a.spikes = Spikes(vec![spawn_spike(10.0, 0.0, 8, &config)]);
        b.vitals = Vitals::mote(100.0);

        let mut events = Vec::new();
        drain_spikes(&mut a, &mut b, 0.1, &mut events);

        // drain(8) = ceil(2000 / sqrt(8)) = 708, 70 per 100ms
        assert_eq!(b.vitals.calories, 30.0);
        assert_eq!(a.vitals.calories, 1070.0);
        assert_eq!(
            events,
            vec![FrameEvent::SpikeDrained {
                attacker: a.entity,
                target: b.entity,
                spike: 0,
                amount: 70.0,
            }]
        );

        // Only what is left can be taken
        events.clear();
        drain_spikes(&mut a, &mut b, 0.1, &mut events);
        assert_eq!(b.vitals.calories, 0.0);
        assert_eq!(a.vitals.calories, 1100.0);
    }

    #[test]
    fn test_dead_attacker_does_not_feed() {
        let config = TankConfig::default();
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.0, 0.0, 0.1);
        let mut b = actor(&mut world, 125.0, 100.0, 0.0, 0.0, 0.1);
        a.spikes = Spikes(vec![spawn_spike(10.0, 0.0, 8, &config)]);
        a.vitals.is_dead = true;

        let mut events = Vec::new();
        drain_spikes(&mut a, &mut b, 0.1, &mut events);
        assert!(events.is_empty());
        assert_eq!(b.vitals.calories, 1000.0);
    }

    #[test]
    fn test_long_spike_pierces_through() {
        let config = TankConfig::default();
        let mut world = World::new();
        let mut a = actor(&mut world, 100.0, 100.0, 0.0, 0.0, 0.1);
        // Tip at 100 + 10 + 40 = 150, well past the target's far edge at 135
        let b = actor(&mut world, 125.0, 100.0, 0.0, 0.0, 0.1);
        a.spikes = Spikes(vec![spawn_spike(10.0, 0.0, 40, &config)]);
        assert!(spike_hits(&a, 0, &b));
    }
}
