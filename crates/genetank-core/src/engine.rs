//! Tank engine - owns the world and runs the fixed-order frame pipeline

use hecs::{Entity, World};

use crate::components::*;
use crate::config::TankConfig;
use crate::constants::physics::REPRODUCTION_ANGLE;
use crate::events::{FrameEvent, FrameReport};
use crate::generation::{get_random_body, replicate_parent, separate_bodies, spawn_mote};
use crate::genome::Genome;
use crate::math::{seeded_rng, TankRng};
use crate::systems::*;

/// A running tank: bodies, configuration and the generator every random draw comes from
pub struct Tank {
    /// ECS world holding one entity per body
    pub world: World,
    pub(crate) config: TankConfig,
    pub(crate) rng: TankRng,
    pub(crate) tick: u64,
    pub(crate) next_serial: u64,
}

impl Tank {
    /// Create an empty tank seeded from `config.seed`
    pub fn new(config: TankConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Self {
            world: World::new(),
            config,
            rng,
            tick: 0,
            next_serial: 0,
        }
    }

    pub fn config(&self) -> &TankConfig {
        &self.config
    }

    /// Replace the configuration. Bodies already in the tank keep the upkeep and
    /// spike drain they were built with; new bodies and mote spawning use the new values.
    pub fn set_config(&mut self, config: TankConfig) {
        self.config = config;
    }

    /// The tank's random generator, for callers building bodies themselves
    pub fn rng_mut(&mut self) -> &mut TankRng {
        &mut self.rng
    }

    /// Frames simulated so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Fill the tank with `starting_body_count` random, non-overlapping bodies
    pub fn populate(&mut self) -> Vec<Entity> {
        let count = self.config.starting_body_count as usize;
        let mut bodies: Vec<Body> = (0..count)
            .map(|_| get_random_body(&self.config, &mut self.rng))
            .collect();
        separate_bodies(&mut bodies, &self.config, &mut self.rng);

        let entities: Vec<Entity> = bodies.into_iter().map(|body| self.spawn(body)).collect();
        log::info!(
            "Populated tank {}x{} with {} bodies",
            self.config.width,
            self.config.height,
            entities.len()
        );
        entities
    }

    /// Add a body, giving it the next serial and fresh per-frame state
    pub fn spawn(&mut self, mut body: Body) -> Entity {
        body.serial = Serial(self.next_serial);
        self.next_serial += 1;
        body.scratch = Scratch::at(body.position.x, body.position.y);
        body.spikes.move_to(body.position.x, body.position.y);
        body.spawn_into(&mut self.world)
    }

    /// Advance the tank by one frame spanning `start_ms..stop_ms` of host time.
    ///
    /// The elapsed time is clamped to [`MAX_DELAY`](crate::constants::physics::MAX_DELAY)
    /// so a stalled host never produces a huge step.
    pub fn simulate_frame(&mut self, start_ms: f64, stop_ms: f64) -> FrameReport {
        let delay = frame_delay(start_ms, stop_ms);
        self.tick += 1;
        let mut report = FrameReport::new(self.tick, delay);

        predict_system(&mut self.world, delay);
        wall_bounce_system(&mut self.world, &self.config, delay);
        interaction_system(&mut self.world, delay, &mut report.events);
        commit_system(&mut self.world);
        upkeep_system(&mut self.world, delay, &mut report.events);

        let parents = lifecycle_system(&mut self.world);
        let mut litters = Vec::with_capacity(parents.len());
        for parent in parents {
            if let Some(body) = Body::from_world(&self.world, parent) {
                let children = self.offspring(&body);
                litters.push((parent, children));
            }
        }

        for entity in inactive_bodies(&self.world) {
            if self.world.despawn(entity).is_ok() {
                report.events.push(FrameEvent::Removed { entity });
            }
        }

        for (parent, [first, second]) in litters {
            let children = [self.spawn(first), self.spawn(second)];
            report.events.push(FrameEvent::Reproduced { parent, children });
        }

        let motes = motes_to_spawn(&self.config, delay, self.body_count(), &mut self.rng);
        for _ in 0..motes {
            let mote = spawn_mote(&self.config, &mut self.rng);
            let entity = self.spawn(mote);
            report.events.push(FrameEvent::MoteSpawned { entity });
        }

        log::debug!(
            "Frame {}: {:.3}s, {} bodies, {} born, {} removed, {} motes, {:.0} calories drained",
            report.tick,
            delay,
            self.body_count(),
            report.births(),
            report.removals(),
            report.motes_spawned(),
            report.calories_drained()
        );
        report
    }

    /// Two children of `parent`, launched either side of its heading
    fn offspring(&mut self, parent: &Body) -> [Body; 2] {
        let heading = parent.velocity.angle;
        [
            replicate_parent(parent, heading + REPRODUCTION_ANGLE, &self.config, &mut self.rng),
            replicate_parent(parent, heading - REPRODUCTION_ANGLE, &self.config, &mut self.rng),
        ]
    }

    /// Snapshot of every body, in spawn order
    pub fn bodies(&self) -> Vec<Body> {
        let mut bodies: Vec<Body> = self
            .world
            .query::<BodyQuery<'_>>()
            .iter()
            .map(|(_, item)| body_from_item(item))
            .collect();
        bodies.sort_by_key(|body| body.serial);
        bodies
    }

    /// Entities paired with their snapshots, in spawn order
    pub fn entities(&self) -> Vec<(Entity, Body)> {
        let mut bodies: Vec<(Entity, Body)> = self
            .world
            .query::<BodyQuery<'_>>()
            .iter()
            .map(|(entity, item)| (entity, body_from_item(item)))
            .collect();
        bodies.sort_by_key(|(_, body)| body.serial);
        bodies
    }

    pub fn body(&self, entity: Entity) -> Option<Body> {
        Body::from_world(&self.world, entity)
    }

    pub fn body_count(&self) -> usize {
        self.world.query::<&Serial>().iter().count()
    }

    /// Bodies built from a genome
    pub fn organism_count(&self) -> usize {
        self.world.query::<(&Serial, &Genome)>().iter().count()
    }

    pub fn mote_count(&self) -> usize {
        self.body_count() - self.organism_count()
    }
}

impl Default for Tank {
    fn default() -> Self {
        Self::new(TankConfig::default())
    }
}
