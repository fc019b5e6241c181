//! Lifecycle - passive upkeep, death and marking bodies for removal or reproduction

use hecs::{Entity, World};

use crate::components::{Scratch, Serial, Vitals};
use crate::events::FrameEvent;

/// Burn each living body's upkeep for `delay` seconds
pub fn upkeep_system(world: &mut World, delay: f64, events: &mut Vec<FrameEvent>) {
    for (entity, vitals) in world.query_mut::<&mut Vitals>() {
        if vitals.is_dead {
            continue;
        }
        vitals.drain_calories(vitals.upkeep * delay);
        if vitals.is_dead {
            events.push(FrameEvent::Died { entity });
        }
    }
}

/// Mark spent bodies and ready parents inactive.
///
/// Returns the parents, ordered by serial, so the caller can spawn their children.
pub fn lifecycle_system(world: &mut World) -> Vec<Entity> {
    let mut parents: Vec<(Serial, Entity)> = Vec::new();

    for (entity, (serial, vitals, scratch)) in world.query_mut::<(&Serial, &Vitals, &mut Scratch)>() {
        if vitals.is_spent() {
            scratch.is_inactive = true;
        } else if vitals.ready_to_spawn() {
            scratch.is_inactive = true;
            parents.push((*serial, entity));
        }
    }

    parents.sort_by_key(|(serial, _)| *serial);
    parents.into_iter().map(|(_, entity)| entity).collect()
}

/// Bodies marked inactive this frame, ordered by serial
pub fn inactive_bodies(world: &World) -> Vec<Entity> {
    let mut inactive: Vec<(Serial, Entity)> = world
        .query::<(&Serial, &Scratch)>()
        .iter()
        .filter(|(_, (_, scratch))| scratch.is_inactive)
        .map(|(entity, (serial, _))| (*serial, entity))
        .collect();
    inactive.sort_by_key(|(serial, _)| *serial);
    inactive.into_iter().map(|(_, entity)| entity).collect()
}
