//! Movement - position prediction, wall bounces and committing the frame's moves

use hecs::World;

use crate::components::{Mass, Position, Scratch, Spikes, Velocity};
use crate::config::TankConfig;
use crate::constants::physics::MAX_DELAY;
use crate::math;

/// Outward direction of each wall, in turns
const LEFT_WALL: f64 = 0.5;
const RIGHT_WALL: f64 = 0.0;
const TOP_WALL: f64 = 0.25;
const BOTTOM_WALL: f64 = 0.75;

/// Seconds covered by a frame, clamped to `[0, MAX_DELAY]`
pub fn frame_delay(start_ms: f64, stop_ms: f64) -> f64 {
    let seconds = (stop_ms - start_ms) / 1000.0;
    if seconds.is_nan() {
        return 0.0;
    }
    seconds.clamp(0.0, MAX_DELAY)
}

/// Where a body at `position` ends up after `delay` seconds
pub fn predict(position: &Position, velocity: &Velocity, delay: f64) -> (f64, f64) {
    let (vx, vy) = velocity.vector();
    (position.x + vx * delay, position.y + vy * delay)
}

/// Fill in every body's predicted position
pub fn predict_system(world: &mut World, delay: f64) {
    for (_, (position, velocity, scratch)) in
        world.query_mut::<(&Position, &Velocity, &mut Scratch)>()
    {
        let (x, y) = predict(position, velocity, delay);
        scratch.next_x = x;
        scratch.next_y = y;
    }
}

/// Reflect an angle off a vertical wall
pub fn bounce_x(angle: f64) -> f64 {
    math::normalize_turns(0.5 - angle)
}

/// Reflect an angle off a horizontal wall
pub fn bounce_y(angle: f64) -> f64 {
    math::normalize_turns(1.0 - angle)
}

fn heading_toward(angle: f64, wall: f64) -> bool {
    math::turn_distance(angle, wall) < 0.25
}

/// New heading if the predicted position pushes the body through a wall it is
/// heading into, `None` if no wall is hit.
pub fn wall_bounce(angle: f64, next_x: f64, next_y: f64, radius: f64, config: &TankConfig) -> Option<f64> {
    let mut bounced = angle;

    if (next_x - radius < 0.0 && heading_toward(bounced, LEFT_WALL))
        || (next_x + radius > config.width && heading_toward(bounced, RIGHT_WALL))
    {
        bounced = bounce_x(bounced);
    }
    if (next_y - radius < 0.0 && heading_toward(bounced, TOP_WALL))
        || (next_y + radius > config.height && heading_toward(bounced, BOTTOM_WALL))
    {
        bounced = bounce_y(bounced);
    }

    (bounced != angle).then_some(bounced)
}

/// Bounce bodies off the tank walls, re-predicting any that turned
pub fn wall_bounce_system(world: &mut World, config: &TankConfig, delay: f64) {
    for (_, (position, velocity, mass, scratch)) in
        world.query_mut::<(&Position, &mut Velocity, &Mass, &mut Scratch)>()
    {
        let Some(angle) = wall_bounce(velocity.angle, scratch.next_x, scratch.next_y, mass.radius, config)
        else {
            continue;
        };

        *velocity = Velocity::new(angle, velocity.speed);
        let (x, y) = predict(position, velocity, delay);
        scratch.next_x = x;
        scratch.next_y = y;
        scratch.last_collision = None;
    }
}

/// Move every body (and its spikes) to its predicted position
pub fn commit_system(world: &mut World) {
    for (_, (position, spikes, scratch)) in
        world.query_mut::<(&mut Position, &mut Spikes, &Scratch)>()
    {
        position.x = scratch.next_x;
        position.y = scratch.next_y;
        spikes.move_to(position.x, position.y);
    }
}
