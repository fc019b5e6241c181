//! Body components and the `Body` aggregate the factory builds and the renderer reads.

use hecs::{Entity, EntityBuilder, World};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::spike::Spikes;
use super::vitals::Vitals;
use crate::constants::body::MIN_MASS;
use crate::genome::Genome;
use crate::math;

/// Spawn order; survivors keep theirs, newborns get larger ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Serial(pub u64);

/// Center of the body in tank pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Heading in turns and speed in pixels per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub angle: f64,
    pub speed: f64,
}

impl Velocity {
    pub fn new(angle: f64, speed: f64) -> Self {
        Self {
            angle: math::normalize_turns(angle),
            speed: speed.max(0.0),
        }
    }

    /// Velocity from a vector; speed is its length
    pub fn from_vector(vx: f64, vy: f64) -> Self {
        Self {
            angle: math::angle_of(vx, vy),
            speed: (vx * vx + vy * vy).sqrt(),
        }
    }

    /// Pixels per second along x and y
    pub fn vector(&self) -> (f64, f64) {
        math::polar(self.angle, self.speed)
    }
}

/// Radius of a body with the given mass: `floor(sqrt(mass / pi))`
pub fn radius_for_mass(mass: u32) -> f64 {
    (mass as f64 / PI).sqrt().floor()
}

/// Mass with its derived radius. Mass never drops below `MIN_MASS`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass {
    pub mass: u32,
    pub radius: f64,
}

impl Mass {
    pub fn new(mass: u32) -> Self {
        let mass = mass.max(MIN_MASS);
        Self {
            mass,
            radius: radius_for_mass(mass),
        }
    }
}

impl Default for Mass {
    fn default() -> Self {
        Self::new(MIN_MASS)
    }
}

/// HSL fill color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl Fill {
    pub fn new(hue: u16, saturation: u8, lightness: u8) -> Self {
        Self {
            hue,
            saturation,
            lightness,
        }
    }

    /// CSS color string, e.g. `hsl(120, 80%, 50%)`
    pub fn css(&self) -> String {
        format!("hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// Per-frame working state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scratch {
    /// Predicted position before this frame's commit
    pub next_x: f64,
    pub next_y: f64,
    /// Partner of the most recent collision, used to suppress an immediate repeat.
    /// Entity handles are generational, so a removed partner never matches a newcomer.
    #[serde(skip)]
    pub last_collision: Option<Entity>,
    /// Marked for removal at the end of the frame
    pub is_inactive: bool,
}

impl Scratch {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            next_x: x,
            next_y: y,
            ..Default::default()
        }
    }
}

/// A complete body: what the factory returns and what snapshots hand to a renderer.
///
/// Inside the tank a body lives as separate components on one entity; organisms
/// carry a [`Genome`] component, motes do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub serial: Serial,
    pub dna: Option<Genome>,
    pub fill: Fill,
    pub position: Position,
    pub velocity: Velocity,
    pub mass: Mass,
    pub vitals: Vitals,
    pub spikes: Spikes,
    pub scratch: Scratch,
}

impl Body {
    pub fn is_mote(&self) -> bool {
        self.dna.is_none()
    }

    pub fn radius(&self) -> f64 {
        self.mass.radius
    }

    /// Hex DNA string; empty for motes
    pub fn dna_hex(&self) -> String {
        self.dna.as_ref().map(Genome::to_hex).unwrap_or_default()
    }

    /// Move the body (and its spikes) to a new center
    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.set_position(x, y);
        self
    }

    pub fn with_velocity(mut self, angle: f64, speed: f64) -> Self {
        self.velocity = Velocity::new(angle, speed);
        self
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Position::new(x, y);
        self.scratch.next_x = x;
        self.scratch.next_y = y;
        self.spikes.move_to(x, y);
    }

    /// True when the two circles overlap at their current positions
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = self.radius() + other.radius();
        math::distance_squared(self.position.x, self.position.y, other.position.x, other.position.y)
            < reach * reach
    }

    /// Add this body to the world as components
    pub fn spawn_into(self, world: &mut World) -> Entity {
        let mut builder = EntityBuilder::new();
        builder.add_bundle((
            self.serial,
            self.position,
            self.velocity,
            self.mass,
            self.fill,
            self.spikes,
            self.vitals,
            self.scratch,
        ));
        if let Some(dna) = self.dna {
            builder.add(dna);
        }
        world.spawn(builder.build())
    }

    /// Reassemble a body from an entity's components
    pub fn from_world(world: &World, entity: Entity) -> Option<Body> {
        let mut query = world.query_one::<BodyQuery<'_>>(entity).ok()?;
        let body = query.get().map(body_from_item);
        body
    }
}

/// Component set that makes up a body
pub type BodyQuery<'a> = (
    &'a Serial,
    &'a Position,
    &'a Velocity,
    &'a Mass,
    &'a Fill,
    &'a Spikes,
    &'a Vitals,
    &'a Scratch,
    Option<&'a Genome>,
);

/// Clone a queried component set into a `Body`
pub fn body_from_item(
    (serial, position, velocity, mass, fill, spikes, vitals, scratch, dna): (
        &Serial,
        &Position,
        &Velocity,
        &Mass,
        &Fill,
        &Spikes,
        &Vitals,
        &Scratch,
        Option<&Genome>,
    ),
) -> Body {
    Body {
        serial: *serial,
        dna: dna.cloned(),
        fill: *fill,
        position: *position,
        velocity: *velocity,
        mass: *mass,
        vitals: *vitals,
        spikes: spikes.clone(),
        scratch: *scratch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_from_mass() {
        assert_eq!(radius_for_mass(315), 10.0);
        assert_eq!(radius_for_mass(314), 9.0);
        assert_eq!(Mass::new(0).mass, MIN_MASS);
        assert!(Mass::new(0).radius >= 3.0);
    }

    #[test]
    fn test_velocity_vector() {
        let v = Velocity::new(0.0, 100.0);
        let (vx, vy) = v.vector();
        assert_eq!(vx, 100.0);
        assert!(vy.abs() < 1e-9);

        let back = Velocity::from_vector(-30.0, 0.0);
        assert_eq!(back.angle, 0.5);
        assert_eq!(back.speed, 30.0);

        assert_eq!(Velocity::new(1.25, -4.0), Velocity::new(0.25, 0.0));
    }

    #[test]
    fn test_fill_css() {
        assert_eq!(Fill::new(120, 80, 50).css(), "hsl(120, 80%, 50%)");
    }

    #[test]
    fn test_world_roundtrip() {
        let mut world = World::new();
        let body = Body {
            serial: Serial(4),
            dna: Some(Genome::new(vec![0xF0, 0x01])),
            fill: Fill::new(10, 20, 30),
            position: Position::new(5.0, 6.0),
            velocity: Velocity::new(0.5, 2.0),
            mass: Mass::new(100),
            vitals: Vitals::mote(10.0),
            spikes: Spikes::default(),
            scratch: Scratch::at(5.0, 6.0),
        };

        let entity = body.clone().spawn_into(&mut world);
        assert_eq!(Body::from_world(&world, entity), Some(body.clone()));
        assert!(world.get::<&Genome>(entity).is_ok());

        let mote = Body { dna: None, ..body };
        let entity = mote.clone().spawn_into(&mut world);
        let back = Body::from_world(&world, entity).unwrap();
        assert!(back.is_mote());
        assert_eq!(back.dna_hex(), "");
        assert!(world.get::<&Genome>(entity).is_err());
        assert_eq!(world.len(), 2);
    }
}
