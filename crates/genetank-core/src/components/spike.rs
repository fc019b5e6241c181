//! Spike geometry - triangular footprint around a body and calorie drain rate

use serde::{Deserialize, Serialize};

use crate::config::TankConfig;
use crate::constants::spikes;
use crate::genome::SpikeCommand;
use crate::math;

/// 2D point or offset in tank pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn polar(angle: f64, distance: f64) -> Self {
        let (x, y) = math::polar(angle, distance);
        Self { x, y }
    }
}

/// A spike attached to a body. Offsets are fixed at spawn; points follow the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub length: u32,
    /// Calories per second removed from whatever the tip touches
    pub drain: f64,
    /// Tip, then the two base corners, relative to the body center
    pub offsets: [Point; 3],
    /// Tip, then the two base corners, in tank coordinates
    pub points: [Point; 3],
}

impl Spike {
    pub fn tip_offset(&self) -> Point {
        self.offsets[0]
    }

    pub fn tip(&self) -> Point {
        self.points[0]
    }

    /// Place the spike around a body centered at `(x, y)`
    pub fn move_to(&mut self, x: f64, y: f64) {
        for (point, offset) in self.points.iter_mut().zip(self.offsets.iter()) {
            point.x = x + offset.x;
            point.y = y + offset.y;
        }
    }
}

/// Drain rate of a spike of the given length under the current config
pub fn spike_drain(length: u32, config: &TankConfig) -> f64 {
    let length = length.max(1) as f64;
    (config.adjusted_base_drain() / length.powf(spikes::DRAIN_EXPONENT)).ceil()
}

/// Build a spike for a body of `radius`, pointing along `angle` (turns)
pub fn spawn_spike(radius: f64, angle: f64, length: u32, config: &TankConfig) -> Spike {
    let half_width = if radius > 0.0 {
        math::asin((spikes::HALF_WIDTH / radius).min(1.0))
    } else {
        0.25
    };
    let base = radius - 1.0;
    let offsets = [
        Point::polar(angle, radius + length as f64),
        Point::polar(angle - half_width, base),
        Point::polar(angle + half_width, base),
    ];

    Spike {
        length,
        drain: spike_drain(length, config),
        offsets,
        points: offsets,
    }
}

/// All spikes of one body, longest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spikes(pub Vec<Spike>);

impl Spikes {
    /// Build spikes from decoded commands. Zero-length commands grow nothing.
    pub fn from_commands(radius: f64, commands: &[SpikeCommand], config: &TankConfig) -> Self {
        let mut spikes: Vec<Spike> = commands
            .iter()
            .filter(|command| command.length > 0)
            .map(|command| spawn_spike(radius, command.angle, command.length, config))
            .collect();
        // Stable: equal lengths keep genome order
        spikes.sort_by(|a, b| b.length.cmp(&a.length));
        Self(spikes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Spike> {
        self.0.iter()
    }

    /// Length of the longest spike, 0 for a spikeless body
    pub fn longest(&self) -> f64 {
        self.0.first().map_or(0.0, |s| s.length as f64)
    }

    /// Reposition every spike around a body centered at `(x, y)`
    pub fn move_to(&mut self, x: f64, y: f64) {
        for spike in &mut self.0 {
            spike.move_to(x, y);
        }
    }
}
