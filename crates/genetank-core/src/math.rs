//! Math utilities - lookup-table trigonometry in turns, angle helpers, seeded RNG
//!
//! All angles in the simulation are measured in *turns* (1.0 = full rotation) and
//! normalized into `[0, 1)`. Trig goes through fixed-resolution tables so the
//! results are identical on every platform for a given input.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;
use std::sync::OnceLock;

/// Samples per full turn in the sin/cos table
pub const TRIG_RESOLUTION: usize = 4096;

/// Intervals across [-1, 1] in the asin table, which holds `ARC_RESOLUTION + 1` samples
pub const ARC_RESOLUTION: usize = 4096;

/// Seeded generator used by every random draw in the simulation
pub type TankRng = ChaCha8Rng;

/// Create the simulation generator from a seed
pub fn seeded_rng(seed: u64) -> TankRng {
    ChaCha8Rng::seed_from_u64(seed)
}

struct TrigTables {
    sin: Vec<f64>,
    asin: Vec<f64>,
}

fn tables() -> &'static TrigTables {
    static TABLES: OnceLock<TrigTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let sin = (0..TRIG_RESOLUTION)
            .map(|i| (TAU * i as f64 / TRIG_RESOLUTION as f64).sin())
            .collect();
        let asin = (0..=ARC_RESOLUTION)
            .map(|i| {
                let x = -1.0 + 2.0 * i as f64 / ARC_RESOLUTION as f64;
                x.clamp(-1.0, 1.0).asin() / TAU
            })
            .collect();
        TrigTables { sin, asin }
    })
}

/// Normalize an angle into [0, 1) turns
pub fn normalize_turns(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(1.0);
    // rem_euclid of a tiny negative rounds up to exactly 1.0
    if wrapped >= 1.0 {
        0.0
    } else {
        wrapped
    }
}

/// Shortest angular distance between two angles, in [0, 0.5]
pub fn turn_distance(a: f64, b: f64) -> f64 {
    let d = normalize_turns(a - b);
    d.min(1.0 - d)
}

/// Sine of an angle given in turns
pub fn sin(turns: f64) -> f64 {
    let index = (normalize_turns(turns) * TRIG_RESOLUTION as f64).round() as usize;
    tables().sin[index % TRIG_RESOLUTION]
}

/// Cosine of an angle given in turns
pub fn cos(turns: f64) -> f64 {
    sin(turns + 0.25)
}

/// Arcsine, returned in turns within [-0.25, 0.25]
pub fn asin(x: f64) -> f64 {
    let x = if x.is_nan() { 0.0 } else { x.clamp(-1.0, 1.0) };
    let index = ((x + 1.0) / 2.0 * ARC_RESOLUTION as f64).round() as usize;
    tables().asin[index.min(ARC_RESOLUTION)]
}

/// Arccosine, returned in turns within [0, 0.5]
pub fn acos(x: f64) -> f64 {
    0.25 - asin(x)
}

/// Offset of a point at `distance` along `angle` (screen coordinates, y down)
pub fn polar(angle: f64, distance: f64) -> (f64, f64) {
    (cos(angle) * distance, -sin(angle) * distance)
}

/// Direction of a vector as an angle in turns (inverse of [`polar`])
pub fn angle_of(dx: f64, dy: f64) -> f64 {
    let length = (dx * dx + dy * dy).sqrt();
    if length == 0.0 {
        return 0.0;
    }
    // Screen y grows downward
    let (cx, cy) = (dx / length, -dy / length);
    // Read the arc tables on their flat side, away from +-1
    let angle = if cx.abs() >= cy.abs() {
        let a = asin(cy);
        if cx >= 0.0 {
            a
        } else {
            0.5 - a
        }
    } else {
        let a = acos(cx);
        if cy >= 0.0 {
            a
        } else {
            -a
        }
    };
    normalize_turns(angle)
}

/// Squared distance between two points
pub fn distance_squared(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    dx * dx + dy * dy
}

/// Squared distance from point `p` to the segment `a`-`b`
pub fn segment_distance_squared(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let sx = bx - ax;
    let sy = by - ay;
    let length_sq = sx * sx + sy * sy;
    if length_sq == 0.0 {
        return distance_squared(px, py, ax, ay);
    }
    let t = (((px - ax) * sx + (py - ay) * sy) / length_sq).clamp(0.0, 1.0);
    distance_squared(px, py, ax + sx * t, ay + sy * t)
}

/// Linear interpolation between `from` and `to`
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Clamp to the unit interval
pub fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}
