//! GeneTank Core - closed 2D ecosystem simulation engine
//!
//! Circular bodies are built from a byte genome, drift around a walled tank,
//! bounce off each other, drain calories with their spikes and split in two once
//! they have eaten enough. Passive motes appear as food.
//!
//! # Architecture
//!
//! Bodies live in an ECS world via `hecs`:
//! - **Entities**: one per body (organism or mote)
//! - **Components**: Position, Velocity, Mass, Spikes, Vitals, and a Genome for organisms
//! - **Systems**: the fixed-order frame pipeline (predict, bounce, interact, commit,
//!   upkeep, lifecycle, mote spawning)
//!
//! Everything random draws from one seeded generator owned by the [`Tank`](engine::Tank),
//! so a seed plus a sequence of frame times always replays the same run.
//!
//! # Example
//!
//! ```rust
//! use genetank_core::prelude::*;
//!
//! let mut tank = Tank::new(TankConfig::default());
//! tank.populate();
//!
//! let mut now = 0.0;
//! for _ in 0..10 {
//!     let report = tank.simulate_frame(now, now + 16.0);
//!     now += 16.0;
//!     assert_eq!(report.tick, tank.tick());
//! }
//!
//! for body in tank.bodies() {
//!     let _ = (body.position, body.radius(), body.fill.css());
//! }
//! ```

pub mod components;
pub mod config;
pub mod constants;
pub mod effects;
pub mod engine;
pub mod events;
pub mod generation;
pub mod genome;
pub mod math;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::TankConfig;
    pub use crate::engine::Tank;
    pub use crate::events::{FrameEvent, FrameReport};
    pub use crate::genome::Genome;
}
