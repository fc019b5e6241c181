//! Systems - per-frame logic over the tank's bodies, in pipeline order

mod movement;
mod interaction;
mod lifecycle;
mod motes;

pub use movement::*;
pub use interaction::*;
pub use lifecycle::*;
pub use motes::*;
