//! Generation - procedural creation of bodies, offspring and motes

mod body;
mod separation;

pub use body::*;
pub use separation::*;
