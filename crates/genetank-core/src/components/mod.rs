//! Component definitions for the tank ECS.
//!
//! Components are plain data attached to body entities. Behavior that only
//! touches one component (spike placement, calorie arithmetic) lives on the
//! component; anything that crosses bodies lives in the systems.

mod body;
mod spike;
mod vitals;

pub use body::*;
pub use spike::*;
pub use vitals::*;
