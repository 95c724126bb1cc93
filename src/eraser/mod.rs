//! splitting eraser: removes the part of a stroke under a square eraser and
//! rebuilds whatever survives as new strokes.

mod damage;
mod engine;
mod segment;

pub use damage::Damage;
pub use engine::EraseableStroke;
pub use segment::Segment;
