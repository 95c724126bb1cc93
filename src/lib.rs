//! freehand strokes with an eraser that cuts them apart instead of deleting
//! them whole.
//!
//! the heart of it is [`eraser::EraseableStroke`]: attach one to a stroke,
//! feed it eraser positions, and rebuild the surviving pieces as new
//! [`stroke::Stroke`]s once the gesture ends.

pub mod config;
pub mod eraser;
pub mod error;
pub mod layer;
pub mod paint;
pub mod stroke;
pub mod undo;

pub use eraser::{Damage, EraseableStroke, Segment};
pub use stroke::{LineStyle, Point, Stroke, StrokeId, ToolType};
