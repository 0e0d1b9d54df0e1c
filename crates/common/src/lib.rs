//! Shared types used by every tilewalk crate.
//!
//! # Invariants
//! - World coordinates are continuous `f32` units; y grows downward.
//! - Rectangle containment is half-open: `[x, x + w) × [y, y + h)`.

mod types;

pub use glam::Vec2;
pub use types::{Direction, EntityId, Rect};
