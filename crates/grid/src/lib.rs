//! Grid Model: the tile world every consumer reads collision and layout from.
//!
//! # Invariants
//! - Grid dimensions are `ceil(world size / tile size)` on each axis.
//! - Cells outside `[0, cols) × [0, rows)` are always blocked.
//! - Collision writes outside the grid are ignored, never an error.
//! - Interactive objects are found by point containment, first inserted wins.
//!
//! Collision is sampled at a single anchor point per query. An entity whose
//! anchor sits on a free cell may still overlap a blocked neighbour visually.

mod grid;
mod objects;
mod town;

pub use grid::{Cell, CellCoord, CellRange, Decoration, GridError, GridWorld, MAX_CELLS, Terrain};
pub use objects::{Building, InteractiveObject, Trigger, TriggerFn};
pub use town::{TownParams, generate_town};

pub fn crate_info() -> &'static str {
    "tilewalk-grid v0.1.0"
}
