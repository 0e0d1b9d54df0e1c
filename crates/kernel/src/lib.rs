//! Game Kernel: authoritative entity state, motion, camera follow and the
//! frame scheduler.
//!
//! # Invariants
//! - An entity is moving exactly when its position differs from its target.
//! - A step never overshoots its target.
//! - Failed motion requests leave the entity untouched.
//! - Within a frame, every entity update completes before rendering reads
//!   the world; rendering only receives `&GameWorld`.
//! - The camera is derived from the player's position every frame and stays
//!   inside the world whenever the world is larger than the viewport.

pub mod camera;
pub mod config;
pub mod entity;
pub mod scheduler;
pub mod setup;
pub mod snapshot;
pub mod world;

pub use camera::Camera;
pub use config::{ConfigError, GameConfig};
pub use entity::{Entity, Item, MotionError, NpcData, NpcKind, PlayerData, Role};
pub use scheduler::{FrameStats, LoopState, Scheduler, Simulation};
pub use setup::build_world;
pub use snapshot::{EntityView, FrameSnapshot};
pub use world::{ClickOutcome, GameWorld, Interaction, WorldEvent};

pub fn crate_info() -> &'static str {
    "tilewalk-kernel v0.1.0"
}
