//! Rendering Adapter: renderer-agnostic consumers of the kernel's frame data.
//!
//! # Invariants
//! - Renderers receive `&GameWorld` and cannot mutate game state.
//! - Entities are drawn in the snapshot's order (ascending y).

mod renderer;

pub use renderer::{AsciiMapRenderer, DebugTextRenderer, JsonRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "tilewalk-render v0.1.0"
}
