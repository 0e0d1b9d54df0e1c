use glam::Vec2;
use serde::Serialize;
use tilewalk_common::{Direction, EntityId, Rect};
use tilewalk_grid::{Building, CellRange, InteractiveObject};

use crate::entity::Entity;

/// Read-only view of one entity for a single frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub id: EntityId,
    pub name: String,
    pub role: &'static str,
    pub position: Vec2,
    pub size: Vec2,
    pub facing: Direction,
    pub moving: bool,
    pub animation_frame: u8,
    /// Whether the entity's rectangle overlaps the camera.
    pub on_screen: bool,
}

impl EntityView {
    pub(crate) fn new(entity: &Entity, camera: &Rect) -> Self {
        Self {
            id: entity.id(),
            name: entity.name().to_string(),
            role: entity.role().label(),
            position: entity.position(),
            size: entity.size(),
            facing: entity.facing(),
            moving: entity.is_moving(),
            animation_frame: entity.animation().frame(),
            on_screen: camera.touches(&entity.bounds()),
        }
    }
}

/// Everything a renderer needs for one frame. Entities are already in draw
/// order (ascending y, insertion order among equals).
#[derive(Debug, Clone, Serialize)]
pub struct FrameSnapshot<'a> {
    pub tick: u64,
    pub camera: Rect,
    pub entities: Vec<EntityView>,
    pub visible_cells: CellRange,
    pub buildings: &'a [Building],
    pub interactives: &'a [InteractiveObject],
}

impl FrameSnapshot<'_> {
    /// Entities whose rectangle intersects the viewport.
    pub fn on_screen(&self) -> impl Iterator<Item = &EntityView> {
        self.entities.iter().filter(|e| e.on_screen)
    }
}
