use std::sync::Arc;

use glam::Vec2;
use serde::Serialize;
use tilewalk_common::{EntityId, Rect};

/// Opaque callback behind a [`Trigger::Callback`].
pub type TriggerFn = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// What happens when an interactive object is triggered.
///
/// The grid only stores triggers; resolving them (talking to an NPC, entering
/// a building) is done by the world that owns the entities.
#[derive(Clone)]
pub enum Trigger {
    /// Entrance of the named building.
    BuildingEntrance { building: String },
    /// Talk to the given NPC.
    Npc(EntityId),
    /// Fixed line of text.
    Message(String),
    /// Arbitrary callback supplied at world construction.
    Callback(TriggerFn),
}

impl Trigger {
    pub fn kind(&self) -> &'static str {
        match self {
            Trigger::BuildingEntrance { .. } => "building_entrance",
            Trigger::Npc(_) => "npc",
            Trigger::Message(_) => "message",
            Trigger::Callback(_) => "callback",
        }
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trigger::BuildingEntrance { building } => f
                .debug_struct("BuildingEntrance")
                .field("building", building)
                .finish(),
            Trigger::Npc(id) => f.debug_tuple("Npc").field(id).finish(),
            Trigger::Message(text) => f.debug_tuple("Message").field(text).finish(),
            Trigger::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// World rectangle bound to a trigger. Owned by the grid and looked up by
/// point containment only.
#[derive(Debug, Clone, Serialize)]
pub struct InteractiveObject {
    pub rect: Rect,
    pub label: String,
    #[serde(skip)]
    pub trigger: Trigger,
}

impl InteractiveObject {
    pub fn new(rect: Rect, label: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            rect,
            label: label.into(),
            trigger,
        }
    }
}

/// Static named rectangle with a single entrance point, placed once at world
/// generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Building {
    pub name: String,
    pub rect: Rect,
    pub entrance: Vec2,
}
