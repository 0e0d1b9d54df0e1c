use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilewalk_common::{Direction, EntityId, Rect};
use tilewalk_grid::GridWorld;

/// Default movement speed in world units per second.
pub const DEFAULT_SPEED: f32 = 200.0;
/// Footprint used for culling and presentation. Collision ignores it.
pub const ENTITY_SIZE: Vec2 = Vec2::new(32.0, 48.0);
/// How many grid steps outward a blocked target is searched.
pub const SEARCH_RADIUS: i32 = 4;

const ANIMATION_FRAMES: u8 = 4;
const SECONDS_PER_FRAME: f32 = 0.2;

/// Errors from motion requests. Every error leaves the entity untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MotionError {
    #[error("no walkable cell within {radius} steps of ({x}, {y})")]
    UnreachableTarget { x: f32, y: f32, radius: i32 },
    #[error("step into blocked cell at ({x}, {y})")]
    Blocked { x: f32, y: f32 },
    #[error("entity {0:?} not found")]
    UnknownEntity(EntityId),
    #[error("world has no player")]
    NoPlayer,
}

/// An inventory item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Player-only data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerData {
    inventory: Vec<Item>,
    pub has_notebook: bool,
}

impl PlayerData {
    pub fn items(&self) -> &[Item] {
        &self.inventory
    }

    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    /// Remove the first item with this name. Returns whether one was found.
    pub fn remove_item(&mut self, name: &str) -> bool {
        match self.inventory.iter().position(|i| i.name == name) {
            Some(idx) => {
                self.inventory.remove(idx);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcKind {
    #[default]
    Generic,
    Detective,
    Police,
    Shopkeeper,
}

/// NPC-only data: dialogue lines and a cyclic cursor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NpcData {
    pub kind: NpcKind,
    dialogue: Vec<String>,
    cursor: usize,
}

impl NpcData {
    pub fn new(kind: NpcKind, dialogue: Vec<String>) -> Self {
        Self {
            kind,
            dialogue,
            cursor: 0,
        }
    }

    pub fn has_dialogue(&self) -> bool {
        !self.dialogue.is_empty()
    }

    /// Current line, advancing the cursor with wrap-around.
    pub fn talk(&mut self) -> Option<String> {
        let line = self.dialogue.get(self.cursor)?.clone();
        self.cursor = (self.cursor + 1) % self.dialogue.len();
        Some(line)
    }
}

/// Variant-specific data of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Player(PlayerData),
    Npc(NpcData),
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Player(_) => "player",
            Role::Npc(_) => "npc",
        }
    }
}

/// Walk-cycle state: four frames, advanced while moving, reset when idle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Animation {
    frame: u8,
    timer: f32,
}

impl Animation {
    pub fn frame(&self) -> u8 {
        self.frame
    }

    fn advance(&mut self, dt: f32, moving: bool) {
        if !moving {
            self.frame = 0;
            return;
        }
        self.timer += dt;
        if self.timer >= SECONDS_PER_FRAME {
            self.timer = 0.0;
            self.frame = (self.frame + 1) % ANIMATION_FRAMES;
        }
    }
}

/// A walking character. The anchor `position` is the only point sampled
/// for collision.
///
/// `moving` is true exactly when `position != target`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    position: Vec2,
    target: Vec2,
    facing: Direction,
    speed: f32,
    moving: bool,
    size: Vec2,
    animation: Animation,
    role: Role,
}

impl Entity {
    fn spawn(name: impl Into<String>, position: Vec2, role: Role) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            position,
            target: position,
            facing: Direction::Down,
            speed: DEFAULT_SPEED,
            moving: false,
            size: ENTITY_SIZE,
            animation: Animation::default(),
            role,
        }
    }

    pub fn player(name: impl Into<String>, position: Vec2) -> Self {
        Self::spawn(
            name,
            position,
            Role::Player(PlayerData {
                inventory: Vec::new(),
                has_notebook: true,
            }),
        )
    }

    pub fn npc(
        name: impl Into<String>,
        position: Vec2,
        kind: NpcKind,
        dialogue: Vec<String>,
    ) -> Self {
        Self::spawn(name, position, Role::Npc(NpcData::new(kind, dialogue)))
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn animation(&self) -> Animation {
        self.animation
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Presentation rectangle anchored at the entity's position.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player(_))
    }

    pub fn as_player(&self) -> Option<&PlayerData> {
        match &self.role {
            Role::Player(p) => Some(p),
            Role::Npc(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.role {
            Role::Player(p) => Some(p),
            Role::Npc(_) => None,
        }
    }

    pub fn as_npc(&self) -> Option<&NpcData> {
        match &self.role {
            Role::Npc(n) => Some(n),
            Role::Player(_) => None,
        }
    }

    pub fn as_npc_mut(&mut self) -> Option<&mut NpcData> {
        match &mut self.role {
            Role::Npc(n) => Some(n),
            Role::Player(_) => None,
        }
    }

    /// Point-and-click targeting. A blocked destination is relocated to the
    /// nearest walkable cell found by [`nearest_walkable`]; when none exists
    /// the entity is left unchanged. Returns the accepted target.
    pub fn set_target(&mut self, requested: Vec2, grid: &GridWorld) -> Result<Vec2, MotionError> {
        let resolved = if grid.is_blocked(requested) {
            nearest_walkable(requested, grid).ok_or(MotionError::UnreachableTarget {
                x: requested.x,
                y: requested.y,
                radius: SEARCH_RADIUS,
            })?
        } else {
            requested
        };
        self.target = resolved;
        self.moving = resolved != self.position;
        Ok(resolved)
    }

    /// Discrete step along one axis. A blocked destination is rejected
    /// outright, without searching for an alternative.
    pub fn move_in_direction(
        &mut self,
        direction: Direction,
        distance: f32,
        grid: &GridWorld,
    ) -> Result<Vec2, MotionError> {
        let candidate = self.position + direction.unit() * distance;
        if grid.is_blocked(candidate) {
            tracing::trace!(entity = %self.id.short(), %direction, "step rejected");
            return Err(MotionError::Blocked {
                x: candidate.x,
                y: candidate.y,
            });
        }
        self.facing = direction;
        self.target = candidate;
        self.moving = candidate != self.position;
        Ok(candidate)
    }

    /// Advance toward the target by `speed * dt`. Snaps onto the target when
    /// the remaining distance does not exceed the step, so large `dt` never
    /// overshoots. Negative `dt` is treated as zero.
    ///
    /// Facing only changes on partial steps; the snap leaves it alone.
    pub fn step(&mut self, dt: f32) {
        if !self.moving {
            return;
        }
        let step = self.speed * dt.max(0.0);
        let delta = self.target - self.position;
        let distance = delta.length();

        if distance <= step {
            self.position = self.target;
            self.moving = false;
            return;
        }
        if step <= 0.0 {
            return;
        }

        let movement = delta / distance * step;
        self.position += movement;
        self.facing = Direction::from_delta(movement);
    }

    /// Per-frame update: walk cycle first, then motion.
    pub fn update(&mut self, dt: f32) {
        self.animation.advance(dt, self.moving);
        self.step(dt);
    }

    /// World point `reach` units ahead of the entity, used for interaction.
    pub fn interaction_point(&self, reach: f32) -> Vec2 {
        self.position + self.facing.unit() * reach
    }
}

/// Search outward from a blocked point, one grid step at a time up to
/// [`SEARCH_RADIUS`], trying up, right, down, left at each radius. The
/// candidate keeps the point's offset within its cell.
pub fn nearest_walkable(point: Vec2, grid: &GridWorld) -> Option<Vec2> {
    let tile = grid.tile_size();
    (1..=SEARCH_RADIUS)
        .flat_map(|r| Direction::SEARCH_ORDER.map(|d| point + d.unit() * (r as f32 * tile)))
        .find(|candidate| !grid.is_blocked(*candidate))
}
