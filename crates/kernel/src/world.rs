use glam::Vec2;
use serde::Serialize;
use tilewalk_common::{Direction, EntityId, Rect};
use tilewalk_grid::{GridWorld, InteractiveObject, Trigger};

use crate::camera::Camera;
use crate::entity::{Entity, MotionError};
use crate::scheduler::Simulation;
use crate::snapshot::{EntityView, FrameSnapshot};

/// A record of every change to the active entity set or to an entity's
/// motion target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorldEvent {
    Spawned {
        id: EntityId,
        name: String,
        position: Vec2,
    },
    Despawned {
        id: EntityId,
    },
    TargetSet {
        id: EntityId,
        requested: Vec2,
        resolved: Vec2,
    },
    /// A point-and-click target had no walkable cell nearby.
    TargetUnreachable {
        id: EntityId,
        requested: Vec2,
    },
    Interacted {
        label: String,
        kind: &'static str,
    },
}

/// Result of triggering an interactive object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    pub label: String,
    pub kind: &'static str,
    /// Text for the dialogue layer, if the trigger produced any.
    pub message: Option<String>,
}

/// What a click on the screen did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Triggered(Interaction),
    MovingTo(Vec2),
}

/// The authoritative game state: grid, active entities, followed camera.
///
/// Entities are kept in insertion order. All mutation happens in
/// [`GameWorld::update`] or through the explicit request methods; renderers
/// only ever see `&GameWorld`.
#[derive(Debug)]
pub struct GameWorld {
    grid: GridWorld,
    entities: Vec<Entity>,
    player: Option<EntityId>,
    camera: Camera,
    /// Interaction reach in front of the player.
    reach: f32,
    tick: u64,
    /// Grows until drained; long-running drivers call [`GameWorld::drain_events`].
    event_log: Vec<WorldEvent>,
}

impl GameWorld {
    pub fn new(grid: GridWorld, viewport: Vec2) -> Self {
        Self {
            grid,
            entities: Vec::new(),
            player: None,
            camera: Camera::new(viewport),
            reach: 32.0,
            tick: 0,
            event_log: Vec::new(),
        }
    }

    pub fn with_reach(mut self, reach: f32) -> Self {
        self.reach = reach;
        self
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Frames simulated so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn reach(&self) -> f32 {
        self.reach
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Active entities in insertion order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.and_then(|id| self.entity(id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player?;
        self.entity_mut(id)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Add an entity to the active set. Returns its id.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        tracing::debug!(entity = %id.short(), name = entity.name(), "spawned");
        self.event_log.push(WorldEvent::Spawned {
            id,
            name: entity.name().to_string(),
            position: entity.position(),
        });
        self.entities.push(entity);
        id
    }

    /// Spawn an entity and make it the one the camera follows.
    pub fn spawn_player(&mut self, entity: Entity) -> EntityId {
        let id = self.spawn(entity);
        self.player = Some(id);
        self.refresh_camera();
        id
    }

    /// Spawn an NPC together with a square interaction box of side `size`.
    /// The box is centred on `position + (w / 2, w / 2)`, `w` being the
    /// footprint width.
    pub fn spawn_npc(&mut self, entity: Entity, size: f32) -> EntityId {
        let offset = (size - entity.size().x) / 2.0;
        let origin = entity.position() - Vec2::splat(offset);
        let label = entity.name().to_string();
        let id = self.spawn(entity);
        self.grid.add_interactive(InteractiveObject::new(
            Rect::new(origin.x, origin.y, size, size),
            label,
            Trigger::Npc(id),
        ));
        id
    }

    /// Register an additional interactive object on the grid.
    pub fn add_interactive(&mut self, object: InteractiveObject) {
        self.grid.add_interactive(object);
    }

    /// Remove an entity from the active set.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id() == id)?;
        let entity = self.entities.remove(idx);
        if self.player == Some(id) {
            self.player = None;
        }
        self.event_log.push(WorldEvent::Despawned { id });
        Some(entity)
    }

    /// Point-and-click targeting for any entity.
    pub fn set_target(&mut self, id: EntityId, requested: Vec2) -> Result<Vec2, MotionError> {
        let Self {
            grid,
            entities,
            event_log,
            ..
        } = self;
        let entity = entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(MotionError::UnknownEntity(id))?;
        match entity.set_target(requested, grid) {
            Ok(resolved) => {
                tracing::debug!(entity = %id.short(), ?requested, ?resolved, "target set");
                event_log.push(WorldEvent::TargetSet {
                    id,
                    requested,
                    resolved,
                });
                Ok(resolved)
            }
            Err(err) => {
                tracing::info!(entity = %id.short(), ?requested, "no walkable cell near target");
                event_log.push(WorldEvent::TargetUnreachable { id, requested });
                Err(err)
            }
        }
    }

    /// Discrete one-axis step for any entity.
    pub fn move_in_direction(
        &mut self,
        id: EntityId,
        direction: Direction,
        distance: f32,
    ) -> Result<Vec2, MotionError> {
        let Self {
            grid,
            entities,
            event_log,
            ..
        } = self;
        let entity = entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(MotionError::UnknownEntity(id))?;
        let resolved = entity.move_in_direction(direction, distance, grid)?;
        event_log.push(WorldEvent::TargetSet {
            id,
            requested: resolved,
            resolved,
        });
        Ok(resolved)
    }

    /// Input request: step the player along one axis.
    pub fn request_move(&mut self, direction: Direction, distance: f32) -> Result<Vec2, MotionError> {
        let id = self.player.ok_or(MotionError::NoPlayer)?;
        self.move_in_direction(id, direction, distance)
    }

    /// Input request: walk the player toward a world point.
    pub fn request_move_to(&mut self, point: Vec2) -> Result<Vec2, MotionError> {
        let id = self.player.ok_or(MotionError::NoPlayer)?;
        self.set_target(id, point)
    }

    /// Input request: trigger whatever lies `reach` units ahead of the player.
    pub fn request_interact(&mut self) -> Option<Interaction> {
        let point = self.player()?.interaction_point(self.reach);
        self.trigger_at(point)
    }

    /// A click at a screen point: trigger the object under it, or walk there.
    pub fn click(&mut self, screen: Vec2) -> Result<ClickOutcome, MotionError> {
        let world = self.camera.screen_to_world(screen);
        if let Some(interaction) = self.trigger_at(world) {
            return Ok(ClickOutcome::Triggered(interaction));
        }
        self.request_move_to(world).map(ClickOutcome::MovingTo)
    }

    /// Trigger the first interactive object containing `point`.
    pub fn trigger_at(&mut self, point: Vec2) -> Option<Interaction> {
        let object = self.grid.find_interactive_at(point)?;
        let label = object.label.clone();
        let trigger = object.trigger.clone();
        let kind = trigger.kind();

        let message = match trigger {
            Trigger::BuildingEntrance { building } => Some(format!("Entering {building}")),
            Trigger::Npc(id) => self
                .entity_mut(id)
                .and_then(Entity::as_npc_mut)
                .and_then(|npc| npc.talk()),
            Trigger::Message(text) => Some(text),
            Trigger::Callback(f) => f(),
        };

        tracing::info!(%label, kind, "interaction triggered");
        self.event_log.push(WorldEvent::Interacted {
            label: label.clone(),
            kind,
        });
        Some(Interaction {
            label,
            kind,
            message,
        })
    }

    /// Re-pin the camera on the player, clamped to the world.
    pub fn refresh_camera(&mut self) {
        if let Some(pos) = self.player().map(Entity::position) {
            self.camera.follow(pos, self.grid.size());
        }
    }

    /// Resize the viewport and re-pin it.
    pub fn resize_viewport(&mut self, size: Vec2) {
        self.camera.resize(size);
        self.refresh_camera();
    }

    /// Advance every entity by `dt`, then recompute the camera.
    pub fn update(&mut self, dt: f32) {
        for entity in &mut self.entities {
            entity.update(dt);
        }
        self.refresh_camera();
        self.tick += 1;
    }

    /// Entities sorted by ascending y; equal y keeps insertion order.
    pub fn draw_order(&self) -> Vec<&Entity> {
        let mut sorted: Vec<&Entity> = self.entities.iter().collect();
        sorted.sort_by(|a, b| a.position().y.total_cmp(&b.position().y));
        sorted
    }

    /// Read-only frame data for renderers.
    pub fn snapshot(&self) -> FrameSnapshot<'_> {
        let camera = self.camera.rect();
        FrameSnapshot {
            tick: self.tick,
            camera,
            entities: self
                .draw_order()
                .into_iter()
                .map(|e| EntityView::new(e, &camera))
                .collect(),
            visible_cells: self.grid.visible_cells(&camera),
            buildings: self.grid.buildings(),
            interactives: self.grid.interactives(),
        }
    }
}

impl Simulation for GameWorld {
    fn update(&mut self, dt: f32) {
        GameWorld::update(self, dt);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::entity::NpcKind;
    use crate::scheduler::Scheduler;
    use tilewalk_grid::CellCoord;

    fn open_world() -> GameWorld {
        let grid = GridWorld::new(1280.0, 1280.0, 64.0).unwrap();
        GameWorld::new(grid, Vec2::new(320.0, 240.0))
    }

    fn npc_at(name: &str, x: f32, y: f32) -> Entity {
        Entity::npc(name, Vec2::new(x, y), NpcKind::Generic, Vec::new())
    }

    #[test]
    fn world_starts_empty() {
        let w = open_world();
        assert_eq!(w.tick(), 0);
        assert_eq!(w.entity_count(), 0);
        assert!(w.player().is_none());
    }

    #[test]
    fn spawn_and_despawn() {
        let mut w = open_world();
        let id = w.spawn_player(Entity::player("Eddie", Vec2::new(100.0, 100.0)));
        assert_eq!(w.player_id(), Some(id));
        assert_eq!(w.entity_count(), 1);

        assert!(w.despawn(id).is_some());
        assert!(w.despawn(id).is_none());
        assert!(w.player().is_none());
        assert_eq!(w.events().len(), 2);
    }

    #[test]
    fn draw_order_is_stable_by_y() {
        let mut w = open_world();
        let a = w.spawn(npc_at("A", 0.0, 10.0));
        let b = w.spawn(npc_at("B", 50.0, 10.0));
        let c = w.spawn(npc_at("C", 90.0, 5.0));
        let order: Vec<EntityId> = w.draw_order().iter().map(|e| e.id()).collect();
        assert_eq!(order, vec![c, a, b]);

        let names: Vec<String> = w.snapshot().entities.into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn update_moves_entities_then_camera() {
        let mut w = open_world();
        let id = w.spawn_player(Entity::player("Eddie", Vec2::new(600.0, 600.0)));
        w.request_move_to(Vec2::new(800.0, 600.0)).unwrap();
        w.update(0.5);
        assert_eq!(w.entity(id).unwrap().position(), Vec2::new(700.0, 600.0));
        assert_eq!(w.camera().position(), Vec2::new(540.0, 480.0));
        assert_eq!(w.tick(), 1);
    }

    #[test]
    fn discrete_step_logs_one_event_and_rejection_none() {
        let mut grid = GridWorld::new(640.0, 640.0, 64.0).unwrap();
        grid.set_collision(CellCoord::new(2, 2), true);
        let mut w = GameWorld::new(grid, Vec2::new(320.0, 320.0));
        let id = w.spawn_player(Entity::player("Eddie", Vec2::new(100.0, 100.0)));
        w.drain_events();

        w.request_move(Direction::Right, 50.0).unwrap();
        assert_eq!(
            w.events(),
            [WorldEvent::TargetSet {
                id,
                requested: Vec2::new(150.0, 100.0),
                resolved: Vec2::new(150.0, 100.0),
            }]
        );

        w.drain_events();
        w.update(1.0);
        // (150, 150) lies in blocked cell (2, 2).
        assert!(w.request_move(Direction::Down, 50.0).is_err());
        assert!(w.events().is_empty());
    }

    #[test]
    fn unreachable_target_is_logged_and_harmless() {
        let mut grid = GridWorld::new(128.0, 128.0, 64.0).unwrap();
        grid.set_collision(CellCoord::new(1, 1), true);
        grid.set_collision(CellCoord::new(1, 0), true);
        grid.set_collision(CellCoord::new(0, 1), true);
        let mut w = GameWorld::new(grid, Vec2::new(64.0, 64.0));
        let id = w.spawn_player(Entity::player("Eddie", Vec2::new(10.0, 10.0)));
        w.drain_events();

        let err = w.request_move_to(Vec2::new(100.0, 100.0)).unwrap_err();
        assert!(matches!(err, MotionError::UnreachableTarget { .. }));
        assert!(!w.entity(id).unwrap().is_moving());
        assert!(matches!(w.events(), [WorldEvent::TargetUnreachable { .. }]));
    }

    #[test]
    fn requests_without_player_fail_cleanly() {
        let mut w = open_world();
        assert_eq!(
            w.request_move(Direction::Up, 10.0),
            Err(MotionError::NoPlayer)
        );
        assert!(w.request_interact().is_none());
        let ghost = EntityId::new();
        assert_eq!(
            w.set_target(ghost, Vec2::ZERO),
            Err(MotionError::UnknownEntity(ghost))
        );
    }

    #[test]
    fn interact_talks_to_npc_ahead() {
        let mut w = open_world();
        w.spawn_player(Entity::player("Eddie", Vec2::new(300.0, 300.0)));
        w.spawn_npc(
            Entity::npc(
                "Rex",
                Vec2::new(300.0, 340.0),
                NpcKind::Detective,
                vec!["first".into(), "second".into()],
            ),
            64.0,
        );
        let rect = w.grid().interactives()[0].rect;
        assert_eq!(rect, Rect::new(284.0, 324.0, 64.0, 64.0));
        assert_eq!(
            rect.origin() + rect.size() / 2.0,
            Vec2::new(300.0, 340.0) + Vec2::splat(16.0)
        );
        // Facing down by default: the sample point lands at (300, 332).
        let first = w.request_interact().unwrap();
        assert_eq!(first.kind, "npc");
        assert_eq!(first.message.as_deref(), Some("first"));
        let second = w.request_interact().unwrap();
        assert_eq!(second.message.as_deref(), Some("second"));
        assert_eq!(
            w.request_interact().unwrap().message.as_deref(),
            Some("first")
        );
    }

    #[test]
    fn interact_with_nothing_ahead() {
        let mut w = open_world();
        w.spawn_player(Entity::player("Eddie", Vec2::new(300.0, 300.0)));
        assert!(w.request_interact().is_none());
    }

    #[test]
    fn click_on_object_triggers_instead_of_walking() {
        let mut w = open_world();
        let id = w.spawn_player(Entity::player("Eddie", Vec2::new(100.0, 100.0)));
        w.add_interactive(InteractiveObject::new(
            Rect::new(0.0, 0.0, 64.0, 64.0),
            "sign",
            Trigger::Callback(Arc::new(|| Some("Welcome".to_string()))),
        ));
        // Camera is clamped to the origin, so screen == world here.
        match w.click(Vec2::new(10.0, 10.0)).unwrap() {
            ClickOutcome::Triggered(i) => assert_eq!(i.message.as_deref(), Some("Welcome")),
            other => panic!("unexpected {other:?}"),
        }
        assert!(!w.entity(id).unwrap().is_moving());

        match w.click(Vec2::new(200.0, 150.0)).unwrap() {
            ClickOutcome::MovingTo(p) => assert_eq!(p, Vec2::new(200.0, 150.0)),
            other => panic!("unexpected {other:?}"),
        }
        assert!(w.entity(id).unwrap().is_moving());
    }

    #[test]
    fn click_uses_camera_offset() {
        let mut w = open_world();
        w.spawn_player(Entity::player("Eddie", Vec2::new(640.0, 640.0)));
        let cam = w.camera().position();
        assert_eq!(cam, Vec2::new(480.0, 520.0));
        match w.click(Vec2::new(100.0, 100.0)).unwrap() {
            ClickOutcome::MovingTo(p) => assert_eq!(p, Vec2::new(580.0, 620.0)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn building_entrance_reports_name() {
        let mut grid = GridWorld::new(640.0, 640.0, 64.0).unwrap();
        grid.add_building("Library", 1, 1, 2, 2);
        let mut w = GameWorld::new(grid, Vec2::new(320.0, 240.0));
        let i = w.trigger_at(Vec2::new(130.0, 200.0)).unwrap();
        assert_eq!(i.message.as_deref(), Some("Entering Library"));
        assert_eq!(i.kind, "building_entrance");
    }

    #[test]
    fn snapshot_reflects_camera_and_visibility() {
        let mut w = open_world();
        w.spawn_player(Entity::player("Eddie", Vec2::new(640.0, 640.0)));
        w.spawn(npc_at("Far", 100.0, 100.0));
        let snap = w.snapshot();
        assert_eq!(snap.camera, Rect::new(480.0, 520.0, 320.0, 240.0));
        assert_eq!(snap.visible_cells.start, CellCoord::new(7, 8));
        assert_eq!(snap.visible_cells.end, CellCoord::new(13, 12));
        let on_screen: Vec<&str> = snap.on_screen().map(|e| e.name.as_str()).collect();
        assert_eq!(on_screen, vec!["Eddie"]);
    }

    #[test]
    fn scheduler_drives_world() {
        let mut w = open_world();
        let id = w.spawn_player(Entity::player("Eddie", Vec2::new(100.0, 100.0)));
        w.request_move(Direction::Right, 100.0).unwrap();

        let mut scheduler = Scheduler::new();
        scheduler.start(0.0);
        let mut positions = Vec::new();
        for frame in 1..=4 {
            let seen = scheduler.tick(frame as f64 * 250.0, &mut w, |w| {
                w.entity(id).unwrap().position()
            });
            positions.push(seen.unwrap());
        }
        assert_eq!(positions[0], Vec2::new(150.0, 100.0));
        assert_eq!(positions[1], Vec2::new(200.0, 100.0));
        assert_eq!(positions[3], Vec2::new(200.0, 100.0));
        assert_eq!(w.tick(), 4);
    }
}
