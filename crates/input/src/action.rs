use glam::Vec2;
use tilewalk_common::Direction;
use tilewalk_kernel::{ClickOutcome, GameWorld, Interaction, MotionError};

/// A high-level request produced by any input device.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Step the player `distance` units along one axis (keyboard).
    Move { direction: Direction, distance: f32 },
    /// Walk the player toward a world point.
    MoveTo(Vec2),
    /// Trigger whatever is just ahead of the player.
    Interact,
    /// Pointer press at a screen point: trigger or walk.
    Click(Vec2),
}

/// What applying a [`Command`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The player accepted a new target.
    Moving(Vec2),
    Interacted(Interaction),
    /// Nothing to interact with.
    Nothing,
    /// The request was refused; the world is unchanged.
    Refused(MotionError),
}

impl Command {
    pub fn apply(&self, world: &mut GameWorld) -> Outcome {
        let result = match *self {
            Command::Move {
                direction,
                distance,
            } => world.request_move(direction, distance).map(Outcome::Moving),
            Command::MoveTo(point) => world.request_move_to(point).map(Outcome::Moving),
            Command::Interact => Ok(world
                .request_interact()
                .map_or(Outcome::Nothing, Outcome::Interacted)),
            Command::Click(screen) => world.click(screen).map(|o| match o {
                ClickOutcome::Triggered(i) => Outcome::Interacted(i),
                ClickOutcome::MovingTo(p) => Outcome::Moving(p),
            }),
        };
        result.unwrap_or_else(|err| {
            tracing::debug!(command = ?self, %err, "command refused");
            Outcome::Refused(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilewalk_grid::{CellCoord, GridWorld};
    use tilewalk_kernel::Entity;

    fn world() -> GameWorld {
        let mut grid = GridWorld::new(640.0, 640.0, 64.0).unwrap();
        grid.set_collision(CellCoord::new(3, 1), true);
        let mut w = GameWorld::new(grid, Vec2::new(640.0, 640.0));
        w.spawn_player(Entity::player("Eddie", Vec2::new(100.0, 100.0)));
        w
    }

    #[test]
    fn move_command_sets_target() {
        let mut w = world();
        let out = Command::Move {
            direction: Direction::Down,
            distance: 40.0,
        }
        .apply(&mut w);
        assert_eq!(out, Outcome::Moving(Vec2::new(100.0, 140.0)));
    }

    #[test]
    fn blocked_move_is_refused() {
        let mut w = world();
        let out = Command::Move {
            direction: Direction::Right,
            distance: 120.0,
        }
        .apply(&mut w);
        assert!(matches!(out, Outcome::Refused(MotionError::Blocked { .. })));
        assert!(!w.player().unwrap().is_moving());
    }

    #[test]
    fn move_to_blocked_point_relocates() {
        let mut w = world();
        let out = Command::MoveTo(Vec2::new(200.0, 100.0)).apply(&mut w);
        // Cell (3,1) is blocked; the cell above it is free.
        assert_eq!(out, Outcome::Moving(Vec2::new(200.0, 36.0)));
    }

    #[test]
    fn interact_with_nothing() {
        let mut w = world();
        assert_eq!(Command::Interact.apply(&mut w), Outcome::Nothing);
    }

    #[test]
    fn click_walks_when_nothing_is_there() {
        let mut w = world();
        let out = Command::Click(Vec2::new(300.0, 300.0)).apply(&mut w);
        assert_eq!(out, Outcome::Moving(Vec2::new(300.0, 300.0)));
    }
}
