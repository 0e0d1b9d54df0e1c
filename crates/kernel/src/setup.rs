use glam::Vec2;
use tilewalk_grid::generate_town;

use crate::config::{ConfigError, GameConfig};
use crate::entity::{Entity, NpcKind};
use crate::world::GameWorld;

/// Lines the detective NPC cycles through.
pub const REX_DIALOGUE: [&str; 5] = [
    "Hello Eddie! I've got a mystery for you to solve.",
    "I've hidden clues all over Rochester for you to find.",
    "Start by checking out the Cathedral.",
    "Don't forget your detective notebook!",
    "I'll be around town if you need hints.",
];

/// Horizontal distance between the player's spawn and Rex.
pub const REX_OFFSET: f32 = 100.0;

/// Build the town and its cast from a validated config: the player at the
/// centre of the world and Rex just to the right.
pub fn build_world(config: &GameConfig) -> Result<GameWorld, ConfigError> {
    config.validate()?;
    let grid = generate_town(&config.world)?;
    let centre = grid.size() / 2.0;
    let viewport = Vec2::new(config.viewport.width, config.viewport.height);

    let mut world = GameWorld::new(grid, viewport).with_reach(config.interaction.reach);
    world.spawn_player(
        Entity::player(config.player.name.clone(), centre).with_speed(config.player.speed),
    );
    world.spawn_npc(
        Entity::npc(
            "Rex",
            centre + Vec2::new(REX_OFFSET, 0.0),
            NpcKind::Detective,
            REX_DIALOGUE.iter().map(|s| s.to_string()).collect(),
        ),
        config.interaction.npc_box,
    );
    tracing::info!(
        entities = world.entity_count(),
        buildings = world.grid().buildings().len(),
        "world ready"
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilewalk_common::Direction;
    use tilewalk_grid::GridError;

    #[test]
    fn default_world_has_player_and_rex() {
        let world = build_world(&GameConfig::default()).unwrap();
        assert_eq!(world.entity_count(), 2);
        let player = world.player().unwrap();
        assert_eq!(player.name(), "Eddie");
        assert_eq!(player.position(), Vec2::new(1600.0, 1600.0));
        assert_eq!(world.camera().position(), Vec2::new(1120.0, 1280.0));
        assert!(world.entities().iter().any(|e| e.name() == "Rex"));
        // Eight building entrances plus Rex's box.
        assert_eq!(world.grid().interactives().len(), 9);
    }

    #[test]
    fn player_can_talk_to_rex() {
        let mut world = build_world(&GameConfig::default()).unwrap();
        world.request_move(Direction::Right, 1.0).unwrap();
        world.update(1.0);
        // Sample point (1633, 1600) misses Rex's box, which starts at x = 1684.
        assert!(world.request_interact().is_none());

        world.request_move(Direction::Right, 60.0).unwrap();
        world.update(1.0);
        let reply = world.request_interact().unwrap();
        assert_eq!(reply.message.as_deref(), Some(REX_DIALOGUE[0]));
    }

    #[test]
    fn oversized_world_is_a_grid_error() {
        let config =
            GameConfig::from_yaml_str("world: {width: 100000, height: 100000, tile_size: 1}")
                .unwrap();
        assert!(matches!(
            build_world(&config),
            Err(ConfigError::Grid(GridError::TooLarge { .. }))
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_building() {
        let mut config = GameConfig::default();
        config.player.speed = 0.0;
        assert!(matches!(build_world(&config), Err(ConfigError::Invalid(_))));
    }
}
