use glam::Vec2;
use tilewalk_common::Direction;
use tilewalk_kernel::GameWorld;

use crate::action::Command;

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Interact,
}

impl Key {
    /// WASD for movement, E for interaction.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'w' => Some(Key::Up),
            's' => Some(Key::Down),
            'a' => Some(Key::Left),
            'd' => Some(Key::Right),
            'e' => Some(Key::Interact),
            _ => None,
        }
    }

    fn direction(self) -> Option<Direction> {
        match self {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Interact => None,
        }
    }
}

impl From<Direction> for Key {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => Key::Up,
            Direction::Down => Key::Down,
            Direction::Left => Key::Left,
            Direction::Right => Key::Right,
        }
    }
}

/// Held-key state turned into commands.
///
/// Movement keys only take effect between steps: while the player is still
/// walking, held keys produce nothing. When several are held, up wins over
/// down, over left, over right.
#[derive(Debug, Default)]
pub struct Controls {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Key down. Interaction fires immediately; movement is latched until
    /// the next [`Controls::frame_command`].
    pub fn press(&mut self, key: Key) -> Option<Command> {
        match key.direction() {
            Some(dir) => {
                self.set(dir, true);
                None
            }
            None => Some(Command::Interact),
        }
    }

    pub fn release(&mut self, key: Key) {
        if let Some(dir) = key.direction() {
            self.set(dir, false);
        }
    }

    /// Pointer press at a screen position.
    pub fn click(&self, screen: Vec2) -> Command {
        Command::Click(screen)
    }

    fn set(&mut self, dir: Direction, held: bool) {
        match dir {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// Direction of the highest-priority held key.
    pub fn held(&self) -> Option<Direction> {
        [
            (self.up, Direction::Up),
            (self.down, Direction::Down),
            (self.left, Direction::Left),
            (self.right, Direction::Right),
        ]
        .into_iter()
        .find_map(|(held, dir)| held.then_some(dir))
    }

    /// Movement for this frame: a step of `speed * dt` in the held direction,
    /// issued only while the player is idle.
    pub fn frame_command(&self, world: &GameWorld, dt: f32) -> Option<Command> {
        let player = world.player()?;
        if player.is_moving() {
            return None;
        }
        let direction = self.held()?;
        Some(Command::Move {
            direction,
            distance: player.speed() * dt,
        })
    }
}
