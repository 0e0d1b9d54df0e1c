use glam::Vec2;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, used in logs and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Facing / stepping direction on the screen plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    /// Cardinal search order used when relocating a blocked target.
    pub const SEARCH_ORDER: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Unit offset in world space (y grows downward).
    pub fn unit(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }

    /// Facing implied by a movement delta. Horizontal wins only when strictly
    /// larger; ties fall through to the vertical axis.
    pub fn from_delta(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "w" => Ok(Direction::Up),
            "down" | "s" => Ok(Direction::Down),
            "left" | "a" => Ok(Direction::Left),
            "right" | "d" => Ok(Direction::Right),
            other => Err(format!("unknown direction `{other}`")),
        }
    }
}

/// Axis-aligned rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Half-open point containment.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Closed overlap test: rectangles that merely touch count as overlapping.
    pub fn touches(&self, other: &Rect) -> bool {
        !(other.right() < self.x
            || other.x > self.right()
            || other.bottom() < self.y
            || other.y > self.bottom())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn direction_from_delta_prefers_vertical_on_tie() {
        assert_eq!(Direction::from_delta(Vec2::new(3.0, 1.0)), Direction::Right);
        assert_eq!(Direction::from_delta(Vec2::new(-3.0, 1.0)), Direction::Left);
        assert_eq!(Direction::from_delta(Vec2::new(2.0, 2.0)), Direction::Down);
        assert_eq!(Direction::from_delta(Vec2::new(2.0, -2.0)), Direction::Up);
    }

    #[test]
    fn direction_parses_keys_and_names() {
        assert_eq!("W".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("right".parse::<Direction>().unwrap(), Direction::Right);
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn rect_containment_is_half_open() {
        let r = Rect::new(0.0, 0.0, 64.0, 64.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(63.9, 63.9)));
        assert!(!r.contains(Vec2::new(64.0, 10.0)));
        assert!(!r.contains(Vec2::new(10.0, 64.0)));
    }

    #[test]
    fn rect_touching_edges_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.touches(&Rect::new(10.0, 0.0, 5.0, 5.0)));
        assert!(!a.touches(&Rect::new(10.5, 0.0, 5.0, 5.0)));
    }
}
