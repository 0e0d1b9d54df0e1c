use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilewalk_common::Rect;

/// Viewport onto the world, recomputed from the followed entity every frame.
///
/// Only [`Camera::follow`] and [`Camera::resize`] change it; the camera is
/// derived state and is never steered on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    position: Vec2,
    size: Vec2,
}

impl Camera {
    pub fn new(size: Vec2) -> Self {
        Self {
            position: Vec2::ZERO,
            size,
        }
    }

    /// Top-left corner in world units.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Change the viewport size (window resize). Takes effect on the next
    /// [`Camera::follow`].
    pub fn resize(&mut self, size: Vec2) {
        self.size = size;
    }

    /// Centre the viewport on `target`, then clamp each axis to
    /// `[0, world - viewport]`. When the world is smaller than the viewport
    /// on an axis, that axis collapses to 0.
    pub fn follow(&mut self, target: Vec2, world_size: Vec2) {
        let desired = target - self.size / 2.0;
        let max = world_size - self.size;
        self.position = Vec2::new(
            0.0_f32.max(desired.x.min(max.x)),
            0.0_f32.max(desired.y.min(max.y)),
        );
    }

    /// Inclusive test of a point against the viewport grown by `margin`.
    pub fn is_visible(&self, world: Vec2, margin: f32) -> bool {
        world.x + margin >= self.position.x
            && world.x - margin <= self.position.x + self.size.x
            && world.y + margin >= self.position.y
            && world.y - margin <= self.position.y + self.size.y
    }

    /// Whether any part of a world rectangle is on screen.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.rect().touches(rect)
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(3200.0, 3200.0);

    fn camera() -> Camera {
        Camera::new(Vec2::new(800.0, 600.0))
    }

    #[test]
    fn follow_centres_on_target() {
        let mut cam = camera();
        cam.follow(Vec2::new(1600.0, 1600.0), WORLD);
        assert_eq!(cam.position(), Vec2::new(1200.0, 1300.0));
    }

    #[test]
    fn follow_clamps_at_edges() {
        let mut cam = camera();
        cam.follow(Vec2::new(10.0, 10.0), WORLD);
        assert_eq!(cam.position(), Vec2::ZERO);
        cam.follow(Vec2::new(3190.0, 3199.0), WORLD);
        assert_eq!(cam.position(), Vec2::new(2400.0, 2600.0));
    }

    #[test]
    fn follow_stays_in_bounds_everywhere() {
        let mut cam = camera();
        for i in -10..=50 {
            let p = Vec2::new(i as f32 * 71.0, 3300.0 - i as f32 * 67.0);
            cam.follow(p, WORLD);
            let pos = cam.position();
            assert!(pos.x >= 0.0 && pos.x <= WORLD.x - cam.size().x);
            assert!(pos.y >= 0.0 && pos.y <= WORLD.y - cam.size().y);
        }
    }

    #[test]
    fn small_world_pins_to_origin() {
        let mut cam = camera();
        cam.follow(Vec2::new(300.0, 200.0), Vec2::new(500.0, 400.0));
        assert_eq!(cam.position(), Vec2::ZERO);
    }

    #[test]
    fn resize_applies_on_next_follow() {
        let mut cam = camera();
        cam.resize(Vec2::new(400.0, 400.0));
        assert_eq!(cam.position(), Vec2::ZERO);
        cam.follow(Vec2::new(1600.0, 1600.0), WORLD);
        assert_eq!(cam.position(), Vec2::new(1400.0, 1400.0));
    }

    #[test]
    fn screen_world_round_trip() {
        let mut cam = camera();
        cam.follow(Vec2::new(1234.0, 987.5), WORLD);
        for p in [
            Vec2::ZERO,
            Vec2::new(13.0, 799.0),
            Vec2::new(400.25, 300.5),
            Vec2::new(-64.0, 1024.0),
        ] {
            assert_eq!(cam.world_to_screen(cam.screen_to_world(p)), p);
            assert_eq!(cam.screen_to_world(cam.world_to_screen(p)), p);
        }
    }

    #[test]
    fn visibility_is_inclusive_with_margin() {
        let mut cam = camera();
        cam.follow(Vec2::new(1600.0, 1600.0), WORLD);
        assert!(cam.is_visible(Vec2::new(1200.0, 1300.0), 0.0));
        assert!(cam.is_visible(Vec2::new(2000.0, 1900.0), 0.0));
        assert!(!cam.is_visible(Vec2::new(2001.0, 1500.0), 0.0));
        assert!(cam.is_visible(Vec2::new(2001.0, 1500.0), 1.0));
        assert!(!cam.is_visible(Vec2::new(1150.0, 1500.0), 32.0));
        assert!(cam.is_visible(Vec2::new(1150.0, 1500.0), 50.0));
    }

    #[test]
    fn overlap_detects_partially_visible_rects() {
        let cam = camera();
        assert!(cam.overlaps(&Rect::new(-20.0, -20.0, 32.0, 48.0)));
        assert!(!cam.overlaps(&Rect::new(-40.0, 10.0, 32.0, 48.0)));
        assert!(cam.overlaps(&Rect::new(800.0, 600.0, 32.0, 48.0)));
    }
}
