//! Camera/viewport mapping
//!
//! World space is unbounded and absolute; the camera keeps the player at the
//! center of the viewport. Screen space has its origin at the top-left with y
//! pointing down, matching world y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{VIEWPORT_HEIGHT, VIEWPORT_WIDTH};
use crate::sim::World;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// World position shown at the viewport center
    pub center: Vec2,
    /// Viewport size in pixels
    pub viewport: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: Vec2::ZERO,
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
        }
    }
}

impl Camera {
    /// Camera centered on the player of `world`
    pub fn for_world(world: &World) -> Self {
        let mut camera = Self::default();
        camera.follow(world.player.pos);
        camera
    }

    pub fn follow(&mut self, target: Vec2) {
        self.center = target;
    }

    /// Ignore degenerate sizes (minimized windows)
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = Vec2::new(width, height);
        }
    }

    pub fn world_to_screen(&self, pos: Vec2) -> Vec2 {
        pos - self.center + self.viewport * 0.5
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen - self.viewport * 0.5 + self.center
    }

    /// Normalized device coordinates (-1..1, y up)
    pub fn world_to_ndc(&self, pos: Vec2) -> Vec2 {
        let rel = (pos - self.center) / (self.viewport * 0.5);
        Vec2::new(rel.x, -rel.y)
    }

    /// Whether a circle at `pos` with `margin` radius touches the viewport
    pub fn is_visible(&self, pos: Vec2, margin: f32) -> bool {
        let half = self.viewport * 0.5 + Vec2::splat(margin);
        let rel = (pos - self.center).abs();
        rel.x <= half.x && rel.y <= half.y
    }
}
