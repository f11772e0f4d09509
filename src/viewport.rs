//! World ↔ viewport projection used to keep both actors on screen.
//!
//! Viewport coordinates are normalised: `(0, 0)` is the bottom-left corner of
//! the visible area and `(1, 1)` the top-right one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Converts between world space and normalised viewport space.
pub trait ViewportProjector {
    /// Maps a world position into viewport coordinates.
    fn world_to_viewport(&self, world: Vec2) -> Vec2;

    /// Maps viewport coordinates back into world space.
    fn viewport_to_world(&self, viewport: Vec2) -> Vec2;

    /// Clamps a world position so that it lies within the visible area.
    fn clamp_to_view(&self, world: Vec2) -> Vec2 {
        let view = self.world_to_viewport(world).clamp(Vec2::ZERO, Vec2::ONE);
        self.viewport_to_world(view)
    }

    /// Whether `world` projects inside the viewport shrunk by `margin` on
    /// every side.
    fn within_margin(&self, world: Vec2, margin: f32) -> bool {
        let view = self.world_to_viewport(world);
        let low = margin;
        let high = 1.0 - margin;
        (low..=high).contains(&view.x) && (low..=high).contains(&view.y)
    }
}

/// Axis-aligned orthographic view of the movement plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// World position at the centre of the screen.
    pub center: Vec2,
    /// Half the visible width and height in world units.
    pub half_extents: Vec2,
}

impl Viewport {
    /// Creates a viewport centred on `center`.
    #[must_use]
    pub const fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// Bottom-left corner in world space.
    #[must_use]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Top-right corner in world space.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }
}

impl Default for Viewport {
    /// An orthographic camera of size 5 on a 16:10 screen.
    fn default() -> Self {
        Self::new(Vec2::ZERO, Vec2::new(8.0, 5.0))
    }
}

impl ViewportProjector for Viewport {
    fn world_to_viewport(&self, world: Vec2) -> Vec2 {
        (world - self.min()) / (self.half_extents * 2.0)
    }

    fn viewport_to_world(&self, viewport: Vec2) -> Vec2 {
        self.min() + viewport * self.half_extents * 2.0
    }
}
