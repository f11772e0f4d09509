//! Utility helpers for tests.
//!
//! [`draw`] scripts the evader's random choices, [`clock`] builds tick
//! sequences and [`app`] assembles headless Bevy apps running the plugin.
pub mod app;
pub mod clock;
pub mod draw;

pub use app::PursuitTestAppBuilder;
pub use clock::{at, ticks};
pub use draw::ScriptedDraw;

use glam::Vec2;
use lunge::Viewport;

/// Viewport large enough that neither actor meets an edge.
///
/// # Examples
/// ```
/// use test_utils::open_field;
/// assert_eq!(open_field().half_extents.x, 50.0);
/// ```
#[must_use]
pub fn open_field() -> Viewport {
    Viewport::new(Vec2::ZERO, Vec2::splat(50.0))
}

/// Assert that `actual` lies within `tolerance` of `expected`.
///
/// # Panics
/// Panics with both vectors when they are too far apart.
pub fn assert_near(actual: Vec2, expected: Vec2, tolerance: f32) {
    assert!(
        actual.distance(expected) <= tolerance,
        "expected {expected:?}, got {actual:?}"
    );
}
