//! Circle overlap test backing the collision notifier.
use glam::Vec2;

/// A circular collision volume on the movement plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Centre in world space.
    pub center: Vec2,
    /// Radius in world units.
    pub radius: f32,
}

impl Circle {
    /// Creates a circle.
    #[must_use]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether the two volumes overlap; touching counts.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use lunge::collision::Circle;
    ///
    /// let a = Circle::new(Vec2::ZERO, 0.5);
    /// assert!(a.overlaps(&Circle::new(Vec2::new(1.0, 0.0), 0.5)));
    /// assert!(!a.overlaps(&Circle::new(Vec2::new(1.5, 0.0), 0.5)));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }
}
