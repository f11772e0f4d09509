//! Angle and vector helpers shared by both controllers.
//! Angles are expressed in degrees, counter-clockwise from the +X axis.
use glam::Vec2;

/// Linear interpolation with the factor clamped into `[0, 1]`.
///
/// # Examples
/// ```
/// use lunge::steering::lerp;
/// assert_eq!(lerp(0.0, 4.0, 0.25), 1.0);
/// assert_eq!(lerp(0.0, 4.0, 3.0), 4.0);
/// ```
#[must_use]
pub fn lerp(from: f32, to: f32, factor: f32) -> f32 {
    let t = factor.clamp(0.0, 1.0);
    from + (to - from) * t
}

/// Vector form of [`lerp`], clamping the factor in the same way.
#[must_use]
pub fn lerp_vec(from: Vec2, to: Vec2, factor: f32) -> Vec2 {
    from.lerp(to, factor.clamp(0.0, 1.0))
}

/// Moves `current` toward `target` by at most `max_step` units.
///
/// Never overshoots: when the target lies within reach it is returned as is.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use lunge::steering::move_towards;
///
/// let step = move_towards(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0);
/// assert_eq!(step, Vec2::new(2.0, 0.0));
/// let arrive = move_towards(Vec2::ZERO, Vec2::new(1.0, 0.0), 2.0);
/// assert_eq!(arrive, Vec2::new(1.0, 0.0));
/// ```
#[must_use]
pub fn move_towards(current: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_step || distance <= f32::EPSILON {
        return target;
    }
    current + offset / distance * max_step
}

/// Signed shortest difference `to - from`, wrapped into `(-180, 180]`.
#[must_use]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    let wrapped = (to - from).rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Rotates `current` toward `target` along the shorter arc by at most
/// `max_delta` degrees.
///
/// # Examples
/// ```
/// use lunge::steering::rotate_towards;
/// assert_eq!(rotate_towards(0.0, 90.0, 30.0), 30.0);
/// assert_eq!(rotate_towards(170.0, -170.0, 5.0), 175.0);
/// assert_eq!(rotate_towards(10.0, 20.0, 45.0), 20.0);
/// ```
#[must_use]
pub fn rotate_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        return target;
    }
    current + max_delta.copysign(delta)
}

/// Unit vector pointing along `degrees`.
#[must_use]
pub fn heading_vector(degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians())
}

/// Rotates `vector` counter-clockwise by `degrees`.
#[must_use]
pub fn rotate_by_degrees(vector: Vec2, degrees: f32) -> Vec2 {
    heading_vector(degrees).rotate(vector)
}

/// Heading of `vector` in degrees, `0.0` for the zero vector.
#[must_use]
pub fn angle_of(vector: Vec2) -> f32 {
    vector.y.atan2(vector.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::forward(0.0, 90.0, 90.0)]
    #[case::backward(90.0, 0.0, -90.0)]
    #[case::wraps_positive(170.0, -170.0, 20.0)]
    #[case::wraps_negative(-170.0, 170.0, -20.0)]
    #[case::half_turn(0.0, 180.0, 180.0)]
    #[case::full_turns(720.0, 10.0, 10.0)]
    fn delta_angle_takes_shorter_arc(#[case] from: f32, #[case] to: f32, #[case] expected: f32) {
        assert_relative_eq!(delta_angle(from, to), expected, epsilon = 1e-4);
    }

    #[rstest]
    #[case::capped(0.0, 100.0, 10.0, 10.0)]
    #[case::capped_negative(0.0, -100.0, 10.0, -10.0)]
    #[case::reaches(0.0, 5.0, 10.0, 5.0)]
    #[case::zero_rate(30.0, 60.0, 0.0, 30.0)]
    fn rotate_towards_is_bounded(
        #[case] current: f32,
        #[case] target: f32,
        #[case] max_delta: f32,
        #[case] expected: f32,
    ) {
        assert_relative_eq!(rotate_towards(current, target, max_delta), expected);
    }

    #[test]
    fn rotate_by_quarter_turn() {
        let rotated = rotate_by_degrees(Vec2::X, 90.0);
        assert_relative_eq!(rotated.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(rotated.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn move_towards_stays_put_on_zero_offset() {
        let here = Vec2::new(1.0, 2.0);
        assert_eq!(move_towards(here, here, 3.0), here);
    }

    #[test]
    fn angle_of_matches_heading_vector() {
        for degrees in [-135.0_f32, -45.0, 0.0, 30.0, 120.0] {
            assert_relative_eq!(angle_of(heading_vector(degrees)), degrees, epsilon = 1e-3);
        }
    }

    #[test]
    fn lerp_clamps_factor_below_zero() {
        assert_eq!(lerp(1.0, 3.0, -2.0), 1.0);
        assert_eq!(lerp_vec(Vec2::ZERO, Vec2::ONE, -1.0), Vec2::ZERO);
    }
}
