//! Tick builders for driving controllers by hand.
use std::time::Duration;

use lunge::Tick;

/// Tick of length `dt` seconds ending at `millis`.
///
/// # Examples
/// ```
/// use test_utils::at;
/// let tick = at(250, 0.05);
/// assert_eq!(tick.now.as_millis(), 250);
/// ```
#[must_use]
pub fn at(millis: u64, dt: f32) -> Tick {
    Tick::new(dt, Duration::from_millis(millis))
}

/// `count` consecutive ticks of `step_millis`, the first ending after one step.
pub fn ticks(step_millis: u64, count: u64) -> impl Iterator<Item = Tick> {
    let dt = Duration::from_millis(step_millis).as_secs_f32();
    (1..=count).map(move |n| Tick::new(dt, Duration::from_millis(step_millis * n)))
}
