//! Tick samples handed to the controllers.
//!
//! Timing effects are modelled with stored timestamps compared against the
//! monotonic clock carried by each tick; nothing ever sleeps.

use std::time::Duration;

/// Monotonic simulation time measured from the start of the run.
pub type Timestamp = Duration;

/// One discrete simulation step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Elapsed time covered by this step, in seconds.
    pub dt: f32,
    /// Monotonic time at which the step is evaluated.
    pub now: Timestamp,
}

impl Tick {
    /// Builds a tick from its step length and monotonic timestamp.
    #[must_use]
    pub const fn new(dt: f32, now: Timestamp) -> Self {
        Self { dt, now }
    }

    /// Seconds elapsed since `earlier`, saturating at zero.
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use lunge::clock::Tick;
    ///
    /// let tick = Tick::new(0.1, Duration::from_millis(1_300));
    /// assert!((tick.seconds_since(Duration::from_secs(1)) - 0.3).abs() < 1e-6);
    /// assert_eq!(tick.seconds_since(Duration::from_secs(5)), 0.0);
    /// ```
    #[must_use]
    pub fn seconds_since(&self, earlier: Timestamp) -> f32 {
        self.now.saturating_sub(earlier).as_secs_f32()
    }
}
