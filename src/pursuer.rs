//! Pointer-driven pursuer state machine.
//!
//! The pursuer converts a pointer sample into a desired heading and speed,
//! integrates its pose toward it and exposes a capture window through
//! [`PursuerController::is_diving`]. Dive and recovery are purely
//! time-driven; while either is active the speed-based selection between
//! slow and fast movement is suspended.

use glam::Vec2;
use log::debug;

use crate::clock::{Tick, Timestamp};
use crate::config::PursuerConfig;
use crate::steering::{angle_of, heading_vector, lerp, lerp_vec, move_towards, rotate_towards};
use crate::viewport::ViewportProjector;

/// Motion policy of the pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PursuerState {
    /// Tracking the pointer at reduced speed with a tight turning circle.
    #[default]
    MoveSlow,
    /// Tracking the pointer at top speed with sluggish turning.
    MoveFast,
    /// Dashing a fixed distance; the only state in which captures happen.
    Diving,
    /// Motionless cooldown after a dive.
    Recovering,
}

impl PursuerState {
    /// Whether the state is governed by timers rather than speed.
    #[must_use]
    pub const fn is_timed(self) -> bool {
        matches!(self, Self::Diving | Self::Recovering)
    }
}

/// Input sampled from the pointer source each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PursuerInput {
    /// Pointer position in world space.
    pub pointer: Vec2,
    /// Whether the primary action is held.
    pub primary_held: bool,
}

/// Target speed for a pointer at `distance`.
///
/// Zero at or inside the stop threshold, full speed beyond the full-speed
/// distance and a linear ramp in between.
///
/// # Examples
/// ```
/// use lunge::config::PursuerConfig;
/// use lunge::pursuer::target_speed_for_distance;
///
/// let config = PursuerConfig::default();
/// assert_eq!(target_speed_for_distance(&config, 0.25), 0.0);
/// assert_eq!(target_speed_for_distance(&config, 1.25), 2.0);
/// assert_eq!(target_speed_for_distance(&config, 9.0), 4.0);
/// ```
#[must_use]
pub fn target_speed_for_distance(config: &PursuerConfig, distance: f32) -> f32 {
    if distance > config.min_distance_for_max_speed {
        config.max_speed
    } else if distance <= config.stop_threshold {
        0.0
    } else {
        let span = config.min_distance_for_max_speed - config.stop_threshold;
        lerp(0.0, config.max_speed, (distance - config.stop_threshold) / span)
    }
}

/// Snapshot taken when a dive begins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct DiveWindow {
    start: Vec2,
    end: Vec2,
    started_at: Timestamp,
}

/// State machine driving the pursuer.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuerController {
    config: PursuerConfig,
    position: Vec2,
    heading: f32,
    speed: f32,
    target_speed: f32,
    target_angle: f32,
    state: PursuerState,
    dive: DiveWindow,
}

impl PursuerController {
    /// Creates a stationary pursuer at `position` facing +X.
    #[must_use]
    pub fn new(config: PursuerConfig, position: Vec2) -> Self {
        Self {
            config,
            position,
            heading: 0.0,
            speed: 0.0,
            target_speed: 0.0,
            target_angle: 0.0,
            state: PursuerState::MoveSlow,
            dive: DiveWindow::default(),
        }
    }

    /// Returns a copy facing `degrees`.
    #[must_use]
    pub const fn with_heading(mut self, degrees: f32) -> Self {
        self.heading = degrees;
        self
    }

    /// Configuration supplied at construction.
    #[must_use]
    pub const fn config(&self) -> &PursuerConfig {
        &self.config
    }

    /// Current world position.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current heading in degrees.
    #[must_use]
    pub const fn heading(&self) -> f32 {
        self.heading
    }

    /// Current scalar speed.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Speed the pursuer is relaxing toward.
    #[must_use]
    pub const fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Heading toward the last pointer sample, in degrees.
    #[must_use]
    pub const fn target_angle(&self) -> f32 {
        self.target_angle
    }

    /// Current state, for display and diagnostics.
    #[must_use]
    pub const fn state(&self) -> PursuerState {
        self.state
    }

    /// Position at which the latest dive began.
    #[must_use]
    pub const fn dive_start(&self) -> Vec2 {
        self.dive.start
    }

    /// Position at which the latest dive ends.
    #[must_use]
    pub const fn dive_end(&self) -> Vec2 {
        self.dive.end
    }

    /// Timer origin of the current dive or recovery.
    #[must_use]
    pub const fn dive_start_time(&self) -> Timestamp {
        self.dive.started_at
    }

    /// Whether a capture can currently happen.
    #[must_use]
    pub fn is_diving(&self) -> bool {
        self.state == PursuerState::Diving
    }

    /// The pursuer's local right axis: perpendicular-right of the heading.
    #[must_use]
    pub fn right_axis(&self) -> Vec2 {
        heading_vector(self.heading - 90.0)
    }

    /// Advances the pursuer by one tick.
    pub fn tick(&mut self, input: PursuerInput, tick: Tick, viewport: &impl ViewportProjector) {
        self.update_direction_and_speed(input.pointer);
        self.speed = lerp(self.speed, self.target_speed, tick.dt * self.config.inc_speed);
        self.check_for_dive(input.primary_held, tick.now);

        if !self.state.is_timed() {
            let next = if self.speed >= self.config.fast_speed_threshold() {
                PursuerState::MoveFast
            } else {
                PursuerState::MoveSlow
            };
            self.transition(next);
        }

        match self.state {
            PursuerState::MoveSlow => {
                let (speed, turn_rate) = (self.config.slow_speed(), self.config.slow_turn_rate);
                self.move_towards_pointer(input.pointer, speed, turn_rate, tick.dt, viewport);
            }
            PursuerState::MoveFast => {
                let (speed, turn_rate) = (self.config.max_speed, self.config.fast_turn_rate);
                self.move_towards_pointer(input.pointer, speed, turn_rate, tick.dt, viewport);
            }
            PursuerState::Diving => self.dive(tick),
            PursuerState::Recovering => self.recover(tick),
        }
    }

    /// Derives the target speed and angle from a pointer sample.
    pub fn update_direction_and_speed(&mut self, pointer: Vec2) {
        let offset = pointer - self.position;
        self.target_speed = target_speed_for_distance(&self.config, offset.length());
        self.target_angle = angle_of(offset);
    }

    /// Starts a dive if the action is held and no dive or recovery is under
    /// way. Returns whether a dive began.
    pub fn check_for_dive(&mut self, primary_held: bool, now: Timestamp) -> bool {
        if !primary_held || self.state.is_timed() {
            return false;
        }
        self.transition(PursuerState::Diving);
        self.speed = 0.0;
        self.dive = DiveWindow {
            start: self.position,
            end: self.position - self.right_axis() * self.config.dive_distance,
            started_at: now,
        };
        true
    }

    fn move_towards_pointer(
        &mut self,
        pointer: Vec2,
        speed: f32,
        turn_rate: f32,
        dt: f32,
        viewport: &impl ViewportProjector,
    ) {
        self.heading = rotate_towards(self.heading, self.target_angle, turn_rate * dt * 360.0);

        let direction = (pointer - self.position).normalize_or_zero();
        let stepped = move_towards(self.position, self.position + direction, speed * dt);
        self.position = viewport.clamp_to_view(stepped);
    }

    fn dive(&mut self, tick: Tick) {
        let progress = tick.seconds_since(self.dive.started_at) / self.config.dive_time;
        self.position = lerp_vec(self.dive.start, self.dive.end, progress);

        if progress >= 1.0 {
            self.transition(PursuerState::Recovering);
            self.dive.started_at = tick.now;
        }
    }

    fn recover(&mut self, tick: Tick) {
        if tick.seconds_since(self.dive.started_at) >= self.config.dive_recovery_time {
            self.transition(PursuerState::MoveSlow);
        }
    }

    fn transition(&mut self, next: PursuerState) {
        if self.state != next {
            debug!("pursuer {:?} -> {next:?} at {:?}", self.state, self.position);
            self.state = next;
        }
    }
}
