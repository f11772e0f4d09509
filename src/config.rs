//! Immutable tunables for the pursuer, the evader and the simulation run.
//!
//! Each controller receives its configuration by value at construction. The
//! structs deserialise from JSON with every field optional, falling back to
//! the defaults below, and [`SimulationConfig::validate`] rejects values the
//! controllers cannot honour.

use std::fs;
use std::path::Path;
use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::viewport::Viewport;

/// Errors raised while loading or validating a [`SimulationConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// Path that was requested.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid JSON for [`SimulationConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The speed ramp would divide by a non-positive span.
    #[error(
        "min_distance_for_max_speed ({max_at}) must exceed stop_threshold ({stop_at})"
    )]
    EmptySpeedRamp {
        /// Configured stop threshold.
        stop_at: f32,
        /// Configured full-speed distance.
        max_at: f32,
    },
    /// A duration is zero, negative or not finite.
    #[error("{field} must be a positive number of seconds, got {value}")]
    NonPositiveDuration {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A scalar that must be non-negative is negative or not finite.
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The safe margin leaves no usable viewport area.
    #[error("safe_margin must lie in [0, 0.5), got {0}")]
    Margin(f32),
    /// The viewport has a zero or negative extent.
    #[error("viewport half extents must be positive, got {0:?}")]
    Viewport(Vec2),
    /// The viewport centre is not a finite point.
    #[error("viewport center must be finite, got {0:?}")]
    ViewportCenter(Vec2),
    /// The tick length rounds to zero whole microseconds.
    #[error("tick_seconds must be at least one microsecond, got {0}")]
    TickTooShort(f32),
    /// The placement attempts budget is zero.
    #[error("max_move_attempts must be at least 1")]
    NoMoveAttempts,
}

/// Tunables for the pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuerConfig {
    /// Top translation speed in world units per second.
    pub max_speed: f32,
    /// Fraction of `max_speed` used while moving slowly.
    pub slow_speed_ratio: f32,
    /// Rate at which `speed` relaxes toward the target speed.
    pub inc_speed: f32,
    /// Fraction of `max_speed` at which the pursuer counts as moving fast.
    pub fast_speed_ratio: f32,
    /// Turn rate while moving slowly, in revolutions per second.
    pub slow_turn_rate: f32,
    /// Turn rate while moving fast, in revolutions per second.
    pub fast_turn_rate: f32,
    /// Pointer distance at or below which the pursuer wants to stop.
    pub stop_threshold: f32,
    /// Pointer distance above which the pursuer wants full speed.
    pub min_distance_for_max_speed: f32,
    /// Duration of a dive, in seconds.
    pub dive_time: f32,
    /// Time spent motionless after a dive, in seconds.
    pub dive_recovery_time: f32,
    /// Length of a dive in world units.
    pub dive_distance: f32,
}

impl Default for PursuerConfig {
    fn default() -> Self {
        Self {
            max_speed: 4.0,
            slow_speed_ratio: 0.66,
            inc_speed: 2.0,
            fast_speed_ratio: 0.95,
            slow_turn_rate: 3.0,
            fast_turn_rate: 0.69,
            stop_threshold: 0.5,
            min_distance_for_max_speed: 2.0,
            dive_time: 0.3,
            dive_recovery_time: 0.5,
            dive_distance: 3.0,
        }
    }
}

impl PursuerConfig {
    /// Translation speed while in the slow movement state.
    ///
    /// # Examples
    /// ```
    /// use lunge::config::PursuerConfig;
    /// let config = PursuerConfig { max_speed: 10.0, ..PursuerConfig::default() };
    /// assert!((config.slow_speed() - 6.6).abs() < 1e-5);
    /// ```
    #[must_use]
    pub fn slow_speed(&self) -> f32 {
        self.max_speed * self.slow_speed_ratio
    }

    /// Speed at or above which the pursuer switches to fast movement.
    #[must_use]
    pub fn fast_speed_threshold(&self) -> f32 {
        self.max_speed * self.fast_speed_ratio
    }

    /// Checks the invariants the pursuer relies on.
    ///
    /// # Errors
    /// Returns [`ConfigError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("max_speed", self.max_speed),
            ("slow_speed_ratio", self.slow_speed_ratio),
            ("inc_speed", self.inc_speed),
            ("fast_speed_ratio", self.fast_speed_ratio),
            ("slow_turn_rate", self.slow_turn_rate),
            ("fast_turn_rate", self.fast_turn_rate),
            ("stop_threshold", self.stop_threshold),
            ("min_distance_for_max_speed", self.min_distance_for_max_speed),
            ("dive_distance", self.dive_distance),
        ] {
            non_negative(field, value)?;
        }
        positive_duration("dive_time", self.dive_time)?;
        positive_duration("dive_recovery_time", self.dive_recovery_time)?;
        let span = self.min_distance_for_max_speed - self.stop_threshold;
        if span.is_nan() || span <= 0.0 {
            return Err(ConfigError::EmptySpeedRamp {
                stop_at: self.stop_threshold,
                max_at: self.min_distance_for_max_speed,
            });
        }
        Ok(())
    }
}

/// Tunables for the evader.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaderConfig {
    /// Duration of a hop, in seconds.
    pub hop_time: f32,
    /// Hop speed in world units per second.
    pub hop_speed: f32,
    /// Pursuer distance below which the evader hops away.
    pub fright_radius: f32,
    /// Placement attempts budget.
    ///
    /// The escape heuristic performs a single fallback rotation and does not
    /// consume this budget.
    pub max_move_attempts: u32,
    /// Half-width of the random escape cone, in degrees.
    pub spread_degrees: f32,
    /// Viewport margin a first-choice hop must respect on both axes.
    pub safe_margin: f32,
    /// Local offset from the pursuer at which a caught evader is held.
    pub attach_offset: Vec2,
}

impl Default for EvaderConfig {
    fn default() -> Self {
        Self {
            hop_time: 0.2,
            hop_speed: 6.0,
            fright_radius: 3.0,
            max_move_attempts: 50,
            spread_degrees: 60.0,
            safe_margin: 0.05,
            attach_offset: Vec2::new(0.0, -0.5),
        }
    }
}

impl EvaderConfig {
    /// Distance covered by a hop that runs for its full duration.
    #[must_use]
    pub fn hop_length(&self) -> f32 {
        self.hop_speed * self.hop_time
    }

    /// Checks the invariants the evader relies on.
    ///
    /// # Errors
    /// Returns [`ConfigError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_duration("hop_time", self.hop_time)?;
        non_negative("hop_speed", self.hop_speed)?;
        non_negative("fright_radius", self.fright_radius)?;
        non_negative("spread_degrees", self.spread_degrees)?;
        if !(0.0..0.5).contains(&self.safe_margin) {
            return Err(ConfigError::Margin(self.safe_margin));
        }
        if self.max_move_attempts == 0 {
            return Err(ConfigError::NoMoveAttempts);
        }
        Ok(())
    }
}

/// Everything needed to run a pursuit simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Pursuer tunables.
    pub pursuer: PursuerConfig,
    /// Evader tunables.
    pub evader: EvaderConfig,
    /// Visible area both actors are kept inside.
    pub viewport: Viewport,
    /// Fixed tick length in seconds.
    pub tick_seconds: f32,
    /// Seed for the evader's escape draws.
    pub seed: u64,
    /// Radius of each actor's collision circle.
    pub collision_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pursuer: PursuerConfig::default(),
            evader: EvaderConfig::default(),
            viewport: Viewport::default(),
            tick_seconds: 0.02,
            seed: 0,
            collision_radius: 0.5,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and any validation
    /// error raised by [`SimulationConfig::validate`].
    ///
    /// # Examples
    /// ```
    /// use lunge::config::SimulationConfig;
    /// let config = SimulationConfig::from_json_str(r#"{ "seed": 7, "pursuer": { "max_speed": 5.0 } }"#)
    ///     .expect("valid config");
    /// assert_eq!(config.seed, 7);
    /// assert_eq!(config.pursuer.max_speed, 5.0);
    /// assert_eq!(config.evader.fright_radius, 3.0);
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise the
    /// errors of [`SimulationConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Validates every nested configuration.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pursuer.validate()?;
        self.evader.validate()?;
        positive_duration("tick_seconds", self.tick_seconds)?;
        if self.tick_duration().is_zero() {
            return Err(ConfigError::TickTooShort(self.tick_seconds));
        }
        non_negative("collision_radius", self.collision_radius)?;
        let extents = self.viewport.half_extents;
        if !extents.is_finite() || extents.x <= 0.0 || extents.y <= 0.0 {
            return Err(ConfigError::Viewport(extents));
        }
        if !self.viewport.center.is_finite() {
            return Err(ConfigError::ViewportCenter(self.viewport.center));
        }
        Ok(())
    }

    /// Fixed tick length rounded to whole microseconds.
    ///
    /// Rounding keeps decimal tick lengths such as `0.1` exact once they are
    /// handed to the scheduler.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "negative and non-finite tick_seconds are rejected by validate"
    )]
    pub fn tick_duration(&self) -> Duration {
        let micros = (f64::from(self.tick_seconds) * 1_000_000.0).round();
        Duration::from_micros(micros.max(0.0) as u64)
    }
}

fn positive_duration(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositiveDuration { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
