#![cfg_attr(docsrs, feature(doc_cfg))]
//! Pursuit and capture between a pointer-driven pursuer and a skittish evader.
//!
//! The controllers in [`pursuer`] and [`evader`] are plain state machines
//! advanced by explicit [`clock::Tick`]s, so they can be driven from tests or
//! from any frame loop. [`plugin::PursuitPlugin`] wires them into a Bevy
//! fixed-tick schedule together with the collision notifier.
pub mod clock;
pub mod collision;
pub mod config;
pub mod evader;
pub mod logging;
pub mod plugin;
pub mod presentation;
pub mod pursuer;
pub mod steering;
pub mod viewport;

pub use clock::{Tick, Timestamp};
pub use config::{ConfigError, EvaderConfig, PursuerConfig, SimulationConfig};
pub use evader::{
    EscapeDraw, EvaderController, EvaderInput, EvaderState, OverlapNotice, Placement,
};
pub use logging::init as init_logging;
pub use plugin::{
    spawn_actors, ActorPair, Attached, CaptureLog, CollisionRadius, Evader, EvaderCaught,
    EvaderRng, OverlapInbox, PointerInput, Pursuer, PursuitPlugin, PursuitSet, PursuitSettings,
    Tint, ViewportBounds,
};
pub use pursuer::{PursuerController, PursuerInput, PursuerState};
pub use viewport::{Viewport, ViewportProjector};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use lunge::prelude::*;
    //! use glam::Vec2;
    //! use std::time::Duration;
    //!
    //! let mut pursuer = PursuerController::new(PursuerConfig::default(), Vec2::ZERO);
    //! let input = PursuerInput { pointer: Vec2::new(3.0, 0.0), primary_held: false };
    //! pursuer.tick(input, Tick::new(0.1, Duration::from_millis(100)), &Viewport::default());
    //! assert!(pursuer.position().x > 0.0);
    //! ```

    pub use crate::clock::Tick;
    pub use crate::config::{EvaderConfig, PursuerConfig, SimulationConfig};
    pub use crate::evader::{EvaderController, EvaderInput, EvaderState};
    pub use crate::plugin::{PointerInput, PursuitPlugin};
    pub use crate::pursuer::{PursuerController, PursuerInput, PursuerState};
    pub use crate::viewport::{Viewport, ViewportProjector};
}
