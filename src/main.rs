//! Headless pursuit run driven by a scripted pointer.
//!
//! The script chases the evader and, once within lunge range, swings the
//! pointer so the evader sits on the pursuer's dive side before pressing the
//! action. Transitions are logged at debug level; the outcome at info level.
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use glam::Vec2;
use log::info;
use lunge::steering::{angle_of, delta_angle, rotate_by_degrees};
use lunge::{
    init_logging, spawn_actors, CaptureLog, Evader, PointerInput, Pursuer, PursuitPlugin,
    PursuitSet, SimulationConfig,
};

/// Degrees between the heading and the bearing of a landing dive.
const DIVE_SIDE: f32 = 90.0;
/// Heading error tolerated before the script presses the action.
const AIM_TOLERANCE: f32 = 12.0;

/// Runs the pursuit simulation without a window.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u32,
    /// Seed for the evader's escape draws, overriding the config file
    #[arg(long)]
    seed: Option<u64>,
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
fn scripted_pointer_system(
    settings: Res<lunge::PursuitSettings>,
    mut pointer: ResMut<PointerInput>,
    pursuers: Query<&Pursuer>,
    evaders: Query<&Evader>,
) {
    let (Ok(pursuer), Ok(evader)) = (pursuers.single(), evaders.single()) else {
        return;
    };
    if evader.is_caught() {
        pointer.primary_held = false;
        return;
    }

    let to_evader = evader.position() - pursuer.position();
    if to_evader.length() > settings.pursuer.dive_distance {
        pointer.position = evader.position();
        pointer.primary_held = false;
        return;
    }

    // Dives land to the left of the heading, so aim a quarter turn clockwise.
    pointer.position = pursuer.position() + rotate_by_degrees(to_evader, -DIVE_SIDE);
    let aim = angle_of(to_evader) - DIVE_SIDE;
    pointer.primary_held = delta_angle(pursuer.heading(), aim).abs() < AIM_TOLERANCE;
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("validating configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = load_config(&args)?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(PursuitPlugin::new(config))
        .insert_resource(TimeUpdateStrategy::ManualDuration(config.tick_duration()))
        .add_systems(
            FixedUpdate,
            scripted_pointer_system.before(PursuitSet::Pursuers),
        );

    let half = config.viewport.half_extents;
    let pursuer_at = config.viewport.center - half * 0.75;
    let evader_at = config.viewport.center + half * 0.5;
    let actors = spawn_actors(app.world_mut(), &config, pursuer_at, evader_at);
    info!(
        "simulating {} ticks of {:?} with seed {}",
        args.ticks,
        config.tick_duration(),
        config.seed
    );

    // The first update only starts the manual clock.
    app.update();
    for tick in 1..=args.ticks {
        app.update();
        if !app.world().resource::<CaptureLog>().is_empty() {
            info!("evader caught after {tick} ticks");
            return Ok(());
        }
    }

    let world = app.world();
    let end = |entity| {
        world
            .get::<Transform>(entity)
            .map(|transform| Vec2::new(transform.translation.x, transform.translation.y))
    };
    info!(
        "evader escaped: pursuer at {:?}, evader at {:?}",
        end(actors.pursuer),
        end(actors.evader)
    );
    Ok(())
}
