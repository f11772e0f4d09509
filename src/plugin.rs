//! Bevy plugin wiring the controllers into the fixed-tick schedule.
//!
//! Each `FixedUpdate` runs four ordered sets: pursuers advance first, the
//! collision notifier then queues overlap notices, evaders consume them, and
//! finally attached evaders are snapped onto their carriers while tints are
//! refreshed. A dive begun in a tick is therefore visible to that same tick's
//! capture check.

use std::time::Duration;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use glam::Vec2;
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::clock::Tick;
use crate::collision::Circle;
use crate::config::SimulationConfig;
use crate::evader::{EvaderController, EvaderInput, EvaderState, OverlapNotice, Placement};
use crate::presentation::{evader_color, pursuer_color, DisplayColor};
use crate::pursuer::{PursuerController, PursuerInput, PursuerState};
use crate::viewport::Viewport;

/// Pursuer controller attached to an entity.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct Pursuer(pub PursuerController);

/// Evader controller attached to an entity; tracks its pursuer by [`Entity`].
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct Evader(pub EvaderController<Entity>);

/// Radius of an actor's circular collision volume.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct CollisionRadius(pub f32);

/// Holds a caught evader at a fixed offset in its carrier's frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Attached {
    /// Carrying pursuer.
    pub parent: Entity,
    /// Offset in the carrier's local frame.
    pub offset: Vec2,
}

/// Colour a renderer should tint the actor with.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deref)]
pub struct Tint(pub DisplayColor);

/// Latest sample from the pointer source, written by the host application.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    /// Pointer position in world space.
    pub position: Vec2,
    /// Whether the primary action is held.
    pub primary_held: bool,
}

/// Visible area used for clamping and escape placement.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Deref, DerefMut)]
pub struct ViewportBounds(pub Viewport);

/// Validated configuration the plugin was built with.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Deref)]
pub struct PursuitSettings(pub SimulationConfig);

/// Random source for escape hops.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct EvaderRng(pub StdRng);

impl EvaderRng {
    /// Deterministic generator for `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Overlap reported by the collision notifier for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapEvent {
    /// Evader whose volume is overlapped.
    pub evader: Entity,
    /// Notice delivered into the evader's next update.
    pub notice: OverlapNotice,
}

/// Overlap notices awaiting delivery to evaders.
#[derive(Resource, Default, Debug)]
pub struct OverlapInbox {
    events: Vec<OverlapEvent>,
}

impl OverlapInbox {
    /// Queues a notice.
    pub fn push(&mut self, event: OverlapEvent) {
        self.events.push(event);
    }

    /// Removes and returns every queued notice.
    pub fn drain(&mut self) -> std::vec::Drain<'_, OverlapEvent> {
        self.events.drain(..)
    }

    /// Whether no notices are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Raised once when an evader is captured.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaderCaught {
    /// The captured evader.
    pub evader: Entity,
    /// The pursuer now carrying it.
    pub pursuer: Entity,
}

/// Every capture observed so far, in order.
#[derive(Resource, Default, Debug, Deref)]
pub struct CaptureLog(pub Vec<EvaderCaught>);

/// Ordered stages of a simulation tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PursuitSet {
    /// Pursuer controllers advance.
    Pursuers,
    /// The collision notifier queues overlap notices.
    Overlaps,
    /// Evader controllers advance and consume notices.
    Evaders,
    /// Attached evaders follow their carriers and tints are refreshed.
    Attachments,
}

/// Entities created by [`spawn_actors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorPair {
    /// The pursuer entity.
    pub pursuer: Entity,
    /// The evader entity tracking it.
    pub evader: Entity,
}

/// Spawns a pursuer and an evader tracking it.
pub fn spawn_actors(
    world: &mut World,
    config: &SimulationConfig,
    pursuer_at: Vec2,
    evader_at: Vec2,
) -> ActorPair {
    let pursuer = world
        .spawn((
            Pursuer(PursuerController::new(config.pursuer, pursuer_at)),
            CollisionRadius(config.collision_radius),
            Tint(pursuer_color(PursuerState::default())),
            Transform::from_xyz(pursuer_at.x, pursuer_at.y, 0.0),
            Name::new("Pursuer"),
        ))
        .id();
    let evader = world
        .spawn((
            Evader(EvaderController::new(config.evader, pursuer, evader_at)),
            CollisionRadius(config.collision_radius),
            Tint(evader_color(EvaderState::default())),
            Transform::from_xyz(evader_at.x, evader_at.y, 0.0),
            Name::new("Evader"),
        ))
        .id();
    ActorPair { pursuer, evader }
}

fn current_tick(time: &Time) -> Tick {
    Tick::new(time.delta_secs(), time.elapsed())
}

fn write_pose(transform: &mut Transform, position: Vec2, heading: f32) {
    transform.translation.x = position.x;
    transform.translation.y = position.y;
    transform.rotation = Quat::from_rotation_z(heading.to_radians());
}

/// Advances every pursuer from the current pointer sample.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn advance_pursuers_system(
    time: Res<Time>,
    pointer: Res<PointerInput>,
    viewport: Res<ViewportBounds>,
    mut pursuers: Query<(&mut Pursuer, &mut Transform)>,
) {
    let tick = current_tick(&time);
    let input = PursuerInput {
        pointer: pointer.position,
        primary_held: pointer.primary_held,
    };
    for (mut pursuer, mut transform) in &mut pursuers {
        pursuer.tick(input, tick, &viewport.0);
        write_pose(&mut transform, pursuer.position(), pursuer.heading());
    }
}

/// Collision notifier: queues a notice for every evader overlapping the
/// pursuer it tracks.
pub fn detect_overlaps_system(
    pursuers: Query<(&Pursuer, &CollisionRadius)>,
    evaders: Query<(Entity, &Evader, &CollisionRadius)>,
    mut inbox: ResMut<OverlapInbox>,
) {
    for (entity, evader, radius) in &evaders {
        let Ok((pursuer, pursuer_radius)) = pursuers.get(evader.pursuer()) else {
            continue;
        };
        let body = Circle::new(evader.position(), radius.0);
        let hunter = Circle::new(pursuer.position(), pursuer_radius.0);
        if hunter.overlaps(&body) {
            inbox.push(OverlapEvent {
                evader: entity,
                notice: OverlapNotice {
                    pursuer_diving: pursuer.is_diving(),
                },
            });
        }
    }
}

/// Advances every evader, delivering any queued overlap notices.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn advance_evaders_system(
    mut commands: Commands,
    time: Res<Time>,
    viewport: Res<ViewportBounds>,
    mut rng: ResMut<EvaderRng>,
    mut inbox: ResMut<OverlapInbox>,
    pursuers: Query<&Pursuer>,
    mut evaders: Query<(Entity, &mut Evader, &mut Transform)>,
) {
    let tick = current_tick(&time);
    let notices: Vec<OverlapEvent> = inbox.drain().collect();

    for (entity, mut evader, mut transform) in &mut evaders {
        let Ok(pursuer) = pursuers.get(evader.pursuer()) else {
            warn!("evader {entity} tracks missing pursuer {}", evader.pursuer());
            continue;
        };
        let overlap = notices
            .iter()
            .find(|event| event.evader == entity)
            .map(|event| event.notice);
        let input = EvaderInput {
            pursuer_position: pursuer.position(),
            overlap,
        };

        let was_caught = evader.is_caught();
        evader.tick(input, tick, &viewport.0, &mut rng.0);

        match evader.placement() {
            Placement::Free(position) => {
                transform.translation.x = position.x;
                transform.translation.y = position.y;
            }
            Placement::Attached { parent, offset } if !was_caught => {
                commands.entity(entity).insert(Attached { parent, offset });
                commands.trigger(EvaderCaught {
                    evader: entity,
                    pursuer: parent,
                });
            }
            Placement::Attached { .. } => {}
        }
    }
}

/// Moves attached evaders to their offset in the carrier's frame.
pub fn resolve_attachments_system(
    carriers: Query<&Pursuer>,
    mut attached: Query<(&Attached, &mut Transform)>,
) {
    for (link, mut transform) in &mut attached {
        let Ok(carrier) = carriers.get(link.parent) else {
            continue;
        };
        let placement = Placement::Attached {
            parent: link.parent,
            offset: link.offset,
        };
        let world = placement.resolve(carrier.position(), carrier.heading());
        write_pose(&mut transform, world, carrier.heading());
    }
}

/// Refreshes each actor's tint from its controller state.
pub fn sync_tints_system(
    mut pursuers: Query<(&Pursuer, &mut Tint), Without<Evader>>,
    mut evaders: Query<(&Evader, &mut Tint), Without<Pursuer>>,
) {
    for (pursuer, mut tint) in &mut pursuers {
        let color = pursuer_color(pursuer.state());
        if tint.0 != color {
            tint.0 = color;
        }
    }
    for (evader, mut tint) in &mut evaders {
        let color = evader_color(evader.state());
        if tint.0 != color {
            tint.0 = color;
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn record_capture(event: On<EvaderCaught>, mut captures: ResMut<CaptureLog>) {
    let EvaderCaught { evader, pursuer } = event.event();
    info!("evader {evader} caught by pursuer {pursuer}");
    captures.0.push(*event.event());
}

/// Bevy plugin installing the pursuit simulation.
#[derive(Debug, Clone, Default)]
pub struct PursuitPlugin {
    /// Configuration for the controllers and the schedule.
    pub config: SimulationConfig,
}

impl PursuitPlugin {
    /// Plugin using `config`.
    #[must_use]
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Fixed tick length derived from the configuration.
    #[must_use]
    pub fn timestep(&self) -> Duration {
        self.config.tick_duration()
    }
}

impl Plugin for PursuitPlugin {
    fn build(&self, app: &mut App) {
        if let Err(e) = self.config.validate() {
            error!("pursuit plugin disabled: {e}");
            return;
        }

        app.register_type::<CollisionRadius>();
        app.insert_resource(PursuitSettings(self.config));
        app.insert_resource(ViewportBounds(self.config.viewport));
        app.insert_resource(EvaderRng::seeded(self.config.seed));
        app.insert_resource(Time::<Fixed>::from_duration(self.timestep()));
        app.init_resource::<PointerInput>();
        app.init_resource::<OverlapInbox>();
        app.init_resource::<CaptureLog>();
        app.add_observer(record_capture);

        app.configure_sets(
            FixedUpdate,
            (
                PursuitSet::Pursuers,
                PursuitSet::Overlaps,
                PursuitSet::Evaders,
                PursuitSet::Attachments,
            )
                .chain(),
        );
        app.add_systems(
            FixedUpdate,
            (
                advance_pursuers_system.in_set(PursuitSet::Pursuers),
                detect_overlaps_system.in_set(PursuitSet::Overlaps),
                advance_evaders_system.in_set(PursuitSet::Evaders),
                (resolve_attachments_system, sync_tints_system).in_set(PursuitSet::Attachments),
            ),
        );
    }
}
