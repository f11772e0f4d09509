//! Headless Bevy apps running [`PursuitPlugin`].
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use glam::Vec2;
use lunge::{
    spawn_actors, ActorPair, CaptureLog, Evader, PointerInput, Pursuer, PursuitPlugin,
    SimulationConfig,
};

/// Builder for test `App` instances where every update runs one fixed tick.
pub struct PursuitTestAppBuilder {
    config: SimulationConfig,
    pursuer_at: Vec2,
    evader_at: Vec2,
}

impl PursuitTestAppBuilder {
    /// Starts from `config` with the pursuer at the origin and the evader far
    /// away on +X.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            pursuer_at: Vec2::ZERO,
            evader_at: Vec2::new(6.0, 0.0),
        }
    }

    /// Places the pursuer.
    #[must_use]
    pub const fn pursuer_at(mut self, position: Vec2) -> Self {
        self.pursuer_at = position;
        self
    }

    /// Places the evader.
    #[must_use]
    pub const fn evader_at(mut self, position: Vec2) -> Self {
        self.evader_at = position;
        self
    }

    /// Builds the app, spawns both actors and starts the manual clock.
    #[must_use]
    pub fn build(self) -> PursuitTestApp {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(PursuitPlugin::new(self.config))
            .insert_resource(TimeUpdateStrategy::ManualDuration(
                self.config.tick_duration(),
            ));
        let actors = spawn_actors(app.world_mut(), &self.config, self.pursuer_at, self.evader_at);
        // The first update records the clock origin without advancing time.
        app.update();
        PursuitTestApp { app, actors }
    }
}

/// App plus the entities spawned into it.
pub struct PursuitTestApp {
    /// The wrapped app.
    pub app: App,
    /// Spawned actors.
    pub actors: ActorPair,
}

impl PursuitTestApp {
    /// Sets the pointer sample read on the next tick.
    pub fn point(&mut self, position: Vec2, primary_held: bool) {
        let mut pointer = self.app.world_mut().resource_mut::<PointerInput>();
        pointer.position = position;
        pointer.primary_held = primary_held;
    }

    /// Runs `count` fixed ticks.
    pub fn tick(&mut self, count: usize) {
        for _ in 0..count {
            self.app.update();
        }
    }

    /// The pursuer component.
    ///
    /// # Panics
    /// Panics if the pursuer entity was despawned.
    #[must_use]
    pub fn pursuer(&self) -> &Pursuer {
        self.app
            .world()
            .get::<Pursuer>(self.actors.pursuer)
            .expect("pursuer should exist")
    }

    /// The evader component.
    ///
    /// # Panics
    /// Panics if the evader entity was despawned.
    #[must_use]
    pub fn evader(&self) -> &Evader {
        self.app
            .world()
            .get::<Evader>(self.actors.evader)
            .expect("evader should exist")
    }

    /// Planar translation of `entity`.
    ///
    /// # Panics
    /// Panics if `entity` has no `Transform`.
    #[must_use]
    pub fn planar(&self, entity: Entity) -> Vec2 {
        let transform = self
            .app
            .world()
            .get::<Transform>(entity)
            .expect("entity should have a Transform");
        Vec2::new(transform.translation.x, transform.translation.y)
    }

    /// Captures recorded so far.
    #[must_use]
    pub fn captures(&self) -> usize {
        self.app.world().resource::<CaptureLog>().len()
    }
}
