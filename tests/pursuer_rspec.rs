//! Behaviour-driven tests for the pursuer using rust-rspec.
//!
//! Covers the speed-driven movement states and the dive timeline when the
//! controller is advanced by hand at a fixed 100 ms tick.

use glam::Vec2;
use lunge::{PursuerConfig, PursuerController, PursuerInput, PursuerState, Tick};
use test_utils::{open_field, ticks};

#[derive(Clone, Debug)]
struct Chase {
    pursuer: PursuerController,
    states: Vec<PursuerState>,
    speeds: Vec<f32>,
    elapsed_ticks: u64,
}

impl Default for Chase {
    fn default() -> Self {
        Self {
            pursuer: PursuerController::new(PursuerConfig::default(), Vec2::ZERO),
            states: Vec::new(),
            speeds: Vec::new(),
            elapsed_ticks: 0,
        }
    }
}

impl Chase {
    fn run(&mut self, pointer: Vec2, primary_held: bool, count: u64) {
        let input = PursuerInput {
            pointer,
            primary_held,
        };
        let viewport = open_field();
        let start = self.elapsed_ticks;
        for tick in ticks(100, start + count).skip(usize::try_from(start).unwrap_or(0)) {
            self.step(input, tick, &viewport);
        }
        self.elapsed_ticks = start + count;
    }

    fn step(&mut self, input: PursuerInput, tick: Tick, viewport: &lunge::Viewport) {
        self.pursuer.tick(input, tick, viewport);
        self.states.push(self.pursuer.state());
        self.speeds.push(self.pursuer.speed());
    }

    fn assert_state_tracks_speed(&self) {
        let threshold = self.pursuer.config().fast_speed_threshold();
        for (state, speed) in self.states.iter().zip(&self.speeds) {
            assert_ne!(*state, PursuerState::Diving, "dived without the action");
            assert_eq!(
                *state == PursuerState::MoveFast,
                *speed >= threshold,
                "state {state:?} disagrees with speed {speed}"
            );
        }
    }
}

#[test]
fn pursuer_follows_a_released_pointer() {
    rspec::run(&rspec::given(
        "a pursuer at the origin with the action released",
        Chase::default(),
        |ctx| {
            ctx.when("the pointer sits five units away for ten ticks", |ctx| {
                ctx.before_each(|chase| chase.run(Vec2::new(5.0, 0.0), false, 10));
                ctx.then("it is fast exactly when its speed reaches the threshold", |chase| {
                    assert_eq!(chase.states.len(), 10);
                    chase.assert_state_tracks_speed();
                });
                ctx.then("it has moved toward the pointer", |chase| {
                    let position = chase.pursuer.position();
                    assert!(position.x > 0.0 && position.x < 5.0);
                });
            });
            ctx.when("the pointer sits far away for two seconds", |ctx| {
                ctx.before_each(|chase| chase.run(Vec2::new(40.0, 0.0), false, 20));
                ctx.then("it reaches the fast state", |chase| {
                    assert_eq!(chase.pursuer.state(), PursuerState::MoveFast);
                    chase.assert_state_tracks_speed();
                });
            });
        },
    ));
}

#[test]
fn pursuer_dives_on_the_action() {
    rspec::run(&rspec::given(
        "a pursuer moving slowly toward the pointer",
        Chase::default(),
        |ctx| {
            ctx.before_each(|chase| chase.run(Vec2::new(5.0, 0.0), false, 3));
            ctx.when("the action is pressed", |ctx| {
                ctx.before_each(|chase| chase.run(Vec2::new(5.0, 0.0), true, 1));
                ctx.then("it dives immediately from standstill", |chase| {
                    assert_eq!(chase.pursuer.state(), PursuerState::Diving);
                    assert!(chase.pursuer.is_diving());
                    assert_eq!(chase.pursuer.speed(), 0.0);
                    assert_eq!(chase.pursuer.position(), chase.pursuer.dive_start());
                });
                ctx.then("the dive covers the configured distance", |chase| {
                    let span = chase.pursuer.dive_end() - chase.pursuer.dive_start();
                    assert!((span.length() - 3.0).abs() < 1e-5);
                });
            });
            ctx.when("the action is held for the whole dive", |ctx| {
                ctx.before_each(|chase| chase.run(Vec2::new(5.0, 0.0), true, 4));
                ctx.then("it lands on the dive end and recovers", |chase| {
                    assert_eq!(chase.pursuer.position(), chase.pursuer.dive_end());
                    assert_eq!(chase.pursuer.state(), PursuerState::Recovering);
                    assert!(!chase.pursuer.is_diving());
                });
            });
            ctx.when("recovery runs out", |ctx| {
                ctx.before_each(|chase| {
                    chase.run(Vec2::new(5.0, 0.0), true, 4);
                    chase.run(Vec2::new(5.0, 0.0), false, 5);
                });
                ctx.then("it moves again", |chase| {
                    assert!(!chase.pursuer.state().is_timed());
                });
            });
        },
    ));
}
