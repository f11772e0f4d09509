//! Autonomous evader state machine.
//!
//! The evader watches the pursuer it was constructed to track. When the
//! pursuer comes within the fright radius it draws a randomised escape hop
//! and runs it for a fixed duration. An overlap notice delivered while the
//! pursuer is diving captures it: the evader becomes immobile and is held at a
//! fixed offset in the pursuer's frame from then on.

use glam::Vec2;
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use crate::clock::{Tick, Timestamp};
use crate::config::EvaderConfig;
use crate::steering::{heading_vector, move_towards, rotate_by_degrees};
use crate::viewport::ViewportProjector;

/// Behaviour state of the evader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvaderState {
    /// Waiting for the pursuer to come too close.
    #[default]
    Idle,
    /// Choosing an escape hop; lasts zero time.
    HopStart,
    /// Running an escape hop.
    Hop,
    /// Held by the pursuer. Absorbing.
    Caught,
}

/// Random choices made by the escape heuristic.
pub trait EscapeDraw {
    /// Uniform angle in `[-spread_degrees, spread_degrees]`.
    fn spread_angle(&mut self, spread_degrees: f32) -> f32;

    /// Either `90.0` or `-90.0` with equal probability.
    fn quarter_turn(&mut self) -> f32;
}

impl EscapeDraw for StdRng {
    fn spread_angle(&mut self, spread_degrees: f32) -> f32 {
        if spread_degrees > 0.0 {
            self.gen_range(-spread_degrees..=spread_degrees)
        } else {
            0.0
        }
    }

    fn quarter_turn(&mut self) -> f32 {
        if self.gen_bool(0.5) {
            90.0
        } else {
            -90.0
        }
    }
}

/// Notice from the collision collaborator that the pursuer overlaps the
/// evader this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapNotice {
    /// The pursuer's `is_diving()` flag at the time of the overlap.
    pub pursuer_diving: bool,
}

/// Per-tick observations of the tracked pursuer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EvaderInput {
    /// Current pursuer position.
    pub pursuer_position: Vec2,
    /// Set when the two collision volumes overlap this tick.
    pub overlap: Option<OverlapNotice>,
}

/// Where the evader sits: free in the world or attached to a parent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement<H> {
    /// Simulated world position.
    Free(Vec2),
    /// Fixed offset in the local frame of `parent`.
    ///
    /// The frame's +X axis is the parent's heading and +Y is a quarter turn
    /// counter-clockwise from it, so the default offset `(0, -0.5)` sits
    /// along the pursuer's right axis.
    Attached {
        /// Handle of the actor carrying the evader.
        parent: H,
        /// Offset in the parent's local frame, +X along its heading.
        offset: Vec2,
    },
}

impl<H> Placement<H> {
    /// World position given the parent's pose.
    ///
    /// The parent pose is ignored for free placements.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use lunge::evader::Placement;
    ///
    /// let held = Placement::Attached { parent: 7_u32, offset: Vec2::new(0.0, -0.5) };
    /// let world = held.resolve(Vec2::new(2.0, 2.0), 90.0);
    /// assert!((world - Vec2::new(2.5, 2.0)).length() < 1e-5);
    /// ```
    #[must_use]
    pub fn resolve(&self, parent_position: Vec2, parent_heading: f32) -> Vec2 {
        match self {
            Self::Free(position) => *position,
            Self::Attached { offset, .. } => {
                parent_position + heading_vector(parent_heading).rotate(*offset)
            }
        }
    }
}

/// State machine driving the evader.
///
/// `H` is the handle type identifying the tracked pursuer.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaderController<H> {
    config: EvaderConfig,
    pursuer: H,
    position: Vec2,
    state: EvaderState,
    hop_start: Timestamp,
    hop_end: Vec2,
}

impl<H: Copy> EvaderController<H> {
    /// Creates an idle evader at `position` tracking `pursuer`.
    #[must_use]
    pub fn new(config: EvaderConfig, pursuer: H, position: Vec2) -> Self {
        Self {
            config,
            pursuer,
            position,
            state: EvaderState::Idle,
            hop_start: Timestamp::ZERO,
            hop_end: position,
        }
    }

    /// Configuration supplied at construction.
    #[must_use]
    pub const fn config(&self) -> &EvaderConfig {
        &self.config
    }

    /// Handle of the tracked pursuer.
    #[must_use]
    pub const fn pursuer(&self) -> H {
        self.pursuer
    }

    /// Last simulated world position; frozen once caught.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Current state, for display and diagnostics.
    #[must_use]
    pub const fn state(&self) -> EvaderState {
        self.state
    }

    /// Start time of the current hop.
    #[must_use]
    pub const fn hop_start(&self) -> Timestamp {
        self.hop_start
    }

    /// Destination of the current hop.
    #[must_use]
    pub const fn hop_end(&self) -> Vec2 {
        self.hop_end
    }

    /// Whether the evader has been captured.
    #[must_use]
    pub fn is_caught(&self) -> bool {
        self.state == EvaderState::Caught
    }

    /// Current placement; attached to the pursuer once caught.
    #[must_use]
    pub fn placement(&self) -> Placement<H> {
        if self.is_caught() {
            Placement::Attached {
                parent: self.pursuer,
                offset: self.config.attach_offset,
            }
        } else {
            Placement::Free(self.position)
        }
    }

    /// Advances the evader by one tick.
    ///
    /// The overlap notice is handled first, so a capture overrides any hop in
    /// progress.
    pub fn tick<D>(
        &mut self,
        input: EvaderInput,
        tick: Tick,
        viewport: &impl ViewportProjector,
        draw: &mut D,
    ) where
        D: EscapeDraw + ?Sized,
    {
        if let Some(notice) = input.overlap {
            self.notify_overlap(notice.pursuer_diving);
        }

        if self.state == EvaderState::Idle
            && self.position.distance(input.pursuer_position) < self.config.fright_radius
        {
            self.transition(EvaderState::HopStart);
        }

        match self.state {
            EvaderState::Idle | EvaderState::Caught => {}
            EvaderState::HopStart => {
                self.hop_away(input.pursuer_position, tick.now, viewport, draw);
            }
            EvaderState::Hop => self.hop(tick),
        }
    }

    /// Handles an overlap with the tracked pursuer. Returns whether this
    /// notice captured the evader.
    pub fn notify_overlap(&mut self, pursuer_diving: bool) -> bool {
        if !pursuer_diving || self.is_caught() {
            return false;
        }
        self.transition(EvaderState::Caught);
        true
    }

    /// Picks an escape hop away from `pursuer_position` and starts it.
    ///
    /// A first candidate is drawn inside the escape cone. If it would land in
    /// the viewport margin, a single quarter-turn fallback replaces it. The
    /// final destination is clamped into the viewport. Has no effect on a
    /// caught evader.
    pub fn hop_away<D>(
        &mut self,
        pursuer_position: Vec2,
        now: Timestamp,
        viewport: &impl ViewportProjector,
        draw: &mut D,
    ) where
        D: EscapeDraw + ?Sized,
    {
        if self.is_caught() {
            return;
        }
        self.hop_start = now;

        let escape = (self.position - pursuer_position).normalize_or_zero();
        let reach = self.config.hop_length();
        let spread = draw.spread_angle(self.config.spread_degrees);
        let mut end = self.position + rotate_by_degrees(escape, spread) * reach;

        if !viewport.within_margin(end, self.config.safe_margin) {
            let turn = draw.quarter_turn();
            debug!("evader hop {end:?} too close to the edge, turning {turn} degrees");
            end = self.position + rotate_by_degrees(escape, turn) * reach;
        }

        self.hop_end = viewport.clamp_to_view(end);
        self.transition(EvaderState::Hop);
    }

    fn hop(&mut self, tick: Tick) {
        if tick.seconds_since(self.hop_start) < self.config.hop_time {
            self.position = move_towards(
                self.position,
                self.hop_end,
                self.config.hop_speed * tick.dt,
            );
        } else {
            self.transition(EvaderState::Idle);
        }
    }

    fn transition(&mut self, next: EvaderState) {
        if self.state != next {
            debug!("evader {:?} -> {next:?} at {:?}", self.state, self.position);
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;
    use approx::assert_relative_eq;
    use mockall::mock;
    use rand::SeedableRng;
    use rstest::rstest;
    use std::time::Duration;

    mock! {
        Draw {}
        impl EscapeDraw for Draw {
            fn spread_angle(&mut self, spread_degrees: f32) -> f32;
            fn quarter_turn(&mut self) -> f32;
        }
    }

    const PURSUER: u8 = 1;

    fn evader_at(x: f32, y: f32) -> EvaderController<u8> {
        EvaderController::new(EvaderConfig::default(), PURSUER, Vec2::new(x, y))
    }

    fn at(millis: u64) -> Tick {
        Tick::new(0.02, Duration::from_millis(millis))
    }

    fn near(pursuer_position: Vec2) -> EvaderInput {
        EvaderInput {
            pursuer_position,
            overlap: None,
        }
    }

    fn overlapping(pursuer_position: Vec2, pursuer_diving: bool) -> EvaderInput {
        EvaderInput {
            pursuer_position,
            overlap: Some(OverlapNotice { pursuer_diving }),
        }
    }

    #[rstest]
    #[case::at_radius(3.0)]
    #[case::outside(3.5)]
    #[case::far(40.0)]
    fn stays_idle_outside_fright_radius(#[case] distance: f32) {
        let mut evader = evader_at(0.0, 0.0);
        let mut draw = MockDraw::new();
        draw.expect_spread_angle().never();
        evader.tick(
            near(Vec2::new(distance, 0.0)),
            at(20),
            &Viewport::default(),
            &mut draw,
        );
        assert_eq!(evader.state(), EvaderState::Idle);
        assert_eq!(evader.position(), Vec2::ZERO);
    }

    #[test]
    fn hops_straight_away_with_zero_spread() {
        let mut evader = evader_at(0.0, 0.0);
        let mut draw = MockDraw::new();
        draw.expect_spread_angle()
            .withf(|spread| (*spread - 60.0).abs() < f32::EPSILON)
            .times(1)
            .return_const(0.0_f32);
        draw.expect_quarter_turn().never();

        evader.tick(
            near(Vec2::new(-2.9, 0.0)),
            at(40),
            &Viewport::default(),
            &mut draw,
        );

        assert_eq!(evader.state(), EvaderState::Hop);
        assert_eq!(evader.hop_start(), Duration::from_millis(40));
        assert_relative_eq!(evader.hop_end().x, 1.2, epsilon = 1e-5);
        assert_relative_eq!(evader.hop_end().y, 0.0, epsilon = 1e-5);
        // Motion starts on the following tick.
        assert_eq!(evader.position(), Vec2::ZERO);
    }

    #[test]
    fn edge_hop_falls_back_to_a_quarter_turn() {
        let mut evader = evader_at(7.0, 0.0);
        let mut draw = MockDraw::new();
        draw.expect_spread_angle().times(1).return_const(0.0_f32);
        draw.expect_quarter_turn().times(1).return_const(90.0_f32);

        evader.hop_away(
            Vec2::new(4.1, 0.0),
            Duration::ZERO,
            &Viewport::default(),
            &mut draw,
        );

        assert_eq!(evader.state(), EvaderState::Hop);
        assert_relative_eq!(evader.hop_end().x, 7.0, epsilon = 1e-5);
        assert_relative_eq!(evader.hop_end().y, 1.2, epsilon = 1e-5);
    }

    #[test]
    fn fallback_destination_is_clamped_into_view() {
        // Cornered: both the first choice and the fallback leave the view.
        let mut evader = evader_at(7.5, 4.5);
        let mut draw = MockDraw::new();
        draw.expect_spread_angle().times(1).return_const(0.0_f32);
        draw.expect_quarter_turn().times(1).return_const(-90.0_f32);

        evader.hop_away(
            Vec2::new(7.5, 1.6),
            Duration::ZERO,
            &Viewport::default(),
            &mut draw,
        );

        let end = evader.hop_end();
        assert!(end.x <= 8.0 + 1e-5 && end.y <= 5.0 + 1e-5, "unclamped {end:?}");
        assert_relative_eq!(end.x, 8.0, epsilon = 1e-5);
    }

    #[test]
    fn hop_moves_at_hop_speed_then_times_out() {
        let mut evader = evader_at(0.0, 0.0);
        let mut draw = MockDraw::new();
        draw.expect_spread_angle().return_const(0.0_f32);
        let viewport = Viewport::default();
        let pursuer = Vec2::new(-2.9, 0.0);

        evader.tick(near(pursuer), at(0), &viewport, &mut draw);
        evader.tick(near(pursuer), at(20), &viewport, &mut draw);
        assert_relative_eq!(evader.position().x, 0.12, epsilon = 1e-5);

        evader.tick(near(pursuer), at(100), &viewport, &mut draw);
        assert_relative_eq!(evader.position().x, 0.24, epsilon = 1e-5);
        assert_eq!(evader.state(), EvaderState::Hop);

        // 200 ms after the start the window has elapsed.
        evader.tick(near(pursuer), at(200), &viewport, &mut draw);
        assert_eq!(evader.state(), EvaderState::Idle);
        assert_relative_eq!(evader.position().x, 0.24, epsilon = 1e-5);
    }

    #[test]
    fn random_hops_respect_the_margin_from_the_centre() {
        let viewport = Viewport::default();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut evader = evader_at(0.0, 0.0);
            evader.tick(near(Vec2::new(-2.9, 0.0)), at(0), &viewport, &mut rng);
            assert_eq!(evader.state(), EvaderState::Hop);
            let end = evader.hop_end();
            assert!(viewport.within_margin(end, 0.05), "hop end {end:?} in margin");
            assert!((evader.hop_end().length() - 1.2).abs() < 1e-4);
            assert!(end.x > 0.0, "hop end {end:?} is not away from the pursuer");
        }
    }

    #[rstest]
    #[case::idle(EvaderState::Idle)]
    #[case::hop(EvaderState::Hop)]
    fn overlap_without_dive_changes_nothing(#[case] state: EvaderState) {
        let mut evader = evader_at(0.0, 0.0);
        evader.state = state;
        let before = evader.clone();
        assert!(!evader.notify_overlap(false));
        assert_eq!(evader, before);
    }

    #[rstest]
    #[case::idle(EvaderState::Idle)]
    #[case::hop_start(EvaderState::HopStart)]
    #[case::hop(EvaderState::Hop)]
    fn diving_overlap_captures_exactly_once(#[case] state: EvaderState) {
        let mut evader = evader_at(0.0, 0.0);
        evader.state = state;
        assert!(evader.notify_overlap(true));
        assert!(evader.is_caught());
        assert!(!evader.notify_overlap(true));
        assert!(!evader.notify_overlap(false));
        assert!(evader.is_caught());
        assert_eq!(
            evader.placement(),
            Placement::Attached {
                parent: PURSUER,
                offset: Vec2::new(0.0, -0.5),
            }
        );
    }

    #[test]
    fn capture_abandons_hop_in_progress() {
        let mut evader = evader_at(0.0, 0.0);
        let mut draw = MockDraw::new();
        draw.expect_spread_angle().times(1).return_const(0.0_f32);
        let viewport = Viewport::default();
        let pursuer = Vec2::new(-2.9, 0.0);

        evader.tick(near(pursuer), at(0), &viewport, &mut draw);
        evader.tick(near(pursuer), at(20), &viewport, &mut draw);
        let frozen = evader.position();

        evader.tick(overlapping(pursuer, true), at(40), &viewport, &mut draw);
        assert_eq!(evader.state(), EvaderState::Caught);
        assert_eq!(evader.position(), frozen);

        evader.tick(near(pursuer), at(60), &viewport, &mut draw);
        assert_eq!(evader.position(), frozen);
        assert_eq!(evader.state(), EvaderState::Caught);
    }

    #[test]
    fn caught_evader_ignores_hop_requests() {
        let mut evader = evader_at(0.0, 0.0);
        assert!(evader.notify_overlap(true));
        let mut draw = MockDraw::new();
        draw.expect_spread_angle().never();
        evader.hop_away(Vec2::ZERO, Duration::ZERO, &Viewport::default(), &mut draw);
        assert_eq!(evader.state(), EvaderState::Caught);
    }

    #[test]
    fn free_placement_resolves_to_own_position() {
        let evader = evader_at(1.0, 2.0);
        assert_eq!(
            evader.placement().resolve(Vec2::new(9.0, 9.0), 45.0),
            Vec2::new(1.0, 2.0)
        );
    }
}
