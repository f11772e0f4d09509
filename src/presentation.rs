//! Display colours for the visual proxy.
//!
//! The controllers only expose their state; these pure mappings turn a state
//! into the colour a renderer should tint the actor with.

use crate::evader::EvaderState;
use crate::pursuer::PursuerState;

/// Linear RGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayColor {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
}

impl DisplayColor {
    /// Pure black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Pure white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Pure red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Pure green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Pure blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Builds a colour from its components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Colour of the pursuer in `state`.
#[must_use]
pub const fn pursuer_color(state: PursuerState) -> DisplayColor {
    match state {
        PursuerState::MoveSlow => DisplayColor::BLACK,
        PursuerState::MoveFast => DisplayColor::WHITE,
        PursuerState::Diving => DisplayColor::BLUE,
        PursuerState::Recovering => DisplayColor::GREEN,
    }
}

/// Colour of the evader in `state`.
#[must_use]
pub const fn evader_color(state: EvaderState) -> DisplayColor {
    match state {
        EvaderState::Idle => DisplayColor::RED,
        EvaderState::HopStart => DisplayColor::GREEN,
        EvaderState::Hop => DisplayColor::BLUE,
        EvaderState::Caught => DisplayColor::WHITE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::slow(PursuerState::MoveSlow, DisplayColor::BLACK)]
    #[case::fast(PursuerState::MoveFast, DisplayColor::WHITE)]
    #[case::diving(PursuerState::Diving, DisplayColor::BLUE)]
    #[case::recovering(PursuerState::Recovering, DisplayColor::GREEN)]
    fn pursuer_palette(#[case] state: PursuerState, #[case] expected: DisplayColor) {
        assert_eq!(pursuer_color(state), expected);
    }

    #[test]
    fn evader_states_have_distinct_colours() {
        let colours = [
            evader_color(EvaderState::Idle),
            evader_color(EvaderState::HopStart),
            evader_color(EvaderState::Hop),
            evader_color(EvaderState::Caught),
        ];
        for (i, a) in colours.iter().enumerate() {
            for b in colours.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
