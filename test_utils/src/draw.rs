//! Deterministic stand-in for the evader's random source.
use std::collections::VecDeque;

use lunge::EscapeDraw;

/// Replays queued draws, then falls back to a straight hop and a
/// counter-clockwise quarter turn.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraw {
    spreads: VecDeque<f32>,
    turns: VecDeque<f32>,
    spread_calls: usize,
    turn_calls: usize,
}

impl ScriptedDraw {
    /// Draw that always hops straight away and turns counter-clockwise.
    #[must_use]
    pub fn straight() -> Self {
        Self::default()
    }

    /// Queues the spread angles returned by successive draws.
    #[must_use]
    pub fn with_spreads(mut self, spreads: impl IntoIterator<Item = f32>) -> Self {
        self.spreads.extend(spreads);
        self
    }

    /// Queues the quarter turns returned by successive fallbacks.
    #[must_use]
    pub fn with_turns(mut self, turns: impl IntoIterator<Item = f32>) -> Self {
        self.turns.extend(turns);
        self
    }

    /// Number of spread angles drawn so far.
    #[must_use]
    pub const fn spread_calls(&self) -> usize {
        self.spread_calls
    }

    /// Number of fallback turns drawn so far.
    #[must_use]
    pub const fn turn_calls(&self) -> usize {
        self.turn_calls
    }
}

impl EscapeDraw for ScriptedDraw {
    fn spread_angle(&mut self, _spread_degrees: f32) -> f32 {
        self.spread_calls += 1;
        self.spreads.pop_front().unwrap_or(0.0)
    }

    fn quarter_turn(&mut self) -> f32 {
        self.turn_calls += 1;
        self.turns.pop_front().unwrap_or(90.0)
    }
}
