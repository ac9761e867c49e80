use chess::Color;

use crate::game::rules::RulesEngine;
use crate::models::GameState;

/// Decides whether a piece may be picked up
///
/// The analysis service plays the other side, so only the human color is ever
/// movable, and only on its own turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveGate {
    human: Color,
}

impl Default for MoveGate {
    fn default() -> Self {
        Self {
            human: Color::White,
        }
    }
}

impl MoveGate {
    pub fn new(human: Color) -> Self {
        Self { human }
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn allows<R: RulesEngine>(&self, piece_color: Color, state: &GameState<R>) -> bool {
        !state.is_over() && piece_color == state.side_to_move() && piece_color == self.human
    }

    /// Color the board may let the user drag right now, if any
    pub fn movable_color<R: RulesEngine>(&self, state: &GameState<R>) -> Option<Color> {
        self.allows(self.human, state).then_some(self.human)
    }
}
