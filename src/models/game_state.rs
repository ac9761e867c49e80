use chess::{Board, Color};

use crate::game::rules::{ChessRules, MoveRecord, RulesEngine};

/// Authoritative local record of the game
///
/// Only the move committer and the response reconciler mutate it, through
/// [`GameState::rules_mut`]; everything else reads.
#[derive(Debug, Clone, Default)]
pub struct GameState<R: RulesEngine = ChessRules> {
    rules: R,
    reported_over: Option<bool>,
}

impl<R: RulesEngine> GameState<R> {
    pub fn new(rules: R) -> Self {
        Self {
            rules,
            reported_over: None,
        }
    }

    pub fn position(&self) -> String {
        self.rules.current_position()
    }

    pub fn board(&self) -> Board {
        self.rules.board()
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        self.rules.move_history()
    }

    pub fn side_to_move(&self) -> Color {
        self.rules.side_to_move()
    }

    /// The service's `game_over` flag wins over the local computation until the next local move
    pub fn is_over(&self) -> bool {
        self.reported_over
            .unwrap_or_else(|| self.rules.is_game_over())
    }

    pub fn reset(&mut self) {
        self.rules.reset();
        self.reported_over = None;
    }

    pub(crate) fn rules_mut(&mut self) -> &mut R {
        &mut self.rules
    }

    pub(crate) fn set_reported_over(&mut self, over: Option<bool>) {
        self.reported_over = over;
    }
}
