use chess::{Piece, Square};
use log::info;

use crate::error::SyncResult;
use crate::game::rules::{resolve_promotion, MoveRecord, RulesEngine};
use crate::models::GameState;

/// A move proposed by dropping a piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Candidate {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }
}

/// Validates and applies a candidate to the game state
///
/// The rules engine applies the move atomically, so on error the state is
/// exactly what it was before the call.
pub struct MoveCommitter;

impl MoveCommitter {
    pub fn commit<R: RulesEngine>(
        state: &mut GameState<R>,
        candidate: Candidate,
    ) -> SyncResult<MoveRecord> {
        let promotion = resolve_promotion(
            &state.board(),
            candidate.from,
            candidate.to,
            candidate.promotion,
        );
        let record = state
            .rules_mut()
            .apply_move(candidate.from, candidate.to, promotion)?;
        state.set_reported_over(None);
        info!("Committed local move {}", record.san);
        Ok(record)
    }
}
