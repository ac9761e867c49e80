use chess::Color;
use log::{info, warn};

use crate::config::EvalPerspective;
use crate::error::{SyncError, SyncResult};
use crate::game::rules::{
    parse_promotion, parse_square, resolve_promotion, MoveRecord, RulesEngine,
};
use crate::models::analysis::AnalysisReport;
use crate::models::GameState;

/// What a successful reconciliation changed
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The service's reply move was played
    Move(MoveRecord),
    /// The returned position replaced the board
    Position,
    /// The returned position was already on the board
    Unchanged,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub applied: Applied,
    /// Evaluation normalized so that positive favors white
    pub evaluation: Option<f64>,
}

/// Merges an analysis report into the game state
pub struct ResponseReconciler;

impl ResponseReconciler {
    /// On error the game state is left exactly as it was.
    pub fn reconcile<R: RulesEngine>(
        state: &mut GameState<R>,
        report: &AnalysisReport,
        perspective: EvalPerspective,
    ) -> SyncResult<Reconciled> {
        let applied = match &report.reply_move {
            Some(reply) => Applied::Move(Self::apply_reply(state, reply)?),
            None => Self::load_position(state, &report.position)?,
        };

        if let Applied::Move(record) = &applied {
            if placement(&state.position()) != placement(&report.position) {
                warn!(
                    "Reply {} does not lead to the reported position {}",
                    record.uci, report.position
                );
            }
        }

        state.set_reported_over(report.game_over);

        let evaluation = report.evaluation.map(|e| match perspective {
            EvalPerspective::White => e,
            EvalPerspective::SideToMove if state.side_to_move() == Color::Black => -e,
            EvalPerspective::SideToMove => e,
        });

        Ok(Reconciled {
            applied,
            evaluation,
        })
    }

    fn apply_reply<R: RulesEngine>(
        state: &mut GameState<R>,
        reply: &str,
    ) -> SyncResult<MoveRecord> {
        let malformed = || SyncError::Malformed {
            message: format!("Unreadable move '{}'", reply),
        };
        let from = reply.get(0..2).and_then(parse_square).ok_or_else(malformed)?;
        let to = reply.get(2..4).and_then(parse_square).ok_or_else(malformed)?;
        let requested = match reply.get(4..).filter(|letter| !letter.is_empty()) {
            Some(letter) => Some(parse_promotion(letter).ok_or_else(malformed)?),
            None => None,
        };
        let promotion = resolve_promotion(&state.board(), from, to, requested);

        let record = state
            .rules_mut()
            .apply_move(from, to, promotion)
            .map_err(|_| SyncError::Malformed {
                message: format!("Service move {} is illegal here", reply),
            })?;
        info!("Applied service move {}", record.san);
        Ok(record)
    }

    fn load_position<R: RulesEngine>(state: &mut GameState<R>, fen: &str) -> SyncResult<Applied> {
        if state.position() == fen {
            return Ok(Applied::Unchanged);
        }
        state.rules_mut().load_position(fen)?;
        info!("Loaded service position {}", fen);
        Ok(Applied::Position)
    }
}

/// Piece placement and side to move, the part of a FEN both sides agree on
fn placement(fen: &str) -> String {
    fen.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}
