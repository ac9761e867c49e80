//! The per-connection client session.
//!
//! Owns the game state, the evaluation history, the sync controller and the
//! retained display, and is handed to each component explicitly.

use chess::Color;
use log::{info, warn};

use crate::config::{clamp_depth, DisplayConfig};
use crate::error::SyncError;
use crate::game::rules::{ChessRules, RulesEngine};
use crate::game::{Candidate, MoveCommitter, MoveGate};
use crate::models::analysis::AnalysisResult;
use crate::models::GameState;
use crate::sync::controller::{SyncController, SyncPhase, SyncReply, SyncTicket};
use crate::sync::history::EvaluationHistory;
use crate::sync::reconciler::{Reconciled, ResponseReconciler};
use crate::view::{BoardWidget, DerivedViewRenderer, DisplayState};

/// How a settled exchange ended
#[derive(Debug, Clone, PartialEq)]
pub enum SyncCompletion {
    Reconciled(Reconciled),
    Failed(SyncError),
    /// The reply belonged to a superseded cycle and was discarded
    Stale,
}

/// Half-move index of a FEN, counted from the standard start position
pub fn ply_index(fen: &str) -> usize {
    let mut fields = fen.split_whitespace().skip(1);
    let black_to_move = fields.next() == Some("b");
    let fullmove = fields
        .nth(3)
        .and_then(|n| n.parse::<usize>().ok())
        .unwrap_or(1)
        .max(1);
    (fullmove - 1) * 2 + usize::from(black_to_move)
}

pub struct ClientSession<R: RulesEngine = ChessRules> {
    state: GameState<R>,
    history: EvaluationHistory,
    sync: SyncController,
    gate: MoveGate,
    renderer: DerivedViewRenderer,
    display: DisplayState,
    depth: u8,
}

impl ClientSession<ChessRules> {
    pub fn new(depth: u8, config: DisplayConfig) -> Self {
        Self::with_rules(ChessRules::new(), depth, config)
    }
}

impl<R: RulesEngine> ClientSession<R> {
    pub fn with_rules(rules: R, depth: u8, config: DisplayConfig) -> Self {
        let depth = clamp_depth(depth as i64);
        let mut session = Self {
            state: GameState::new(rules),
            history: EvaluationHistory::default(),
            sync: SyncController::default(),
            gate: MoveGate::default(),
            renderer: DerivedViewRenderer::new(config),
            display: DisplayState::new(depth),
            depth,
        };
        session.render_local();
        session
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn history(&self) -> &EvaluationHistory {
        &self.history
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn sync_phase(&self) -> SyncPhase {
        self.sync.phase()
    }

    /// Store the depth used by the next request; returns the clamped value
    pub fn set_depth(&mut self, depth: i64) -> u8 {
        self.depth = clamp_depth(depth);
        self.display.depth = self.depth;
        self.depth
    }

    pub fn can_pick_up(&self, piece_color: Color) -> bool {
        self.gate.allows(piece_color, &self.state)
    }

    /// Handle a dropped piece. On success the local views are already
    /// rendered and the returned ticket must be exchanged with the service.
    pub fn drop_piece(
        &mut self,
        candidate: Candidate,
        board: &mut impl BoardWidget,
    ) -> Result<SyncTicket, SyncError> {
        let (from, to) = (candidate.from.to_string(), candidate.to.to_string());

        let owner = self.state.board().color_on(candidate.from);
        let allowed = owner.is_some_and(|color| self.gate.allows(color, &self.state));
        if !allowed {
            board.snapback(&from, &to);
            return Err(SyncError::IllegalMove { from, to });
        }

        if let Err(e) = MoveCommitter::commit(&mut self.state, candidate) {
            info!("{}", e);
            board.snapback(&from, &to);
            return Err(e);
        }

        self.display.message = None;
        self.render_local();
        board.set_position(&self.state.position());
        Ok(self.begin_sync())
    }

    /// The drop animation finished; redraw from the authoritative position
    pub fn snap_end(&self, board: &mut impl BoardWidget) {
        board.set_position(&self.state.position());
    }

    /// Ask again for the service's move after a failed cycle
    pub fn retry(&mut self) -> Option<SyncTicket> {
        let service_to_move = self.state.side_to_move() != self.gate.human();
        if self.sync.is_awaiting() || self.state.is_over() || !service_to_move {
            return None;
        }
        self.display.message = None;
        Some(self.begin_sync())
    }

    fn begin_sync(&mut self) -> SyncTicket {
        let ticket = self.sync.begin(self.state.position(), self.depth);
        self.display.overlay = true;
        info!(
            "Session {} requesting analysis at depth {}",
            ticket.token, self.depth
        );
        ticket
    }

    /// Reconcile a settled exchange. Stale replies change nothing.
    pub fn complete(&mut self, reply: SyncReply, board: &mut impl BoardWidget) -> SyncCompletion {
        if !self.sync.accept(reply.token) {
            return SyncCompletion::Stale;
        }

        let completion = match reply.outcome {
            Ok(AnalysisResult::Success(report)) => {
                self.sync.reconciling();
                match ResponseReconciler::reconcile(
                    &mut self.state,
                    &report,
                    self.renderer.config().perspective,
                ) {
                    Ok(reconciled) => {
                        self.render_local();
                        self.renderer
                            .render_analysis(&mut self.display, &report, reconciled.evaluation);
                        if let Some(evaluation) = reconciled.evaluation {
                            self.history
                                .push(ply_index(&self.state.position()), evaluation);
                            self.renderer.render_chart(&mut self.display, &self.history);
                        }
                        board.set_position(&self.state.position());
                        SyncCompletion::Reconciled(reconciled)
                    }
                    Err(e) => self.fail(e),
                }
            }
            Ok(AnalysisResult::ServiceError(message)) => self.fail(SyncError::Service { message }),
            Ok(AnalysisResult::Malformed(message)) => self.fail(SyncError::Malformed { message }),
            Err(e) => self.fail(e),
        };

        self.display.overlay = false;
        self.sync.settle();
        completion
    }

    fn fail(&mut self, error: SyncError) -> SyncCompletion {
        self.sync.failed();
        if error.is_network() {
            warn!("Analysis request failed: {}", error);
        } else {
            warn!("Analysis rejected: {}", error);
        }
        self.display.message = Some(error.to_string());
        self.render_local();
        SyncCompletion::Failed(error)
    }

    /// Back to the start position; any outstanding cycle is voided
    pub fn reset(&mut self, board: &mut impl BoardWidget) {
        self.sync.cancel();
        self.state.reset();
        self.history.clear();
        self.display = DisplayState::new(self.depth);
        self.render_local();
        board.reset_to_start();
        info!("Session reset");
    }

    fn render_local(&mut self) {
        self.renderer
            .render_local(&mut self.display, &self.state, &self.gate);
    }
}
