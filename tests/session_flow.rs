//! End-to-end move cycles through the client session with a scripted service.

use async_trait::async_trait;
use std::sync::Arc;

use chess_analysis_client::config::DisplayConfig;
use chess_analysis_client::error::SyncError;
use chess_analysis_client::game::rules::{parse_square, ChessRules, RulesEngine};
use chess_analysis_client::game::Candidate;
use chess_analysis_client::models::analysis::{AnalysisRequest, AnalysisResult};
use chess_analysis_client::service::AnalysisService;
use chess_analysis_client::sync::{exchange, ClientSession, SyncCompletion, SyncPhase, SyncReply};
use chess_analysis_client::view::display::{PvDisplay, StatsPanel, Verdict};
use chess_analysis_client::view::BoardWidget;

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Default, Debug)]
struct RecordingBoard {
    positions: Vec<String>,
    snapbacks: Vec<(String, String)>,
    resets: usize,
}

impl BoardWidget for RecordingBoard {
    fn set_position(&mut self, fen: &str) {
        self.positions.push(fen.to_string());
    }

    fn reset_to_start(&mut self) {
        self.resets += 1;
    }

    fn snapback(&mut self, from: &str, to: &str) {
        self.snapbacks.push((from.to_string(), to.to_string()));
    }
}

/// Answers every request with a fixed body
struct ScriptedService {
    body: String,
}

#[async_trait]
impl AnalysisService for ScriptedService {
    async fn analyse(&self, _request: AnalysisRequest) -> Result<AnalysisResult, SyncError> {
        Ok(AnalysisResult::from_body(&self.body))
    }
}

struct UnreachableService;

#[async_trait]
impl AnalysisService for UnreachableService {
    async fn analyse(&self, _request: AnalysisRequest) -> Result<AnalysisResult, SyncError> {
        Err(SyncError::Network {
            message: "connection refused".to_string(),
        })
    }
}

fn scripted(body: serde_json::Value) -> Arc<dyn AnalysisService> {
    Arc::new(ScriptedService {
        body: body.to_string(),
    })
}

fn candidate(uci: &str) -> Candidate {
    Candidate::new(
        parse_square(&uci[0..2]).unwrap(),
        parse_square(&uci[2..4]).unwrap(),
    )
}

/// FEN reached by playing `moves` from the start
fn fen_after(moves: &[&str]) -> String {
    let mut rules = ChessRules::new();
    for uci in moves {
        let c = candidate(uci);
        rules.apply_move(c.from, c.to, None).unwrap();
    }
    rules.current_position()
}

fn new_session() -> ClientSession {
    ClientSession::new(4, DisplayConfig::default())
}

#[actix_rt::test]
async fn e4_then_service_reply_e5() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let ticket = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    assert_eq!(
        serde_json::to_value(&ticket.request).unwrap(),
        serde_json::json!({ "fen": fen_after(&["e2e4"]), "depth": 4 })
    );
    // Local views are rendered before the exchange
    assert_eq!(session.display().transcript.len(), 1);
    assert_eq!(session.display().material.label, "0");
    assert!(session.display().overlay);
    assert_eq!(session.sync_phase(), SyncPhase::AwaitingResponse);

    let after_e5 = fen_after(&["e2e4", "e7e5"]);
    let service = scripted(serde_json::json!({
        "fen": after_e5,
        "move": "e7e5",
        "evaluation": 0.2
    }));
    let reply = exchange(service, ticket).await;
    let completion = session.complete(reply, &mut board);

    assert!(matches!(completion, SyncCompletion::Reconciled(_)));
    assert_eq!(session.state().position(), after_e5);
    assert_eq!(session.display().material.label, "0");
    let evaluation = session.display().evaluation.as_ref().unwrap();
    assert_eq!(evaluation.label, "+0.20");
    assert_eq!(evaluation.verdict, Verdict::Balanced);
    assert!(!session.display().overlay);
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.display().chart.labels, vec![2]);
    assert_eq!(session.display().transcript[0].black.as_deref(), Some("e5"));
    assert_eq!(board.positions.last(), Some(&after_e5));
    assert_eq!(session.sync_phase(), SyncPhase::Idle);
    assert_eq!(session.display().movable_color.as_deref(), Some("white"));
}

#[actix_rt::test]
async fn service_error_leaves_position_after_e4() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let ticket = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    let service = scripted(serde_json::json!({ "error": "engine failure" }));
    let completion = session.complete(exchange(service, ticket).await, &mut board);

    assert_eq!(
        completion,
        SyncCompletion::Failed(SyncError::Service {
            message: "engine failure".to_string()
        })
    );
    assert_eq!(session.state().position(), fen_after(&["e2e4"]));
    assert!(session
        .display()
        .message
        .as_deref()
        .is_some_and(|m| m.contains("engine failure")));
    assert!(!session.display().overlay);
    assert!(session.history().is_empty());
    assert!(session.display().evaluation.is_none());
}

#[actix_rt::test]
async fn network_failure_returns_to_idle_and_can_retry() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let ticket = session.drop_piece(candidate("d2d4"), &mut board).unwrap();
    let reply = exchange(Arc::new(UnreachableService), ticket).await;
    let completion = session.complete(reply, &mut board);

    assert!(matches!(completion, SyncCompletion::Failed(ref e) if e.is_network()));
    assert_eq!(session.state().position(), fen_after(&["d2d4"]));
    assert!(!session.display().overlay);
    assert_eq!(session.sync_phase(), SyncPhase::Idle);

    let retry = session.retry().expect("service is to move");
    assert_eq!(retry.request.fen, fen_after(&["d2d4"]));
    assert!(session.display().overlay);
    // Only one outstanding cycle at a time
    assert!(session.retry().is_none());
}

#[actix_rt::test]
async fn superseded_reply_never_wins_in_any_arrival_order() {
    let after_d5 = fen_after(&["d2d4", "d7d5"]);
    let after_e5 = fen_after(&["e2e4", "e7e5"]);

    for newest_first in [true, false] {
        let mut session = new_session();
        let mut board = RecordingBoard::default();

        let first = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
        session.reset(&mut board);
        let second = session.drop_piece(candidate("d2d4"), &mut board).unwrap();

        let (old_reply, new_reply) = futures::join!(
            exchange(
                scripted(serde_json::json!({ "fen": after_e5, "move": "e7e5", "evaluation": 3.0 })),
                first,
            ),
            exchange(
                scripted(serde_json::json!({ "fen": after_d5, "move": "d7d5", "evaluation": -0.1 })),
                second,
            ),
        );

        let order: Vec<SyncReply> = if newest_first {
            vec![new_reply, old_reply]
        } else {
            vec![old_reply, new_reply]
        };
        let completions: Vec<_> = order
            .into_iter()
            .map(|reply| session.complete(reply, &mut board))
            .collect();

        assert_eq!(
            completions
                .iter()
                .filter(|c| **c == SyncCompletion::Stale)
                .count(),
            1
        );
        assert_eq!(session.state().position(), after_d5);
        assert_eq!(session.history().series().1, vec![-0.1]);
        assert_eq!(session.display().evaluation.as_ref().unwrap().label, "-0.10");
        assert!(!session.display().overlay);
    }
}

#[actix_rt::test]
async fn stale_reply_keeps_overlay_of_current_cycle() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let first = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    session.reset(&mut board);
    let _second = session.drop_piece(candidate("c2c4"), &mut board).unwrap();

    let reply = exchange(Arc::new(UnreachableService), first).await;
    assert_eq!(session.complete(reply, &mut board), SyncCompletion::Stale);
    assert!(session.display().overlay);
    assert_eq!(session.sync_phase(), SyncPhase::AwaitingResponse);
    assert!(session.display().message.is_none());
}

#[actix_rt::test]
async fn reset_clears_everything() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let ticket = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    let service = scripted(serde_json::json!({
        "fen": fen_after(&["e2e4", "e7e5"]),
        "move": "e7e5",
        "evaluation": 0.3,
        "nodes": 1000,
        "search_time": 0.5,
        "pv": "g1f3 b8c6"
    }));
    session.complete(exchange(service, ticket).await, &mut board);
    assert_ne!(session.display().stats, StatsPanel::default());

    session.reset(&mut board);

    assert_eq!(session.state().position(), START);
    assert!(session.state().move_history().is_empty());
    assert!(session.history().is_empty());
    assert!(session.display().transcript.is_empty());
    assert!(session.display().evaluation.is_none());
    assert_eq!(session.display().stats, StatsPanel::default());
    assert_eq!(session.display().principal_variation, PvDisplay::default());
    assert!(session.display().chart.labels.is_empty());
    assert_eq!(session.display().material.difference, 0);
    assert_eq!(board.resets, 1);
}

#[actix_rt::test]
async fn absent_statistics_keep_previous_values() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let ticket = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    let first = scripted(serde_json::json!({
        "fen": fen_after(&["e2e4", "e7e5"]),
        "move": "e7e5",
        "evaluation": 0.1,
        "nodes": 5000,
        "nps": 10000,
        "tt_hit_rate": 12.5,
        "pv": "e7e5 g1f3"
    }));
    session.complete(exchange(first, ticket).await, &mut board);

    let ticket = session.drop_piece(candidate("g1f3"), &mut board).unwrap();
    let second = scripted(serde_json::json!({
        "fen": fen_after(&["e2e4", "e7e5", "g1f3", "b8c6"]),
        "move": "b8c6",
        "evaluation": 0.15,
        "tt_hits": 77
    }));
    session.complete(exchange(second, ticket).await, &mut board);

    let stats = &session.display().stats;
    assert_eq!(stats.nodes, "5,000");
    assert_eq!(stats.nodes_per_second, "10,000");
    assert_eq!(stats.tt_hit_rate, "12.5%");
    assert_eq!(stats.tt_hits, "77");
    assert_eq!(stats.tt_stores, "-");
    // The PV is replaced, not merged
    assert_eq!(session.display().principal_variation, PvDisplay::default());
    assert_eq!(session.display().transcript.len(), 2);
    assert_eq!(session.history().series().0, vec![2, 4]);
}

#[test]
fn illegal_or_gated_drops_snap_back() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    let err = session.drop_piece(candidate("e2e5"), &mut board).unwrap_err();
    assert!(matches!(err, SyncError::IllegalMove { .. }));

    // Black pieces belong to the service
    assert!(session.drop_piece(candidate("e7e5"), &mut board).is_err());

    // Empty origin square
    assert!(session.drop_piece(candidate("e4e5"), &mut board).is_err());

    assert_eq!(board.snapbacks.len(), 3);
    assert_eq!(board.snapbacks[0], ("e2".to_string(), "e5".to_string()));
    assert_eq!(session.state().position(), START);
    assert!(!session.display().overlay);
    assert_eq!(session.sync_phase(), SyncPhase::Idle);
}

#[test]
fn no_second_move_while_awaiting_the_service() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    assert!(!session.can_pick_up(chess::Color::White));
    assert!(session.drop_piece(candidate("d2d4"), &mut board).is_err());
    assert_eq!(session.state().move_history().len(), 1);
}

#[test]
fn depth_setting_is_clamped_and_used_for_next_request() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    assert_eq!(session.set_depth(0), 1);
    assert_eq!(session.set_depth(42), 6);
    let ticket = session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    assert_eq!(ticket.request.depth, Some(6));
    assert_eq!(session.display().depth, 6);
}

#[test]
fn snap_end_redraws_authoritative_position() {
    let mut session = new_session();
    let mut board = RecordingBoard::default();

    session.drop_piece(candidate("e2e4"), &mut board).unwrap();
    session.snap_end(&mut board);
    assert_eq!(board.positions, vec![fen_after(&["e2e4"]); 2]);
}
