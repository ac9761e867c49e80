//! Derived views: transcript, material, evaluation gauge, statistics and PV.
//!
//! Everything here is computed from the game state and the latest analysis
//! report; the renderer keeps nothing of its own.

use chess::{Board, Color, Piece, ALL_PIECES};

use crate::config::DisplayConfig;
use crate::game::rules::{MoveRecord, RulesEngine};
use crate::game::utils::{color_to_string, game_status};
use crate::game::MoveGate;
use crate::models::analysis::{AnalysisReport, SearchStats};
use crate::models::GameState;
use crate::sync::history::EvaluationHistory;
use crate::view::display::{
    ChartSeries, DisplayState, EvaluationDisplay, MaterialBalance, PvChip, PvDisplay, StatsPanel,
    TranscriptRow, Verdict,
};

pub fn piece_value(piece: Piece) -> u32 {
    match piece {
        Piece::Pawn => 1,
        Piece::Knight | Piece::Bishop => 3,
        Piece::Rook => 5,
        Piece::Queen => 9,
        Piece::King => 0,
    }
}

/// Moves paired white/black and numbered from 1
pub fn transcript_rows(history: &[MoveRecord]) -> Vec<TranscriptRow> {
    history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| TranscriptRow {
            number: i + 1,
            white: pair[0].san.clone(),
            black: pair.get(1).map(|m| m.san.clone()),
        })
        .collect()
}

fn side_material(board: &Board, color: Color) -> u32 {
    ALL_PIECES
        .iter()
        .map(|&piece| {
            let count = (*board.pieces(piece) & *board.color_combined(color)).popcnt();
            count * piece_value(piece)
        })
        .sum()
}

pub fn material_balance(board: &Board) -> MaterialBalance {
    let white = side_material(board, Color::White);
    let black = side_material(board, Color::Black);
    let difference = white as i32 - black as i32;
    let label = if difference > 0 {
        format!("+{}", difference)
    } else {
        difference.to_string()
    };
    MaterialBalance {
        white,
        black,
        difference,
        label,
    }
}

pub fn evaluation_display(evaluation: f64, config: &DisplayConfig) -> EvaluationDisplay {
    let bound = config.eval_clamp;
    let clamped = evaluation.clamp(-bound, bound);
    let verdict = if evaluation > config.balanced_threshold {
        Verdict::FavorsWhite
    } else if evaluation < -config.balanced_threshold {
        Verdict::FavorsBlack
    } else {
        Verdict::Balanced
    };
    // -0.0 and scores that round to zero print as +0.00
    let shown = (evaluation * 100.0).round() / 100.0;
    let shown = if shown == 0.0 { 0.0 } else { shown };
    EvaluationDisplay {
        value: if evaluation == 0.0 { 0.0 } else { evaluation },
        label: format!("{:+.2}", shown),
        fill_percent: (clamped + bound) / (2.0 * bound) * 100.0,
        verdict,
    }
}

/// 1234567 -> "1,234,567"
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Only the fields present in `stats` overwrite the panel
pub fn merge_stats(panel: &StatsPanel, stats: &SearchStats) -> StatsPanel {
    let mut next = panel.clone();
    if let Some(t) = stats.search_time_seconds {
        next.search_time = format!("{:.2}s", t);
    }
    if let Some(n) = stats.nodes {
        next.nodes = group_digits(n);
    }
    if let Some(n) = stats.nodes_per_second {
        next.nodes_per_second = group_digits(n);
    }
    if let Some(rate) = stats.tt_hit_rate_percent {
        next.tt_hit_rate = format!("{:.1}%", rate);
    }
    if let Some(permille) = stats.tt_hashfull_permille {
        next.tt_hashfull = format!("{:.1}%", permille as f64 / 10.0);
    }
    if let Some(n) = stats.tt_hits {
        next.tt_hits = group_digits(n);
    }
    if let Some(n) = stats.tt_stores {
        next.tt_stores = group_digits(n);
    }
    next
}

pub fn principal_variation(moves: &[String]) -> PvDisplay {
    if moves.is_empty() {
        return PvDisplay::default();
    }
    PvDisplay::Chips {
        chips: moves
            .iter()
            .enumerate()
            .map(|(i, m)| PvChip {
                chess_move: m.clone(),
                current: i == 0,
            })
            .collect(),
    }
}

/// Writes derived views into a [`DisplayState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DerivedViewRenderer {
    config: DisplayConfig,
}

impl DerivedViewRenderer {
    pub fn new(config: DisplayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// Fields that need no server input
    pub fn render_local<R: RulesEngine>(
        &self,
        display: &mut DisplayState,
        state: &GameState<R>,
        gate: &MoveGate,
    ) {
        let board = state.board();
        display.transcript = transcript_rows(state.move_history());
        display.material = material_balance(&board);
        display.status = game_status(&board, state.is_over());
        display.movable_color = gate.movable_color(state).map(color_to_string);
    }

    /// Fields that depend on the analysis report; absent stats keep their old values
    pub fn render_analysis(
        &self,
        display: &mut DisplayState,
        report: &AnalysisReport,
        evaluation: Option<f64>,
    ) {
        if let Some(evaluation) = evaluation {
            display.evaluation = Some(evaluation_display(evaluation, &self.config));
        }
        display.stats = merge_stats(&display.stats, &report.stats);
        display.principal_variation = principal_variation(&report.principal_variation);
    }

    pub fn render_chart(&self, display: &mut DisplayState, history: &EvaluationHistory) {
        let (labels, values) = history.series();
        display.chart = ChartSeries { labels, values };
    }
}
