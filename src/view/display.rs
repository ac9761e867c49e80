//! What the page currently shows.
//!
//! A [`DisplayState`] is the retained view: the renderer writes into it and the
//! socket ships it to the browser as a whole.

use serde::Serialize;

pub const PLACEHOLDER: &str = "-";
pub const PV_PLACEHOLDER: &str = "No principal variation yet";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRow {
    pub number: usize,
    pub white: String,
    pub black: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct MaterialBalance {
    pub white: u32,
    pub black: u32,
    /// White minus black
    pub difference: i32,
    pub label: String,
}

impl Default for MaterialBalance {
    fn default() -> Self {
        Self {
            white: 39,
            black: 39,
            difference: 0,
            label: "0".to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    FavorsWhite,
    FavorsBlack,
    Balanced,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EvaluationDisplay {
    /// Unclamped score, white's perspective
    pub value: f64,
    pub label: String,
    /// Gauge fill for white, 0-100
    pub fill_percent: f64,
    pub verdict: Verdict,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatsPanel {
    pub search_time: String,
    pub nodes: String,
    pub nodes_per_second: String,
    pub tt_hit_rate: String,
    pub tt_hashfull: String,
    pub tt_hits: String,
    pub tt_stores: String,
}

impl Default for StatsPanel {
    fn default() -> Self {
        Self {
            search_time: PLACEHOLDER.to_string(),
            nodes: PLACEHOLDER.to_string(),
            nodes_per_second: PLACEHOLDER.to_string(),
            tt_hit_rate: PLACEHOLDER.to_string(),
            tt_hashfull: PLACEHOLDER.to_string(),
            tt_hits: PLACEHOLDER.to_string(),
            tt_stores: PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PvChip {
    #[serde(rename = "move")]
    pub chess_move: String,
    pub current: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PvDisplay {
    Placeholder { text: String },
    Chips { chips: Vec<PvChip> },
}

impl Default for PvDisplay {
    fn default() -> Self {
        PvDisplay::Placeholder {
            text: PV_PLACEHOLDER.to_string(),
        }
    }
}

/// Parallel sequences fed to the chart widget
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub labels: Vec<usize>,
    pub values: Vec<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub transcript: Vec<TranscriptRow>,
    pub material: MaterialBalance,
    pub evaluation: Option<EvaluationDisplay>,
    pub stats: StatsPanel,
    pub principal_variation: PvDisplay,
    pub chart: ChartSeries,
    pub message: Option<String>,
    pub overlay: bool,
    pub status: String,
    pub movable_color: Option<String>,
    pub depth: u8,
}

impl DisplayState {
    pub fn new(depth: u8) -> Self {
        Self {
            transcript: Vec::new(),
            material: MaterialBalance::default(),
            evaluation: None,
            stats: StatsPanel::default(),
            principal_variation: PvDisplay::default(),
            chart: ChartSeries::default(),
            message: None,
            overlay: false,
            status: "white_turn".to_string(),
            movable_color: Some("white".to_string()),
            depth,
        }
    }
}
