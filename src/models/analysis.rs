//! Wire contract of the remote analysis service (`POST /fen`).

use serde::{Deserialize, Serialize};

/// Body sent to the analysis service after a committed move
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub fen: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
}

/// Raw reply body; every field is optional on the wire
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AnalysisResponse {
    pub fen: Option<String>,
    #[serde(rename = "move")]
    pub reply_move: Option<String>,
    pub evaluation: Option<f64>,
    pub search_time: Option<f64>,
    pub nodes: Option<u64>,
    pub nps: Option<u64>,
    pub tt_hit_rate: Option<f64>,
    pub tt_hashfull: Option<u32>,
    pub tt_hits: Option<u64>,
    pub tt_stores: Option<u64>,
    pub pv: Option<String>,
    pub game_over: Option<bool>,
    pub error: Option<String>,
}

/// Search statistics; each one is independently optional
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub search_time_seconds: Option<f64>,
    pub nodes: Option<u64>,
    pub nodes_per_second: Option<u64>,
    pub tt_hit_rate_percent: Option<f64>,
    pub tt_hashfull_permille: Option<u32>,
    pub tt_hits: Option<u64>,
    pub tt_stores: Option<u64>,
}

/// A successful analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub position: String,
    pub reply_move: Option<String>,
    pub evaluation: Option<f64>,
    pub stats: SearchStats,
    pub principal_variation: Vec<String>,
    pub game_over: Option<bool>,
}

/// Interpreted reply of the analysis service
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Success(AnalysisReport),
    ServiceError(String),
    Malformed(String),
}

impl AnalysisResult {
    /// Interpret a raw body; anything that is not a JSON object is malformed
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<AnalysisResponse>(body) {
            Ok(response) => response.into(),
            Err(e) => AnalysisResult::Malformed(format!("Invalid response body: {}", e)),
        }
    }
}

impl From<AnalysisResponse> for AnalysisResult {
    fn from(response: AnalysisResponse) -> Self {
        // An error invalidates every other field
        if let Some(error) = response.error {
            return AnalysisResult::ServiceError(error);
        }

        let Some(position) = response.fen.filter(|fen| !fen.trim().is_empty()) else {
            return AnalysisResult::Malformed("Response carries no position".to_string());
        };

        if let Some(reply) = &response.reply_move {
            if !(4..=5).contains(&reply.len()) || !reply.is_ascii() {
                return AnalysisResult::Malformed(format!("Unreadable move '{}'", reply));
            }
        }

        let principal_variation = response
            .pv
            .as_deref()
            .map(|pv| pv.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        AnalysisResult::Success(AnalysisReport {
            position,
            reply_move: response.reply_move,
            evaluation: response.evaluation.filter(|e| e.is_finite()),
            stats: SearchStats {
                search_time_seconds: response.search_time,
                nodes: response.nodes,
                nodes_per_second: response.nps,
                tt_hit_rate_percent: response.tt_hit_rate,
                tt_hashfull_permille: response.tt_hashfull,
                tt_hits: response.tt_hits,
                tt_stores: response.tt_stores,
            },
            principal_variation,
            game_over: response.game_over,
        })
    }
}
