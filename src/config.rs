use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 6;

/// Clamp a user supplied search depth into the range the service accepts.
pub fn clamp_depth(depth: i64) -> u8 {
    depth.clamp(MIN_DEPTH as i64, MAX_DEPTH as i64) as u8
}

/// Which side a positive evaluation from the service favors
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum EvalPerspective {
    /// Positive favors white, the side that moved first
    #[default]
    White,
    /// Positive favors the side to move in the returned position
    SideToMove,
}

/// Command line / environment configuration
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Play chess against a remote analysis service", long_about = None)]
pub struct Args {
    /// Address the web client is served on
    #[arg(long, env = "CHESS_CLIENT_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,

    /// Base URL of the analysis service (the client posts to `<url>/fen`)
    #[arg(long, env = "ANALYSIS_URL", default_value = "http://127.0.0.1:5000")]
    pub analysis_url: String,

    /// Seconds to wait for an analysis reply before treating it as a network failure
    #[arg(long, env = "ANALYSIS_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Initial search depth, clamped to 1-6
    #[arg(long, env = "ANALYSIS_DEPTH", default_value = "4")]
    pub depth: i64,

    /// Directory holding index.html and the page assets
    #[arg(long, env = "STATIC_DIR", default_value = "./static")]
    pub static_dir: PathBuf,

    /// Evaluation display range is [-clamp, +clamp]
    #[arg(long, env = "EVAL_CLAMP", default_value = "5.0")]
    pub eval_clamp: f64,

    /// Sign convention of the service's evaluation
    #[arg(long, env = "EVAL_PERSPECTIVE", value_enum, default_value_t = EvalPerspective::White)]
    pub eval_perspective: EvalPerspective,
}

/// Validated configuration shared by every connection
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub analysis_url: String,
    pub timeout: Duration,
    pub default_depth: u8,
    pub static_dir: PathBuf,
    pub display: DisplayConfig,
}

/// Presentation parameters for the evaluation gauge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    pub eval_clamp: f64,
    pub balanced_threshold: f64,
    pub perspective: EvalPerspective,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            eval_clamp: 5.0,
            balanced_threshold: 0.5,
            perspective: EvalPerspective::White,
        }
    }
}

impl TryFrom<Args> for AppConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let bind = args
            .bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::BindAddress(args.bind.clone()))?;

        let url = args.analysis_url.trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::AnalysisUrl(args.analysis_url));
        }

        if !(args.eval_clamp.is_finite() && args.eval_clamp > 0.0) {
            return Err(ConfigError::EvalClamp(args.eval_clamp));
        }

        Ok(Self {
            bind,
            analysis_url: url,
            timeout: Duration::from_secs(args.timeout_secs.max(1)),
            default_depth: clamp_depth(args.depth),
            static_dir: args.static_dir,
            display: DisplayConfig {
                eval_clamp: args.eval_clamp,
                perspective: args.eval_perspective,
                ..DisplayConfig::default()
            },
        })
    }
}
