//! Error types for the client session.
//!
//! Every variant is recoverable: the session always returns to an idle,
//! interactable state after any of them.

/// Failures that can end a move or a sync cycle
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// Rejected locally by the rules engine
    #[error("Illegal move: {from}{to}")]
    IllegalMove { from: String, to: String },

    /// The analysis service answered with an `error` field
    #[error("Analysis service error: {message}")]
    Service { message: String },

    /// The request never completed (transport error)
    #[error("Network failure: {message}")]
    Network { message: String },

    /// The request did not complete within the configured bound
    #[error("Analysis request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The reply could not be interpreted
    #[error("Malformed analysis response: {message}")]
    Malformed { message: String },

    /// A FEN string the rules engine could not load
    #[error("Invalid position: {fen}")]
    InvalidPosition { fen: String },
}

impl SyncError {
    /// Network failures and timeouts are only logged; everything else is shown to the user.
    pub fn is_network(&self) -> bool {
        matches!(self, SyncError::Network { .. } | SyncError::Timeout { .. })
    }
}

/// Invalid startup configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address '{0}'")]
    BindAddress(String),

    #[error("Analysis URL must start with http:// or https://, got '{0}'")]
    AnalysisUrl(String),

    #[error("Evaluation clamp must be a positive number, got {0}")]
    EvalClamp(f64),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type alias for session operations
pub type SyncResult<T> = Result<T, SyncError>;
