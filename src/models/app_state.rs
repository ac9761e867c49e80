use std::sync::Arc;

use crate::config::AppConfig;
use crate::service::AnalysisService;

/// Application state shared between connections
///
/// Game state is not shared: every socket owns its own session.
pub struct AppState {
    pub config: AppConfig,
    pub analysis: Arc<dyn AnalysisService>,
}
