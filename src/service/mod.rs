//! Client side of the remote analysis service.

use async_trait::async_trait;

use crate::error::SyncError;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};

pub mod http;

pub use http::HttpAnalysisService;

/// Exchanges one analysis request for one interpreted result
///
/// `Err` is reserved for requests that never produced a reply (transport
/// failure or timeout); anything the service answers is an [`AnalysisResult`].
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyse(&self, request: AnalysisRequest) -> Result<AnalysisResult, SyncError>;
}
