use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use std::time::Duration;

use crate::error::{ConfigError, SyncError};
use crate::models::analysis::{AnalysisRequest, AnalysisResult};
use crate::service::AnalysisService;

/// `POST <base_url>/fen` over HTTP with a bounded timeout
#[derive(Clone, Debug)]
pub struct HttpAnalysisService {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpAnalysisService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/fen", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport_error(&self, e: reqwest::Error) -> SyncError {
        if e.is_timeout() {
            SyncError::Timeout {
                seconds: self.timeout.as_secs(),
            }
        } else {
            SyncError::Network {
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyse(&self, request: AnalysisRequest) -> Result<AnalysisResult, SyncError> {
        debug!("POST {} depth={:?}", self.endpoint, request.depth);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        let result = AnalysisResult::from_body(&body);
        if !status.is_success() {
            warn!("Analysis service answered {} for {}", status, request.fen);
            // A non-2xx reply without an error field still failed
            if let AnalysisResult::Success(_) | AnalysisResult::Malformed(_) = result {
                return Ok(AnalysisResult::ServiceError(format!(
                    "Analysis service returned {}",
                    status
                )));
            }
        }
        Ok(result)
    }
}
