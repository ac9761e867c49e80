//! Request/response cycle against the analysis service.
//!
//! Every cycle carries a [`SessionToken`]. Only the most recently issued token
//! is current; a reply tagged with any other token is stale and must not touch
//! the game state. Responses may settle in any order.

use log::{debug, info};
use std::fmt;
use std::sync::Arc;

use crate::error::SyncError;
use crate::models::analysis::{AnalysisRequest, AnalysisResult};
use crate::service::AnalysisService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(u64);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    AwaitingResponse,
    Reconciling,
    Failed,
}

/// One outstanding exchange: the request and the token it was issued under
#[derive(Debug, Clone, PartialEq)]
pub struct SyncTicket {
    pub token: SessionToken,
    pub request: AnalysisRequest,
}

/// The settled exchange, still tagged with its token
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReply {
    pub token: SessionToken,
    pub outcome: Result<AnalysisResult, SyncError>,
}

/// Perform the network half of a cycle.
pub async fn exchange(service: Arc<dyn AnalysisService>, ticket: SyncTicket) -> SyncReply {
    let outcome = service.analyse(ticket.request).await;
    SyncReply {
        token: ticket.token,
        outcome,
    }
}

/// Issues session tokens and enforces a single outstanding cycle
#[derive(Debug)]
pub struct SyncController {
    last_issued: u64,
    current: Option<SessionToken>,
    phase: SyncPhase,
}

impl Default for SyncController {
    fn default() -> Self {
        Self {
            last_issued: 0,
            current: None,
            phase: SyncPhase::Idle,
        }
    }
}

impl SyncController {
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn current(&self) -> Option<SessionToken> {
        self.current
    }

    pub fn is_awaiting(&self) -> bool {
        self.current.is_some()
    }

    /// Start a cycle for `fen`; any earlier outstanding cycle is superseded
    pub fn begin(&mut self, fen: String, depth: u8) -> SyncTicket {
        self.last_issued += 1;
        let token = SessionToken(self.last_issued);
        if let Some(previous) = self.current.replace(token) {
            info!("Session {} superseded by {}", previous, token);
        }
        self.transition(SyncPhase::AwaitingResponse);
        SyncTicket {
            token,
            request: AnalysisRequest {
                fen,
                depth: Some(depth),
            },
        }
    }

    /// Claim a settled reply. Returns false for stale tokens, which leaves
    /// the current cycle untouched.
    pub fn accept(&mut self, token: SessionToken) -> bool {
        if self.current != Some(token) {
            debug!("Discarding stale reply for session {}", token);
            return false;
        }
        self.current = None;
        true
    }

    pub fn reconciling(&mut self) {
        self.transition(SyncPhase::Reconciling);
    }

    pub fn failed(&mut self) {
        self.transition(SyncPhase::Failed);
    }

    pub fn settle(&mut self) {
        self.transition(SyncPhase::Idle);
    }

    /// Drop the outstanding cycle without a reply (reset)
    pub fn cancel(&mut self) {
        if let Some(token) = self.current.take() {
            info!("Session {} cancelled", token);
        }
        self.transition(SyncPhase::Idle);
    }

    fn transition(&mut self, next: SyncPhase) {
        if self.phase != next {
            debug!("Sync phase {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }
}
