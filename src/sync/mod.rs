pub mod controller;
pub mod history;
pub mod reconciler;
pub mod session;

pub use controller::{exchange, SessionToken, SyncController, SyncPhase, SyncReply, SyncTicket};
pub use history::EvaluationHistory;
pub use reconciler::ResponseReconciler;
pub use session::{ClientSession, SyncCompletion};
