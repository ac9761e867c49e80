pub mod committer;
pub mod move_gate;
pub mod notation;
pub mod rules;
pub mod utils;

pub use committer::{Candidate, MoveCommitter};
pub use move_gate::MoveGate;
pub use rules::{ChessRules, MoveRecord, RulesEngine};
