//! Turn workflow - drives one user turn through the step graph.
//!
//! Steps are grouped by concern:
//! - `router` - classification, relevance, redirect, clarification
//! - `extraction` - the extract/reflect correction loop
//! - `finalization` - snapshot, acknowledgment, persistence

mod engine;
mod errors;
mod extraction;
mod finalization;
mod router;

pub use engine::{TurnOutcome, TurnResult, TurnWorkflow};
pub use errors::WorkflowError;
