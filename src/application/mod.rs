//! Application layer - Commands, Queries, Handlers, and the turn workflow.
//!
//! Handlers load and save conversation state around the workflow; the
//! workflow itself only talks to reasoning collaborators and the sink.

pub mod handlers;
pub mod workflow;

pub use handlers::{
    GetConversationHandler, GetConversationQuery, SendTurnCommand, SendTurnError,
    SendTurnHandler, SendTurnResult, StartConversationCommand, StartConversationHandler,
    StartConversationResult,
};
pub use workflow::{TurnOutcome, TurnResult, TurnWorkflow, WorkflowError};
