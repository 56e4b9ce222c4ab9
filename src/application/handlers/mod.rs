//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod conversation;

pub use conversation::{
    // Commands
    SendTurnCommand, SendTurnError, SendTurnHandler, SendTurnResult,
    StartConversationCommand, StartConversationHandler, StartConversationResult,
    // Queries
    GetConversationHandler, GetConversationQuery,
};
