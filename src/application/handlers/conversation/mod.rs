//! Conversation command and query handlers.
//!
//! Handles opening conversations, sending turns, and reading state back.

mod get_conversation;
mod send_turn;
mod start_conversation;

pub use get_conversation::{GetConversationHandler, GetConversationQuery};
pub use send_turn::{SendTurnCommand, SendTurnError, SendTurnHandler, SendTurnResult};
pub use start_conversation::{
    StartConversationCommand, StartConversationHandler, StartConversationResult,
};
