//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, the state machine trait, and error
//! types shared by the character and workflow modules.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CharacterRecordId, ConversationId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
