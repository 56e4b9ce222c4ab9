//! Workflow module - conversation state, the step graph, and routing.
//!
//! The application engine drives these types; nothing here performs I/O.

mod routing;
mod state;
mod step;
mod update;

pub use routing::{CorrectionPolicy, EntryRoute, ReflectionGate, ReflectionRoute, RelevanceRoute};
pub use state::{ClarificationRequest, ConversationState, PersistenceStatus, Turn, TurnRole};
pub use step::WorkflowStep;
pub use update::StateUpdate;
