//! Reasoning Adapters.
//!
//! - `LlmCharacterReasoner` - Every collaborator role over an `AIProvider`
//! - `ScriptedReasoner` - Queue-driven double for tests

mod llm_reasoner;
mod prompts;
mod scripted_reasoner;
mod structured;

pub use llm_reasoner::{LlmCharacterReasoner, LlmReasonerConfig};
pub use scripted_reasoner::{ReasonerCall, ScriptedReasoner, ScriptedRole};
