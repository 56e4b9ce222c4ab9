//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, state machine trait, errors)
//! - `character` - The character profile and per-turn assessment records
//! - `workflow` - Conversation state, step graph, routing, and the state reducer

pub mod character;
pub mod foundation;
pub mod workflow;
