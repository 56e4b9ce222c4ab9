//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completion providers (OpenAI-compatible, mock)
//! - `reasoning` - Collaborator roles over a provider, and a scripted double
//! - `postgres` - Durable character sink
//! - `storage` - In-memory conversation store and character sink

pub mod ai;
pub mod postgres;
pub mod reasoning;
pub mod storage;
