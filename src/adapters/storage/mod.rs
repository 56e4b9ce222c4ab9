//! Storage Adapters
//!
//! In-memory implementations of the storage ports.
//!
//! ## Available Adapters
//!
//! - **InMemoryConversationStore** - Conversation states (testing/development)
//! - **InMemoryCharacterSink** - Finalized characters (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryCharacterSink, InMemoryConversationStore};
//!
//! let store = InMemoryConversationStore::new();
//! let sink = InMemoryCharacterSink::failing();
//! ```

mod in_memory_character_sink;
mod in_memory_conversation_store;

pub use in_memory_character_sink::InMemoryCharacterSink;
pub use in_memory_conversation_store::InMemoryConversationStore;
