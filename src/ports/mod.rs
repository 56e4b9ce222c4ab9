//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Reasoning Ports
//!
//! - `AIProvider` - Chat-completion access to an LLM provider
//! - `RelatednessClassifier`, `RelevanceAssessor`, `FieldExtractor`,
//!   `ConsistencyReflector`, `ClarificationGenerator`, `OffTopicRedirector`,
//!   `AcknowledgmentGenerator` - The per-step reasoning collaborators
//!
//! ## Storage Ports
//!
//! - `ConversationStore` - Conversation state between turns
//! - `CharacterSink` - Durable record of finalized characters

mod ai_provider;
mod character_sink;
mod conversation_store;
mod reasoning;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, ResponseFormat, TokenUsage,
};
pub use character_sink::CharacterSink;
pub use conversation_store::ConversationStore;
pub use reasoning::{
    AcknowledgmentGenerator, ClarificationGenerator, CollaboratorError, Collaborators,
    ConsistencyReflector, FieldExtractor, OffTopicRedirector, ReasoningContext,
    RelatednessClassifier, RelevanceAssessor,
};
