//! Conversation store port.
//!
//! Persists whole conversation states between turns. The workflow engine
//! never touches the store; the application handlers load before and save
//! after an invocation.

use async_trait::async_trait;

use crate::domain::foundation::{ConversationId, DomainError};
use crate::domain::workflow::ConversationState;

/// Port for conversation state persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Insert a new conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationExists` if the id is already stored
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, state: &ConversationState) -> Result<(), DomainError>;

    /// Replace a stored conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the id is not stored
    /// - `DatabaseError` on persistence failure
    async fn update(&self, state: &ConversationState) -> Result<(), DomainError>;

    /// Find a conversation by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ConversationId)
        -> Result<Option<ConversationState>, DomainError>;

    /// Check if a conversation exists.
    async fn exists(&self, id: &ConversationId) -> Result<bool, DomainError>;

    /// Delete a conversation. Deleting a missing id is not an error.
    async fn delete(&self, id: &ConversationId) -> Result<(), DomainError>;
}
