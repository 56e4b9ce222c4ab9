//! In-Memory Conversation Store Adapter
//!
//! Keeps conversation states in memory. Used by the binary and by tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::domain::workflow::ConversationState;
use crate::ports::ConversationStore;

/// In-memory storage for conversation states
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    states: Arc<RwLock<HashMap<ConversationId, ConversationState>>>,
}

impl InMemoryConversationStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored conversations
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

fn not_found(id: &ConversationId) -> DomainError {
    DomainError::new(
        ErrorCode::ConversationNotFound,
        format!("Conversation {} not found", id),
    )
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn insert(&self, state: &ConversationState) -> Result<(), DomainError> {
        let mut states = self.states.write().await;
        if states.contains_key(&state.id) {
            return Err(DomainError::new(
                ErrorCode::ConversationExists,
                format!("Conversation {} already exists", state.id),
            ));
        }
        states.insert(state.id, state.clone());
        Ok(())
    }

    async fn update(&self, state: &ConversationState) -> Result<(), DomainError> {
        let mut states = self.states.write().await;
        match states.get_mut(&state.id) {
            Some(stored) => {
                *stored = state.clone();
                Ok(())
            }
            None => Err(not_found(&state.id)),
        }
    }

    async fn find_by_id(
        &self,
        id: &ConversationId,
    ) -> Result<Option<ConversationState>, DomainError> {
        Ok(self.states.read().await.get(id).cloned())
    }

    async fn exists(&self, id: &ConversationId) -> Result<bool, DomainError> {
        Ok(self.states.read().await.contains_key(id))
    }

    async fn delete(&self, id: &ConversationId) -> Result<(), DomainError> {
        self.states.write().await.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_then_find() {
        let store = InMemoryConversationStore::new();
        let state = ConversationState::new();

        store.insert(&state).await.unwrap();

        assert_eq!(store.find_by_id(&state.id).await.unwrap(), Some(state.clone()));
        assert!(store.exists(&state.id).await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn insert_twice_is_rejected() {
        let store = InMemoryConversationStore::new();
        let state = ConversationState::new();
        store.insert(&state).await.unwrap();

        let err = store.insert(&state).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConversationExists);
    }

    #[tokio::test]
    async fn update_replaces_stored_state() {
        let store = InMemoryConversationStore::new();
        let mut state = ConversationState::new();
        store.insert(&state).await.unwrap();

        state.push_user_turn("Her name is Mira.");
        store.update(&state).await.unwrap();

        let stored = store.find_by_id(&state.id).await.unwrap().unwrap();
        assert_eq!(stored.turns.len(), 1);
    }

    #[tokio::test]
    async fn update_of_unknown_conversation_fails() {
        let store = InMemoryConversationStore::new();
        let err = store.update(&ConversationState::new()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConversationNotFound);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = InMemoryConversationStore::new();
        let state = ConversationState::new();
        store.insert(&state).await.unwrap();

        store.delete(&state.id).await.unwrap();
        store.delete(&state.id).await.unwrap();

        assert!(store.is_empty().await);
    }
}
