//! GetConversationHandler - Query handler for retrieving conversation state.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DomainError, ErrorCode};
use crate::domain::workflow::ConversationState;
use crate::ports::ConversationStore;

/// Query to get a conversation.
#[derive(Debug, Clone)]
pub struct GetConversationQuery {
    pub conversation_id: ConversationId,
}

/// Handler for getting conversations.
pub struct GetConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl GetConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetConversationQuery,
    ) -> Result<ConversationState, DomainError> {
        match self.store.find_by_id(&query.conversation_id).await {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Err(DomainError::new(
                ErrorCode::ConversationNotFound,
                format!("Conversation not found: {}", query.conversation_id),
            )),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;

    #[tokio::test]
    async fn returns_stored_state() {
        let store = Arc::new(InMemoryConversationStore::new());
        let mut state = ConversationState::new();
        state.push_user_turn("hello");
        store.insert(&state).await.unwrap();

        let handler = GetConversationHandler::new(store);
        let found = handler
            .handle(GetConversationQuery {
                conversation_id: state.id,
            })
            .await
            .unwrap();

        assert_eq!(found, state);
    }

    #[tokio::test]
    async fn missing_conversation_is_not_found() {
        let handler = GetConversationHandler::new(Arc::new(InMemoryConversationStore::new()));

        let err = handler
            .handle(GetConversationQuery {
                conversation_id: ConversationId::new(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConversationNotFound);
    }
}
