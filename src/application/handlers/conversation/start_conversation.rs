//! StartConversationHandler - Command handler for opening a conversation.

use std::sync::Arc;

use crate::domain::foundation::{ConversationId, DomainError};
use crate::domain::workflow::ConversationState;
use crate::ports::ConversationStore;

/// Command to start a new conversation.
#[derive(Debug, Clone, Default)]
pub struct StartConversationCommand {
    /// Caller-chosen id; a random one is generated when absent.
    pub conversation_id: Option<ConversationId>,
}

/// Result of starting a conversation.
#[derive(Debug, Clone)]
pub struct StartConversationResult {
    pub conversation_id: ConversationId,
    pub state: ConversationState,
}

/// Handler for starting conversations.
pub struct StartConversationHandler {
    store: Arc<dyn ConversationStore>,
}

impl StartConversationHandler {
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: StartConversationCommand,
    ) -> Result<StartConversationResult, DomainError> {
        let state = cmd
            .conversation_id
            .map(ConversationState::with_id)
            .unwrap_or_default();

        self.store.insert(&state).await?;
        tracing::info!(conversation_id = %state.id, "conversation started");

        Ok(StartConversationResult {
            conversation_id: state.id,
            state,
        })
    }
}
