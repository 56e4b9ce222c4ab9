//! SendTurnHandler - Command handler for processing one user turn.
//!
//! Loads the conversation, appends the user turn, runs the workflow, and
//! saves the resulting state. A failed invocation leaves the stored state
//! exactly as it was.

use std::sync::Arc;
use thiserror::Error;

use crate::application::workflow::{TurnOutcome, TurnWorkflow, WorkflowError};
use crate::domain::foundation::{ConversationId, DomainError};
use crate::domain::workflow::{ConversationState, Turn, TurnRole};
use crate::ports::ConversationStore;

/// Command to send a user turn.
#[derive(Debug, Clone)]
pub struct SendTurnCommand {
    pub conversation_id: ConversationId,
    pub content: String,
}

/// Result of a processed turn.
#[derive(Debug, Clone)]
pub struct SendTurnResult {
    pub outcome: TurnOutcome,
    /// The assistant turn appended by this invocation.
    pub reply: Turn,
    pub state: ConversationState,
}

/// Errors from sending a turn.
#[derive(Debug, Error)]
pub enum SendTurnError {
    #[error("Turn content cannot be empty")]
    EmptyContent,

    #[error("Conversation not found: {0}")]
    NotFound(ConversationId),

    #[error("Workflow failed: {0}")]
    Workflow(#[from] WorkflowError),

    #[error("Workflow finished without an assistant reply")]
    NoReply,

    #[error("Store error: {0}")]
    Store(#[from] DomainError),
}

/// Handler for sending turns.
pub struct SendTurnHandler {
    store: Arc<dyn ConversationStore>,
    workflow: Arc<TurnWorkflow>,
}

impl SendTurnHandler {
    pub fn new(store: Arc<dyn ConversationStore>, workflow: Arc<TurnWorkflow>) -> Self {
        Self { store, workflow }
    }

    pub async fn handle(&self, cmd: SendTurnCommand) -> Result<SendTurnResult, SendTurnError> {
        // 1. Validate input
        let content = cmd.content.trim();
        if content.is_empty() {
            return Err(SendTurnError::EmptyContent);
        }

        // 2. Load conversation
        let mut state = self
            .store
            .find_by_id(&cmd.conversation_id)
            .await?
            .ok_or(SendTurnError::NotFound(cmd.conversation_id))?;

        // 3. Append the user turn and run the workflow
        state.push_user_turn(content);
        let result = self.workflow.run(state).await.map_err(|e| {
            tracing::error!(
                conversation_id = %cmd.conversation_id,
                error = %e,
                "turn processing failed"
            );
            e
        })?;

        // 4. Every exit appends a reply; check before saving
        let reply = Self::reply(&result.state)?;

        // 5. Save only after a successful invocation
        self.store.update(&result.state).await?;

        Ok(SendTurnResult {
            outcome: result.outcome,
            reply,
            state: result.state,
        })
    }

    fn reply(state: &ConversationState) -> Result<Turn, SendTurnError> {
        state
            .latest_turn()
            .filter(|turn| turn.role == TurnRole::Assistant)
            .cloned()
            .ok_or(SendTurnError::NoReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::reasoning::{ScriptedReasoner, ScriptedRole};
    use crate::adapters::storage::{InMemoryCharacterSink, InMemoryConversationStore};
    use crate::domain::character::{
        CharacterProfile, InputType, ReflectionFeedback, RelevanceAssessment,
        TurnClassification, Attribute,
    };
    use crate::domain::workflow::{CorrectionPolicy, PersistenceStatus};
    use crate::ports::Collaborators;

    struct Fixture {
        store: Arc<InMemoryConversationStore>,
        sink: Arc<InMemoryCharacterSink>,
        handler: SendTurnHandler,
        conversation_id: ConversationId,
    }

    async fn fixture(reasoner: ScriptedReasoner) -> Fixture {
        let store = Arc::new(InMemoryConversationStore::new());
        let sink = Arc::new(InMemoryCharacterSink::new());
        let workflow = Arc::new(TurnWorkflow::new(
            Collaborators::from_shared(Arc::new(reasoner)),
            sink.clone(),
            CorrectionPolicy::default(),
        ));
        let state = ConversationState::new();
        store.insert(&state).await.unwrap();

        Fixture {
            handler: SendTurnHandler::new(store.clone(), workflow),
            store,
            sink,
            conversation_id: state.id,
        }
    }

    fn send(id: ConversationId, content: &str) -> SendTurnCommand {
        SendTurnCommand {
            conversation_id: id,
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn committed_turn_is_saved() {
        let reasoner = ScriptedReasoner::new()
            .classify_as(TurnClassification::related())
            .assess_as(RelevanceAssessment::new(InputType::Stable, "clear name"))
            .extract_as(CharacterProfile {
                name: Some("Mira".to_string()),
                ..Default::default()
            })
            .reflect_as(ReflectionFeedback::confirming([Attribute::Name]))
            .acknowledge_with("Mira it is.");
        let f = fixture(reasoner).await;

        let result = f
            .handler
            .handle(send(f.conversation_id, "Her name is Mira."))
            .await
            .unwrap();

        assert!(result.outcome.is_committed());
        assert_eq!(result.reply.role, TurnRole::Assistant);
        assert_eq!(result.reply.content, "Mira it is.");

        let stored = f.store.find_by_id(&f.conversation_id).await.unwrap().unwrap();
        assert_eq!(stored.turns.len(), 2);
        assert_eq!(stored.profile.name.as_deref(), Some("Mira"));
        assert!(matches!(stored.persistence, PersistenceStatus::Persisted { .. }));
        assert_eq!(f.sink.len().await, 1);
    }

    #[tokio::test]
    async fn failed_turn_leaves_store_untouched() {
        let reasoner = ScriptedReasoner::new()
            .classify_as(TurnClassification::related())
            .fail(ScriptedRole::Assessor, "provider down");
        let f = fixture(reasoner).await;
        let before = f.store.find_by_id(&f.conversation_id).await.unwrap();

        let err = f
            .handler
            .handle(send(f.conversation_id, "She is tall."))
            .await
            .unwrap_err();

        assert!(matches!(err, SendTurnError::Workflow(_)));
        let after = f.store.find_by_id(&f.conversation_id).await.unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn reply_must_be_an_assistant_turn() {
        let mut state = ConversationState::new();
        assert!(matches!(
            SendTurnHandler::reply(&state),
            Err(SendTurnError::NoReply)
        ));

        state.push_user_turn("Her name is Mira.");
        assert!(matches!(
            SendTurnHandler::reply(&state),
            Err(SendTurnError::NoReply)
        ));

        state.turns.push(Turn::assistant("Mira it is."));
        assert_eq!(SendTurnHandler::reply(&state).unwrap().content, "Mira it is.");
    }

    #[tokio::test]
    async fn blank_content_is_rejected() {
        let f = fixture(ScriptedReasoner::new()).await;

        let err = f
            .handler
            .handle(send(f.conversation_id, "   "))
            .await
            .unwrap_err();

        assert!(matches!(err, SendTurnError::EmptyContent));
    }

    #[tokio::test]
    async fn unknown_conversation_is_not_found() {
        let f = fixture(ScriptedReasoner::new()).await;
        let missing = ConversationId::new();

        let err = f.handler.handle(send(missing, "hello")).await.unwrap_err();

        assert!(matches!(err, SendTurnError::NotFound(id) if id == missing));
    }
}
