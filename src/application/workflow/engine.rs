//! Workflow engine - runs one user turn through the step graph.
//!
//! Each step reads the state, calls at most one collaborator, and returns a
//! list of [`StateUpdate`]s plus the step to go to next. The engine applies
//! the updates, checks the hop against the graph, and repeats until `End`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::WorkflowError;
use crate::domain::character::{CharacterProfile, InputType};
use crate::domain::foundation::StateMachine;
use crate::domain::workflow::{
    ConversationState, CorrectionPolicy, PersistenceStatus, StateUpdate, WorkflowStep,
};
use crate::ports::{CharacterSink, Collaborators, ReasoningContext};

/// How an invocation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The turn was off-topic; a steering message was appended.
    Redirected,
    /// The turn needs clarification; a question was appended.
    ClarificationRequested { input_type: InputType },
    /// The profile was finalized and handed to the sink.
    Committed { persistence: PersistenceStatus },
}

impl TurnOutcome {
    /// Returns true if the profile was finalized this turn.
    pub fn is_committed(&self) -> bool {
        matches!(self, TurnOutcome::Committed { .. })
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone)]
pub struct TurnResult {
    pub state: ConversationState,
    pub outcome: TurnOutcome,
    /// Steps visited, from the entry point to `End`.
    pub path: Vec<WorkflowStep>,
}

/// Per-invocation inputs shared by all steps.
pub(super) struct TurnScope {
    pub ctx: ReasoningContext,
    /// Text of the latest user turn.
    pub turn: String,
    /// Profile as it was before this invocation.
    pub baseline: CharacterProfile,
}

/// What a step hands back to the engine.
#[derive(Debug)]
pub(super) struct StepOutput {
    pub updates: Vec<StateUpdate>,
    pub next: WorkflowStep,
}

impl StepOutput {
    pub fn to(next: WorkflowStep) -> Self {
        Self {
            updates: Vec::new(),
            next,
        }
    }

    pub fn with(mut self, update: StateUpdate) -> Self {
        self.updates.push(update);
        self
    }
}

/// The turn-processing workflow.
pub struct TurnWorkflow {
    pub(super) collaborators: Collaborators,
    pub(super) sink: Arc<dyn CharacterSink>,
    pub(super) policy: CorrectionPolicy,
}

impl TurnWorkflow {
    pub fn new(
        collaborators: Collaborators,
        sink: Arc<dyn CharacterSink>,
        policy: CorrectionPolicy,
    ) -> Self {
        Self {
            collaborators,
            sink,
            policy,
        }
    }

    pub fn policy(&self) -> &CorrectionPolicy {
        &self.policy
    }

    /// Processes the latest user turn of `state` to completion.
    ///
    /// The caller appends the user turn before calling; a state whose latest
    /// turn is already answered is rejected. On error the state is
    /// dropped; callers keep their own copy if they need to retry.
    #[tracing::instrument(skip_all, fields(conversation_id = %state.id))]
    pub async fn run(&self, state: ConversationState) -> Result<TurnResult, WorkflowError> {
        let turn = state
            .pending_user_text()
            .ok_or(WorkflowError::NoUserTurn)?
            .to_string();

        let scope = TurnScope {
            ctx: ReasoningContext::new(state.id, format!("turn-{}", Uuid::new_v4())),
            turn,
            baseline: state.profile.clone(),
        };

        let mut state = state.apply(StateUpdate::BeginTurn);
        let mut step = WorkflowStep::ENTRY;
        let mut path = vec![step];

        while !step.is_terminal() {
            let output = self.execute(step, &state, &scope).await?;
            state = state.apply_all(output.updates);

            let next = step
                .transition_to(output.next)
                .map_err(|_| WorkflowError::IllegalTransition {
                    from: step,
                    to: output.next,
                })?;
            tracing::debug!(from = %step, to = %next, "workflow hop");

            path.push(next);
            step = next;
        }

        let outcome = Self::outcome(&path, &state)?;
        tracing::info!(
            outcome = ?outcome,
            steps = path.len(),
            correction_passes = state.correction_passes,
            "turn processed"
        );

        Ok(TurnResult {
            state,
            outcome,
            path,
        })
    }

    async fn execute(
        &self,
        step: WorkflowStep,
        state: &ConversationState,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        match step {
            WorkflowStep::ClassifyTurn => self.classify_turn(scope).await,
            WorkflowStep::AssessRelevance => self.assess_relevance(scope).await,
            WorkflowStep::RedirectOffTopic => self.redirect_off_topic(scope).await,
            WorkflowStep::RequestClarification => self.request_clarification(state, scope).await,
            WorkflowStep::ExtractFields => self.extract_fields(state, scope).await,
            WorkflowStep::ReflectOnExtraction => self.reflect_on_extraction(state, scope).await,
            WorkflowStep::SetCharacterFields => Ok(Self::set_character_fields(state)),
            WorkflowStep::Acknowledge => self.acknowledge(state, scope).await,
            WorkflowStep::Persist => self.persist(state).await,
            WorkflowStep::End => Ok(StepOutput::to(WorkflowStep::End)),
        }
    }

    /// Reads the outcome off the step that led into `End`.
    fn outcome(path: &[WorkflowStep], state: &ConversationState) -> Result<TurnOutcome, WorkflowError> {
        let last = path
            .iter()
            .rev()
            .nth(1)
            .copied()
            .unwrap_or(WorkflowStep::ENTRY);

        match last {
            WorkflowStep::RedirectOffTopic => Ok(TurnOutcome::Redirected),
            WorkflowStep::RequestClarification => state
                .pending_clarification
                .as_ref()
                .map(|request| TurnOutcome::ClarificationRequested {
                    input_type: request.input_type,
                })
                .ok_or(WorkflowError::MissingState {
                    step: last,
                    missing: "clarification request",
                }),
            WorkflowStep::Persist => Ok(TurnOutcome::Committed {
                persistence: state.persistence.clone(),
            }),
            other => Err(WorkflowError::IllegalTransition {
                from: other,
                to: WorkflowStep::End,
            }),
        }
    }
}

impl std::fmt::Debug for TurnWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnWorkflow")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::ClarificationRequest;
    use crate::domain::foundation::CharacterRecordId;

    #[test]
    fn outcome_follows_the_step_before_end() {
        let state = ConversationState::new();
        let path = [
            WorkflowStep::ClassifyTurn,
            WorkflowStep::RedirectOffTopic,
            WorkflowStep::End,
        ];
        assert_eq!(
            TurnWorkflow::outcome(&path, &state).unwrap(),
            TurnOutcome::Redirected
        );
    }

    #[test]
    fn clarification_outcome_carries_input_type() {
        let state = ConversationState::new().apply(StateUpdate::ClarificationPending(
            ClarificationRequest::new(InputType::Misleading, "contradiction"),
        ));
        let path = [
            WorkflowStep::ClassifyTurn,
            WorkflowStep::AssessRelevance,
            WorkflowStep::RequestClarification,
            WorkflowStep::End,
        ];
        assert_eq!(
            TurnWorkflow::outcome(&path, &state).unwrap(),
            TurnOutcome::ClarificationRequested {
                input_type: InputType::Misleading
            }
        );
    }

    #[test]
    fn committed_outcome_carries_persistence() {
        let status = PersistenceStatus::Persisted {
            record_id: CharacterRecordId::new(9),
        };
        let state =
            ConversationState::new().apply(StateUpdate::PersistenceRecorded(status.clone()));
        let path = [WorkflowStep::Persist, WorkflowStep::End];

        let outcome = TurnWorkflow::outcome(&path, &state).unwrap();

        assert!(outcome.is_committed());
        assert_eq!(outcome, TurnOutcome::Committed { persistence: status });
    }

    #[test]
    fn outcome_serializes_tagged() {
        let json = serde_json::to_value(TurnOutcome::ClarificationRequested {
            input_type: InputType::Ambiguous,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"outcome": "clarification_requested", "input_type": "ambiguous"})
        );
    }
}
