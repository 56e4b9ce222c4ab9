//! Commit path - snapshot, acknowledge, persist.

use super::engine::{StepOutput, TurnScope, TurnWorkflow};
use super::WorkflowError;
use crate::domain::character::FinalizedCharacter;
use crate::domain::workflow::{
    ConversationState, PersistenceStatus, StateUpdate, Turn, WorkflowStep,
};

impl TurnWorkflow {
    pub(super) fn set_character_fields(state: &ConversationState) -> StepOutput {
        StepOutput::to(WorkflowStep::Acknowledge).with(StateUpdate::Finalized(
            FinalizedCharacter::snapshot(&state.profile),
        ))
    }

    pub(super) async fn acknowledge(
        &self,
        state: &ConversationState,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        let finalized = Self::finalized(state, WorkflowStep::Acknowledge)?;

        let confirmed = state
            .reflection
            .as_ref()
            .map(|feedback| state.profile.subset(&feedback.confirmations))
            .unwrap_or_default();

        let reply = self
            .collaborators
            .acknowledger
            .acknowledge(&scope.ctx, &confirmed, finalized)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::Acknowledge))?;

        Ok(StepOutput::to(WorkflowStep::Persist)
            .with(StateUpdate::TurnAppended(Turn::assistant(reply))))
    }

    /// Writes the snapshot to the sink. Sink failures are recorded, not raised.
    pub(super) async fn persist(&self, state: &ConversationState) -> Result<StepOutput, WorkflowError> {
        let finalized = Self::finalized(state, WorkflowStep::Persist)?;

        let status = match self.sink.persist(finalized).await {
            Ok(record_id) => {
                tracing::info!(record_id = %record_id, "character persisted");
                PersistenceStatus::Persisted { record_id }
            }
            Err(e) => {
                tracing::warn!(error = %e, "character persistence failed");
                PersistenceStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        Ok(StepOutput::to(WorkflowStep::End).with(StateUpdate::PersistenceRecorded(status)))
    }

    fn finalized(
        state: &ConversationState,
        step: WorkflowStep,
    ) -> Result<&FinalizedCharacter, WorkflowError> {
        state.finalized.as_ref().ok_or(WorkflowError::MissingState {
            step,
            missing: "finalized character",
        })
    }
}
