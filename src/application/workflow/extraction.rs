//! Extraction loop - extract, reflect, and decide whether to commit.

use super::engine::{StepOutput, TurnScope, TurnWorkflow};
use super::WorkflowError;
use crate::domain::workflow::{ConversationState, ReflectionRoute, StateUpdate, WorkflowStep};

impl TurnWorkflow {
    pub(super) async fn extract_fields(
        &self,
        state: &ConversationState,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        let partial = self
            .collaborators
            .extractor
            .extract(&scope.ctx, &scope.turn)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::ExtractFields))?;

        tracing::debug!(
            pass = state.correction_passes,
            extracted = ?partial.set_attributes(),
            "fields extracted"
        );

        Ok(StepOutput::to(WorkflowStep::ReflectOnExtraction)
            .with(StateUpdate::Extracted(partial)))
    }

    /// Cross-checks the merged profile and picks the next hop.
    ///
    /// Suggested corrections are never merged. Giving up restores the profile
    /// the invocation started from, so a clarification turn commits nothing.
    pub(super) async fn reflect_on_extraction(
        &self,
        state: &ConversationState,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        state.profile.validate()?;

        let feedback = self
            .collaborators
            .reflector
            .reflect(&scope.ctx, &scope.turn, &state.profile)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::ReflectOnExtraction))?;

        let route = ReflectionRoute::decide(&feedback, state.correction_passes, &self.policy);
        let next = route.step();
        let mut output = StepOutput::to(next).with(StateUpdate::Reflected(feedback));

        match route {
            ReflectionRoute::Finalize => {}
            ReflectionRoute::ReExtract => {
                tracing::info!(
                    pass = state.correction_passes + 1,
                    "reflection suggested corrections, extracting again"
                );
                output = output.with(StateUpdate::CorrectionPassStarted);
            }
            ReflectionRoute::RequestClarification(request) => {
                tracing::warn!(
                    passes = state.correction_passes,
                    input_type = %request.input_type,
                    "reflection left attributes unresolved, asking the user"
                );
                output = output
                    .with(StateUpdate::ProfileRestored(scope.baseline.clone()))
                    .with(StateUpdate::ClarificationPending(request));
            }
        }

        Ok(output)
    }
}
