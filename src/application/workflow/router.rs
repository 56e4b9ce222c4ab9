//! Routing steps - classification, relevance, and the two exits that only talk.

use super::engine::{StepOutput, TurnScope, TurnWorkflow};
use super::WorkflowError;
use crate::domain::workflow::{
    ConversationState, EntryRoute, RelevanceRoute, StateUpdate, Turn, WorkflowStep,
};

impl TurnWorkflow {
    pub(super) async fn classify_turn(&self, scope: &TurnScope) -> Result<StepOutput, WorkflowError> {
        let classification = self
            .collaborators
            .classifier
            .classify(&scope.ctx, &scope.turn)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::ClassifyTurn))?;

        let route = EntryRoute::decide(&classification);
        tracing::info!(
            related = classification.related_to_attributes,
            route = ?route,
            "turn classified"
        );

        Ok(StepOutput::to(route.step()).with(StateUpdate::Classified(classification)))
    }

    pub(super) async fn assess_relevance(
        &self,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        let assessment = self
            .collaborators
            .assessor
            .assess(&scope.ctx, &scope.turn)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::AssessRelevance))?;

        tracing::info!(input_type = %assessment.input_type, "relevance assessed");

        let route = RelevanceRoute::decide(&assessment);
        let mut output = StepOutput::to(route.step()).with(StateUpdate::Assessed(assessment));
        if let RelevanceRoute::RequestClarification(request) = route {
            output = output.with(StateUpdate::ClarificationPending(request));
        }
        Ok(output)
    }

    pub(super) async fn redirect_off_topic(
        &self,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        let reply = self
            .collaborators
            .redirector
            .redirect(&scope.ctx, &scope.turn)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::RedirectOffTopic))?;

        Ok(StepOutput::to(WorkflowStep::End).with(StateUpdate::TurnAppended(Turn::assistant(reply))))
    }

    pub(super) async fn request_clarification(
        &self,
        state: &ConversationState,
        scope: &TurnScope,
    ) -> Result<StepOutput, WorkflowError> {
        let request = state
            .pending_clarification
            .as_ref()
            .ok_or(WorkflowError::MissingState {
                step: WorkflowStep::RequestClarification,
                missing: "clarification request",
            })?;

        let question = self
            .collaborators
            .clarifier
            .clarify(&scope.ctx, request)
            .await
            .map_err(WorkflowError::collaborator(WorkflowStep::RequestClarification))?;

        tracing::info!(input_type = %request.input_type, "clarification requested");

        Ok(StepOutput::to(WorkflowStep::End)
            .with(StateUpdate::TurnAppended(Turn::assistant(question))))
    }
}
