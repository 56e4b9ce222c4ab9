//! Errors that abort a turn.

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::workflow::WorkflowStep;
use crate::ports::CollaboratorError;

/// A fatal failure of one workflow invocation.
///
/// The state passed to the engine is not returned on error, so nothing from
/// the failed turn can leak into stored state.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A reasoning collaborator failed or answered out of contract.
    #[error("{step} failed: {source}")]
    Collaborator {
        step: WorkflowStep,
        #[source]
        source: CollaboratorError,
    },

    /// The merged profile broke an invariant before reflection.
    #[error("extracted profile is invalid: {0}")]
    InvalidProfile(#[from] ValidationError),

    /// A step tried to leave the declared graph.
    #[error("illegal transition from {from} to {to}")]
    IllegalTransition { from: WorkflowStep, to: WorkflowStep },

    /// The state lacks something an earlier step should have produced.
    #[error("{step} found no {missing} in the conversation state")]
    MissingState {
        step: WorkflowStep,
        missing: &'static str,
    },

    /// The latest turn is not an unanswered user turn.
    #[error("conversation has no unanswered user turn to process")]
    NoUserTurn,
}

impl WorkflowError {
    pub(crate) fn collaborator(step: WorkflowStep) -> impl FnOnce(CollaboratorError) -> Self {
        move |source| WorkflowError::Collaborator { step, source }
    }
}
