//! Reasoning Ports - the language-understanding collaborators of a turn.
//!
//! Each trait is one opaque collaborator described only by its input and
//! output. Implementations may be backed by an LLM, a rules engine, or a
//! scripted test double; the workflow engine does not care which.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::AIError;
use crate::domain::character::{
    Attribute, AttributeValue, CharacterProfile, FinalizedCharacter, ReflectionFeedback,
    RelevanceAssessment, TurnClassification,
};
use crate::domain::foundation::ConversationId;
use crate::domain::workflow::ClarificationRequest;

/// Identifies the conversation a collaborator call belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasoningContext {
    pub conversation_id: ConversationId,
    pub trace_id: String,
}

impl ReasoningContext {
    pub fn new(conversation_id: ConversationId, trace_id: impl Into<String>) -> Self {
        Self {
            conversation_id,
            trace_id: trace_id.into(),
        }
    }
}

/// Decides whether a turn carries attribute information at all.
#[async_trait]
pub trait RelatednessClassifier: Send + Sync {
    async fn classify(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<TurnClassification, CollaboratorError>;
}

/// Grades an attribute-related turn as stable, ambiguous or misleading.
#[async_trait]
pub trait RelevanceAssessor: Send + Sync {
    async fn assess(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<RelevanceAssessment, CollaboratorError>;
}

/// Pulls attribute values out of a turn.
///
/// Returns a partial profile; attributes not mentioned are `None`.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<CharacterProfile, CollaboratorError>;
}

/// Cross-checks the merged profile against the turn it came from.
#[async_trait]
pub trait ConsistencyReflector: Send + Sync {
    async fn reflect(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
        profile: &CharacterProfile,
    ) -> Result<ReflectionFeedback, CollaboratorError>;
}

/// Writes one message asking the user about one attribute.
#[async_trait]
pub trait ClarificationGenerator: Send + Sync {
    async fn clarify(
        &self,
        ctx: &ReasoningContext,
        request: &ClarificationRequest,
    ) -> Result<String, CollaboratorError>;
}

/// Writes one message steering an off-topic user back to an attribute.
#[async_trait]
pub trait OffTopicRedirector: Send + Sync {
    async fn redirect(&self, ctx: &ReasoningContext, turn: &str)
        -> Result<String, CollaboratorError>;
}

/// Writes one message acknowledging confirmed values.
#[async_trait]
pub trait AcknowledgmentGenerator: Send + Sync {
    async fn acknowledge(
        &self,
        ctx: &ReasoningContext,
        confirmed: &BTreeMap<Attribute, AttributeValue>,
        character: &FinalizedCharacter,
    ) -> Result<String, CollaboratorError>;
}

/// Errors from a reasoning collaborator. All are fatal for the turn.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    /// The underlying provider failed.
    #[error(transparent)]
    Provider(#[from] AIError),

    /// The collaborator answered, but not in the agreed shape.
    #[error("{collaborator} returned invalid output: {reason}")]
    InvalidOutput {
        collaborator: &'static str,
        reason: String,
    },

    /// A scripted double ran out of answers.
    #[error("{collaborator} has no scripted response left")]
    Exhausted { collaborator: &'static str },
}

impl CollaboratorError {
    pub fn invalid_output(collaborator: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOutput {
            collaborator,
            reason: reason.into(),
        }
    }
}

/// The full set of collaborators a workflow needs.
#[derive(Clone)]
pub struct Collaborators {
    pub classifier: Arc<dyn RelatednessClassifier>,
    pub assessor: Arc<dyn RelevanceAssessor>,
    pub extractor: Arc<dyn FieldExtractor>,
    pub reflector: Arc<dyn ConsistencyReflector>,
    pub clarifier: Arc<dyn ClarificationGenerator>,
    pub redirector: Arc<dyn OffTopicRedirector>,
    pub acknowledger: Arc<dyn AcknowledgmentGenerator>,
}

impl Collaborators {
    /// Uses one implementation for every role.
    pub fn from_shared<T>(reasoner: Arc<T>) -> Self
    where
        T: RelatednessClassifier
            + RelevanceAssessor
            + FieldExtractor
            + ConsistencyReflector
            + ClarificationGenerator
            + OffTopicRedirector
            + AcknowledgmentGenerator
            + 'static,
    {
        Self {
            classifier: reasoner.clone(),
            assessor: reasoner.clone(),
            extractor: reasoner.clone(),
            reflector: reasoner.clone(),
            clarifier: reasoner.clone(),
            redirector: reasoner.clone(),
            acknowledger: reasoner,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_convert_transparently() {
        let err: CollaboratorError = AIError::AuthenticationFailed.into();
        assert!(matches!(err, CollaboratorError::Provider(_)));
        assert_eq!(err.to_string(), "authentication failed");
    }

    #[test]
    fn invalid_output_names_the_collaborator() {
        let err = CollaboratorError::invalid_output("field_extractor", "age is not a number");
        assert_eq!(
            err.to_string(),
            "field_extractor returned invalid output: age is not a number"
        );
    }
}
