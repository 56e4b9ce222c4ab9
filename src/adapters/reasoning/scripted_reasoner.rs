//! Scripted reasoning collaborators for tests.
//!
//! Every role answers from its own queue, in order. An empty queue is an
//! error rather than a default answer, so a test fails loudly when the
//! workflow calls a collaborator it should not have.
//!
//! # Example
//!
//! ```ignore
//! let reasoner = ScriptedReasoner::new()
//!     .classify_as(TurnClassification::unrelated())
//!     .redirect_with("Tell me the character's name!");
//!
//! let collaborators = Collaborators::from_shared(Arc::new(reasoner.clone()));
//! // ... run a turn ...
//! assert_eq!(reasoner.count(ScriptedRole::Extractor), 0);
//! ```

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::character::{
    Attribute, AttributeValue, CharacterProfile, FinalizedCharacter, ReflectionFeedback,
    RelevanceAssessment, TurnClassification,
};
use crate::domain::workflow::ClarificationRequest;
use crate::ports::{
    AIError, AcknowledgmentGenerator, ClarificationGenerator, CollaboratorError,
    ConsistencyReflector, FieldExtractor, OffTopicRedirector, ReasoningContext,
    RelatednessClassifier, RelevanceAssessor,
};

/// The seven collaborator roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptedRole {
    Classifier,
    Assessor,
    Extractor,
    Reflector,
    Clarifier,
    Redirector,
    Acknowledger,
}

impl ScriptedRole {
    fn name(&self) -> &'static str {
        match self {
            ScriptedRole::Classifier => "relatedness_classifier",
            ScriptedRole::Assessor => "relevance_assessor",
            ScriptedRole::Extractor => "field_extractor",
            ScriptedRole::Reflector => "consistency_reflector",
            ScriptedRole::Clarifier => "clarification_generator",
            ScriptedRole::Redirector => "off_topic_redirector",
            ScriptedRole::Acknowledger => "acknowledgment_generator",
        }
    }
}

/// A recorded collaborator call with its inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum ReasonerCall {
    Classify { turn: String },
    Assess { turn: String },
    Extract { turn: String },
    Reflect { turn: String, profile: CharacterProfile },
    Clarify { request: ClarificationRequest },
    Redirect { turn: String },
    Acknowledge {
        confirmed: BTreeMap<Attribute, AttributeValue>,
        character: FinalizedCharacter,
    },
}

impl ReasonerCall {
    pub fn role(&self) -> ScriptedRole {
        match self {
            ReasonerCall::Classify { .. } => ScriptedRole::Classifier,
            ReasonerCall::Assess { .. } => ScriptedRole::Assessor,
            ReasonerCall::Extract { .. } => ScriptedRole::Extractor,
            ReasonerCall::Reflect { .. } => ScriptedRole::Reflector,
            ReasonerCall::Clarify { .. } => ScriptedRole::Clarifier,
            ReasonerCall::Redirect { .. } => ScriptedRole::Redirector,
            ReasonerCall::Acknowledge { .. } => ScriptedRole::Acknowledger,
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted<T> {
    Answer(T),
    Fail(String),
}

#[derive(Debug, Default)]
struct Script {
    classifications: VecDeque<Scripted<TurnClassification>>,
    assessments: VecDeque<Scripted<RelevanceAssessment>>,
    extractions: VecDeque<Scripted<CharacterProfile>>,
    reflections: VecDeque<Scripted<ReflectionFeedback>>,
    clarifications: VecDeque<Scripted<String>>,
    redirects: VecDeque<Scripted<String>>,
    acknowledgments: VecDeque<Scripted<String>>,
    calls: Vec<ReasonerCall>,
}

impl Script {
    fn fail(&mut self, role: ScriptedRole, message: String) {
        match role {
            ScriptedRole::Classifier => self.classifications.push_back(Scripted::Fail(message)),
            ScriptedRole::Assessor => self.assessments.push_back(Scripted::Fail(message)),
            ScriptedRole::Extractor => self.extractions.push_back(Scripted::Fail(message)),
            ScriptedRole::Reflector => self.reflections.push_back(Scripted::Fail(message)),
            ScriptedRole::Clarifier => self.clarifications.push_back(Scripted::Fail(message)),
            ScriptedRole::Redirector => self.redirects.push_back(Scripted::Fail(message)),
            ScriptedRole::Acknowledger => self.acknowledgments.push_back(Scripted::Fail(message)),
        }
    }
}

fn next<T>(queue: &mut VecDeque<Scripted<T>>, role: ScriptedRole) -> Result<T, CollaboratorError> {
    match queue.pop_front() {
        Some(Scripted::Answer(answer)) => Ok(answer),
        Some(Scripted::Fail(message)) => Err(AIError::unavailable(message).into()),
        None => Err(CollaboratorError::Exhausted {
            collaborator: role.name(),
        }),
    }
}

/// Test double implementing every reasoning port from scripted answers.
///
/// Clones share the same script and call log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedReasoner {
    script: Arc<Mutex<Script>>,
}

impl ScriptedReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn classify_as(self, classification: TurnClassification) -> Self {
        self.script()
            .classifications
            .push_back(Scripted::Answer(classification));
        self
    }

    pub fn assess_as(self, assessment: RelevanceAssessment) -> Self {
        self.script().assessments.push_back(Scripted::Answer(assessment));
        self
    }

    pub fn extract_as(self, partial: CharacterProfile) -> Self {
        self.script().extractions.push_back(Scripted::Answer(partial));
        self
    }

    pub fn reflect_as(self, feedback: ReflectionFeedback) -> Self {
        self.script().reflections.push_back(Scripted::Answer(feedback));
        self
    }

    pub fn clarify_with(self, message: impl Into<String>) -> Self {
        self.script()
            .clarifications
            .push_back(Scripted::Answer(message.into()));
        self
    }

    pub fn redirect_with(self, message: impl Into<String>) -> Self {
        self.script().redirects.push_back(Scripted::Answer(message.into()));
        self
    }

    pub fn acknowledge_with(self, message: impl Into<String>) -> Self {
        self.script()
            .acknowledgments
            .push_back(Scripted::Answer(message.into()));
        self
    }

    /// Queues a provider failure for the next call of `role`.
    pub fn fail(self, role: ScriptedRole, message: impl Into<String>) -> Self {
        self.script().fail(role, message.into());
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<ReasonerCall> {
        self.script().calls.clone()
    }

    /// Number of calls made to one role.
    pub fn count(&self, role: ScriptedRole) -> usize {
        self.script().calls.iter().filter(|c| c.role() == role).count()
    }

    /// Roles called so far, in order.
    pub fn roles(&self) -> Vec<ScriptedRole> {
        self.script().calls.iter().map(ReasonerCall::role).collect()
    }
}

#[async_trait]
impl RelatednessClassifier for ScriptedReasoner {
    async fn classify(
        &self,
        _ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<TurnClassification, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Classify {
            turn: turn.to_string(),
        });
        next(&mut script.classifications, ScriptedRole::Classifier)
    }
}

#[async_trait]
impl RelevanceAssessor for ScriptedReasoner {
    async fn assess(
        &self,
        _ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<RelevanceAssessment, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Assess {
            turn: turn.to_string(),
        });
        next(&mut script.assessments, ScriptedRole::Assessor)
    }
}

#[async_trait]
impl FieldExtractor for ScriptedReasoner {
    async fn extract(
        &self,
        _ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<CharacterProfile, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Extract {
            turn: turn.to_string(),
        });
        next(&mut script.extractions, ScriptedRole::Extractor)
    }
}

#[async_trait]
impl ConsistencyReflector for ScriptedReasoner {
    async fn reflect(
        &self,
        _ctx: &ReasoningContext,
        turn: &str,
        profile: &CharacterProfile,
    ) -> Result<ReflectionFeedback, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Reflect {
            turn: turn.to_string(),
            profile: profile.clone(),
        });
        next(&mut script.reflections, ScriptedRole::Reflector)
    }
}

#[async_trait]
impl ClarificationGenerator for ScriptedReasoner {
    async fn clarify(
        &self,
        _ctx: &ReasoningContext,
        request: &ClarificationRequest,
    ) -> Result<String, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Clarify {
            request: request.clone(),
        });
        next(&mut script.clarifications, ScriptedRole::Clarifier)
    }
}

#[async_trait]
impl OffTopicRedirector for ScriptedReasoner {
    async fn redirect(
        &self,
        _ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<String, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Redirect {
            turn: turn.to_string(),
        });
        next(&mut script.redirects, ScriptedRole::Redirector)
    }
}

#[async_trait]
impl AcknowledgmentGenerator for ScriptedReasoner {
    async fn acknowledge(
        &self,
        _ctx: &ReasoningContext,
        confirmed: &BTreeMap<Attribute, AttributeValue>,
        character: &FinalizedCharacter,
    ) -> Result<String, CollaboratorError> {
        let mut script = self.script();
        script.calls.push(ReasonerCall::Acknowledge {
            confirmed: confirmed.clone(),
            character: character.clone(),
        });
        next(&mut script.acknowledgments, ScriptedRole::Acknowledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ConversationId;

    fn ctx() -> ReasoningContext {
        ReasoningContext::new(ConversationId::new(), "t")
    }

    #[tokio::test]
    async fn answers_in_order_and_records_calls() {
        let reasoner = ScriptedReasoner::new()
            .classify_as(TurnClassification::related())
            .classify_as(TurnClassification::unrelated());

        assert!(reasoner.classify(&ctx(), "one").await.unwrap().related_to_attributes);
        assert!(!reasoner.classify(&ctx(), "two").await.unwrap().related_to_attributes);
        assert_eq!(reasoner.count(ScriptedRole::Classifier), 2);
        assert_eq!(
            reasoner.calls()[1],
            ReasonerCall::Classify {
                turn: "two".to_string()
            }
        );
    }

    #[tokio::test]
    async fn empty_queue_is_exhausted() {
        let reasoner = ScriptedReasoner::new();
        let err = reasoner.extract(&ctx(), "x").await.unwrap_err();
        assert!(matches!(
            err,
            CollaboratorError::Exhausted {
                collaborator: "field_extractor"
            }
        ));
        assert_eq!(reasoner.count(ScriptedRole::Extractor), 1);
    }

    #[tokio::test]
    async fn scripted_failure_is_a_provider_error() {
        let reasoner = ScriptedReasoner::new().fail(ScriptedRole::Redirector, "down");
        let err = reasoner.redirect(&ctx(), "x").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Provider(AIError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn clones_share_the_script() {
        let reasoner = ScriptedReasoner::new().redirect_with("Tell me a name!");
        let clone = reasoner.clone();

        clone.redirect(&ctx(), "x").await.unwrap();

        assert_eq!(reasoner.roles(), vec![ScriptedRole::Redirector]);
    }
}
