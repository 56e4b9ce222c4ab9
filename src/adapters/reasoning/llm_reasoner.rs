//! LLM-backed implementation of every reasoning collaborator.
//!
//! One `LlmCharacterReasoner` plays all seven roles over a single
//! [`AIProvider`]. Structured roles request JSON and decode it leniently;
//! free-text roles return the trimmed completion.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::prompts;
use super::structured::parse_structured;
use crate::domain::character::{
    Attribute, AttributeValue, CharacterProfile, FinalizedCharacter, InputType,
    ReflectionFeedback, RelevanceAssessment, TurnClassification,
};
use crate::domain::workflow::ClarificationRequest;
use crate::ports::{
    AIProvider, AcknowledgmentGenerator, ClarificationGenerator, CollaboratorError,
    CompletionRequest, ConsistencyReflector, FieldExtractor, MessageRole, OffTopicRedirector,
    ReasoningContext, RelatednessClassifier, RelevanceAssessor, RequestMetadata,
};

/// Model and sampling settings for the reasoner.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmReasonerConfig {
    /// Model for the relatedness and relevance checks; `None` uses the provider default.
    pub classifier_model: Option<String>,
    /// Temperature for structured and acknowledgment calls.
    pub temperature: f32,
    /// Temperature for clarification and redirect messages.
    pub clarification_temperature: f32,
    /// Cap on generated tokens per call.
    pub max_tokens: Option<u32>,
}

impl Default for LlmReasonerConfig {
    fn default() -> Self {
        Self {
            classifier_model: Some("gpt-4o-mini".to_string()),
            temperature: 0.0,
            clarification_temperature: 0.5,
            max_tokens: Some(1024),
        }
    }
}

/// Reasoning collaborators backed by a chat-completion provider.
pub struct LlmCharacterReasoner {
    provider: Arc<dyn AIProvider>,
    config: LlmReasonerConfig,
}

/// One call to the provider.
struct Prompt<'a> {
    collaborator: &'static str,
    system: String,
    user: Option<String>,
    model: Option<&'a str>,
    temperature: f32,
    json: bool,
}

impl LlmCharacterReasoner {
    pub fn new(provider: Arc<dyn AIProvider>, config: LlmReasonerConfig) -> Self {
        Self { provider, config }
    }

    async fn ask(&self, ctx: &ReasoningContext, prompt: Prompt<'_>) -> Result<String, CollaboratorError> {
        let mut request = CompletionRequest::new(RequestMetadata::new(
            ctx.conversation_id,
            ctx.trace_id.clone(),
        ))
        .with_system_prompt(prompt.system)
        .with_temperature(prompt.temperature);

        if let Some(user) = prompt.user {
            request = request.with_message(MessageRole::User, user);
        }
        if let Some(model) = prompt.model {
            request = request.with_model(model);
        }
        if let Some(max) = self.config.max_tokens {
            request = request.with_max_tokens(max);
        }
        if prompt.json {
            request = request.expecting_json();
        }

        let response = self.provider.complete(request).await?;

        tracing::debug!(
            collaborator = prompt.collaborator,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "collaborator answered"
        );

        Ok(response.content)
    }

    async fn ask_text(&self, ctx: &ReasoningContext, prompt: Prompt<'_>) -> Result<String, CollaboratorError> {
        let collaborator = prompt.collaborator;
        let content = self.ask(ctx, prompt).await?;
        let message = content.trim();
        if message.is_empty() {
            return Err(CollaboratorError::invalid_output(collaborator, "empty message"));
        }
        Ok(message.to_string())
    }

    fn structured<'a>(
        &'a self,
        collaborator: &'static str,
        system: String,
        user: String,
        model: Option<&'a str>,
    ) -> Prompt<'a> {
        Prompt {
            collaborator,
            system,
            user: Some(user),
            model,
            temperature: self.config.temperature,
            json: true,
        }
    }
}

// ----- Wire shapes -----

#[derive(Debug, Deserialize)]
struct ClassifierAnswer {
    #[serde(alias = "related_with_fields")]
    related_to_attributes: bool,
}

#[derive(Debug, Deserialize)]
struct AssessorAnswer {
    input_type: String,
    #[serde(default)]
    reasoning: String,
}

#[derive(Debug, Deserialize)]
struct ExtractorAnswer {
    name: Option<String>,
    age: Option<serde_json::Value>,
    gender: Option<String>,
    physical_appearance: Option<String>,
    personality: Option<String>,
    abilities_power: Option<String>,
    occupation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReflectorAnswer {
    correctness_summary: String,
    flags: Vec<String>,
    notes: Vec<String>,
    confirmations: Vec<String>,
    suggested_corrections: BTreeMap<String, serde_json::Value>,
    ask_user_about: Vec<String>,
}

fn parse_input_type(raw: &str) -> Option<InputType> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "stable" => Some(InputType::Stable),
        "ambiguous" => Some(InputType::Ambiguous),
        "misleading" => Some(InputType::Misleading),
        _ => None,
    }
}

fn parse_age(value: serde_json::Value) -> Result<Option<i32>, CollaboratorError> {
    let invalid = |v: &serde_json::Value| {
        CollaboratorError::invalid_output("field_extractor", format!("age {} is not an integer", v))
    };
    match &value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Number(n) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| invalid(&value)),
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(None),
        serde_json::Value::String(s) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid(&value)),
        _ => Err(invalid(&value)),
    }
}

fn parse_attributes(names: Vec<String>) -> Result<Vec<Attribute>, CollaboratorError> {
    names
        .iter()
        .map(|name| {
            name.parse::<Attribute>().map_err(|e| {
                CollaboratorError::invalid_output("consistency_reflector", e.to_string())
            })
        })
        .collect()
}

impl ExtractorAnswer {
    fn into_profile(self) -> Result<CharacterProfile, CollaboratorError> {
        let age = match self.age {
            Some(value) => parse_age(value)?,
            None => None,
        };
        Ok(CharacterProfile {
            name: self.name,
            age,
            gender: self.gender,
            physical_appearance: self.physical_appearance,
            personality: self.personality,
            abilities_power: self.abilities_power,
            occupation: self.occupation,
        }
        .normalized())
    }
}

impl ReflectorAnswer {
    fn into_feedback(self) -> Result<ReflectionFeedback, CollaboratorError> {
        let suggested_corrections = self
            .suggested_corrections
            .into_iter()
            .map(|(name, value)| {
                name.parse::<Attribute>()
                    .map(|attribute| (attribute, value))
                    .map_err(|e| {
                        CollaboratorError::invalid_output("consistency_reflector", e.to_string())
                    })
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(ReflectionFeedback {
            correctness_summary: self.correctness_summary,
            flags: self.flags,
            notes: self.notes,
            confirmations: parse_attributes(self.confirmations)?,
            suggested_corrections,
            ask_user_about: parse_attributes(self.ask_user_about)?,
        })
    }
}

// ----- Collaborator roles -----

#[async_trait]
impl RelatednessClassifier for LlmCharacterReasoner {
    async fn classify(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<TurnClassification, CollaboratorError> {
        let prompt = self.structured(
            "relatedness_classifier",
            prompts::classifier_system(),
            prompts::classifier_user(turn),
            self.config.classifier_model.as_deref(),
        );
        let raw = self.ask(ctx, prompt).await?;
        let answer: ClassifierAnswer = parse_structured("relatedness_classifier", &raw)?;
        Ok(TurnClassification {
            related_to_attributes: answer.related_to_attributes,
        })
    }
}

#[async_trait]
impl RelevanceAssessor for LlmCharacterReasoner {
    async fn assess(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<RelevanceAssessment, CollaboratorError> {
        let prompt = self.structured(
            "relevance_assessor",
            prompts::assessor_system(),
            prompts::assessor_user(turn),
            self.config.classifier_model.as_deref(),
        );
        let raw = self.ask(ctx, prompt).await?;
        let answer: AssessorAnswer = parse_structured("relevance_assessor", &raw)?;
        let input_type = parse_input_type(&answer.input_type).ok_or_else(|| {
            CollaboratorError::invalid_output(
                "relevance_assessor",
                format!("unknown input_type '{}'", answer.input_type),
            )
        })?;
        Ok(RelevanceAssessment::new(input_type, answer.reasoning))
    }
}

#[async_trait]
impl FieldExtractor for LlmCharacterReasoner {
    async fn extract(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<CharacterProfile, CollaboratorError> {
        let prompt = self.structured(
            "field_extractor",
            prompts::extractor_system(),
            prompts::extractor_user(turn),
            None,
        );
        let raw = self.ask(ctx, prompt).await?;
        let answer: ExtractorAnswer = parse_structured("field_extractor", &raw)?;
        answer.into_profile()
    }
}

#[async_trait]
impl ConsistencyReflector for LlmCharacterReasoner {
    async fn reflect(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
        profile: &CharacterProfile,
    ) -> Result<ReflectionFeedback, CollaboratorError> {
        let extracted = serde_json::to_string(&FinalizedCharacter::snapshot(profile))
            .map_err(|e| CollaboratorError::invalid_output("consistency_reflector", e.to_string()))?;
        let prompt = self.structured(
            "consistency_reflector",
            prompts::REFLECTOR_SYSTEM.to_string(),
            prompts::reflector_user(turn, &extracted),
            None,
        );
        let raw = self.ask(ctx, prompt).await?;
        let answer: ReflectorAnswer = parse_structured("consistency_reflector", &raw)?;
        answer.into_feedback()
    }
}

#[async_trait]
impl ClarificationGenerator for LlmCharacterReasoner {
    async fn clarify(
        &self,
        ctx: &ReasoningContext,
        request: &ClarificationRequest,
    ) -> Result<String, CollaboratorError> {
        let prompt = Prompt {
            collaborator: "clarification_generator",
            system: prompts::CLARIFIER_SYSTEM.to_string(),
            user: Some(prompts::clarifier_user(
                request.input_type.as_str(),
                &request.reasoning,
            )),
            model: None,
            temperature: self.config.clarification_temperature,
            json: false,
        };
        self.ask_text(ctx, prompt).await
    }
}

#[async_trait]
impl OffTopicRedirector for LlmCharacterReasoner {
    async fn redirect(
        &self,
        ctx: &ReasoningContext,
        turn: &str,
    ) -> Result<String, CollaboratorError> {
        let prompt = Prompt {
            collaborator: "off_topic_redirector",
            system: prompts::redirector_system(),
            user: Some(prompts::redirector_user(turn)),
            model: None,
            temperature: self.config.clarification_temperature,
            json: false,
        };
        self.ask_text(ctx, prompt).await
    }
}

#[async_trait]
impl AcknowledgmentGenerator for LlmCharacterReasoner {
    async fn acknowledge(
        &self,
        ctx: &ReasoningContext,
        confirmed: &BTreeMap<Attribute, AttributeValue>,
        character: &FinalizedCharacter,
    ) -> Result<String, CollaboratorError> {
        let to_json = |value: serde_json::Result<String>| {
            value.map_err(|e| {
                CollaboratorError::invalid_output("acknowledgment_generator", e.to_string())
            })
        };
        let confirmed_json = to_json(serde_json::to_string(confirmed))?;
        let character_json = to_json(serde_json::to_string(character))?;

        let prompt = Prompt {
            collaborator: "acknowledgment_generator",
            system: prompts::acknowledger_system(&confirmed_json, &character_json),
            user: None,
            model: None,
            temperature: self.config.temperature,
            json: false,
        };
        self.ask_text(ctx, prompt).await
    }
}
