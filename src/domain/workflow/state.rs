//! Conversation state carried across invocations of the workflow.

use serde::{Deserialize, Serialize};

use crate::domain::character::{
    Attribute, CharacterProfile, FinalizedCharacter, InputType, ReflectionFeedback,
    RelevanceAssessment, TurnClassification,
};
use crate::domain::foundation::{CharacterRecordId, ConversationId, Timestamp};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    pub created_at: Timestamp,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// Outcome of the last hand-off to the persistence sink.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PersistenceStatus {
    #[default]
    NotAttempted,
    Persisted { record_id: CharacterRecordId },
    Failed { reason: String },
}

impl PersistenceStatus {
    pub fn is_persisted(&self) -> bool {
        matches!(self, PersistenceStatus::Persisted { .. })
    }
}

/// What the clarification step should ask the user about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationRequest {
    pub input_type: InputType,
    pub reasoning: String,
}

impl ClarificationRequest {
    pub fn new(input_type: InputType, reasoning: impl Into<String>) -> Self {
        Self {
            input_type,
            reasoning: reasoning.into(),
        }
    }

    /// Clarification for a turn the relevance assessor did not accept.
    pub fn from_assessment(assessment: &RelevanceAssessment) -> Self {
        Self::new(assessment.input_type, assessment.reasoning.clone())
    }

    /// Clarification for reflection feedback that could not be settled.
    ///
    /// Flags make the request `misleading`; anything else is `ambiguous`.
    pub fn from_unresolved_feedback(feedback: &ReflectionFeedback) -> Self {
        let input_type = if feedback.flags.is_empty() {
            InputType::Ambiguous
        } else {
            InputType::Misleading
        };

        let mut reasoning = feedback.correctness_summary.trim().to_string();
        let unresolved = feedback.unresolved_attributes();
        if !unresolved.is_empty() {
            let names: Vec<&str> = unresolved.iter().map(Attribute::as_str).collect();
            push_sentence(
                &mut reasoning,
                &format!("Attributes needing clarification: {}.", names.join(", ")),
            );
        }
        if !feedback.flags.is_empty() {
            push_sentence(&mut reasoning, &format!("Issues: {}.", feedback.flags.join("; ")));
        }

        Self::new(input_type, reasoning)
    }
}

fn push_sentence(buffer: &mut String, sentence: &str) {
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(sentence);
}

/// Full state of one character-building conversation.
///
/// Fields below `profile` are per-turn and are cleared when a new
/// invocation begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub id: ConversationId,
    pub turns: Vec<Turn>,
    pub profile: CharacterProfile,
    pub classification: Option<TurnClassification>,
    pub relevance: Option<RelevanceAssessment>,
    pub reflection: Option<ReflectionFeedback>,
    pub correction_passes: u32,
    pub pending_clarification: Option<ClarificationRequest>,
    pub finalized: Option<FinalizedCharacter>,
    pub persistence: PersistenceStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ConversationState {
    /// Creates an empty conversation.
    pub fn new() -> Self {
        Self::with_id(ConversationId::new())
    }

    /// Creates an empty conversation with a known id.
    pub fn with_id(id: ConversationId) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            turns: Vec::new(),
            profile: CharacterProfile::new(),
            classification: None,
            relevance: None,
            reflection: None,
            correction_passes: 0,
            pending_clarification: None,
            finalized: None,
            persistence: PersistenceStatus::NotAttempted,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a user turn; the caller does this before each invocation.
    pub fn push_user_turn(&mut self, content: impl Into<String>) {
        self.turns.push(Turn::user(content));
        self.updated_at = Timestamp::now();
    }

    pub fn latest_turn(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Content of the latest turn, if it is a user turn still awaiting a reply.
    pub fn pending_user_text(&self) -> Option<&str> {
        self.latest_turn()
            .filter(|t| t.role == TurnRole::User)
            .map(|t| t.content.as_str())
    }

    pub fn is_persisted(&self) -> bool {
        self.persistence.is_persisted()
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_state_is_empty_and_unpersisted() {
        let state = ConversationState::new();
        assert!(state.turns.is_empty());
        assert!(state.profile.is_empty());
        assert_eq!(state.persistence, PersistenceStatus::NotAttempted);
    }

    #[test]
    fn answered_user_turn_is_not_pending() {
        let mut state = ConversationState::new();
        state.push_user_turn("Her name is Mira.");
        assert_eq!(state.pending_user_text(), Some("Her name is Mira."));

        state.turns.push(Turn::assistant("Lovely name!"));
        assert_eq!(state.pending_user_text(), None);
        assert_eq!(state.latest_turn().map(|t| t.role), Some(TurnRole::Assistant));
    }

    #[test]
    fn persistence_status_serializes_tagged() {
        let status = PersistenceStatus::Persisted {
            record_id: CharacterRecordId::new(3),
        };
        assert_eq!(
            serde_json::to_value(&status).unwrap(),
            json!({ "status": "persisted", "record_id": 3 })
        );
    }

    #[test]
    fn clarification_from_assessment_copies_type_and_reasoning() {
        let assessment =
            RelevanceAssessment::new(InputType::Misleading, "strong yet powerless");
        let request = ClarificationRequest::from_assessment(&assessment);

        assert_eq!(request.input_type, InputType::Misleading);
        assert_eq!(request.reasoning, "strong yet powerless");
    }

    #[test]
    fn clarification_from_feedback_names_unresolved_attributes() {
        let mut feedback = ReflectionFeedback {
            correctness_summary: "Age is uncertain.".to_string(),
            ..Default::default()
        };
        feedback.suggested_corrections.insert(Attribute::Age, json!(28));

        let request = ClarificationRequest::from_unresolved_feedback(&feedback);

        assert_eq!(request.input_type, InputType::Ambiguous);
        assert_eq!(
            request.reasoning,
            "Age is uncertain. Attributes needing clarification: age."
        );
    }

    #[test]
    fn clarification_from_flagged_feedback_is_misleading() {
        let feedback = ReflectionFeedback {
            flags: vec!["name contradicts gender".to_string()],
            ..Default::default()
        };

        let request = ClarificationRequest::from_unresolved_feedback(&feedback);

        assert_eq!(request.input_type, InputType::Misleading);
        assert_eq!(request.reasoning, "Issues: name contradicts gender.");
    }

    #[test]
    fn state_roundtrips_through_json() {
        let mut state = ConversationState::new();
        state.push_user_turn("He is 3 years old.");
        state.profile.age = Some(3);

        let json = serde_json::to_string(&state).unwrap();
        let restored: ConversationState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, state);
    }
}
