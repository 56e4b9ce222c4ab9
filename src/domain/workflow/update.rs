//! Partial state updates and the reducer that applies them.

use super::{ClarificationRequest, ConversationState, PersistenceStatus, Turn};
use crate::domain::character::{
    CharacterProfile, FinalizedCharacter, ReflectionFeedback, RelevanceAssessment,
    TurnClassification,
};
use crate::domain::foundation::Timestamp;

/// A partial update returned by a workflow step.
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// Clears the per-turn fields at the start of an invocation.
    BeginTurn,
    Classified(TurnClassification),
    Assessed(RelevanceAssessment),
    /// Extractor output, merged attribute by attribute.
    Extracted(CharacterProfile),
    /// Replaces the profile wholesale.
    ProfileRestored(CharacterProfile),
    Reflected(ReflectionFeedback),
    CorrectionPassStarted,
    ClarificationPending(ClarificationRequest),
    Finalized(FinalizedCharacter),
    TurnAppended(Turn),
    PersistenceRecorded(PersistenceStatus),
}

impl ConversationState {
    /// Applies one update.
    ///
    /// Turns append, extraction merges, restore replaces, correction passes
    /// increment, and every other key overwrites.
    pub fn apply(mut self, update: StateUpdate) -> Self {
        match update {
            StateUpdate::BeginTurn => {
                self.classification = None;
                self.relevance = None;
                self.reflection = None;
                self.correction_passes = 0;
                self.pending_clarification = None;
                self.finalized = None;
            }
            StateUpdate::Classified(classification) => {
                self.classification = Some(classification);
            }
            StateUpdate::Assessed(assessment) => {
                self.relevance = Some(assessment);
            }
            StateUpdate::Extracted(partial) => {
                self.profile.merge(&partial);
            }
            StateUpdate::ProfileRestored(profile) => {
                self.profile = profile;
            }
            StateUpdate::Reflected(feedback) => {
                self.reflection = Some(feedback);
            }
            StateUpdate::CorrectionPassStarted => {
                self.correction_passes += 1;
            }
            StateUpdate::ClarificationPending(request) => {
                self.pending_clarification = Some(request);
            }
            StateUpdate::Finalized(snapshot) => {
                self.finalized = Some(snapshot);
            }
            StateUpdate::TurnAppended(turn) => {
                self.turns.push(turn);
            }
            StateUpdate::PersistenceRecorded(status) => {
                self.persistence = status;
            }
        }
        self.updated_at = Timestamp::now();
        self
    }

    /// Applies updates in order.
    pub fn apply_all(self, updates: impl IntoIterator<Item = StateUpdate>) -> Self {
        updates.into_iter().fold(self, ConversationState::apply)
    }
}
