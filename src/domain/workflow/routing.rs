//! Routing decisions at the three branch points of the graph.

use serde::{Deserialize, Serialize};

use super::{ClarificationRequest, WorkflowStep};
use crate::domain::character::{
    InputType, ReflectionFeedback, RelevanceAssessment, TurnClassification,
};

/// Which feedback lists block finalization after reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectionGate {
    /// Only suggested corrections block; flags and questions are advisory.
    #[default]
    CorrectionsOnly,
    /// Flags and ask-user entries also block, routing to clarification.
    Strict,
}

/// Limits and policy for the extraction/reflection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrectionPolicy {
    /// Loop-backs allowed per invocation before asking the user.
    pub max_correction_passes: u32,
    pub gate: ReflectionGate,
}

impl CorrectionPolicy {
    pub const DEFAULT_MAX_CORRECTION_PASSES: u32 = 2;

    pub fn new(max_correction_passes: u32, gate: ReflectionGate) -> Self {
        Self {
            max_correction_passes,
            gate,
        }
    }
}

impl Default for CorrectionPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_CORRECTION_PASSES, ReflectionGate::default())
    }
}

/// Route out of the entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryRoute {
    AssessRelevance,
    RedirectOffTopic,
}

impl EntryRoute {
    pub fn decide(classification: &TurnClassification) -> Self {
        if classification.related_to_attributes {
            EntryRoute::AssessRelevance
        } else {
            EntryRoute::RedirectOffTopic
        }
    }

    pub fn step(&self) -> WorkflowStep {
        match self {
            EntryRoute::AssessRelevance => WorkflowStep::AssessRelevance,
            EntryRoute::RedirectOffTopic => WorkflowStep::RedirectOffTopic,
        }
    }
}

/// Route out of relevance assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelevanceRoute {
    ExtractFields,
    RequestClarification(ClarificationRequest),
}

impl RelevanceRoute {
    pub fn decide(assessment: &RelevanceAssessment) -> Self {
        if assessment.is_stable() {
            RelevanceRoute::ExtractFields
        } else {
            RelevanceRoute::RequestClarification(ClarificationRequest::from_assessment(assessment))
        }
    }

    pub fn step(&self) -> WorkflowStep {
        match self {
            RelevanceRoute::ExtractFields => WorkflowStep::ExtractFields,
            RelevanceRoute::RequestClarification(_) => WorkflowStep::RequestClarification,
        }
    }
}

/// Route out of reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionRoute {
    /// Commit the profile.
    Finalize,
    /// Run extraction again on the same turn.
    ReExtract,
    /// Stop and ask the user; the profile must be rolled back.
    RequestClarification(ClarificationRequest),
}

impl ReflectionRoute {
    /// Decides the next hop given the feedback and the loop-backs already taken.
    ///
    /// Suggested corrections are never applied here; they only trigger another
    /// extraction, or clarification once the pass budget is spent.
    pub fn decide(
        feedback: &ReflectionFeedback,
        passes_taken: u32,
        policy: &CorrectionPolicy,
    ) -> Self {
        if feedback.has_corrections() {
            if passes_taken < policy.max_correction_passes {
                return ReflectionRoute::ReExtract;
            }
            let mut request = ClarificationRequest::from_unresolved_feedback(feedback);
            request.input_type = InputType::Ambiguous;
            return ReflectionRoute::RequestClarification(request);
        }

        let blocked_by_strict_gate = policy.gate == ReflectionGate::Strict
            && !(feedback.flags.is_empty() && feedback.ask_user_about.is_empty());
        if blocked_by_strict_gate {
            return ReflectionRoute::RequestClarification(
                ClarificationRequest::from_unresolved_feedback(feedback),
            );
        }

        ReflectionRoute::Finalize
    }

    pub fn step(&self) -> WorkflowStep {
        match self {
            ReflectionRoute::Finalize => WorkflowStep::SetCharacterFields,
            ReflectionRoute::ReExtract => WorkflowStep::ExtractFields,
            ReflectionRoute::RequestClarification(_) => WorkflowStep::RequestClarification,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::character::Attribute;
    use crate::domain::foundation::StateMachine;
    use serde_json::json;

    fn correcting_age() -> ReflectionFeedback {
        let mut feedback = ReflectionFeedback::default();
        feedback.suggested_corrections.insert(Attribute::Age, json!(28));
        feedback
    }

    fn flagged() -> ReflectionFeedback {
        ReflectionFeedback {
            flags: vec!["gender contradicts description".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn entry_route_follows_classification() {
        assert_eq!(
            EntryRoute::decide(&TurnClassification::related()),
            EntryRoute::AssessRelevance
        );
        assert_eq!(
            EntryRoute::decide(&TurnClassification::unrelated()),
            EntryRoute::RedirectOffTopic
        );
    }

    #[test]
    fn only_stable_turns_reach_extraction() {
        let stable = RelevanceAssessment::new(InputType::Stable, "clear");
        assert_eq!(RelevanceRoute::decide(&stable), RelevanceRoute::ExtractFields);

        let misleading = RelevanceAssessment::new(InputType::Misleading, "strong but powerless");
        match RelevanceRoute::decide(&misleading) {
            RelevanceRoute::RequestClarification(request) => {
                assert_eq!(request.input_type, InputType::Misleading);
                assert_eq!(request.reasoning, "strong but powerless");
            }
            other => panic!("expected clarification, got {other:?}"),
        }
    }

    #[test]
    fn corrections_loop_back_while_budget_remains() {
        let policy = CorrectionPolicy::default();
        assert_eq!(
            ReflectionRoute::decide(&correcting_age(), 0, &policy),
            ReflectionRoute::ReExtract
        );
        assert_eq!(
            ReflectionRoute::decide(&correcting_age(), 1, &policy),
            ReflectionRoute::ReExtract
        );
    }

    #[test]
    fn spent_budget_asks_the_user() {
        let policy = CorrectionPolicy::default();
        match ReflectionRoute::decide(&correcting_age(), 2, &policy) {
            ReflectionRoute::RequestClarification(request) => {
                assert_eq!(request.input_type, InputType::Ambiguous);
                assert!(request.reasoning.contains("age"));
            }
            other => panic!("expected clarification, got {other:?}"),
        }
    }

    #[test]
    fn spent_budget_is_ambiguous_even_with_flags() {
        let mut feedback = correcting_age();
        feedback.flags.push("inconsistent".to_string());

        let route = ReflectionRoute::decide(&feedback, 0, &CorrectionPolicy::new(0, ReflectionGate::Strict));

        match route {
            ReflectionRoute::RequestClarification(request) => {
                assert_eq!(request.input_type, InputType::Ambiguous)
            }
            other => panic!("expected clarification, got {other:?}"),
        }
    }

    #[test]
    fn flags_are_advisory_under_default_gate() {
        assert_eq!(
            ReflectionRoute::decide(&flagged(), 0, &CorrectionPolicy::default()),
            ReflectionRoute::Finalize
        );
    }

    #[test]
    fn strict_gate_blocks_on_flags_and_questions() {
        let strict = CorrectionPolicy::new(2, ReflectionGate::Strict);

        match ReflectionRoute::decide(&flagged(), 0, &strict) {
            ReflectionRoute::RequestClarification(request) => {
                assert_eq!(request.input_type, InputType::Misleading)
            }
            other => panic!("expected clarification, got {other:?}"),
        }

        let asking = ReflectionFeedback {
            ask_user_about: vec![Attribute::Occupation],
            ..Default::default()
        };
        match ReflectionRoute::decide(&asking, 0, &strict) {
            ReflectionRoute::RequestClarification(request) => {
                assert_eq!(request.input_type, InputType::Ambiguous);
                assert!(request.reasoning.contains("occupation"));
            }
            other => panic!("expected clarification, got {other:?}"),
        }
    }

    #[test]
    fn clean_feedback_finalizes_under_both_gates() {
        let clean = ReflectionFeedback::confirming([Attribute::Name]);
        for gate in [ReflectionGate::CorrectionsOnly, ReflectionGate::Strict] {
            assert_eq!(
                ReflectionRoute::decide(&clean, 0, &CorrectionPolicy::new(2, gate)),
                ReflectionRoute::Finalize
            );
        }
    }

    #[test]
    fn route_steps_are_legal_graph_edges() {
        assert!(WorkflowStep::ClassifyTurn.can_transition_to(&EntryRoute::RedirectOffTopic.step()));
        assert!(WorkflowStep::AssessRelevance.can_transition_to(&RelevanceRoute::ExtractFields.step()));
        for route in [
            ReflectionRoute::Finalize,
            ReflectionRoute::ReExtract,
            ReflectionRoute::RequestClarification(ClarificationRequest::new(
                InputType::Ambiguous,
                "",
            )),
        ] {
            assert!(WorkflowStep::ReflectOnExtraction.can_transition_to(&route.step()));
        }
    }

    #[test]
    fn gate_deserializes_from_snake_case() {
        let gate: ReflectionGate = serde_json::from_str("\"corrections_only\"").unwrap();
        assert_eq!(gate, ReflectionGate::CorrectionsOnly);
    }
}
