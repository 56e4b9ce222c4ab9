//! Workflow steps and the graph edges between them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// A named step of the turn-processing graph.
///
/// One invocation starts at `ClassifyTurn` and ends at `End`:
/// - off-topic turns: `ClassifyTurn -> RedirectOffTopic -> End`
/// - unclear turns: `... -> AssessRelevance -> RequestClarification -> End`
/// - stable turns: `... -> ExtractFields <-> ReflectOnExtraction ->
///   SetCharacterFields -> Acknowledge -> Persist -> End`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    ClassifyTurn,
    AssessRelevance,
    RedirectOffTopic,
    RequestClarification,
    ExtractFields,
    ReflectOnExtraction,
    SetCharacterFields,
    Acknowledge,
    Persist,
    End,
}

impl WorkflowStep {
    /// Entry point of every invocation.
    pub const ENTRY: WorkflowStep = WorkflowStep::ClassifyTurn;

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::ClassifyTurn => "classify_turn",
            WorkflowStep::AssessRelevance => "assess_relevance",
            WorkflowStep::RedirectOffTopic => "redirect_off_topic",
            WorkflowStep::RequestClarification => "request_clarification",
            WorkflowStep::ExtractFields => "extract_fields",
            WorkflowStep::ReflectOnExtraction => "reflect_on_extraction",
            WorkflowStep::SetCharacterFields => "set_character_fields",
            WorkflowStep::Acknowledge => "acknowledge",
            WorkflowStep::Persist => "persist",
            WorkflowStep::End => "end",
        }
    }

    /// Steps that call a reasoning collaborator.
    pub fn calls_collaborator(&self) -> bool {
        !matches!(
            self,
            WorkflowStep::SetCharacterFields | WorkflowStep::Persist | WorkflowStep::End
        )
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for WorkflowStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WorkflowStep::*;
        match self {
            ClassifyTurn => vec![AssessRelevance, RedirectOffTopic],
            AssessRelevance => vec![ExtractFields, RequestClarification],
            RedirectOffTopic => vec![End],
            RequestClarification => vec![End],
            ExtractFields => vec![ReflectOnExtraction],
            // Loop back, commit, or give up and ask.
            ReflectOnExtraction => vec![ExtractFields, SetCharacterFields, RequestClarification],
            SetCharacterFields => vec![Acknowledge],
            Acknowledge => vec![Persist],
            Persist => vec![End],
            End => vec![],
        }
    }
}
