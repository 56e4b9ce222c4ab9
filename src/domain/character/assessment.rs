//! Per-turn assessment records produced by the router collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the latest turn carries attribute values at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnClassification {
    pub related_to_attributes: bool,
}

impl TurnClassification {
    pub fn related() -> Self {
        Self {
            related_to_attributes: true,
        }
    }

    pub fn unrelated() -> Self {
        Self {
            related_to_attributes: false,
        }
    }
}

/// Nature of an attribute-related turn.
///
/// - `Stable`: at least one mentioned attribute is clear and consistent.
/// - `Ambiguous`: nothing concrete is mentioned, or detail is lacking.
/// - `Misleading`: a mentioned attribute contradicts itself within the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Stable,
    Ambiguous,
    Misleading,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::Stable => "stable",
            InputType::Ambiguous => "ambiguous",
            InputType::Misleading => "misleading",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relevance assessment of the latest turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceAssessment {
    pub input_type: InputType,
    pub reasoning: String,
}

impl RelevanceAssessment {
    pub fn new(input_type: InputType, reasoning: impl Into<String>) -> Self {
        Self {
            input_type,
            reasoning: reasoning.into(),
        }
    }

    /// Returns true if the turn can go straight to extraction.
    pub fn is_stable(&self) -> bool {
        self.input_type == InputType::Stable
    }
}
