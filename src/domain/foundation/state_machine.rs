//! State machine trait for closed step/status enums.
//!
//! The workflow graph declares its edges through this trait, so every hop the
//! engine takes can be checked against the declared graph.

use super::ValidationError;

/// Trait for enums whose values form a directed transition graph.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for WorkflowStep {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         self.valid_transitions().contains(target)
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             ExtractFields => vec![ReflectOnExtraction],
///             // ... etc
///         }
///     }
/// }
///
/// let next = WorkflowStep::ExtractFields.transition_to(WorkflowStep::ReflectOnExtraction)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
