//! Workflow policy configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::workflow::{CorrectionPolicy, ReflectionGate};

/// Upper bound on configurable correction passes.
const MAX_CORRECTION_PASSES_LIMIT: u32 = 10;

/// Extraction/reflection loop settings
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Loop-backs allowed per turn before asking the user
    #[serde(default = "default_max_correction_passes")]
    pub max_correction_passes: u32,

    /// Which reflection feedback blocks a commit
    #[serde(default)]
    pub reflection_gate: ReflectionGate,
}

impl WorkflowConfig {
    pub fn policy(&self) -> CorrectionPolicy {
        CorrectionPolicy::new(self.max_correction_passes, self.reflection_gate)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_correction_passes > MAX_CORRECTION_PASSES_LIMIT {
            return Err(ValidationError::TooManyCorrectionPasses(
                MAX_CORRECTION_PASSES_LIMIT,
            ));
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_correction_passes: default_max_correction_passes(),
            reflection_gate: ReflectionGate::default(),
        }
    }
}

fn default_max_correction_passes() -> u32 {
    CorrectionPolicy::DEFAULT_MAX_CORRECTION_PASSES
}
