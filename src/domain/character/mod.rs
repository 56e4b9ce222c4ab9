//! Character module - the entity being built and its per-turn assessments.
//!
//! Pure data plus invariants: no collaborator or storage knowledge.

mod assessment;
mod attribute;
mod finalized;
mod profile;
mod reflection;

pub use assessment::{InputType, RelevanceAssessment, TurnClassification};
pub use attribute::{Attribute, AttributeValue};
pub use finalized::FinalizedCharacter;
pub use profile::CharacterProfile;
pub use reflection::ReflectionFeedback;
