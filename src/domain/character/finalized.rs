//! Finalized character snapshot handed to persistence.

use serde::{Deserialize, Serialize};

use super::CharacterProfile;
use crate::domain::foundation::Timestamp;

/// Complete record of a character at commit time.
///
/// Unlike [`CharacterProfile`], all seven attributes are always serialized,
/// unset ones as explicit `null`, so downstream consumers see the full shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedCharacter {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub physical_appearance: Option<String>,
    pub personality: Option<String>,
    pub abilities_power: Option<String>,
    pub occupation: Option<String>,
    #[serde(skip)]
    finalized_at: Timestamp,
}

impl FinalizedCharacter {
    /// Snapshots a profile.
    pub fn snapshot(profile: &CharacterProfile) -> Self {
        let profile = profile.clone();
        Self {
            name: profile.name,
            age: profile.age,
            gender: profile.gender,
            physical_appearance: profile.physical_appearance,
            personality: profile.personality,
            abilities_power: profile.abilities_power,
            occupation: profile.occupation,
            finalized_at: Timestamp::now(),
        }
    }

    /// When the snapshot was taken.
    pub fn finalized_at(&self) -> Timestamp {
        self.finalized_at
    }

    /// Converts back to a profile.
    pub fn to_profile(&self) -> CharacterProfile {
        CharacterProfile {
            name: self.name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            physical_appearance: self.physical_appearance.clone(),
            personality: self.personality.clone(),
            abilities_power: self.abilities_power.clone(),
            occupation: self.occupation.clone(),
        }
    }
}
