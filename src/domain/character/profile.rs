//! Character profile - the record completed turn by turn.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Attribute, AttributeValue};
use crate::domain::foundation::ValidationError;

/// A possibly incomplete character profile.
///
/// Unknown attributes are `None`; a present attribute always holds a real
/// value. The same type carries the extractor's partial output, where `None`
/// means "not mentioned or not confidently inferable".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_appearance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abilities_power: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
}

impl CharacterProfile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value of one attribute, if set.
    pub fn get(&self, attribute: Attribute) -> Option<AttributeValue> {
        match attribute {
            Attribute::Age => self.age.map(AttributeValue::Integer),
            other => self.text(other).map(|s| AttributeValue::Text(s.to_string())),
        }
    }

    fn text(&self, attribute: Attribute) -> Option<&str> {
        match attribute {
            Attribute::Name => self.name.as_deref(),
            Attribute::Gender => self.gender.as_deref(),
            Attribute::PhysicalAppearance => self.physical_appearance.as_deref(),
            Attribute::Personality => self.personality.as_deref(),
            Attribute::AbilitiesPower => self.abilities_power.as_deref(),
            Attribute::Occupation => self.occupation.as_deref(),
            Attribute::Age => None,
        }
    }

    fn text_slot(&mut self, attribute: Attribute) -> Option<&mut Option<String>> {
        match attribute {
            Attribute::Name => Some(&mut self.name),
            Attribute::Gender => Some(&mut self.gender),
            Attribute::PhysicalAppearance => Some(&mut self.physical_appearance),
            Attribute::Personality => Some(&mut self.personality),
            Attribute::AbilitiesPower => Some(&mut self.abilities_power),
            Attribute::Occupation => Some(&mut self.occupation),
            Attribute::Age => None,
        }
    }

    /// Returns true if the attribute holds a value.
    pub fn is_set(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Age => self.age.is_some(),
            other => self.text(other).is_some(),
        }
    }

    /// Attributes that hold a value, in canonical order.
    pub fn set_attributes(&self) -> Vec<Attribute> {
        Attribute::ALL.into_iter().filter(|a| self.is_set(*a)).collect()
    }

    /// Attributes still unknown, in canonical order.
    pub fn missing_attributes(&self) -> Vec<Attribute> {
        Attribute::ALL.into_iter().filter(|a| !self.is_set(*a)).collect()
    }

    /// Returns true if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.set_attributes().is_empty()
    }

    /// Returns true if every attribute is set.
    pub fn is_complete(&self) -> bool {
        self.missing_attributes().is_empty()
    }

    /// Values of the requested attributes that are currently set.
    pub fn subset(&self, attributes: &[Attribute]) -> BTreeMap<Attribute, AttributeValue> {
        attributes
            .iter()
            .filter_map(|a| self.get(*a).map(|v| (*a, v)))
            .collect()
    }

    /// Merges an extracted partial profile into this one.
    ///
    /// Every attribute present in `partial` overwrites the current value;
    /// attributes absent from `partial` are left untouched. Returns the
    /// attributes whose value changed.
    pub fn merge(&mut self, partial: &CharacterProfile) -> Vec<Attribute> {
        let mut changed = Vec::new();

        if let Some(age) = partial.age {
            if self.age != Some(age) {
                self.age = Some(age);
                changed.push(Attribute::Age);
            }
        }

        for attribute in Attribute::ALL.into_iter().filter(|a| !a.is_numeric()) {
            let Some(incoming) = partial.text(attribute).map(str::to_string) else {
                continue;
            };
            if let Some(slot) = self.text_slot(attribute) {
                if slot.as_deref() != Some(incoming.as_str()) {
                    *slot = Some(incoming);
                    changed.push(attribute);
                }
            }
        }

        changed.sort();
        changed
    }

    /// Drops blank text values so that "present" always means "has content".
    pub fn normalized(mut self) -> Self {
        for attribute in Attribute::ALL.into_iter().filter(|a| !a.is_numeric()) {
            if let Some(slot) = self.text_slot(attribute) {
                let trimmed = slot.as_deref().map(str::trim).filter(|s| !s.is_empty());
                *slot = trimmed.map(str::to_string);
            }
        }
        self
    }

    /// Checks the profile invariants: non-negative age, no blank text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(age) = self.age {
            if age < 0 {
                return Err(ValidationError::out_of_range(
                    Attribute::Age.as_str(),
                    0,
                    i32::MAX as i64,
                    age as i64,
                ));
            }
        }

        for attribute in Attribute::ALL.into_iter().filter(|a| !a.is_numeric()) {
            if let Some(value) = self.text(attribute) {
                if value.trim().is_empty() {
                    return Err(ValidationError::empty_field(attribute.as_str()));
                }
            }
        }

        Ok(())
    }
}
