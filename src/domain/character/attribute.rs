//! Attribute names and values of a character profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// One of the seven attributes a character profile can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Name,
    Age,
    Gender,
    PhysicalAppearance,
    Personality,
    AbilitiesPower,
    Occupation,
}

impl Attribute {
    /// All attributes in canonical order.
    pub const ALL: [Attribute; 7] = [
        Attribute::Name,
        Attribute::Age,
        Attribute::Gender,
        Attribute::PhysicalAppearance,
        Attribute::Personality,
        Attribute::AbilitiesPower,
        Attribute::Occupation,
    ];

    /// Canonical snake_case name, matching the persisted column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Age => "age",
            Attribute::Gender => "gender",
            Attribute::PhysicalAppearance => "physical_appearance",
            Attribute::Personality => "personality",
            Attribute::AbilitiesPower => "abilities_power",
            Attribute::Occupation => "occupation",
        }
    }

    /// Returns true for attributes holding an integer.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Attribute::Age)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::invalid_format("attribute", format!("unknown attribute '{}'", s))
            })
    }
}

/// Value held by a set attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i32),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(n) => write!(f, "{}", n),
            AttributeValue::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_names() {
        for attr in Attribute::ALL {
            assert_eq!(attr.as_str().parse::<Attribute>().unwrap(), attr);
        }
    }

    #[test]
    fn parsing_tolerates_case_and_whitespace() {
        assert_eq!(
            " Abilities_Power ".parse::<Attribute>().unwrap(),
            Attribute::AbilitiesPower
        );
    }

    #[test]
    fn parsing_rejects_unknown_names() {
        assert!("favorite_color".parse::<Attribute>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&Attribute::PhysicalAppearance).unwrap();
        assert_eq!(json, "\"physical_appearance\"");
    }

    #[test]
    fn only_age_is_numeric() {
        let numeric: Vec<_> = Attribute::ALL.into_iter().filter(|a| a.is_numeric()).collect();
        assert_eq!(numeric, vec![Attribute::Age]);
    }

    #[test]
    fn value_serializes_untagged() {
        assert_eq!(serde_json::to_string(&AttributeValue::Integer(28)).unwrap(), "28");
        assert_eq!(
            serde_json::to_string(&AttributeValue::Text("Mira".into())).unwrap(),
            "\"Mira\""
        );
    }
}
