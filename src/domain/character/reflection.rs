//! Reflection feedback - validation of extracted values against the turn.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Attribute;

/// Result of cross-checking the merged profile against the latest turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionFeedback {
    /// Short summary of how accurate the extracted values are.
    pub correctness_summary: String,
    /// Blocking issues with the extraction as a whole.
    pub flags: Vec<String>,
    /// Non-blocking remarks.
    pub notes: Vec<String>,
    /// Attributes verified correct, including verified-absent ones.
    pub confirmations: Vec<Attribute>,
    /// Corrections the reflector is confident about. Never applied directly.
    pub suggested_corrections: BTreeMap<Attribute, serde_json::Value>,
    /// Attributes too unclear to resolve without the user.
    pub ask_user_about: Vec<Attribute>,
}

impl ReflectionFeedback {
    /// Feedback confirming the given attributes with nothing to fix.
    pub fn confirming(attributes: impl IntoIterator<Item = Attribute>) -> Self {
        Self {
            correctness_summary: "All extracted values match the input.".to_string(),
            confirmations: attributes.into_iter().collect(),
            ..Default::default()
        }
    }

    pub fn has_corrections(&self) -> bool {
        !self.suggested_corrections.is_empty()
    }

    /// True iff flags, suggested corrections and ask-user lists are all empty.
    pub fn proceed_to_creator(&self) -> bool {
        self.flags.is_empty() && !self.has_corrections() && self.ask_user_about.is_empty()
    }

    /// Attributes the reflector could not settle: corrected or asked about.
    pub fn unresolved_attributes(&self) -> Vec<Attribute> {
        let mut unresolved: Vec<Attribute> = self
            .suggested_corrections
            .keys()
            .copied()
            .chain(self.ask_user_about.iter().copied())
            .collect();
        unresolved.sort();
        unresolved.dedup();
        unresolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn confirming_feedback_proceeds() {
        let feedback = ReflectionFeedback::confirming([Attribute::Name]);
        assert!(feedback.proceed_to_creator());
        assert_eq!(feedback.confirmations, vec![Attribute::Name]);
    }

    #[test]
    fn any_blocking_list_prevents_proceeding() {
        let mut with_flag = ReflectionFeedback::default();
        with_flag.flags.push("extraction invented a name".to_string());
        assert!(!with_flag.proceed_to_creator());

        let mut with_correction = ReflectionFeedback::default();
        with_correction
            .suggested_corrections
            .insert(Attribute::Age, json!(28));
        assert!(!with_correction.proceed_to_creator());

        let mut with_question = ReflectionFeedback::default();
        with_question.ask_user_about.push(Attribute::Gender);
        assert!(!with_question.proceed_to_creator());
    }

    #[test]
    fn notes_do_not_block() {
        let mut feedback = ReflectionFeedback::default();
        feedback.notes.push("could use more detail".to_string());
        assert!(feedback.proceed_to_creator());
    }

    #[test]
    fn unresolved_attributes_are_deduplicated() {
        let mut feedback = ReflectionFeedback::default();
        feedback.suggested_corrections.insert(Attribute::Age, json!(28));
        feedback.ask_user_about = vec![Attribute::Age, Attribute::Gender];

        assert_eq!(
            feedback.unresolved_attributes(),
            vec![Attribute::Age, Attribute::Gender]
        );
    }

    #[test]
    fn deserializes_with_missing_lists() {
        let feedback: ReflectionFeedback =
            serde_json::from_str(r#"{"correctness_summary": "fine", "confirmations": ["name"]}"#)
                .unwrap();
        assert_eq!(feedback.confirmations, vec![Attribute::Name]);
        assert!(feedback.suggested_corrections.is_empty());
    }
}
