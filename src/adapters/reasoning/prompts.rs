//! Prompt text for the LLM-backed collaborators.

use crate::domain::character::Attribute;

fn attribute_list() -> String {
    Attribute::ALL
        .iter()
        .map(|a| {
            let kind = if a.is_numeric() { "integer" } else { "string" };
            format!("- {} ({})", a.as_str(), kind)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn classifier_system() -> String {
    format!(
        "You decide whether a message gives concrete attribute values for a fictional anime \
character. The attributes are:\n{}\n\n\
Only actual values count. Questions, requests for help, and unrelated chatter do not.\n\
\"She is a 16-year-old girl with long blue hair.\" -> true\n\
\"Should I describe the abilities?\" -> false\n\
\"He is a wise old man who controls time.\" -> true\n\
\"I need help coming up with a name.\" -> false\n\n\
Answer with JSON only: {{\"related_to_attributes\": true|false}}",
        attribute_list()
    )
}

pub(crate) fn classifier_user(turn: &str) -> String {
    format!("Message: {}\n\nDoes it give a value for any attribute?", turn)
}

pub(crate) fn assessor_system() -> String {
    format!(
        "You grade a message about a fictional anime character. The attributes are:\n{}\n\n\
Consider only the attributes the message explicitly mentions; never penalize missing ones.\n\
- \"stable\": at least one mentioned attribute has a clear, sufficient value.\n\
- \"ambiguous\": no attribute is mentioned, or the mentioned ones lack a usable value \
(\"the character is called\").\n\
- \"misleading\": a mentioned attribute contradicts itself \
(\"incredibly strong but has no powers at all\").\n\n\
Answer with JSON only: {{\"input_type\": \"stable\"|\"ambiguous\"|\"misleading\", \
\"reasoning\": \"one or two sentences\"}}",
        attribute_list()
    )
}

pub(crate) fn assessor_user(turn: &str) -> String {
    format!("Message: {}\n\nGrade it.", turn)
}

pub(crate) fn extractor_system() -> String {
    format!(
        "You extract attribute values for a fictional anime character from one message. \
Fields:\n{}\n\n\
Use null for anything not mentioned or not reasonably inferable. Interpret implicit \
descriptions sensibly: \"He is a 3-year-old boy\" gives age 3 and gender \"male\" and \
nothing else.\n\n\
Answer with a single JSON object containing exactly these keys.",
        attribute_list()
    )
}

pub(crate) fn extractor_user(turn: &str) -> String {
    format!("Message: {}\n\nExtract the fields.", turn)
}

pub(crate) const REFLECTOR_SYSTEM: &str = "\
You fact-check extracted character attributes against the message they came from. \
Only check attributes the message mentions; unset values for unmentioned attributes are correct.

Sort every finding into one list:
- flags: severe logical errors in the extraction that the user cannot fix.
- ask_user_about: attribute names whose value in the message is contradictory or unclear. \
Never list attributes the message does not mention.
- suggested_corrections: attribute name -> value the message clearly supports instead.
- notes: minor, non-blocking remarks.
- confirmations: attribute names whose extracted value is right.

Attribute names are: name, age, gender, physical_appearance, personality, abilities_power, occupation.

Answer with JSON only:
{\"correctness_summary\": \"...\", \"flags\": [], \"notes\": [], \"confirmations\": [], \
\"suggested_corrections\": {}, \"ask_user_about\": []}";

pub(crate) fn reflector_user(turn: &str, extracted_json: &str) -> String {
    format!(
        "Message: {}\n\nExtracted attributes: {}\n\nCheck them against the message.",
        turn, extracted_json
    )
}

pub(crate) const CLARIFIER_SYSTEM: &str = "\
You help a user describe an anime character. A previous check found their last message \
unclear or contradictory. Write one short, friendly question that resolves it. If several \
attributes are affected, ask only about the most important one.";

pub(crate) fn clarifier_user(input_type: &str, reasoning: &str) -> String {
    format!(
        "The message was judged '{}'. Reasoning: \"{}\"\n\nWrite the clarifying question.",
        input_type, reasoning
    )
}

pub(crate) fn redirector_system() -> String {
    format!(
        "You keep a conversation focused on building an anime character with these \
attributes:\n{}\n\n\
The user's message did not describe the character. Reply kindly and invite them to \
describe exactly one attribute of your choosing.",
        attribute_list()
    )
}

pub(crate) fn redirector_user(turn: &str) -> String {
    format!("Off-topic message: {}\n\nSteer back to one attribute.", turn)
}

pub(crate) fn acknowledger_system(confirmed_json: &str, character_json: &str) -> String {
    format!(
        "You are a warm assistant helping a user create an anime character. They just \
provided or updated some attributes.\n\
1. Acknowledge the new details with genuine enthusiasm.\n\
2. Recap what the character has so far, conversationally.\n\
3. Mention lightly that some details are still open, without listing them.\n\
4. Invite the user to describe one missing attribute.\n\n\
Attributes:\n{}\n\n\
New or updated details: {}\n\n\
Current character: {}",
        attribute_list(),
        confirmed_json,
        character_json
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_list_marks_age_as_integer() {
        let list = attribute_list();
        assert!(list.contains("- age (integer)"));
        assert!(list.contains("- abilities_power (string)"));
        assert_eq!(list.lines().count(), 7);
    }

    #[test]
    fn structured_prompts_describe_their_json_shape() {
        assert!(classifier_system().contains("related_to_attributes"));
        assert!(assessor_system().contains("input_type"));
        assert!(REFLECTOR_SYSTEM.contains("suggested_corrections"));
    }

    #[test]
    fn user_prompts_embed_the_turn() {
        assert!(extractor_user("Her name is Mira.").contains("Her name is Mira."));
        assert!(clarifier_user("misleading", "contradiction").contains("'misleading'"));
    }
}
