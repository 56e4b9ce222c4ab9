//! Lenient decoding of JSON answers from chat models.

use serde::de::DeserializeOwned;

use crate::ports::CollaboratorError;

/// Decodes a model answer as `T`.
///
/// Tries the raw text, then a fenced ```json block, then the outermost
/// `{...}` span. Models asked for JSON still wrap it in prose now and then.
pub(crate) fn parse_structured<T>(collaborator: &'static str, raw: &str) -> Result<T, CollaboratorError>
where
    T: DeserializeOwned,
{
    let trimmed = raw.trim();
    if let Ok(parsed) = serde_json::from_str::<T>(trimmed) {
        return Ok(parsed);
    }

    let candidate = fenced_block(trimmed)
        .or_else(|| outer_object(trimmed))
        .unwrap_or(trimmed);

    serde_json::from_str::<T>(candidate.trim()).map_err(|e| {
        let preview: String = raw.chars().take(200).collect();
        CollaboratorError::invalid_output(collaborator, format!("{} in {:?}", e, preview))
    })
}

fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```json")? + "```json".len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(&rest[..end])
}

fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Answer {
        ok: bool,
    }

    #[test]
    fn parses_raw_json() {
        let answer: Answer = parse_structured("test", r#" {"ok": true} "#).unwrap();
        assert_eq!(answer, Answer { ok: true });
    }

    #[test]
    fn parses_fenced_json() {
        let raw = "Here you go:\n```json\n{\"ok\": false}\n```\nAnything else?";
        let answer: Answer = parse_structured("test", raw).unwrap();
        assert_eq!(answer, Answer { ok: false });
    }

    #[test]
    fn parses_object_embedded_in_prose() {
        let raw = "The result is {\"ok\": true} as requested.";
        let answer: Answer = parse_structured("test", raw).unwrap();
        assert_eq!(answer, Answer { ok: true });
    }

    #[test]
    fn reports_invalid_output_with_collaborator_name() {
        let err = parse_structured::<Answer>("relatedness_classifier", "yes").unwrap_err();
        match err {
            CollaboratorError::InvalidOutput { collaborator, .. } => {
                assert_eq!(collaborator, "relatedness_classifier")
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn shape_mismatch_is_invalid_output() {
        let err = parse_structured::<Answer>("test", r#"{"ok": "maybe"}"#).unwrap_err();
        assert!(matches!(err, CollaboratorError::InvalidOutput { .. }));
    }
}
