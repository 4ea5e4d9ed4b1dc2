use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?i)```(?:json)?\n?|\n?```").expect("Invalid code fence regex");
    static ref TRAILING_COMMA: Regex =
        Regex::new(r",\s*([\]}])").expect("Invalid trailing comma regex");
}

/// Top-level JSON type a model reply is expected to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonShape {
    Object,
    Array,
}

#[derive(Debug, Error)]
#[error("Unable to parse AI response: {0}")]
pub struct ParseFailure(pub String);

/// Strip markdown fences and trailing commas.
pub fn clean(text: &str) -> String {
    let unfenced = CODE_FENCE.replace_all(text, "");
    TRAILING_COMMA
        .replace_all(&unfenced, "$1")
        .trim()
        .to_string()
}

/// Best-effort recovery of a JSON value from model output.
///
/// Tries, in order: the cleaned text; the cleaned text with single quotes
/// turned into double quotes; and, for arrays only, the span from the first
/// `[` to the last `]` of either variant. The model is never asked again.
pub fn parse_model_json(text: &str, shape: JsonShape) -> Result<Value, ParseFailure> {
    let cleaned = clean(text);

    let first_err = match serde_json::from_str::<Value>(&cleaned) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let requoted = cleaned.replace('\'', "\"");
    if let Ok(value) = serde_json::from_str::<Value>(&requoted) {
        return Ok(value);
    }

    if shape == JsonShape::Array {
        let extracted = [cleaned.as_str(), requoted.as_str()]
            .into_iter()
            .filter_map(bracketed_span)
            .find_map(|span| serde_json::from_str::<Value>(span).ok());
        if let Some(value) = extracted {
            return Ok(value);
        }
    }

    debug!(cleaned = %cleaned, error = %first_err, "Model output is not valid JSON");
    Err(ParseFailure(first_err.to_string()))
}

fn bracketed_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clean_strips_fences_and_trailing_commas() {
        let raw = "```json\n{\"a\": [1, 2,],}\n```";
        assert_eq!(clean(raw), "{\"a\": [1, 2]}");
    }

    #[test]
    fn test_fenced_single_quoted_matches_canonical() {
        let raw = "```json\n{'score': 720, 'factors': ['income', 'history',],}\n```";
        let canonical = r#"{"score": 720, "factors": ["income", "history"]}"#;

        let repaired = parse_model_json(raw, JsonShape::Object).unwrap();
        let expected: Value = serde_json::from_str(canonical).unwrap();
        assert_eq!(repaired, expected);
    }

    #[test]
    fn test_apostrophes_survive_in_valid_json() {
        let raw = r#"{"assessment": "You're doing well"}"#;
        let value = parse_model_json(raw, JsonShape::Object).unwrap();
        assert_eq!(value["assessment"], "You're doing well");
    }

    #[test]
    fn test_array_extracted_from_surrounding_prose() {
        let raw = "Here are the anomalies I found:\n[{\"riskLevel\": \"low\"}]\nLet me know!";
        let value = parse_model_json(raw, JsonShape::Array).unwrap();
        assert_eq!(value, json!([{ "riskLevel": "low" }]));
    }

    #[test]
    fn test_object_prose_is_not_rescued() {
        let raw = "Sure! {\"score\": 700} hope that helps";
        assert!(parse_model_json(raw, JsonShape::Object).is_err());
    }

    #[test]
    fn test_garbage_fails() {
        assert!(parse_model_json("I cannot help with that.", JsonShape::Array).is_err());
        assert!(parse_model_json("", JsonShape::Object).is_err());
    }

    #[test]
    fn test_uppercase_fence_label() {
        let value = parse_model_json("```JSON\n[1,2,3,]\n```", JsonShape::Array).unwrap();
        assert_eq!(value, json!([1, 2, 3]));
    }
}
