use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::SummarizerError;

/// Longest accepted input, in characters.
pub const MAX_TEXT_LENGTH: usize = 10_000;

/// Body of `POST /api/summarize`
#[derive(Debug, Deserialize, Validate)]
pub struct SummarizeRequest {
    #[validate(custom(function = "validate_text"))]
    pub text: String,
}

fn validate_text(text: &str) -> Result<(), ValidationError> {
    let length = text.chars().count();
    if length == 0 {
        return Err(rule_violation("required", "Text is required"));
    }
    if length > MAX_TEXT_LENGTH {
        return Err(rule_violation("too_long", "Text is too long"));
    }
    Ok(())
}

fn rule_violation(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid request".to_string())
}

/// Request validation utilities
pub struct RequestValidator;

impl RequestValidator {
    /// Validates a summarize request body, returning the text to analyze
    pub fn validate_summarize_payload(body: &Value) -> Result<String, SummarizerError> {
        let text = match body.get("text") {
            None | Some(Value::Null) => {
                return Err(SummarizerError::Validation("Text is required".to_string()))
            }
            Some(Value::String(text)) => text.clone(),
            Some(_) => {
                return Err(SummarizerError::Validation(
                    "Text must be a string".to_string(),
                ))
            }
        };

        let request = SummarizeRequest { text };
        request
            .validate()
            .map_err(|errors| SummarizerError::Validation(first_message(&errors)))?;

        Ok(request.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(body: Value) -> String {
        match RequestValidator::validate_summarize_payload(&body) {
            Err(SummarizerError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_text() {
        let text = RequestValidator::validate_summarize_payload(&json!({ "text": "Rust is fast." }))
            .unwrap();
        assert_eq!(text, "Rust is fast.");
    }

    #[test]
    fn test_length_boundaries() {
        let one = "a".to_string();
        let max = "a".repeat(MAX_TEXT_LENGTH);
        assert!(RequestValidator::validate_summarize_payload(&json!({ "text": one })).is_ok());
        assert!(RequestValidator::validate_summarize_payload(&json!({ "text": max })).is_ok());
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(message(json!({ "text": "" })), "Text is required");
    }

    #[test]
    fn test_text_too_long() {
        let long = "a".repeat(MAX_TEXT_LENGTH + 1);
        assert_eq!(message(json!({ "text": long })), "Text is too long");
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let text = "é".repeat(MAX_TEXT_LENGTH);
        assert!(RequestValidator::validate_summarize_payload(&json!({ "text": text })).is_ok());
    }

    #[test]
    fn test_missing_or_wrong_type() {
        assert_eq!(message(json!({})), "Text is required");
        assert_eq!(message(json!({ "text": null })), "Text is required");
        assert_eq!(message(json!({ "text": 42 })), "Text must be a string");
    }
}
