//! Casting codes: shareable codes that let unauthenticated talent submit
//! themselves to a studio, optionally answering a short custom survey.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::questionnaire::{validate_answers, AnswerInput, QuestionSpec, QuestionType};
use crate::types::Timestamp;
use crate::validation::require_non_empty;

/// Characters used in generated codes. Excludes 0/O, 1/I/L to keep codes
/// readable when typed from a printed QR poster.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Default length of generated codes.
pub const DEFAULT_CODE_LEN: usize = 8;

/// Path prefix of the public submission page.
pub const SUBMISSION_PATH: &str = "/casting";

/// Generate a random casting code.
pub fn generate_code(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Normalize a user-typed code: trimmed, upper-cased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validate a custom (studio-chosen) code.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if !(4..=32).contains(&code.len()) {
        return Err(CoreError::Validation(
            "code must be between 4 and 32 characters".into(),
        ));
    }
    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(format!(
            "code may contain only A-Z, 0-9 and '-', got '{code}'"
        )));
    }
    Ok(())
}

/// Public URL encoded into the casting code's QR image.
pub fn submission_url(base_url: &str, code: &str) -> String {
    format!("{}{SUBMISSION_PATH}/{code}", base_url.trim_end_matches('/'))
}

/// Check that a code still accepts submissions.
pub fn ensure_accepting_submissions(
    is_active: bool,
    expires_at: Option<Timestamp>,
    max_submissions: Option<i32>,
    submission_count: i64,
    now: Timestamp,
) -> Result<(), CoreError> {
    if !is_active {
        return Err(CoreError::Conflict("Casting code is inactive".into()));
    }
    if let Some(expires_at) = expires_at {
        if now >= expires_at {
            return Err(CoreError::Conflict("Casting code has expired".into()));
        }
    }
    if let Some(max) = max_submissions {
        if submission_count >= i64::from(max) {
            return Err(CoreError::Conflict(
                "Casting code has reached its submission limit".into(),
            ));
        }
    }
    Ok(())
}

/// One question of a casting code survey, stored as JSON on the code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub key: String,
    pub label: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
}

/// Parse and validate a survey definition.
pub fn parse_survey(value: &Value) -> Result<Vec<SurveyQuestion>, CoreError> {
    let questions: Vec<SurveyQuestion> = serde_json::from_value(value.clone())
        .map_err(|e| CoreError::Validation(format!("invalid survey definition: {e}")))?;

    let mut keys = HashSet::new();
    for question in &questions {
        require_non_empty(&question.key, "survey key")?;
        require_non_empty(&question.label, "survey label")?;
        if !keys.insert(question.key.as_str()) {
            return Err(CoreError::Validation(format!(
                "duplicate survey key '{}'",
                question.key
            )));
        }
        if question.question_type.is_choice() && question.options.len() < 2 {
            return Err(CoreError::Validation(format!(
                "survey question '{}' needs at least 2 options",
                question.key
            )));
        }
    }
    Ok(questions)
}

/// Validate survey answers (an object keyed by question key).
///
/// Returns the accepted answers with blank optional entries removed.
pub fn validate_survey_answers(
    survey: &[SurveyQuestion],
    answers: &Map<String, Value>,
) -> Result<Map<String, Value>, CoreError> {
    for key in answers.keys() {
        if !survey.iter().any(|q| &q.key == key) {
            return Err(CoreError::Validation(format!("unknown survey key '{key}'")));
        }
    }

    let specs: Vec<QuestionSpec> = survey
        .iter()
        .enumerate()
        .map(|(i, q)| QuestionSpec {
            id: i as i64 + 1,
            question_type: q.question_type,
            options: q.options.clone(),
            is_required: q.is_required,
        })
        .collect();
    let inputs: Vec<AnswerInput> = survey
        .iter()
        .enumerate()
        .filter_map(|(i, q)| {
            answers.get(&q.key).map(|value| AnswerInput {
                question_id: i as i64 + 1,
                value: value.clone(),
            })
        })
        .collect();

    let accepted = validate_answers(&specs, &inputs).map_err(|e| match e {
        CoreError::Validation(msg) => CoreError::Validation(relabel(&msg, survey)),
        other => other,
    })?;

    Ok(accepted
        .into_iter()
        .map(|a| (survey[(a.question_id - 1) as usize].key.clone(), a.value))
        .collect())
}

/// Replace synthetic "question N" ids with survey keys in error messages.
fn relabel(message: &str, survey: &[SurveyQuestion]) -> String {
    let mut out = message.to_string();
    for (i, q) in survey.iter().enumerate().rev() {
        out = out.replace(&format!("question {}", i + 1), &format!("'{}'", q.key));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[test]
    fn generated_codes_use_alphabet() {
        let code = generate_code(DEFAULT_CODE_LEN);
        assert_eq!(code.len(), DEFAULT_CODE_LEN);
        assert!(code.bytes().all(|b| CODE_ALPHABET.contains(&b)));
        assert!(validate_code(&code).is_ok());
    }

    #[test]
    fn code_validation_and_normalization() {
        assert_eq!(normalize_code("  summer-24 "), "SUMMER-24");
        assert!(validate_code("SUMMER-24").is_ok());
        assert!(validate_code("abc").is_err());
        assert!(validate_code("summer").is_err());
        assert!(validate_code("WITH SPACE").is_err());
    }

    #[test]
    fn url_template() {
        assert_eq!(
            submission_url("https://castline.example/", "AB12CD34"),
            "https://castline.example/casting/AB12CD34"
        );
    }

    #[test]
    fn accepting_submissions() {
        let now = Utc::now();
        assert!(ensure_accepting_submissions(true, None, None, 1000, now).is_ok());
        assert!(ensure_accepting_submissions(false, None, None, 0, now).is_err());
        let expired = Some(now - Duration::seconds(1));
        assert!(ensure_accepting_submissions(true, expired, None, 0, now).is_err());
        let later = Some(now + Duration::hours(1));
        assert!(ensure_accepting_submissions(true, later, Some(2), 1, now).is_ok());
        assert!(ensure_accepting_submissions(true, None, Some(2), 2, now).is_err());
    }

    #[test]
    fn survey_definition() {
        let survey = parse_survey(&json!([
            {"key": "age", "label": "Age", "question_type": "number", "is_required": true},
            {"key": "role", "label": "Role", "question_type": "single_choice",
             "options": ["Lead", "Extra"]}
        ]))
        .unwrap();
        assert_eq!(survey.len(), 2);

        assert!(parse_survey(&json!([
            {"key": "a", "label": "A", "question_type": "short_text"},
            {"key": "a", "label": "B", "question_type": "short_text"}
        ]))
        .is_err());
        assert!(parse_survey(&json!([
            {"key": "a", "label": "A", "question_type": "single_choice", "options": ["x"]}
        ]))
        .is_err());
        assert!(parse_survey(&json!({"key": "a"})).is_err());
    }

    #[test]
    fn survey_answers() {
        let survey = parse_survey(&json!([
            {"key": "age", "label": "Age", "question_type": "number", "is_required": true},
            {"key": "role", "label": "Role", "question_type": "single_choice",
             "options": ["Lead", "Extra"]}
        ]))
        .unwrap();

        let ok = json!({"age": 31, "role": "Extra"});
        let accepted = validate_survey_answers(&survey, ok.as_object().unwrap()).unwrap();
        assert_eq!(accepted.get("role"), Some(&json!("Extra")));

        let missing = json!({"role": "Lead"});
        let err = validate_survey_answers(&survey, missing.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("'age'"), "{err}");

        let unknown = json!({"age": 3, "shoe": 9});
        assert!(validate_survey_answers(&survey, unknown.as_object().unwrap()).is_err());

        let bad_choice = json!({"age": 3, "role": "Director"});
        assert!(validate_survey_answers(&survey, bad_choice.as_object().unwrap()).is_err());
    }
}
