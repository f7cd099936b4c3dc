//! Questionnaire builder and answer validation.
//!
//! A questionnaire is authored as a whole (title plus an ordered list of
//! questions) and saved in a single request, so validation runs over the
//! complete draft before anything is written.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::require_non_empty;

/// Minimum number of options for choice questions.
pub const MIN_CHOICE_OPTIONS: usize = 2;

/// Maximum number of questions in a single questionnaire.
pub const MAX_QUESTIONS: usize = 100;

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    ShortText,
    LongText,
    SingleChoice,
    MultipleChoice,
    YesNo,
    Number,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        Self::ShortText,
        Self::LongText,
        Self::SingleChoice,
        Self::MultipleChoice,
        Self::YesNo,
        Self::Number,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ShortText => "short_text",
            Self::LongText => "long_text",
            Self::SingleChoice => "single_choice",
            Self::MultipleChoice => "multiple_choice",
            Self::YesNo => "yes_no",
            Self::Number => "number",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .ok_or_else(|| CoreError::Validation(format!("unknown question_type '{value}'")))
    }

    /// Whether answers are drawn from a fixed option list.
    pub fn is_choice(self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultipleChoice)
    }
}

/// A question as submitted by the builder, before it is persisted.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuestionDraft {
    pub question_text: String,
    pub question_type: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub is_required: bool,
    pub sort_order: Option<i32>,
}

/// The subset of a stored question that answer validation needs.
#[derive(Debug, Clone)]
pub struct QuestionSpec {
    pub id: DbId,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub is_required: bool,
}

/// An answer as submitted by a respondent.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerInput {
    pub question_id: DbId,
    pub value: Value,
}

/// Validate a questionnaire title and its question list.
///
/// Checks, in order: non-empty title, at least one question, the question
/// limit, then each question's text, type and option list. Errors name the
/// 1-based question position so the builder can highlight it.
pub fn validate_questionnaire(title: &str, questions: &[QuestionDraft]) -> Result<(), CoreError> {
    require_non_empty(title, "title")?;
    if questions.is_empty() {
        return Err(CoreError::Validation(
            "questionnaire must have at least one question".into(),
        ));
    }
    if questions.len() > MAX_QUESTIONS {
        return Err(CoreError::Validation(format!(
            "questionnaire may have at most {MAX_QUESTIONS} questions"
        )));
    }
    for (index, question) in questions.iter().enumerate() {
        validate_question(question).map_err(|e| match e {
            CoreError::Validation(msg) => {
                CoreError::Validation(format!("question {}: {msg}", index + 1))
            }
            other => other,
        })?;
    }
    Ok(())
}

fn validate_question(question: &QuestionDraft) -> Result<(), CoreError> {
    require_non_empty(&question.question_text, "question_text")?;
    let question_type = QuestionType::parse(&question.question_type)?;

    if question_type.is_choice() {
        if question.options.len() < MIN_CHOICE_OPTIONS {
            return Err(CoreError::Validation(format!(
                "{} questions need at least {MIN_CHOICE_OPTIONS} options",
                question_type.as_str()
            )));
        }
        let mut seen = HashSet::new();
        for option in &question.options {
            let trimmed = option.trim();
            if trimmed.is_empty() {
                return Err(CoreError::Validation("options must not be empty".into()));
            }
            if !seen.insert(trimmed.to_lowercase()) {
                return Err(CoreError::Validation(format!(
                    "duplicate option '{trimmed}'"
                )));
            }
        }
    } else if !question.options.is_empty() {
        return Err(CoreError::Validation(format!(
            "{} questions do not take options",
            question_type.as_str()
        )));
    }
    Ok(())
}

/// Assign dense `sort_order` values.
///
/// Questions with an explicit `sort_order` are ordered by it; ties and
/// unspecified orders keep their submitted position. The result numbers
/// questions `0..n` in that order.
pub fn normalize_sort_order(questions: &mut [QuestionDraft]) {
    let mut keyed: Vec<(i32, usize)> = questions
        .iter()
        .enumerate()
        .map(|(pos, q)| (q.sort_order.unwrap_or(pos as i32), pos))
        .collect();
    keyed.sort();

    let mut order = vec![0i32; questions.len()];
    for (rank, (_, pos)) in keyed.into_iter().enumerate() {
        order[pos] = rank as i32;
    }
    for (question, rank) in questions.iter_mut().zip(order) {
        question.sort_order = Some(rank);
    }
}

/// Validate a respondent's answers against the stored questions.
///
/// Every answer must reference a question of this questionnaire, at most
/// once; every required question must have a non-empty answer; each value
/// must match its question type. Optional questions answered with `null`
/// are dropped from the returned list.
pub fn validate_answers(
    questions: &[QuestionSpec],
    answers: &[AnswerInput],
) -> Result<Vec<AnswerInput>, CoreError> {
    let by_id: HashMap<DbId, &QuestionSpec> = questions.iter().map(|q| (q.id, q)).collect();
    let mut answered = HashSet::new();
    let mut accepted = Vec::with_capacity(answers.len());

    for answer in answers {
        let question = by_id.get(&answer.question_id).ok_or_else(|| {
            CoreError::Validation(format!(
                "question {} does not belong to this questionnaire",
                answer.question_id
            ))
        })?;
        if !answered.insert(answer.question_id) {
            return Err(CoreError::Validation(format!(
                "question {} answered more than once",
                answer.question_id
            )));
        }
        if is_blank(&answer.value) {
            continue;
        }
        validate_answer_value(question, &answer.value)?;
        accepted.push(answer.clone());
    }

    for question in questions.iter().filter(|q| q.is_required) {
        if !accepted.iter().any(|a| a.question_id == question.id) {
            return Err(CoreError::Validation(format!(
                "question {} is required",
                question.id
            )));
        }
    }

    Ok(accepted)
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn validate_answer_value(question: &QuestionSpec, value: &Value) -> Result<(), CoreError> {
    let id = question.id;
    let type_error = |expected: &str| {
        CoreError::Validation(format!("question {id} expects {expected}"))
    };
    let option_error = |given: &str| {
        CoreError::Validation(format!("question {id}: '{given}' is not one of the options"))
    };

    match question.question_type {
        QuestionType::ShortText | QuestionType::LongText => {
            value.as_str().ok_or_else(|| type_error("a text answer"))?;
        }
        QuestionType::YesNo => {
            value.as_bool().ok_or_else(|| type_error("true or false"))?;
        }
        QuestionType::Number => {
            value.as_f64().ok_or_else(|| type_error("a number"))?;
        }
        QuestionType::SingleChoice => {
            let choice = value.as_str().ok_or_else(|| type_error("a single option"))?;
            if !question.options.iter().any(|o| o == choice) {
                return Err(option_error(choice));
            }
        }
        QuestionType::MultipleChoice => {
            let choices = value
                .as_array()
                .ok_or_else(|| type_error("a list of options"))?;
            let mut seen = HashSet::new();
            for choice in choices {
                let choice = choice.as_str().ok_or_else(|| type_error("a list of options"))?;
                if !question.options.iter().any(|o| o == choice) {
                    return Err(option_error(choice));
                }
                if !seen.insert(choice) {
                    return Err(CoreError::Validation(format!(
                        "question {id}: option '{choice}' selected twice"
                    )));
                }
            }
        }
    }
    Ok(())
}
