// src/models/question.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// A question from the bank.
///
/// Serialized with the wire names the clients expect (`question`,
/// `correct_answer`), and also the shape stored in each session's
/// question snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Display text of the question.
    #[serde(rename = "question")]
    pub prompt: String,

    /// Candidate answers, in display order.
    pub options: Vec<String>,

    /// The option string that is correct.
    pub correct_answer: String,

    pub image: Option<String>,

    pub category: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }

    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }
}

/// Represents the 'questions' table in the database.
/// `options` is stored as a JSON array.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub question: String,
    pub options: Json<Vec<String>>,
    pub correct_answer: String,
    pub image: Option<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<QuestionRow> for Question {
    fn from(row: QuestionRow) -> Self {
        Self {
            id: row.id,
            prompt: row.question,
            options: row.options.0,
            correct_answer: row.correct_answer,
            image: row.image,
            category: row.category,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for sending the current question to a quiz taker (no correct answer).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub image: Option<String>,
    pub category: String,
}

impl From<&Question> for PublicQuestion {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            question: q.prompt.clone(),
            options: q.options.clone(),
            image: q.image.clone(),
            category: q.category.clone(),
        }
    }
}

/// DTO for adding a question to the bank.
#[derive(Debug, Deserialize, Validate)]
#[validate(schema(function = validate_correct_answer_listed))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1, max = 500))]
    pub correct_answer: String,
    #[validate(length(max = 500))]
    pub image: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.len() < 2 {
        return Err(validator::ValidationError::new("at_least_two_options"));
    }
    for opt in options {
        if opt.is_empty() || opt.len() > 500 {
            return Err(validator::ValidationError::new("option_length"));
        }
    }
    Ok(())
}

fn validate_correct_answer_listed(
    req: &CreateQuestionRequest,
) -> Result<(), validator::ValidationError> {
    if !req.options.contains(&req.correct_answer) {
        return Err(validator::ValidationError::new(
            "correct_answer_not_in_options",
        ));
    }
    Ok(())
}
