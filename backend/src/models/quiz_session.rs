// src/models/quiz_session.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};

use crate::models::question::{PublicQuestion, Question};

/// One submitted answer.
/// Serialized in camelCase (`quizId`, `userAnswer`, `correctAnswer`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub quiz_id: String,
    pub user_answer: String,
    /// Copy of the question's correct answer at the time of answering.
    pub correct_answer: String,
    pub correct: bool,
}

/// One quiz attempt by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub session_id: String,

    /// Never leaves the server.
    #[serde(skip)]
    pub owner_user_id: String,

    #[serde(rename = "current_question")]
    pub current_question_index: i64,

    pub score: i64,
    pub completed: bool,
    pub created_at: DateTime<Utc>,

    /// Fixed at creation.
    pub questions: Vec<Question>,

    /// One entry per answered question, in answer order.
    pub answer_history: Vec<AnswerRecord>,
}

/// Why an answer was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerError {
    /// The session already has an answer for every question.
    Completed,
    /// The answer targets a question other than the current one.
    StaleQuestion { expected: i64, got: i64 },
    /// The answer is not one of the question's options.
    UnknownOption(String),
}

impl fmt::Display for AnswerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerError::Completed => write!(f, "Quiz is already completed"),
            AnswerError::StaleQuestion { expected, got } => write!(
                f,
                "Question {} was already answered; current question is {}",
                got, expected
            ),
            AnswerError::UnknownOption(answer) => {
                write!(f, "'{}' is not one of the options", answer)
            }
        }
    }
}

impl std::error::Error for AnswerError {}

/// A data-integrity violation found in a stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityAnomaly {
    ScoreMismatch { score: i64, correct_in_history: i64 },
    CompletedWithPartialHistory { answered: usize, total: usize },
    HistoryLongerThanQuestions { answered: usize, total: usize },
    CursorOutOfRange { cursor: i64, total: usize },
    CorrectAnswerDrift { index: usize },
    CorrectFlagMismatch { index: usize },
}

impl fmt::Display for IntegrityAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityAnomaly::ScoreMismatch {
                score,
                correct_in_history,
            } => write!(
                f,
                "score is {} but {} recorded answers are correct",
                score, correct_in_history
            ),
            IntegrityAnomaly::CompletedWithPartialHistory { answered, total } => write!(
                f,
                "marked completed with only {} of {} answers recorded",
                answered, total
            ),
            IntegrityAnomaly::HistoryLongerThanQuestions { answered, total } => write!(
                f,
                "{} answers recorded for {} questions",
                answered, total
            ),
            IntegrityAnomaly::CursorOutOfRange { cursor, total } => {
                write!(f, "current question {} is outside 0..={}", cursor, total)
            }
            IntegrityAnomaly::CorrectAnswerDrift { index } => write!(
                f,
                "answer {} records a correct answer that differs from the question",
                index + 1
            ),
            IntegrityAnomaly::CorrectFlagMismatch { index } => write!(
                f,
                "answer {} has a correct flag that disagrees with its answers",
                index + 1
            ),
        }
    }
}

impl QuizSession {
    /// A fresh session: no answers, zero score, not completed.
    pub fn new(
        session_id: impl Into<String>,
        owner_user_id: impl Into<String>,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            owner_user_id: owner_user_id.into(),
            current_question_index: 0,
            score: 0,
            completed: false,
            created_at,
            questions,
            answer_history: Vec::new(),
        }
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            return None;
        }
        usize::try_from(self.current_question_index)
            .ok()
            .and_then(|i| self.questions.get(i))
    }

    /// Appends an answer for `question_index`, which must be the current
    /// question. Advances the cursor, updates the score and marks the
    /// session completed on the final answer.
    pub fn record_answer(
        &mut self,
        question_index: i64,
        answer: &str,
    ) -> Result<&AnswerRecord, AnswerError> {
        if self.completed {
            return Err(AnswerError::Completed);
        }
        if question_index != self.current_question_index {
            return Err(AnswerError::StaleQuestion {
                expected: self.current_question_index,
                got: question_index,
            });
        }
        let question = self.current_question().ok_or(AnswerError::Completed)?;
        if !question.has_option(answer) {
            return Err(AnswerError::UnknownOption(answer.to_string()));
        }

        let record = AnswerRecord {
            quiz_id: self.session_id.clone(),
            user_answer: answer.to_string(),
            correct_answer: question.correct_answer.clone(),
            correct: question.is_correct(answer),
        };

        if record.correct {
            self.score += 1;
        }
        self.current_question_index += 1;
        self.answer_history.push(record);
        if self.answer_history.len() == self.questions.len() {
            self.completed = true;
        }

        Ok(&self.answer_history[self.answer_history.len() - 1])
    }

    /// Percentage score, or `None` when the session has no questions.
    pub fn percentage(&self) -> Option<u32> {
        percentage(self.score, self.questions.len())
    }

    /// Returns every invariant violation observed in this session.
    pub fn check_integrity(&self) -> Vec<IntegrityAnomaly> {
        let mut anomalies = Vec::new();
        let total = self.questions.len();
        let answered = self.answer_history.len();

        let correct_in_history = self.answer_history.iter().filter(|r| r.correct).count() as i64;
        if correct_in_history != self.score {
            anomalies.push(IntegrityAnomaly::ScoreMismatch {
                score: self.score,
                correct_in_history,
            });
        }

        if answered > total {
            anomalies.push(IntegrityAnomaly::HistoryLongerThanQuestions { answered, total });
        } else if self.completed && answered < total {
            anomalies.push(IntegrityAnomaly::CompletedWithPartialHistory { answered, total });
        }

        if self.current_question_index < 0 || self.current_question_index > total as i64 {
            anomalies.push(IntegrityAnomaly::CursorOutOfRange {
                cursor: self.current_question_index,
                total,
            });
        }

        for (index, (record, question)) in self
            .answer_history
            .iter()
            .zip(self.questions.iter())
            .enumerate()
        {
            if record.correct_answer != question.correct_answer {
                anomalies.push(IntegrityAnomaly::CorrectAnswerDrift { index });
            }
            if record.correct != (record.user_answer == record.correct_answer) {
                anomalies.push(IntegrityAnomaly::CorrectFlagMismatch { index });
            }
        }

        anomalies
    }
}

/// `round(score / total * 100)` with halves rounded up, in integer
/// arithmetic. `None` when there are no questions.
pub fn percentage(score: i64, total: usize) -> Option<u32> {
    if total == 0 {
        return None;
    }
    let score = score.max(0) as u64;
    let total = total as u64;
    let rounded = (score * 200 + total) / (total * 2);
    u32::try_from(rounded).ok()
}

/// Represents the 'quiz_sessions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct QuizSessionRow {
    pub session_id: String,
    pub user_id: String,
    pub language: Option<String>,
    pub current_question: i64,
    pub score: i64,
    pub completed: bool,
    pub questions: Json<Vec<Question>>,
    pub answer_history: Json<Vec<AnswerRecord>>,
    pub created_at: DateTime<Utc>,
}

impl From<QuizSessionRow> for QuizSession {
    fn from(row: QuizSessionRow) -> Self {
        Self {
            session_id: row.session_id,
            owner_user_id: row.user_id,
            current_question_index: row.current_question,
            score: row.score,
            completed: row.completed,
            created_at: row.created_at,
            questions: row.questions.0,
            answer_history: row.answer_history.0,
        }
    }
}

/// History row for the dashboard. Per-question detail is not included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SessionSummary {
    pub session_id: String,
    /// Category tag the session was drawn from, if any.
    pub language: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub score: i64,
    pub total_questions: i64,
}

/// Response body of the history endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(rename = "pastQuizzes")]
    pub past_quizzes: Vec<SessionSummary>,
}

/// Progress of an in-flight quiz, as shown to the quiz taker.
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizProgress {
    pub session_id: String,
    pub current_question: i64,
    pub total_questions: usize,
    pub score: i64,
    pub completed: bool,
    pub question: Option<PublicQuestion>,
}

impl From<&QuizSession> for QuizProgress {
    fn from(session: &QuizSession) -> Self {
        Self {
            session_id: session.session_id.clone(),
            current_question: session.current_question_index,
            total_questions: session.total_questions(),
            score: session.score,
            completed: session.completed,
            question: session.current_question().map(PublicQuestion::from),
        }
    }
}

/// The two read/delete surfaces over a single session. Both share one data
/// contract and differ only in path and response key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailVariant {
    Details,
    Summary,
}

impl DetailVariant {
    pub fn endpoint(self) -> &'static str {
        match self {
            DetailVariant::Details => "/api/quiz-details",
            DetailVariant::Summary => "/api/quiz-summary",
        }
    }

    /// Key wrapping the session in the GET response body.
    pub fn payload_key(self) -> &'static str {
        match self {
            DetailVariant::Details => "quizDetails",
            DetailVariant::Summary => "quizSummary",
        }
    }
}
