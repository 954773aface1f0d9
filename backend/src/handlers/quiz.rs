// src/handlers/quiz.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{
        question::{Question, QuestionRow},
        quiz_session::{QuizProgress, QuizSession, QuizSessionRow},
    },
    utils::jwt::Claims,
};

/// Loads a session only if it belongs to `user_id`. A session owned by
/// someone else is reported as absent.
pub(crate) async fn load_owned_session(
    pool: &SqlitePool,
    session_id: &str,
    user_id: &str,
) -> Result<Option<QuizSession>, AppError> {
    let row = sqlx::query_as::<_, QuizSessionRow>(
        r#"
        SELECT session_id, user_id, language, current_question, score, completed,
               questions, answer_history, created_at
        FROM quiz_sessions
        WHERE session_id = ? AND user_id = ?
        "#,
    )
    .bind(session_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to load session {}: {:?}", session_id, e);
        AppError::from(e)
    })?;

    Ok(row.map(QuizSession::from))
}

/// DTO for starting a quiz. The id is generated by the client.
#[derive(Debug, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(min = 1, max = 64))]
    pub session_id: String,
    /// Restricts the draw to one question category.
    #[validate(length(min = 1, max = 50))]
    pub language: Option<String>,
}

/// Starts a quiz session for the caller.
///
/// * Draws `quiz_length` random questions and snapshots them on the session.
/// * Re-posting an id the caller already owns returns that session (200).
/// * An id owned by another user is a 409.
pub async fn start_quiz(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<StartQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let owner: Option<(String,)> =
        sqlx::query_as("SELECT user_id FROM quiz_sessions WHERE session_id = ?")
            .bind(&req.session_id)
            .fetch_optional(&pool)
            .await?;

    if let Some((owner,)) = owner {
        if owner != claims.sub {
            return Err(AppError::Conflict("Session id already in use".to_string()));
        }
        let session = load_owned_session(&pool, &req.session_id, &claims.sub)
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz session not found".to_string()))?;
        return Ok((StatusCode::OK, Json(QuizProgress::from(&session))));
    }

    let rows = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, question, options, correct_answer, image, category, created_at, updated_at
        FROM questions
        WHERE (?1 IS NULL OR category = ?1)
        ORDER BY RANDOM()
        LIMIT ?2
        "#,
    )
    .bind(req.language.as_deref())
    .bind(config.quiz_length as i64)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to draw questions: {:?}", e);
        AppError::from(e)
    })?;

    if rows.is_empty() {
        return Err(AppError::BadRequest(
            "No questions available for this quiz".to_string(),
        ));
    }

    let questions: Vec<Question> = rows.into_iter().map(Question::from).collect();
    let session = QuizSession::new(&req.session_id, &claims.sub, questions, Utc::now());

    sqlx::query(
        r#"
        INSERT INTO quiz_sessions
            (session_id, user_id, language, current_question, score, completed,
             questions, answer_history, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&session.session_id)
    .bind(&session.owner_user_id)
    .bind(req.language.as_deref())
    .bind(session.current_question_index)
    .bind(session.score)
    .bind(session.completed)
    .bind(SqlJson(&session.questions))
    .bind(SqlJson(&session.answer_history))
    .bind(session.created_at)
    .execute(&pool)
    .await
    .map_err(insert_session_error)?;

    tracing::info!(
        session_id = %session.session_id,
        questions = session.total_questions(),
        "Quiz session started"
    );

    Ok((StatusCode::CREATED, Json(QuizProgress::from(&session))))
}

/// A unique violation means another request created the same id first.
fn insert_session_error(e: sqlx::Error) -> AppError {
    let is_unique_violation = e
        .as_database_error()
        .is_some_and(|d| d.is_unique_violation());
    if is_unique_violation {
        AppError::Conflict("Session id already in use".to_string())
    } else {
        tracing::error!("Failed to create session: {:?}", e);
        AppError::from(e)
    }
}

/// Returns the current question (without its answer) and progress.
pub async fn get_progress(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = load_owned_session(&pool, &session_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz session not found".to_string()))?;

    Ok(Json(QuizProgress::from(&session)))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    /// Index of the question being answered; must equal the session cursor.
    #[validate(range(min = 0))]
    pub question_index: i64,
    #[validate(length(min = 1, max = 500))]
    pub answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub correct_answer: String,
    pub score: i64,
    pub current_question: i64,
    pub completed: bool,
}

/// Records one answer.
///
/// Answers on a session are serialized by a compare-and-set on
/// `current_question`: if another request advanced the session first the
/// update matches no row and the caller gets a 409 with nothing written.
pub async fn submit_answer(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(session_id): Path<String>,
    Json(req): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = req.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let mut session = load_owned_session(&pool, &session_id, &claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz session not found".to_string()))?;

    let previous_index = session.current_question_index;
    let record = session.record_answer(req.question_index, &req.answer)?.clone();

    let result = sqlx::query(
        r#"
        UPDATE quiz_sessions
        SET current_question = ?, score = ?, completed = ?, answer_history = ?
        WHERE session_id = ? AND user_id = ? AND current_question = ? AND completed = FALSE
        "#,
    )
    .bind(session.current_question_index)
    .bind(session.score)
    .bind(session.completed)
    .bind(SqlJson(&session.answer_history))
    .bind(&session.session_id)
    .bind(&claims.sub)
    .bind(previous_index)
    .execute(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to record answer: {:?}", e);
        AppError::from(e)
    })?;

    if result.rows_affected() == 0 {
        tracing::warn!(%session_id, "Concurrent answer rejected");
        return Err(AppError::Conflict(
            "Question was answered by another request".to_string(),
        ));
    }

    if session.completed {
        tracing::info!(%session_id, score = session.score, "Quiz session completed");
    }

    Ok(Json(SubmitAnswerResponse {
        correct: record.correct,
        correct_answer: record.correct_answer,
        score: session.score,
        current_question: session.current_question_index,
        completed: session.completed,
    }))
}

/// Public leaderboard row. Carries no owner identity.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct LeaderboardEntry {
    pub rank: i64,
    pub score: i64,
    pub total_questions: i64,
    pub created_at: chrono::DateTime<Utc>,
}

/// Top 5 completed sessions by share of correct answers, then raw score;
/// earlier attempts win remaining ties.
pub async fn get_leaderboard(
    State(pool): State<SqlitePool>,
) -> Result<impl IntoResponse, AppError> {
    let leaderboard = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT
            ROW_NUMBER() OVER (
                ORDER BY score * 1.0 / NULLIF(json_array_length(questions), 0) DESC,
                         score DESC,
                         created_at ASC
            ) AS rank,
            score,
            json_array_length(questions) AS total_questions,
            created_at
        FROM quiz_sessions
        WHERE completed = TRUE
        ORDER BY rank
        LIMIT 5
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(leaderboard))
}
