// src/handlers/admin.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{error::AppError, models::question::CreateQuestionRequest, utils::html::clean_html};

/// Inserts a validated question into the bank and returns its id.
/// The prompt is sanitized before storage.
pub async fn insert_question(
    pool: &SqlitePool,
    payload: &CreateQuestionRequest,
) -> Result<i64, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let now = Utc::now();
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO questions (question, options, correct_answer, image, category, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(clean_html(&payload.question))
    .bind(SqlJson(&payload.options))
    .bind(&payload.correct_answer)
    .bind(payload.image.as_deref())
    .bind(&payload.category)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question: {:?}", e);
        AppError::from(e)
    })?;

    Ok(id)
}

/// Adds a question to the bank.
/// Admin only.
pub async fn create_question(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = insert_question(&pool, &payload).await?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Loads questions from a JSON file into the bank when the bank is empty.
/// Returns how many were inserted.
pub async fn seed_questions(pool: &SqlitePool, path: &str) -> Result<usize, AppError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::InternalServerError(format!("{}: {}", path, e)))?;
    let questions: Vec<CreateQuestionRequest> = serde_json::from_str(&raw)?;

    for question in &questions {
        insert_question(pool, question).await?;
    }

    Ok(questions.len())
}
