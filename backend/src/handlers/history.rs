// src/handlers/history.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::quiz_session::{HistoryResponse, SessionSummary},
    utils::jwt::Claims,
};

/// Lists the caller's quiz sessions in store order.
pub async fn list_history(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let past_quizzes = sqlx::query_as::<_, SessionSummary>(
        r#"
        SELECT session_id, language, completed, created_at, score,
               json_array_length(questions) AS total_questions
        FROM quiz_sessions
        WHERE user_id = ?
        ORDER BY rowid
        "#,
    )
    .bind(&claims.sub)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch history: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(HistoryResponse { past_quizzes }))
}
