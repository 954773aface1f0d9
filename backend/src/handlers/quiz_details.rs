// src/handlers/quiz_details.rs
//
// `/api/quiz-details` and `/api/quiz-summary` serve the same session
// contract; only the path and the response key differ.

use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    handlers::quiz::load_owned_session,
    models::quiz_session::DetailVariant,
    utils::jwt::Claims,
};

#[derive(Debug, Deserialize)]
pub struct SessionIdQuery {
    pub id: String,
}

async fn fetch_for(
    variant: DetailVariant,
    pool: &SqlitePool,
    claims: &Claims,
    session_id: &str,
) -> Result<Json<Value>, AppError> {
    let session = load_owned_session(pool, session_id, &claims.sub).await?;

    if let Some(session) = &session {
        for anomaly in session.check_integrity() {
            tracing::warn!(session_id, %anomaly, "Session integrity anomaly");
        }
    }

    let payload =
        serde_json::to_value(session).map_err(|e| AppError::InternalServerError(e.to_string()))?;
    let mut body = Map::new();
    body.insert(variant.payload_key().to_string(), payload);

    Ok(Json(Value::Object(body)))
}

async fn delete_for(
    variant: DetailVariant,
    pool: &SqlitePool,
    claims: &Claims,
    session_id: &str,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM quiz_sessions WHERE session_id = ? AND user_id = ?")
        .bind(session_id)
        .bind(&claims.sub)
        .execute(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to delete session {}: {:?}", session_id, e);
            AppError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Quiz session not found".to_string()));
    }

    tracing::info!(session_id, endpoint = variant.endpoint(), "Quiz session deleted");

    Ok(Json(serde_json::json!({
        "message": "Quiz deleted successfully"
    })))
}

/// Full session with questions and answer history, or `null` when the
/// session does not exist or belongs to someone else.
pub async fn get_details(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<SessionIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    fetch_for(DetailVariant::Details, &pool, &claims, &q.id).await
}

pub async fn delete_details(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<SessionIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    delete_for(DetailVariant::Details, &pool, &claims, &q.id).await
}

pub async fn get_summary(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<SessionIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    fetch_for(DetailVariant::Summary, &pool, &claims, &q.id).await
}

pub async fn delete_summary(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(q): Query<SessionIdQuery>,
) -> Result<impl IntoResponse, AppError> {
    delete_for(DetailVariant::Summary, &pool, &claims, &q.id).await
}
