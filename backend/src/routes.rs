// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, history, quiz, quiz_details},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Every session-bearing route sits behind `auth_middleware`.
/// * The question bank is writable by admins only.
/// * Global middleware: Trace, CORS.
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let session_routes = Router::new()
        .route("/history", get(history::list_history))
        .route(
            "/quiz-details",
            get(quiz_details::get_details).delete(quiz_details::delete_details),
        )
        .route(
            "/quiz-summary",
            get(quiz_details::get_summary).delete(quiz_details::delete_summary),
        )
        .route("/quiz", post(quiz::start_quiz))
        .route("/quiz/{id}", get(quiz::get_progress))
        .route("/quiz/{id}/answer", post(quiz::submit_answer))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let public_routes = Router::new().route("/quiz/leaderboard", get(quiz::get_leaderboard));

    let admin_routes = Router::new()
        .route("/questions", post(admin::create_question))
        // Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api", public_routes.merge(session_routes))
        .nest("/api/admin", admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
