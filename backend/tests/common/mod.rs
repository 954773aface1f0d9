// tests/common/mod.rs

#![allow(dead_code)]

use quiz_backend::{
    config::Config, handlers::admin::insert_question, models::question::CreateQuestionRequest,
    routes, state::AppState, utils::jwt::sign_jwt,
};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

pub const JWT_SECRET: &str = "test_secret_for_integration_tests";
pub const QUIZ_LENGTH: u32 = 4;

pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        rust_log: "error".to_string(),
        quiz_length: QUIZ_LENGTH,
        bind_addr: "127.0.0.1:0".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        question_seed_path: None,
    }
}

/// A single-connection in-memory database with migrations applied.
/// One connection, never recycled, so every query sees the same database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

/// Spawns the app on a random port.
/// Returns the base URL (e.g., "http://127.0.0.1:12345") and the pool.
pub async fn spawn_app() -> TestApp {
    let pool = test_pool().await;

    let state = AppState {
        pool: pool.clone(),
        config: test_config(),
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, pool }
}

/// Seeds `n` questions whose correct answer is always "A".
pub async fn seed_questions(pool: &SqlitePool, n: usize, category: &str) {
    for i in 0..n {
        let req = CreateQuestionRequest {
            question: format!("Question {}", i),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: "A".into(),
            image: None,
            category: category.to_string(),
        };
        insert_question(pool, &req).await.unwrap();
    }
}

pub fn token_for(user_id: &str) -> String {
    sign_jwt(user_id, "user", JWT_SECRET, 600).unwrap()
}

pub fn admin_token() -> String {
    sign_jwt("admin_1", "admin", JWT_SECRET, 600).unwrap()
}

pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
