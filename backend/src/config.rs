// src/config.rs

use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Shared secret used to verify tokens issued by the identity provider.
    pub jwt_secret: String,
    pub rust_log: String,
    /// Number of questions drawn for a new quiz.
    pub quiz_length: u32,
    pub bind_addr: String,
    pub allowed_origins: Vec<String>,
    /// JSON file of questions loaded into an empty bank at startup.
    pub question_seed_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let quiz_length = env::var("QUIZ_LENGTH")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(10);

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ]
            });

        let question_seed_path = env::var("QUESTION_SEED_PATH").ok();

        Self {
            database_url,
            jwt_secret,
            rust_log,
            quiz_length,
            bind_addr,
            allowed_origins,
            question_seed_path,
        }
    }
}
