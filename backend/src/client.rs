// src/client.rs

use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::models::quiz_session::{DetailVariant, HistoryResponse, QuizSession, SessionSummary};

#[derive(Debug)]
pub enum ClientError {
    /// The request never produced a response.
    Transport(String),
    /// Non-2xx response. `message` is the body's `error` field when present.
    Status { status: u16, message: String },
    /// The body did not have the expected shape.
    Decode(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "request failed: {}", msg),
            ClientError::Status { status, message } => write!(f, "{} ({})", message, status),
            ClientError::Decode(msg) => write!(f, "unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Read/delete access to the caller's quiz sessions.
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn fetch_history(&self) -> Result<Vec<SessionSummary>, ClientError>;

    /// `Ok(None)` when the session does not exist or is not the caller's.
    async fn fetch_session(
        &self,
        variant: DetailVariant,
        session_id: &str,
    ) -> Result<Option<QuizSession>, ClientError>;

    async fn delete_session(
        &self,
        variant: DetailVariant,
        session_id: &str,
    ) -> Result<(), ClientError>;
}

/// `QuizApi` over HTTP with a bearer token from the identity provider.
#[derive(Clone)]
pub struct HttpQuizApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpQuizApi {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-2xx response into `ClientError::Status`.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn fetch_history(&self) -> Result<Vec<SessionSummary>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/history"))
            .bearer_auth(&self.token)
            .send()
            .await?;

        let body: HistoryResponse = check_status(response).await?.json().await?;
        Ok(body.past_quizzes)
    }

    async fn fetch_session(
        &self,
        variant: DetailVariant,
        session_id: &str,
    ) -> Result<Option<QuizSession>, ClientError> {
        let response = self
            .http
            .get(self.url(variant.endpoint()))
            .query(&[("id", session_id)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        // An unknown id on the server side is a 200 with a null payload;
        // treat a bare 404 the same way.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let mut body: Value = check_status(response).await?.json().await?;
        match body.get_mut(variant.payload_key()).map(Value::take) {
            None | Some(Value::Null) => Ok(None),
            Some(payload) => serde_json::from_value(payload)
                .map(Some)
                .map_err(|e| ClientError::Decode(e.to_string())),
        }
    }

    async fn delete_session(
        &self,
        variant: DetailVariant,
        session_id: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(variant.endpoint()))
            .query(&[("id", session_id)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }
}
