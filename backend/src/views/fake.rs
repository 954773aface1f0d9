// In-memory QuizApi for view tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::client::{ClientError, QuizApi};
use crate::models::question::Question;
use crate::models::quiz_session::{DetailVariant, QuizSession, SessionSummary};

#[derive(Default)]
pub struct FakeApi {
    pub sessions: Mutex<Vec<QuizSession>>,
    pub fail_reads: AtomicBool,
    pub fail_deletes: AtomicBool,
}

impl FakeApi {
    pub fn with_sessions(sessions: Vec<QuizSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            ..Default::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl QuizApi for FakeApi {
    async fn fetch_history(&self) -> Result<Vec<SessionSummary>, ClientError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Transport("connection refused".to_string()));
        }
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions
            .iter()
            .map(|s| SessionSummary {
                session_id: s.session_id.clone(),
                language: None,
                completed: s.completed,
                created_at: s.created_at,
                score: s.score,
                total_questions: s.total_questions() as i64,
            })
            .collect())
    }

    async fn fetch_session(
        &self,
        _variant: DetailVariant,
        session_id: &str,
    ) -> Result<Option<QuizSession>, ClientError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: "Internal Server Error".to_string(),
            });
        }
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.iter().find(|s| s.session_id == session_id).cloned())
    }

    async fn delete_session(
        &self,
        _variant: DetailVariant,
        session_id: &str,
    ) -> Result<(), ClientError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                message: "Failed to delete quiz".to_string(),
            });
        }
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.session_id != session_id);
        if sessions.len() == before {
            return Err(ClientError::Status {
                status: 404,
                message: "Quiz session not found".to_string(),
            });
        }
        Ok(())
    }
}

pub fn question(id: i64) -> Question {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    Question {
        id,
        prompt: format!("Question {}", id),
        options: vec!["A".to_string(), "B".to_string()],
        correct_answer: "A".to_string(),
        image: None,
        category: "general".to_string(),
        created_at: at,
        updated_at: at,
    }
}

/// A session with `total` questions and the given answers recorded in order.
pub fn session(id: &str, total: i64, answers: &[&str]) -> QuizSession {
    let created = Utc.with_ymd_and_hms(2025, 3, 14, 18, 5, 0).unwrap();
    let mut s = QuizSession::new(id, "user_1", (1..=total).map(question).collect(), created);
    for (i, answer) in answers.iter().enumerate() {
        s.record_answer(i as i64, answer).unwrap();
    }
    s
}
