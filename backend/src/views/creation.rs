// src/views/creation.rs

use uuid::Uuid;

use crate::views::route::Route;

/// The "start quiz" button.
///
/// Each accepted click mints a new session id; while the navigation it
/// triggered is pending, further clicks are ignored.
#[derive(Debug, Default)]
pub struct QuizLauncher {
    pending: Option<String>,
}

impl QuizLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The id handed out by the last accepted `start`.
    pub fn pending_session(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Returns the route to the new quiz, or `None` if a start is already
    /// in flight.
    pub fn start(&mut self) -> Option<Route> {
        if self.pending.is_some() {
            return None;
        }
        let session_id = Uuid::new_v4().to_string();
        tracing::debug!(%session_id, "Starting new quiz");
        self.pending = Some(session_id.clone());
        Some(Route::Quiz(session_id))
    }

    /// Called once navigation completes or fails; re-enables the button.
    pub fn settle(&mut self) {
        self.pending = None;
    }
}
