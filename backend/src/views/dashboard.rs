// src/views/dashboard.rs

use chrono::{DateTime, Utc};

use crate::{
    client::QuizApi,
    models::quiz_session::SessionSummary,
    views::{
        auth::{AuthGate, GateDecision, Identity},
        route::Route,
    },
};

/// What a dashboard row links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    /// Incomplete session: continue the quiz.
    Resume(Route),
    /// Completed session: open the review.
    Details(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub session_id: String,
    pub taken_at: String,
    pub score: i64,
    pub total_questions: i64,
    pub completed: bool,
    pub action: RowAction,
}

impl From<&SessionSummary> for SessionRow {
    fn from(s: &SessionSummary) -> Self {
        let action = if s.completed {
            RowAction::Details(Route::QuizDetails(s.session_id.clone()))
        } else {
            RowAction::Resume(Route::Quiz(s.session_id.clone()))
        };
        Self {
            session_id: s.session_id.clone(),
            taken_at: format_taken_at(&s.created_at),
            score: s.score,
            total_questions: s.total_questions,
            completed: s.completed,
            action,
        }
    }
}

/// e.g. "March 14, 2025, 06:05 PM"
pub fn format_taken_at(at: &DateTime<Utc>) -> String {
    at.format("%B %-d, %Y, %I:%M %p").to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    /// No sessions yet. Show the call to action, not a table.
    Empty { start: Route },
    /// Rows in exactly the order the store returned them.
    Sessions(Vec<SessionRow>),
    Failed(String),
}

#[derive(Debug)]
pub struct DashboardView {
    state: DashboardState,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    pub fn new() -> Self {
        Self {
            state: DashboardState::Loading,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Shortcuts shown next to the results.
    pub fn quick_links(&self) -> [Route; 2] {
        [Route::QuizStart, Route::Leaderboard]
    }

    /// Runs the auth gate and, if it lets the user through, loads the
    /// history. Anything other than `Proceed` leaves the view loading.
    pub async fn mount(
        &mut self,
        gate: &AuthGate,
        identity: &dyn Identity,
        api: &dyn QuizApi,
    ) -> GateDecision {
        let decision = gate.check(identity);
        if matches!(decision, GateDecision::Proceed(_)) {
            self.load(api).await;
        }
        decision
    }

    /// Single fetch. A failure becomes a visible `Failed` state rather than
    /// an empty list.
    pub async fn load(&mut self, api: &dyn QuizApi) {
        self.state = DashboardState::Loading;
        self.state = match api.fetch_history().await {
            Ok(sessions) if sessions.is_empty() => DashboardState::Empty {
                start: Route::QuizStart,
            },
            Ok(sessions) => DashboardState::Sessions(sessions.iter().map(SessionRow::from).collect()),
            Err(e) => {
                tracing::warn!("Failed to fetch past quizzes: {}", e);
                DashboardState::Failed("Could not load your quizzes. Please try again.".to_string())
            }
        };
    }
}
