// src/views/session.rs

use crate::{
    client::QuizApi,
    models::{
        question::Question,
        quiz_session::{AnswerRecord, DetailVariant, IntegrityAnomaly, QuizSession},
    },
    views::{
        auth::{AuthGate, GateDecision, Identity},
        dashboard::format_taken_at,
        route::Route,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOutcome {
    Correct,
    Incorrect,
    /// No answer recorded at this position. Never counted as correct.
    Unanswered,
}

/// One question paired positionally with its answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub number: usize,
    pub question: Question,
    pub answer: Option<AnswerRecord>,
    pub outcome: ReviewOutcome,
}

/// Everything the detail/summary screen shows for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub session_id: String,
    pub taken_at: String,
    pub score: i64,
    pub total_questions: usize,
    /// `None` for a quiz with no questions.
    pub percentage: Option<u32>,
    pub completed: bool,
    /// One entry per question.
    pub review: Vec<ReviewItem>,
    pub anomalies: Vec<IntegrityAnomaly>,
}

impl SessionReport {
    pub fn from_session(session: &QuizSession) -> Self {
        let review = session
            .questions
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let answer = session.answer_history.get(i).cloned();
                let outcome = match &answer {
                    Some(a) if a.correct => ReviewOutcome::Correct,
                    Some(_) => ReviewOutcome::Incorrect,
                    None => ReviewOutcome::Unanswered,
                };
                ReviewItem {
                    number: i + 1,
                    question: question.clone(),
                    answer,
                    outcome,
                }
            })
            .collect();

        Self {
            session_id: session.session_id.clone(),
            taken_at: format_taken_at(&session.created_at),
            score: session.score,
            total_questions: session.total_questions(),
            percentage: session.percentage(),
            completed: session.completed,
            review,
            anomalies: session.check_integrity(),
        }
    }

    pub fn percentage_label(&self) -> String {
        match self.percentage {
            Some(p) => format!("{}%", p),
            None => "N/A".to_string(),
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Incomplete" }
    }

    /// False when no answers were recorded; the screen shows a
    /// "no answers" note instead of the review list.
    pub fn has_answers(&self) -> bool {
        self.review.iter().any(|item| item.answer.is_some())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionViewState {
    Loading,
    Loaded(SessionReport),
    /// Missing or owned by someone else.
    NotFound,
    Failed(String),
}

/// Result of confirming a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deleted; leave for the dashboard.
    Navigate(Route),
    /// The view stays as it was with `delete_error` set.
    Failed(String),
    /// No confirmation was pending, nothing was sent.
    NotConfirmed,
}

/// The detail and summary screens. One view, two endpoints.
#[derive(Debug)]
pub struct SessionView {
    variant: DetailVariant,
    session_id: String,
    state: SessionViewState,
    confirming_delete: bool,
    delete_error: Option<String>,
}

impl SessionView {
    pub fn new(variant: DetailVariant, session_id: impl Into<String>) -> Self {
        Self {
            variant,
            session_id: session_id.into(),
            state: SessionViewState::Loading,
            confirming_delete: false,
            delete_error: None,
        }
    }

    pub fn state(&self) -> &SessionViewState {
        &self.state
    }

    pub fn is_confirming_delete(&self) -> bool {
        self.confirming_delete
    }

    pub fn delete_error(&self) -> Option<&str> {
        self.delete_error.as_deref()
    }

    pub fn back_route(&self) -> Route {
        Route::Dashboard
    }

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

    pub async fn load(&mut self, api: &dyn QuizApi) {
        self.state = SessionViewState::Loading;
        self.state = match api.fetch_session(self.variant, &self.session_id).await {
            Ok(Some(session)) => {
                let report = SessionReport::from_session(&session);
                for anomaly in &report.anomalies {
                    tracing::warn!(session_id = %self.session_id, %anomaly, "Session integrity anomaly");
                }
                SessionViewState::Loaded(report)
            }
            Ok(None) => SessionViewState::NotFound,
            Err(e) => {
                tracing::warn!("Failed to fetch quiz {}: {}", self.session_id, e);
                SessionViewState::Failed("Could not load this quiz. Please try again.".to_string())
            }
        };
    }

    /// Opens the confirmation step. Only a loaded session can be deleted.
    pub fn request_delete(&mut self) -> bool {
        if matches!(self.state, SessionViewState::Loaded(_)) {
            self.confirming_delete = true;
        }
        self.confirming_delete
    }

    pub fn cancel_delete(&mut self) {
        self.confirming_delete = false;
    }

    /// Sends the delete if a confirmation is pending. The report stays on
    /// screen until the store confirms success.
    pub async fn confirm_delete(&mut self, api: &dyn QuizApi) -> DeleteOutcome {
        if !self.confirming_delete {
            return DeleteOutcome::NotConfirmed;
        }
        self.confirming_delete = false;

        match api.delete_session(self.variant, &self.session_id).await {
            Ok(()) => {
                self.delete_error = None;
                DeleteOutcome::Navigate(Route::Dashboard)
            }
            Err(e) => {
                tracing::warn!("Failed to delete quiz {}: {}", self.session_id, e);
                let message = format!("Failed to delete quiz: {}. Please try again.", e);
                self.delete_error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::dashboard::{DashboardState, DashboardView};
    use crate::views::fake::{FakeApi, session};

    #[test]
    fn report_for_seven_of_ten() {
        let answers = ["A", "A", "A", "A", "A", "A", "A", "B", "B", "B"];
        let report = SessionReport::from_session(&session("s", 10, &answers));
        assert_eq!(report.percentage, Some(70));
        assert_eq!(report.percentage_label(), "70%");
        assert_eq!(report.status_label(), "Completed");
        assert!(report.anomalies.is_empty());
    }

    #[test]
    fn empty_quiz_has_a_fixed_fallback() {
        let report = SessionReport::from_session(&session("s", 0, &[]));
        assert_eq!(report.percentage, None);
        assert_eq!(report.percentage_label(), "N/A");
        assert!(report.review.is_empty());
    }

    #[test]
    fn questions_past_the_history_are_unanswered() {
        let report = SessionReport::from_session(&session("s", 3, &["A"]));
        assert_eq!(report.review.len(), 3);
        assert_eq!(report.review[0].outcome, ReviewOutcome::Correct);
        assert_eq!(report.review[1].outcome, ReviewOutcome::Unanswered);
        assert!(report.review[2].answer.is_none());
        assert_eq!(report.status_label(), "Incomplete");
    }

    #[test]
    fn completed_with_partial_history_is_reported() {
        let mut s = session("s", 3, &["A"]);
        s.completed = true;
        let report = SessionReport::from_session(&s);
        assert_eq!(
            report.anomalies,
            vec![IntegrityAnomaly::CompletedWithPartialHistory {
                answered: 1,
                total: 3
            }]
        );
        assert_eq!(report.review[2].outcome, ReviewOutcome::Unanswered);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let api = FakeApi::default();
        let mut view = SessionView::new(DetailVariant::Details, "missing");
        view.load(&api).await;
        assert_eq!(view.state(), &SessionViewState::NotFound);
        assert!(!view.request_delete());
    }

    #[tokio::test]
    async fn read_failure_is_distinct_from_not_found() {
        let api = FakeApi::with_sessions(vec![session("s", 1, &[])]);
        api.set_fail_reads(true);
        let mut view = SessionView::new(DetailVariant::Summary, "s");
        view.load(&api).await;
        assert!(matches!(view.state(), SessionViewState::Failed(_)));
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let api = FakeApi::with_sessions(vec![session("s", 1, &["A"])]);
        let mut view = SessionView::new(DetailVariant::Details, "s");
        view.load(&api).await;

        assert_eq!(view.confirm_delete(&api).await, DeleteOutcome::NotConfirmed);
        assert!(view.request_delete());
        view.cancel_delete();
        assert_eq!(view.confirm_delete(&api).await, DeleteOutcome::NotConfirmed);
        assert_eq!(api.sessions.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn successful_delete_navigates_and_drops_the_session() {
        let api = FakeApi::with_sessions(vec![session("s", 2, &["A", "A"]), session("t", 1, &[])]);
        let mut view = SessionView::new(DetailVariant::Details, "s");
        view.load(&api).await;

        view.request_delete();
        assert_eq!(
            view.confirm_delete(&api).await,
            DeleteOutcome::Navigate(Route::Dashboard)
        );

        let mut dashboard = DashboardView::new();
        dashboard.load(&api).await;
        let DashboardState::Sessions(rows) = dashboard.state() else {
            panic!("expected rows");
        };
        assert!(rows.iter().all(|r| r.session_id != "s"));
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_view_and_the_session() {
        let api = FakeApi::with_sessions(vec![session("s", 2, &["A", "B"])]);
        api.set_fail_deletes(true);
        let mut view = SessionView::new(DetailVariant::Summary, "s");
        view.load(&api).await;
        let before = view.state().clone();

        view.request_delete();
        let outcome = view.confirm_delete(&api).await;

        assert!(matches!(outcome, DeleteOutcome::Failed(_)));
        assert_eq!(view.state(), &before);
        assert!(view.delete_error().is_some());

        let mut dashboard = DashboardView::new();
        dashboard.load(&api).await;
        let DashboardState::Sessions(rows) = dashboard.state() else {
            panic!("expected rows");
        };
        assert!(rows.iter().any(|r| r.session_id == "s"));

        // Retry once the store recovers
        api.set_fail_deletes(false);
        view.request_delete();
        assert_eq!(
            view.confirm_delete(&api).await,
            DeleteOutcome::Navigate(Route::Dashboard)
        );
        assert!(view.delete_error().is_none());
    }
}
