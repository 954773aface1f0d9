// src/views/route.rs

use std::fmt;

/// Navigation targets of the quiz front end.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    SignIn,
    /// Landing page that starts a new quiz.
    QuizStart,
    Dashboard,
    Leaderboard,
    /// An in-progress quiz.
    Quiz(String),
    QuizDetails(String),
    QuizSummary(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SignIn => "/sign-in".to_string(),
            Route::QuizStart => "/quiz".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Leaderboard => "/leaderboard".to_string(),
            Route::Quiz(id) => format!("/quiz/{}", id),
            Route::QuizDetails(id) => format!("/quiz-details/{}", id),
            Route::QuizSummary(id) => format!("/quiz-summary/{}", id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
