// src/views/mod.rs
//
// Presentation-independent view state for the quiz front end. Each view is a
// small state machine fed by a `QuizApi`; rendering is left to the caller.

pub mod auth;
pub mod creation;
pub mod dashboard;
pub mod nav;
pub mod route;
pub mod session;

#[cfg(test)]
pub(crate) mod fake;
