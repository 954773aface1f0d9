// src/views/auth.rs

use crate::views::route::Route;

/// What the identity provider exposes to the views.
pub trait Identity {
    /// False until the provider has finished loading.
    fn is_loaded(&self) -> bool;
    fn is_signed_in(&self) -> bool;
    fn current_user_id(&self) -> Option<&str>;
}

/// Snapshot of the provider's state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_loaded: bool,
    pub user_id: Option<String>,
}

impl AuthState {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn signed_out() -> Self {
        Self {
            is_loaded: true,
            user_id: None,
        }
    }

    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            is_loaded: true,
            user_id: Some(user_id.into()),
        }
    }
}

impl Identity for AuthState {
    fn is_loaded(&self) -> bool {
        self.is_loaded
    }

    fn is_signed_in(&self) -> bool {
        self.user_id.is_some()
    }

    fn current_user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Provider not ready; show a neutral loading affordance.
    Loading,
    Redirect(Route),
    Proceed(String),
}

/// The single guard every session-bearing view goes through.
#[derive(Debug, Clone)]
pub struct AuthGate {
    redirect_to: Route,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self {
            redirect_to: Route::SignIn,
        }
    }
}

impl AuthGate {
    pub fn new(redirect_to: Route) -> Self {
        Self { redirect_to }
    }

    pub fn check(&self, identity: &dyn Identity) -> GateDecision {
        if !identity.is_loaded() {
            return GateDecision::Loading;
        }
        match identity.current_user_id() {
            Some(user_id) if identity.is_signed_in() => GateDecision::Proceed(user_id.to_string()),
            _ => GateDecision::Redirect(self.redirect_to.clone()),
        }
    }
}
