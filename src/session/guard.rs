//! Route gating based on the auth state.

use crate::domain::user::User;
use crate::session::{AuthError, AuthState};

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// The state has not been initialized yet; show a loading indicator.
    Pending,
    Allow,
    Redirect(&'static str),
}

/// Decide what happens when `path` is requested in the given state.
pub fn check_route(state: &AuthState, path: &str) -> GuardDecision {
    if !state.is_initialized() {
        return GuardDecision::Pending;
    }

    match (state.is_authenticated(), path == LOGIN_PATH) {
        (false, false) => GuardDecision::Redirect(LOGIN_PATH),
        (true, true) => GuardDecision::Redirect(HOME_PATH),
        _ => GuardDecision::Allow,
    }
}

/// Returns the signed-in user or [`AuthError::NotAuthenticated`].
pub fn ensure_authenticated(state: &AuthState) -> Result<&User, AuthError> {
    match state.user() {
        Some(user) if state.is_initialized() && state.is_authenticated() => Ok(user),
        _ => Err(AuthError::NotAuthenticated),
    }
}
