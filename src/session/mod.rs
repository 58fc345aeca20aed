//! Authentication state of a dashboard session.
//!
//! [`AuthState`] starts [`SessionPhase::Uninitialized`]. [`AuthState::initialize`]
//! restores the persisted user once; afterwards login/logout keep the store in
//! step with the in-memory state. The state is owned by the caller and passed
//! by reference to whatever needs it.

use thiserror::Error;

use crate::domain::user::{LoginCredentials, Role, User};

pub mod guard;
pub mod store;

pub use guard::{GuardDecision, check_route, ensure_authenticated};
pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore};

/// Password accepted for every demo account.
pub const DEMO_PASSWORD: &str = "password";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session storage error: {0}")]
    Storage(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Initialized,
}

/// Demo accounts that can sign in.
pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::Admin,
            avatar: Some("/api/placeholder/32/32".to_string()),
        },
        User {
            id: "2".to_string(),
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            role: Role::Manager,
            avatar: Some("/api/placeholder/32/32".to_string()),
        },
    ]
}

pub struct AuthState {
    store: Box<dyn SessionStore>,
    user: Option<User>,
    is_authenticated: bool,
    is_loading: bool,
    phase: SessionPhase,
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("user", &self.user)
            .field("is_authenticated", &self.is_authenticated)
            .field("is_loading", &self.is_loading)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl AuthState {
    pub fn new(store: Box<dyn SessionStore>) -> Self {
        Self {
            store,
            user: None,
            is_authenticated: false,
            is_loading: false,
            phase: SessionPhase::Uninitialized,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == SessionPhase::Initialized
    }

    /// Restores the persisted user and marks the state initialized.
    ///
    /// Calling it again re-reads the store.
    pub fn initialize(&mut self) -> Result<(), AuthError> {
        let persisted = self.store.load()?;
        self.user = persisted.and_then(|session| session.user);
        self.is_authenticated = self.user.is_some();
        self.phase = SessionPhase::Initialized;
        log::info!(
            "Session initialized, authenticated: {}",
            self.is_authenticated
        );
        Ok(())
    }

    /// Signs in a demo account and persists it.
    pub fn login(&mut self, credentials: &LoginCredentials) -> Result<&User, AuthError> {
        self.is_loading = true;
        let result = self.try_login(credentials);
        self.is_loading = false;

        match result {
            Ok(user) => {
                log::info!("User {} signed in", user.email);
                self.user = Some(user);
                self.is_authenticated = true;
                self.user.as_ref().ok_or(AuthError::NotAuthenticated)
            }
            Err(err) => {
                log::warn!("Failed sign in for {}: {err}", credentials.email);
                Err(err)
            }
        }
    }

    fn try_login(&self, credentials: &LoginCredentials) -> Result<User, AuthError> {
        let user = demo_users()
            .into_iter()
            .find(|user| user.email == credentials.email)
            .filter(|_| credentials.password == DEMO_PASSWORD)
            .ok_or(AuthError::InvalidCredentials)?;

        self.store.save(&PersistedSession {
            user: Some(user.clone()),
        })?;
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.user = None;
        self.is_authenticated = false;
        self.store.clear()?;
        log::info!("User signed out");
        Ok(())
    }

    /// Re-derives the authenticated flag from the current user.
    pub fn check_auth(&mut self) {
        if self.user.is_some() {
            self.is_authenticated = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    /// Store handle shared between the state under test and the assertions.
    struct SharedStore(Rc<MemorySessionStore>);

    impl SessionStore for SharedStore {
        fn load(&self) -> Result<Option<PersistedSession>, AuthError> {
            self.0.load()
        }

        fn save(&self, session: &PersistedSession) -> Result<(), AuthError> {
            self.0.save(session)
        }

        fn clear(&self) -> Result<(), AuthError> {
            self.0.clear()
        }
    }

    fn credentials(email: &str, password: &str) -> LoginCredentials {
        LoginCredentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn starts_uninitialized() {
        let state = AuthState::new(Box::new(MemorySessionStore::new()));

        assert_eq!(state.phase(), SessionPhase::Uninitialized);
        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
    }

    #[test]
    fn initialize_restores_persisted_user() {
        let john = demo_users().remove(0);
        let mut state = AuthState::new(Box::new(MemorySessionStore::with_user(john.clone())));

        state.initialize().unwrap();

        assert!(state.is_initialized());
        assert!(state.is_authenticated());
        assert_eq!(state.user(), Some(&john));
    }

    #[test]
    fn login_persists_only_the_user() {
        let store = Rc::new(MemorySessionStore::new());
        let mut state = AuthState::new(Box::new(SharedStore(store.clone())));
        state.initialize().unwrap();

        let user = state
            .login(&credentials("jane@example.com", DEMO_PASSWORD))
            .unwrap();
        assert_eq!(user.role, Role::Manager);
        assert!(state.is_authenticated());
        assert!(!state.is_loading());

        let persisted = store.snapshot().unwrap();
        assert_eq!(persisted.user.map(|u| u.email).as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn wrong_password_or_unknown_email_is_rejected() {
        let mut state = AuthState::new(Box::new(MemorySessionStore::new()));
        state.initialize().unwrap();

        assert_eq!(
            state.login(&credentials("john@example.com", "hunter2")).unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            state.login(&credentials("nobody@example.com", DEMO_PASSWORD)).unwrap_err(),
            AuthError::InvalidCredentials
        );
        assert!(!state.is_authenticated());
    }

    #[test]
    fn logout_clears_state_and_store() {
        let store = Rc::new(MemorySessionStore::with_user(demo_users().remove(0)));
        let mut state = AuthState::new(Box::new(SharedStore(store.clone())));
        state.initialize().unwrap();

        state.logout().unwrap();

        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
        assert_eq!(store.snapshot(), None);
    }
}
