//! Persistence of the signed-in user between runs.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use crate::session::AuthError;

/// The slice of auth state that outlives a run: the user identity only.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSession {
    pub user: Option<User>,
}

pub trait SessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, AuthError>;
    fn save(&self, session: &PersistedSession) -> Result<(), AuthError>;
    fn clear(&self) -> Result<(), AuthError>;
}

/// JSON file backed store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(AuthError::Storage(err.to_string())),
        };

        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(err) => {
                log::warn!(
                    "Ignoring unreadable session file {}: {err}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    fn save(&self, session: &PersistedSession) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| AuthError::Storage(err.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(session)
            .map_err(|err| AuthError::Storage(err.to_string()))?;
        fs::write(&self.path, raw).map_err(|err| AuthError::Storage(err.to_string()))
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AuthError::Storage(err.to_string())),
        }
    }
}

/// Store that forgets everything with the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: RefCell<Option<PersistedSession>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: User) -> Self {
        Self {
            session: RefCell::new(Some(PersistedSession { user: Some(user) })),
        }
    }

    pub fn snapshot(&self) -> Option<PersistedSession> {
        self.session.borrow().clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<PersistedSession>, AuthError> {
        Ok(self.session.borrow().clone())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), AuthError> {
        self.session.replace(Some(session.clone()));
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.session.replace(None);
        Ok(())
    }
}
