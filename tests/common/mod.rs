#![allow(dead_code)]

use std::path::PathBuf;

use crm_dashboard::domain::user::LoginCredentials;
use crm_dashboard::session::{AuthState, DEMO_PASSWORD, FileSessionStore};
use tempfile::TempDir;

/// Session file in a temporary directory that disappears with the value.
pub struct TestSession {
    dir: TempDir,
}

impl TestSession {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("auth-storage.json")
    }

    /// Fresh, initialized state reading the session file.
    pub fn state(&self) -> AuthState {
        let mut state = AuthState::new(Box::new(FileSessionStore::new(self.path())));
        state.initialize().expect("initialize session");
        state
    }

    /// Initialized state with John Doe signed in.
    pub fn signed_in(&self) -> AuthState {
        let mut state = self.state();
        state
            .login(&LoginCredentials {
                email: "john@example.com".to_string(),
                password: DEMO_PASSWORD.to_string(),
            })
            .expect("login");
        state
    }

    pub fn export_dir(&self) -> PathBuf {
        self.dir.path().join("exports")
    }
}
