use crm_dashboard::domain::user::{LoginCredentials, Role};
use crm_dashboard::session::{
    AuthError, DEMO_PASSWORD, GuardDecision, SessionPhase, check_route,
};

mod common;

#[test]
fn test_login_survives_restart() {
    let session = common::TestSession::new();

    let first = session.signed_in();
    assert!(first.is_authenticated());
    assert!(session.path().exists());
    drop(first);

    let restored = session.state();
    assert_eq!(restored.phase(), SessionPhase::Initialized);
    assert!(restored.is_authenticated());
    let user = restored.user().unwrap();
    assert_eq!(user.email, "john@example.com");
    assert_eq!(user.role, Role::Admin);

    let raw = std::fs::read_to_string(session.path()).unwrap();
    assert!(raw.contains("john@example.com"));
    assert!(!raw.contains("isLoading"));
}

#[test]
fn test_logout_forgets_user() {
    let session = common::TestSession::new();
    let mut state = session.signed_in();

    state.logout().unwrap();

    assert!(!session.path().exists());
    let restored = session.state();
    assert!(!restored.is_authenticated());
    assert_eq!(check_route(&restored, "/customers"), GuardDecision::Redirect("/login"));
}

#[test]
fn test_failed_login_keeps_store_empty() {
    let session = common::TestSession::new();
    let mut state = session.state();

    let err = state
        .login(&LoginCredentials {
            email: "jane@example.com".to_string(),
            password: format!("{DEMO_PASSWORD}!"),
        })
        .unwrap_err();

    assert_eq!(err, AuthError::InvalidCredentials);
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!session.path().exists());
}
