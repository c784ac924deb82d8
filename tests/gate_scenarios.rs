//! End-to-end gate scenarios.
//!
//! Each test mounts a gate over in-memory collaborators on a paused clock
//! and checks the navigation, session flag and decision it produces.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use wallet_auth_gate::collaborators::{
    NavigationCall, RecordingNavigator, StaticCitizenshipCheck, StaticTopWalletVerifier, StaticWalletLogin,
};
use wallet_auth_gate::types::DESTINATION_PATH_KEY;
use wallet_auth_gate::{
    AuthGateRouter, CitizenshipStatus, CommittedRoute, CredentialProbe, Destination, DialogButton,
    DialogDescriptor, GateConfig, GateDecision, LaunchState, NavParams, SessionCredential, SessionState,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

struct Mounted {
    decision: GateDecision,
    navigator: Arc<RecordingNavigator>,
    session: Arc<SessionState>,
}

async fn mount_and_evaluate(
    login: StaticWalletLogin,
    check: StaticCitizenshipCheck,
    launch: LaunchState,
) -> Mounted {
    let navigator = Arc::new(RecordingNavigator::new());
    let session = Arc::new(SessionState::new());
    let probe = CredentialProbe::new(
        Arc::new(login),
        Arc::new(check),
        Arc::new(StaticTopWalletVerifier::ok(json!({"ok": 1}))),
        GateConfig::default(),
    );
    let router = AuthGateRouter::new(probe, Arc::clone(&session), Arc::clone(&navigator), launch);

    let decision = router.evaluate().await;
    Mounted { decision, navigator, session }
}

// ─────────────────────────────────────────────────────────────────────────────
// Routing scenarios
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_logged_in_citizen_enters_app() {
    let m = mount_and_evaluate(
        StaticWalletLogin::new(SessionCredential::issued("abc")),
        StaticCitizenshipCheck::answering(true),
        LaunchState::new("/"),
    )
    .await;

    assert_eq!(
        m.navigator.calls(),
        vec![NavigationCall { destination: Destination::Authenticated, params: None }]
    );
    assert!(m.session.logged_in_citizen());
    assert_eq!(m.decision.destination, Destination::Authenticated);
}

#[tokio::test(start_paused = true)]
async fn test_known_wallet_not_citizen_goes_to_onboarding() {
    let m = mount_and_evaluate(
        StaticWalletLogin::new(SessionCredential::issued("abc")),
        StaticCitizenshipCheck::answering(false),
        LaunchState::new("/"),
    )
    .await;

    assert_eq!(m.navigator.calls().len(), 1);
    assert_eq!(m.navigator.calls()[0].destination, Destination::Onboarding);
    assert!(!m.session.logged_in_citizen());
    // The credential is retained on the decision.
    assert_eq!(m.decision.outcome.credential.token(), Some("abc"));
    assert!(m.decision.outcome.is_authenticated);
}

#[tokio::test(start_paused = true)]
async fn test_failed_login_goes_to_onboarding_regardless_of_citizenship() {
    for is_citizen in [true, false] {
        let m = mount_and_evaluate(
            StaticWalletLogin::new(SessionCredential::failed("invalid signature")),
            StaticCitizenshipCheck::answering(is_citizen),
            LaunchState::new("/"),
        )
        .await;

        assert_eq!(m.navigator.calls().len(), 1);
        assert_eq!(m.navigator.calls()[0].destination, Destination::Onboarding);
        assert!(!m.session.logged_in_citizen());
        assert_eq!(
            m.decision.outcome.credential.failure_detail(),
            Some("invalid signature")
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_deep_link_params_forwarded_unmodified() {
    let launch = LaunchState::new("/")
        .with_param("destinationPath", "/claim")
        .with_param("extra", "x");

    let m = mount_and_evaluate(
        StaticWalletLogin::new(SessionCredential::failed("invalid signature")),
        StaticCitizenshipCheck::answering(true),
        launch,
    )
    .await;

    let mut expected = NavParams::new();
    expected.insert("destinationPath".to_string(), "/claim".to_string());
    expected.insert("extra".to_string(), "x".to_string());

    assert_eq!(
        m.navigator.calls(),
        vec![NavigationCall { destination: Destination::Onboarding, params: Some(expected.clone()) }]
    );
    assert_eq!(
        m.session.committed_route(),
        Some(CommittedRoute { destination: Destination::Onboarding, params: Some(expected) })
    );
}

#[tokio::test(start_paused = true)]
async fn test_launch_state_serialized_when_no_destination_path() {
    let launch = LaunchState::new("/send").with_param("code", "42");

    let m = mount_and_evaluate(
        StaticWalletLogin::new(SessionCredential::issued("abc")),
        StaticCitizenshipCheck::answering(false),
        launch.clone(),
    )
    .await;

    let params = m.navigator.calls()[0].params.clone().unwrap();
    let decoded: LaunchState = serde_json::from_str(&params[DESTINATION_PATH_KEY]).unwrap();
    assert_eq!(decoded, launch);
}

// ─────────────────────────────────────────────────────────────────────────────
// Timing and failure properties
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_never_resolves_before_min_delay() {
    let m = mount_and_evaluate(
        StaticWalletLogin::new(SessionCredential::issued("abc")),
        StaticCitizenshipCheck::answering(true),
        LaunchState::new("/"),
    )
    .await;

    assert!(m.decision.elapsed >= Duration::from_millis(1000));
}

#[tokio::test(start_paused = true)]
async fn test_rejected_citizenship_fails_closed() {
    let m = mount_and_evaluate(
        StaticWalletLogin::new(SessionCredential::issued("abc")),
        StaticCitizenshipCheck::rejecting("503 Service Unavailable"),
        LaunchState::new("/"),
    )
    .await;

    assert!(!m.decision.outcome.is_citizen);
    assert!(matches!(m.decision.outcome.citizenship, CitizenshipStatus::Unverified { .. }));
    assert_eq!(m.decision.destination, Destination::Onboarding);
    assert!(!m.session.logged_in_citizen());
}

#[tokio::test(start_paused = true)]
async fn test_hung_login_resolves_at_deadline() {
    let m = mount_and_evaluate(
        StaticWalletLogin::hanging(),
        StaticCitizenshipCheck::answering(true),
        LaunchState::new("/"),
    )
    .await;

    assert_eq!(m.decision.destination, Destination::Onboarding);
    assert!(m.decision.elapsed >= Duration::from_secs(30));
    assert_eq!(m.navigator.calls().len(), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Dialog overlay through the session
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn test_dialog_independent_of_gate() {
    let session = Arc::new(SessionState::new());
    let dismissed = Arc::new(Mutex::new(Vec::new()));

    let a = Arc::clone(&dismissed);
    session.dialog().show(
        DialogDescriptor::new(json!({"title": "A"})).on_dismiss(move |d| a.lock().unwrap().push(d.content.clone())),
    );
    let b = Arc::clone(&dismissed);
    session.dialog().show(
        DialogDescriptor::new(json!({"title": "B"}))
            .with_button(DialogButton::new("Later").on_activate(|overlay| {
                overlay.dismiss();
            }))
            .on_dismiss(move |d| b.lock().unwrap().push(d.content.clone())),
    );

    let navigator = Arc::new(RecordingNavigator::new());
    let probe = CredentialProbe::new(
        Arc::new(StaticWalletLogin::new(SessionCredential::issued("abc"))),
        Arc::new(StaticCitizenshipCheck::answering(true)),
        Arc::new(StaticTopWalletVerifier::failing("timeout")),
        GateConfig::default(),
    );
    let router = AuthGateRouter::new(probe, Arc::clone(&session), navigator, LaunchState::new("/"));
    router.evaluate().await;

    // Gate resolution leaves the dialog alone.
    assert!(session.dialog().is_visible());
    assert_eq!(session.dialog().current().content, json!({"title": "B"}));

    assert!(session.dialog().activate(0));
    assert_eq!(*dismissed.lock().unwrap(), vec![json!({"title": "B"})]);
    assert!(!session.dialog().is_visible());
}
