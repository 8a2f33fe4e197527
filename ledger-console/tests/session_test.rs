mod common;

use common::{credential, merchant_id, TestConsole};
use ledger_console::error::SessionError;
use ledger_console::routing::{EntryPoint, RouteDecision};
use ledger_console::session::{FileSessionStorage, SessionPhase, SessionStorage};
use secrecy::Secret;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mount_login(console: &TestConsole, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({ "username": "merchant1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": token })))
        .mount(&console.ledger)
        .await;
}

#[tokio::test]
async fn merchant_login_lands_on_the_merchant_dashboard() {
    let console = TestConsole::spawn().await;
    let token = credential("merchant1", &["MERCHANT"], Some(merchant_id()));
    mount_login(&console, &token).await;

    let decision = console
        .state
        .login("merchant1", &Secret::new("secret-pass".to_string()))
        .await
        .expect("login should succeed");

    assert_eq!(decision, RouteDecision::Allow(EntryPoint::MerchantDashboard));
    let identity = console.state.session.identity().expect("identity after login");
    assert_eq!(identity.merchant_affiliation, Some(merchant_id()));
    assert_eq!(
        console.state.route(EntryPoint::VendorManagement),
        RouteDecision::Allow(EntryPoint::VendorManagement)
    );
    assert_eq!(
        console.state.route(EntryPoint::AdminDashboard),
        RouteDecision::AccessDenied
    );
}

#[tokio::test]
async fn login_without_routable_roles_is_denied_every_view() {
    let console = TestConsole::spawn().await;
    let token = credential("merchant1", &[], None);
    mount_login(&console, &token).await;

    let decision = console
        .state
        .login("merchant1", &Secret::new("secret-pass".to_string()))
        .await
        .expect("login should succeed");

    assert_eq!(decision, RouteDecision::AccessDenied);
    assert!(console.state.session.is_authenticated());
    assert_eq!(
        console.state.route(EntryPoint::VendorDashboard),
        RouteDecision::AccessDenied
    );
}

#[tokio::test]
async fn rejected_login_leaves_the_session_signed_out() {
    let console = TestConsole::spawn().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&console.ledger)
        .await;

    let err = console
        .state
        .login("merchant1", &Secret::new("wrong".to_string()))
        .await
        .unwrap_err();

    match err {
        SessionError::Api(api) => {
            assert_eq!(api.backend_message(), Some("Invalid credentials"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(console.state.session.phase(), SessionPhase::Unauthenticated);
    assert_eq!(
        console.state.route(EntryPoint::MerchantDashboard),
        RouteDecision::Login
    );
}

#[tokio::test]
async fn unreadable_token_from_login_is_refused() {
    let console = TestConsole::spawn().await;
    mount_login(&console, "opaque-token").await;

    let err = console
        .state
        .login("merchant1", &Secret::new("secret-pass".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::InvalidCredential));
    assert!(console.state.session.identity().is_none());
}

#[tokio::test]
async fn file_backed_session_survives_a_restart() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("session.json");

    let first = TestConsole::spawn_with_storage(Arc::new(FileSessionStorage::new(&file))).await;
    first.sign_in_merchant();
    assert!(file.exists());

    let second = TestConsole::spawn_with_storage(Arc::new(FileSessionStorage::new(&file))).await;
    let identity = second.state.session.identity().expect("rehydrated identity");
    assert_eq!(identity.subject, "merchant1");
    assert_eq!(
        second.state.route(EntryPoint::OrderCompletion),
        RouteDecision::Allow(EntryPoint::OrderCompletion)
    );

    second.state.session.logout().expect("logout");
    let storage = FileSessionStorage::new(&file);
    assert!(storage.load().expect("load after logout").is_none());
}
